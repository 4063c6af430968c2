//! Request and response types for the dashboard API. Multiword wire names
//! are camelCase; the signup fields are lowercase single words. Payloads
//! carrying passwords must never be logged.

use serde::{Deserialize, Serialize};

/// Authenticated principal returned by the API to hydrate session state.
/// Mirrors cookie-backed session state and contains no secrets.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Identity {
    pub id: String,
    pub name: String,
    pub email: String,
    pub roles: Vec<String>,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct SignupRequest {
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for SignupRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignupRequest")
            .field("firstname", &self.firstname)
            .field("lastname", &self.lastname)
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

/// Outcome of a signup or code re-dispatch. `success: false` is a business
/// rejection, not a transport failure; the message explains it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SignupReceipt {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct VerifyOtpRequest {
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub password: String,
    pub otp: String,
}

impl std::fmt::Debug for VerifyOtpRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerifyOtpRequest")
            .field("firstname", &self.firstname)
            .field("lastname", &self.lastname)
            .field("email", &self.email)
            .field("password", &"***")
            .field("otp", &self.otp)
            .finish()
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct SigninRequest {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for SigninRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigninRequest")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub reset_token: String,
    pub new_password: String,
}

impl std::fmt::Debug for ResetPasswordRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResetPasswordRequest")
            .field("reset_token", &self.reset_token)
            .field("new_password", &"***")
            .finish()
    }
}

/// An institution the user can link.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Provider {
    pub name: String,
}

/// Connect request. The payload is institution-specific and opaque to the
/// client beyond being a JSON object.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectRequest {
    pub bank_name: String,
    pub connection_payload: serde_json::Value,
}

impl std::fmt::Debug for ConnectRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The payload usually carries institution credentials.
        f.debug_struct("ConnectRequest")
            .field("bank_name", &self.bank_name)
            .field("connection_payload", &"***")
            .finish()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisconnectRequest {
    pub account_id: String,
}

/// A linked account as the server reports it. The server is authoritative;
/// the client never fabricates or patches these.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BankConnection {
    pub account_id: String,
    pub bank_name: String,
    pub balance: f64,
    pub currency: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub bank_name: String,
    pub date: String,
    pub amount: f64,
    pub currency: String,
    pub category: String,
    pub description: String,
}

/// Transaction listing filter, sent as URL query parameters. Empty fields
/// are omitted entirely rather than sent blank.
#[derive(Clone, Debug, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TransactionFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

impl TransactionFilter {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.category.is_none() && self.start_date.is_none() && self.end_date.is_none()
    }
}
