//! Wrappers for the auth endpoints. These keep paths and payload shapes in
//! one place so the flows never touch request plumbing, and they must never
//! log a payload carrying a password.

use super::types::{
    ForgotPasswordRequest, Identity, ResetPasswordRequest, SigninRequest, SignupReceipt,
    SignupRequest, VerifyOtpRequest,
};
use super::ApiClient;
use crate::errors::ApiError;

/// Fetches the identity behind the current session cookie.
/// Returns `None` when the backend answers 401, the expected anonymous case.
///
/// # Errors
///
/// Returns an error for transport failures and unexpected statuses only.
pub async fn current_identity(client: &ApiClient) -> Result<Option<Identity>, ApiError> {
    client.get_optional_json("/auth/me").await
}

/// Submits a registration and asks the backend to dispatch a one-time code.
/// Both acceptance and business rejection come back as a receipt.
///
/// # Errors
///
/// Returns an error for transport failures or non-success statuses.
pub async fn signup(client: &ApiClient, request: &SignupRequest) -> Result<SignupReceipt, ApiError> {
    client.post_json("/auth/signup", request).await
}

/// Submits the full registration plus the entered code. On success the
/// backend sets the session cookie and returns the new identity.
///
/// # Errors
///
/// Returns an error for transport failures or non-success statuses.
pub async fn verify_otp(
    client: &ApiClient,
    request: &VerifyOtpRequest,
) -> Result<Identity, ApiError> {
    client.post_json("/auth/verify-otp", request).await
}

/// Exchanges credentials for a session. The backend sets the session cookie
/// and returns the identity.
///
/// # Errors
///
/// Returns an error for transport failures or non-success statuses; invalid
/// credentials surface as an `Http` error carrying the backend's message.
pub async fn signin(client: &ApiClient, request: &SigninRequest) -> Result<Identity, ApiError> {
    client.post_json("/auth/signin", request).await
}

/// Clears the session server-side. The response also expires the cookie.
///
/// # Errors
///
/// Returns an error for transport failures or non-success statuses.
pub async fn logout(client: &ApiClient) -> Result<(), ApiError> {
    client.post_empty("/auth/logout").await
}

/// Requests a password-reset email.
///
/// # Errors
///
/// Returns an error for transport failures or non-success statuses.
pub async fn forgot_password(
    client: &ApiClient,
    request: &ForgotPasswordRequest,
) -> Result<(), ApiError> {
    client.post_json_discard("/auth/forgot-password", request).await
}

/// Sets a new password using the token from the emailed reset link.
///
/// # Errors
///
/// Returns an error for transport failures or non-success statuses.
pub async fn reset_password(
    client: &ApiClient,
    request: &ResetPasswordRequest,
) -> Result<(), ApiError> {
    client.post_json_discard("/auth/reset-password", request).await
}
