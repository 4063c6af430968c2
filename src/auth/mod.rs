//! Registration, verification, and sign-in flows.
//!
//! Every flow validates locally first; nothing leaves the process while a
//! field is invalid. Mutations that change who is signed in invalidate the
//! session cache only after the backend acknowledged them.

pub mod draft;
pub mod otp;
pub mod validate;

use crate::api::{
    self,
    types::{
        ForgotPasswordRequest, Identity, ResetPasswordRequest, SigninRequest, SignupRequest,
        VerifyOtpRequest,
    },
    ApiClient,
};
use crate::errors::{FlowError, ValidationError};
use crate::session::SessionStore;
use draft::{DraftStore, RegistrationDraft};
use otp::{OtpCode, OtpTimer};
use secrecy::{ExposeSecret, SecretString};
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, instrument, warn};
use url::Url;

/// Shown when the backend rejects a signup without saying why.
const SIGNUP_REJECTED_FALLBACK: &str = "Signup failed.";

/// Raw sign-up screen input, validated as one unit by [`SignupForm::validate`].
#[derive(Clone)]
pub struct SignupForm {
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub password: SecretString,
    pub confirm_password: SecretString,
}

impl fmt::Debug for SignupForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignupForm")
            .field("firstname", &self.firstname)
            .field("lastname", &self.lastname)
            .field("email", &self.email)
            .field("password", &"***")
            .field("confirm_password", &"***")
            .finish()
    }
}

impl SignupForm {
    /// Validate every field, in screen order, and produce the draft that
    /// the rest of the registration flow consumes.
    ///
    /// # Errors
    ///
    /// Returns the first failing field with its screen message.
    pub fn validate(self) -> Result<RegistrationDraft, ValidationError> {
        let firstname = validate::require_name("firstname", &self.firstname, "First name is required")?;
        let lastname = validate::require_name("lastname", &self.lastname, "Last name is required")?;
        let email = validate::require_email(&self.email)?;
        validate::require_password(
            "password",
            &self.password,
            "Password must be at least 8 characters",
        )?;
        validate::require_password(
            "confirmPassword",
            &self.confirm_password,
            "Confirm password must be at least 8 characters",
        )?;
        validate::require_match(&self.password, &self.confirm_password)?;

        Ok(RegistrationDraft {
            firstname,
            lastname,
            email,
            password: self.password,
        })
    }
}

/// Raw sign-in screen input.
#[derive(Clone)]
pub struct SigninForm {
    pub email: String,
    pub password: SecretString,
}

impl fmt::Debug for SigninForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigninForm")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

impl SigninForm {
    /// Validate and return the normalized email.
    ///
    /// # Errors
    ///
    /// Returns the first failing field with its screen message.
    pub fn validate(&self) -> Result<String, ValidationError> {
        let email = validate::require_email(&self.email)?;
        validate::require_password(
            "password",
            &self.password,
            "Password must be at least 8 characters",
        )?;
        Ok(email)
    }
}

/// Orchestrates the auth flows against one backend and one session store.
pub struct AuthFlow {
    client: Arc<ApiClient>,
    session: Arc<SessionStore>,
    drafts: DraftStore,
}

impl AuthFlow {
    #[must_use]
    pub fn new(client: Arc<ApiClient>, session: Arc<SessionStore>, state_dir: &Path) -> Self {
        Self {
            client,
            session,
            drafts: DraftStore::new(state_dir),
        }
    }

    /// Submit the sign-up form. On acceptance the draft is persisted for the
    /// verification screen and returned. A rejected signup saves nothing;
    /// the flow is over until the user edits the form and resubmits.
    ///
    /// # Errors
    ///
    /// [`FlowError::Validation`] before any request, [`FlowError::Rejected`]
    /// when the backend says no, [`FlowError::Storage`] when the accepted
    /// draft cannot be persisted.
    #[instrument(skip(self, form))]
    pub async fn submit_signup(&self, form: SignupForm) -> Result<RegistrationDraft, FlowError> {
        let draft = form.validate()?;
        let receipt = api::auth::signup(&self.client, &signup_request(&draft))
            .await
            .map_err(FlowError::from_api)?;
        if !receipt.success {
            return Err(FlowError::Rejected(
                receipt
                    .message
                    .unwrap_or_else(|| SIGNUP_REJECTED_FALLBACK.to_string()),
            ));
        }
        self.drafts
            .save(&draft)
            .map_err(|err| FlowError::Storage(err.to_string()))?;
        debug!(email = %draft.email, "signup accepted, awaiting verification");
        Ok(draft)
    }

    /// Load the pending registration for the verification screen.
    ///
    /// # Errors
    ///
    /// [`FlowError::MissingDraft`] when no registration is in flight; the
    /// caller sends the user back to sign-up.
    pub fn resume_verification(&self) -> Result<RegistrationDraft, FlowError> {
        match self.drafts.load() {
            Ok(Some(draft)) => Ok(draft),
            Ok(None) => Err(FlowError::MissingDraft),
            Err(err) => Err(FlowError::Storage(err.to_string())),
        }
    }

    /// Submit a complete verification code alongside the stored draft.
    ///
    /// On success the draft is cleared and the session cache invalidated so
    /// the next gate check observes the new session. On rejection the draft
    /// stays put; the user may retry or resend.
    ///
    /// # Errors
    ///
    /// [`FlowError::Rejected`] with the backend's message for a wrong or
    /// expired code, [`FlowError::Api`] for transport failures.
    #[instrument(skip(self, draft, code))]
    pub async fn submit_otp(
        &self,
        draft: &RegistrationDraft,
        code: &OtpCode,
    ) -> Result<Identity, FlowError> {
        let request = VerifyOtpRequest {
            firstname: draft.firstname.clone(),
            lastname: draft.lastname.clone(),
            email: draft.email.clone(),
            password: draft.password.expose_secret().to_string(),
            otp: code.as_str().to_string(),
        };
        let identity = api::auth::verify_otp(&self.client, &request)
            .await
            .map_err(FlowError::from_api)?;

        // The session is established at this point; a draft that refuses to
        // go away must not undo that.
        if let Err(err) = self.drafts.clear() {
            warn!(error = %err, "verified but could not clear the registration draft");
        }
        self.session.invalidate();
        Ok(identity)
    }

    /// Re-dispatch the stored registration so the backend issues a fresh
    /// code. While the cooldown is running this is a no-op returning
    /// `Ok(false)`; once dispatched the timer restarts and `Ok(true)` is
    /// returned.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`AuthFlow::submit_signup`]; the draft is never
    /// touched.
    #[instrument(skip(self, draft, timer))]
    pub async fn resend_code(
        &self,
        draft: &RegistrationDraft,
        timer: &mut OtpTimer,
    ) -> Result<bool, FlowError> {
        if !timer.can_resend() {
            debug!(remaining = timer.seconds_remaining(), "resend still locked");
            return Ok(false);
        }
        let receipt = api::auth::signup(&self.client, &signup_request(draft))
            .await
            .map_err(FlowError::from_api)?;
        if !receipt.success {
            return Err(FlowError::Rejected(
                receipt
                    .message
                    .unwrap_or_else(|| SIGNUP_REJECTED_FALLBACK.to_string()),
            ));
        }
        timer.try_rearm();
        debug!(email = %draft.email, "verification code re-dispatched");
        Ok(true)
    }

    /// Sign in with an existing account. Invalidates the session cache only
    /// after the backend accepted the credentials.
    ///
    /// # Errors
    ///
    /// [`FlowError::Validation`] before any request, [`FlowError::Rejected`]
    /// with the server's message for refused credentials.
    #[instrument(skip(self, form))]
    pub async fn sign_in(&self, form: SigninForm) -> Result<Identity, FlowError> {
        let email = form.validate()?;
        let request = SigninRequest {
            email,
            password: form.password.expose_secret().to_string(),
        };
        let identity = api::auth::signin(&self.client, &request)
            .await
            .map_err(FlowError::from_api)?;
        self.session.invalidate();
        Ok(identity)
    }

    /// End the session. The cache is invalidated only after the backend
    /// acknowledged the logout.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::Api`] when the backend did not acknowledge; the
    /// cached session state is left as it was.
    #[instrument(skip(self))]
    pub async fn sign_out(&self) -> Result<(), FlowError> {
        api::auth::logout(&self.client)
            .await
            .map_err(FlowError::Api)?;
        self.session.invalidate();
        Ok(())
    }

    /// Request a password-reset email.
    ///
    /// # Errors
    ///
    /// [`FlowError::Validation`] for a malformed email before any request.
    #[instrument(skip(self))]
    pub async fn forgot_password(&self, email: &str) -> Result<(), FlowError> {
        let email = validate::require_email(email)?;
        api::auth::forgot_password(&self.client, &ForgotPasswordRequest { email })
            .await
            .map_err(FlowError::from_api)?;
        Ok(())
    }

    /// Redeem a reset token for a new password.
    ///
    /// # Errors
    ///
    /// [`FlowError::Validation`] for a blank token or short password,
    /// [`FlowError::Rejected`] when the backend refuses the token.
    #[instrument(skip(self, token, new_password))]
    pub async fn reset_password(
        &self,
        token: &str,
        new_password: &SecretString,
    ) -> Result<(), FlowError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(ValidationError::new("resetToken", "Reset token is required").into());
        }
        validate::require_password(
            "newPassword",
            new_password,
            "New password must be at least 8 characters",
        )?;
        let request = ResetPasswordRequest {
            reset_token: token.to_string(),
            new_password: new_password.expose_secret().to_string(),
        };
        api::auth::reset_password(&self.client, &request)
            .await
            .map_err(FlowError::from_api)?;
        Ok(())
    }
}

fn signup_request(draft: &RegistrationDraft) -> SignupRequest {
    SignupRequest {
        firstname: draft.firstname.clone(),
        lastname: draft.lastname.clone(),
        email: draft.email.clone(),
        password: draft.password.expose_secret().to_string(),
    }
}

/// Pull the reset token out of an emailed reset link. The link carries it
/// as the `token` query parameter.
#[must_use]
pub fn reset_token_from_link(link: &str) -> Option<String> {
    let url = Url::parse(link).ok()?;
    let token = url
        .query_pairs()
        .find_map(|(key, value)| (key == "token").then(|| value.into_owned()))?;
    let token = token.trim().to_string();
    (!token.is_empty()).then_some(token)
}
