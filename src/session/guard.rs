//! Screen gates. Every screen is wrapped by exactly one gate: public
//! screens bounce signed-in users to the dashboard, private screens bounce
//! anonymous users to sign-in. Neither gate admits anyone while the session
//! state is still unknown.

use super::{SessionState, SessionStore};
use crate::errors::ApiError;

/// Navigable screens and their route paths.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    SignUp,
    VerifyOtp,
    SignIn,
    ForgotPassword,
    ResetPassword,
    Dashboard,
    BankAccounts,
    ConnectBank,
    Balances,
    Transactions,
}

impl Screen {
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::SignUp => "/signup",
            Self::VerifyOtp => "/verify-otp",
            Self::SignIn => "/signin",
            Self::ForgotPassword => "/forgot-password",
            Self::ResetPassword => "/reset-password",
            Self::Dashboard => "/dashboard",
            Self::BankAccounts => "/bank-accounts",
            Self::ConnectBank => "/connect-bank",
            Self::Balances => "/balances",
            Self::Transactions => "/transactions",
        }
    }
}

/// Outcome of evaluating a gate against a session state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateDecision {
    /// Session state not yet resolved; hold the screen back.
    Pending,
    Admit,
    Redirect(Screen),
}

/// Gate for screens that only make sense signed out (sign-up, sign-in,
/// password recovery). A signed-in user is sent to the dashboard instead.
pub struct PublicGate;

impl PublicGate {
    #[must_use]
    pub const fn evaluate(state: &SessionState) -> GateDecision {
        match state {
            SessionState::Unknown => GateDecision::Pending,
            SessionState::Authenticated(_) => GateDecision::Redirect(Screen::Dashboard),
            SessionState::Anonymous => GateDecision::Admit,
        }
    }

    /// Resolve the session first, then decide. Never returns
    /// [`GateDecision::Pending`].
    ///
    /// # Errors
    ///
    /// Propagates the probe's transport failure; no decision is made then.
    pub async fn resolve(store: &SessionStore) -> Result<GateDecision, ApiError> {
        Ok(Self::evaluate(&store.current().await?))
    }
}

/// Gate for screens that require a session (dashboard, bank screens). An
/// anonymous user is sent to sign-in instead.
pub struct PrivateGate;

impl PrivateGate {
    #[must_use]
    pub const fn evaluate(state: &SessionState) -> GateDecision {
        match state {
            SessionState::Unknown => GateDecision::Pending,
            SessionState::Authenticated(_) => GateDecision::Admit,
            SessionState::Anonymous => GateDecision::Redirect(Screen::SignIn),
        }
    }

    /// Resolve the session first, then decide. Never returns
    /// [`GateDecision::Pending`].
    ///
    /// # Errors
    ///
    /// Propagates the probe's transport failure; no decision is made then.
    pub async fn resolve(store: &SessionStore) -> Result<GateDecision, ApiError> {
        Ok(Self::evaluate(&store.current().await?))
    }
}
