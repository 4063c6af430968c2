pub mod auth;
pub mod bank;

// Internal "interpreter" for `Action`.
// We keep the match in a separate module so `mod.rs` stays small as more actions are added.
mod run;

use crate::api::ApiClient;
use crate::api::types::{Identity, TransactionFilter};
use crate::auth::{AuthFlow, SigninForm, SignupForm};
use crate::bank::{BankWorkflow, ConnectionPayload};
use crate::cli::globals::GlobalArgs;
use crate::session::guard::{GateDecision, PrivateGate, PublicGate};
use crate::session::{SessionState, SessionStore};
use anyhow::Result;
use secrecy::SecretString;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug)]
pub enum Action {
    Signup {
        globals: GlobalArgs,
        form: SignupForm,
    },
    Verify {
        globals: GlobalArgs,
        code: Option<String>,
    },
    Signin {
        globals: GlobalArgs,
        form: SigninForm,
    },
    Signout {
        globals: GlobalArgs,
    },
    Whoami {
        globals: GlobalArgs,
    },
    ForgotPassword {
        globals: GlobalArgs,
        email: String,
    },
    ResetPassword {
        globals: GlobalArgs,
        token: String,
        new_password: SecretString,
    },
    Dashboard {
        globals: GlobalArgs,
    },
    Banks {
        globals: GlobalArgs,
    },
    Connect {
        globals: GlobalArgs,
        bank: String,
        payload: ConnectionPayload,
    },
    Accounts {
        globals: GlobalArgs,
    },
    Disconnect {
        globals: GlobalArgs,
        account_id: String,
    },
    Balances {
        globals: GlobalArgs,
    },
    Transactions {
        globals: GlobalArgs,
        filter: TransactionFilter,
    },
}

impl Action {
    // Convenience wrapper so call sites can do `action.execute().await`.
    // When adding new actions, extend the match in `run::execute`.
    /// Execute the action.
    /// # Errors
    /// Returns an error if the action fails.
    pub async fn execute(self) -> anyhow::Result<()> {
        run::execute(self).await
    }
}

/// Wiring shared by every action: one client, one session store, and the
/// flows built on them.
pub(super) struct AppContext {
    pub client: Arc<ApiClient>,
    pub session: Arc<SessionStore>,
    state_dir: PathBuf,
}

impl AppContext {
    pub fn build(globals: &GlobalArgs) -> Result<Self> {
        let client = Arc::new(ApiClient::new(
            &globals.api_url,
            &globals.state_dir,
            globals.timeout,
        )?);
        let session = Arc::new(SessionStore::new(Arc::clone(&client)));
        Ok(Self {
            client,
            session,
            state_dir: globals.state_dir.clone(),
        })
    }

    pub fn auth_flow(&self) -> AuthFlow {
        AuthFlow::new(
            Arc::clone(&self.client),
            Arc::clone(&self.session),
            &self.state_dir,
        )
    }

    pub fn bank(&self) -> BankWorkflow {
        BankWorkflow::new(Arc::clone(&self.client))
    }
}

/// Gate for signed-out screens. Prints where to continue when the screen is
/// not for this user.
pub(super) async fn admit_public(session: &SessionStore) -> Result<bool> {
    let state = session.current().await?;
    match PublicGate::evaluate(&state) {
        GateDecision::Admit => Ok(true),
        GateDecision::Redirect(screen) => {
            println!("Already signed in. Continue at {}.", screen.path());
            Ok(false)
        }
        // `current` always resolves, so the gate never reports Pending here.
        GateDecision::Pending => Ok(false),
    }
}

/// Gate for signed-in screens. Returns the identity when admitted.
pub(super) async fn admit_private(session: &SessionStore) -> Result<Option<Identity>> {
    let state = session.current().await?;
    match PrivateGate::evaluate(&state) {
        GateDecision::Admit => {}
        GateDecision::Redirect(screen) => {
            println!("You are not signed in. Continue at {}.", screen.path());
            return Ok(None);
        }
        // `current` always resolves, so the gate never reports Pending here.
        GateDecision::Pending => return Ok(None),
    }
    let SessionState::Authenticated(identity) = state else {
        return Ok(None);
    };
    Ok(Some(identity))
}
