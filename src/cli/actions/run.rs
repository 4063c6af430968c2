use crate::cli::actions::{Action, auth, bank};
use anyhow::Result;

/// Execute the provided action.
// This is the single dispatch point for all CLI actions.
// To add a new action, add a new `Action::*` variant and a matching handler call here.
/// # Errors
/// Returns an error if the action fails.
pub async fn execute(action: Action) -> Result<()> {
    match action {
        Action::Signup { globals, form } => auth::signup(&globals, form).await,
        Action::Verify { globals, code } => auth::verify(&globals, code).await,
        Action::Signin { globals, form } => auth::signin(&globals, form).await,
        Action::Signout { globals } => auth::signout(&globals).await,
        Action::Whoami { globals } => auth::whoami(&globals).await,
        Action::ForgotPassword { globals, email } => auth::forgot_password(&globals, &email).await,
        Action::ResetPassword {
            globals,
            token,
            new_password,
        } => auth::reset_password(&globals, &token, &new_password).await,
        Action::Dashboard { globals } => bank::dashboard(&globals).await,
        Action::Banks { globals } => bank::banks(&globals).await,
        Action::Connect {
            globals,
            bank,
            payload,
        } => bank::connect(&globals, &bank, payload).await,
        Action::Accounts { globals } => bank::accounts(&globals).await,
        Action::Disconnect {
            globals,
            account_id,
        } => bank::disconnect(&globals, &account_id).await,
        Action::Balances { globals } => bank::balances(&globals).await,
        Action::Transactions { globals, filter } => bank::transactions(&globals, filter).await,
    }
}
