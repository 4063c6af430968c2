use crate::api::types::TransactionFilter;
use crate::auth::{self, SigninForm, SignupForm};
use crate::bank::ConnectionPayload;
use crate::cli::{
    actions::Action,
    commands::{self, auth as auth_cmd, bank as bank_cmd},
    globals::GlobalArgs,
};
use anyhow::{Context, Result};
use secrecy::SecretString;
use std::path::PathBuf;
use std::time::Duration;

/// Turn parsed arguments into the action the binary will execute.
///
/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let globals = global_args(matches)?;

    let Some((name, sub)) = matches.subcommand() else {
        anyhow::bail!("missing subcommand");
    };

    let action = match name {
        auth_cmd::CMD_SIGNUP => Action::Signup {
            globals,
            form: SignupForm {
                firstname: required(sub, auth_cmd::ARG_FIRSTNAME)?,
                lastname: required(sub, auth_cmd::ARG_LASTNAME)?,
                email: required(sub, auth_cmd::ARG_EMAIL)?,
                password: SecretString::from(required(sub, auth_cmd::ARG_PASSWORD)?),
                confirm_password: SecretString::from(required(
                    sub,
                    auth_cmd::ARG_CONFIRM_PASSWORD,
                )?),
            },
        },
        auth_cmd::CMD_VERIFY => Action::Verify {
            globals,
            code: sub.get_one::<String>(auth_cmd::ARG_CODE).cloned(),
        },
        auth_cmd::CMD_SIGNIN => Action::Signin {
            globals,
            form: SigninForm {
                email: required(sub, auth_cmd::ARG_EMAIL)?,
                password: SecretString::from(required(sub, auth_cmd::ARG_PASSWORD)?),
            },
        },
        auth_cmd::CMD_SIGNOUT => Action::Signout { globals },
        auth_cmd::CMD_WHOAMI => Action::Whoami { globals },
        auth_cmd::CMD_FORGOT_PASSWORD => Action::ForgotPassword {
            globals,
            email: required(sub, auth_cmd::ARG_EMAIL)?,
        },
        auth_cmd::CMD_RESET_PASSWORD => Action::ResetPassword {
            globals,
            token: reset_token(sub)?,
            new_password: SecretString::from(required(sub, auth_cmd::ARG_PASSWORD)?),
        },
        bank_cmd::CMD_DASHBOARD => Action::Dashboard { globals },
        bank_cmd::CMD_BANKS => Action::Banks { globals },
        bank_cmd::CMD_CONNECT => Action::Connect {
            globals,
            bank: required(sub, bank_cmd::ARG_BANK)?,
            payload: ConnectionPayload::parse(&required(sub, bank_cmd::ARG_PAYLOAD)?)
                .map_err(|err| anyhow::anyhow!(err))?,
        },
        bank_cmd::CMD_ACCOUNTS => Action::Accounts { globals },
        bank_cmd::CMD_DISCONNECT => Action::Disconnect {
            globals,
            account_id: required(sub, bank_cmd::ARG_ACCOUNT_ID)?,
        },
        bank_cmd::CMD_BALANCES => Action::Balances { globals },
        bank_cmd::CMD_TRANSACTIONS => Action::Transactions {
            globals,
            filter: TransactionFilter {
                category: sub.get_one::<String>(bank_cmd::ARG_CATEGORY).cloned(),
                start_date: sub.get_one::<String>(bank_cmd::ARG_START_DATE).cloned(),
                end_date: sub.get_one::<String>(bank_cmd::ARG_END_DATE).cloned(),
            },
        },
        other => anyhow::bail!("unknown subcommand: {other}"),
    };

    Ok(action)
}

fn global_args(matches: &clap::ArgMatches) -> Result<GlobalArgs> {
    let api_url = matches
        .get_one::<String>(commands::ARG_API_URL)
        .cloned()
        .context("missing required argument: --api-url")?;
    let state_dir = matches
        .get_one::<String>(commands::ARG_STATE_DIR)
        .map(PathBuf::from)
        .context("missing required argument: --state-dir")?;
    let timeout = matches
        .get_one::<u64>(commands::ARG_TIMEOUT)
        .copied()
        .context("missing required argument: --timeout")?;

    Ok(GlobalArgs::new(
        api_url,
        state_dir,
        Duration::from_secs(timeout),
    ))
}

fn required(matches: &clap::ArgMatches, name: &str) -> Result<String> {
    matches
        .get_one::<String>(name)
        .cloned()
        .with_context(|| format!("missing required argument: --{name}"))
}

fn reset_token(matches: &clap::ArgMatches) -> Result<String> {
    if let Some(token) = matches.get_one::<String>(auth_cmd::ARG_TOKEN) {
        return Ok(token.clone());
    }
    let link = required(matches, auth_cmd::ARG_LINK)?;
    auth::reset_token_from_link(&link)
        .with_context(|| format!("no reset token found in the link: {link}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands;

    fn dispatch(args: &[&str]) -> Result<Action> {
        let matches = commands::new().try_get_matches_from(args)?;
        handler(&matches)
    }

    #[test]
    fn signup_builds_a_redacted_form() -> Result<()> {
        let action = dispatch(&[
            "monujo",
            "--state-dir",
            "/tmp/monujo-test",
            "signup",
            "--firstname",
            "Ada",
            "--lastname",
            "Lovelace",
            "--email",
            "ada@example.com",
            "--password",
            "hunter2hunter2",
            "--confirm-password",
            "hunter2hunter2",
        ])?;

        let rendered = format!("{action:?}");
        assert!(rendered.contains("ada@example.com"));
        assert!(!rendered.contains("hunter2hunter2"));
        assert!(matches!(action, Action::Signup { .. }));
        Ok(())
    }

    #[test]
    fn transactions_build_a_filter() -> Result<()> {
        let action = dispatch(&[
            "monujo",
            "--state-dir",
            "/tmp/monujo-test",
            "transactions",
            "--category",
            "groceries",
            "--start-date",
            "2025-01-01",
        ])?;

        match action {
            Action::Transactions { filter, .. } => {
                assert_eq!(filter.category.as_deref(), Some("groceries"));
                assert_eq!(filter.start_date.as_deref(), Some("2025-01-01"));
                assert_eq!(filter.end_date, None);
            }
            other => panic!("expected Transactions, got {other:?}"),
        }
        Ok(())
    }

    #[test]
    fn reset_password_accepts_a_link() -> Result<()> {
        let action = dispatch(&[
            "monujo",
            "--state-dir",
            "/tmp/monujo-test",
            "reset-password",
            "--link",
            "https://app.example.com/reset-password?token=abc123",
            "--password",
            "hunter2hunter2",
        ])?;

        match action {
            Action::ResetPassword { token, .. } => assert_eq!(token, "abc123"),
            other => panic!("expected ResetPassword, got {other:?}"),
        }
        Ok(())
    }

    #[test]
    fn reset_password_rejects_a_tokenless_link() {
        let result = dispatch(&[
            "monujo",
            "--state-dir",
            "/tmp/monujo-test",
            "reset-password",
            "--link",
            "https://app.example.com/reset-password",
            "--password",
            "hunter2hunter2",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn connect_rejects_a_non_object_payload() {
        let result = dispatch(&[
            "monujo",
            "--state-dir",
            "/tmp/monujo-test",
            "connect",
            "--bank",
            "First Bank",
            "--payload",
            "[1,2,3]",
        ]);
        assert!(result.is_err());
    }
}
