use clap::{Arg, ArgGroup, Command};

pub const CMD_SIGNUP: &str = "signup";
pub const CMD_VERIFY: &str = "verify";
pub const CMD_SIGNIN: &str = "signin";
pub const CMD_SIGNOUT: &str = "signout";
pub const CMD_WHOAMI: &str = "whoami";
pub const CMD_FORGOT_PASSWORD: &str = "forgot-password";
pub const CMD_RESET_PASSWORD: &str = "reset-password";

pub const ARG_FIRSTNAME: &str = "firstname";
pub const ARG_LASTNAME: &str = "lastname";
pub const ARG_EMAIL: &str = "email";
pub const ARG_PASSWORD: &str = "password";
pub const ARG_CONFIRM_PASSWORD: &str = "confirm-password";
pub const ARG_CODE: &str = "code";
pub const ARG_TOKEN: &str = "token";
pub const ARG_LINK: &str = "link";

#[must_use]
pub fn with_subcommands(command: Command) -> Command {
    command
        .subcommand(
            Command::new(CMD_SIGNUP)
                .about("Create an account and start verification")
                .arg(
                    Arg::new(ARG_FIRSTNAME)
                        .long("firstname")
                        .help("First name")
                        .required(true),
                )
                .arg(
                    Arg::new(ARG_LASTNAME)
                        .long("lastname")
                        .help("Last name")
                        .required(true),
                )
                .arg(
                    Arg::new(ARG_EMAIL)
                        .long("email")
                        .help("Email address")
                        .required(true),
                )
                .arg(
                    Arg::new(ARG_PASSWORD)
                        .long("password")
                        .help("Password, at least 8 characters")
                        .env("MONUJO_PASSWORD")
                        .required(true),
                )
                .arg(
                    Arg::new(ARG_CONFIRM_PASSWORD)
                        .long("confirm-password")
                        .help("Password confirmation")
                        .env("MONUJO_CONFIRM_PASSWORD")
                        .required(true),
                ),
        )
        .subcommand(
            Command::new(CMD_VERIFY)
                .about("Enter the verification code for a pending registration")
                .arg(
                    Arg::new(ARG_CODE)
                        .long("code")
                        .help("Six-digit code; omit to enter it interactively"),
                ),
        )
        .subcommand(
            Command::new(CMD_SIGNIN)
                .about("Sign in with an existing account")
                .arg(
                    Arg::new(ARG_EMAIL)
                        .long("email")
                        .help("Email address")
                        .required(true),
                )
                .arg(
                    Arg::new(ARG_PASSWORD)
                        .long("password")
                        .help("Account password")
                        .env("MONUJO_PASSWORD")
                        .required(true),
                ),
        )
        .subcommand(Command::new(CMD_SIGNOUT).about("End the current session"))
        .subcommand(Command::new(CMD_WHOAMI).about("Show who is signed in"))
        .subcommand(
            Command::new(CMD_FORGOT_PASSWORD)
                .about("Request a password-reset email")
                .arg(
                    Arg::new(ARG_EMAIL)
                        .long("email")
                        .help("Email address")
                        .required(true),
                ),
        )
        .subcommand(
            Command::new(CMD_RESET_PASSWORD)
                .about("Set a new password with a reset token")
                .arg(
                    Arg::new(ARG_TOKEN)
                        .long("token")
                        .help("Reset token from the email"),
                )
                .arg(
                    Arg::new(ARG_LINK)
                        .long("link")
                        .help("Full reset link from the email; the token is extracted from it")
                        .conflicts_with(ARG_TOKEN),
                )
                .arg(
                    Arg::new(ARG_PASSWORD)
                        .long("password")
                        .help("New password, at least 8 characters")
                        .env("MONUJO_PASSWORD")
                        .required(true),
                )
                .group(
                    ArgGroup::new("reset-source")
                        .args([ARG_TOKEN, ARG_LINK])
                        .required(true),
                ),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signup_requires_all_fields() {
        let command = with_subcommands(Command::new("monujo"));
        let result = command.try_get_matches_from(vec![
            "monujo", "signup", "--firstname", "Ada", "--lastname", "Lovelace",
        ]);
        assert_eq!(
            result.map_err(|e| e.kind()),
            Err(clap::error::ErrorKind::MissingRequiredArgument)
        );
    }

    #[test]
    fn reset_password_needs_token_or_link() {
        let command = with_subcommands(Command::new("monujo"));
        let result = command.try_get_matches_from(vec![
            "monujo",
            "reset-password",
            "--password",
            "hunter2hunter2",
        ]);
        assert_eq!(
            result.map_err(|e| e.kind()),
            Err(clap::error::ErrorKind::MissingRequiredArgument)
        );
    }

    #[test]
    fn reset_password_token_conflicts_with_link() {
        let command = with_subcommands(Command::new("monujo"));
        let result = command.try_get_matches_from(vec![
            "monujo",
            "reset-password",
            "--token",
            "abc",
            "--link",
            "https://app.example.com/reset-password?token=abc",
            "--password",
            "hunter2hunter2",
        ]);
        assert_eq!(
            result.map_err(|e| e.kind()),
            Err(clap::error::ErrorKind::ArgumentConflict)
        );
    }

    #[test]
    fn verify_code_is_optional() {
        let command = with_subcommands(Command::new("monujo"));
        let matches = command.get_matches_from(vec!["monujo", "verify"]);
        let (name, sub) = matches.subcommand().expect("subcommand");
        assert_eq!(name, CMD_VERIFY);
        assert_eq!(sub.get_one::<String>(ARG_CODE), None);
    }
}
