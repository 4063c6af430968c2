pub mod auth;
pub mod bank;
pub mod logging;

use clap::{
    Arg, ColorChoice, Command,
    builder::styling::{AnsiColor, Effects, Styles},
};

pub const ARG_API_URL: &str = "api-url";
pub const ARG_STATE_DIR: &str = "state-dir";
pub const ARG_TIMEOUT: &str = "timeout";

const DEFAULT_API_URL: &str = "http://localhost:3000";

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let long_version: &'static str = Box::leak(
        format!("{} - {}", env!("CARGO_PKG_VERSION"), crate::GIT_COMMIT_HASH).into_boxed_str(),
    );

    let mut state_dir = Arg::new(ARG_STATE_DIR)
        .long("state-dir")
        .help("Directory for the session cookie and the registration draft")
        .env("MONUJO_STATE_DIR")
        .global(true);
    if let Some(dir) = crate::storage::default_state_dir() {
        let default: &'static str =
            Box::leak(dir.to_string_lossy().into_owned().into_boxed_str());
        state_dir = state_dir.default_value(default);
    }

    let command = Command::new("monujo")
        .about("Financial dashboard client")
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new(ARG_API_URL)
                .long("api-url")
                .help("Dashboard API base URL")
                .env("MONUJO_API_URL")
                .default_value(DEFAULT_API_URL)
                .global(true),
        )
        .arg(state_dir)
        .arg(
            Arg::new(ARG_TIMEOUT)
                .long("timeout")
                .help("Request timeout in seconds")
                .env("MONUJO_TIMEOUT")
                .default_value("10")
                .global(true)
                .value_parser(clap::value_parser!(u64)),
        );

    let command = auth::with_subcommands(command);
    let command = bank::with_subcommands(command);
    logging::with_args(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let command = new();

        assert_eq!(command.get_name(), "monujo");
        assert_eq!(
            command.get_about().map(ToString::to_string),
            Some("Financial dashboard client".to_string())
        );
        assert_eq!(
            command.get_version().map(ToString::to_string),
            Some(env!("CARGO_PKG_VERSION").to_string())
        );
    }

    #[test]
    fn test_requires_a_subcommand() {
        let command = new();
        let result = command.try_get_matches_from(vec!["monujo"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_globals_after_subcommand() {
        let command = new();
        let matches = command.get_matches_from(vec![
            "monujo",
            "whoami",
            "--api-url",
            "https://dashboard.example.com",
            "--state-dir",
            "/tmp/monujo-test",
            "--timeout",
            "5",
        ]);

        assert_eq!(
            matches.get_one::<String>(ARG_API_URL).cloned(),
            Some("https://dashboard.example.com".to_string())
        );
        assert_eq!(
            matches.get_one::<String>(ARG_STATE_DIR).cloned(),
            Some("/tmp/monujo-test".to_string())
        );
        assert_eq!(matches.get_one::<u64>(ARG_TIMEOUT).copied(), Some(5));
        assert_eq!(matches.subcommand_name(), Some(auth::CMD_WHOAMI));
    }

    #[test]
    fn test_check_env() {
        temp_env::with_vars(
            [
                ("MONUJO_API_URL", Some("https://dashboard.example.com")),
                ("MONUJO_STATE_DIR", Some("/tmp/monujo-env")),
                ("MONUJO_TIMEOUT", Some("30")),
                ("MONUJO_LOG_LEVEL", Some("info")),
            ],
            || {
                let command = new();
                let matches = command.get_matches_from(vec!["monujo", "whoami"]);
                assert_eq!(
                    matches.get_one::<String>(ARG_API_URL).cloned(),
                    Some("https://dashboard.example.com".to_string())
                );
                assert_eq!(
                    matches.get_one::<String>(ARG_STATE_DIR).cloned(),
                    Some("/tmp/monujo-env".to_string())
                );
                assert_eq!(matches.get_one::<u64>(ARG_TIMEOUT).copied(), Some(30));
                assert_eq!(
                    matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                    Some(2)
                );
            },
        );
    }

    #[test]
    fn test_check_log_level_env() {
        // loop cover all possible value_parse
        let levels = ["error", "warn", "info", "debug", "trace"];
        for (index, &level) in levels.iter().enumerate() {
            temp_env::with_vars([("MONUJO_LOG_LEVEL", Some(level))], || {
                let command = new();
                let matches = command.get_matches_from(vec!["monujo", "whoami"]);
                assert_eq!(
                    matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                    u8::try_from(index).ok()
                );
            });
        }
    }

    #[test]
    fn test_check_log_level_verbosity() {
        // loop cover all possible value_parse
        let levels = ["error", "warn", "info", "debug", "trace"];
        for (index, _) in levels.iter().enumerate() {
            temp_env::with_vars([("MONUJO_LOG_LEVEL", None::<String>)], || {
                let mut args = vec!["monujo".to_string(), "whoami".to_string()];

                // Add the appropriate number of "-v" flags based on the index
                if index > 0 {
                    let v = format!("-{}", "v".repeat(index));
                    args.push(v);
                }

                let command = new();

                let matches = command.get_matches_from(args);

                assert_eq!(
                    matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                    u8::try_from(index).ok()
                );
            });
        }
    }

    #[test]
    fn test_unknown_argument_rejected() {
        let command = new();
        let result = command.try_get_matches_from(vec!["monujo", "whoami", "--port", "8080"]);
        assert_eq!(
            result.map_err(|e| e.kind()),
            Err(clap::error::ErrorKind::UnknownArgument)
        );
    }
}
