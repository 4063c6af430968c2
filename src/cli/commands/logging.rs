use clap::{Arg, Command, builder::ValueParser};

pub const ARG_VERBOSITY: &str = "verbosity";

#[must_use]
pub fn validator_log_level() -> ValueParser {
    ValueParser::from(move |level: &str| -> std::result::Result<u8, String> {
        if let Ok(parsed) = level.parse::<u8>() {
            // Successfully parsed as a number
            if parsed <= 5 {
                return Ok(parsed);
            }
        }

        match level.to_lowercase().as_str() {
            "error" => Ok(0),
            "warn" => Ok(1),
            "info" => Ok(2),
            "debug" => Ok(3),
            "trace" => Ok(4),
            _ => Err("invalid log level".to_string()),
        }
    })
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command.arg(
        Arg::new(ARG_VERBOSITY)
            .short('v')
            .long("verbose")
            .help("Verbosity level: ERROR, WARN, INFO, DEBUG, TRACE (default: ERROR)")
            .env("MONUJO_LOG_LEVEL")
            .global(true)
            .action(clap::ArgAction::Count)
            .value_parser(validator_log_level()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::ArgAction;

    fn parse(raw: &str) -> Option<u8> {
        Command::new("test")
            .arg(
                Arg::new("level")
                    .long("level")
                    .action(ArgAction::Set)
                    .value_parser(validator_log_level()),
            )
            .try_get_matches_from(vec!["test", "--level", raw])
            .ok()
            .and_then(|matches| matches.get_one::<u8>("level").copied())
    }

    #[test]
    fn named_levels_map_to_counts() {
        for (raw, expected) in [
            ("error", 0),
            ("warn", 1),
            ("info", 2),
            ("DEBUG", 3),
            ("trace", 4),
        ] {
            assert_eq!(parse(raw), Some(expected), "level {raw}");
        }
    }

    #[test]
    fn numeric_levels_capped_at_five() {
        assert_eq!(parse("0"), Some(0));
        assert_eq!(parse("5"), Some(5));
        assert_eq!(parse("6"), None);
        assert_eq!(parse("verbose"), None);
    }
}
