use std::path::PathBuf;
use std::time::Duration;

/// Connection settings shared by every subcommand.
#[derive(Debug, Clone)]
pub struct GlobalArgs {
    pub api_url: String,
    pub state_dir: PathBuf,
    pub timeout: Duration,
}

impl GlobalArgs {
    #[must_use]
    pub const fn new(api_url: String, state_dir: PathBuf, timeout: Duration) -> Self {
        Self {
            api_url,
            state_dir,
            timeout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_args() {
        let args = GlobalArgs::new(
            "http://localhost:3000".to_string(),
            PathBuf::from("/tmp/monujo"),
            Duration::from_secs(10),
        );
        assert_eq!(args.api_url, "http://localhost:3000");
        assert_eq!(args.state_dir, PathBuf::from("/tmp/monujo"));
        assert_eq!(args.timeout, Duration::from_secs(10));
    }
}
