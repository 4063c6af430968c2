//! State-directory helpers. The client keeps two files under its state
//! directory: the registration draft and the transport's cookie snapshot.
//! Both carry credentials, so everything written here is owner-readable only.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Write `contents` to `path`, creating parent directories and restricting
/// the file to the owner.
pub(crate) fn write_private(path: &Path, contents: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    }

    Ok(())
}

/// Default state directory: `$XDG_STATE_HOME/monujo`, falling back to
/// `~/.local/state/monujo`. `None` when neither variable is available.
#[must_use]
pub fn default_state_dir() -> Option<PathBuf> {
    if let Some(state_home) = std::env::var_os("XDG_STATE_HOME") {
        if !state_home.is_empty() {
            return Some(PathBuf::from(state_home).join("monujo"));
        }
    }

    std::env::var_os("HOME")
        .filter(|home| !home.is_empty())
        .map(|home| PathBuf::from(home).join(".local/state/monujo"))
}
