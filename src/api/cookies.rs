//! File-backed cookie jar scoped to the API origin.
//!
//! The session credential only ever exists as an HTTP-only cookie set by the
//! backend. Requests and responses flow through [`reqwest`]'s cookie
//! handling; this jar mirrors the origin's cookies to a file in the state
//! directory so a later invocation still holds the session. No other module
//! reads or represents the credential.

use crate::storage;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::HeaderValue;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use url::Url;

const COOKIES_FILE: &str = "cookies.txt";

pub struct PersistentJar {
    inner: Jar,
    origin: Url,
    path: PathBuf,
}

impl PersistentJar {
    /// Load the jar for `origin`, seeding it from `<state_dir>/cookies.txt`
    /// when a previous run left one behind.
    #[must_use]
    pub fn load(origin: &Url, state_dir: &Path) -> Self {
        let inner = Jar::default();
        let path = state_dir.join(COOKIES_FILE);

        if let Ok(contents) = fs::read_to_string(&path) {
            for line in contents.lines().map(str::trim).filter(|line| !line.is_empty()) {
                inner.add_cookie_str(line, origin);
            }
        }

        Self {
            inner,
            origin: origin.clone(),
            path,
        }
    }

    /// Mirror the jar's view of the origin to disk. An empty jar removes the
    /// file, which is how a served logout clears the stored credential.
    fn persist(&self) {
        match self.inner.cookies(&self.origin) {
            Some(header) => {
                let Ok(cookies) = header.to_str() else {
                    return;
                };
                let mut contents = String::new();
                for cookie in cookies.split("; ") {
                    contents.push_str(cookie);
                    contents.push('\n');
                }
                if let Err(err) = storage::write_private(&self.path, &contents) {
                    debug!("failed to persist cookie jar: {err}");
                }
            }
            None => {
                if self.path.exists() {
                    if let Err(err) = fs::remove_file(&self.path) {
                        debug!("failed to remove cookie jar file: {err}");
                    }
                }
            }
        }
    }
}

impl CookieStore for PersistentJar {
    fn set_cookies(&self, cookie_headers: &mut dyn Iterator<Item = &HeaderValue>, url: &Url) {
        self.inner.set_cookies(cookie_headers, url);
        self.persist();
    }

    fn cookies(&self, url: &Url) -> Option<HeaderValue> {
        self.inner.cookies(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Context, Result};

    fn origin() -> Result<Url> {
        Url::parse("http://api.example.test").context("parsing test origin")
    }

    #[test]
    fn set_cookies_round_trips_through_the_file() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let origin = origin()?;

        {
            let jar = PersistentJar::load(&origin, dir.path());
            let header = HeaderValue::from_static("session=abc123; Path=/; HttpOnly");
            let headers = [header];
            jar.set_cookies(&mut headers.iter(), &origin);
        }

        // A fresh jar over the same state dir sees the session cookie.
        let jar = PersistentJar::load(&origin, dir.path());
        let cookies = jar.cookies(&origin).context("expected stored cookies")?;
        assert!(cookies.to_str()?.contains("session=abc123"));
        Ok(())
    }

    #[test]
    fn cleared_jar_removes_the_file() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let origin = origin()?;
        let jar = PersistentJar::load(&origin, dir.path());

        let header = HeaderValue::from_static("session=abc123; Path=/");
        let headers = [header];
        jar.set_cookies(&mut headers.iter(), &origin);
        let path = dir.path().join(COOKIES_FILE);
        assert!(path.exists());

        // Expiring the cookie, as a logout response does, empties the jar.
        let expired =
            HeaderValue::from_static("session=; Path=/; Max-Age=0; Expires=Thu, 01 Jan 1970 00:00:00 GMT");
        let headers = [expired];
        jar.set_cookies(&mut headers.iter(), &origin);
        assert!(!path.exists());
        Ok(())
    }

    #[test]
    fn missing_file_loads_an_empty_jar() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let origin = origin()?;
        let jar = PersistentJar::load(&origin, dir.path());
        assert!(jar.cookies(&origin).is_none());
        Ok(())
    }
}
