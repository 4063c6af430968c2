//! # Monujo (Financial Dashboard Client)
//!
//! `monujo` is the client side of a session-gated financial dashboard. It
//! walks users through signup, one-time-passcode verification, and sign-in,
//! and keeps every screen's idea of "who is signed in" consistent with the
//! backend's HTTP-only session cookie.
//!
//! ## Session Model
//!
//! The backend is the single source of truth for authentication. The client
//! never inspects the session credential; it asks `GET /auth/me` and caches
//! the answer in a process-wide slot:
//!
//! - **Three-way state:** a session is `Unknown` until probed, then either
//!   `Authenticated` or `Anonymous`. A `401` from the probe is the expected
//!   anonymous answer, not an error, and is never retried.
//! - **Coalescing:** concurrent consumers of the probe share one in-flight
//!   request and receive the same resolved state.
//! - **Gates:** public screens bounce signed-in users to the dashboard,
//!   private screens bounce anonymous users to sign-in, and neither decides
//!   anything while the state is still unknown.
//!
//! ## Registration (Signup -> OTP -> Session)
//!
//! Signup validates locally before anything touches the network, then asks
//! the backend to dispatch a six-digit code. The submitted form is kept as a
//! draft on disk so verification can resume after a restart; it is deleted
//! the moment verification succeeds and kept on any failure so the user can
//! retry.
//!
//! ## Bank Linking
//!
//! Connected accounts live server-side. The client caches reads and, after a
//! connect or disconnect is acknowledged, drops the cache instead of patching
//! it locally so the next read reflects the server.

pub mod api;
pub mod auth;
pub mod bank;
pub mod cli;
pub mod errors;
pub mod session;

mod storage;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        // Should be a hex string (full SHA-1 is 40 chars, but could be short)
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
        assert!(
            GIT_COMMIT_HASH.len() >= 7,
            "GIT_COMMIT_HASH should be at least 7 characters long, got: {GIT_COMMIT_HASH}"
        );
    }

    #[test]
    fn test_app_user_agent_format() {
        assert!(APP_USER_AGENT.starts_with(env!("CARGO_PKG_NAME")));
        assert!(APP_USER_AGENT.contains(env!("CARGO_PKG_VERSION")));
    }
}
