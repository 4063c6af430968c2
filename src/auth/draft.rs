//! Registration draft persistence. The sign-up payload is kept on disk
//! between the sign-up screen and the verification screen so a resend can
//! re-dispatch the identical request, and so verification survives a
//! process restart.

use crate::storage;
use anyhow::{Context, Result};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

const DRAFT_FILE: &str = "registration.json";

/// Validated sign-up payload awaiting verification. Consumed verbatim by
/// OTP verification and resend, never edited after sign-up succeeds.
#[derive(Clone)]
pub struct RegistrationDraft {
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub password: SecretString,
}

impl fmt::Debug for RegistrationDraft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationDraft")
            .field("firstname", &self.firstname)
            .field("lastname", &self.lastname)
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

/// On-disk shape of the draft. Kept separate from [`RegistrationDraft`] so
/// the secret wrapper never picks up serde derives.
#[derive(Serialize, Deserialize)]
struct DraftRecord {
    firstname: String,
    lastname: String,
    email: String,
    password: String,
}

/// Single-slot draft store under the state directory. At most one
/// registration is in flight per state directory.
pub struct DraftStore {
    path: PathBuf,
}

impl DraftStore {
    #[must_use]
    pub fn new(state_dir: &Path) -> Self {
        Self {
            path: state_dir.join(DRAFT_FILE),
        }
    }

    /// Persist the draft, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error when serialization or the write fails.
    pub fn save(&self, draft: &RegistrationDraft) -> Result<()> {
        let record = DraftRecord {
            firstname: draft.firstname.clone(),
            lastname: draft.lastname.clone(),
            email: draft.email.clone(),
            password: draft.password.expose_secret().to_string(),
        };
        let json = serde_json::to_string(&record).context("failed to serialize draft")?;
        storage::write_private(&self.path, &json)
            .with_context(|| format!("failed to write draft to {}", self.path.display()))?;
        debug!(path = %self.path.display(), "registration draft saved");
        Ok(())
    }

    /// Load the pending draft, `None` when no registration is in flight.
    ///
    /// # Errors
    ///
    /// Returns an error when the file exists but cannot be read or parsed.
    pub fn load(&self) -> Result<Option<RegistrationDraft>> {
        let json = match std::fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(err).with_context(|| {
                    format!("failed to read draft from {}", self.path.display())
                });
            }
        };
        let record: DraftRecord = serde_json::from_str(&json)
            .with_context(|| format!("corrupt draft at {}", self.path.display()))?;
        Ok(Some(RegistrationDraft {
            firstname: record.firstname,
            lastname: record.lastname,
            email: record.email,
            password: SecretString::from(record.password),
        }))
    }

    /// Remove the draft. Missing file counts as cleared.
    ///
    /// # Errors
    ///
    /// Returns an error when the file exists but cannot be removed.
    pub fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "registration draft cleared");
                Ok(())
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err)
                .with_context(|| format!("failed to clear draft at {}", self.path.display())),
        }
    }
}
