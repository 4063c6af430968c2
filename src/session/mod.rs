//! Process-wide session state. Every screen and gate asks the same
//! [`SessionStore`], so they all see one answer to "who is signed in" and
//! concurrent askers share one underlying probe.

pub mod guard;

use crate::api::{self, types::Identity, ApiClient};
use crate::errors::ApiError;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// Answer to "who is signed in", kept deliberately three-way. `Unknown`
/// (not yet probed) never collapses into `Anonymous`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Unknown,
    Authenticated(Identity),
    Anonymous,
}

impl SessionState {
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    #[must_use]
    pub const fn is_anonymous(&self) -> bool {
        matches!(self, Self::Anonymous)
    }

    #[must_use]
    pub const fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }
}

/// Single cache slot over the session probe.
///
/// The first consumer triggers `GET /auth/me`; consumers arriving while that
/// probe is in flight wait on it and read the same resolved state. A `401`
/// resolves to [`SessionState::Anonymous`] and is cached like a success; it
/// is never retried. A transport failure caches nothing, so the next
/// consumer probes again.
pub struct SessionStore {
    client: Arc<ApiClient>,
    cache: Mutex<Option<SessionState>>,
    probe: tokio::sync::Mutex<()>,
}

impl SessionStore {
    #[must_use]
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self {
            client,
            cache: Mutex::new(None),
            probe: tokio::sync::Mutex::new(()),
        }
    }

    fn lock_cache(&self) -> MutexGuard<'_, Option<SessionState>> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn cached(&self) -> Option<SessionState> {
        self.lock_cache().clone()
    }

    /// Resolve the session state, probing the backend at most once per
    /// cached lifetime. Read-only: never redirects, never mutates session
    /// state beyond filling the cache slot.
    ///
    /// # Errors
    ///
    /// Returns transport failures untouched; nothing is cached for them.
    pub async fn current(&self) -> Result<SessionState, ApiError> {
        if let Some(state) = self.cached() {
            return Ok(state);
        }

        let _probe = self.probe.lock().await;

        // A consumer that held the probe lock may have resolved the slot
        // while we waited.
        if let Some(state) = self.cached() {
            return Ok(state);
        }

        let state = match api::auth::current_identity(&self.client).await? {
            Some(identity) => SessionState::Authenticated(identity),
            None => SessionState::Anonymous,
        };

        debug!(state = ?variant_name(&state), "session probe resolved");
        *self.lock_cache() = Some(state.clone());

        Ok(state)
    }

    /// Non-blocking snapshot: `Unknown` until a probe has completed.
    #[must_use]
    pub fn state_now(&self) -> SessionState {
        self.cached().unwrap_or_default()
    }

    /// Drop the cached result so the next consumer asks the backend again.
    /// Called after sign-in, verification, and sign-out are acknowledged.
    pub fn invalidate(&self) {
        *self.lock_cache() = None;
        debug!("session cache invalidated");
    }
}

const fn variant_name(state: &SessionState) -> &'static str {
    match state {
        SessionState::Unknown => "unknown",
        SessionState::Authenticated(_) => "authenticated",
        SessionState::Anonymous => "anonymous",
    }
}
