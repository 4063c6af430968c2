//! Bank linking: list institutions, connect and disconnect accounts, and
//! read balances and transactions.
//!
//! The provider list and the balance listing are cached per workflow.
//! Connect and disconnect drop the balance cache strictly after the backend
//! acknowledged the mutation, so the next read reflects it. Transactions
//! are never cached; a listing always queries with its filter.

use crate::api::{
    self,
    types::{BankConnection, ConnectRequest, DisconnectRequest, Provider, Transaction,
        TransactionFilter},
    ApiClient,
};
use crate::errors::{FlowError, ValidationError};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, instrument};

/// Institution-specific connect payload. Opaque beyond being a JSON object.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConnectionPayload(serde_json::Value);

impl ConnectionPayload {
    /// Parse raw input into a payload.
    ///
    /// # Errors
    ///
    /// Fails when the input is not valid JSON or not a JSON object.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let value: serde_json::Value = serde_json::from_str(raw).map_err(|_| {
            ValidationError::new("connectionPayload", "Connection payload must be valid JSON")
        })?;
        if !value.is_object() {
            return Err(ValidationError::new(
                "connectionPayload",
                "Connection payload must be a JSON object",
            ));
        }
        Ok(Self(value))
    }

    #[must_use]
    pub fn into_value(self) -> serde_json::Value {
        self.0
    }
}

/// Bank screens' shared workflow over one backend client.
pub struct BankWorkflow {
    client: Arc<ApiClient>,
    providers: Mutex<Option<Vec<Provider>>>,
    balances: Mutex<Option<Vec<BankConnection>>>,
}

impl BankWorkflow {
    #[must_use]
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self {
            client,
            providers: Mutex::new(None),
            balances: Mutex::new(None),
        }
    }

    fn lock<'a, T>(cache: &'a Mutex<Option<T>>) -> MutexGuard<'a, Option<T>> {
        cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Institutions available for linking. Fetched once per workflow; the
    /// catalog does not change mid-session.
    ///
    /// # Errors
    ///
    /// Propagates transport failures; nothing is cached for them.
    #[instrument(skip(self))]
    pub async fn providers(&self) -> Result<Vec<Provider>, FlowError> {
        if let Some(cached) = Self::lock(&self.providers).clone() {
            return Ok(cached);
        }
        let providers = api::bank::providers(&self.client)
            .await
            .map_err(FlowError::Api)?;
        *Self::lock(&self.providers) = Some(providers.clone());
        Ok(providers)
    }

    /// Linked accounts with balances, served from cache until a mutation
    /// invalidates it.
    ///
    /// # Errors
    ///
    /// Propagates transport failures; nothing is cached for them.
    #[instrument(skip(self))]
    pub async fn balances(&self) -> Result<Vec<BankConnection>, FlowError> {
        if let Some(cached) = Self::lock(&self.balances).clone() {
            return Ok(cached);
        }
        let balances = api::bank::balances(&self.client)
            .await
            .map_err(FlowError::Api)?;
        *Self::lock(&self.balances) = Some(balances.clone());
        Ok(balances)
    }

    /// Link an account. The balance cache is dropped only after the backend
    /// acknowledged the connection.
    ///
    /// # Errors
    ///
    /// [`FlowError::Validation`] before any request, [`FlowError::Rejected`]
    /// when the backend refuses the link.
    #[instrument(skip(self, payload))]
    pub async fn connect(
        &self,
        bank_name: &str,
        payload: ConnectionPayload,
    ) -> Result<BankConnection, FlowError> {
        let bank_name = bank_name.trim();
        if bank_name.is_empty() {
            return Err(ValidationError::new("bankName", "Bank selection is required").into());
        }
        let request = ConnectRequest {
            bank_name: bank_name.to_string(),
            connection_payload: payload.into_value(),
        };
        let connection = api::bank::connect(&self.client, &request)
            .await
            .map_err(FlowError::from_api)?;
        self.invalidate_balances();
        Ok(connection)
    }

    /// Unlink an account. The balance cache is dropped only after the
    /// backend acknowledged the disconnect.
    ///
    /// # Errors
    ///
    /// [`FlowError::Validation`] for a blank account id,
    /// [`FlowError::Rejected`] when the backend refuses.
    #[instrument(skip(self))]
    pub async fn disconnect(&self, account_id: &str) -> Result<(), FlowError> {
        let account_id = account_id.trim();
        if account_id.is_empty() {
            return Err(ValidationError::new("accountId", "Account id is required").into());
        }
        let request = DisconnectRequest {
            account_id: account_id.to_string(),
        };
        api::bank::disconnect(&self.client, &request)
            .await
            .map_err(FlowError::from_api)?;
        self.invalidate_balances();
        Ok(())
    }

    /// Transactions matching the filter. Deliberately uncached; filters vary
    /// per listing.
    ///
    /// # Errors
    ///
    /// Propagates transport failures.
    #[instrument(skip(self, filter))]
    pub async fn transactions(
        &self,
        filter: &TransactionFilter,
    ) -> Result<Vec<Transaction>, FlowError> {
        api::bank::transactions(&self.client, filter)
            .await
            .map_err(FlowError::Api)
    }

    /// Drop the cached balance listing so the next read asks the backend.
    pub fn invalidate_balances(&self) {
        *Self::lock(&self.balances) = None;
        debug!("balance cache invalidated");
    }
}
