//! Wrappers for the bank endpoints. All of these require an established
//! session; the cookie travels with every call.

use super::types::{
    BankConnection, ConnectRequest, DisconnectRequest, Provider, Transaction, TransactionFilter,
};
use super::ApiClient;
use crate::errors::ApiError;

/// Lists the institutions available for linking.
///
/// # Errors
///
/// Returns an error for transport failures or non-success statuses.
pub async fn providers(client: &ApiClient) -> Result<Vec<Provider>, ApiError> {
    client.get_json("/bank/banks").await
}

/// Links an institution and returns the new connection as the server sees it.
///
/// # Errors
///
/// Returns an error for transport failures or non-success statuses.
pub async fn connect(
    client: &ApiClient,
    request: &ConnectRequest,
) -> Result<BankConnection, ApiError> {
    client.post_json("/bank/connect", request).await
}

/// Unlinks an account.
///
/// # Errors
///
/// Returns an error for transport failures or non-success statuses.
pub async fn disconnect(client: &ApiClient, request: &DisconnectRequest) -> Result<(), ApiError> {
    client.post_json_discard("/bank/disconnect", request).await
}

/// Fetches the linked accounts with their balances.
///
/// # Errors
///
/// Returns an error for transport failures or non-success statuses.
pub async fn balances(client: &ApiClient) -> Result<Vec<BankConnection>, ApiError> {
    client.get_json("/bank/balances").await
}

/// Fetches transactions matching the filter. Filters travel as URL query
/// parameters; an empty filter sends none.
///
/// # Errors
///
/// Returns an error for transport failures or non-success statuses.
pub async fn transactions(
    client: &ApiClient,
    filter: &TransactionFilter,
) -> Result<Vec<Transaction>, ApiError> {
    if filter.is_empty() {
        client.get_json("/bank/transactions").await
    } else {
        client.get_json_with_query("/bank/transactions", filter).await
    }
}
