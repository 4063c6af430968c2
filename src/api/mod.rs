//! HTTP transport for the dashboard API. One client owns the connection
//! pool, the persistent cookie jar, and the timeout policy; the endpoint
//! wrappers in [`auth`] and [`bank`] stay free of request plumbing.

pub mod auth;
pub mod bank;
pub mod cookies;
pub mod types;

use crate::errors::ApiError;
use cookies::PersistentJar;
use serde::{de::DeserializeOwned, Serialize};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;
use uuid::Uuid;

/// Default request timeout applied to every call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
/// Maximum number of error body characters surfaced to callers.
const MAX_ERROR_CHARS: usize = 200;
/// Correlation header stamped on every request.
const REQUEST_ID_HEADER: &str = "x-request-id";

pub struct ApiClient {
    client: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    /// Build a client for the given API base URL.
    ///
    /// The session cookie jar is seeded from and mirrored to a file under
    /// `state_dir`, so a later invocation still holds the session.
    ///
    /// # Errors
    ///
    /// Returns an error when the URL has no host or an unsupported scheme,
    /// or when the underlying HTTP client cannot be constructed.
    pub fn new(api_url: &str, state_dir: &Path, timeout: Duration) -> Result<Self, ApiError> {
        let base_url = parse_base_url(api_url)?;
        let jar = Arc::new(PersistentJar::load(&base_url, state_dir));

        let client = reqwest::Client::builder()
            .user_agent(crate::APP_USER_AGENT)
            .timeout(timeout)
            .cookie_provider(jar)
            .build()
            .map_err(|err| ApiError::Config(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self { client, base_url })
    }

    fn endpoint_url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        )
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let request_id = Uuid::new_v4().to_string();
        debug!(request_id = %request_id, "sending request");
        let response = request.header(REQUEST_ID_HEADER, &request_id).send().await?;
        Ok(response)
    }

    /// GET expecting a JSON body.
    #[instrument(skip(self))]
    pub(crate) async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        let response = self.send(self.client.get(self.endpoint_url(endpoint))).await?;
        handle_json_response(response).await
    }

    /// GET with query parameters, expecting a JSON body.
    #[instrument(skip(self, query))]
    pub(crate) async fn get_json_with_query<Q: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &Q,
    ) -> Result<T, ApiError> {
        let response = self
            .send(self.client.get(self.endpoint_url(endpoint)).query(query))
            .await?;
        handle_json_response(response).await
    }

    /// GET that treats 204 and 401 as "nothing there". Used by the session
    /// probe, where 401 is the expected anonymous answer, never an error.
    #[instrument(skip(self))]
    pub(crate) async fn get_optional_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
    ) -> Result<Option<T>, ApiError> {
        let response = self.send(self.client.get(self.endpoint_url(endpoint))).await?;
        handle_optional_json_response(response).await
    }

    /// POST a JSON body, expecting a JSON body back.
    #[instrument(skip(self, body))]
    pub(crate) async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self
            .send(self.client.post(self.endpoint_url(endpoint)).json(body))
            .await?;
        handle_json_response(response).await
    }

    /// POST a JSON body; any success status is accepted and the body ignored.
    #[instrument(skip(self, body))]
    pub(crate) async fn post_json_discard<B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<(), ApiError> {
        let response = self
            .send(self.client.post(self.endpoint_url(endpoint)).json(body))
            .await?;
        handle_empty_response(response).await
    }

    /// POST without a body, used to clear a session.
    #[instrument(skip(self))]
    pub(crate) async fn post_empty(&self, endpoint: &str) -> Result<(), ApiError> {
        let response = self.send(self.client.post(self.endpoint_url(endpoint))).await?;
        handle_empty_response(response).await
    }
}

/// Validate and normalize the configured API base URL.
fn parse_base_url(api_url: &str) -> Result<Url, ApiError> {
    let url = Url::parse(api_url.trim())
        .map_err(|err| ApiError::Config(format!("Invalid API URL: {err}")))?;

    if url.host().is_none() {
        return Err(ApiError::Config(
            "Invalid API URL: no host specified".to_string(),
        ));
    }

    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(ApiError::Config(format!(
            "Invalid API URL: unsupported scheme {scheme}"
        ))),
    }
}

async fn handle_json_response<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ApiError> {
    if response.status().is_success() {
        response
            .json::<T>()
            .await
            .map_err(|err| ApiError::Parse(format!("Failed to decode response: {err}")))
    } else {
        Err(http_error(response).await)
    }
}

async fn handle_empty_response(response: reqwest::Response) -> Result<(), ApiError> {
    if response.status().is_success() {
        Ok(())
    } else {
        Err(http_error(response).await)
    }
}

async fn handle_optional_json_response<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<Option<T>, ApiError> {
    let status = response.status();
    if status == reqwest::StatusCode::NO_CONTENT
        || status == reqwest::StatusCode::UNAUTHORIZED
    {
        return Ok(None);
    }
    if status.is_success() {
        response
            .json::<T>()
            .await
            .map(Some)
            .map_err(|err| ApiError::Parse(format!("Failed to decode response: {err}")))
    } else {
        Err(http_error(response).await)
    }
}

/// Turn a non-success response into an `Http` error carrying the message the
/// backend meant for the user.
async fn http_error(response: reqwest::Response) -> ApiError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    ApiError::Http {
        status,
        message: error_message(&body),
    }
}

/// Pull a display message out of an error body. Bodies are usually JSON with
/// an `error` or `message` field; anything else is surfaced as trimmed text.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|json| {
            ["error", "message"].into_iter().find_map(|key| {
                json.get(key)
                    .and_then(serde_json::Value::as_str)
                    .map(ToString::to_string)
            })
        })
        .unwrap_or_else(|| sanitize_body(body))
}

/// Sanitize raw error bodies for display by trimming and truncating.
fn sanitize_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "Request failed.".to_string()
    } else {
        trimmed.chars().take(MAX_ERROR_CHARS).collect()
    }
}
