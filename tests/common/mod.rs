#![allow(clippy::unwrap_used, clippy::expect_used)]
#![allow(dead_code)]

//! In-process dashboard backend for integration tests. Implements the wire
//! contract the client speaks: lowercase signup fields, camelCase elsewhere,
//! an HTTP-only session cookie, and `{"error": ...}` bodies on refusals.

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use uuid::Uuid;

/// The only code the backend accepts.
pub const OTP: &str = "123456";
/// The only reset token the backend accepts.
pub const RESET_TOKEN: &str = "valid-token";

type Shared = Arc<Mutex<BackendState>>;

#[derive(Default)]
pub struct BackendState {
    /// Registered users by email.
    pub users: HashMap<String, User>,
    /// Live session tokens mapped back to emails.
    pub sessions: HashMap<String, String>,
    /// Linked accounts, stored as wire-shaped JSON objects.
    pub accounts: Vec<Value>,
    pub next_account: usize,
    /// Email awaiting a password reset, set by forgot-password.
    pub pending_reset: Option<String>,
    /// Verification codes dispatched per email.
    pub otp_dispatches: HashMap<String, usize>,
    pub me_hits: usize,
    pub banks_hits: usize,
    pub balances_hits: usize,
    /// Query parameters of the last transactions request.
    pub last_transactions_query: Option<HashMap<String, String>>,
}

pub struct User {
    pub password: String,
    pub identity: Value,
}

pub struct TestBackend {
    pub base_url: String,
    pub state: Shared,
    handle: JoinHandle<()>,
}

impl TestBackend {
    pub async fn start() -> Self {
        let state = Arc::new(Mutex::new(BackendState::default()));
        let app = router(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind test listener");
        let addr = listener.local_addr().expect("failed to read local addr");
        let handle = tokio::spawn(async move {
            if let Err(err) = axum::serve(listener, app).await {
                eprintln!("mock backend error: {err:?}");
            }
        });

        Self {
            base_url: format!("http://{addr}"),
            state,
            handle,
        }
    }

    /// Register a verified user directly, skipping the signup flow.
    pub fn seed_user(&self, email: &str, password: &str, name: &str) {
        let mut state = self.state.lock().unwrap();
        let identity = json!({
            "id": format!("user-{}", state.users.len() + 1),
            "name": name,
            "email": email,
            "roles": ["user"],
        });
        state.users.insert(
            email.to_string(),
            User {
                password: password.to_string(),
                identity,
            },
        );
    }

    /// Link an account directly, returning its id.
    pub fn seed_account(&self, bank_name: &str, balance: f64) -> String {
        let mut state = self.state.lock().unwrap();
        state.next_account += 1;
        let account_id = format!("acc-{}", state.next_account);
        state.accounts.push(json!({
            "accountId": account_id,
            "bankName": bank_name,
            "balance": balance,
            "currency": "USD",
        }));
        account_id
    }
}

impl Drop for TestBackend {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn router(state: Shared) -> Router {
    Router::new()
        .route("/auth/me", get(me))
        .route("/auth/signup", post(signup))
        .route("/auth/verify-otp", post(verify_otp))
        .route("/auth/signin", post(signin))
        .route("/auth/logout", post(logout))
        .route("/auth/forgot-password", post(forgot_password))
        .route("/auth/reset-password", post(reset_password))
        .route("/bank/banks", get(banks))
        .route("/bank/connect", post(connect))
        .route("/bank/disconnect", post(disconnect))
        .route("/bank/balances", get(balances))
        .route("/bank/transactions", get(transactions))
        .with_state(state)
}

fn cookie_token(headers: &HeaderMap) -> Option<String> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies
        .split("; ")
        .find_map(|part| part.strip_prefix("session="))
        .map(ToString::to_string)
}

fn session_email(state: &BackendState, headers: &HeaderMap) -> Option<String> {
    let token = cookie_token(headers)?;
    state.sessions.get(&token).cloned()
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"error": "Not signed in"})),
    )
        .into_response()
}

fn session_cookie(token: &str) -> String {
    format!("session={token}; Path=/; HttpOnly")
}

fn expired_cookie() -> String {
    "session=; Path=/; Max-Age=0; Expires=Thu, 01 Jan 1970 00:00:00 GMT".to_string()
}

fn issue_session(state: &mut BackendState, email: &str) -> String {
    let token = Uuid::new_v4().to_string();
    state.sessions.insert(token.clone(), email.to_string());
    token
}

async fn me(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let mut state = state.lock().unwrap();
    state.me_hits += 1;
    match session_email(&state, &headers)
        .and_then(|email| state.users.get(&email).map(|user| user.identity.clone()))
    {
        Some(identity) => Json(identity).into_response(),
        None => unauthorized(),
    }
}

async fn signup(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut state = state.lock().unwrap();
    let email = body["email"].as_str().unwrap_or_default().to_string();
    if state.users.contains_key(&email) {
        return Json(json!({"success": false, "message": "Email already registered"}))
            .into_response();
    }
    *state.otp_dispatches.entry(email).or_insert(0) += 1;
    Json(json!({"success": true})).into_response()
}

async fn verify_otp(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut state = state.lock().unwrap();
    if body["otp"].as_str() != Some(OTP) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "Invalid OTP"})),
        )
            .into_response();
    }

    let email = body["email"].as_str().unwrap_or_default().to_string();
    let name = format!(
        "{} {}",
        body["firstname"].as_str().unwrap_or_default(),
        body["lastname"].as_str().unwrap_or_default()
    );
    let identity = json!({
        "id": format!("user-{}", state.users.len() + 1),
        "name": name,
        "email": email,
        "roles": ["user"],
    });
    state.users.insert(
        email.clone(),
        User {
            password: body["password"].as_str().unwrap_or_default().to_string(),
            identity: identity.clone(),
        },
    );

    let token = issue_session(&mut state, &email);
    (
        [(header::SET_COOKIE, session_cookie(&token))],
        Json(identity),
    )
        .into_response()
}

async fn signin(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut state = state.lock().unwrap();
    let email = body["email"].as_str().unwrap_or_default().to_string();
    let password = body["password"].as_str().unwrap_or_default();

    let identity = match state.users.get(&email) {
        Some(user) if user.password == password => user.identity.clone(),
        _ => {
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({"error": "Invalid credentials"})),
            )
                .into_response();
        }
    };

    let token = issue_session(&mut state, &email);
    (
        [(header::SET_COOKIE, session_cookie(&token))],
        Json(identity),
    )
        .into_response()
}

async fn logout(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let mut state = state.lock().unwrap();
    if let Some(token) = cookie_token(&headers) {
        state.sessions.remove(&token);
    }
    ([(header::SET_COOKIE, expired_cookie())], StatusCode::OK).into_response()
}

async fn forgot_password(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut state = state.lock().unwrap();
    let email = body["email"].as_str().unwrap_or_default().to_string();
    // Neutral by contract: the answer never reveals whether the account exists.
    if state.users.contains_key(&email) {
        state.pending_reset = Some(email);
    }
    StatusCode::OK.into_response()
}

async fn reset_password(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut state = state.lock().unwrap();
    if body["resetToken"].as_str() != Some(RESET_TOKEN) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "Invalid or expired reset token"})),
        )
            .into_response();
    }
    let Some(email) = state.pending_reset.take() else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "Invalid or expired reset token"})),
        )
            .into_response();
    };
    let password = body["newPassword"].as_str().unwrap_or_default().to_string();
    if let Some(user) = state.users.get_mut(&email) {
        user.password = password;
    }
    StatusCode::OK.into_response()
}

async fn banks(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let mut state = state.lock().unwrap();
    if session_email(&state, &headers).is_none() {
        return unauthorized();
    }
    state.banks_hits += 1;
    Json(json!([
        {"name": "First Bank"},
        {"name": "Acme Credit Union"},
    ]))
    .into_response()
}

async fn connect(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut state = state.lock().unwrap();
    if session_email(&state, &headers).is_none() {
        return unauthorized();
    }
    if !body["connectionPayload"].is_object() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "Invalid connection payload"})),
        )
            .into_response();
    }
    state.next_account += 1;
    let connection = json!({
        "accountId": format!("acc-{}", state.next_account),
        "bankName": body["bankName"].as_str().unwrap_or_default(),
        "balance": 1250.0,
        "currency": "USD",
    });
    state.accounts.push(connection.clone());
    Json(connection).into_response()
}

async fn disconnect(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut state = state.lock().unwrap();
    if session_email(&state, &headers).is_none() {
        return unauthorized();
    }
    let account_id = body["accountId"].as_str().unwrap_or_default();
    let before = state.accounts.len();
    state
        .accounts
        .retain(|account| account["accountId"] != account_id);
    if state.accounts.len() == before {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"error": "Account not found"})),
        )
            .into_response();
    }
    StatusCode::OK.into_response()
}

async fn balances(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let mut state = state.lock().unwrap();
    if session_email(&state, &headers).is_none() {
        return unauthorized();
    }
    state.balances_hits += 1;
    Json(Value::Array(state.accounts.clone())).into_response()
}

async fn transactions(
    State(state): State<Shared>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    let mut state = state.lock().unwrap();
    if session_email(&state, &headers).is_none() {
        return unauthorized();
    }
    state.last_transactions_query = Some(query.clone());

    let matching: Vec<Value> = fixture_transactions()
        .into_iter()
        .filter(|tx| {
            query
                .get("category")
                .map_or(true, |category| tx["category"] == category.as_str())
                && query
                    .get("startDate")
                    .map_or(true, |start| tx["date"].as_str() >= Some(start.as_str()))
                && query
                    .get("endDate")
                    .map_or(true, |end| tx["date"].as_str() <= Some(end.as_str()))
        })
        .collect();
    Json(Value::Array(matching)).into_response()
}

fn fixture_transactions() -> Vec<Value> {
    vec![
        json!({
            "bankName": "First Bank",
            "date": "2026-08-20",
            "amount": -42.10,
            "currency": "USD",
            "category": "groceries",
            "description": "Corner market",
        }),
        json!({
            "bankName": "First Bank",
            "date": "2026-08-18",
            "amount": -9.99,
            "currency": "USD",
            "category": "subscriptions",
            "description": "Streaming",
        }),
        json!({
            "bankName": "Acme Credit Union",
            "date": "2026-07-31",
            "amount": 2500.0,
            "currency": "USD",
            "category": "income",
            "description": "Payroll",
        }),
    ]
}
