//! End-to-end test harness for the cashback server.
//!
//! Each [`TestContext`] boots the full router (sessions, tracing, Sentry
//! layers included) on an ephemeral localhost port and talks to it over real
//! HTTP with `reqwest`. Every context owns a fresh in-memory store, so tests
//! run in parallel without sharing state.
//!
//! ```rust,ignore
//! #[tokio::test]
//! async fn test_health() {
//!     let ctx = TestContext::start().await;
//!     let resp = ctx.client().get(ctx.url("/health")).send().await.unwrap();
//!     assert_eq!(resp.status(), 200);
//! }
//! ```

#![allow(clippy::missing_panics_doc, clippy::expect_used)]

use std::net::SocketAddr;
use std::sync::Arc;

use argon2::Params;
use reqwest::{Client, StatusCode};
use secrecy::SecretString;
use serde_json::{Value, json};

use cashback_core::CashbackStore;
use cashback_server::config::ServerConfig;
use cashback_server::services::Argon2Hasher;
use cashback_server::state::AppState;

/// Password used for every customer the harness registers.
pub const CUSTOMER_PASSWORD: &str = "password123";

/// Administrator credentials seeded into every context.
pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "Xk9#mP2$vL7q";

/// A running server plus the address to reach it.
pub struct TestContext {
    addr: SocketAddr,
    store: CashbackStore,
}

impl TestContext {
    /// Start a server on `127.0.0.1:0` with the bootstrap administrator
    /// already created.
    pub async fn start() -> Self {
        // Cheapest argon2 parameters; tests hash many passwords.
        let params = Params::new(Params::MIN_M_COST, Params::MIN_T_COST, Params::MIN_P_COST, None)
            .expect("valid argon2 params");
        let store = CashbackStore::builder(Arc::new(Argon2Hasher::with_params(params))).build();
        store
            .accounts()
            .ensure_admin(ADMIN_USERNAME, &SecretString::from(ADMIN_PASSWORD))
            .expect("Failed to seed administrator");

        let app = cashback_server::app(AppState::new(ServerConfig::default(), store.clone()));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("listener has an address");

        tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("test server stopped");
        });

        Self { addr, store }
    }

    /// Absolute URL for a path on the test server.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// The engine behind the server, for assertions that bypass HTTP.
    #[must_use]
    pub const fn store(&self) -> &CashbackStore {
        &self.store
    }

    /// A client with its own cookie jar (one browser, one session).
    #[must_use]
    pub fn client(&self) -> Client {
        Client::builder()
            .cookie_store(true)
            .build()
            .expect("Failed to create HTTP client")
    }

    /// Register a customer and return a client logged in as them.
    pub async fn customer(&self, username: &str) -> Client {
        let client = self.client();
        let resp = client
            .post(self.url("/api/register"))
            .json(&json!({
                "username": username,
                "password": CUSTOMER_PASSWORD,
                "name": format!("{username} Example"),
                "address": "12 Market Road",
                "phone": "9876543210",
            }))
            .send()
            .await
            .expect("register request failed");
        assert_eq!(resp.status(), StatusCode::CREATED);
        client
    }

    /// A client logged in as the seeded administrator.
    pub async fn admin(&self) -> Client {
        let client = self.client();
        let resp = client
            .post(self.url("/api/login"))
            .json(&json!({"username": ADMIN_USERNAME, "password": ADMIN_PASSWORD}))
            .send()
            .await
            .expect("login request failed");
        assert_eq!(resp.status(), StatusCode::OK);
        client
    }

    /// Submit a bill dated 2026-03-01 and return the response.
    pub async fn submit(&self, client: &Client, bill_number: &str, amount: &str) -> Response {
        let resp = client
            .post(self.url("/api/purchases"))
            .json(&json!({
                "billNumber": bill_number,
                "billAmount": amount,
                "purchaseDate": "2026-03-01",
            }))
            .send()
            .await
            .expect("submit request failed");
        Response::read(resp).await
    }

    /// POST with an optional JSON body.
    pub async fn post(&self, client: &Client, path: &str, body: Option<&Value>) -> Response {
        let mut request = client.post(self.url(path));
        if let Some(body) = body {
            request = request.json(body);
        }
        Response::read(request.send().await.expect("POST failed")).await
    }

    /// GET a JSON endpoint.
    pub async fn get(&self, client: &Client, path: &str) -> Response {
        Response::read(client.get(self.url(path)).send().await.expect("GET failed")).await
    }
}

/// Status plus decoded JSON body (`Null` when the body is empty or not JSON).
#[derive(Debug)]
pub struct Response {
    pub status: StatusCode,
    pub body: Value,
}

impl Response {
    async fn read(resp: reqwest::Response) -> Self {
        let status = resp.status();
        let bytes = resp.bytes().await.expect("Failed to read response body");
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        Self { status, body }
    }
}
