//! Router-level test harness driven with `tower::ServiceExt::oneshot`.

#![allow(clippy::unwrap_used)]

use std::str::FromStr;
use std::sync::Arc;

use argon2::Params;
use axum::{
    Router,
    body::Body,
    http::{Request, Response, StatusCode, header},
};
use rust_decimal::Decimal;
use secrecy::SecretString;
use serde_json::{Value, json};
use tower::ServiceExt;

use cashback_core::CashbackStore;

use crate::config::ServerConfig;
use crate::services::Argon2Hasher;
use crate::state::AppState;

pub struct TestApp {
    router: Router,
    state: AppState,
}

impl TestApp {
    pub const PASSWORD: &'static str = "password123";
    const ADMIN_PASSWORD: &'static str = "Xk9#mP2$vL7q";

    pub fn new() -> Self {
        let hasher = Argon2Hasher::with_params(
            Params::new(Params::MIN_M_COST, Params::MIN_T_COST, Params::MIN_P_COST, None).unwrap(),
        );
        let store = CashbackStore::builder(Arc::new(hasher)).build();
        let state = AppState::new(ServerConfig::default(), store);

        Self {
            router: crate::app(state.clone()),
            state,
        }
    }

    pub fn registration(username: &str) -> Value {
        json!({
            "username": username,
            "password": Self::PASSWORD,
            "name": format!("{username} Example"),
            "address": "12 Market Road",
            "phone": "9876543210",
        })
    }

    /// Register a customer and return its session cookie.
    pub async fn register(&self, username: &str) -> String {
        let (status, _, cookie) = self
            .post_json("/api/register", &Self::registration(username), None)
            .await;
        assert_eq!(status, StatusCode::CREATED);
        cookie.unwrap()
    }

    /// Create the administrator and return its session cookie.
    pub async fn admin(&self) -> String {
        self.state
            .store()
            .accounts()
            .ensure_admin("admin", &SecretString::from(Self::ADMIN_PASSWORD))
            .unwrap();
        self.login("admin", Self::ADMIN_PASSWORD).await
    }

    pub async fn login(&self, username: &str, password: &str) -> String {
        let (status, _, cookie) = self
            .post_json(
                "/api/login",
                &json!({"username": username, "password": password}),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        cookie.unwrap()
    }

    pub async fn raw_get(&self, path: &str, request_id: Option<&str>) -> Response<Body> {
        let mut builder = Request::get(path);
        if let Some(id) = request_id {
            builder = builder.header("x-request-id", id);
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    pub async fn get(&self, path: &str, cookie: Option<&str>) -> (StatusCode, Value) {
        let request = with_cookie(Request::get(path), cookie)
            .body(Body::empty())
            .unwrap();
        let (status, body, _) = split(self.send(request).await).await;
        (status, body)
    }

    pub async fn post_json(
        &self,
        path: &str,
        body: &Value,
        cookie: Option<&str>,
    ) -> (StatusCode, Value, Option<String>) {
        let request = with_cookie(Request::post(path), cookie)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        split(self.send(request).await).await
    }

    pub async fn post_empty(&self, path: &str, cookie: Option<&str>) -> (StatusCode, Value) {
        let request = with_cookie(Request::post(path), cookie)
            .body(Body::empty())
            .unwrap();
        let (status, body, _) = split(self.send(request).await).await;
        (status, body)
    }

    async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }
}

/// Parse a JSON decimal (serialized as a string).
pub fn decimal(value: &Value) -> Decimal {
    Decimal::from_str(value.as_str().unwrap()).unwrap()
}

fn with_cookie(
    builder: axum::http::request::Builder,
    cookie: Option<&str>,
) -> axum::http::request::Builder {
    match cookie {
        Some(cookie) => builder.header(header::COOKIE, cookie),
        None => builder,
    }
}

async fn split(response: Response<Body>) -> (StatusCode, Value, Option<String>) {
    let status = response.status();
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(str::to_owned);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body, cookie)
}
