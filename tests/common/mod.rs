#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use gigboard_api::auth::{AuthKeys, Claims};
use gigboard_api::config::PaginationConfig;
use gigboard_api::database::MemoryStore;
use gigboard_api::AppState;

pub const SECRET: &str = "test-secret";
pub const AUDIENCE: &str = "authenticated";

/// Router over a fresh in-memory store, driven in process with `oneshot`.
pub struct TestApp {
    router: Router,
    keys: AuthKeys,
}

/// Status plus decoded JSON body.
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestResponse {
    pub fn data(&self) -> &Value {
        &self.body["data"]
    }

    pub fn id(&self) -> Uuid {
        self.body["data"]["id"]
            .as_str()
            .and_then(|s| Uuid::parse_str(s).ok())
            .expect("response data carries an id")
    }

    pub fn error(&self) -> &str {
        self.body["error"].as_str().unwrap_or_default()
    }
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_pagination(PaginationConfig {
            default_limit: 20,
            max_limit: 100,
        })
    }

    pub fn with_pagination(pagination: PaginationConfig) -> Self {
        let keys = AuthKeys::new(SECRET, AUDIENCE, 1);
        let state = AppState::new(Arc::new(MemoryStore::new()), keys.clone(), pagination);
        Self {
            router: gigboard_api::router(state),
            keys,
        }
    }

    /// New user id plus a valid bearer token for it.
    pub fn user(&self) -> (Uuid, String) {
        let user_id = Uuid::new_v4();
        let token = self
            .keys
            .issue(user_id, Some(format!("{}@crew.test", &user_id.to_string()[..8])))
            .expect("token issues");
        (user_id, token)
    }

    /// Sign arbitrary claims, for expired and wrong-audience cases.
    pub fn sign(&self, claims: &Claims) -> String {
        self.keys.sign(claims).expect("claims sign")
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Result<TestResponse> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&json)?))?,
            None => builder.body(Body::empty())?,
        };
        self.send(request).await
    }

    pub async fn send(&self, request: Request<Body>) -> Result<TestResponse> {
        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await?;
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).with_context(|| format!("non-JSON body: {:?}", bytes))?
        };
        Ok(TestResponse { status, body })
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> Result<TestResponse> {
        self.request(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> Result<TestResponse> {
        self.request(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: &str, body: Value) -> Result<TestResponse> {
        self.request(Method::PUT, uri, Some(token), Some(body)).await
    }

    pub async fn patch(&self, uri: &str, token: &str, body: Value) -> Result<TestResponse> {
        self.request(Method::PATCH, uri, Some(token), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> Result<TestResponse> {
        self.request(Method::DELETE, uri, Some(token), None).await
    }
}
