//! # Transport
//!
//! The seam between typed endpoint groups and the wire.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Request Path                                   │
//! │                                                                         │
//! │  orders().checkout(..)                                                  │
//! │        │  ApiRequest { POST, "/orders/checkout", body, idempotency }    │
//! │        ▼                                                                │
//! │  ┌───────────────────┐      ┌───────────────────────────────────────┐  │
//! │  │ dyn Transport     │─────►│ HttpTransport                         │  │
//! │  │                   │      │  • base_url + path                    │  │
//! │  │  (MockTransport   │      │  • Authorization: Bearer <token>      │  │
//! │  │   in tests)       │      │  • Idempotency-Key                    │  │
//! │  └───────────────────┘      │  • timeout → ApiError::Timeout        │  │
//! │                             │  • envelope → data | ApiError::Server │  │
//! │                             └───────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use mockall::automock;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::time::Instant;
use tracing::{debug, warn};

use crate::auth::AuthToken;
use crate::config::ClientConfig;
use crate::envelope;
use crate::error::{ApiError, ApiResult};

/// Header carrying the per-attempt key for non-idempotent POSTs.
pub const IDEMPOTENCY_KEY_HEADER: &str = "Idempotency-Key";

// =============================================================================
// Request Model
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        };
        f.write_str(name)
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// One call against the backend: `request(method, path, body?, params?)`.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path relative to the configured base URL, e.g. `/cart/items/42`.
    pub path: String,
    pub body: Option<Value>,
    pub query: Vec<(String, String)>,
    pub idempotency_key: Option<String>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        ApiRequest {
            method,
            path: path.into(),
            body: None,
            query: Vec::new(),
            idempotency_key: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::Put, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    /// Attaches a JSON body.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> ApiResult<Self> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    pub fn idempotency_key(mut self, key: impl Into<String>) -> Self {
        self.idempotency_key = Some(key.into());
        self
    }
}

// =============================================================================
// Transport Trait
// =============================================================================

/// Sends a request and returns the unwrapped `data` payload.
#[automock]
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> ApiResult<Value>;
}

// =============================================================================
// HTTP Transport
// =============================================================================

/// reqwest-backed transport used outside of tests.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: String,
    timeout_secs: u64,
    auth: AuthToken,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig, auth: AuthToken) -> ApiResult<Self> {
        config.validate()?;

        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(config.api.user_agent.clone())
            .build()
            .map_err(|e| ApiError::InvalidConfig(e.to_string()))?;

        Ok(HttpTransport {
            http,
            base_url: config.api.base_url.trim_end_matches('/').to_string(),
            timeout_secs: config.api.timeout_secs,
            auth,
        })
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// Splits reqwest failures into "no response" and "unreadable response".
    fn classify(&self, err: reqwest::Error) -> ApiError {
        if err.is_timeout() {
            ApiError::Timeout {
                secs: self.timeout_secs,
            }
        } else if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> ApiResult<Value> {
        let url = self.url(&request.path);
        let mut builder = self.http.request(request.method.into(), &url);

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(token) = self.auth.bearer().await {
            builder = builder.bearer_auth(token);
        }
        if let Some(key) = &request.idempotency_key {
            builder = builder.header(IDEMPOTENCY_KEY_HEADER, key);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        debug!(method = %request.method, path = %request.path, "Sending request");
        let started = Instant::now();

        let response = builder.send().await.map_err(|e| {
            let err = self.classify(e);
            warn!(method = %request.method, path = %request.path, error = %err, "Request failed");
            err
        })?;

        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(|e| self.classify(e))?;

        debug!(
            method = %request.method,
            path = %request.path,
            status,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Response received"
        );

        envelope::into_payload(status, &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_builder() {
        let req = ApiRequest::post("/orders/checkout")
            .json(&json!({"paymentMethod": "cod"}))
            .unwrap()
            .idempotency_key("key-1");

        assert_eq!(req.method, Method::Post);
        assert_eq!(req.body, Some(json!({"paymentMethod": "cod"})));
        assert_eq!(req.idempotency_key.as_deref(), Some("key-1"));

        let req = ApiRequest::get("/orders").query("page", 2);
        assert_eq!(req.query, vec![("page".to_string(), "2".to_string())]);
    }

    #[test]
    fn test_url_join() {
        let config = ClientConfig::for_base_url("http://localhost:5000/api/");
        let transport = HttpTransport::new(&config, AuthToken::default()).unwrap();
        assert_eq!(transport.url("/cart"), "http://localhost:5000/api/cart");
        assert_eq!(transport.url("cart/clear"), "http://localhost:5000/api/cart/clear");
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = ClientConfig::for_base_url("ws://localhost:5000");
        assert!(HttpTransport::new(&config, AuthToken::default()).is_err());
    }
}
