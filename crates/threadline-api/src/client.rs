//! # API Client
//!
//! Entry point for every backend call. Endpoint groups are obtained the
//! same way repositories are: `client.cart().fetch()`,
//! `client.orders().checkout(..)`.

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tracing::error;

use crate::auth::AuthToken;
use crate::config::ClientConfig;
use crate::endpoints::{
    AddressesApi, CartApi, NotificationsApi, OrdersApi, PaymentsApi, ResellerApi,
};
use crate::error::{ApiError, ApiResult};
use crate::transport::{ApiRequest, HttpTransport, Transport};

/// Cloneable handle over a shared transport.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
}

impl ApiClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        ApiClient { transport }
    }

    /// Builds a reqwest-backed client from configuration.
    pub fn from_config(config: &ClientConfig, auth: AuthToken) -> ApiResult<Self> {
        let transport = HttpTransport::new(config, auth)?;
        Ok(Self::new(Arc::new(transport)))
    }

    /// Sends a raw request and returns the unwrapped payload.
    pub async fn request(&self, request: ApiRequest) -> ApiResult<Value> {
        self.transport.send(request).await
    }

    /// Sends a request and decodes the payload into `T`.
    pub(crate) async fn call<T: DeserializeOwned>(&self, request: ApiRequest) -> ApiResult<T> {
        let path = request.path.clone();
        let payload = self.transport.send(request).await?;
        decode(&path, payload)
    }

    /// Like [`call`](Self::call), but a `null` payload becomes `T::default()`.
    pub(crate) async fn call_or_default<T>(&self, request: ApiRequest) -> ApiResult<T>
    where
        T: DeserializeOwned + Default,
    {
        let path = request.path.clone();
        match self.transport.send(request).await? {
            Value::Null => Ok(T::default()),
            payload => decode(&path, payload),
        }
    }

    /// Sends a request whose payload is irrelevant.
    pub(crate) async fn call_unit(&self, request: ApiRequest) -> ApiResult<()> {
        self.transport.send(request).await.map(|_| ())
    }

    // =========================================================================
    // Endpoint Groups
    // =========================================================================

    pub fn cart(&self) -> CartApi {
        CartApi::new(self.clone())
    }

    pub fn addresses(&self) -> AddressesApi {
        AddressesApi::new(self.clone())
    }

    pub fn orders(&self) -> OrdersApi {
        OrdersApi::new(self.clone())
    }

    pub fn payments(&self) -> PaymentsApi {
        PaymentsApi::new(self.clone())
    }

    pub fn reseller(&self) -> ResellerApi {
        ResellerApi::new(self.clone())
    }

    pub fn notifications(&self) -> NotificationsApi {
        NotificationsApi::new(self.clone())
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient").finish_non_exhaustive()
    }
}

fn decode<T: DeserializeOwned>(path: &str, payload: Value) -> ApiResult<T> {
    serde_json::from_value(payload).map_err(|e| {
        error!(path = %path, error = %e, "Payload did not match expected shape");
        ApiError::Decode(format!("{path}: {e}"))
    })
}
