use threadline_core::Cart;

use crate::client::ApiClient;
use crate::error::ApiResult;
use crate::requests::{AddToCartRequest, UpdateCartItemRequest};
use crate::transport::ApiRequest;

/// Server-side cart. Every mutation echoes the whole cart back.
#[derive(Debug, Clone)]
pub struct CartApi {
    client: ApiClient,
}

impl CartApi {
    pub(crate) fn new(client: ApiClient) -> Self {
        CartApi { client }
    }

    pub async fn fetch(&self) -> ApiResult<Cart> {
        self.client.call_or_default(ApiRequest::get("/cart")).await
    }

    pub async fn add_item(&self, request: &AddToCartRequest) -> ApiResult<Cart> {
        self.client
            .call_or_default(ApiRequest::post("/cart/items").json(request)?)
            .await
    }

    pub async fn update_item(
        &self,
        item_id: &str,
        request: &UpdateCartItemRequest,
    ) -> ApiResult<Cart> {
        self.client
            .call_or_default(ApiRequest::put(format!("/cart/items/{item_id}")).json(request)?)
            .await
    }

    pub async fn remove_item(&self, item_id: &str) -> ApiResult<Cart> {
        self.client
            .call_or_default(ApiRequest::delete(format!("/cart/items/{item_id}")))
            .await
    }

    /// Empties the cart. A `null` payload is read as the empty cart.
    pub async fn clear(&self) -> ApiResult<Cart> {
        self.client
            .call_or_default(ApiRequest::delete("/cart/clear"))
            .await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};
    use threadline_core::Money;

    use crate::endpoints::test_support::client;
    use crate::transport::{Method, MockTransport};

    use super::*;

    #[tokio::test]
    async fn test_update_item_hits_item_path() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .once()
            .withf(|req| {
                req.method == Method::Put
                    && req.path == "/cart/items/line-7"
                    && req.body == Some(json!({"quantity": 3, "resellPrice": 25.0}))
            })
            .returning(|_| Ok(json!({"items": [], "totalItems": 0, "totalPrice": 0})));

        let cart = client(transport)
            .cart()
            .update_item(
                "line-7",
                &UpdateCartItemRequest {
                    quantity: 3,
                    resell_price: Money::from_rupees(25),
                },
            )
            .await
            .unwrap();
        assert!(cart.is_empty());
    }

    #[tokio::test]
    async fn test_clear_accepts_null_payload() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .once()
            .withf(|req| req.method == Method::Delete && req.path == "/cart/clear")
            .returning(|_| Ok(Value::Null));

        let cart = client(transport).cart().clear().await.unwrap();
        assert!(cart.is_empty());
        assert!(cart.total_price.is_zero());
    }
}
