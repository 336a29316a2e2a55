use threadline_core::Order;
use tracing::info;

use crate::client::ApiClient;
use crate::error::ApiResult;
use crate::requests::{CancelOrderRequest, CheckoutRequest, OrderFilter, UpdatePaymentRequest};
use crate::transport::ApiRequest;

#[derive(Debug, Clone)]
pub struct OrdersApi {
    client: ApiClient,
}

impl OrdersApi {
    pub(crate) fn new(client: ApiClient) -> Self {
        OrdersApi { client }
    }

    /// Converts the server-side cart into an order.
    ///
    /// Not idempotent on its own; `idempotency_key` lets the backend
    /// collapse a retried attempt into the order it already created.
    pub async fn checkout(
        &self,
        request: &CheckoutRequest,
        idempotency_key: &str,
    ) -> ApiResult<Order> {
        let order: Order = self
            .client
            .call(
                ApiRequest::post("/orders/checkout")
                    .json(request)?
                    .idempotency_key(idempotency_key),
            )
            .await?;
        info!(order_id = %order.id, order_no = %order.order_no, total = %order.total, "Order created");
        Ok(order)
    }

    pub async fn list(&self, filter: &OrderFilter) -> ApiResult<Vec<Order>> {
        let mut request = ApiRequest::get("/orders");
        if let Some(status) = filter.status {
            request = request.query("status", status);
        }
        if let Some(page) = filter.page {
            request = request.query("page", page);
        }
        if let Some(limit) = filter.limit {
            request = request.query("limit", limit);
        }
        self.client.call_or_default(request).await
    }

    pub async fn get(&self, order_id: &str) -> ApiResult<Order> {
        self.client
            .call(ApiRequest::get(format!("/orders/{order_id}")))
            .await
    }

    pub async fn update_payment(
        &self,
        order_id: &str,
        request: &UpdatePaymentRequest,
    ) -> ApiResult<Order> {
        self.client
            .call(ApiRequest::put(format!("/orders/{order_id}/payment")).json(request)?)
            .await
    }

    pub async fn cancel(&self, order_id: &str, request: &CancelOrderRequest) -> ApiResult<Order> {
        self.client
            .call(ApiRequest::put(format!("/orders/{order_id}/cancel")).json(request)?)
            .await
    }
}
