use threadline_core::Order;

use crate::client::ApiClient;
use crate::error::ApiResult;
use crate::requests::{
    CreateGatewayOrderRequest, GatewayOrder, PaymentFailureRequest, VerifyPaymentRequest,
};
use crate::transport::ApiRequest;

/// Bridges our orders to the third-party gateway's orders.
#[derive(Debug, Clone)]
pub struct PaymentsApi {
    client: ApiClient,
}

impl PaymentsApi {
    pub(crate) fn new(client: ApiClient) -> Self {
        PaymentsApi { client }
    }

    pub async fn create_gateway_order(&self, order_id: &str) -> ApiResult<GatewayOrder> {
        let body = CreateGatewayOrderRequest {
            order_id: order_id.to_string(),
        };
        self.client
            .call(ApiRequest::post("/payments/create-order").json(&body)?)
            .await
    }

    /// Server-side signature check. Only a success here settles a payment.
    pub async fn verify(&self, request: &VerifyPaymentRequest) -> ApiResult<Order> {
        self.client
            .call(ApiRequest::post("/payments/verify").json(request)?)
            .await
    }

    pub async fn report_failure(&self, request: &PaymentFailureRequest) -> ApiResult<()> {
        self.client
            .call_unit(ApiRequest::post("/payments/failure").json(request)?)
            .await
    }
}
