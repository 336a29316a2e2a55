use threadline_core::{Money, Wallet, Withdrawal};

use crate::client::ApiClient;
use crate::error::ApiResult;
use crate::requests::WithdrawalRequest;
use crate::transport::ApiRequest;

#[derive(Debug, Clone)]
pub struct ResellerApi {
    client: ApiClient,
}

impl ResellerApi {
    pub(crate) fn new(client: ApiClient) -> Self {
        ResellerApi { client }
    }

    pub async fn wallet(&self) -> ApiResult<Wallet> {
        self.client.call(ApiRequest::get("/reseller/wallet")).await
    }

    pub async fn withdrawals(&self) -> ApiResult<Vec<Withdrawal>> {
        self.client
            .call_or_default(ApiRequest::get("/reseller/withdrawals"))
            .await
    }

    pub async fn request_withdrawal(&self, amount: Money) -> ApiResult<Withdrawal> {
        self.client
            .call(ApiRequest::post("/reseller/withdrawals").json(&WithdrawalRequest { amount })?)
            .await
    }
}
