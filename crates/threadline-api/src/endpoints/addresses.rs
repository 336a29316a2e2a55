use threadline_core::Address;

use crate::client::ApiClient;
use crate::error::ApiResult;
use crate::transport::ApiRequest;

#[derive(Debug, Clone)]
pub struct AddressesApi {
    client: ApiClient,
}

impl AddressesApi {
    pub(crate) fn new(client: ApiClient) -> Self {
        AddressesApi { client }
    }

    /// Saved addresses from the user's profile.
    pub async fn list(&self) -> ApiResult<Vec<Address>> {
        self.client.call_or_default(ApiRequest::get("/addresses")).await
    }
}
