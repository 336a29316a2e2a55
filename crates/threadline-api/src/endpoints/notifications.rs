use crate::client::ApiClient;
use crate::error::ApiResult;
use crate::requests::NotificationFeed;
use crate::transport::ApiRequest;

#[derive(Debug, Clone)]
pub struct NotificationsApi {
    client: ApiClient,
}

impl NotificationsApi {
    pub(crate) fn new(client: ApiClient) -> Self {
        NotificationsApi { client }
    }

    pub async fn list(&self) -> ApiResult<NotificationFeed> {
        self.client
            .call_or_default(ApiRequest::get("/notifications"))
            .await
    }

    pub async fn mark_read(&self, notification_id: &str) -> ApiResult<()> {
        self.client
            .call_unit(ApiRequest::put(format!(
                "/notifications/{notification_id}/read"
            )))
            .await
    }

    pub async fn mark_all_read(&self) -> ApiResult<()> {
        self.client
            .call_unit(ApiRequest::put("/notifications/read-all"))
            .await
    }
}
