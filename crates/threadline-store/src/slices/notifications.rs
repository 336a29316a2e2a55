//! # Notifications Slice
//!
//! ```text
//! mark_read(id) on unread item  ─► is_read = true, unread_count - 1
//! mark_read(id) on read item    ─► no-op (no request, counter unchanged)
//! mark_all_read                 ─► every item read, unread_count = 0
//! unread_count never goes below zero
//! ```

use serde::Serialize;
use threadline_api::{ApiClient, NotificationFeed};
use threadline_core::Notification;
use tracing::debug;

use crate::error::StoreResult;
use crate::slice::{Slice, SliceCell};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationsOp {
    Fetch,
    MarkRead,
    MarkAllRead,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NotificationsAction {
    Pending(NotificationsOp),
    Fetched(NotificationFeed),
    MarkedRead(String),
    AllMarkedRead,
    Rejected(NotificationsOp, String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationsState {
    pub items: Vec<Notification>,
    pub unread_count: u32,
    pub loading: bool,
    pub error: Option<String>,
}

impl NotificationsState {
    fn is_unread(&self, id: &str) -> bool {
        self.items.iter().any(|n| n.id == id && !n.is_read)
    }
}

impl Slice for NotificationsState {
    type Action = NotificationsAction;

    fn reduce(&mut self, action: NotificationsAction) {
        match action {
            NotificationsAction::Pending(_) => {
                self.loading = true;
                self.error = None;
            }
            NotificationsAction::Fetched(feed) => {
                self.loading = false;
                self.items = feed.notifications;
                self.unread_count = feed.unread_count;
            }
            NotificationsAction::MarkedRead(id) => {
                self.loading = false;
                if let Some(n) = self.items.iter_mut().find(|n| n.id == id && !n.is_read) {
                    n.is_read = true;
                    self.unread_count = self.unread_count.saturating_sub(1);
                }
            }
            NotificationsAction::AllMarkedRead => {
                self.loading = false;
                self.items.iter_mut().for_each(|n| n.is_read = true);
                self.unread_count = 0;
            }
            NotificationsAction::Rejected(_, message) => {
                self.loading = false;
                self.error = Some(message);
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct NotificationsStore {
    state: SliceCell<NotificationsState>,
    api: ApiClient,
}

impl NotificationsStore {
    pub fn new(api: ApiClient) -> Self {
        NotificationsStore {
            state: SliceCell::new(),
            api,
        }
    }

    pub fn snapshot(&self) -> NotificationsState {
        self.state.snapshot()
    }

    pub fn unread_count(&self) -> u32 {
        self.state.with_state(|s| s.unread_count)
    }

    pub async fn fetch_notifications(&self) -> StoreResult<Vec<Notification>> {
        self.state
            .dispatch(NotificationsAction::Pending(NotificationsOp::Fetch));
        match self.api.notifications().list().await {
            Ok(feed) => {
                let items = feed.notifications.clone();
                self.state.dispatch(NotificationsAction::Fetched(feed));
                Ok(items)
            }
            Err(e) => {
                self.state.dispatch(NotificationsAction::Rejected(
                    NotificationsOp::Fetch,
                    e.user_message(),
                ));
                Err(e.into())
            }
        }
    }

    /// Marks one notification read. Already-read or unknown ids are a no-op.
    pub async fn mark_read(&self, id: &str) -> StoreResult<()> {
        if !self.state.with_state(|s| s.is_unread(id)) {
            debug!(notification_id = %id, "Already read, skipping");
            return Ok(());
        }

        self.state
            .dispatch(NotificationsAction::Pending(NotificationsOp::MarkRead));
        match self.api.notifications().mark_read(id).await {
            Ok(()) => {
                self.state
                    .dispatch(NotificationsAction::MarkedRead(id.to_string()));
                Ok(())
            }
            Err(e) => {
                self.state.dispatch(NotificationsAction::Rejected(
                    NotificationsOp::MarkRead,
                    e.user_message(),
                ));
                Err(e.into())
            }
        }
    }

    pub async fn mark_all_read(&self) -> StoreResult<()> {
        self.state
            .dispatch(NotificationsAction::Pending(NotificationsOp::MarkAllRead));
        match self.api.notifications().mark_all_read().await {
            Ok(()) => {
                self.state.dispatch(NotificationsAction::AllMarkedRead);
                Ok(())
            }
            Err(e) => {
                self.state.dispatch(NotificationsAction::Rejected(
                    NotificationsOp::MarkAllRead,
                    e.user_message(),
                ));
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use threadline_api::{Method, MockTransport};

    fn feed() -> Value {
        json!({
            "notifications": [
                {"_id": "n1", "title": "Order shipped", "type": "order", "isRead": false},
                {"_id": "n2", "title": "Commission earned", "type": "commission", "isRead": true}
            ],
            "unreadCount": 1
        })
    }

    #[test]
    fn test_counter_never_negative() {
        let mut state = NotificationsState::default();
        state.reduce(NotificationsAction::Fetched(
            serde_json::from_value(feed()).unwrap(),
        ));
        // Server said 1 unread; pretend it drifted to 0
        state.unread_count = 0;
        state.reduce(NotificationsAction::MarkedRead("n1".into()));
        assert_eq!(state.unread_count, 0);
    }

    #[tokio::test]
    async fn test_mark_read_decrements_once_and_is_idempotent() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .once()
            .withf(|r| r.method == Method::Get)
            .returning(|_| Ok(feed()));
        transport
            .expect_send()
            .once()
            .withf(|r| r.method == Method::Put && r.path == "/notifications/n1/read")
            .returning(|_| Ok(Value::Null));

        let store = NotificationsStore::new(ApiClient::new(Arc::new(transport)));
        store.fetch_notifications().await.unwrap();
        assert_eq!(store.unread_count(), 1);

        store.mark_read("n1").await.unwrap();
        assert_eq!(store.unread_count(), 0);

        // Second call: no request (the mock allows only one PUT), no change
        store.mark_read("n1").await.unwrap();
        assert_eq!(store.unread_count(), 0);

        // Already read from the start
        store.mark_read("n2").await.unwrap();
        assert_eq!(store.unread_count(), 0);
    }

    #[tokio::test]
    async fn test_mark_all_read() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .withf(|r| r.method == Method::Get)
            .returning(|_| Ok(feed()));
        transport
            .expect_send()
            .withf(|r| r.path == "/notifications/read-all")
            .returning(|_| Ok(Value::Null));

        let store = NotificationsStore::new(ApiClient::new(Arc::new(transport)));
        store.fetch_notifications().await.unwrap();
        store.mark_all_read().await.unwrap();

        let state = store.snapshot();
        assert_eq!(state.unread_count, 0);
        assert!(state.items.iter().all(|n| n.is_read));
    }
}
