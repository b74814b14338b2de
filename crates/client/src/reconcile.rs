//! Bridges store mutations to the REST endpoints.
//!
//! Read-state changes are applied to the store first and persisted after
//! (optimistic update). A rejected PATCH is logged and NOT rolled back; the
//! UI keeps the optimistic state. The server copy can only be realigned by
//! a fresh snapshot.

use campushub_shared::{
    ApiError, NotificationList, NotificationRecord, RoleFilter, SystemBroadcast, UnreadCount,
};

use crate::api_client::ApiClient;
use crate::store::SharedStore;

pub struct ReconciliationClient {
    api: ApiClient,
    store: SharedStore,
}

impl ReconciliationClient {
    pub fn new(api: ApiClient, store: SharedStore) -> Self {
        Self { api, store }
    }

    /// Fetch the record list and the unread count.
    ///
    /// Two independent calls; the server may change between them, so the
    /// pair is not transactionally consistent. The caller seeds the store
    /// with whatever pair it gets and the next push or snapshot corrects
    /// any skew.
    pub async fn fetch_snapshot(&self) -> Result<(Vec<NotificationRecord>, u64), ApiError> {
        let list: NotificationList = self.api.get_json("/notifications").await?;
        let count: UnreadCount = self.api.get_json("/notifications/unread-count").await?;
        Ok((list.notifications, count.count))
    }

    /// Mark one notification read: store first, then persist.
    pub async fn request_mark_read(&self, id: &str) {
        self.store.lock().mark_read(id);
        if let Err(e) = self.api.patch_empty(&format!("/notifications/{id}/read")).await {
            tracing::warn!(%id, "failed to persist mark-read: {}", e);
        }
    }

    /// Mark everything read: store first, then one bulk PATCH.
    pub async fn request_mark_all_read(&self) {
        self.store.lock().mark_all_read();
        if let Err(e) = self.api.patch_empty("/notifications/mark-all-read").await {
            tracing::warn!("failed to persist mark-all-read: {}", e);
        }
    }

    /// Ask the server to deliver a synthetic notification to self.
    /// Test/demo aid; the notification arrives over the push channel like
    /// any other.
    pub async fn send_test_notification(&self) -> Result<(), ApiError> {
        self.api.post_empty("/notifications/test").await
    }

    /// Broadcast a system message, optionally scoped to one role.
    /// The endpoint is admin-only; authorization is the server's call.
    pub async fn broadcast_system_message(
        &self,
        title: impl Into<String>,
        body: impl Into<String>,
        role: Option<RoleFilter>,
    ) -> Result<(), ApiError> {
        let broadcast = SystemBroadcast {
            title: title.into(),
            body: body.into(),
            role,
        };
        self.api.post_json("/notifications/system", &broadcast).await
    }
}
