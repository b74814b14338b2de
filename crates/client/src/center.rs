//! Per-session owner of the notification subsystem.
//!
//! A `NotificationCenter` is created when a user session mounts with valid
//! credentials and discarded on logout. It wires the channel into the
//! router, seeds the store from the REST snapshot, and exposes the
//! read-state operations the panel calls.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use campushub_shared::{ApiError, NotificationRecord, RoleFilter};
use tokio::sync::watch;

use crate::api_client::ApiClient;
use crate::channel::{ChannelManager, ConnectionState};
use crate::reconcile::ReconciliationClient;
use crate::router::{EventRouter, NoopHooks, NotificationHooks};
use crate::store::SharedStore;

#[derive(Debug, Clone)]
pub struct CenterConfig {
    /// Base URL of the REST API, e.g. `https://lms.example.edu/api`.
    pub api_base: String,
    /// Websocket URL of the notifications namespace,
    /// e.g. `wss://lms.example.edu/ws/notifications`.
    pub channel_url: String,
    /// Bearer token. Empty means unauthenticated; the center stays idle.
    pub token: String,
    /// Identity the session belongs to; a different user means a different
    /// center, never a reused one.
    pub user_id: String,
}

pub struct NotificationCenter {
    config: CenterConfig,
    store: SharedStore,
    channel: tokio::sync::Mutex<ChannelManager>,
    reconcile: ReconciliationClient,
    /// Bumped on shutdown so a snapshot that resolves after teardown cannot
    /// seed a store the session no longer owns.
    generation: Arc<AtomicU64>,
}

impl NotificationCenter {
    pub fn new(config: CenterConfig) -> Self {
        Self::with_hooks(config, Arc::new(NoopHooks))
    }

    pub fn with_hooks(config: CenterConfig, hooks: Arc<dyn NotificationHooks>) -> Self {
        let store = SharedStore::new();
        let router = Arc::new(EventRouter::new(store.clone(), hooks));
        let channel = ChannelManager::new(config.channel_url.clone(), move |event| {
            router.route(event)
        });
        let api = ApiClient::new()
            .with_base_url(config.api_base.clone())
            .with_token(config.token.clone());
        let reconcile = ReconciliationClient::new(api, store.clone());
        Self {
            config,
            store,
            channel: tokio::sync::Mutex::new(channel),
            reconcile,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Connect the channel and seed the store from the snapshot.
    ///
    /// Without a token this does nothing. A failed connect leaves the
    /// channel `Disconnected` but the snapshot is still attempted: a stale
    /// list beats an empty panel. A failed snapshot leaves the store as it
    /// was. Neither failure bubbles past this call.
    pub async fn start(&self) {
        if self.config.token.is_empty() {
            tracing::debug!("no credentials, notification center stays idle");
            return;
        }

        {
            let mut channel = self.channel.lock().await;
            if let Err(e) = channel.connect(&self.config.token, &self.config.user_id).await {
                tracing::error!("notification channel connect failed: {}", e);
            }
        }

        let generation = self.generation.load(Ordering::SeqCst);
        match self.reconcile.fetch_snapshot().await {
            Ok((records, count)) => {
                if self.generation.load(Ordering::SeqCst) != generation {
                    tracing::debug!("session torn down during snapshot fetch, discarding");
                    return;
                }
                self.store.lock().seed(records, count);
            }
            Err(e) => tracing::error!("notification snapshot fetch failed: {}", e),
        }
    }

    /// Tear the session down. Idempotent.
    pub async fn shutdown(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.channel.lock().await.disconnect().await;
    }

    pub async fn mark_read(&self, id: &str) {
        self.reconcile.request_mark_read(id).await;
    }

    pub async fn mark_all_read(&self) {
        self.reconcile.request_mark_all_read().await;
    }

    pub async fn send_test_notification(&self) -> Result<(), ApiError> {
        self.reconcile.send_test_notification().await
    }

    pub async fn broadcast_system_message(
        &self,
        title: impl Into<String>,
        body: impl Into<String>,
        role: Option<RoleFilter>,
    ) -> Result<(), ApiError> {
        self.reconcile.broadcast_system_message(title, body, role).await
    }

    /// Snapshot of the current records, display order.
    pub fn records(&self) -> Vec<NotificationRecord> {
        self.store.lock().records().to_vec()
    }

    pub fn unread_count(&self) -> u64 {
        self.store.lock().unread_count()
    }

    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    /// Connection-state subscription for a status indicator.
    pub async fn connection_state(&self) -> watch::Receiver<ConnectionState> {
        self.channel.lock().await.state()
    }
}
