//! Demultiplexes inbound push events by name.
//!
//! Only the generic `notification` event mutates the store. The four
//! category-specific events are side-channel signals for consumers that want
//! fine-grained hooks without parsing record payloads; the server emits a
//! matching `notification` event for anything meant for display.

use std::sync::Arc;

use campushub_shared::{NotificationRecord, RawEvent, EVENT_NOTIFICATION};

use crate::store::SharedStore;

/// Callbacks the router fires outside the store.
///
/// `on_delivered` fires after a pushed record is inserted; this is where an
/// OS-level notification or a sound belongs, kept out of the store itself.
/// `on_side_channel` fires for the informational event names and never
/// implies a store change.
pub trait NotificationHooks: Send + Sync {
    fn on_delivered(&self, record: &NotificationRecord) {
        let _ = record;
    }

    fn on_side_channel(&self, event: &str, payload: &serde_json::Value) {
        let _ = (event, payload);
    }
}

/// Default hooks implementation that does nothing.
pub struct NoopHooks;

impl NotificationHooks for NoopHooks {}

pub struct EventRouter {
    store: SharedStore,
    hooks: Arc<dyn NotificationHooks>,
}

impl EventRouter {
    pub fn new(store: SharedStore, hooks: Arc<dyn NotificationHooks>) -> Self {
        Self { store, hooks }
    }

    /// Dispatch one inbound event.
    ///
    /// Unrecognized names are ignored. A `notification` event whose data is
    /// missing a required field fails closed: nothing reaches the store.
    pub fn route(&self, event: RawEvent) {
        if event.event == EVENT_NOTIFICATION {
            let push = match event.notification() {
                Ok(push) => push,
                Err(e) => {
                    tracing::warn!("rejecting malformed notification payload: {}", e);
                    return;
                }
            };
            let record = push.into_record();
            let inserted = self.store.lock().insert(record.clone());
            if inserted {
                self.hooks.on_delivered(&record);
            } else {
                tracing::debug!(id = %record.id, "duplicate notification delivery");
            }
        } else if event.is_side_channel() {
            tracing::info!(event = %event.event, "side-channel event");
            self.hooks.on_side_channel(&event.event, &event.data);
        } else {
            tracing::debug!(event = %event.event, "ignoring unrecognized event");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campushub_shared::{EVENT_GRADE_POSTED, EVENT_NEW_ASSIGNMENT};
    use std::sync::Mutex;

    fn notification_event(id: &str) -> RawEvent {
        RawEvent {
            event: EVENT_NOTIFICATION.to_string(),
            data: serde_json::json!({
                "id": id,
                "category": "grade",
                "title": "Grade posted",
                "createdAt": "2026-01-15T09:30:00Z"
            }),
        }
    }

    #[derive(Default)]
    struct RecordingHooks {
        delivered: Mutex<Vec<String>>,
        side_channel: Mutex<Vec<String>>,
    }

    impl NotificationHooks for RecordingHooks {
        fn on_delivered(&self, record: &NotificationRecord) {
            self.delivered.lock().unwrap().push(record.id.clone());
        }

        fn on_side_channel(&self, event: &str, _payload: &serde_json::Value) {
            self.side_channel.lock().unwrap().push(event.to_string());
        }
    }

    #[test]
    fn notification_event_inserts_and_fires_hook() {
        let store = SharedStore::new();
        let hooks = Arc::new(RecordingHooks::default());
        let router = EventRouter::new(store.clone(), hooks.clone());

        router.route(notification_event("n1"));

        let guard = store.lock();
        assert_eq!(guard.len(), 1);
        assert_eq!(guard.unread_count(), 1);
        assert!(!guard.records()[0].is_read);
        drop(guard);

        assert_eq!(*hooks.delivered.lock().unwrap(), vec!["n1".to_string()]);
    }

    #[test]
    fn duplicate_delivery_skips_the_hook() {
        let store = SharedStore::new();
        let hooks = Arc::new(RecordingHooks::default());
        let router = EventRouter::new(store.clone(), hooks.clone());

        router.route(notification_event("n1"));
        router.route(notification_event("n1"));

        assert_eq!(store.lock().len(), 1);
        assert_eq!(hooks.delivered.lock().unwrap().len(), 1);
    }

    #[test]
    fn unrecognized_event_leaves_store_unchanged() {
        let store = SharedStore::new();
        let router = EventRouter::new(store.clone(), Arc::new(NoopHooks));

        router.route(notification_event("n1"));
        let before = store.lock().clone();

        router.route(RawEvent {
            event: "presence_update".to_string(),
            data: serde_json::json!({"user": "alice"}),
        });

        assert_eq!(*store.lock(), before);
    }

    #[test]
    fn malformed_notification_is_rejected() {
        let store = SharedStore::new();
        let router = EventRouter::new(store.clone(), Arc::new(NoopHooks));

        // Missing title and createdAt.
        router.route(RawEvent {
            event: EVENT_NOTIFICATION.to_string(),
            data: serde_json::json!({"id": "n9", "category": "system"}),
        });

        assert!(store.lock().is_empty());
        assert_eq!(store.lock().unread_count(), 0);
    }

    #[test]
    fn side_channel_events_reach_hooks_not_the_store() {
        let store = SharedStore::new();
        let hooks = Arc::new(RecordingHooks::default());
        let router = EventRouter::new(store.clone(), hooks.clone());

        router.route(RawEvent {
            event: EVENT_NEW_ASSIGNMENT.to_string(),
            data: serde_json::json!({"assignmentId": "a1"}),
        });
        router.route(RawEvent {
            event: EVENT_GRADE_POSTED.to_string(),
            data: serde_json::json!({"grade": 92}),
        });

        assert!(store.lock().is_empty());
        assert_eq!(
            *hooks.side_channel.lock().unwrap(),
            vec![EVENT_NEW_ASSIGNMENT.to_string(), EVENT_GRADE_POSTED.to_string()]
        );
    }
}
