//! Push-channel protocol: the event envelope and the recognized event names.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::PushNotification;

/// The only event that mutates the notification store.
pub const EVENT_NOTIFICATION: &str = "notification";

/// Side-channel event names. These carry category-specific payloads for
/// consumers that want fine-grained hooks (analytics, sounds); the server
/// also emits a generic `notification` event for anything meant for display,
/// so none of these touch the store.
pub const EVENT_NEW_ASSIGNMENT: &str = "new_assignment";
pub const EVENT_GRADE_POSTED: &str = "grade_posted";
pub const EVENT_ENROLLMENT_UPDATE: &str = "enrollment_update";
pub const EVENT_SYSTEM_MESSAGE: &str = "system_message";

pub const SIDE_CHANNEL_EVENTS: [&str; 4] = [
    EVENT_NEW_ASSIGNMENT,
    EVENT_GRADE_POSTED,
    EVENT_ENROLLMENT_UPDATE,
    EVENT_SYSTEM_MESSAGE,
];

/// Envelope wrapping every frame on the channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WsEnvelope<T> {
    pub id: String,
    #[serde(flatten)]
    pub payload: T,
    pub ts: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
}

/// An inbound event before typed parsing. The router matches on `event`
/// first so an unknown name can be ignored without touching `data`, and a
/// known name with bad `data` can be rejected with a useful error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEvent {
    pub event: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

impl RawEvent {
    /// Parse the `data` of a `notification` event. Only meaningful when
    /// `event == EVENT_NOTIFICATION`.
    pub fn notification(&self) -> Result<PushNotification, serde_json::Error> {
        serde_json::from_value(self.data.clone())
    }

    pub fn is_side_channel(&self) -> bool {
        SIDE_CHANNEL_EVENTS.contains(&self.event.as_str())
    }
}
