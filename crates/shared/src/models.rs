//! Data models for notifications and the REST surface that serves them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Closed set of notification categories. The category only selects a display
/// affordance on the consumer side; nothing in the client branches on it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NotificationCategory {
    Assignment,
    Submission,
    Grade,
    Enrollment,
    System,
    Course,
}

/// A notification as held by the store and returned by `GET /notifications`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRecord {
    pub id: String,
    pub category: NotificationCategory,
    pub title: String,
    /// May be empty.
    #[serde(default)]
    pub body: String,
    /// Category-specific auxiliary data. Opaque to the client; forwarded
    /// untouched to whoever renders the notification.
    #[serde(default)]
    pub payload: serde_json::Value,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

/// Payload of the `notification` push event: a record minus `isRead`
/// (delivery implies unread). `id`, `category`, `title` and `createdAt` are
/// required; a payload missing any of them fails to parse and is rejected at
/// the router boundary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PushNotification {
    pub id: String,
    pub category: NotificationCategory,
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub payload: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl PushNotification {
    pub fn into_record(self) -> NotificationRecord {
        NotificationRecord {
            id: self.id,
            category: self.category,
            title: self.title,
            body: self.body,
            payload: self.payload,
            is_read: false,
            created_at: self.created_at,
        }
    }
}

/// Audience filter for system broadcasts.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RoleFilter {
    Admin,
    Lecturer,
    Student,
}

/// Response body of `GET /notifications`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NotificationList {
    pub notifications: Vec<NotificationRecord>,
}

/// Response body of `GET /notifications/unread-count`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UnreadCount {
    pub count: u64,
}

/// Request body of `POST /notifications/system` (admin-only endpoint).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SystemBroadcast {
    pub title: String,
    pub body: String,
    /// Absent means the broadcast is unscoped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<RoleFilter>,
}
