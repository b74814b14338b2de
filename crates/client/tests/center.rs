//! Session-level tests for the notification center.

use campushub_client::{CenterConfig, NotificationCenter};

fn config(api_base: String, token: &str) -> CenterConfig {
    CenterConfig {
        api_base,
        // Nothing listens here; the REST path must survive a dead channel.
        channel_url: "ws://127.0.0.1:1/ws/notifications".to_string(),
        token: token.to_string(),
        user_id: "alice".to_string(),
    }
}

#[tokio::test]
async fn stays_idle_without_a_token() {
    let mut server = mockito::Server::new_async().await;
    let list = server
        .mock("GET", "/notifications")
        .with_status(200)
        .with_body(r#"{"notifications": []}"#)
        .expect(0)
        .create_async()
        .await;

    let center = NotificationCenter::new(config(server.url(), ""));
    center.start().await;

    assert!(center.records().is_empty());
    assert_eq!(center.unread_count(), 0);
    list.assert_async().await;
}

#[tokio::test]
async fn seeds_store_even_when_the_channel_is_down() {
    let mut server = mockito::Server::new_async().await;
    let _list = server
        .mock("GET", "/notifications")
        .with_status(200)
        .with_body(
            serde_json::json!({
                "notifications": [{
                    "id": "a",
                    "category": "course",
                    "title": "Course published",
                    "isRead": false,
                    "createdAt": "2026-01-15T09:30:00Z"
                }]
            })
            .to_string(),
        )
        .create_async()
        .await;
    let _count = server
        .mock("GET", "/notifications/unread-count")
        .with_status(200)
        .with_body(r#"{"count": 1}"#)
        .create_async()
        .await;

    let center = NotificationCenter::new(config(server.url(), "token-1"));
    center.start().await;

    assert_eq!(center.records().len(), 1);
    assert_eq!(center.unread_count(), 1);
    assert!(!center.connection_state().await.borrow().is_connected());
}

#[tokio::test]
async fn mark_read_flows_through_to_the_endpoint() {
    let mut server = mockito::Server::new_async().await;
    let _list = server
        .mock("GET", "/notifications")
        .with_status(200)
        .with_body(
            serde_json::json!({
                "notifications": [{
                    "id": "a",
                    "category": "submission",
                    "title": "Submission received",
                    "isRead": false,
                    "createdAt": "2026-01-15T09:30:00Z"
                }]
            })
            .to_string(),
        )
        .create_async()
        .await;
    let _count = server
        .mock("GET", "/notifications/unread-count")
        .with_status(200)
        .with_body(r#"{"count": 1}"#)
        .create_async()
        .await;
    let patch = server
        .mock("PATCH", "/notifications/a/read")
        .with_status(204)
        .create_async()
        .await;

    let center = NotificationCenter::new(config(server.url(), "token-1"));
    center.start().await;
    center.mark_read("a").await;

    assert_eq!(center.unread_count(), 0);
    assert!(center.records()[0].is_read);
    patch.assert_async().await;

    center.shutdown().await;
    // Idempotent.
    center.shutdown().await;
}
