//! CampusHub notification client.
//!
//! The browser-facing LMS keeps its notification panel fed by two surfaces:
//! a persistent push channel for live delivery and a small REST API for the
//! initial snapshot and read-state persistence. This crate owns that glue:
//!
//! - [`channel::ChannelManager`] — lifecycle of the push connection
//! - [`router::EventRouter`] — demultiplexes inbound events by name
//! - [`store::NotificationStore`] — ordered records plus the unread counter
//! - [`reconcile::ReconciliationClient`] — snapshot fetch and optimistic
//!   read-state persistence
//! - [`center::NotificationCenter`] — per-session owner wiring the above
//!
//! Rendering, routing and everything else UI-shaped lives in the consumer;
//! components read the store and subscribe to the connection state, they do
//! not talk to the channel directly.

pub mod api_client;
pub mod center;
pub mod channel;
pub mod reconcile;
pub mod router;
pub mod store;

pub use api_client::ApiClient;
pub use center::{CenterConfig, NotificationCenter};
pub use channel::{ChannelManager, ConnectionState};
pub use reconcile::ReconciliationClient;
pub use router::{EventRouter, NoopHooks, NotificationHooks};
pub use store::{NotificationStore, SharedStore};
