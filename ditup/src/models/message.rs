//! Message model: a message edge from sender to receiver.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A message sent from one user to another.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Time-ordered unique identifier.
    pub id: Uuid,
    /// Username of the sender.
    pub from: String,
    /// Username of the receiver.
    pub to: String,
    /// Message text.
    pub body: String,
    /// Whether the receiver has read the message.
    pub read: bool,
    /// When the message was sent.
    pub created: DateTime<Utc>,
}

impl Message {
    /// Create a new unread message (id is a fresh UUIDv7).
    pub fn new(from: String, to: String, body: String) -> Self {
        Self {
            id: Uuid::now_v7(),
            from,
            to,
            body,
            read: false,
            created: Utc::now(),
        }
    }

    /// The other participant of the thread, seen from `username`.
    pub fn counterpart(&self, username: &str) -> &str {
        if self.from == username {
            &self.to
        } else {
            &self.from
        }
    }
}
