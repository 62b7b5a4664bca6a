//! To-do item record.
//!
//! # Invariants
//! - `id` is generated once and never reused for another item.
//! - `text` and `created_at` never change after creation.
//! - Wire field names are `id`, `text`, `completed`, `createdAt`.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of a to-do item. Serialized as a hyphenated string.
pub type TodoId = Uuid;

/// One user task with its completion flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoItem {
    pub id: TodoId,
    /// User label. Empty strings are allowed.
    pub text: String,
    pub completed: bool,
    /// Unix epoch milliseconds.
    pub created_at: i64,
}

impl TodoItem {
    /// Creates an open item with a freshly generated id.
    pub fn new(text: impl Into<String>, created_at: i64) -> Self {
        Self::with_id(Uuid::new_v4(), text, created_at)
    }

    /// Creates an open item with a caller-provided id.
    pub fn with_id(id: TodoId, text: impl Into<String>, created_at: i64) -> Self {
        Self {
            id,
            text: text.into(),
            completed: false,
            created_at,
        }
    }

    /// Flips the completion flag and returns the new value.
    pub fn toggle(&mut self) -> bool {
        self.completed = !self.completed;
        self.completed
    }
}
