use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named checklist owned by one user.
///
/// `name` is the reconciliation key: absorption never creates a second
/// checklist with the same name for the same owner. The storage layer
/// backs this up with a `(owner_id, name)` uniqueness guarantee.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Checklist {
    pub id: Uuid,
    pub owner_id: String,
    pub name: String,
    /// Completion percentage, 0-100. Recomputed as items are completed.
    pub progress: u8,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Checklist {
    pub fn new(owner_id: impl Into<String>, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            owner_id: owner_id.into(),
            name: name.into(),
            progress: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

/// One row of a checklist.
///
/// Created with `completed = false` at absorption time; flipped later by
/// user interaction. `order_index` preserves the source list order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChecklistItem {
    pub id: Uuid,
    pub checklist_id: Uuid,
    pub text: String,
    pub completed: bool,
    pub order_index: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ChecklistItem {
    pub fn new(checklist_id: Uuid, text: impl Into<String>, order_index: u32) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            checklist_id,
            text: text.into(),
            completed: false,
            order_index,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A checklist together with its items, ordered by `order_index`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChecklistWithItems {
    pub checklist: Checklist,
    pub items: Vec<ChecklistItem>,
}
