use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Activity type written when guidance is absorbed into the dashboard.
pub const ACTIVITY_GUIDANCE_ABSORBED: &str = "guidance_absorbed";

/// One append-only entry in the owner's activity feed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActivityLogEntry {
    pub id: Uuid,
    pub owner_id: String,
    pub activity_type: String,
    pub description: String,
    /// Optional id of the record this entry refers to.
    pub reference_id: Option<Uuid>,
    pub timestamp: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl ActivityLogEntry {
    pub fn new(
        owner_id: impl Into<String>,
        activity_type: impl Into<String>,
        description: impl Into<String>,
        reference_id: Option<Uuid>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            owner_id: owner_id.into(),
            activity_type: activity_type.into(),
            description: description.into(),
            reference_id,
            timestamp: now,
            created_at: now,
        }
    }
}
