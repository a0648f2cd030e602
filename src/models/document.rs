use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Metadata status for a document that absorption flagged as required but
/// the owner has not uploaded yet.
pub const DOCUMENT_STATUS_REQUIRED: &str = "Required";

/// A document tracked on the dashboard.
///
/// Absorption creates these with `file_path = None`, meaning "required but
/// not yet uploaded". The upload flow fills in `file_path` later.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocumentRecord {
    pub id: Uuid,
    pub owner_id: String,
    pub name: String,
    pub document_type: String,
    pub upload_date: DateTime<Utc>,
    pub file_path: Option<String>,
    pub metadata: DocumentMetadata,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocumentMetadata {
    pub status: String,
    pub description: String,
}

impl DocumentRecord {
    /// Build a placeholder record for a document named in absorbed guidance.
    pub fn required(owner_id: impl Into<String>, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            owner_id: owner_id.into(),
            name: name.into(),
            document_type: "Required Document".to_string(),
            upload_date: now,
            file_path: None,
            metadata: DocumentMetadata {
                status: DOCUMENT_STATUS_REQUIRED.to_string(),
                description: "Required document from compliance guidance".to_string(),
            },
            created_at: now,
            updated_at: now,
        }
    }

    /// A record is pending while no file has been uploaded for it.
    pub fn is_pending(&self) -> bool {
        self.file_path.is_none()
    }
}
