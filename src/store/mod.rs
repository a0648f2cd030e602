//! Storage abstraction for the dashboard backend.
//!
//! The persistence backend is an external collaborator; the
//! [`DashboardStore`] trait is the seam. All operations are async (via
//! `async-trait`) and implementations must be `Send + Sync`. The
//! in-process implementations here back tests and the CLI; a hosted
//! backend would implement the same trait.
//!
//! `create_checklist` enforces `(owner_id, name)` uniqueness and reports
//! violations as [`StoreError::NameConflict`], which the absorption
//! pipeline treats as the already-absorbed signal even when two calls
//! race past the upfront name check.

pub mod json_file;
pub mod memory;
mod state;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{ActivityLogEntry, Checklist, ChecklistItem, DocumentRecord};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("checklist {name:?} already exists for owner {owner_id}")]
    NameConflict { owner_id: String, name: String },

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    #[error("storage backend error: {0}")]
    Backend(#[from] anyhow::Error),
}

/// Abstract dashboard storage.
#[async_trait]
pub trait DashboardStore: Send + Sync {
    /// Create a checklist. Fails with [`StoreError::NameConflict`] when
    /// the owner already has a checklist with this name.
    async fn create_checklist(&self, owner_id: &str, name: &str) -> Result<Checklist, StoreError>;

    /// Look up a checklist by exact name.
    async fn checklist_by_name(
        &self,
        owner_id: &str,
        name: &str,
    ) -> Result<Option<Checklist>, StoreError>;

    /// All checklists for an owner, newest first.
    async fn checklists_for_owner(&self, owner_id: &str) -> Result<Vec<Checklist>, StoreError>;

    /// Bulk-create items for a checklist; `order_index` follows the slice
    /// order.
    async fn add_checklist_items(
        &self,
        checklist_id: &Uuid,
        texts: &[String],
    ) -> Result<Vec<ChecklistItem>, StoreError>;

    /// Items of a checklist, ordered by `order_index`.
    async fn items_for_checklist(
        &self,
        checklist_id: &Uuid,
    ) -> Result<Vec<ChecklistItem>, StoreError>;

    /// Flip one item's completion flag, returning the updated item.
    async fn set_item_completed(
        &self,
        item_id: &Uuid,
        completed: bool,
    ) -> Result<ChecklistItem, StoreError>;

    /// Overwrite a checklist's completion percentage.
    async fn set_checklist_progress(
        &self,
        checklist_id: &Uuid,
        progress: u8,
    ) -> Result<(), StoreError>;

    /// Bulk-create placeholder records for required documents.
    async fn create_document_entries(
        &self,
        owner_id: &str,
        names: &[String],
    ) -> Result<Vec<DocumentRecord>, StoreError>;

    /// All documents for an owner, newest upload date first.
    async fn documents_for_owner(&self, owner_id: &str)
        -> Result<Vec<DocumentRecord>, StoreError>;

    /// Append one entry to the owner's activity feed.
    async fn log_activity(
        &self,
        owner_id: &str,
        activity_type: &str,
        description: &str,
        reference_id: Option<Uuid>,
    ) -> Result<ActivityLogEntry, StoreError>;

    /// Newest activity entries for an owner, up to `limit`.
    async fn recent_activity(
        &self,
        owner_id: &str,
        limit: usize,
    ) -> Result<Vec<ActivityLogEntry>, StoreError>;

    /// Delete a checklist and all its items. Used by absorption to undo a
    /// partially-written batch; not exposed as a user operation.
    async fn delete_checklist(&self, checklist_id: &Uuid) -> Result<(), StoreError>;

    /// Delete a document record. Same undo-only role as
    /// [`delete_checklist`](DashboardStore::delete_checklist).
    async fn delete_document(&self, document_id: &Uuid) -> Result<(), StoreError>;
}

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;
