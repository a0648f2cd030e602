//! In-memory [`DashboardStore`] implementation for tests and embedding.
//!
//! Records live in a [`DashboardState`] behind `std::sync::RwLock`; every
//! operation returns an immediately-ready future.

use std::sync::RwLock;

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{ActivityLogEntry, Checklist, ChecklistItem, DocumentRecord};

use super::state::DashboardState;
use super::{DashboardStore, StoreError};

#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<DashboardState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DashboardStore for MemoryStore {
    async fn create_checklist(&self, owner_id: &str, name: &str) -> Result<Checklist, StoreError> {
        self.state.write().unwrap().create_checklist(owner_id, name)
    }

    async fn checklist_by_name(
        &self,
        owner_id: &str,
        name: &str,
    ) -> Result<Option<Checklist>, StoreError> {
        Ok(self.state.read().unwrap().checklist_by_name(owner_id, name))
    }

    async fn checklists_for_owner(&self, owner_id: &str) -> Result<Vec<Checklist>, StoreError> {
        Ok(self.state.read().unwrap().checklists_for_owner(owner_id))
    }

    async fn add_checklist_items(
        &self,
        checklist_id: &Uuid,
        texts: &[String],
    ) -> Result<Vec<ChecklistItem>, StoreError> {
        self.state
            .write()
            .unwrap()
            .add_checklist_items(checklist_id, texts)
    }

    async fn items_for_checklist(
        &self,
        checklist_id: &Uuid,
    ) -> Result<Vec<ChecklistItem>, StoreError> {
        Ok(self.state.read().unwrap().items_for_checklist(checklist_id))
    }

    async fn set_item_completed(
        &self,
        item_id: &Uuid,
        completed: bool,
    ) -> Result<ChecklistItem, StoreError> {
        self.state
            .write()
            .unwrap()
            .set_item_completed(item_id, completed)
    }

    async fn set_checklist_progress(
        &self,
        checklist_id: &Uuid,
        progress: u8,
    ) -> Result<(), StoreError> {
        self.state
            .write()
            .unwrap()
            .set_checklist_progress(checklist_id, progress)
    }

    async fn create_document_entries(
        &self,
        owner_id: &str,
        names: &[String],
    ) -> Result<Vec<DocumentRecord>, StoreError> {
        Ok(self
            .state
            .write()
            .unwrap()
            .create_document_entries(owner_id, names))
    }

    async fn documents_for_owner(
        &self,
        owner_id: &str,
    ) -> Result<Vec<DocumentRecord>, StoreError> {
        Ok(self.state.read().unwrap().documents_for_owner(owner_id))
    }

    async fn log_activity(
        &self,
        owner_id: &str,
        activity_type: &str,
        description: &str,
        reference_id: Option<Uuid>,
    ) -> Result<ActivityLogEntry, StoreError> {
        Ok(self.state.write().unwrap().log_activity(
            owner_id,
            activity_type,
            description,
            reference_id,
        ))
    }

    async fn recent_activity(
        &self,
        owner_id: &str,
        limit: usize,
    ) -> Result<Vec<ActivityLogEntry>, StoreError> {
        Ok(self.state.read().unwrap().recent_activity(owner_id, limit))
    }

    async fn delete_checklist(&self, checklist_id: &Uuid) -> Result<(), StoreError> {
        self.state.write().unwrap().delete_checklist(checklist_id);
        Ok(())
    }

    async fn delete_document(&self, document_id: &Uuid) -> Result<(), StoreError> {
        self.state.write().unwrap().delete_document(document_id);
        Ok(())
    }
}
