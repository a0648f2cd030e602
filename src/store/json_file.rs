//! JSON-snapshot [`DashboardStore`] backing the CLI.
//!
//! The whole dashboard state lives in one JSON file, loaded at open and
//! rewritten after every successful mutation. Good for one local user;
//! multi-writer deployments belong on a hosted backend implementing the
//! same trait.

use std::path::{Path, PathBuf};
use std::sync::RwLock;

use anyhow::Context;
use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{ActivityLogEntry, Checklist, ChecklistItem, DocumentRecord};
use crate::Result;

use super::state::DashboardState;
use super::{DashboardStore, StoreError};

pub struct JsonFileStore {
    path: PathBuf,
    state: RwLock<DashboardState>,
}

impl JsonFileStore {
    /// Load the snapshot at `path`, or start empty when the file does not
    /// exist yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let state = if path.exists() {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read dashboard state {}", path.display()))?;
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse dashboard state {}", path.display()))?
        } else {
            DashboardState::default()
        };

        Ok(Self {
            path,
            state: RwLock::new(state),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, state: &DashboardState) -> Result<(), StoreError> {
        let content = serde_json::to_string_pretty(state)
            .context("Failed to serialize dashboard state")?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create state directory {}", parent.display())
                })?;
            }
        }
        std::fs::write(&self.path, content)
            .with_context(|| format!("Failed to write dashboard state {}", self.path.display()))?;
        Ok(())
    }

    /// Run a mutation and write the snapshot through on success.
    fn mutate<T>(
        &self,
        op: impl FnOnce(&mut DashboardState) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut state = self.state.write().unwrap();
        let value = op(&mut state)?;
        self.persist(&state)?;
        Ok(value)
    }
}

#[async_trait]
impl DashboardStore for JsonFileStore {
    async fn create_checklist(&self, owner_id: &str, name: &str) -> Result<Checklist, StoreError> {
        self.mutate(|state| state.create_checklist(owner_id, name))
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
        self.mutate(|state| state.add_checklist_items(checklist_id, texts))
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
        self.mutate(|state| state.set_item_completed(item_id, completed))
    }

    async fn set_checklist_progress(
        &self,
        checklist_id: &Uuid,
        progress: u8,
    ) -> Result<(), StoreError> {
        self.mutate(|state| state.set_checklist_progress(checklist_id, progress))
    }

    async fn create_document_entries(
        &self,
        owner_id: &str,
        names: &[String],
    ) -> Result<Vec<DocumentRecord>, StoreError> {
        self.mutate(|state| Ok(state.create_document_entries(owner_id, names)))
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
        self.mutate(|state| {
            Ok(state.log_activity(owner_id, activity_type, description, reference_id))
        })
    }

    async fn recent_activity(
        &self,
        owner_id: &str,
        limit: usize,
    ) -> Result<Vec<ActivityLogEntry>, StoreError> {
        Ok(self.state.read().unwrap().recent_activity(owner_id, limit))
    }

    async fn delete_checklist(&self, checklist_id: &Uuid) -> Result<(), StoreError> {
        self.mutate(|state| {
            state.delete_checklist(checklist_id);
            Ok(())
        })
    }

    async fn delete_document(&self, document_id: &Uuid) -> Result<(), StoreError> {
        self.mutate(|state| {
            state.delete_document(document_id);
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_state_survives_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("dashboard.json");

        {
            let store = JsonFileStore::open(&path).unwrap();
            let checklist = store.create_checklist("owner-a", "Setup").await.unwrap();
            store
                .add_checklist_items(&checklist.id, &["first".to_string()])
                .await
                .unwrap();
        }

        let reopened = JsonFileStore::open(&path).unwrap();
        let checklists = reopened.checklists_for_owner("owner-a").await.unwrap();
        assert_eq!(checklists.len(), 1);
        assert_eq!(checklists[0].name, "Setup");
        let items = reopened.items_for_checklist(&checklists[0].id).await.unwrap();
        assert_eq!(items.len(), 1);
    }

    #[tokio::test]
    async fn test_missing_file_starts_empty() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonFileStore::open(temp_dir.path().join("fresh.json")).unwrap();
        assert!(store.checklists_for_owner("owner-a").await.unwrap().is_empty());
    }
}
