//! Shared record shelves behind the in-process store implementations.
//!
//! Both [`MemoryStore`](super::MemoryStore) and
//! [`JsonFileStore`](super::JsonFileStore) keep their records in this
//! structure; the file store additionally serializes it to disk after
//! every mutation.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{ActivityLogEntry, Checklist, ChecklistItem, DocumentRecord};

use super::StoreError;

#[derive(Debug, Default, Serialize, Deserialize)]
pub(super) struct DashboardState {
    pub checklists: Vec<Checklist>,
    pub items: Vec<ChecklistItem>,
    pub documents: Vec<DocumentRecord>,
    pub activity: Vec<ActivityLogEntry>,
}

impl DashboardState {
    pub fn create_checklist(&mut self, owner_id: &str, name: &str) -> Result<Checklist, StoreError> {
        if self
            .checklists
            .iter()
            .any(|c| c.owner_id == owner_id && c.name == name)
        {
            return Err(StoreError::NameConflict {
                owner_id: owner_id.to_string(),
                name: name.to_string(),
            });
        }
        let checklist = Checklist::new(owner_id, name);
        self.checklists.push(checklist.clone());
        Ok(checklist)
    }

    pub fn checklist_by_name(&self, owner_id: &str, name: &str) -> Option<Checklist> {
        self.checklists
            .iter()
            .find(|c| c.owner_id == owner_id && c.name == name)
            .cloned()
    }

    pub fn checklists_for_owner(&self, owner_id: &str) -> Vec<Checklist> {
        let mut checklists: Vec<Checklist> = self
            .checklists
            .iter()
            .filter(|c| c.owner_id == owner_id)
            .cloned()
            .collect();
        checklists.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        checklists
    }

    pub fn add_checklist_items(
        &mut self,
        checklist_id: &Uuid,
        texts: &[String],
    ) -> Result<Vec<ChecklistItem>, StoreError> {
        if !self.checklists.iter().any(|c| c.id == *checklist_id) {
            return Err(StoreError::NotFound {
                entity: "checklist",
                id: checklist_id.to_string(),
            });
        }
        let items: Vec<ChecklistItem> = texts
            .iter()
            .enumerate()
            .map(|(index, text)| ChecklistItem::new(*checklist_id, text, index as u32))
            .collect();
        self.items.extend(items.iter().cloned());
        Ok(items)
    }

    pub fn items_for_checklist(&self, checklist_id: &Uuid) -> Vec<ChecklistItem> {
        let mut items: Vec<ChecklistItem> = self
            .items
            .iter()
            .filter(|i| i.checklist_id == *checklist_id)
            .cloned()
            .collect();
        items.sort_by_key(|i| i.order_index);
        items
    }

    pub fn set_item_completed(
        &mut self,
        item_id: &Uuid,
        completed: bool,
    ) -> Result<ChecklistItem, StoreError> {
        let item = self
            .items
            .iter_mut()
            .find(|i| i.id == *item_id)
            .ok_or_else(|| StoreError::NotFound {
                entity: "checklist item",
                id: item_id.to_string(),
            })?;
        item.completed = completed;
        item.updated_at = Utc::now();
        Ok(item.clone())
    }

    pub fn set_checklist_progress(
        &mut self,
        checklist_id: &Uuid,
        progress: u8,
    ) -> Result<(), StoreError> {
        let checklist = self
            .checklists
            .iter_mut()
            .find(|c| c.id == *checklist_id)
            .ok_or_else(|| StoreError::NotFound {
                entity: "checklist",
                id: checklist_id.to_string(),
            })?;
        checklist.progress = progress.min(100);
        checklist.updated_at = Utc::now();
        Ok(())
    }

    pub fn create_document_entries(&mut self, owner_id: &str, names: &[String]) -> Vec<DocumentRecord> {
        let documents: Vec<DocumentRecord> = names
            .iter()
            .map(|name| DocumentRecord::required(owner_id, name))
            .collect();
        self.documents.extend(documents.iter().cloned());
        documents
    }

    pub fn documents_for_owner(&self, owner_id: &str) -> Vec<DocumentRecord> {
        let mut documents: Vec<DocumentRecord> = self
            .documents
            .iter()
            .filter(|d| d.owner_id == owner_id)
            .cloned()
            .collect();
        documents.sort_by(|a, b| b.upload_date.cmp(&a.upload_date));
        documents
    }

    pub fn log_activity(
        &mut self,
        owner_id: &str,
        activity_type: &str,
        description: &str,
        reference_id: Option<Uuid>,
    ) -> ActivityLogEntry {
        let entry = ActivityLogEntry::new(owner_id, activity_type, description, reference_id);
        self.activity.push(entry.clone());
        entry
    }

    pub fn recent_activity(&self, owner_id: &str, limit: usize) -> Vec<ActivityLogEntry> {
        let mut entries: Vec<ActivityLogEntry> = self
            .activity
            .iter()
            .filter(|a| a.owner_id == owner_id)
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        entries.truncate(limit);
        entries
    }

    /// Remove a checklist and cascade to its items.
    pub fn delete_checklist(&mut self, checklist_id: &Uuid) {
        self.checklists.retain(|c| c.id != *checklist_id);
        self.items.retain(|i| i.checklist_id != *checklist_id);
    }

    pub fn delete_document(&mut self, document_id: &Uuid) {
        self.documents.retain(|d| d.id != *document_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_conflict_per_owner() {
        let mut state = DashboardState::default();
        state.create_checklist("owner-a", "Compliance Dashboard").unwrap();

        let conflict = state.create_checklist("owner-a", "Compliance Dashboard");
        assert!(matches!(conflict, Err(StoreError::NameConflict { .. })));

        // A different owner can reuse the name.
        assert!(state.create_checklist("owner-b", "Compliance Dashboard").is_ok());
    }

    #[test]
    fn test_items_sorted_by_order_index() {
        let mut state = DashboardState::default();
        let checklist = state.create_checklist("owner-a", "Setup").unwrap();
        let texts = vec!["first".to_string(), "second".to_string(), "third".to_string()];
        state.add_checklist_items(&checklist.id, &texts).unwrap();

        let items = state.items_for_checklist(&checklist.id);
        let order: Vec<u32> = items.iter().map(|i| i.order_index).collect();
        assert_eq!(order, vec![0, 1, 2]);
        assert_eq!(items[2].text, "third");
    }

    #[test]
    fn test_delete_checklist_cascades() {
        let mut state = DashboardState::default();
        let checklist = state.create_checklist("owner-a", "Setup").unwrap();
        state
            .add_checklist_items(&checklist.id, &["only".to_string()])
            .unwrap();

        state.delete_checklist(&checklist.id);
        assert!(state.checklists.is_empty());
        assert!(state.items.is_empty());
    }

    #[test]
    fn test_add_items_requires_checklist() {
        let mut state = DashboardState::default();
        let result = state.add_checklist_items(&Uuid::new_v4(), &["orphan".to_string()]);
        assert!(matches!(result, Err(StoreError::NotFound { .. })));
    }
}
