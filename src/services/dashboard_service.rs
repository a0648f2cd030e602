//! Dashboard maintenance - reads and small mutations on absorbed state.

use uuid::Uuid;

use crate::models::{ChecklistItem, ChecklistWithItems, DocumentRecord};
use crate::store::{DashboardStore, StoreError};

/// Progress of one checklist after an item flip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecklistProgress {
    pub checklist_id: Uuid,
    pub progress: u8,
}

/// All checklists for an owner with their ordered items, newest checklist
/// first.
pub async fn checklist_overview(
    store: &dyn DashboardStore,
    owner_id: &str,
) -> Result<Vec<ChecklistWithItems>, StoreError> {
    let mut overview = Vec::new();
    for checklist in store.checklists_for_owner(owner_id).await? {
        let items = store.items_for_checklist(&checklist.id).await?;
        overview.push(ChecklistWithItems { checklist, items });
    }
    Ok(overview)
}

/// Flip one item's completion flag and recompute the owning checklist's
/// progress percentage.
pub async fn complete_item(
    store: &dyn DashboardStore,
    item_id: &Uuid,
    completed: bool,
) -> Result<ChecklistProgress, StoreError> {
    let item = store.set_item_completed(item_id, completed).await?;
    let items = store.items_for_checklist(&item.checklist_id).await?;
    let progress = percent_complete(&items);
    store
        .set_checklist_progress(&item.checklist_id, progress)
        .await?;
    Ok(ChecklistProgress {
        checklist_id: item.checklist_id,
        progress,
    })
}

/// Documents absorbed as required but not yet uploaded.
pub async fn required_documents(
    store: &dyn DashboardStore,
    owner_id: &str,
) -> Result<Vec<DocumentRecord>, StoreError> {
    let documents = store.documents_for_owner(owner_id).await?;
    Ok(documents.into_iter().filter(|d| d.is_pending()).collect())
}

fn percent_complete(items: &[ChecklistItem]) -> u8 {
    if items.is_empty() {
        return 0;
    }
    let done = items.iter().filter(|i| i.completed).count();
    ((done * 100) as f64 / items.len() as f64).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(completed: bool) -> ChecklistItem {
        let mut item = ChecklistItem::new(Uuid::new_v4(), "task", 0);
        item.completed = completed;
        item
    }

    #[test]
    fn test_percent_complete_rounds() {
        let items = vec![item(true), item(false), item(false)];
        assert_eq!(percent_complete(&items), 33);

        let items = vec![item(true), item(true), item(false)];
        assert_eq!(percent_complete(&items), 67);
    }

    #[test]
    fn test_percent_complete_empty_is_zero() {
        assert_eq!(percent_complete(&[]), 0);
    }
}
