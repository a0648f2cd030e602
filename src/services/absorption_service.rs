//! Absorption service - turns one guidance document into persisted
//! dashboard records, exactly once per owner.
//!
//! The guard is behavioral, by checklist name: if any checklist this
//! guidance would create already exists for the owner, the whole call is
//! a no-op. The check-then-write window is additionally covered by the
//! store's `(owner_id, name)` uniqueness, so a racing call that slips
//! past the upfront check still resolves to [`AbsorptionOutcome::AlreadyExisted`].
//!
//! Writes are issued sequentially with no spanning transaction. Every
//! created record id is tracked, and on failure the batch is undone
//! best-effort before the error is returned.

use std::collections::HashSet;

use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::models::{
    ChecklistWithItems, DocumentRecord, ParsedGuidance, ACTIVITY_GUIDANCE_ABSORBED,
};
use crate::parser::{parse_guidance, KeywordRules};
use crate::store::{DashboardStore, StoreError};

/// Name of the aggregated compliance checklist every absorbed guidance
/// document contributes to.
pub const COMPLIANCE_CHECKLIST_NAME: &str = "Compliance Dashboard";

/// Records created by one absorption call.
#[derive(Debug, Default)]
pub struct CreatedRecords {
    pub checklists: Vec<ChecklistWithItems>,
    pub compliance: Option<ChecklistWithItems>,
    pub documents: Vec<DocumentRecord>,
}

impl CreatedRecords {
    pub fn is_empty(&self) -> bool {
        self.checklists.is_empty() && self.compliance.is_none() && self.documents.is_empty()
    }
}

/// Outcome of an absorption call.
#[derive(Debug)]
pub enum AbsorptionOutcome {
    /// Fresh records were written. Guidance with no extractable structure
    /// yields an empty [`CreatedRecords`] and writes nothing.
    Created(CreatedRecords),
    /// A checklist produced by this guidance already exists for the
    /// owner; nothing was written.
    AlreadyExisted,
}

/// Persistence failure during absorption. The batch written so far has
/// been undone best-effort, but callers should treat the backend state as
/// unverified until they re-read it.
#[derive(Debug, Error)]
#[error("failed to {step} for owner {owner_id}: {source}")]
pub struct AbsorptionError {
    pub step: &'static str,
    pub owner_id: String,
    #[source]
    pub source: StoreError,
}

/// Absorb one guidance document for one owner.
pub async fn absorb_guidance(
    store: &dyn DashboardStore,
    rules: &KeywordRules,
    owner_id: &str,
    guidance_markdown: &str,
) -> Result<AbsorptionOutcome, AbsorptionError> {
    debug!(owner_id, bytes = guidance_markdown.len(), "absorbing guidance");
    let parsed = parse_guidance(guidance_markdown, rules);

    if let Some(name) = find_existing_checklist(store, owner_id, &parsed).await? {
        debug!(owner_id, name = %name, "checklist already present, skipping absorption");
        return Ok(AbsorptionOutcome::AlreadyExisted);
    }

    let mut batch = Batch::default();
    match write_records(store, owner_id, &parsed, &mut batch).await {
        Ok(created) => Ok(AbsorptionOutcome::Created(created)),
        Err(failure) => {
            batch.undo(store).await;
            match failure {
                WriteFailure::Conflict { name } => {
                    debug!(owner_id, name = %name, "lost creation race, treating as already absorbed");
                    Ok(AbsorptionOutcome::AlreadyExisted)
                }
                WriteFailure::Store { step, source } => {
                    warn!(owner_id, step, error = %source, "absorption failed, batch undone");
                    Err(AbsorptionError {
                        step,
                        owner_id: owner_id.to_string(),
                        source,
                    })
                }
            }
        }
    }
}

/// The all-or-nothing guard: the compliance checklist name plus every
/// section title, checked against existing checklists. Any hit blocks the
/// entire absorption, including sections with novel titles.
async fn find_existing_checklist(
    store: &dyn DashboardStore,
    owner_id: &str,
    parsed: &ParsedGuidance,
) -> Result<Option<String>, AbsorptionError> {
    let mut names = vec![COMPLIANCE_CHECKLIST_NAME];
    names.extend(parsed.sections.iter().map(|s| s.title.as_str()));

    for name in names {
        let existing = store
            .checklist_by_name(owner_id, name)
            .await
            .map_err(|source| AbsorptionError {
                step: "query existing checklists",
                owner_id: owner_id.to_string(),
                source,
            })?;
        if existing.is_some() {
            return Ok(Some(name.to_string()));
        }
    }
    Ok(None)
}

enum WriteFailure {
    /// Another writer created one of our checklist names first.
    Conflict { name: String },
    Store {
        step: &'static str,
        source: StoreError,
    },
}

fn classify_failure(step: &'static str) -> impl FnOnce(StoreError) -> WriteFailure {
    move |source| match source {
        StoreError::NameConflict { name, .. } => WriteFailure::Conflict { name },
        source => WriteFailure::Store { step, source },
    }
}

/// Ids created so far, for undo on failure.
#[derive(Default)]
struct Batch {
    checklist_ids: Vec<Uuid>,
    document_ids: Vec<Uuid>,
}

impl Batch {
    /// Best-effort deletion of everything the batch created. Failures are
    /// logged and skipped so the original error stays visible.
    async fn undo(&self, store: &dyn DashboardStore) {
        for id in &self.checklist_ids {
            if let Err(error) = store.delete_checklist(id).await {
                warn!(checklist_id = %id, %error, "failed to undo checklist");
            }
        }
        for id in &self.document_ids {
            if let Err(error) = store.delete_document(id).await {
                warn!(document_id = %id, %error, "failed to undo document");
            }
        }
    }
}

async fn write_records(
    store: &dyn DashboardStore,
    owner_id: &str,
    parsed: &ParsedGuidance,
    batch: &mut Batch,
) -> Result<CreatedRecords, WriteFailure> {
    let mut created = CreatedRecords::default();

    for section in &parsed.sections {
        let with_items = create_checklist_with_items(
            store,
            owner_id,
            &section.title,
            &section.checklist_items,
            batch,
        )
        .await?;
        created.checklists.push(with_items);
    }

    if !parsed.compliance_checklist.is_empty() {
        let with_items = create_checklist_with_items(
            store,
            owner_id,
            COMPLIANCE_CHECKLIST_NAME,
            &parsed.compliance_checklist,
            batch,
        )
        .await?;
        created.compliance = Some(with_items);
    }

    if !parsed.document_requirements.is_empty() {
        let unique = dedup_preserving_order(&parsed.document_requirements);
        debug!(
            unique = unique.len(),
            total = parsed.document_requirements.len(),
            "creating required-document records"
        );
        let documents = store
            .create_document_entries(owner_id, &unique)
            .await
            .map_err(classify_failure("create document entries"))?;
        batch.document_ids.extend(documents.iter().map(|d| d.id));
        created.documents = documents;
    }

    if !created.is_empty() {
        store
            .log_activity(
                owner_id,
                ACTIVITY_GUIDANCE_ABSORBED,
                "Absorbed external guidance into the dashboard",
                None,
            )
            .await
            .map_err(classify_failure("log absorption activity"))?;
    }

    Ok(created)
}

async fn create_checklist_with_items(
    store: &dyn DashboardStore,
    owner_id: &str,
    name: &str,
    item_texts: &[String],
    batch: &mut Batch,
) -> Result<ChecklistWithItems, WriteFailure> {
    let checklist = store
        .create_checklist(owner_id, name)
        .await
        .map_err(classify_failure("create checklist"))?;
    batch.checklist_ids.push(checklist.id);
    debug!(name, items = item_texts.len(), "created checklist");

    // An empty section still keeps its checklist record.
    let items = if item_texts.is_empty() {
        Vec::new()
    } else {
        store
            .add_checklist_items(&checklist.id, item_texts)
            .await
            .map_err(classify_failure("add checklist items"))?
    };

    Ok(ChecklistWithItems { checklist, items })
}

fn dedup_preserving_order(names: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    names
        .iter()
        .filter(|name| seen.insert(name.as_str()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedup_preserving_order() {
        let names = vec![
            "Form A".to_string(),
            "Certificate B".to_string(),
            "Form A".to_string(),
        ];
        assert_eq!(dedup_preserving_order(&names), vec!["Form A", "Certificate B"]);
    }
}
