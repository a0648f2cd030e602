//! End-to-end absorption tests against the in-memory and file stores.

use anyhow::anyhow;
use async_trait::async_trait;
use uuid::Uuid;

use absorbd::models::{ActivityLogEntry, Checklist, ChecklistItem, DocumentRecord};
use absorbd::parser::parse_guidance;
use absorbd::services::{absorb_guidance, complete_item, AbsorptionOutcome, COMPLIANCE_CHECKLIST_NAME};
use absorbd::store::{DashboardStore, JsonFileStore, MemoryStore, StoreError};
use absorbd::KeywordRules;

const STEP_GUIDANCE: &str = "### Step 1: Register\n#### Actionable Steps\n1. File Form A\n2. Get Certificate B\n### Compliance\n1. Requirement X\n";

const OWNER: &str = "owner-1";

async fn absorb(store: &dyn DashboardStore, markdown: &str) -> AbsorptionOutcome {
    absorb_guidance(store, &KeywordRules::default(), OWNER, markdown)
        .await
        .expect("absorption should not fail")
}

#[tokio::test]
async fn test_step_based_end_to_end() {
    let store = MemoryStore::new();

    let outcome = absorb(&store, STEP_GUIDANCE).await;
    let created = match outcome {
        AbsorptionOutcome::Created(created) => created,
        AbsorptionOutcome::AlreadyExisted => panic!("fresh owner cannot already exist"),
    };

    assert_eq!(created.checklists.len(), 1);
    assert_eq!(created.checklists[0].checklist.name, "Step 1: Register");
    let texts: Vec<&str> = created.checklists[0]
        .items
        .iter()
        .map(|i| i.text.as_str())
        .collect();
    assert_eq!(texts, vec!["File Form A", "Get Certificate B"]);

    let compliance = created.compliance.expect("compliance checklist created");
    assert_eq!(compliance.checklist.name, COMPLIANCE_CHECKLIST_NAME);
    assert_eq!(compliance.items.len(), 1);
    assert_eq!(compliance.items[0].text, "Requirement X");

    let doc_names: Vec<&str> = created.documents.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(doc_names, vec!["File Form A", "Get Certificate B"]);
    assert!(created.documents.iter().all(|d| d.file_path.is_none()));
    assert!(created
        .documents
        .iter()
        .all(|d| d.metadata.status == "Required"));

    let activity = store.recent_activity(OWNER, 10).await.unwrap();
    assert_eq!(activity.len(), 1);
    assert_eq!(activity[0].activity_type, "guidance_absorbed");
}

#[tokio::test]
async fn test_absorption_is_idempotent() {
    let store = MemoryStore::new();

    match absorb(&store, STEP_GUIDANCE).await {
        AbsorptionOutcome::Created(created) => assert!(!created.is_empty()),
        AbsorptionOutcome::AlreadyExisted => panic!("first call must create"),
    }
    let checklists_before = store.checklists_for_owner(OWNER).await.unwrap();
    let documents_before = store.documents_for_owner(OWNER).await.unwrap();

    match absorb(&store, STEP_GUIDANCE).await {
        AbsorptionOutcome::AlreadyExisted => {}
        AbsorptionOutcome::Created(_) => panic!("second call must be a no-op"),
    }

    assert_eq!(
        store.checklists_for_owner(OWNER).await.unwrap().len(),
        checklists_before.len()
    );
    assert_eq!(
        store.documents_for_owner(OWNER).await.unwrap().len(),
        documents_before.len()
    );
    // Still only the first call's activity entry.
    assert_eq!(store.recent_activity(OWNER, 10).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_partial_title_overlap_blocks_whole_absorption() {
    let store = MemoryStore::new();
    absorb(&store, STEP_GUIDANCE).await;

    // Different guidance, but one section title collides.
    let overlapping = "### Step 1: Register\n#### Actionable Steps\n1. Something new\n### Step 2: Hire\n#### Actionable Steps\n1. Post a job ad\n";
    match absorb(&store, overlapping).await {
        AbsorptionOutcome::AlreadyExisted => {}
        AbsorptionOutcome::Created(_) => panic!("colliding title must block everything"),
    }
    // The novel section was not created either.
    assert!(store
        .checklist_by_name(OWNER, "Step 2: Hire")
        .await
        .unwrap()
        .is_none());
}

#[test]
fn test_fence_stripping_is_transparent() {
    let rules = KeywordRules::default();
    let bare = parse_guidance(STEP_GUIDANCE, &rules);
    let fenced = parse_guidance(&format!("```markdown\n{}\n```", STEP_GUIDANCE), &rules);

    assert_eq!(bare, fenced);
    assert!(!bare.is_empty());
}

#[tokio::test]
async fn test_backfill_reaches_compliance_checklist() {
    let store = MemoryStore::new();
    let guidance = "## Getting Started\n- Pick a name\n- Reserve the name\n- Open a bank account\n";

    let created = match absorb(&store, guidance).await {
        AbsorptionOutcome::Created(created) => created,
        AbsorptionOutcome::AlreadyExisted => panic!("fresh owner cannot already exist"),
    };

    let compliance = created.compliance.expect("backfilled compliance checklist");
    let texts: Vec<&str> = compliance.items.iter().map(|i| i.text.as_str()).collect();
    assert_eq!(
        texts,
        vec!["Getting Started: Pick a name", "Getting Started: Reserve the name"]
    );
}

#[tokio::test]
async fn test_items_preserve_source_order() {
    let store = MemoryStore::new();
    let created = match absorb(&store, STEP_GUIDANCE).await {
        AbsorptionOutcome::Created(created) => created,
        AbsorptionOutcome::AlreadyExisted => panic!("fresh owner cannot already exist"),
    };

    let checklist_id = created.checklists[0].checklist.id;
    let items = store.items_for_checklist(&checklist_id).await.unwrap();
    assert_eq!(items[0].order_index, 0);
    assert_eq!(items[0].text, "File Form A");
    assert_eq!(items[1].order_index, 1);
    assert_eq!(items[1].text, "Get Certificate B");
    assert!(items.iter().all(|i| !i.completed));
}

#[tokio::test]
async fn test_plain_sentence_creates_nothing() {
    let store = MemoryStore::new();
    let outcome = absorb(&store, "Just a plain sentence with no markdown structure.").await;

    match outcome {
        AbsorptionOutcome::Created(created) => assert!(created.is_empty()),
        AbsorptionOutcome::AlreadyExisted => panic!("nothing existed beforehand"),
    }
    assert!(store.checklists_for_owner(OWNER).await.unwrap().is_empty());
    assert!(store.documents_for_owner(OWNER).await.unwrap().is_empty());
    assert!(store.recent_activity(OWNER, 10).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_document_keyword_extraction() {
    let store = MemoryStore::new();
    let guidance = "## Paperwork\n- Submit your Business License form\n- Review your goals\n";
    absorb(&store, guidance).await;

    let names: Vec<String> = store
        .documents_for_owner(OWNER)
        .await
        .unwrap()
        .into_iter()
        .map(|d| d.name)
        .collect();
    assert_eq!(names, vec!["Submit your Business License form"]);
}

#[tokio::test]
async fn test_duplicate_documents_collapse_at_persistence() {
    let store = MemoryStore::new();
    let guidance = "## Filing\n- File Form A\n## Registration\n- File Form A\n";
    absorb(&store, guidance).await;

    let documents = store.documents_for_owner(OWNER).await.unwrap();
    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0].name, "File Form A");
}

#[tokio::test]
async fn test_midwrite_conflict_resolves_to_already_existed() {
    let store = SabotagedStore::new(Sabotage::ConflictOnCompliance);
    let outcome = absorb_guidance(&store, &KeywordRules::default(), OWNER, STEP_GUIDANCE)
        .await
        .expect("conflict is not an error");

    assert!(matches!(outcome, AbsorptionOutcome::AlreadyExisted));
    // The section checklist written before the conflict was undone.
    assert!(store
        .inner
        .checklists_for_owner(OWNER)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_store_failure_undoes_batch() {
    let store = SabotagedStore::new(Sabotage::FailDocuments);
    let result = absorb_guidance(&store, &KeywordRules::default(), OWNER, STEP_GUIDANCE).await;

    let error = result.expect_err("document creation failure must surface");
    assert_eq!(error.step, "create document entries");
    assert_eq!(error.owner_id, OWNER);

    // Checklists written before the failing call were undone.
    assert!(store
        .inner
        .checklists_for_owner(OWNER)
        .await
        .unwrap()
        .is_empty());
    assert!(store
        .inner
        .documents_for_owner(OWNER)
        .await
        .unwrap()
        .is_empty());
    assert!(store.inner.recent_activity(OWNER, 10).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_complete_item_recomputes_progress() {
    let store = MemoryStore::new();
    let created = match absorb(&store, STEP_GUIDANCE).await {
        AbsorptionOutcome::Created(created) => created,
        AbsorptionOutcome::AlreadyExisted => panic!("fresh owner cannot already exist"),
    };
    let first_item = created.checklists[0].items[0].id;
    let checklist_id = created.checklists[0].checklist.id;

    let progress = complete_item(&store, &first_item, true).await.unwrap();
    assert_eq!(progress.progress, 50);

    let checklist = store
        .checklist_by_name(OWNER, "Step 1: Register")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(checklist.id, checklist_id);
    assert_eq!(checklist.progress, 50);

    let progress = complete_item(&store, &first_item, false).await.unwrap();
    assert_eq!(progress.progress, 0);
}

#[tokio::test]
async fn test_json_file_store_round_trip() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let path = temp_dir.path().join("dashboard.json");

    {
        let store = JsonFileStore::open(&path).unwrap();
        absorb(&store, STEP_GUIDANCE).await;
    }

    let reopened = JsonFileStore::open(&path).unwrap();
    let checklists = reopened.checklists_for_owner(OWNER).await.unwrap();
    assert_eq!(checklists.len(), 2);

    // Absorbing the same guidance against the reopened store is a no-op.
    match absorb(&reopened, STEP_GUIDANCE).await {
        AbsorptionOutcome::AlreadyExisted => {}
        AbsorptionOutcome::Created(_) => panic!("reopened state must block re-absorption"),
    }
}

// ---------------------------------------------------------------------------
// Failure-injection wrapper around MemoryStore
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, PartialEq)]
enum Sabotage {
    /// `create_checklist` loses the race for the compliance checklist.
    ConflictOnCompliance,
    /// `create_document_entries` hits a backend failure.
    FailDocuments,
}

struct SabotagedStore {
    inner: MemoryStore,
    sabotage: Sabotage,
}

impl SabotagedStore {
    fn new(sabotage: Sabotage) -> Self {
        Self {
            inner: MemoryStore::new(),
            sabotage,
        }
    }
}

#[async_trait]
impl DashboardStore for SabotagedStore {
    async fn create_checklist(&self, owner_id: &str, name: &str) -> Result<Checklist, StoreError> {
        if self.sabotage == Sabotage::ConflictOnCompliance && name == COMPLIANCE_CHECKLIST_NAME {
            return Err(StoreError::NameConflict {
                owner_id: owner_id.to_string(),
                name: name.to_string(),
            });
        }
        self.inner.create_checklist(owner_id, name).await
    }

    async fn checklist_by_name(
        &self,
        owner_id: &str,
        name: &str,
    ) -> Result<Option<Checklist>, StoreError> {
        self.inner.checklist_by_name(owner_id, name).await
    }

    async fn checklists_for_owner(&self, owner_id: &str) -> Result<Vec<Checklist>, StoreError> {
        self.inner.checklists_for_owner(owner_id).await
    }

    async fn add_checklist_items(
        &self,
        checklist_id: &Uuid,
        texts: &[String],
    ) -> Result<Vec<ChecklistItem>, StoreError> {
        self.inner.add_checklist_items(checklist_id, texts).await
    }

    async fn items_for_checklist(
        &self,
        checklist_id: &Uuid,
    ) -> Result<Vec<ChecklistItem>, StoreError> {
        self.inner.items_for_checklist(checklist_id).await
    }

    async fn set_item_completed(
        &self,
        item_id: &Uuid,
        completed: bool,
    ) -> Result<ChecklistItem, StoreError> {
        self.inner.set_item_completed(item_id, completed).await
    }

    async fn set_checklist_progress(
        &self,
        checklist_id: &Uuid,
        progress: u8,
    ) -> Result<(), StoreError> {
        self.inner.set_checklist_progress(checklist_id, progress).await
    }

    async fn create_document_entries(
        &self,
        owner_id: &str,
        names: &[String],
    ) -> Result<Vec<DocumentRecord>, StoreError> {
        if self.sabotage == Sabotage::FailDocuments {
            return Err(StoreError::Backend(anyhow!("backend unreachable")));
        }
        self.inner.create_document_entries(owner_id, names).await
    }

    async fn documents_for_owner(
        &self,
        owner_id: &str,
    ) -> Result<Vec<DocumentRecord>, StoreError> {
        self.inner.documents_for_owner(owner_id).await
    }

    async fn log_activity(
        &self,
        owner_id: &str,
        activity_type: &str,
        description: &str,
        reference_id: Option<Uuid>,
    ) -> Result<ActivityLogEntry, StoreError> {
        self.inner
            .log_activity(owner_id, activity_type, description, reference_id)
            .await
    }

    async fn recent_activity(
        &self,
        owner_id: &str,
        limit: usize,
    ) -> Result<Vec<ActivityLogEntry>, StoreError> {
        self.inner.recent_activity(owner_id, limit).await
    }

    async fn delete_checklist(&self, checklist_id: &Uuid) -> Result<(), StoreError> {
        self.inner.delete_checklist(checklist_id).await
    }

    async fn delete_document(&self, document_id: &Uuid) -> Result<(), StoreError> {
        self.inner.delete_document(document_id).await
    }
}
