//! Service layer for absorbd.
//!
//! Business logic shared between the CLI and library consumers: the
//! absorption pipeline itself and the small dashboard maintenance
//! operations around it.

pub mod absorption_service;
pub mod dashboard_service;

pub use absorption_service::{
    absorb_guidance, AbsorptionError, AbsorptionOutcome, CreatedRecords,
    COMPLIANCE_CHECKLIST_NAME,
};
pub use dashboard_service::{
    checklist_overview, complete_item, required_documents, ChecklistProgress,
};
