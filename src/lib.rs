// Absorbd - Guidance Absorption Engine
// Converts advice-service markdown into dashboard checklists, required
// documents, and activity records

pub mod cli;
pub mod models;
pub mod parser;
pub mod services;
pub mod store;

pub use anyhow::{Context, Result};

// Re-export commonly used types
pub use models::{ActivityLogEntry, Checklist, ChecklistItem, ChecklistWithItems, DocumentRecord, ParsedGuidance};
pub use parser::{parse_guidance, KeywordRules};
pub use services::{absorb_guidance, AbsorptionOutcome, CreatedRecords};
pub use store::{DashboardStore, JsonFileStore, MemoryStore, StoreError};
