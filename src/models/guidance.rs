use serde::{Deserialize, Serialize};

/// A titled group of checklist items derived from one heading in the
/// guidance document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GuidanceSection {
    pub title: String,
    pub checklist_items: Vec<String>,
}

impl GuidanceSection {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            checklist_items: Vec::new(),
        }
    }
}

/// Classification result for one guidance document.
///
/// Transient: exists only between parsing and persistence. Order follows
/// the source document; duplicates are kept (document requirements are
/// deduplicated once, at persistence time).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ParsedGuidance {
    pub sections: Vec<GuidanceSection>,
    pub compliance_checklist: Vec<String>,
    pub document_requirements: Vec<String>,
}

impl ParsedGuidance {
    /// True when classification extracted nothing actionable.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
            && self.compliance_checklist.is_empty()
            && self.document_requirements.is_empty()
    }
}
