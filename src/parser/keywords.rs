//! Keyword lists driving heading and item classification.
//!
//! Which headings count as compliance-related and which checklist items
//! look like required documents is jurisdiction-specific data, not logic.
//! The defaults match the advice service's output for Indian company law
//! (hence `pan card`, `moa`, `aoa`); deployments targeting other domains
//! override them with a TOML rules file.

use anyhow::Context;
use serde::Deserialize;
use std::path::Path;

use crate::Result;

/// Configurable keyword lists used by the classifier.
///
/// All matching is case-insensitive substring containment; keywords are
/// normalized to lowercase on construction.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct KeywordRules {
    /// Substrings marking a heading as compliance-related.
    pub compliance_keywords: Vec<String>,
    /// Substrings marking a checklist item as a required document.
    pub document_keywords: Vec<String>,
    /// Extra document keywords applied only under the step-based layout,
    /// where the advice service names specific legal filings.
    pub step_document_keywords: Vec<String>,
}

impl Default for KeywordRules {
    fn default() -> Self {
        Self {
            compliance_keywords: vec![
                "compliance".to_string(),
                "legal requirement".to_string(),
                "regulatory".to_string(),
                "regulation".to_string(),
                "law".to_string(),
                "legal".to_string(),
                "requirement".to_string(),
            ],
            document_keywords: vec![
                "document".to_string(),
                "certificate".to_string(),
                "license".to_string(),
                "form".to_string(),
            ],
            step_document_keywords: vec![
                "pan card".to_string(),
                "moa".to_string(),
                "aoa".to_string(),
            ],
        }
    }
}

impl KeywordRules {
    /// Load rules from a TOML file. Missing lists fall back to the
    /// defaults; unknown keys are rejected.
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read rules file {}", path.display()))?;
        let mut rules: KeywordRules = toml::from_str(&content)
            .with_context(|| format!("Failed to parse rules file {}", path.display()))?;
        rules.normalize();
        Ok(rules)
    }

    fn normalize(&mut self) {
        for list in [
            &mut self.compliance_keywords,
            &mut self.document_keywords,
            &mut self.step_document_keywords,
        ] {
            for keyword in list.iter_mut() {
                *keyword = keyword.to_lowercase();
            }
        }
    }

    /// Whether a heading is compliance-related.
    pub fn is_compliance_heading(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        self.compliance_keywords.iter().any(|k| lower.contains(k.as_str()))
    }

    /// Whether a checklist item names a required document.
    ///
    /// `include_step_extras` widens the match with the step-layout-only
    /// keywords.
    pub fn is_document_item(&self, text: &str, include_step_extras: bool) -> bool {
        let lower = text.to_lowercase();
        if self.document_keywords.iter().any(|k| lower.contains(k.as_str())) {
            return true;
        }
        include_step_extras
            && self
                .step_document_keywords
                .iter()
                .any(|k| lower.contains(k.as_str()))
    }
}
