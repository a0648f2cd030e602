//! Heading-driven classification of guidance blocks.
//!
//! The advice service emits two recognizable layouts. The structured one
//! uses `### Step N` section headings with a `#### Actionable Steps`
//! heading in front of each task list; the loose one uses arbitrary
//! level-2/3 headings with task lists directly underneath. Both layouts
//! run through the same fold, parameterized by a [`SectionRule`]; the
//! rule is picked once by probing the heading texts.

use tracing::debug;

use crate::models::{GuidanceSection, ParsedGuidance};

use super::keywords::KeywordRules;
use super::markdown::Block;

/// Which heading layout the guidance document follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// `### Step N` sections, task lists gated on an `Actionable Steps`
    /// sub-heading.
    StepBased,
    /// Any level-2/3 heading opens a section; lists attach immediately.
    Adaptive,
}

/// Heading pattern that decides which headings open sections and whether
/// list capture is gated.
#[derive(Debug, Clone, Copy)]
struct SectionRule {
    layout: Layout,
    min_depth: u8,
    max_depth: u8,
    title_prefix: Option<&'static str>,
    gated: bool,
}

impl SectionRule {
    fn step_based() -> Self {
        Self {
            layout: Layout::StepBased,
            min_depth: 3,
            max_depth: 3,
            title_prefix: Some("Step"),
            gated: true,
        }
    }

    fn adaptive() -> Self {
        Self {
            layout: Layout::Adaptive,
            min_depth: 2,
            max_depth: 3,
            title_prefix: None,
            gated: false,
        }
    }

    /// Probe the heading texts once and pick the layout.
    fn for_blocks(blocks: &[Block]) -> Self {
        let has_step_headings = blocks.iter().any(|block| {
            matches!(block, Block::Heading { text, .. } if text.starts_with("Step "))
        });
        if has_step_headings {
            Self::step_based()
        } else {
            Self::adaptive()
        }
    }

    fn opens_section(&self, depth: u8, text: &str, rules: &KeywordRules) -> bool {
        depth >= self.min_depth
            && depth <= self.max_depth
            && !rules.is_compliance_heading(text)
            && !contains_actionable_steps(text)
            && self
                .title_prefix
                .map_or(true, |prefix| text.starts_with(prefix))
    }

    fn opens_gate(&self, depth: u8, text: &str) -> bool {
        self.gated && depth == 4 && contains_actionable_steps(text)
    }
}

fn contains_actionable_steps(text: &str) -> bool {
    text.to_lowercase().contains("actionable steps")
}

/// Where list items are currently routed.
///
/// Exactly one destination is in effect at any point of the fold, set by
/// the most recent qualifying heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Attribution {
    /// No qualifying heading is in effect; lists are dropped.
    Unassigned,
    /// A section is open but its list gate has not been seen yet.
    Pending(usize),
    /// Lists feed the section at this index.
    Section(usize),
    /// Lists feed the compliance checklist.
    Compliance,
}

/// Classify a block stream into sections, compliance items, and document
/// requirement candidates.
///
/// Never fails: a stream with no qualifying headings yields an empty
/// [`ParsedGuidance`]. Sections appear in document order; a section with
/// no captured lists is kept with an empty item list.
pub fn classify(blocks: &[Block], rules: &KeywordRules) -> ParsedGuidance {
    let rule = SectionRule::for_blocks(blocks);
    debug!(layout = ?rule.layout, blocks = blocks.len(), "classifying guidance blocks");

    let mut sections: Vec<GuidanceSection> = Vec::new();
    let mut compliance: Vec<String> = Vec::new();
    let mut documents: Vec<String> = Vec::new();
    let mut attribution = Attribution::Unassigned;
    let step_extras = rule.layout == Layout::StepBased;

    for block in blocks {
        match block {
            Block::Heading { depth, text } => {
                attribution = next_attribution(attribution, *depth, text, &rule, rules, &mut sections);
            }
            Block::List { items } => match attribution {
                Attribution::Compliance => {
                    documents.extend(extract_document_requirements(items, rules, step_extras));
                    compliance.extend(items.iter().cloned());
                }
                Attribution::Section(idx) => {
                    documents.extend(extract_document_requirements(items, rules, step_extras));
                    sections[idx].checklist_items.extend(items.iter().cloned());
                }
                Attribution::Pending(_) | Attribution::Unassigned => {
                    debug!(items = items.len(), "dropping list with no open destination");
                }
            },
            Block::Paragraph { .. } | Block::Other => {}
        }
    }

    backfill_compliance(&sections, &mut compliance);

    debug!(
        sections = sections.len(),
        compliance = compliance.len(),
        documents = documents.len(),
        "classification complete"
    );

    ParsedGuidance {
        sections,
        compliance_checklist: compliance,
        document_requirements: documents,
    }
}

/// State transition for one heading.
fn next_attribution(
    current: Attribution,
    depth: u8,
    text: &str,
    rule: &SectionRule,
    rules: &KeywordRules,
    sections: &mut Vec<GuidanceSection>,
) -> Attribution {
    if rules.is_compliance_heading(text) {
        debug!(heading = text, "entering compliance bucket");
        return Attribution::Compliance;
    }
    if rule.opens_gate(depth, text) {
        // The gate arms a pending section; under any other destination it
        // changes nothing.
        return match current {
            Attribution::Pending(idx) => Attribution::Section(idx),
            other => other,
        };
    }
    if rule.opens_section(depth, text, rules) {
        debug!(heading = text, "opening section");
        sections.push(GuidanceSection::new(text));
        let idx = sections.len() - 1;
        return if rule.gated {
            Attribution::Pending(idx)
        } else {
            Attribution::Section(idx)
        };
    }
    // Any other heading at section depth or above detaches trailing lists
    // from whatever was open; deeper headings leave the destination alone.
    if depth <= rule.max_depth {
        Attribution::Unassigned
    } else {
        current
    }
}

/// Pure filter returning the items that look like required documents.
///
/// Duplicates survive so counts stay meaningful; deduplication happens
/// once, at persistence time.
pub fn extract_document_requirements(
    items: &[String],
    rules: &KeywordRules,
    include_step_extras: bool,
) -> Vec<String> {
    items
        .iter()
        .filter(|item| rules.is_document_item(item, include_step_extras))
        .cloned()
        .collect()
}

/// Guidance with sections but no explicit compliance heading still gets a
/// minimal compliance view: the first two items of every section, each
/// prefixed with its section title.
fn backfill_compliance(sections: &[GuidanceSection], compliance: &mut Vec<String>) {
    if !compliance.is_empty() || sections.is_empty() {
        return;
    }
    debug!("no explicit compliance items, backfilling from sections");
    for section in sections {
        for item in section.checklist_items.iter().take(2) {
            compliance.push(format!("{}: {}", section.title, item));
        }
    }
}
