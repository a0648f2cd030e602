use std::path::Path;

use colored::Colorize;

use crate::parser::parse_guidance;
use crate::{Context, Result};

/// Dry run: classify a guidance file and show what absorption would
/// create, without touching any state.
pub fn run(file: &Path, rules_path: Option<&Path>) -> Result<()> {
    let markdown = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read guidance file {}", file.display()))?;
    let rules = super::load_rules(rules_path)?;
    let parsed = parse_guidance(&markdown, &rules);

    if parsed.is_empty() {
        println!("{}", "No structured guidance found in the input.".yellow());
        return Ok(());
    }

    println!("{}", "Sections:".green().bold());
    if parsed.sections.is_empty() {
        println!("   (none)");
    }
    for section in &parsed.sections {
        println!("   {}", section.title.bold());
        for item in &section.checklist_items {
            println!("      • {}", item);
        }
    }

    println!("\n{}", "Compliance checklist:".green().bold());
    if parsed.compliance_checklist.is_empty() {
        println!("   (none)");
    }
    for item in &parsed.compliance_checklist {
        println!("   • {}", item);
    }

    println!("\n{}", "Document requirements:".green().bold());
    if parsed.document_requirements.is_empty() {
        println!("   (none)");
    }
    for name in &parsed.document_requirements {
        println!("   • {}", name);
    }

    Ok(())
}
