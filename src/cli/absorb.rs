use std::path::Path;

use colored::Colorize;

use crate::services::{absorb_guidance, AbsorptionOutcome};
use crate::store::JsonFileStore;
use crate::{Context, Result};

pub async fn run(
    file: &Path,
    owner: &str,
    state_path: &Path,
    rules_path: Option<&Path>,
) -> Result<()> {
    let markdown = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read guidance file {}", file.display()))?;
    let rules = super::load_rules(rules_path)?;
    let store = JsonFileStore::open(state_path)?;

    println!("{}", format!("📥 Absorbing guidance for {}...", owner).cyan());

    match absorb_guidance(&store, &rules, owner, &markdown).await? {
        AbsorptionOutcome::AlreadyExisted => {
            println!(
                "{}",
                "✓ This guidance is already on the dashboard. Nothing created.".yellow()
            );
        }
        AbsorptionOutcome::Created(created) if created.is_empty() => {
            println!(
                "{}",
                "No structured guidance found in the input. Nothing created.".yellow()
            );
        }
        AbsorptionOutcome::Created(created) => {
            println!("{}", "✓ Guidance absorbed into the dashboard.".green().bold());
            for entry in &created.checklists {
                println!(
                    "   • {} ({} items)",
                    entry.checklist.name,
                    entry.items.len()
                );
            }
            if let Some(compliance) = &created.compliance {
                println!(
                    "   • {} ({} items)",
                    compliance.checklist.name.bold(),
                    compliance.items.len()
                );
            }
            if !created.documents.is_empty() {
                println!("   • {} required documents:", created.documents.len());
                for document in &created.documents {
                    println!("     - {}", document.name);
                }
            }
        }
    }

    Ok(())
}
