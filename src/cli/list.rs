use std::path::Path;

use colored::Colorize;

use crate::services::{checklist_overview, required_documents};
use crate::store::{DashboardStore, JsonFileStore};
use crate::Result;

pub async fn run(owner: &str, state_path: &Path) -> Result<()> {
    let store = JsonFileStore::open(state_path)?;

    let overview = checklist_overview(&store, owner).await?;
    if overview.is_empty() {
        println!(
            "{}",
            format!("No checklists for {}. Absorb some guidance first.", owner).yellow()
        );
        return Ok(());
    }

    println!("{}", "Checklists:".green().bold());
    for entry in &overview {
        println!(
            "   {} ({}% complete)",
            entry.checklist.name.bold(),
            entry.checklist.progress
        );
        for item in &entry.items {
            let mark = if item.completed { "☑" } else { "☐" };
            println!("      {} {}  {}", mark, item.text, item.id.to_string().dimmed());
        }
    }

    let pending = required_documents(&store, owner).await?;
    if !pending.is_empty() {
        println!("\n{}", "Required documents (not yet uploaded):".green().bold());
        for document in &pending {
            println!("   • {}", document.name);
        }
    }

    let activity = store.recent_activity(owner, 5).await?;
    if !activity.is_empty() {
        println!("\n{}", "Recent activity:".green().bold());
        for entry in &activity {
            println!(
                "   {} {}",
                entry.timestamp.format("%Y-%m-%d %H:%M").to_string().dimmed(),
                entry.description
            );
        }
    }

    Ok(())
}
