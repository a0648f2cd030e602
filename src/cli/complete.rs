use std::path::Path;

use colored::Colorize;
use uuid::Uuid;

use crate::services::complete_item;
use crate::store::JsonFileStore;
use crate::{Context, Result};

pub async fn run(item_id: &str, undo: bool, state_path: &Path) -> Result<()> {
    let item_id = Uuid::parse_str(item_id)
        .with_context(|| format!("'{}' is not a valid item id", item_id))?;
    let store = JsonFileStore::open(state_path)?;

    let progress = complete_item(&store, &item_id, !undo).await?;

    let verb = if undo { "reopened" } else { "completed" };
    println!(
        "{}",
        format!(
            "✓ Item {}. Checklist is now {}% complete.",
            verb, progress.progress
        )
        .green()
    );

    Ok(())
}
