use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use absorbd::Result;

#[derive(Parser)]
#[command(name = "absorbd")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Guidance absorption engine", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Absorb a guidance markdown file into the dashboard
    Absorb {
        /// Guidance markdown file
        file: PathBuf,

        /// Owner the records belong to
        #[arg(short, long)]
        owner: String,

        /// Dashboard state file
        #[arg(long, default_value = "dashboard.json")]
        state: PathBuf,

        /// Keyword rules file (TOML)
        #[arg(long)]
        rules: Option<PathBuf>,
    },

    /// Classify a guidance file without writing anything
    Inspect {
        /// Guidance markdown file
        file: PathBuf,

        /// Keyword rules file (TOML)
        #[arg(long)]
        rules: Option<PathBuf>,
    },

    /// Show checklists, required documents, and recent activity
    List {
        /// Owner to show
        #[arg(short, long)]
        owner: String,

        /// Dashboard state file
        #[arg(long, default_value = "dashboard.json")]
        state: PathBuf,
    },

    /// Mark a checklist item as completed
    Complete {
        /// Item id (shown by `absorbd list`)
        item_id: String,

        /// Reopen the item instead
        #[arg(long)]
        undo: bool,

        /// Dashboard state file
        #[arg(long, default_value = "dashboard.json")]
        state: PathBuf,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("Failed to create tokio runtime");

    if let Err(e) = runtime.block_on(run_async(cli)) {
        eprintln!("{}", format!("Error: {:#}", e).red());
        std::process::exit(1);
    }
}

async fn run_async(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Absorb {
            file,
            owner,
            state,
            rules,
        } => {
            absorbd::cli::absorb::run(&file, &owner, &state, rules.as_deref()).await?;
        }

        Commands::Inspect { file, rules } => {
            absorbd::cli::inspect::run(&file, rules.as_deref())?;
        }

        Commands::List { owner, state } => {
            absorbd::cli::list::run(&owner, &state).await?;
        }

        Commands::Complete {
            item_id,
            undo,
            state,
        } => {
            absorbd::cli::complete::run(&item_id, undo, &state).await?;
        }
    }

    Ok(())
}
