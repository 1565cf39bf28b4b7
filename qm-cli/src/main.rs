//! Quizmates CLI - Command-line shell for the friends and invitations core.
//!
//! Drives the discovery feed, invite ledger and status presenter against a
//! JSON fixture file so the core can be exercised headless, scripted, and
//! debugged without a rendering layer.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;

use qm_core::config::{AppConfig, ConfigHandle};
use qm_core::error::QmResult;
use qm_core::logging;
use qm_core::platform::Platform;
use qm_models::Role;

/// Quizmates - friends, discovery and quiz invitations.
#[derive(Parser)]
#[command(
    name = "quizmates",
    version,
    about = "Quizmates friends and invitations CLI",
    long_about = "A command-line shell for the Quizmates relationship core.\n\
                   Pages through a discovery fixture, records invites, and shows\n\
                   how each relationship is presented per screen role."
)]
struct Cli {
    /// Path to the configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging (debug level).
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (text, json).
    #[arg(short = 'f', long, global = true, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// JSON output for scripting.
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Page through a discovery fixture and print the friends screen.
    Discover {
        /// JSON file holding an array of records (or `{"data": [...]}`).
        #[arg(long)]
        fixture: PathBuf,
        /// Number of pages to load (the first one via refresh).
        #[arg(short, long, default_value = "1")]
        pages: u32,
        /// Screen role (follow, invite, student).
        #[arg(long, default_value = "follow", value_parser = parse_role)]
        context: Role,
        /// Record ids to invite before the pages are loaded.
        #[arg(long = "invite", value_name = "ID")]
        invites: Vec<String>,
    },
    /// Show how one relationship status is presented.
    Present {
        /// Relationship status (undefined, pending, rejected, accepted, ...).
        #[arg(short, long)]
        status: String,
        /// Screen role (follow, invite, student).
        #[arg(long, value_parser = parse_role)]
        context: Role,
        /// Mark the record as a verified student.
        #[arg(long)]
        verified: bool,
        /// Attach an unverified school affiliation to the record.
        #[arg(long)]
        unverified_school: bool,
    },
    /// Inspect the effective configuration.
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn parse_role(s: &str) -> Result<Role, String> {
    Role::parse(s).ok_or_else(|| format!("unknown role '{s}' (expected follow, invite, or student)"))
}

#[tokio::main]
async fn main() -> QmResult<()> {
    let cli = Cli::parse();

    // Load configuration
    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => AppConfig::default_config_path()
            .unwrap_or_else(|_| PathBuf::from("config.toml")),
    };
    let config = if config_path.exists() {
        AppConfig::load_from_file(&config_path)?
    } else {
        AppConfig::default()
    };

    // Initialize logging
    let mut log_config = config.logging.clone();
    if cli.verbose {
        log_config.level = "debug".into();
    }
    let _guard = logging::init_from_config(&log_config)?;

    let config_handle = ConfigHandle::new(config);

    info!("Quizmates CLI v{} on {}", qm_core::constants::APP_VERSION, Platform::current());

    // Dispatch to command handlers
    match cli.command {
        Commands::Discover { fixture, pages, context, invites } => {
            commands::discover::run(config_handle, &fixture, pages, context, invites, cli.format).await
        }
        Commands::Present { status, context, verified, unverified_school } => {
            commands::present::run(&status, context, verified, unverified_school, cli.format)
        }
        Commands::Config { action } => {
            commands::config::run(config_handle, &config_path, action, cli.format).await
        }
    }
}
