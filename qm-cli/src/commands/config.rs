//! Configuration commands.

use std::path::Path;

use clap::Subcommand;
use console::style;

use qm_core::config::ConfigHandle;
use qm_core::error::{QmError, QmResult};
use crate::OutputFormat;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show the effective configuration.
    Show,
    /// Print the configuration file path.
    Path,
}

pub async fn run(
    config: ConfigHandle,
    path: &Path,
    action: ConfigAction,
    format: OutputFormat,
) -> QmResult<()> {
    match action {
        ConfigAction::Show => {
            let cfg = config.read().await;
            match format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&*cfg)?);
                }
                OutputFormat::Text => {
                    let text = toml::to_string_pretty(&*cfg)
                        .map_err(|e| QmError::Config(format!("failed to render config: {e}")))?;
                    println!("{}", style(format!("# {}", path.display())).dim());
                    print!("{text}");
                }
            }
        }
        ConfigAction::Path => {
            let exists = path.exists();
            match format {
                OutputFormat::Json => {
                    let json = serde_json::json!({
                        "path": path.display().to_string(),
                        "exists": exists,
                    });
                    println!("{}", serde_json::to_string_pretty(&json)?);
                }
                OutputFormat::Text => {
                    let marker = if exists { style("exists").green() } else { style("not found, using defaults").yellow() };
                    println!("{} ({marker})", path.display());
                }
            }
        }
    }
    Ok(())
}
