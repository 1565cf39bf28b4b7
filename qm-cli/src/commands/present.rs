//! Present command: show the label and category for one status.

use console::style;

use qm_core::error::QmResult;
use qm_models::{RelationshipRecord, RelationshipStatus, Role};
use qm_services::presenter;

use super::styled_label;
use crate::OutputFormat;

/// Run the present command against a synthetic record.
pub fn run(
    status: &str,
    context: Role,
    verified: bool,
    unverified_school: bool,
    format: OutputFormat,
) -> QmResult<()> {
    let status = RelationshipStatus::from_str_lossy(status);
    let mut record = RelationshipRecord::new("preview").with_status(status);
    if verified {
        record = record.with_verified(true);
    }
    if unverified_school {
        record = record.with_school("Unverified School", false);
    }

    let presentation = presenter::present(&record, context);

    match format {
        OutputFormat::Json => {
            let json = serde_json::json!({
                "status": status,
                "context": context.as_str(),
                "label": presentation.label,
                "category": presentation.category,
                "disabled": presentation.disabled,
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        OutputFormat::Text => {
            println!("  {:<10} {}", style("Status:").bold(), status);
            println!("  {:<10} {}", style("Context:").bold(), context.as_str());
            println!(
                "  {:<10} {}",
                style("Label:").bold(),
                styled_label(presentation.label, presentation.category)
            );
            println!("  {:<10} {}", style("Category:").bold(), presentation.category.as_str());
            if presentation.disabled {
                println!("  {}", style("Action disabled (unverified school)").dim());
            }
        }
    }

    Ok(())
}
