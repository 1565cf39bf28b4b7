//! Discovery command: page through a fixture and render the friends screen.

use std::path::Path;
use std::sync::Arc;

use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, ContentArrangement, Table};
use console::style;
use tracing::{debug, warn};

use qm_core::config::ConfigHandle;
use qm_core::constants::EVENT_BUS_CAPACITY;
use qm_core::error::QmResult;
use qm_models::{RelationshipRecord, Role};
use qm_services::event_bus::EventBus;
use qm_services::screen::{FriendsScreen, ViewModel};
use qm_services::service::Service;
use qm_services::source::{FixtureSource, MemoryRecordStore};

use super::{styled_label, truncate};
use crate::OutputFormat;

/// Run the discover command.
pub async fn run(
    config: ConfigHandle,
    fixture: &Path,
    pages: u32,
    context: Role,
    invites: Vec<String>,
    format: OutputFormat,
) -> QmResult<()> {
    let source = Arc::new(FixtureSource::from_json_file(fixture)?);
    // The fixture doubles as the friend roster so selection flags show up.
    let store = Arc::new(MemoryRecordStore::new(source.records().to_vec()));
    let event_bus = EventBus::new(EVENT_BUS_CAPACITY);

    let app_config = config.read().await.clone();
    let mut screen = FriendsScreen::new(&app_config, context, source.clone(), store, event_bus)?;
    screen.init()?;

    for id in &invites {
        let target = source
            .records()
            .iter()
            .find(|r| r.id.as_deref() == Some(id.as_str()))
            .cloned()
            .unwrap_or_else(|| RelationshipRecord::new(id.clone()));
        let outcome = screen.invite(&target).await?;
        if !outcome.inserted {
            warn!("{id} was already invited");
        }
    }

    // Paging runs after the invites: a follow-up refresh would drop loaded pages.
    let loaded = screen.load_pages(pages).await?;
    if loaded < pages {
        debug!("feed exhausted after {loaded} of {pages} page(s)");
    }

    let view = screen.snapshot().await;
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&view)?);
        }
        OutputFormat::Text => print_view(&view, context),
    }

    screen.teardown().await
}

fn print_view(view: &ViewModel, context: Role) {
    println!("{}", style(format!("Discover ({})", context.as_str())).bold().underlined());
    println!();

    if view.rows.is_empty() {
        println!("  No records loaded.");
    } else {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .apply_modifier(UTF8_ROUND_CORNERS)
            .set_content_arrangement(ContentArrangement::Dynamic);

        table.set_header(vec!["ID", "Name", "School", "Status", "Action"]);

        for row in &view.rows {
            let record = &row.record;
            let name = record
                .display_name
                .as_deref()
                .or(record.username.as_deref())
                .unwrap_or("-");
            let action = if row.disabled {
                format!("{} (disabled)", styled_label(row.label, row.category).dim())
            } else {
                styled_label(row.label, row.category).to_string()
            };
            table.add_row(vec![
                record.id.clone().unwrap_or_else(|| "-".to_string()),
                truncate(name, 30),
                truncate(record.visible_school_name().unwrap_or("-"), 24),
                record.status.to_string(),
                action,
            ]);
        }

        println!("{table}");
    }

    let paging = if view.has_more { "more available" } else { "end of list" };
    println!("\n{} record(s) loaded, {paging}", view.rows.len());

    if !view.invites.is_empty() {
        println!("\n{}", style("Invites").bold());
        for entry in &view.invites {
            println!(
                "  {} {} ({})",
                style(&entry.entry_id).dim(),
                entry.target_id,
                entry.status
            );
        }
    }

    let waiting = if view.is_waiting {
        style("waiting on a pending invite").yellow()
    } else {
        style("ready").green()
    };
    println!("\nRoster: {} accepted, {waiting}", view.accepted_count);
}
