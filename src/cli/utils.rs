//! Shared utilities for CLI output

use tabled::{Table, Tabled, settings::Style};

use crate::workflow::{Outcome, SyncStatus};

#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "Item")]
    item: &'static str,
    #[tabled(rename = "Result")]
    value: String,
}

/// Human-readable sync status
pub fn format_sync_status(status: SyncStatus) -> String {
    match status {
        SyncStatus::Skipped => "skipped".to_string(),
        SyncStatus::Succeeded => "finished".to_string(),
        SyncStatus::Failed {
            exit_code: Some(code),
        } => format!("failed (exit code {})", code),
        SyncStatus::Failed { exit_code: None } => "failed to start".to_string(),
    }
}

/// Render the end-of-run summary table
pub fn summary_table(outcome: &Outcome) -> String {
    let rows = vec![
        SummaryRow {
            item: "Deletions listed",
            value: outcome.listed.to_string(),
        },
        SummaryRow {
            item: "Deleted",
            value: outcome.deleted.to_string(),
        },
        SummaryRow {
            item: "Failed deletions",
            value: outcome.failed.to_string(),
        },
        SummaryRow {
            item: "Synchronization",
            value: format_sync_status(outcome.sync),
        },
    ];

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    table.to_string()
}
