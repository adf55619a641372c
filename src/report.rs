use chrono::{DateTime, Local};
use std::path::Path;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::info;

use crate::error::ReportError;
use crate::record::{RepositoryRecord, KEY_ERROR, KEY_NO_LICENSE};

/// File the report is saved to unless another path is given.
pub const DEFAULT_OUTPUT: &str = "github_license_report_playwright.json";

const DESCRIPTION_LIMIT: usize = 100;
const RULE_WIDTH: usize = 80;

/// Cut `text` to 100 characters, marking the cut with `...`.
pub fn truncate_description(text: &str) -> String {
    if text.chars().count() <= DESCRIPTION_LIMIT {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(DESCRIPTION_LIMIT).collect();
        format!("{}...", truncated)
    }
}

/// Format `n` with `,` between groups of three digits.
pub fn format_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Human-readable block for one record, numbered from `index`.
pub fn render_record(index: usize, record: &RepositoryRecord) -> String {
    let mut out = format!(
        "{}. {}\n   Description: {}\n   Language: {}\n   Stars: {} | Forks: {}\n   License: {}\n   URL: {}\n",
        index,
        record.repository,
        truncate_description(&record.description),
        record.language,
        format_thousands(record.stars),
        format_thousands(record.forks),
        record.license.name,
        record.url,
    );

    // Flag repositories a consumer would have to follow up on
    match record.license.key.as_str() {
        KEY_NO_LICENSE => out.push_str("   ⚠️  No license is set\n"),
        KEY_ERROR => out.push_str("   ❌ Failed to read license information\n"),
        _ => {}
    }
    out
}

/// The full console report.
pub fn render_results(records: &[RepositoryRecord], generated_at: DateTime<Local>) -> String {
    if records.is_empty() {
        return "No results to display.\n".to_string();
    }

    let rule = "=".repeat(RULE_WIDTH);
    let mut out = format!(
        "{rule}\nGitHub Repository License Check Results\nGenerated at {}\n{rule}\n",
        generated_at.format("%Y-%m-%d %H:%M:%S"),
    );

    for (i, record) in records.iter().enumerate() {
        out.push('\n');
        out.push_str(&render_record(i + 1, record));
    }

    let missing = records.iter().filter(|r| r.license.is_missing()).count();
    out.push_str(&format!(
        "\n{} repositories checked, {} without a detected license\n",
        records.len(),
        missing
    ));
    out
}

/// Print the report to stdout.
pub fn display_results(records: &[RepositoryRecord]) {
    println!("\n{}", render_results(records, Local::now()));
}

/// Records as pretty-printed JSON with non-ASCII text kept literal.
pub fn to_json(records: &[RepositoryRecord]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(records)
}

/// Write the records to `path` as UTF-8 JSON.
pub async fn export_json(
    records: &[RepositoryRecord],
    path: impl AsRef<Path>,
) -> Result<(), ReportError> {
    let path = path.as_ref();
    let json = to_json(records)?;

    let mut file = File::create(path).await?;
    file.write_all(json.as_bytes()).await?;
    file.write_all(b"\n").await?;
    file.flush().await?;

    info!("Saved {} records to '{}'", records.len(), path.display());
    Ok(())
}
