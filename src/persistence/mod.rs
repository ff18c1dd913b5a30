use anyhow::{Context, Result};
use serde_json::json;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;
use tracing::info;

use crate::core::SchemaRecord;

const CSV_HEADER: [&str; 7] = [
    "url",
    "name",
    "title",
    "description",
    "image",
    "faqs_count",
    "faqs_json",
];

fn needs_quotes(field: &str) -> bool {
    field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r')
}

fn csv_field(field: &str) -> String {
    if needs_quotes(field) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn csv_row(fields: &[String]) -> String {
    fields
        .iter()
        .map(|field| csv_field(field))
        .collect::<Vec<_>>()
        .join(",")
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
    }
    Ok(())
}

/// Appends one generation to the tabular extraction log and the JSONL
/// schema log, creating both files (and the CSV header) on first use.
pub fn save_outputs(record: &SchemaRecord, csv_path: &Path, jsonl_path: &Path) -> Result<()> {
    ensure_parent(csv_path)?;
    ensure_parent(jsonl_path)?;

    let faqs_json = serde_json::to_string(&record.extracted.faqs)
        .context("Failed to serialize FAQ list")?;
    let row = csv_row(&[
        record.url.clone(),
        record.name.clone(),
        record.extracted.title.clone(),
        record.extracted.description.clone(),
        record.extracted.image.clone(),
        record.extracted.faqs.len().to_string(),
        faqs_json,
    ]);

    let write_header = fs::metadata(csv_path).map(|meta| meta.len() == 0).unwrap_or(true);
    let mut csv_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(csv_path)
        .with_context(|| format!("Failed to open CSV file: {}", csv_path.display()))?;
    if write_header {
        writeln!(csv_file, "{}", CSV_HEADER.join(","))?;
    }
    writeln!(csv_file, "{row}")?;

    let line = serde_json::to_string(&json!({"url": record.url, "schema": record.schema}))
        .context("Failed to serialize schema line")?;
    let mut jsonl_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(jsonl_path)
        .with_context(|| format!("Failed to open JSONL file: {}", jsonl_path.display()))?;
    writeln!(jsonl_file, "{line}")?;

    info!(
        "Saved record for {} to {} and {}",
        record.url,
        csv_path.display(),
        jsonl_path.display()
    );

    Ok(())
}
