//! Grouped report rendering and CSV output.
//!
//! Diff entries are grouped per key in first-appearance order. Presence
//! entries render as their literal kind tokens; value entries render as
//! `<field> [<staging> → <production>]`, with both values HTML-escaped when
//! the field (or its prefix before the colon, for sub-attribute fields) is
//! in the configured escape set. One output row per affected key.

use std::collections::{HashMap, HashSet, hash_map::Entry};

use anyhow::{Context, Result};
use itertools::Itertools;
use log::info;
use quick_xml::escape::escape;

use crate::{
    catalog::Catalog,
    config::Config,
    diff::{DiffEntry, DiffKind},
    io_utils,
};

const WEBSITES_COLUMN: &str = "product_websites";

/// Writes the grouped diff report to `config.output_file`. An empty diff
/// logs a notice and creates no file.
pub fn write_report(entries: &[DiffEntry], config: &Config, staging: &Catalog) -> Result<()> {
    if entries.is_empty() {
        info!("No differences found between the two catalogs");
        return Ok(());
    }

    let grouped = group_entries(entries, &config.html_fields, staging);

    let mut writer = io_utils::open_report_writer(&config.output_file)?;
    writer
        .write_record([config.key_field.as_str(), WEBSITES_COLUMN, "differences"])
        .context("Writing report header")?;
    for (key, row) in &grouped {
        let differences = row.descriptions.iter().join("; ");
        writer
            .write_record([key.as_str(), row.websites.as_str(), differences.as_str()])
            .context("Writing report row")?;
    }
    writer.flush().context("Flushing report output")?;

    info!("Report written to {:?}", config.output_file);
    info!("Total differences found: {}", entries.len());
    Ok(())
}

struct ReportRow {
    descriptions: Vec<String>,
    websites: String,
}

/// Groups rendered descriptions per key, first appearance first, and pulls
/// the auxiliary websites value from the staging record (empty when the key
/// is production-only).
fn group_entries(
    entries: &[DiffEntry],
    html_fields: &HashSet<String>,
    staging: &Catalog,
) -> Vec<(String, ReportRow)> {
    let mut order: Vec<String> = Vec::new();
    let mut grouped: HashMap<String, Vec<String>> = HashMap::new();

    for entry in entries {
        let bucket = match grouped.entry(entry.key.clone()) {
            Entry::Occupied(occupied) => occupied.into_mut(),
            Entry::Vacant(vacant) => {
                order.push(entry.key.clone());
                vacant.insert(Vec::new())
            }
        };
        bucket.push(render_entry(entry, html_fields));
    }

    order
        .into_iter()
        .map(|key| {
            let websites = staging
                .get(&key)
                .and_then(|record| record.get(WEBSITES_COLUMN))
                .cloned()
                .unwrap_or_default();
            let descriptions = grouped.remove(&key).unwrap_or_default();
            (key, ReportRow { descriptions, websites })
        })
        .collect()
}

fn render_entry(entry: &DiffEntry, html_fields: &HashSet<String>) -> String {
    match entry.kind {
        DiffKind::MissingInProduction | DiffKind::ExtraInProduction => entry.kind.to_string(),
        DiffKind::DifferentValue | DiffKind::DifferentAttribute => {
            let (staging_value, production_value) = if requires_escaping(&entry.field, html_fields)
            {
                (
                    escape(entry.staging_value.as_str()).into_owned(),
                    escape(entry.production_value.as_str()).into_owned(),
                )
            } else {
                (entry.staging_value.clone(), entry.production_value.clone())
            };
            format!(
                "{} [{} \u{2192} {}]",
                entry.field, staging_value, production_value
            )
        }
    }
}

/// A sub-attribute field like `additional_attributes:size` escapes when its
/// column prefix is configured, not just on an exact match.
fn requires_escaping(field: &str, html_fields: &HashSet<String>) -> bool {
    if html_fields.contains(field) {
        return true;
    }
    match field.split_once(':') {
        Some((prefix, _)) => html_fields.contains(prefix),
        None => false,
    }
}
