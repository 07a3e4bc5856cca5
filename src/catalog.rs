//! Catalog loading: delimited document text in, keyed records out.
//!
//! The first line is the header and defines the column set for every record.
//! Data lines run through the free-text protection in [`crate::rows`] before
//! the generic `csv` parse, and the protected field is restored afterwards.
//! Rows whose key value is missing or empty are dropped; keys are stored
//! trimmed; a later row with the same key replaces the earlier record.

use std::collections::HashMap;

use anyhow::{Context, Result};

use crate::rows;

pub type Record = HashMap<String, String>;

/// Keyed record collection preserving document order.
///
/// Re-inserting an existing key replaces the record but keeps the key's
/// original position, so iteration order always follows first appearance.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    columns: Vec<String>,
    order: Vec<String>,
    records: HashMap<String, Record>,
}

impl Catalog {
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Record> {
        self.records.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.records.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.order.iter()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Record)> {
        self.order.iter().map(|key| (key, &self.records[key]))
    }

    fn insert(&mut self, key: String, record: Record) {
        if self.records.insert(key.clone(), record).is_none() {
            self.order.push(key);
        }
    }
}

/// Parses a full delimited document into a [`Catalog`].
///
/// `special_field` names the free-text column protected during parsing; when
/// it is absent from the header the protection is silently disabled and the
/// document parses as an ordinary delimited file. An empty document yields
/// an empty catalog.
pub fn load_catalog(
    text: &str,
    delimiter: u8,
    special_field: &str,
    key_field: &str,
    attr_separator: &str,
) -> Result<Catalog> {
    let mut lines = text.lines();
    let Some(header_line) = lines.next() else {
        return Ok(Catalog::default());
    };

    // Header fields carry no embedded delimiters; a plain split suffices.
    let columns: Vec<String> = header_line
        .split(delimiter as char)
        .map(|name| name.to_string())
        .collect();
    let special_idx = columns.iter().position(|name| name == special_field);
    let special_column = special_idx.map(|idx| columns[idx].clone());

    let mut processed = String::with_capacity(text.len());
    processed.push_str(header_line);
    processed.push('\n');
    for line in lines {
        processed.push_str(&rows::protect_special_field(
            line,
            delimiter,
            special_idx,
            attr_separator,
        ));
        processed.push('\n');
    }

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(processed.as_bytes());

    let mut catalog = Catalog {
        columns,
        ..Catalog::default()
    };
    for (row_idx, result) in reader.records().enumerate() {
        let row = result.with_context(|| format!("Reading row {}", row_idx + 2))?;
        let mut record: Record = catalog
            .columns
            .iter()
            .zip(row.iter())
            .map(|(name, value)| (name.clone(), value.to_string()))
            .collect();

        if let Some(name) = &special_column
            && let Some(value) = record.get_mut(name)
            && !value.is_empty()
        {
            *value = rows::restore_placeholders(value, attr_separator);
        }

        let key = match record.get(key_field) {
            Some(value) if !value.trim().is_empty() => value.trim().to_string(),
            _ => continue,
        };
        catalog.insert(key, record);
    }
    Ok(catalog)
}
