//! Set-symmetric catalog comparison.
//!
//! Entries come out in staging-iteration order: presence checks and field
//! comparisons for every staging key first, then one `extra_in_production`
//! entry per production-only key. Within the free-text column, sub-key order
//! follows the union as first observed in staging, then production.

use std::{collections::HashSet, fmt};

use crate::{attrs, catalog::Catalog};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffKind {
    MissingInProduction,
    ExtraInProduction,
    DifferentValue,
    DifferentAttribute,
}

impl DiffKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DiffKind::MissingInProduction => "missing_in_production",
            DiffKind::ExtraInProduction => "extra_in_production",
            DiffKind::DifferentValue => "different_value",
            DiffKind::DifferentAttribute => "different_value (additional_attribute)",
        }
    }
}

impl fmt::Display for DiffKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One unit of detected divergence, scoped to a whole record (missing or
/// extra, with empty field and values) or to a single field or sub-field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffEntry {
    pub key: String,
    pub kind: DiffKind,
    pub field: String,
    pub staging_value: String,
    pub production_value: String,
}

impl DiffEntry {
    fn presence(key: &str, kind: DiffKind) -> Self {
        Self {
            key: key.to_string(),
            kind,
            field: String::new(),
            staging_value: String::new(),
            production_value: String::new(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DiffSettings<'a> {
    pub exclude_columns: &'a HashSet<String>,
    pub special_field: &'a str,
    pub attr_separator: &'a str,
    pub exclude_attributes: &'a HashSet<String>,
}

/// Compares `production` against `staging` and returns the ordered diff.
///
/// Values compare trimmed; a column or sub-key present on one side only
/// compares against the empty string.
pub fn compare_catalogs(
    staging: &Catalog,
    production: &Catalog,
    settings: &DiffSettings<'_>,
) -> Vec<DiffEntry> {
    let mut entries = Vec::new();

    for (key, stg_record) in staging.iter() {
        let Some(prod_record) = production.get(key) else {
            entries.push(DiffEntry::presence(key, DiffKind::MissingInProduction));
            continue;
        };

        for column in staging.columns() {
            if settings.exclude_columns.contains(column) {
                continue;
            }
            let stg_value = stg_record.get(column).map(|v| v.trim()).unwrap_or("");
            let prod_value = prod_record.get(column).map(|v| v.trim()).unwrap_or("");

            if column == settings.special_field {
                diff_attributes(key, column, stg_value, prod_value, settings, &mut entries);
            } else if stg_value != prod_value {
                entries.push(DiffEntry {
                    key: key.clone(),
                    kind: DiffKind::DifferentValue,
                    field: column.clone(),
                    staging_value: stg_value.to_string(),
                    production_value: prod_value.to_string(),
                });
            }
        }
    }

    for key in production.keys() {
        if !staging.contains_key(key) {
            entries.push(DiffEntry::presence(key, DiffKind::ExtraInProduction));
        }
    }

    entries
}

/// Symmetric key-wise diff of the decoded attribute maps. Emits one entry
/// per diverging sub-key, rendered as `<column>:<sub_key>`.
fn diff_attributes(
    key: &str,
    column: &str,
    stg_value: &str,
    prod_value: &str,
    settings: &DiffSettings<'_>,
    entries: &mut Vec<DiffEntry>,
) {
    let stg_attrs = attrs::parse_attributes(stg_value, settings.attr_separator);
    let prod_attrs = attrs::parse_attributes(prod_value, settings.attr_separator);

    let mut push = |sub_key: &str, stg_sub: &str, prod_sub: &str| {
        entries.push(DiffEntry {
            key: key.to_string(),
            kind: DiffKind::DifferentAttribute,
            field: format!("{column}:{sub_key}"),
            staging_value: stg_sub.to_string(),
            production_value: prod_sub.to_string(),
        });
    };

    for (sub_key, stg_sub) in stg_attrs.iter() {
        if settings.exclude_attributes.contains(sub_key) {
            continue;
        }
        let prod_sub = prod_attrs.get(sub_key).unwrap_or("");
        if prod_sub != stg_sub {
            push(sub_key, stg_sub, prod_sub);
        }
    }
    for (sub_key, prod_sub) in prod_attrs.iter() {
        if settings.exclude_attributes.contains(sub_key) || stg_attrs.contains_key(sub_key) {
            continue;
        }
        push(sub_key, "", prod_sub);
    }
}
