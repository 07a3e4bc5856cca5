//! JSON configuration for a comparison run.
//!
//! Every option has a default except the two catalog locations, which are
//! required and validated before any file is read. Unknown keys are ignored
//! so configs can carry operator notes.

use std::{
    collections::HashSet,
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, anyhow, ensure};
use serde::Deserialize;

use crate::cli::Cli;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Column that uniquely identifies a record across both catalogs.
    #[serde(default = "Config::default_key_field")]
    pub key_field: String,
    /// Single-character delimiter for both input documents.
    #[serde(default = "Config::default_csv_delimiter")]
    pub csv_delimiter: String,
    /// Separator between `key=value` pairs inside the free-text field.
    #[serde(default = "Config::default_attr_separator")]
    pub attr_separator: String,
    /// Columns skipped entirely during comparison.
    #[serde(default)]
    pub exclude_columns: HashSet<String>,
    /// Sub-attribute keys skipped within the free-text field.
    #[serde(default)]
    pub exclude_additional_attributes: HashSet<String>,
    /// Columns (and sub-field prefixes) whose report values are HTML-escaped.
    #[serde(default)]
    pub html_fields: HashSet<String>,
    /// The free-text column that may embed the delimiter and line breaks.
    #[serde(default = "Config::default_special_field")]
    pub special_field: String,
    /// Destination of the diff report.
    #[serde(default = "Config::default_output_file")]
    pub output_file: PathBuf,
    /// Staging catalog location (required).
    #[serde(default)]
    pub master_file: Option<PathBuf>,
    /// Production catalog location (required).
    #[serde(default)]
    pub comparison_file: Option<PathBuf>,
}

impl Config {
    fn default_key_field() -> String {
        "sku".to_string()
    }

    fn default_csv_delimiter() -> String {
        ",".to_string()
    }

    fn default_attr_separator() -> String {
        "\u{a7}".to_string()
    }

    fn default_special_field() -> String {
        "additional_attributes".to_string()
    }

    fn default_output_file() -> PathBuf {
        PathBuf::from("output/diff_report.csv")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("Opening config file {path:?}"))?;
        let config: Config = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Parsing config file {path:?}"))?;
        ensure!(
            !config.attr_separator.is_empty(),
            "'attr_separator' cannot be empty"
        );
        ensure!(!config.key_field.is_empty(), "'key_field' cannot be empty");
        Ok(config)
    }

    pub fn apply_overrides(&mut self, cli: &Cli) {
        if let Some(staging) = &cli.staging {
            self.master_file = Some(staging.clone());
        }
        if let Some(production) = &cli.production {
            self.comparison_file = Some(production.clone());
        }
        if let Some(output) = &cli.output {
            self.output_file = output.clone();
        }
    }

    pub fn delimiter(&self) -> Result<u8> {
        parse_delimiter(&self.csv_delimiter)
            .map_err(|err| anyhow!("Invalid 'csv_delimiter': {err}"))
    }

    pub fn staging_path(&self) -> Result<&Path> {
        self.master_file
            .as_deref()
            .ok_or_else(|| anyhow!("Configuration is missing 'master_file' (staging catalog)"))
    }

    pub fn production_path(&self) -> Result<&Path> {
        self.comparison_file.as_deref().ok_or_else(|| {
            anyhow!("Configuration is missing 'comparison_file' (production catalog)")
        })
    }
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}
