pub mod attrs;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod diff;
pub mod io_utils;
pub mod report;
pub mod rows;

use std::{env, sync::OnceLock};

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, debug, info};

use crate::{cli::Cli, config::Config};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("catalog_diff", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    let mut config = Config::load(&cli.config)
        .with_context(|| format!("Loading configuration from {:?}", cli.config))?;
    config.apply_overrides(&cli);
    execute(&config)
}

/// Runs one full comparison: load both catalogs, diff them, write the report.
pub fn execute(config: &Config) -> Result<()> {
    let delimiter = config.delimiter()?;
    let staging_path = config.staging_path()?;
    let production_path = config.production_path()?;

    info!(
        "Comparing '{}' (staging) against '{}' (production) with delimiter '{}'",
        staging_path.display(),
        production_path.display(),
        printable_delimiter(delimiter)
    );

    let staging_text = io_utils::read_document(staging_path)?;
    let production_text = io_utils::read_document(production_path)?;

    let staging = catalog::load_catalog(
        &staging_text,
        delimiter,
        &config.special_field,
        &config.key_field,
        &config.attr_separator,
    )
    .with_context(|| format!("Loading staging catalog from {staging_path:?}"))?;
    let production = catalog::load_catalog(
        &production_text,
        delimiter,
        &config.special_field,
        &config.key_field,
        &config.attr_separator,
    )
    .with_context(|| format!("Loading production catalog from {production_path:?}"))?;
    debug!(
        "Loaded {} staging record(s) and {} production record(s)",
        staging.len(),
        production.len()
    );

    let settings = diff::DiffSettings {
        exclude_columns: &config.exclude_columns,
        special_field: &config.special_field,
        attr_separator: &config.attr_separator,
        exclude_attributes: &config.exclude_additional_attributes,
    };
    let entries = diff::compare_catalogs(&staging, &production, &settings);

    report::write_report(&entries, config, &staging)
}

pub(crate) fn printable_delimiter(delimiter: u8) -> String {
    match delimiter {
        b',' => ",".to_string(),
        b'\t' => "\\t".to_string(),
        b'\n' => "\\n".to_string(),
        other => (other as char).to_string(),
    }
}
