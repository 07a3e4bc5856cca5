use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Compare two delimited product catalogs and report field-level differences",
    long_about = None
)]
pub struct Cli {
    /// Path to the JSON configuration file
    #[arg(short, long, default_value = "config.json")]
    pub config: PathBuf,
    /// Override the staging (master) catalog path from the configuration
    #[arg(long)]
    pub staging: Option<PathBuf>,
    /// Override the production (comparison) catalog path from the configuration
    #[arg(long)]
    pub production: Option<PathBuf>,
    /// Override the report output path from the configuration
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,
}
