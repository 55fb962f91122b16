mod handler;

pub use handler::handle_load_command;

use std::path::PathBuf;

use clap::Args;

#[derive(Args)]
pub struct LoadArgs {
    /// Path to the CSV export file
    pub csv_file: PathBuf,

    /// Database URL for the project store (falls back to DATABASE_URL)
    #[arg(long)]
    pub database: Option<String>,

    /// Mapping configuration file (master-data tables, months, year)
    #[arg(long, default_value = "mappings.toml")]
    pub mappings: PathBuf,
}
