//! Command-line interface

pub mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "recon-cli",
    version,
    about = "Reconcile a delivery metrics CSV export against the project store"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load a CSV export: map names, normalize metrics, upsert projects and
    /// monthly operations records
    Load(commands::load::LoadArgs),
}
