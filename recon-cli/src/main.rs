mod cli;
mod config;
mod ingest;
mod mapping;
mod normalize;
mod reconcile;
mod report;
mod store;

use clap::Parser;
use colored::*;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Load(args) => cli::commands::load::handle_load_command(args).await,
    };

    if let Err(err) = result {
        // {:?} on anyhow prints the whole context chain.
        eprintln!();
        eprintln!("{} {:?}", "❌ Error:".red().bold(), err);
        std::process::exit(1);
    }
}
