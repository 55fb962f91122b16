//! Load command handler: the run driver
//!
//! Owns the database session and the transaction boundary. The whole run is
//! one transaction with a single commit at the very end; a failure before
//! commit leaves the store untouched.

use anyhow::{Context, Result};

use super::LoadArgs;
use crate::config::RunConfig;
use crate::ingest;
use crate::reconcile::Reconciler;
use crate::report::{self, DiscrepancyLog};
use crate::store::{self, users};

pub async fn handle_load_command(args: LoadArgs) -> Result<()> {
    let config = RunConfig::load(&args.mappings)?;
    log::info!(
        "Loaded mapping config: {} DD aliases, {} BUH aliases, {} months, year {}",
        config.directors.aliases.len(),
        config.business_unit_heads.aliases.len(),
        config.months.len(),
        config.year
    );

    let database_url = args
        .database
        .clone()
        .or_else(|| std::env::var("DATABASE_URL").ok())
        .context("No database URL given. Pass --database or set DATABASE_URL.")?;

    let rows = ingest::read_rows(&args.csv_file)?;

    let pool = store::connect(&database_url).await?;
    store::ensure_schema(&pool).await?;

    let mut tx = pool.begin().await.context("Failed to begin transaction")?;

    let admin_id = users::find_admin_id(&mut tx)
        .await?
        .context("No admin user found in store; operations records need a submitted_by")?;
    log::info!("Submitting operations records as admin user {}", admin_id);

    let reconciler = Reconciler::new(config, admin_id);
    let mut discrepancies = DiscrepancyLog::new();
    let summary = reconciler
        .reconcile_all(&mut tx, &rows, &mut discrepancies)
        .await?;

    tx.commit().await.context("Failed to commit run")?;
    log::info!(
        "Run committed: {} created, {} updated, {} operations records, {} rows skipped, {} discrepancies",
        summary.projects_created,
        summary.projects_updated,
        summary.operations_upserted,
        summary.rows_skipped,
        discrepancies.len()
    );

    report::print_report(&summary, discrepancies);
    Ok(())
}
