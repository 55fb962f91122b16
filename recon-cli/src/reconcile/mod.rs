//! Per-row reconciliation of the export against the project store
//!
//! Each CSV row walks a small state machine: skip-empty-account, resolve
//! identities, upsert the project, then for each configured month upsert an
//! operations record when that month carries any data. Identity failures and
//! per-month insert failures land in the discrepancy log; only store-level
//! setup errors abort the run.

use anyhow::Result;
use sqlx::SqliteConnection;

use crate::config::RunConfig;
use crate::ingest::CsvRow;
use crate::mapping::IdentityMapper;
use crate::normalize::{clean_count, clean_currency, clean_percentage, gross_margin};
use crate::report::{DiscrepancyLog, RunSummary};
use crate::store::operations::{self, OperationsRecord};
use crate::store::projects;

pub struct Reconciler {
    config: RunConfig,
    director_mapper: IdentityMapper,
    buh_mapper: IdentityMapper,
    admin_id: String,
}

impl Reconciler {
    pub fn new(config: RunConfig, admin_id: String) -> Self {
        let director_mapper = IdentityMapper::new("DD", config.directors.clone());
        let buh_mapper = IdentityMapper::new("BUH", config.business_unit_heads.clone());
        Self {
            config,
            director_mapper,
            buh_mapper,
            admin_id,
        }
    }

    /// Reconcile every row of the export inside the caller's transaction.
    pub async fn reconcile_all(
        &self,
        conn: &mut SqliteConnection,
        rows: &[CsvRow],
        log: &mut DiscrepancyLog,
    ) -> Result<RunSummary> {
        let mut summary = RunSummary::default();
        for row in rows {
            self.reconcile_row(conn, row, &mut summary, log).await?;
        }
        Ok(summary)
    }

    /// Run one export row through the state machine.
    pub async fn reconcile_row(
        &self,
        conn: &mut SqliteConnection,
        row: &CsvRow,
        summary: &mut RunSummary,
        log: &mut DiscrepancyLog,
    ) -> Result<()> {
        let account_name = row.get_trimmed("Account Name");
        if account_name.is_empty() {
            // Filler rows in the export; not an anomaly.
            return Ok(());
        }

        // Both identities are always resolved so both sets of discrepancies
        // get logged, even when the DD failure ends up skipping the row.
        let dd_id = self.director_mapper.resolve(row.get_trimmed("DD"), log);
        let buh_id = self.buh_mapper.resolve(row.get_trimmed("BUH"), log);

        let Some(dd_id) = dd_id else {
            log.warn(format!(
                "Row {} ({}): Skipping - no valid DD mapping",
                row.line, account_name
            ));
            summary.rows_skipped += 1;
            return Ok(());
        };

        let status = match row.get_trimmed("Status") {
            "" => "Active",
            other => other,
        };

        let project_id = match projects::find_by_name(conn, account_name).await? {
            Some(id) => {
                projects::update(conn, id, &dd_id, buh_id.as_deref(), status).await?;
                summary.projects_updated += 1;
                id
            }
            None => {
                let id = projects::insert(
                    conn,
                    account_name,
                    &dd_id,
                    buh_id.as_deref(),
                    status,
                    self.config.project_start_date,
                )
                .await?;
                summary.projects_created += 1;
                id
            }
        };
        log::debug!("Row {}: project '{}' -> id {}", row.line, account_name, project_id);

        for month in &self.config.months {
            let team_size = clean_count(row.get(&format!("{} Team size", month.label)));
            let revenue = clean_currency(row.get(&format!("{} Revenue", month.label)));
            let cost = clean_currency(row.get(&format!("{} Cost", month.label)));

            // A month with none of the three driver fields carries no data.
            if team_size.is_none() && revenue.is_none() && cost.is_none() {
                continue;
            }

            let shadows = clean_count(row.get(&format!("{} shadows", month.label))).unwrap_or(0);
            let ramp_up = clean_count(row.get(&format!("{} ramp up", month.label))).unwrap_or(0);
            let ramp_down =
                clean_count(row.get(&format!("{} ramp down", month.label))).unwrap_or(0);
            let utilization =
                clean_percentage(row.get(&format!("{} utilization", month.label))).unwrap_or(0.0);

            let record = OperationsRecord {
                project_id,
                month: i32::from(month.number),
                year: self.config.year,
                team_size: team_size.unwrap_or(0),
                revenue: revenue.unwrap_or(0.0),
                cost: cost.unwrap_or(0.0),
                gm_percentage: gross_margin(revenue, cost),
                utilization_percentage: utilization,
                shadows,
                ramp_up,
                ramp_down,
                submitted_by: self.admin_id.clone(),
            };

            match operations::upsert(conn, &record).await {
                Ok(()) => summary.operations_upserted += 1,
                Err(err) => {
                    log::warn!(
                        "operations upsert failed for '{}' {}: {:#}",
                        account_name,
                        month.label,
                        err
                    );
                    log.warn(format!(
                        "Error inserting operations for {} - {}: {:#}",
                        account_name, month.label, err
                    ));
                }
            }
        }

        Ok(())
    }
}
