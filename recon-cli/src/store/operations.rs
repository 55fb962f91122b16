//! Monthly operations record upserts

use anyhow::{Context, Result};
use sqlx::SqliteConnection;

/// One project-month of delivery metrics, ready for storage.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationsRecord {
    pub project_id: i64,
    pub month: i32,
    pub year: i32,
    pub team_size: i64,
    pub revenue: f64,
    pub cost: f64,
    pub gm_percentage: f64,
    pub utilization_percentage: f64,
    pub shadows: i64,
    pub ramp_up: i64,
    pub ramp_down: i64,
    pub submitted_by: String,
}

/// Insert or overwrite the record for a (project, month, year) key.
///
/// On conflict every metric column and `updated_at` are overwritten; the key
/// columns, `submitted_by` and the creation timestamp keep their original
/// values, so the first run's submitter survives re-runs.
pub async fn upsert(conn: &mut SqliteConnection, record: &OperationsRecord) -> Result<()> {
    sqlx::query(
        "INSERT INTO project_operations
         (project_id, month, year, team_size, revenue, cost, gm_percentage,
          utilization_percentage, shadows, ramp_up, ramp_down, submitted_by)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
         ON CONFLICT(project_id, month, year)
         DO UPDATE SET
             team_size = excluded.team_size,
             revenue = excluded.revenue,
             cost = excluded.cost,
             gm_percentage = excluded.gm_percentage,
             utilization_percentage = excluded.utilization_percentage,
             shadows = excluded.shadows,
             ramp_up = excluded.ramp_up,
             ramp_down = excluded.ramp_down,
             updated_at = CURRENT_TIMESTAMP",
    )
    .bind(record.project_id)
    .bind(record.month)
    .bind(record.year)
    .bind(record.team_size)
    .bind(record.revenue)
    .bind(record.cost)
    .bind(record.gm_percentage)
    .bind(record.utilization_percentage)
    .bind(record.shadows)
    .bind(record.ramp_up)
    .bind(record.ramp_down)
    .bind(&record.submitted_by)
    .execute(conn)
    .await
    .with_context(|| {
        format!(
            "Failed to upsert operations for project {} month {}/{}",
            record.project_id, record.month, record.year
        )
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{ensure_schema, projects};
    use chrono::NaiveDate;
    use sqlx::SqlitePool;
    use sqlx::sqlite::SqlitePoolOptions;

    // One connection max: every fresh connection to sqlite::memory: is its
    // own empty database.
    async fn test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        ensure_schema(&pool).await.unwrap();
        pool
    }

    fn record(project_id: i64, month: i32) -> OperationsRecord {
        OperationsRecord {
            project_id,
            month,
            year: 2025,
            team_size: 10,
            revenue: 1000.0,
            cost: 800.0,
            gm_percentage: 20.0,
            utilization_percentage: 85.0,
            shadows: 1,
            ramp_up: 0,
            ramp_down: 0,
            submitted_by: "admin-1".to_string(),
        }
    }

    #[tokio::test]
    async fn test_conflict_overwrites_instead_of_duplicating() {
        let pool = test_pool().await;
        let mut conn = pool.acquire().await.unwrap();

        let date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let project_id = projects::insert(&mut conn, "Acme", "dd-1", None, "Active", date)
            .await
            .unwrap();

        upsert(&mut conn, &record(project_id, 3)).await.unwrap();
        let mut second = record(project_id, 3);
        second.revenue = 2000.0;
        second.team_size = 12;
        upsert(&mut conn, &second).await.unwrap();

        let (count, revenue, team_size): (i64, f64, i64) = sqlx::query_as(
            "SELECT COUNT(*), MAX(revenue), MAX(team_size)
             FROM project_operations WHERE project_id = ? AND month = 3 AND year = 2025",
        )
        .bind(project_id)
        .fetch_one(&mut *conn)
        .await
        .unwrap();

        assert_eq!(count, 1);
        assert_eq!(revenue, 2000.0);
        assert_eq!(team_size, 12);
    }

    #[tokio::test]
    async fn test_conflict_keeps_original_submitter() {
        let pool = test_pool().await;
        let mut conn = pool.acquire().await.unwrap();

        let date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let project_id = projects::insert(&mut conn, "Acme", "dd-1", None, "Active", date)
            .await
            .unwrap();

        let mut first = record(project_id, 3);
        first.submitted_by = "admin-first".to_string();
        upsert(&mut conn, &first).await.unwrap();

        // A later run by a different admin overwrites the metrics but not
        // who originally submitted the record.
        let mut second = record(project_id, 3);
        second.submitted_by = "admin-second".to_string();
        second.revenue = 2000.0;
        upsert(&mut conn, &second).await.unwrap();

        let (submitted_by, revenue): (String, f64) = sqlx::query_as(
            "SELECT submitted_by, revenue
             FROM project_operations WHERE project_id = ? AND month = 3 AND year = 2025",
        )
        .bind(project_id)
        .fetch_one(&mut *conn)
        .await
        .unwrap();

        assert_eq!(submitted_by, "admin-first");
        assert_eq!(revenue, 2000.0);
    }

    #[tokio::test]
    async fn test_distinct_months_are_distinct_rows() {
        let pool = test_pool().await;
        let mut conn = pool.acquire().await.unwrap();

        let date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let project_id = projects::insert(&mut conn, "Acme", "dd-1", None, "Active", date)
            .await
            .unwrap();

        upsert(&mut conn, &record(project_id, 1)).await.unwrap();
        upsert(&mut conn, &record(project_id, 2)).await.unwrap();

        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM project_operations WHERE project_id = ?")
                .bind(project_id)
                .fetch_one(&mut *conn)
                .await
                .unwrap();
        assert_eq!(count, 2);
    }
}
