//! Project lookups and upserts

use anyhow::{Context, Result};
use chrono::NaiveDate;
use sqlx::SqliteConnection;

/// Find a project by case-insensitive exact name match.
pub async fn find_by_name(conn: &mut SqliteConnection, name: &str) -> Result<Option<i64>> {
    let id: Option<i64> =
        sqlx::query_scalar("SELECT id FROM projects WHERE LOWER(name) = LOWER(?) LIMIT 1")
            .bind(name)
            .fetch_optional(conn)
            .await
            .with_context(|| format!("Failed to look up project '{}'", name))?;
    Ok(id)
}

/// Create a project from an export row.
///
/// The account name doubles as the client name; the start date is the run's
/// configured default. Returns the new project id.
pub async fn insert(
    conn: &mut SqliteConnection,
    name: &str,
    assigned_pdm: &str,
    business_unit_head: Option<&str>,
    status: &str,
    start_date: NaiveDate,
) -> Result<i64> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO projects (name, assigned_pdm, business_unit_head, status, client, start_date)
         VALUES (?, ?, ?, ?, ?, ?)
         RETURNING id",
    )
    .bind(name)
    .bind(assigned_pdm)
    .bind(business_unit_head)
    .bind(status)
    .bind(name)
    .bind(start_date)
    .fetch_one(conn)
    .await
    .with_context(|| format!("Failed to insert project '{}'", name))?;
    Ok(id)
}

/// Overwrite an existing project's identity fields and status.
///
/// Name, client and start date are never touched on update.
pub async fn update(
    conn: &mut SqliteConnection,
    id: i64,
    assigned_pdm: &str,
    business_unit_head: Option<&str>,
    status: &str,
) -> Result<()> {
    sqlx::query(
        "UPDATE projects
         SET assigned_pdm = ?,
             business_unit_head = ?,
             status = ?,
             updated_at = CURRENT_TIMESTAMP
         WHERE id = ?",
    )
    .bind(assigned_pdm)
    .bind(business_unit_head)
    .bind(status)
    .bind(id)
    .execute(conn)
    .await
    .with_context(|| format!("Failed to update project {}", id))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::ensure_schema;
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

    #[tokio::test]
    async fn test_name_lookup_is_case_insensitive() {
        let pool = test_pool().await;
        let mut conn = pool.acquire().await.unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();

        let id = insert(&mut conn, "Acme Corp", "dd-1", Some("buh@x.com"), "Active", date)
            .await
            .unwrap();

        assert_eq!(find_by_name(&mut conn, "ACME CORP").await.unwrap(), Some(id));
        assert_eq!(find_by_name(&mut conn, "acme corp").await.unwrap(), Some(id));
        assert_eq!(find_by_name(&mut conn, "Globex").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_update_leaves_name_client_and_start_date_alone() {
        let pool = test_pool().await;
        let mut conn = pool.acquire().await.unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();

        let id = insert(&mut conn, "Acme", "dd-1", None, "Active", date)
            .await
            .unwrap();
        update(&mut conn, id, "dd-2", Some("buh@x.com"), "On Hold")
            .await
            .unwrap();

        let (name, client, start, pdm, status): (String, String, String, String, String) =
            sqlx::query_as(
                "SELECT name, client, start_date, assigned_pdm, status FROM projects WHERE id = ?",
            )
            .bind(id)
            .fetch_one(&mut *conn)
            .await
            .unwrap();

        assert_eq!(name, "Acme");
        assert_eq!(client, "Acme");
        assert_eq!(start, "2025-01-01");
        assert_eq!(pdm, "dd-2");
        assert_eq!(status, "On Hold");
    }
}
