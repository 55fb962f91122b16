//! User lookups

use anyhow::{Context, Result};
use sqlx::SqliteConnection;

/// Find the acting admin user for this run.
///
/// Every operations record carries the admin's id in `submitted_by`; a store
/// without an admin user cannot accept a load and the caller treats `None`
/// as fatal.
pub async fn find_admin_id(conn: &mut SqliteConnection) -> Result<Option<String>> {
    let id: Option<String> =
        sqlx::query_scalar("SELECT id FROM users WHERE role = 'Admin' LIMIT 1")
            .fetch_optional(conn)
            .await
            .context("Failed to look up admin user")?;
    Ok(id)
}
