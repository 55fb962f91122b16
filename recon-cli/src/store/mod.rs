//! Repository layer for the project store

pub mod operations;
pub mod projects;
pub mod users;

use anyhow::{Context, Result};
use sqlx::SqlitePool;

/// Open a pool against the store database.
pub async fn connect(database_url: &str) -> Result<SqlitePool> {
    SqlitePool::connect(database_url)
        .await
        .with_context(|| format!("Failed to connect to database: {}", database_url))
}

/// Idempotent schema bootstrap.
///
/// The store schema is owned by the main application; this mirror exists so a
/// fresh SQLite file (and the in-memory test databases) is immediately
/// usable. Every statement is `IF NOT EXISTS`, so running against a live
/// store is a no-op.
pub async fn ensure_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS users (
             id TEXT PRIMARY KEY,
             name TEXT,
             email TEXT,
             role TEXT NOT NULL
         )",
    )
    .execute(pool)
    .await
    .context("Failed to create users table")?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS projects (
             id INTEGER PRIMARY KEY AUTOINCREMENT,
             name TEXT NOT NULL,
             assigned_pdm TEXT,
             business_unit_head TEXT,
             status TEXT NOT NULL DEFAULT 'Active',
             client TEXT,
             start_date TEXT,
             created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
             updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
         )",
    )
    .execute(pool)
    .await
    .context("Failed to create projects table")?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS project_operations (
             id INTEGER PRIMARY KEY AUTOINCREMENT,
             project_id INTEGER NOT NULL REFERENCES projects(id),
             month INTEGER NOT NULL,
             year INTEGER NOT NULL,
             team_size INTEGER NOT NULL DEFAULT 0,
             revenue REAL NOT NULL DEFAULT 0,
             cost REAL NOT NULL DEFAULT 0,
             gm_percentage REAL NOT NULL DEFAULT 0,
             utilization_percentage REAL NOT NULL DEFAULT 0,
             shadows INTEGER NOT NULL DEFAULT 0,
             ramp_up INTEGER NOT NULL DEFAULT 0,
             ramp_down INTEGER NOT NULL DEFAULT 0,
             submitted_by TEXT,
             created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
             updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
             UNIQUE (project_id, month, year)
         )",
    )
    .execute(pool)
    .await
    .context("Failed to create project_operations table")?;

    Ok(())
}
