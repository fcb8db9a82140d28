pub mod catalog;
pub mod logs;
pub mod models;
pub mod users;

use crate::Result;
use log::{debug, info};
pub use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Sqlite, Transaction};
use std::str::FromStr;
use std::time::Duration;

/// Opens (creating if needed) the database at `url` and brings the schema up to date.
pub async fn connect(url: &str) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .busy_timeout(Duration::from_millis(5000))
        .foreign_keys(true);
    let pool = SqlitePool::connect_with(options).await?;

    init_database(&pool).await?;
    Ok(pool)
}

/// A private in-memory database. One connection only: every new
/// connection to `:memory:` would see an empty database.
pub async fn connect_in_memory() -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    init_database(&pool).await?;
    Ok(pool)
}

/// Opens a transaction that holds the write lock from its first statement.
///
/// A deferred `BEGIN` that reads before writing cannot upgrade its snapshot
/// once another connection has committed, and SQLite fails it with
/// `SQLITE_BUSY` without consulting the busy timeout. Taking the lock up
/// front makes concurrent writers queue on the timeout instead.
pub async fn begin_write(pool: &SqlitePool) -> Result<Transaction<'static, Sqlite>> {
    Ok(pool.begin_with("BEGIN IMMEDIATE").await?)
}

pub async fn clear_all_tables(pool: &SqlitePool) -> Result<()> {
    let mut tx = begin_write(pool).await?;
    for table in [
        "execution_log_muscle_groups",
        "execution_logs",
        "session_logs",
        "exercise_executions",
        "sessions",
        "plans",
        "exercise_muscle_groups",
        "exercises",
        "users",
    ] {
        debug!("clearing table {}", table);
        sqlx::query(&format!("DELETE FROM {table}"))
            .execute(&mut *tx)
            .await?;
    }
    tx.commit().await?;
    Ok(())
}

struct Migration {
    name: &'static str,
    up_sql: &'static str,
}

const MIGRATION_2026_10_01_090000_0000_SETUP_TABLES: &str =
    include_str!("../../../migrations/2026-10-01-090000-0000_setup_tables/up.sql");

const MIGRATIONS: &[Migration] = &[Migration {
    name: "2026-10-01-090000-0000_setup_tables",
    up_sql: MIGRATION_2026_10_01_090000_0000_SETUP_TABLES,
}];

async fn init_migrations_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS _migrations (
            id INTEGER NOT NULL PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            applied_at INTEGER NOT NULL DEFAULT (CAST(strftime('%s','now') AS INTEGER))
        )",
    )
    .execute(pool)
    .await?;
    Ok(())
}

async fn is_migration_applied(pool: &SqlitePool, migration_name: &str) -> Result<bool> {
    let result =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM _migrations WHERE name = ?1")
            .bind(migration_name)
            .fetch_one(pool)
            .await?;
    Ok(result > 0)
}

fn parse_sql_statements(sql: &str) -> Vec<String> {
    sql.lines()
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.is_empty() && !trimmed.starts_with("--")
        })
        .collect::<Vec<_>>()
        .join("\n")
        .split(';')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Applies every migration not yet recorded in `_migrations`. Each
/// migration runs in its own transaction together with its bookkeeping row.
pub async fn init_database(pool: &SqlitePool) -> Result<()> {
    init_migrations_table(pool).await?;

    for migration in MIGRATIONS {
        if is_migration_applied(pool, migration.name).await? {
            debug!("Migration {} already applied, skipping", migration.name);
            continue;
        }

        info!("Applying migration: {}", migration.name);
        let mut tx = begin_write(pool).await?;
        for statement in parse_sql_statements(migration.up_sql) {
            sqlx::query(&statement)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    crate::LiftlogError::Internal(format!(
                        "Failed to execute migration statement in {}: {} - Error: {}",
                        migration.name, statement, e
                    ))
                })?;
        }
        sqlx::query("INSERT INTO _migrations (name) VALUES (?1)")
            .bind(migration.name)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        info!("Migration {} applied successfully", migration.name);
    }

    Ok(())
}
