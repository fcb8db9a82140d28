//! The only way to fetch a log for reading or mutation. Lookups are keyed
//! by owner in SQL; a foreign id and a missing id fail the same way.

use sqlx::SqliteConnection;
use uuid::Uuid;

use crate::db::logs;
use crate::db::models::{OwnedExecutionLog, SessionLog, User};
use crate::{LiftlogError, Result};

pub async fn owned_session_log(
    conn: &mut SqliteConnection,
    id: Uuid,
    owner: &User,
) -> Result<SessionLog> {
    logs::find_session_log(conn, id, owner.id)
        .await?
        .ok_or_else(LiftlogError::access_denied)
}

pub async fn owned_execution_log(
    conn: &mut SqliteConnection,
    id: Uuid,
    owner: &User,
) -> Result<OwnedExecutionLog> {
    logs::find_execution_log(conn, id, owner.id)
        .await?
        .ok_or_else(LiftlogError::access_denied)
}

/// Logs `owner` has started from `session_id`; zero without an owner.
pub async fn session_log_count(
    conn: &mut SqliteConnection,
    owner: Option<&User>,
    session_id: Uuid,
) -> Result<i64> {
    match owner {
        Some(owner) => logs::count_session_logs(conn, owner.id, session_id).await,
        None => Ok(0),
    }
}
