//! Queries over `session_logs` and `execution_logs`.
//!
//! Every lookup that can be reached by a principal takes the owner id and
//! filters on it in SQL, so a foreign row is indistinguishable from a
//! missing one.

use sqlx::SqliteConnection;
use uuid::Uuid;

use crate::Result;
use crate::db::models::{ExecutionLog, OwnedExecutionLog, SessionLog};

const EXECUTION_LOG_COLUMNS: &str = "e.id, e.session_log_id, e.position, e.exercise_execution_id,
    e.exercise_execution_order, e.planned_sets, e.planned_reps, e.planned_weight, e.exercise_id,
    e.exercise_name, e.exercise_category, e.exercise_description, e.actual_sets, e.actual_reps,
    e.actual_weight, e.completed, e.notes";

/// Inserts a session log together with all of its execution logs.
/// Callers run this inside a transaction.
pub async fn insert_session_log(conn: &mut SqliteConnection, log: &SessionLog) -> Result<()> {
    sqlx::query(
        "INSERT INTO session_logs (id, owner_id, original_session_id, session_name, plan_name,
            plan_description, started_at, completed_at, status, notes)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
    )
    .bind(log.id)
    .bind(log.owner_id)
    .bind(log.original_session_id)
    .bind(&log.session_name)
    .bind(&log.plan_name)
    .bind(&log.plan_description)
    .bind(log.started_at)
    .bind(log.completed_at)
    .bind(log.status)
    .bind(&log.notes)
    .execute(&mut *conn)
    .await?;

    for entry in &log.execution_logs {
        sqlx::query(
            "INSERT INTO execution_logs (id, session_log_id, position, exercise_execution_id,
                exercise_execution_order, planned_sets, planned_reps, planned_weight, exercise_id,
                exercise_name, exercise_category, exercise_description, actual_sets, actual_reps,
                actual_weight, completed, notes)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)",
        )
        .bind(entry.id)
        .bind(log.id)
        .bind(entry.position)
        .bind(entry.exercise_execution_id)
        .bind(entry.exercise_execution_order)
        .bind(entry.planned_sets)
        .bind(entry.planned_reps)
        .bind(entry.planned_weight)
        .bind(entry.exercise_id)
        .bind(&entry.exercise_name)
        .bind(entry.exercise_category)
        .bind(&entry.exercise_description)
        .bind(entry.actual_sets)
        .bind(entry.actual_reps)
        .bind(entry.actual_weight)
        .bind(entry.completed)
        .bind(&entry.notes)
        .execute(&mut *conn)
        .await?;

        for (position, group) in entry.exercise_muscle_groups.iter().enumerate() {
            sqlx::query(
                "INSERT INTO execution_log_muscle_groups (execution_log_id, position, muscle_group)
                 VALUES (?1, ?2, ?3)",
            )
            .bind(entry.id)
            .bind(position as i64)
            .bind(group)
            .execute(&mut *conn)
            .await?;
        }
    }

    Ok(())
}

pub async fn find_session_log(
    conn: &mut SqliteConnection,
    id: Uuid,
    owner_id: Uuid,
) -> Result<Option<SessionLog>> {
    let log = sqlx::query_as::<_, SessionLog>(
        "SELECT * FROM session_logs WHERE id = ?1 AND owner_id = ?2",
    )
    .bind(id)
    .bind(owner_id)
    .fetch_optional(&mut *conn)
    .await?;

    match log {
        Some(mut log) => {
            log.execution_logs = execution_logs_of(conn, log.id).await?;
            Ok(Some(log))
        }
        None => Ok(None),
    }
}

/// The owner's logs, newest first, optionally limited to one originating session.
pub async fn list_session_logs(
    conn: &mut SqliteConnection,
    owner_id: Uuid,
    original_session_id: Option<Uuid>,
) -> Result<Vec<SessionLog>> {
    let mut logs = sqlx::query_as::<_, SessionLog>(
        "SELECT * FROM session_logs
         WHERE owner_id = ?1 AND (?2 IS NULL OR original_session_id = ?2)
         ORDER BY started_at DESC, rowid DESC",
    )
    .bind(owner_id)
    .bind(original_session_id)
    .fetch_all(&mut *conn)
    .await?;

    for log in &mut logs {
        log.execution_logs = execution_logs_of(conn, log.id).await?;
    }
    Ok(logs)
}

pub async fn count_session_logs(
    conn: &mut SqliteConnection,
    owner_id: Uuid,
    original_session_id: Uuid,
) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM session_logs WHERE owner_id = ?1 AND original_session_id = ?2",
    )
    .bind(owner_id)
    .bind(original_session_id)
    .fetch_one(conn)
    .await?;
    Ok(count)
}

/// Writes the mutable columns of a session log. Snapshot columns and the
/// owner are never touched.
pub async fn update_session_log(conn: &mut SqliteConnection, log: &SessionLog) -> Result<u64> {
    let result = sqlx::query(
        "UPDATE session_logs SET status = ?1, completed_at = ?2, notes = ?3
         WHERE id = ?4 AND owner_id = ?5",
    )
    .bind(log.status)
    .bind(log.completed_at)
    .bind(&log.notes)
    .bind(log.id)
    .bind(log.owner_id)
    .execute(conn)
    .await?;
    Ok(result.rows_affected())
}

pub async fn delete_session_log(conn: &mut SqliteConnection, id: Uuid, owner_id: Uuid) -> Result<u64> {
    let result = sqlx::query("DELETE FROM session_logs WHERE id = ?1 AND owner_id = ?2")
        .bind(id)
        .bind(owner_id)
        .execute(conn)
        .await?;
    Ok(result.rows_affected())
}

pub async fn find_execution_log(
    conn: &mut SqliteConnection,
    id: Uuid,
    owner_id: Uuid,
) -> Result<Option<OwnedExecutionLog>> {
    let sql = format!(
        "SELECT {EXECUTION_LOG_COLUMNS}, s.status AS parent_status
         FROM execution_logs e JOIN session_logs s ON s.id = e.session_log_id
         WHERE e.id = ?1 AND s.owner_id = ?2"
    );
    let found = sqlx::query_as::<_, OwnedExecutionLog>(&sql)
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&mut *conn)
        .await?;

    match found {
        Some(mut found) => {
            found.log.exercise_muscle_groups = muscle_groups_of(conn, found.log.id).await?;
            Ok(Some(found))
        }
        None => Ok(None),
    }
}

/// Children of one session log in the order they were planned.
pub async fn execution_logs_of(
    conn: &mut SqliteConnection,
    session_log_id: Uuid,
) -> Result<Vec<ExecutionLog>> {
    let sql = format!(
        "SELECT {EXECUTION_LOG_COLUMNS} FROM execution_logs e
         WHERE e.session_log_id = ?1 ORDER BY e.position"
    );
    let mut logs = sqlx::query_as::<_, ExecutionLog>(&sql)
        .bind(session_log_id)
        .fetch_all(&mut *conn)
        .await?;

    for log in &mut logs {
        log.exercise_muscle_groups = muscle_groups_of(conn, log.id).await?;
    }
    Ok(logs)
}

/// Every execution log under every session log the owner has.
pub async fn list_owned_execution_logs(
    conn: &mut SqliteConnection,
    owner_id: Uuid,
) -> Result<Vec<ExecutionLog>> {
    let sql = format!(
        "SELECT {EXECUTION_LOG_COLUMNS}
         FROM execution_logs e JOIN session_logs s ON s.id = e.session_log_id
         WHERE s.owner_id = ?1
         ORDER BY s.started_at DESC, s.rowid DESC, e.position"
    );
    let mut logs = sqlx::query_as::<_, ExecutionLog>(&sql)
        .bind(owner_id)
        .fetch_all(&mut *conn)
        .await?;

    for log in &mut logs {
        log.exercise_muscle_groups = muscle_groups_of(conn, log.id).await?;
    }
    Ok(logs)
}

pub async fn update_execution_log(conn: &mut SqliteConnection, log: &ExecutionLog) -> Result<u64> {
    let result = sqlx::query(
        "UPDATE execution_logs
         SET actual_sets = ?1, actual_reps = ?2, actual_weight = ?3, completed = ?4, notes = ?5
         WHERE id = ?6",
    )
    .bind(log.actual_sets)
    .bind(log.actual_reps)
    .bind(log.actual_weight)
    .bind(log.completed)
    .bind(&log.notes)
    .bind(log.id)
    .execute(conn)
    .await?;
    Ok(result.rows_affected())
}

pub async fn delete_execution_log(conn: &mut SqliteConnection, id: Uuid) -> Result<u64> {
    let result = sqlx::query("DELETE FROM execution_logs WHERE id = ?1")
        .bind(id)
        .execute(conn)
        .await?;
    Ok(result.rows_affected())
}

async fn muscle_groups_of(conn: &mut SqliteConnection, execution_log_id: Uuid) -> Result<Vec<String>> {
    let groups = sqlx::query_scalar::<_, String>(
        "SELECT muscle_group FROM execution_log_muscle_groups
         WHERE execution_log_id = ?1 ORDER BY position",
    )
    .bind(execution_log_id)
    .fetch_all(conn)
    .await?;
    Ok(groups)
}
