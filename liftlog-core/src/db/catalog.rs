//! Queries over the exercise/plan/session catalog.

use sqlx::SqliteConnection;
use uuid::Uuid;

use crate::Result;
use crate::db::models::{
    Exercise, ExerciseExecution, ExerciseExecutionDetail, Plan, PlannedExercise, Session,
};

// Exercises
pub async fn list_exercises(conn: &mut SqliteConnection) -> Result<Vec<Exercise>> {
    let mut exercises =
        sqlx::query_as::<_, Exercise>("SELECT * FROM exercises ORDER BY name COLLATE NOCASE")
            .fetch_all(&mut *conn)
            .await?;
    for exercise in &mut exercises {
        exercise.muscle_groups = exercise_muscle_groups(conn, exercise.id).await?;
    }
    Ok(exercises)
}

pub async fn find_exercise(conn: &mut SqliteConnection, id: Uuid) -> Result<Option<Exercise>> {
    let exercise = sqlx::query_as::<_, Exercise>("SELECT * FROM exercises WHERE id = ?1")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    match exercise {
        Some(mut exercise) => {
            exercise.muscle_groups = exercise_muscle_groups(conn, exercise.id).await?;
            Ok(Some(exercise))
        }
        None => Ok(None),
    }
}

pub async fn count_exercises(conn: &mut SqliteConnection) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM exercises")
        .fetch_one(conn)
        .await?;
    Ok(count)
}

/// Whether another exercise (not `except`) already uses `name`, ignoring case.
pub async fn exercise_name_taken(
    conn: &mut SqliteConnection,
    name: &str,
    except: Option<Uuid>,
) -> Result<bool> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM exercises
         WHERE name = ?1 COLLATE NOCASE AND (?2 IS NULL OR id <> ?2)",
    )
    .bind(name)
    .bind(except)
    .fetch_one(conn)
    .await?;
    Ok(count > 0)
}

/// Inserts or fully replaces an exercise row and its muscle groups.
pub async fn save_exercise(conn: &mut SqliteConnection, exercise: &Exercise) -> Result<()> {
    sqlx::query(
        "INSERT INTO exercises (id, name, category, description) VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT (id) DO UPDATE SET
            name = excluded.name,
            category = excluded.category,
            description = excluded.description",
    )
    .bind(exercise.id)
    .bind(&exercise.name)
    .bind(exercise.category)
    .bind(&exercise.description)
    .execute(&mut *conn)
    .await?;

    sqlx::query("DELETE FROM exercise_muscle_groups WHERE exercise_id = ?1")
        .bind(exercise.id)
        .execute(&mut *conn)
        .await?;
    for (position, group) in exercise.muscle_groups.iter().enumerate() {
        sqlx::query(
            "INSERT INTO exercise_muscle_groups (exercise_id, position, muscle_group)
             VALUES (?1, ?2, ?3)",
        )
        .bind(exercise.id)
        .bind(position as i64)
        .bind(group)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

/// Removes the exercise. Its muscle groups and every execution that
/// references it go with it through the foreign keys.
pub async fn delete_exercise(conn: &mut SqliteConnection, id: Uuid) -> Result<u64> {
    let result = sqlx::query("DELETE FROM exercises WHERE id = ?1")
        .bind(id)
        .execute(conn)
        .await?;
    Ok(result.rows_affected())
}

async fn exercise_muscle_groups(conn: &mut SqliteConnection, exercise_id: Uuid) -> Result<Vec<String>> {
    let groups = sqlx::query_scalar::<_, String>(
        "SELECT muscle_group FROM exercise_muscle_groups WHERE exercise_id = ?1 ORDER BY position",
    )
    .bind(exercise_id)
    .fetch_all(conn)
    .await?;
    Ok(groups)
}

// Plans
pub async fn list_plans(conn: &mut SqliteConnection) -> Result<Vec<Plan>> {
    let plans = sqlx::query_as::<_, Plan>("SELECT * FROM plans ORDER BY name COLLATE NOCASE")
        .fetch_all(conn)
        .await?;
    Ok(plans)
}

pub async fn find_plan(conn: &mut SqliteConnection, id: Uuid) -> Result<Option<Plan>> {
    let plan = sqlx::query_as::<_, Plan>("SELECT * FROM plans WHERE id = ?1")
        .bind(id)
        .fetch_optional(conn)
        .await?;
    Ok(plan)
}

pub async fn plan_name_taken(
    conn: &mut SqliteConnection,
    name: &str,
    except: Option<Uuid>,
) -> Result<bool> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM plans WHERE name = ?1 COLLATE NOCASE AND (?2 IS NULL OR id <> ?2)",
    )
    .bind(name)
    .bind(except)
    .fetch_one(conn)
    .await?;
    Ok(count > 0)
}

pub async fn save_plan(conn: &mut SqliteConnection, plan: &Plan) -> Result<()> {
    sqlx::query(
        "INSERT INTO plans (id, name, description) VALUES (?1, ?2, ?3)
         ON CONFLICT (id) DO UPDATE SET name = excluded.name, description = excluded.description",
    )
    .bind(plan.id)
    .bind(&plan.name)
    .bind(&plan.description)
    .execute(conn)
    .await?;
    Ok(())
}

/// Removes the plan; its sessions stay behind with no plan.
pub async fn delete_plan(conn: &mut SqliteConnection, id: Uuid) -> Result<u64> {
    let result = sqlx::query("DELETE FROM plans WHERE id = ?1")
        .bind(id)
        .execute(conn)
        .await?;
    Ok(result.rows_affected())
}

// Sessions
pub async fn list_sessions(conn: &mut SqliteConnection, plan_id: Option<Uuid>) -> Result<Vec<Session>> {
    let sessions = sqlx::query_as::<_, Session>(
        "SELECT * FROM sessions WHERE (?1 IS NULL OR plan_id = ?1) ORDER BY order_id, name",
    )
    .bind(plan_id)
    .fetch_all(conn)
    .await?;
    Ok(sessions)
}

pub async fn find_session(conn: &mut SqliteConnection, id: Uuid) -> Result<Option<Session>> {
    let session = sqlx::query_as::<_, Session>("SELECT * FROM sessions WHERE id = ?1")
        .bind(id)
        .fetch_optional(conn)
        .await?;
    Ok(session)
}

pub async fn count_sessions_in_plan(
    conn: &mut SqliteConnection,
    plan_id: Uuid,
    except: Option<Uuid>,
) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM sessions WHERE plan_id = ?1 AND (?2 IS NULL OR id <> ?2)",
    )
    .bind(plan_id)
    .bind(except)
    .fetch_one(conn)
    .await?;
    Ok(count)
}

pub async fn session_name_taken(
    conn: &mut SqliteConnection,
    plan_id: Uuid,
    name: &str,
    except: Option<Uuid>,
) -> Result<bool> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM sessions
         WHERE plan_id = ?1 AND name = ?2 AND (?3 IS NULL OR id <> ?3)",
    )
    .bind(plan_id)
    .bind(name)
    .bind(except)
    .fetch_one(conn)
    .await?;
    Ok(count > 0)
}

pub async fn session_order_taken(
    conn: &mut SqliteConnection,
    plan_id: Uuid,
    order_id: i32,
    except: Option<Uuid>,
) -> Result<bool> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM sessions
         WHERE plan_id = ?1 AND order_id = ?2 AND (?3 IS NULL OR id <> ?3)",
    )
    .bind(plan_id)
    .bind(order_id)
    .bind(except)
    .fetch_one(conn)
    .await?;
    Ok(count > 0)
}

pub async fn save_session(conn: &mut SqliteConnection, session: &Session) -> Result<()> {
    sqlx::query(
        "INSERT INTO sessions (id, name, plan_id, order_id) VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT (id) DO UPDATE SET
            name = excluded.name,
            plan_id = excluded.plan_id,
            order_id = excluded.order_id",
    )
    .bind(session.id)
    .bind(&session.name)
    .bind(session.plan_id)
    .bind(session.order_id)
    .execute(conn)
    .await?;
    Ok(())
}

/// Detaches every session of `plan_id` that is not in `keep`.
pub async fn detach_sessions_except(
    conn: &mut SqliteConnection,
    plan_id: Uuid,
    keep: &[Uuid],
) -> Result<()> {
    let attached = list_sessions(&mut *conn, Some(plan_id)).await?;
    for session in attached.into_iter().filter(|s| !keep.contains(&s.id)) {
        sqlx::query("UPDATE sessions SET plan_id = NULL WHERE id = ?1")
            .bind(session.id)
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}

/// Removes the session and its executions. Logs started from it are kept.
pub async fn delete_session(conn: &mut SqliteConnection, id: Uuid) -> Result<u64> {
    let result = sqlx::query("DELETE FROM sessions WHERE id = ?1")
        .bind(id)
        .execute(conn)
        .await?;
    Ok(result.rows_affected())
}

// Exercise executions
const EXECUTION_DETAIL_SELECT: &str = "SELECT x.id, x.session_id, x.exercise_id, x.planned_sets,
        x.planned_reps, x.planned_weight, x.order_id,
        s.name AS session_name, e.name AS exercise_name
    FROM exercise_executions x
    JOIN sessions s ON s.id = x.session_id
    JOIN exercises e ON e.id = x.exercise_id";

pub async fn list_executions(
    conn: &mut SqliteConnection,
    session_id: Option<Uuid>,
) -> Result<Vec<ExerciseExecutionDetail>> {
    let sql = format!(
        "{EXECUTION_DETAIL_SELECT} WHERE (?1 IS NULL OR x.session_id = ?1)
         ORDER BY s.name, x.order_id"
    );
    let executions = sqlx::query_as::<_, ExerciseExecutionDetail>(&sql)
        .bind(session_id)
        .fetch_all(conn)
        .await?;
    Ok(executions)
}

pub async fn find_execution_detail(
    conn: &mut SqliteConnection,
    id: Uuid,
) -> Result<Option<ExerciseExecutionDetail>> {
    let sql = format!("{EXECUTION_DETAIL_SELECT} WHERE x.id = ?1");
    let execution = sqlx::query_as::<_, ExerciseExecutionDetail>(&sql)
        .bind(id)
        .fetch_optional(conn)
        .await?;
    Ok(execution)
}

pub async fn find_execution(conn: &mut SqliteConnection, id: Uuid) -> Result<Option<ExerciseExecution>> {
    let execution =
        sqlx::query_as::<_, ExerciseExecution>("SELECT * FROM exercise_executions WHERE id = ?1")
            .bind(id)
            .fetch_optional(conn)
            .await?;
    Ok(execution)
}

pub async fn exercise_in_session(
    conn: &mut SqliteConnection,
    session_id: Uuid,
    exercise_id: Uuid,
    except: Option<Uuid>,
) -> Result<bool> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM exercise_executions
         WHERE session_id = ?1 AND exercise_id = ?2 AND (?3 IS NULL OR id <> ?3)",
    )
    .bind(session_id)
    .bind(exercise_id)
    .bind(except)
    .fetch_one(conn)
    .await?;
    Ok(count > 0)
}

/// The execution of the session holding `order_id`, other than `except`.
pub async fn execution_at_order(
    conn: &mut SqliteConnection,
    session_id: Uuid,
    order_id: i32,
    except: Option<Uuid>,
) -> Result<Option<ExerciseExecution>> {
    let execution = sqlx::query_as::<_, ExerciseExecution>(
        "SELECT * FROM exercise_executions
         WHERE session_id = ?1 AND order_id = ?2 AND (?3 IS NULL OR id <> ?3)
         LIMIT 1",
    )
    .bind(session_id)
    .bind(order_id)
    .bind(except)
    .fetch_optional(conn)
    .await?;
    Ok(execution)
}

pub async fn next_execution_order(conn: &mut SqliteConnection, session_id: Uuid) -> Result<i32> {
    let max = sqlx::query_scalar::<_, Option<i32>>(
        "SELECT MAX(order_id) FROM exercise_executions WHERE session_id = ?1",
    )
    .bind(session_id)
    .fetch_one(conn)
    .await?;
    Ok(max.map(|n| n + 1).unwrap_or(1))
}

pub async fn save_execution(conn: &mut SqliteConnection, execution: &ExerciseExecution) -> Result<()> {
    sqlx::query(
        "INSERT INTO exercise_executions
            (id, session_id, exercise_id, planned_sets, planned_reps, planned_weight, order_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
         ON CONFLICT (id) DO UPDATE SET
            session_id = excluded.session_id,
            exercise_id = excluded.exercise_id,
            planned_sets = excluded.planned_sets,
            planned_reps = excluded.planned_reps,
            planned_weight = excluded.planned_weight,
            order_id = excluded.order_id",
    )
    .bind(execution.id)
    .bind(execution.session_id)
    .bind(execution.exercise_id)
    .bind(execution.planned_sets)
    .bind(execution.planned_reps)
    .bind(execution.planned_weight)
    .bind(execution.order_id)
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn set_execution_order(conn: &mut SqliteConnection, id: Uuid, order_id: i32) -> Result<()> {
    sqlx::query("UPDATE exercise_executions SET order_id = ?1 WHERE id = ?2")
        .bind(order_id)
        .bind(id)
        .execute(conn)
        .await?;
    Ok(())
}

pub async fn delete_execution(conn: &mut SqliteConnection, id: Uuid) -> Result<u64> {
    let result = sqlx::query("DELETE FROM exercise_executions WHERE id = ?1")
        .bind(id)
        .execute(conn)
        .await?;
    Ok(result.rows_affected())
}

/// The session's prescriptions in ascending planned order, each joined
/// with its exercise and that exercise's muscle groups.
pub async fn planned_exercises(
    conn: &mut SqliteConnection,
    session_id: Uuid,
) -> Result<Vec<PlannedExercise>> {
    let mut planned = sqlx::query_as::<_, PlannedExercise>(
        "SELECT x.id AS execution_id, x.order_id, x.planned_sets, x.planned_reps,
                x.planned_weight, e.id AS exercise_id, e.name AS exercise_name,
                e.category AS exercise_category, e.description AS exercise_description
         FROM exercise_executions x JOIN exercises e ON e.id = x.exercise_id
         WHERE x.session_id = ?1
         ORDER BY x.order_id, x.rowid",
    )
    .bind(session_id)
    .fetch_all(&mut *conn)
    .await?;

    for entry in &mut planned {
        entry.muscle_groups = exercise_muscle_groups(conn, entry.exercise_id).await?;
    }
    Ok(planned)
}
