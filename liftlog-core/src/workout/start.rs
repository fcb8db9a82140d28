use chrono::{DateTime, Utc};
use log::{info, warn};
use uuid::Uuid;

use crate::db::models::{ExecutionLog, LogStatus, Plan, PlannedExercise, Session, SessionLog};
use crate::db::{begin_write, catalog, logs};
use crate::workout::{SessionLogView, Tracker};
use crate::{LiftlogError, Result};

pub const NO_PLAN_NAME: &str = "No Plan";

/// Builds a fresh in-progress log from a planned session. Every field is
/// copied by value, so later catalog edits never reach the log.
pub fn snapshot(
    owner_id: Uuid,
    session: &Session,
    plan: Option<&Plan>,
    planned: &[PlannedExercise],
    now: DateTime<Utc>,
) -> SessionLog {
    let id = Uuid::new_v4();
    let execution_logs = planned
        .iter()
        .enumerate()
        .map(|(position, p)| ExecutionLog {
            id: Uuid::new_v4(),
            session_log_id: id,
            position: position as i32,
            exercise_execution_id: p.execution_id,
            exercise_execution_order: p.order_id,
            planned_sets: p.planned_sets,
            planned_reps: p.planned_reps,
            planned_weight: p.planned_weight,
            exercise_id: p.exercise_id,
            exercise_name: p.exercise_name.clone(),
            exercise_category: p.exercise_category,
            exercise_description: p.exercise_description.clone(),
            actual_sets: p.planned_sets,
            actual_reps: p.planned_reps,
            actual_weight: p.planned_weight,
            completed: false,
            notes: None,
            exercise_muscle_groups: p.muscle_groups.clone(),
        })
        .collect();

    SessionLog {
        id,
        owner_id,
        original_session_id: session.id,
        session_name: session.name.clone(),
        plan_name: plan.map_or_else(|| NO_PLAN_NAME.to_string(), |p| p.name.clone()),
        plan_description: plan
            .and_then(|p| p.description.clone())
            .unwrap_or_default(),
        started_at: now,
        completed_at: None,
        status: LogStatus::InProgress,
        notes: None,
        execution_logs,
    }
}

impl Tracker {
    /// Starts a workout for `principal` from the planned session `session_id`.
    pub async fn start(&self, session_id: Uuid, principal: &str) -> Result<SessionLogView> {
        let owner = self.resolve_owner(principal).await?;

        let mut tx = begin_write(&self.pool).await?;
        let session = catalog::find_session(&mut tx, session_id)
            .await?
            .ok_or_else(|| LiftlogError::not_found("session not found"))?;
        let plan = match session.plan_id {
            Some(plan_id) => catalog::find_plan(&mut tx, plan_id).await?,
            None => None,
        };
        let planned = catalog::planned_exercises(&mut tx, session.id).await?;
        if planned.is_empty() {
            warn!("refusing to start empty session {}", session.id);
            return Err(LiftlogError::invalid(
                "session must contain at least one exercise",
            ));
        }

        let log = snapshot(owner.id, &session, plan.as_ref(), &planned, self.clock.now());
        logs::insert_session_log(&mut tx, &log).await?;
        tx.commit().await?;

        info!(
            "user {} started log {} from session {} ({} exercises)",
            owner.username,
            log.id,
            session.id,
            log.execution_logs.len()
        );
        Ok(log.into())
    }
}
