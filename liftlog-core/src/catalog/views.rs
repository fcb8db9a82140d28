use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::models::{Exercise, ExerciseCategory, ExerciseExecutionDetail, Plan, Session};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseView {
    pub id: Uuid,
    pub name: String,
    pub category: ExerciseCategory,
    pub muscle_groups: Vec<String>,
    pub description: Option<String>,
}

impl From<Exercise> for ExerciseView {
    fn from(e: Exercise) -> Self {
        ExerciseView {
            id: e.id,
            name: e.name,
            category: e.category,
            muscle_groups: e.muscle_groups,
            description: e.description,
        }
    }
}

/// Body of exercise create and update requests.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseInput {
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub muscle_groups: Vec<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanView {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub sessions: Vec<SessionView>,
}

impl PlanView {
    pub fn new(plan: Plan, sessions: Vec<SessionView>) -> Self {
        PlanView {
            id: plan.id,
            name: plan.name,
            description: plan.description,
            sessions,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanInput {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanUpdate {
    pub name: String,
    pub description: Option<String>,
    /// When present, the complete set of sessions the plan should hold.
    pub sessions: Option<Vec<Uuid>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub id: Uuid,
    pub name: String,
    pub plan_id: Option<Uuid>,
    pub order_id: i32,
    pub exercise_executions_count: usize,
    pub session_log_count: i64,
    pub exercise_executions: Vec<ExerciseExecutionView>,
}

impl SessionView {
    pub fn new(
        session: Session,
        executions: Vec<ExerciseExecutionView>,
        session_log_count: i64,
    ) -> Self {
        SessionView {
            id: session.id,
            name: session.name,
            plan_id: session.plan_id,
            order_id: session.order_id,
            exercise_executions_count: executions.len(),
            session_log_count,
            exercise_executions: executions,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInput {
    pub name: String,
    pub plan_id: Uuid,
    pub order_id: i32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUpdate {
    pub name: String,
    pub plan_id: Option<Uuid>,
    pub order_id: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseExecutionView {
    pub id: Uuid,
    pub planned_sets: i32,
    pub planned_reps: i32,
    pub planned_weight: i32,
    pub order_id: i32,
    pub session_id: Uuid,
    pub session_name: String,
    pub exercise_id: Uuid,
    pub exercise_name: String,
}

impl From<ExerciseExecutionDetail> for ExerciseExecutionView {
    fn from(d: ExerciseExecutionDetail) -> Self {
        ExerciseExecutionView {
            id: d.execution.id,
            planned_sets: d.execution.planned_sets,
            planned_reps: d.execution.planned_reps,
            planned_weight: d.execution.planned_weight,
            order_id: d.execution.order_id,
            session_id: d.execution.session_id,
            session_name: d.session_name,
            exercise_id: d.execution.exercise_id,
            exercise_name: d.exercise_name,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseExecutionInput {
    pub session_id: Uuid,
    pub exercise_id: Uuid,
    pub planned_sets: i32,
    pub planned_reps: i32,
    pub planned_weight: i32,
    pub order_id: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseExecutionUpdate {
    pub planned_sets: Option<i32>,
    pub planned_reps: Option<i32>,
    pub planned_weight: Option<i32>,
    pub order_id: Option<i32>,
    pub exercise_id: Option<Uuid>,
}
