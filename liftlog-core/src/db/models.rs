use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::LiftlogError;

// Exercise models
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, sqlx::Type, Serialize, Deserialize,
)]
pub enum ExerciseCategory {
    #[default]
    Unspecified,
    BodyWeight,
    FreeWeight,
    Equipment,
}

impl ExerciseCategory {
    pub const ALL: [ExerciseCategory; 4] = [
        ExerciseCategory::Unspecified,
        ExerciseCategory::BodyWeight,
        ExerciseCategory::FreeWeight,
        ExerciseCategory::Equipment,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExerciseCategory::Unspecified => "Unspecified",
            ExerciseCategory::BodyWeight => "BodyWeight",
            ExerciseCategory::FreeWeight => "FreeWeight",
            ExerciseCategory::Equipment => "Equipment",
        }
    }
}

impl fmt::Display for ExerciseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExerciseCategory {
    type Err = LiftlogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ExerciseCategory::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| LiftlogError::invalid(format!("unknown exercise category: {s}")))
    }
}

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Exercise {
    pub id: Uuid,
    pub name: String,
    pub category: ExerciseCategory,
    pub description: Option<String>,
    #[sqlx(skip)]
    pub muscle_groups: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct NewExercise {
    pub name: String,
    pub category: ExerciseCategory,
    pub muscle_groups: Vec<String>,
    pub description: Option<String>,
}

// Plan and session models
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Plan {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Session {
    pub id: Uuid,
    pub name: String,
    pub plan_id: Option<Uuid>,
    pub order_id: i32,
}

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct ExerciseExecution {
    pub id: Uuid,
    pub session_id: Uuid,
    pub exercise_id: Uuid,
    pub planned_sets: i32,
    pub planned_reps: i32,
    pub planned_weight: i32,
    pub order_id: i32,
}

/// An execution joined with the names of its session and exercise.
#[derive(Debug, Clone, FromRow)]
pub struct ExerciseExecutionDetail {
    #[sqlx(flatten)]
    pub execution: ExerciseExecution,
    pub session_name: String,
    pub exercise_name: String,
}

/// One planned prescription together with the exercise it points at,
/// as read when a workout is started.
#[derive(Debug, Clone, FromRow)]
pub struct PlannedExercise {
    pub execution_id: Uuid,
    pub order_id: i32,
    pub planned_sets: i32,
    pub planned_reps: i32,
    pub planned_weight: i32,
    pub exercise_id: Uuid,
    pub exercise_name: String,
    pub exercise_category: ExerciseCategory,
    pub exercise_description: Option<String>,
    #[sqlx(skip)]
    pub muscle_groups: Vec<String>,
}

// User models
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct UserCredentials {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
}

impl From<UserCredentials> for User {
    fn from(c: UserCredentials) -> Self {
        User {
            id: c.id,
            username: c.username,
        }
    }
}

// Workout log models
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, sqlx::Type, Serialize, Deserialize,
)]
pub enum LogStatus {
    #[default]
    InProgress,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct SessionLog {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub original_session_id: Uuid,
    pub session_name: String,
    pub plan_name: String,
    pub plan_description: String,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub status: LogStatus,
    pub notes: Option<String>,
    #[sqlx(skip)]
    pub execution_logs: Vec<ExecutionLog>,
}

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct ExecutionLog {
    pub id: Uuid,
    pub session_log_id: Uuid,
    pub position: i32,
    pub exercise_execution_id: Uuid,
    pub exercise_execution_order: i32,
    pub planned_sets: i32,
    pub planned_reps: i32,
    pub planned_weight: i32,
    pub exercise_id: Uuid,
    pub exercise_name: String,
    pub exercise_category: ExerciseCategory,
    pub exercise_description: Option<String>,
    pub actual_sets: i32,
    pub actual_reps: i32,
    pub actual_weight: i32,
    pub completed: bool,
    pub notes: Option<String>,
    #[sqlx(skip)]
    pub exercise_muscle_groups: Vec<String>,
}

/// An execution log read through its parent, carrying the parent's status.
#[derive(Debug, Clone, FromRow)]
pub struct OwnedExecutionLog {
    #[sqlx(flatten)]
    pub log: ExecutionLog,
    pub parent_status: LogStatus,
}
