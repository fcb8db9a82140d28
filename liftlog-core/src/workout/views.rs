use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::models::{ExecutionLog, ExerciseCategory, LogStatus, SessionLog};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionLogView {
    pub id: Uuid,
    pub session_name: String,
    pub plan_name: String,
    pub plan_description: String,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub status: LogStatus,
    pub notes: Option<String>,
    pub original_session_id: Uuid,
    pub execution_logs: Vec<ExecutionLogView>,
    pub execution_log_count: usize,
}

impl From<SessionLog> for SessionLogView {
    fn from(log: SessionLog) -> Self {
        let execution_logs: Vec<ExecutionLogView> =
            log.execution_logs.into_iter().map(Into::into).collect();
        SessionLogView {
            id: log.id,
            session_name: log.session_name,
            plan_name: log.plan_name,
            plan_description: log.plan_description,
            started_at: log.started_at,
            completed_at: log.completed_at,
            status: log.status,
            notes: log.notes,
            original_session_id: log.original_session_id,
            execution_log_count: execution_logs.len(),
            execution_logs,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionLogView {
    pub id: Uuid,
    pub session_log_id: Uuid,
    pub exercise_execution_id: Uuid,
    pub exercise_execution_order: i32,
    pub planned_sets: i32,
    pub planned_reps: i32,
    pub planned_weight: i32,
    pub exercise_id: Uuid,
    pub exercise_name: String,
    pub exercise_category: ExerciseCategory,
    pub exercise_muscle_groups: Vec<String>,
    pub exercise_description: Option<String>,
    pub actual_sets: i32,
    pub actual_reps: i32,
    pub actual_weight: i32,
    pub completed: bool,
    pub notes: Option<String>,
}

impl From<ExecutionLog> for ExecutionLogView {
    fn from(log: ExecutionLog) -> Self {
        ExecutionLogView {
            id: log.id,
            session_log_id: log.session_log_id,
            exercise_execution_id: log.exercise_execution_id,
            exercise_execution_order: log.exercise_execution_order,
            planned_sets: log.planned_sets,
            planned_reps: log.planned_reps,
            planned_weight: log.planned_weight,
            exercise_id: log.exercise_id,
            exercise_name: log.exercise_name,
            exercise_category: log.exercise_category,
            exercise_muscle_groups: log.exercise_muscle_groups,
            exercise_description: log.exercise_description,
            actual_sets: log.actual_sets,
            actual_reps: log.actual_reps,
            actual_weight: log.actual_weight,
            completed: log.completed,
            notes: log.notes,
        }
    }
}

/// Partial update of a session log. Absent fields are left alone.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionLogUpdate {
    pub notes: Option<String>,
    pub status: Option<LogStatus>,
}

/// Partial update of an execution log. Absent fields are left alone.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionLogUpdate {
    pub actual_sets: Option<i32>,
    pub actual_reps: Option<i32>,
    pub actual_weight: Option<i32>,
    pub completed: Option<bool>,
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn execution_log(parent: Uuid, position: i32) -> ExecutionLog {
        ExecutionLog {
            id: Uuid::new_v4(),
            session_log_id: parent,
            position,
            exercise_execution_id: Uuid::new_v4(),
            exercise_execution_order: position + 1,
            planned_sets: 3,
            planned_reps: 10,
            planned_weight: 50,
            exercise_id: Uuid::new_v4(),
            exercise_name: "Bench Press".into(),
            exercise_category: ExerciseCategory::FreeWeight,
            exercise_description: None,
            actual_sets: 3,
            actual_reps: 10,
            actual_weight: 50,
            completed: false,
            notes: None,
            exercise_muscle_groups: vec!["Chest".into()],
        }
    }

    #[test]
    fn view_counts_embedded_execution_logs() {
        let id = Uuid::new_v4();
        let log = SessionLog {
            id,
            owner_id: Uuid::new_v4(),
            original_session_id: Uuid::new_v4(),
            session_name: "Push".into(),
            plan_name: "No Plan".into(),
            plan_description: String::new(),
            started_at: Utc.with_ymd_and_hms(2026, 1, 2, 7, 0, 0).unwrap(),
            completed_at: None,
            status: LogStatus::InProgress,
            notes: None,
            execution_logs: vec![execution_log(id, 0), execution_log(id, 1)],
        };

        let view = SessionLogView::from(log);
        assert_eq!(view.execution_log_count, 2);
        assert_eq!(view.execution_logs.len(), 2);

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["executionLogCount"], 2);
        assert_eq!(json["status"], "InProgress");
        assert!(json["completedAt"].is_null());
        assert_eq!(json["executionLogs"][0]["exerciseCategory"], "FreeWeight");
        assert_eq!(json["executionLogs"][0]["sessionLogId"], id.to_string());
    }

    #[test]
    fn update_bodies_treat_missing_and_null_alike() {
        let update: ExecutionLogUpdate =
            serde_json::from_str(r#"{"actualSets": 4, "notes": null}"#).unwrap();
        assert_eq!(update.actual_sets, Some(4));
        assert_eq!(update.actual_reps, None);
        assert_eq!(update.notes, None);

        let update: SessionLogUpdate = serde_json::from_str(r#"{"status":"Completed"}"#).unwrap();
        assert_eq!(update.status, Some(LogStatus::Completed));
    }
}
