//! Life cycle of a session log: `InProgress` until it is completed or
//! cancelled, after which neither the log nor its execution logs change.

use chrono::{DateTime, Utc};
use std::fmt;

pub use crate::db::models::LogStatus;
use crate::{LiftlogError, Result};

/// The kinds of change a log can be asked to undergo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Update,
    Delete,
    UpdateExercises,
    DeleteExercises,
}

/// Result of a status change: the new status and the completion instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub status: LogStatus,
    pub completed_at: Option<DateTime<Utc>>,
}

impl LogStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, LogStatus::InProgress)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LogStatus::InProgress => "InProgress",
            LogStatus::Completed => "Completed",
            LogStatus::Cancelled => "Cancelled",
        }
    }

    fn adjective(self) -> &'static str {
        match self {
            LogStatus::InProgress => "in-progress",
            LogStatus::Completed => "completed",
            LogStatus::Cancelled => "cancelled",
        }
    }

    /// Rejects `mutation` unless the log is still in progress.
    pub fn guard(self, mutation: Mutation) -> Result<()> {
        if !self.is_terminal() {
            return Ok(());
        }
        let state = self.adjective();
        let msg = match mutation {
            Mutation::Update => format!("cannot update a {state} training"),
            Mutation::Delete => format!("cannot delete a {state} training"),
            Mutation::UpdateExercises => format!("cannot update exercises in a {state} training"),
            Mutation::DeleteExercises => format!("cannot delete exercises from a {state} training"),
        };
        Err(LiftlogError::Invalid(msg))
    }

    /// Moves from `self` to `target` at `now`.
    ///
    /// Staying `InProgress` is a no-op. Entering a terminal status stamps
    /// `completed_at` unless one is already recorded. Leaving a terminal
    /// status is never allowed.
    pub fn transition_to(
        self,
        target: LogStatus,
        completed_at: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Result<Transition> {
        self.guard(Mutation::Update)?;
        let completed_at = match target {
            LogStatus::InProgress => None,
            LogStatus::Completed | LogStatus::Cancelled => completed_at.or(Some(now)),
        };
        Ok(Transition {
            status: target,
            completed_at,
        })
    }
}

impl fmt::Display for LogStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
