use log::{debug, warn};
use uuid::Uuid;

use crate::db::{begin_write, logs};
use crate::workout::status::Mutation;
use crate::workout::{ExecutionLogUpdate, ExecutionLogView, Tracker, gate};
use crate::{LiftlogError, Result};

fn non_negative(field: &str, value: Option<i32>) -> Result<()> {
    match value {
        Some(v) if v < 0 => Err(LiftlogError::invalid(format!(
            "actual {field} cannot be negative"
        ))),
        _ => Ok(()),
    }
}

impl ExecutionLogUpdate {
    pub fn validate(&self) -> Result<()> {
        non_negative("sets", self.actual_sets)?;
        non_negative("reps", self.actual_reps)?;
        non_negative("weight", self.actual_weight)?;
        Ok(())
    }
}

impl Tracker {
    /// Execution logs of one of the principal's session logs, or of all of
    /// them when no session log is given.
    pub async fn list_execution_logs(
        &self,
        principal: &str,
        session_log_id: Option<Uuid>,
    ) -> Result<Vec<ExecutionLogView>> {
        let owner = self.resolve_owner(principal).await?;
        let mut conn = self.pool.acquire().await?;
        let found = match session_log_id {
            Some(id) => gate::owned_session_log(&mut conn, id, &owner).await?.execution_logs,
            None => logs::list_owned_execution_logs(&mut conn, owner.id).await?,
        };
        Ok(found.into_iter().map(Into::into).collect())
    }

    pub async fn get_execution_log(&self, id: Uuid, principal: &str) -> Result<ExecutionLogView> {
        let owner = self.resolve_owner(principal).await?;
        let mut conn = self.pool.acquire().await?;
        Ok(gate::owned_execution_log(&mut conn, id, &owner).await?.log.into())
    }

    pub async fn update_execution_log(
        &self,
        id: Uuid,
        principal: &str,
        update: ExecutionLogUpdate,
    ) -> Result<ExecutionLogView> {
        let owner = self.resolve_owner(principal).await?;
        let mut tx = begin_write(&self.pool).await?;
        let found = gate::owned_execution_log(&mut tx, id, &owner).await?;

        if let Err(e) = found
            .parent_status
            .guard(Mutation::UpdateExercises)
            .and_then(|_| update.validate())
        {
            warn!("rejected update of execution log {}: {}", id, e);
            return Err(e);
        }

        let mut log = found.log;
        if let Some(sets) = update.actual_sets {
            log.actual_sets = sets;
        }
        if let Some(reps) = update.actual_reps {
            log.actual_reps = reps;
        }
        if let Some(weight) = update.actual_weight {
            log.actual_weight = weight;
        }
        if let Some(completed) = update.completed {
            log.completed = completed;
        }
        if let Some(notes) = update.notes {
            log.notes = Some(notes);
        }

        logs::update_execution_log(&mut tx, &log).await?;
        tx.commit().await?;
        debug!("execution log {} updated", log.id);
        Ok(log.into())
    }

    /// Removes one execution log; its parent and siblings stay.
    pub async fn delete_execution_log(&self, id: Uuid, principal: &str) -> Result<()> {
        let owner = self.resolve_owner(principal).await?;
        let mut tx = begin_write(&self.pool).await?;
        let found = gate::owned_execution_log(&mut tx, id, &owner).await?;

        if let Err(e) = found.parent_status.guard(Mutation::DeleteExercises) {
            warn!("rejected delete of execution log {}: {}", id, e);
            return Err(e);
        }
        logs::delete_execution_log(&mut tx, id).await?;
        tx.commit().await?;
        debug!("execution log {} deleted", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::LiftlogError;
    use crate::error::ACCESS_DENIED;
    use crate::testing::Fixture;
    use crate::workout::ExecutionLogUpdate;
    use uuid::Uuid;

    #[tokio::test]
    async fn update_changes_only_provided_fields() {
        let f = Fixture::new().await;
        let session = f.two_exercise_session().await;
        let log = f.tracker.start(session.id, "alice").await.unwrap();
        let target = log.execution_logs[0].clone();

        let updated = f
            .tracker
            .update_execution_log(
                target.id,
                "alice",
                ExecutionLogUpdate {
                    actual_reps: Some(8),
                    completed: Some(true),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.actual_sets, target.actual_sets);
        assert_eq!(updated.actual_reps, 8);
        assert_eq!(updated.actual_weight, target.actual_weight);
        assert!(updated.completed);
        assert_eq!(updated.notes, None);
        assert_eq!(updated.planned_reps, target.planned_reps);

        let reread = f.tracker.get_execution_log(target.id, "alice").await.unwrap();
        assert_eq!(reread, updated);
    }

    #[tokio::test]
    async fn negative_actuals_are_rejected_without_changes() {
        let f = Fixture::new().await;
        let session = f.two_exercise_session().await;
        let log = f.tracker.start(session.id, "alice").await.unwrap();
        let target = log.execution_logs[0].clone();

        for update in [
            ExecutionLogUpdate {
                actual_sets: Some(-1),
                ..Default::default()
            },
            ExecutionLogUpdate {
                actual_reps: Some(-3),
                actual_sets: Some(5),
                ..Default::default()
            },
            ExecutionLogUpdate {
                actual_weight: Some(-20),
                notes: Some("oops".into()),
                ..Default::default()
            },
        ] {
            let err = f
                .tracker
                .update_execution_log(target.id, "alice", update)
                .await
                .unwrap_err();
            assert!(matches!(err, LiftlogError::Invalid(_)));
            assert!(err.to_string().contains("cannot be negative"));
        }

        let reread = f.tracker.get_execution_log(target.id, "alice").await.unwrap();
        assert_eq!(reread, target);
    }

    #[tokio::test]
    async fn terminal_parent_freezes_children() {
        let f = Fixture::new().await;
        let session = f.two_exercise_session().await;
        let log = f.tracker.start(session.id, "alice").await.unwrap();
        let target = log.execution_logs[0].clone();
        f.tracker.complete_session_log(log.id, "alice").await.unwrap();

        let err = f
            .tracker
            .update_execution_log(
                target.id,
                "alice",
                ExecutionLogUpdate {
                    completed: Some(true),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(
            err,
            LiftlogError::Invalid("cannot update exercises in a completed training".into())
        );

        let err = f.tracker.delete_execution_log(target.id, "alice").await.unwrap_err();
        assert_eq!(
            err,
            LiftlogError::Invalid("cannot delete exercises from a completed training".into())
        );

        let reread = f.tracker.get_execution_log(target.id, "alice").await.unwrap();
        assert_eq!(reread, target);
    }

    #[tokio::test]
    async fn deleting_a_child_keeps_parent_and_siblings() {
        let f = Fixture::new().await;
        let session = f.two_exercise_session().await;
        let log = f.tracker.start(session.id, "alice").await.unwrap();

        f.tracker
            .delete_execution_log(log.execution_logs[0].id, "alice")
            .await
            .unwrap();

        let parent = f.tracker.get_session_log(log.id, "alice").await.unwrap();
        assert_eq!(parent.execution_log_count, 1);
        assert_eq!(parent.execution_logs[0], log.execution_logs[1]);
    }

    #[tokio::test]
    async fn children_are_gated_through_the_parent() {
        let f = Fixture::new().await;
        let session = f.two_exercise_session().await;
        let log = f.tracker.start(session.id, "alice").await.unwrap();
        let child = log.execution_logs[0].id;
        let denied = LiftlogError::Forbidden(ACCESS_DENIED.into());

        assert_eq!(f.tracker.get_execution_log(child, "bob").await.unwrap_err(), denied);
        assert_eq!(
            f.tracker.get_execution_log(Uuid::new_v4(), "bob").await.unwrap_err(),
            denied
        );
        assert_eq!(
            f.tracker
                .update_execution_log(child, "bob", ExecutionLogUpdate::default())
                .await
                .unwrap_err(),
            denied
        );
        assert_eq!(f.tracker.delete_execution_log(child, "bob").await.unwrap_err(), denied);
        assert_eq!(
            f.tracker.list_execution_logs("bob", Some(log.id)).await.unwrap_err(),
            denied
        );
        assert!(f.tracker.list_execution_logs("bob", None).await.unwrap().is_empty());

        let mine = f.tracker.list_execution_logs("alice", Some(log.id)).await.unwrap();
        assert_eq!(mine, log.execution_logs);
        let all_mine = f.tracker.list_execution_logs("alice", None).await.unwrap();
        assert_eq!(all_mine.len(), 2);
    }
}
