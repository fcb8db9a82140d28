use log::{info, warn};
use uuid::Uuid;

use crate::db::{begin_write, logs};
use crate::db::models::LogStatus;
use crate::workout::status::Mutation;
use crate::workout::{SessionLogUpdate, SessionLogView, Tracker, gate};
use crate::{LiftlogError, Result};

impl Tracker {
    /// The principal's logs, newest first, optionally only those started
    /// from `original_session_id`.
    pub async fn list_session_logs(
        &self,
        principal: &str,
        original_session_id: Option<Uuid>,
    ) -> Result<Vec<SessionLogView>> {
        let owner = self.resolve_owner(principal).await?;
        let mut conn = self.pool.acquire().await?;
        let found = logs::list_session_logs(&mut conn, owner.id, original_session_id).await?;
        Ok(found.into_iter().map(Into::into).collect())
    }

    pub async fn get_session_log(&self, id: Uuid, principal: &str) -> Result<SessionLogView> {
        let owner = self.resolve_owner(principal).await?;
        let mut conn = self.pool.acquire().await?;
        Ok(gate::owned_session_log(&mut conn, id, &owner).await?.into())
    }

    /// Applies the provided fields. Only an in-progress log can be updated;
    /// a terminal `status` stamps `completed_at`.
    pub async fn update_session_log(
        &self,
        id: Uuid,
        principal: &str,
        update: SessionLogUpdate,
    ) -> Result<SessionLogView> {
        let owner = self.resolve_owner(principal).await?;
        let mut tx = begin_write(&self.pool).await?;
        let mut log = gate::owned_session_log(&mut tx, id, &owner).await?;

        if let Err(e) = log.status.guard(Mutation::Update) {
            warn!("rejected update of log {}: {}", log.id, e);
            return Err(e);
        }
        if let Some(notes) = update.notes {
            log.notes = Some(notes);
        }
        if let Some(target) = update.status {
            let transition = log
                .status
                .transition_to(target, log.completed_at, self.clock.now())?;
            if transition.status != log.status {
                info!("log {} moved {} -> {}", log.id, log.status, transition.status);
            }
            log.status = transition.status;
            log.completed_at = transition.completed_at;
        }

        logs::update_session_log(&mut tx, &log).await?;
        tx.commit().await?;
        Ok(log.into())
    }

    pub async fn complete_session_log(&self, id: Uuid, principal: &str) -> Result<SessionLogView> {
        self.update_session_log(
            id,
            principal,
            SessionLogUpdate {
                notes: None,
                status: Some(LogStatus::Completed),
            },
        )
        .await
    }

    pub async fn cancel_session_log(&self, id: Uuid, principal: &str) -> Result<SessionLogView> {
        let owner = self.resolve_owner(principal).await?;
        let mut tx = begin_write(&self.pool).await?;
        let mut log = gate::owned_session_log(&mut tx, id, &owner).await?;

        if log.status != LogStatus::InProgress {
            warn!("rejected cancel of {} log {}", log.status, log.id);
            return Err(LiftlogError::invalid(
                "can only cancel a training that is in progress",
            ));
        }
        let transition = log
            .status
            .transition_to(LogStatus::Cancelled, log.completed_at, self.clock.now())?;
        log.status = transition.status;
        log.completed_at = transition.completed_at;

        logs::update_session_log(&mut tx, &log).await?;
        tx.commit().await?;
        info!("log {} cancelled", log.id);
        Ok(log.into())
    }

    /// Deletes an in-progress log together with its execution logs.
    pub async fn delete_session_log(&self, id: Uuid, principal: &str) -> Result<()> {
        let owner = self.resolve_owner(principal).await?;
        let mut tx = begin_write(&self.pool).await?;
        let log = gate::owned_session_log(&mut tx, id, &owner).await?;

        if let Err(e) = log.status.guard(Mutation::Delete) {
            warn!("rejected delete of log {}: {}", log.id, e);
            return Err(e);
        }
        logs::delete_session_log(&mut tx, log.id, owner.id).await?;
        tx.commit().await?;
        info!("log {} deleted", log.id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::LiftlogError;
    use crate::db::models::LogStatus;
    use crate::error::ACCESS_DENIED;
    use crate::testing::{self, Fixture};
    use crate::workout::SessionLogUpdate;
    use chrono::Duration;
    use tokio::task::JoinSet;
    use uuid::Uuid;

    #[tokio::test]
    async fn complete_stamps_completed_at_with_the_clock() {
        let f = Fixture::new().await;
        let session = f.two_exercise_session().await;
        let log = f.tracker.start(session.id, "alice").await.unwrap();

        f.clock.advance(Duration::minutes(50));
        let done = f.tracker.complete_session_log(log.id, "alice").await.unwrap();
        assert_eq!(done.status, LogStatus::Completed);
        assert_eq!(
            done.completed_at,
            Some(testing::start_instant() + Duration::minutes(50))
        );
        assert_eq!(done.started_at, log.started_at);

        let stored = f.tracker.get_session_log(log.id, "alice").await.unwrap();
        assert_eq!(stored.completed_at, done.completed_at);
    }

    #[tokio::test]
    async fn terminal_log_rejects_update_delete_and_repeat_transitions() {
        let f = Fixture::new().await;
        let session = f.two_exercise_session().await;
        let log = f.tracker.start(session.id, "alice").await.unwrap();
        let done = f.tracker.complete_session_log(log.id, "alice").await.unwrap();

        f.clock.advance(Duration::hours(1));
        let err = f
            .tracker
            .update_session_log(
                log.id,
                "alice",
                SessionLogUpdate {
                    notes: Some("x".into()),
                    status: None,
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err, LiftlogError::Invalid("cannot update a completed training".into()));

        let err = f.tracker.delete_session_log(log.id, "alice").await.unwrap_err();
        assert_eq!(err, LiftlogError::Invalid("cannot delete a completed training".into()));

        assert!(f.tracker.complete_session_log(log.id, "alice").await.is_err());
        let err = f.tracker.cancel_session_log(log.id, "alice").await.unwrap_err();
        assert!(err.to_string().contains("can only cancel"));

        let stored = f.tracker.get_session_log(log.id, "alice").await.unwrap();
        assert_eq!(stored, done);
        assert_eq!(stored.notes, None);
    }

    #[tokio::test]
    async fn cancel_is_terminal_too() {
        let f = Fixture::new().await;
        let session = f.two_exercise_session().await;
        let log = f.tracker.start(session.id, "alice").await.unwrap();

        let cancelled = f.tracker.cancel_session_log(log.id, "alice").await.unwrap();
        assert_eq!(cancelled.status, LogStatus::Cancelled);
        assert_eq!(cancelled.completed_at, Some(testing::start_instant()));

        let err = f.tracker.delete_session_log(log.id, "alice").await.unwrap_err();
        assert_eq!(err, LiftlogError::Invalid("cannot delete a cancelled training".into()));
    }

    #[tokio::test]
    async fn partial_update_keeps_absent_fields() {
        let f = Fixture::new().await;
        let session = f.two_exercise_session().await;
        let log = f.tracker.start(session.id, "alice").await.unwrap();

        let noted = f
            .tracker
            .update_session_log(
                log.id,
                "alice",
                SessionLogUpdate {
                    notes: Some("felt strong".into()),
                    status: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(noted.notes.as_deref(), Some("felt strong"));
        assert_eq!(noted.status, LogStatus::InProgress);

        let unchanged = f
            .tracker
            .update_session_log(log.id, "alice", SessionLogUpdate::default())
            .await
            .unwrap();
        assert_eq!(unchanged, noted);

        let finished = f
            .tracker
            .update_session_log(
                log.id,
                "alice",
                SessionLogUpdate {
                    notes: None,
                    status: Some(LogStatus::Completed),
                },
            )
            .await
            .unwrap();
        assert_eq!(finished.notes.as_deref(), Some("felt strong"));
        assert_eq!(finished.status, LogStatus::Completed);
        assert!(finished.completed_at.is_some());
    }

    #[tokio::test]
    async fn delete_in_progress_removes_children() {
        let f = Fixture::new().await;
        let session = f.two_exercise_session().await;
        let log = f.tracker.start(session.id, "alice").await.unwrap();
        let child = log.execution_logs[0].id;

        f.tracker.delete_session_log(log.id, "alice").await.unwrap();
        assert!(matches!(
            f.tracker.get_session_log(log.id, "alice").await,
            Err(LiftlogError::Forbidden(_))
        ));
        assert!(matches!(
            f.tracker.get_execution_log(child, "alice").await,
            Err(LiftlogError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn foreign_and_missing_logs_look_the_same() {
        let f = Fixture::new().await;
        let session = f.two_exercise_session().await;
        let log = f.tracker.start(session.id, "alice").await.unwrap();

        let foreign = f.tracker.get_session_log(log.id, "bob").await.unwrap_err();
        let missing = f.tracker.get_session_log(Uuid::new_v4(), "bob").await.unwrap_err();
        assert_eq!(foreign, missing);
        assert_eq!(foreign, LiftlogError::Forbidden(ACCESS_DENIED.into()));

        assert_eq!(f.tracker.complete_session_log(log.id, "bob").await.unwrap_err(), foreign);
        assert_eq!(f.tracker.cancel_session_log(log.id, "bob").await.unwrap_err(), foreign);
        assert_eq!(f.tracker.delete_session_log(log.id, "bob").await.unwrap_err(), foreign);

        assert!(f.tracker.list_session_logs("bob", None).await.unwrap().is_empty());
        let still = f.tracker.get_session_log(log.id, "alice").await.unwrap();
        assert_eq!(still, log);
    }

    #[tokio::test]
    async fn listing_is_owner_scoped_newest_first_and_filterable() {
        let f = Fixture::new().await;
        let session = f.two_exercise_session().await;
        let other = testing::session(&f.pool, None, "Loose", 1).await;
        let bench = testing::exercise(&f.pool, "Plank", &["Core"]).await;
        testing::execution(&f.pool, &other, &bench, (3, 60, 0), 1).await;

        let first = f.tracker.start(session.id, "alice").await.unwrap();
        f.clock.advance(Duration::minutes(1));
        let second = f.tracker.start(other.id, "alice").await.unwrap();
        f.clock.advance(Duration::minutes(1));
        f.tracker.start(session.id, "bob").await.unwrap();

        let all = f.tracker.list_session_logs("alice", None).await.unwrap();
        let ids: Vec<_> = all.iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);

        let filtered = f.tracker.list_session_logs("alice", Some(session.id)).await.unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, first.id);
        assert_eq!(second.plan_name, "No Plan");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_note_updates_all_apply() {
        let f = Fixture::on_disk().await;
        let session = f.two_exercise_session().await;
        let id = f.tracker.start(session.id, "alice").await.unwrap().id;

        let mut updates = JoinSet::new();
        for i in 0..16 {
            let tracker = f.tracker.clone();
            updates.spawn(async move {
                let update = SessionLogUpdate {
                    notes: Some(format!("set {i}")),
                    status: None,
                };
                tracker.update_session_log(id, "alice", update).await
            });
        }
        while let Some(joined) = updates.join_next().await {
            let view = joined.unwrap().unwrap();
            assert_eq!(view.status, LogStatus::InProgress);
        }

        let stored = f.tracker.get_session_log(id, "alice").await.unwrap();
        let notes = stored.notes.unwrap();
        assert!((0..16).any(|i| notes == format!("set {i}")));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_completes_succeed_exactly_once() {
        let f = Fixture::on_disk().await;
        let session = f.two_exercise_session().await;
        let id = f.tracker.start(session.id, "alice").await.unwrap().id;

        let mut completes = JoinSet::new();
        for _ in 0..8 {
            let tracker = f.tracker.clone();
            completes.spawn(async move { tracker.complete_session_log(id, "alice").await });
        }

        let mut completed = 0;
        while let Some(joined) = completes.join_next().await {
            match joined.unwrap() {
                Ok(view) => {
                    assert_eq!(view.status, LogStatus::Completed);
                    completed += 1;
                }
                Err(e) => assert_eq!(
                    e,
                    LiftlogError::Invalid("cannot update a completed training".into())
                ),
            }
        }
        assert_eq!(completed, 1);
    }
}
