use log::info;
use sqlx::SqliteConnection;
use uuid::Uuid;

use crate::catalog::{
    Catalog, MAX_SESSION_ORDER, MAX_SESSIONS_PER_PLAN, MIN_SESSION_ORDER, SessionInput,
    SessionUpdate, SessionView, require_name,
};
use crate::db::{begin_write, catalog};
use crate::db::models::{Session, User};
use crate::workout::gate;
use crate::{LiftlogError, Result};

pub(super) async fn session_view(
    conn: &mut SqliteConnection,
    session: Session,
    viewer: Option<&User>,
) -> Result<SessionView> {
    let executions = catalog::list_executions(&mut *conn, Some(session.id)).await?;
    let count = gate::session_log_count(conn, viewer, session.id).await?;
    Ok(SessionView::new(
        session,
        executions.into_iter().map(Into::into).collect(),
        count,
    ))
}

fn check_order_range(order_id: i32) -> Result<()> {
    if !(MIN_SESSION_ORDER..=MAX_SESSION_ORDER).contains(&order_id) {
        return Err(LiftlogError::invalid(format!(
            "order must be between {MIN_SESSION_ORDER} and {MAX_SESSION_ORDER}"
        )));
    }
    Ok(())
}

/// Checks that `session` may live in `plan_id` under its current name and
/// order. `moving` is set when the session is not yet part of the plan.
pub(super) async fn check_fits_plan(
    conn: &mut SqliteConnection,
    plan_id: Uuid,
    session: &Session,
    moving: bool,
) -> Result<()> {
    if moving
        && catalog::count_sessions_in_plan(&mut *conn, plan_id, Some(session.id)).await?
            >= MAX_SESSIONS_PER_PLAN
    {
        return Err(LiftlogError::invalid(format!(
            "maximum of {MAX_SESSIONS_PER_PLAN} sessions per plan reached"
        )));
    }
    if catalog::session_name_taken(&mut *conn, plan_id, &session.name, Some(session.id)).await? {
        return Err(LiftlogError::conflict(
            "session with this name already exists in this plan",
        ));
    }
    check_order_range(session.order_id)?;
    if catalog::session_order_taken(&mut *conn, plan_id, session.order_id, Some(session.id)).await?
    {
        return Err(LiftlogError::conflict(format!(
            "order {} is already used in this plan",
            session.order_id
        )));
    }
    Ok(())
}

impl Catalog {
    pub async fn list_sessions(
        &self,
        plan_id: Option<Uuid>,
        principal: Option<&str>,
    ) -> Result<Vec<SessionView>> {
        let viewer = self.viewer(principal).await?;
        let mut conn = self.pool.acquire().await?;
        let sessions = catalog::list_sessions(&mut conn, plan_id).await?;
        let mut views = Vec::with_capacity(sessions.len());
        for session in sessions {
            views.push(session_view(&mut conn, session, viewer.as_ref()).await?);
        }
        Ok(views)
    }

    /// A session with its planned executions. The log count is the
    /// principal's own; anonymous callers see zero.
    pub async fn get_session(&self, id: Uuid, principal: Option<&str>) -> Result<SessionView> {
        let viewer = self.viewer(principal).await?;
        let mut conn = self.pool.acquire().await?;
        let session = catalog::find_session(&mut conn, id)
            .await?
            .ok_or_else(|| LiftlogError::not_found("session not found"))?;
        session_view(&mut conn, session, viewer.as_ref()).await
    }

    pub async fn create_session(&self, input: SessionInput) -> Result<SessionView> {
        let session = Session {
            id: Uuid::new_v4(),
            name: require_name(&input.name, "session")?,
            plan_id: Some(input.plan_id),
            order_id: input.order_id,
        };

        let mut tx = begin_write(&self.pool).await?;
        if catalog::find_plan(&mut tx, input.plan_id).await?.is_none() {
            return Err(LiftlogError::not_found("plan not found"));
        }
        check_fits_plan(&mut tx, input.plan_id, &session, true).await?;
        catalog::save_session(&mut tx, &session).await?;
        let view = session_view(&mut tx, session, None).await?;
        tx.commit().await?;

        info!("created session {} ({})", view.name, view.id);
        Ok(view)
    }

    /// Renames the session and optionally moves it to another plan or order
    /// slot. Without a `plan_id` the session keeps its current plan.
    pub async fn update_session(
        &self,
        id: Uuid,
        update: SessionUpdate,
        principal: Option<&str>,
    ) -> Result<SessionView> {
        let name = require_name(&update.name, "session")?;
        let viewer = self.viewer(principal).await?;

        let mut tx = begin_write(&self.pool).await?;
        let mut session = catalog::find_session(&mut tx, id)
            .await?
            .ok_or_else(|| LiftlogError::not_found("session not found"))?;
        if let Some(plan_id) = update.plan_id {
            if catalog::find_plan(&mut tx, plan_id).await?.is_none() {
                return Err(LiftlogError::not_found("plan not found"));
            }
        }

        let moving = update.plan_id.is_some() && update.plan_id != session.plan_id;
        session.name = name;
        session.plan_id = update.plan_id.or(session.plan_id);
        if let Some(order_id) = update.order_id {
            check_order_range(order_id)?;
            session.order_id = order_id;
        }
        if let Some(plan_id) = session.plan_id {
            check_fits_plan(&mut tx, plan_id, &session, moving).await?;
        }

        catalog::save_session(&mut tx, &session).await?;
        let view = session_view(&mut tx, session, viewer.as_ref()).await?;
        tx.commit().await?;
        Ok(view)
    }

    /// Deletes the session and its executions. Logs started from it remain.
    pub async fn delete_session(&self, id: Uuid) -> Result<()> {
        let mut conn = self.pool.acquire().await?;
        if catalog::delete_session(&mut conn, id).await? == 0 {
            return Err(LiftlogError::not_found("session not found"));
        }
        info!("deleted session {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{self, Fixture};

    fn input(plan_id: Uuid, name: &str, order_id: i32) -> SessionInput {
        SessionInput {
            name: name.to_string(),
            plan_id,
            order_id,
        }
    }

    #[tokio::test]
    async fn create_enforces_plan_name_and_order_rules() {
        let f = Fixture::new().await;
        let plan = testing::plan(&f.pool, "Full Body").await;

        let day1 = f.catalog.create_session(input(plan.id, "Day 1", 1)).await.unwrap();
        assert_eq!(day1.plan_id, Some(plan.id));
        assert_eq!(day1.exercise_executions_count, 0);

        assert_eq!(
            f.catalog.create_session(input(plan.id, "Day 1", 2)).await.unwrap_err(),
            LiftlogError::Conflict("session with this name already exists in this plan".into())
        );
        assert_eq!(
            f.catalog.create_session(input(plan.id, "Day 2", 1)).await.unwrap_err(),
            LiftlogError::Conflict("order 1 is already used in this plan".into())
        );
        assert_eq!(
            f.catalog.create_session(input(plan.id, "Day 2", 31)).await.unwrap_err(),
            LiftlogError::Invalid("order must be between 1 and 30".into())
        );
        assert!(matches!(
            f.catalog.create_session(input(plan.id, "Day 2", 0)).await,
            Err(LiftlogError::Invalid(_))
        ));
        assert_eq!(
            f.catalog.create_session(input(Uuid::new_v4(), "Day 2", 2)).await.unwrap_err(),
            LiftlogError::NotFound("plan not found".into())
        );
    }

    #[tokio::test]
    async fn a_plan_holds_at_most_thirty_sessions() {
        let f = Fixture::new().await;
        let plan = testing::plan(&f.pool, "Everything").await;
        for order in 1..=30 {
            testing::session(&f.pool, Some(plan.id), &format!("S{order}"), order).await;
        }

        let err = f.catalog.create_session(input(plan.id, "S31", 5)).await.unwrap_err();
        assert_eq!(
            err,
            LiftlogError::Invalid("maximum of 30 sessions per plan reached".into())
        );
    }

    #[tokio::test]
    async fn update_moves_between_plans_and_rechecks_slots() {
        let f = Fixture::new().await;
        let a = testing::plan(&f.pool, "A").await;
        let b = testing::plan(&f.pool, "B").await;
        let s1 = testing::session(&f.pool, Some(a.id), "Legs", 1).await;
        testing::session(&f.pool, Some(b.id), "Arms", 1).await;

        let err = f
            .catalog
            .update_session(
                s1.id,
                SessionUpdate {
                    name: "Legs".into(),
                    plan_id: Some(b.id),
                    order_id: None,
                },
                None,
            )
            .await
            .unwrap_err();
        assert_eq!(err, LiftlogError::Conflict("order 1 is already used in this plan".into()));

        let moved = f
            .catalog
            .update_session(
                s1.id,
                SessionUpdate {
                    name: "Legs II".into(),
                    plan_id: Some(b.id),
                    order_id: Some(2),
                },
                None,
            )
            .await
            .unwrap();
        assert_eq!(moved.plan_id, Some(b.id));
        assert_eq!(moved.order_id, 2);
        assert_eq!(moved.name, "Legs II");

        let renamed = f
            .catalog
            .update_session(
                s1.id,
                SessionUpdate {
                    name: "Legs III".into(),
                    plan_id: None,
                    order_id: None,
                },
                None,
            )
            .await
            .unwrap();
        assert_eq!(renamed.plan_id, Some(b.id));
        assert_eq!(renamed.order_id, 2);
    }

    #[tokio::test]
    async fn session_log_count_is_per_principal() {
        let f = Fixture::new().await;
        let session = f.two_exercise_session().await;
        f.tracker.start(session.id, "alice").await.unwrap();
        f.tracker.start(session.id, "alice").await.unwrap();
        f.tracker.start(session.id, "bob").await.unwrap();

        let id = session.id;
        let count = |p: Option<&'static str>| {
            let catalog = f.catalog.clone();
            async move { catalog.get_session(id, p).await.unwrap().session_log_count }
        };
        assert_eq!(count(Some("alice")).await, 2);
        assert_eq!(count(Some("bob")).await, 1);
        assert_eq!(count(None).await, 0);
        assert_eq!(count(Some("stranger")).await, 0);

        let renamed = f
            .catalog
            .update_session(
                id,
                SessionUpdate {
                    name: "Push Day II".into(),
                    plan_id: None,
                    order_id: None,
                },
                Some("alice"),
            )
            .await
            .unwrap();
        assert_eq!(renamed.session_log_count, 2);
    }

    #[tokio::test]
    async fn deleting_a_session_keeps_its_logs() {
        let f = Fixture::new().await;
        let session = f.two_exercise_session().await;
        let log = f.tracker.start(session.id, "alice").await.unwrap();

        f.catalog.delete_session(session.id).await.unwrap();
        assert!(matches!(
            f.catalog.get_session(session.id, None).await,
            Err(LiftlogError::NotFound(_))
        ));
        assert!(matches!(
            f.catalog.delete_session(session.id).await,
            Err(LiftlogError::NotFound(_))
        ));

        let kept = f.tracker.get_session_log(log.id, "alice").await.unwrap();
        assert_eq!(kept.original_session_id, session.id);
        assert_eq!(kept.execution_log_count, 2);
    }
}
