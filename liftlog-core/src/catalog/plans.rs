use log::info;
use std::collections::HashSet;
use sqlx::SqliteConnection;
use uuid::Uuid;

use crate::catalog::sessions::{check_fits_plan, session_view};
use crate::catalog::{Catalog, PlanInput, PlanUpdate, PlanView, require_name};
use crate::db::{begin_write, catalog};
use crate::db::models::{Plan, User};
use crate::{LiftlogError, Result};

async fn plan_view(
    conn: &mut SqliteConnection,
    plan: Plan,
    viewer: Option<&User>,
) -> Result<PlanView> {
    let sessions = catalog::list_sessions(&mut *conn, Some(plan.id)).await?;
    let mut views = Vec::with_capacity(sessions.len());
    for session in sessions {
        views.push(session_view(&mut *conn, session, viewer).await?);
    }
    Ok(PlanView::new(plan, views))
}

impl Catalog {
    pub async fn list_plans(&self, principal: Option<&str>) -> Result<Vec<PlanView>> {
        let viewer = self.viewer(principal).await?;
        let mut conn = self.pool.acquire().await?;
        let plans = catalog::list_plans(&mut conn).await?;
        let mut views = Vec::with_capacity(plans.len());
        for plan in plans {
            views.push(plan_view(&mut conn, plan, viewer.as_ref()).await?);
        }
        Ok(views)
    }

    pub async fn get_plan(&self, id: Uuid, principal: Option<&str>) -> Result<PlanView> {
        let viewer = self.viewer(principal).await?;
        let mut conn = self.pool.acquire().await?;
        let plan = catalog::find_plan(&mut conn, id)
            .await?
            .ok_or_else(|| LiftlogError::not_found("plan not found"))?;
        plan_view(&mut conn, plan, viewer.as_ref()).await
    }

    pub async fn create_plan(&self, input: PlanInput) -> Result<PlanView> {
        let plan = Plan {
            id: Uuid::new_v4(),
            name: require_name(&input.name, "plan")?,
            description: input.description,
        };

        let mut tx = begin_write(&self.pool).await?;
        if catalog::plan_name_taken(&mut tx, &plan.name, None).await? {
            return Err(LiftlogError::conflict("plan with this name already exists"));
        }
        catalog::save_plan(&mut tx, &plan).await?;
        tx.commit().await?;

        info!("created plan {} ({})", plan.name, plan.id);
        Ok(PlanView::new(plan, Vec::new()))
    }

    /// Renames the plan. When `sessions` is given it becomes the plan's
    /// exact membership: listed sessions are attached, the rest detached.
    /// The returned sessions carry `principal`'s log counts.
    pub async fn update_plan(
        &self,
        id: Uuid,
        update: PlanUpdate,
        principal: Option<&str>,
    ) -> Result<PlanView> {
        let name = require_name(&update.name, "plan")?;
        let viewer = self.viewer(principal).await?;

        let mut tx = begin_write(&self.pool).await?;
        let mut plan = catalog::find_plan(&mut tx, id)
            .await?
            .ok_or_else(|| LiftlogError::not_found("plan not found"))?;
        if catalog::plan_name_taken(&mut tx, &name, Some(id)).await? {
            return Err(LiftlogError::conflict("plan with this name already exists"));
        }
        plan.name = name;
        plan.description = update.description;
        catalog::save_plan(&mut tx, &plan).await?;

        if let Some(mut members) = update.sessions {
            let mut seen = HashSet::new();
            members.retain(|id| seen.insert(*id));
            let mut sessions = Vec::with_capacity(members.len());
            for session_id in &members {
                let session = catalog::find_session(&mut tx, *session_id)
                    .await?
                    .ok_or_else(|| LiftlogError::not_found("session not found"))?;
                sessions.push(session);
            }

            catalog::detach_sessions_except(&mut tx, id, &members).await?;
            for mut session in sessions {
                if session.plan_id == Some(id) {
                    continue;
                }
                session.plan_id = Some(id);
                check_fits_plan(&mut tx, id, &session, true).await?;
                catalog::save_session(&mut tx, &session).await?;
            }
        }

        let view = plan_view(&mut tx, plan, viewer.as_ref()).await?;
        tx.commit().await?;
        Ok(view)
    }

    /// Deletes the plan. Its sessions are kept without a plan.
    pub async fn delete_plan(&self, id: Uuid) -> Result<()> {
        let mut conn = self.pool.acquire().await?;
        if catalog::delete_plan(&mut conn, id).await? == 0 {
            return Err(LiftlogError::not_found("plan not found"));
        }
        info!("deleted plan {}", id);
        Ok(())
    }
}
