use log::{debug, info};
use uuid::Uuid;

use crate::catalog::{Catalog, ExerciseExecutionInput, ExerciseExecutionUpdate, ExerciseExecutionView};
use crate::db::{begin_write, catalog};
use crate::db::models::ExerciseExecution;
use crate::{LiftlogError, Result};

fn validate_planned(sets: i32, reps: i32, weight: i32) -> Result<()> {
    if sets < 1 {
        return Err(LiftlogError::invalid("planned sets must be at least 1"));
    }
    if reps < 1 {
        return Err(LiftlogError::invalid("planned reps must be at least 1"));
    }
    if weight < 0 {
        return Err(LiftlogError::invalid("planned weight must not be negative"));
    }
    Ok(())
}

fn validate_order(order_id: i32) -> Result<()> {
    if order_id < 1 {
        return Err(LiftlogError::invalid("order must be at least 1"));
    }
    Ok(())
}

impl Catalog {
    pub async fn list_executions(&self, session_id: Option<Uuid>) -> Result<Vec<ExerciseExecutionView>> {
        let mut conn = self.pool.acquire().await?;
        let executions = catalog::list_executions(&mut conn, session_id).await?;
        Ok(executions.into_iter().map(Into::into).collect())
    }

    pub async fn get_execution(&self, id: Uuid) -> Result<ExerciseExecutionView> {
        let mut conn = self.pool.acquire().await?;
        catalog::find_execution_detail(&mut conn, id)
            .await?
            .map(Into::into)
            .ok_or_else(|| LiftlogError::not_found("exercise execution not found"))
    }

    /// Adds a prescription to a session. Without an explicit order it goes
    /// after the current last one.
    pub async fn create_execution(&self, input: ExerciseExecutionInput) -> Result<ExerciseExecutionView> {
        validate_planned(input.planned_sets, input.planned_reps, input.planned_weight)?;
        if let Some(order_id) = input.order_id {
            validate_order(order_id)?;
        }

        let mut tx = begin_write(&self.pool).await?;
        if catalog::find_session(&mut tx, input.session_id).await?.is_none() {
            return Err(LiftlogError::not_found("session not found"));
        }
        if catalog::find_exercise(&mut tx, input.exercise_id).await?.is_none() {
            return Err(LiftlogError::not_found("exercise not found"));
        }
        if catalog::exercise_in_session(&mut tx, input.session_id, input.exercise_id, None).await? {
            return Err(LiftlogError::conflict(
                "exercise is already part of this session",
            ));
        }
        let order_id = match input.order_id {
            Some(order_id) => {
                if catalog::execution_at_order(&mut tx, input.session_id, order_id, None)
                    .await?
                    .is_some()
                {
                    return Err(LiftlogError::conflict(format!(
                        "order {order_id} is already used in this session"
                    )));
                }
                order_id
            }
            None => catalog::next_execution_order(&mut tx, input.session_id).await?,
        };

        let execution = ExerciseExecution {
            id: Uuid::new_v4(),
            session_id: input.session_id,
            exercise_id: input.exercise_id,
            planned_sets: input.planned_sets,
            planned_reps: input.planned_reps,
            planned_weight: input.planned_weight,
            order_id,
        };
        catalog::save_execution(&mut tx, &execution).await?;
        let view = catalog::find_execution_detail(&mut tx, execution.id)
            .await?
            .ok_or_else(|| LiftlogError::Internal("execution vanished after insert".into()))?;
        tx.commit().await?;

        info!(
            "added exercise {} to session {} at order {}",
            execution.exercise_id, execution.session_id, execution.order_id
        );
        Ok(view.into())
    }

    /// Merges the provided fields into the execution. Moving to an order
    /// held by a sibling swaps the two.
    pub async fn update_execution(
        &self,
        id: Uuid,
        update: ExerciseExecutionUpdate,
    ) -> Result<ExerciseExecutionView> {
        let mut tx = begin_write(&self.pool).await?;
        let mut execution = catalog::find_execution(&mut tx, id)
            .await?
            .ok_or_else(|| LiftlogError::not_found("exercise execution not found"))?;

        execution.planned_sets = update.planned_sets.unwrap_or(execution.planned_sets);
        execution.planned_reps = update.planned_reps.unwrap_or(execution.planned_reps);
        execution.planned_weight = update.planned_weight.unwrap_or(execution.planned_weight);
        validate_planned(
            execution.planned_sets,
            execution.planned_reps,
            execution.planned_weight,
        )?;

        if let Some(exercise_id) = update.exercise_id {
            if catalog::find_exercise(&mut tx, exercise_id).await?.is_none() {
                return Err(LiftlogError::not_found("exercise not found"));
            }
            if catalog::exercise_in_session(&mut tx, execution.session_id, exercise_id, Some(id))
                .await?
            {
                return Err(LiftlogError::conflict(
                    "exercise is already part of this session",
                ));
            }
            execution.exercise_id = exercise_id;
        }

        if let Some(order_id) = update.order_id {
            validate_order(order_id)?;
            if order_id != execution.order_id {
                if let Some(other) =
                    catalog::execution_at_order(&mut tx, execution.session_id, order_id, Some(id))
                        .await?
                {
                    debug!(
                        "swapping order {} <-> {} in session {}",
                        execution.order_id, order_id, execution.session_id
                    );
                    catalog::set_execution_order(&mut tx, other.id, execution.order_id).await?;
                }
                execution.order_id = order_id;
            }
        }

        catalog::save_execution(&mut tx, &execution).await?;
        let view = catalog::find_execution_detail(&mut tx, id)
            .await?
            .ok_or_else(|| LiftlogError::not_found("exercise execution not found"))?;
        tx.commit().await?;
        Ok(view.into())
    }

    pub async fn delete_execution(&self, id: Uuid) -> Result<()> {
        let mut conn = self.pool.acquire().await?;
        if catalog::delete_execution(&mut conn, id).await? == 0 {
            return Err(LiftlogError::not_found("exercise execution not found"));
        }
        Ok(())
    }
}
