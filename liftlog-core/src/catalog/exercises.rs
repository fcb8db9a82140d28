use log::info;
use uuid::Uuid;

use crate::catalog::{Catalog, ExerciseInput, ExerciseView, require_name};
use crate::db::{begin_write, catalog};
use crate::db::models::{Exercise, ExerciseCategory};
use crate::{LiftlogError, Result};

impl ExerciseInput {
    fn into_exercise(self, id: Uuid) -> Result<Exercise> {
        Ok(Exercise {
            id,
            name: require_name(&self.name, "exercise")?,
            category: self.category.parse()?,
            description: self.description,
            muscle_groups: self
                .muscle_groups
                .into_iter()
                .map(|g| g.trim().to_string())
                .filter(|g| !g.is_empty())
                .collect(),
        })
    }
}

impl Catalog {
    pub async fn list_exercises(&self) -> Result<Vec<ExerciseView>> {
        let mut conn = self.pool.acquire().await?;
        let exercises = catalog::list_exercises(&mut conn).await?;
        Ok(exercises.into_iter().map(Into::into).collect())
    }

    pub async fn get_exercise(&self, id: Uuid) -> Result<ExerciseView> {
        let mut conn = self.pool.acquire().await?;
        catalog::find_exercise(&mut conn, id)
            .await?
            .map(Into::into)
            .ok_or_else(|| LiftlogError::not_found("exercise not found"))
    }

    /// Every category a client may choose.
    pub fn exercise_categories(&self) -> Vec<ExerciseCategory> {
        ExerciseCategory::ALL
            .into_iter()
            .filter(|c| *c != ExerciseCategory::Unspecified)
            .collect()
    }

    pub async fn create_exercise(&self, input: ExerciseInput) -> Result<ExerciseView> {
        let exercise = input.into_exercise(Uuid::new_v4())?;

        let mut tx = begin_write(&self.pool).await?;
        if catalog::exercise_name_taken(&mut tx, &exercise.name, None).await? {
            return Err(LiftlogError::conflict("exercise with this name already exists"));
        }
        catalog::save_exercise(&mut tx, &exercise).await?;
        tx.commit().await?;

        info!("created exercise {} ({})", exercise.name, exercise.id);
        Ok(exercise.into())
    }

    pub async fn update_exercise(&self, id: Uuid, input: ExerciseInput) -> Result<ExerciseView> {
        let exercise = input.into_exercise(id)?;

        let mut tx = begin_write(&self.pool).await?;
        if catalog::find_exercise(&mut tx, id).await?.is_none() {
            return Err(LiftlogError::not_found("exercise not found"));
        }
        if catalog::exercise_name_taken(&mut tx, &exercise.name, Some(id)).await? {
            return Err(LiftlogError::conflict("exercise with this name already exists"));
        }
        catalog::save_exercise(&mut tx, &exercise).await?;
        tx.commit().await?;
        Ok(exercise.into())
    }

    /// Deletes the exercise and every planned execution of it.
    pub async fn delete_exercise(&self, id: Uuid) -> Result<()> {
        let mut conn = self.pool.acquire().await?;
        if catalog::delete_exercise(&mut conn, id).await? == 0 {
            return Err(LiftlogError::not_found("exercise not found"));
        }
        info!("deleted exercise {}", id);
        Ok(())
    }
}
