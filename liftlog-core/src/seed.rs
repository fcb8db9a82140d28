//! Demo catalog: a handful of common exercises, three plans and six
//! sessions with planned executions.

use log::info;
use sqlx::SqlitePool;
use std::collections::HashMap;
use uuid::Uuid;

use crate::db::{begin_write, catalog};
use crate::db::models::{Exercise, ExerciseCategory, ExerciseExecution, Plan, Session};
use crate::{LiftlogError, Result};

use ExerciseCategory::{BodyWeight, Equipment, FreeWeight};

const EXERCISES: &[(&str, ExerciseCategory, &[&str], &str)] = &[
    ("Bench Press", FreeWeight, &["Chest", "Triceps", "Shoulders"], "Barbell bench press for chest development"),
    ("Incline Dumbbell Press", FreeWeight, &["Chest", "Shoulders", "Triceps"], "Incline dumbbell press targeting upper chest"),
    ("Push-ups", BodyWeight, &["Chest", "Triceps", "Core"], "Classic bodyweight push-ups"),
    ("Deadlift", FreeWeight, &["Back", "Hamstrings", "Glutes", "Core"], "Conventional barbell deadlift"),
    ("Pull-ups", BodyWeight, &["Back", "Biceps", "Shoulders"], "Bodyweight pull-ups for back development"),
    ("Bent Over Row", FreeWeight, &["Back", "Biceps", "Core"], "Barbell bent over row"),
    ("Barbell Squats", FreeWeight, &["Quadriceps", "Glutes", "Hamstrings", "Core"], "Back squats with barbell"),
    ("Leg Press", Equipment, &["Quadriceps", "Glutes", "Hamstrings"], "Machine leg press"),
    ("Walking Lunges", BodyWeight, &["Quadriceps", "Glutes", "Hamstrings"], "Bodyweight walking lunges"),
    ("Overhead Press", FreeWeight, &["Shoulders", "Triceps", "Core"], "Standing barbell overhead press"),
    ("Lateral Raises", FreeWeight, &["Shoulders"], "Dumbbell lateral raises"),
    ("Bicep Curls", FreeWeight, &["Biceps"], "Dumbbell bicep curls"),
    ("Tricep Dips", BodyWeight, &["Triceps", "Chest", "Shoulders"], "Bodyweight tricep dips"),
    ("Plank", BodyWeight, &["Core", "Shoulders"], "Isometric plank hold"),
];

const PLANS: &[(&str, &str)] = &[
    ("Push Pull Legs", "Classic 6-day split focusing on push, pull, and leg movements"),
    ("Full Body Strength", "3-day full body workout for overall strength development"),
    ("Upper Lower Split", "4-day split alternating between upper and lower body"),
];

type Prescription = (&'static str, i32, i32, i32);

const SESSIONS: &[(&str, &str, i32, &[Prescription])] = &[
    ("Push Day - Chest & Shoulders", "Push Pull Legs", 1, &[
        ("Bench Press", 4, 8, 80),
        ("Incline Dumbbell Press", 3, 10, 30),
        ("Overhead Press", 3, 10, 50),
        ("Lateral Raises", 3, 12, 12),
    ]),
    ("Pull Day - Back & Biceps", "Push Pull Legs", 2, &[
        ("Deadlift", 4, 6, 120),
        ("Pull-ups", 4, 10, 0),
        ("Bent Over Row", 3, 10, 60),
        ("Bicep Curls", 3, 12, 15),
    ]),
    ("Leg Day - Quads & Glutes", "Push Pull Legs", 3, &[
        ("Barbell Squats", 4, 8, 100),
        ("Leg Press", 3, 12, 150),
        ("Walking Lunges", 3, 15, 0),
    ]),
    ("Full Body - Day 1", "Full Body Strength", 1, &[
        ("Barbell Squats", 3, 10, 90),
        ("Bench Press", 3, 10, 70),
        ("Bent Over Row", 3, 10, 55),
        ("Overhead Press", 3, 10, 45),
        ("Plank", 3, 60, 0),
    ]),
    ("Upper Body Strength", "Upper Lower Split", 1, &[
        ("Bench Press", 4, 6, 85),
        ("Pull-ups", 4, 8, 0),
        ("Overhead Press", 3, 8, 55),
        ("Tricep Dips", 3, 12, 0),
    ]),
    ("Bodyweight Circuit", "Full Body Strength", 2, &[
        ("Push-ups", 4, 15, 0),
        ("Pull-ups", 4, 10, 0),
        ("Walking Lunges", 3, 20, 0),
        ("Tricep Dips", 3, 15, 0),
        ("Plank", 3, 90, 0),
    ]),
];

fn lookup(ids: &HashMap<&'static str, Uuid>, name: &str) -> Result<Uuid> {
    ids.get(name)
        .copied()
        .ok_or_else(|| LiftlogError::Internal(format!("seed data references unknown {name}")))
}

/// Fills an empty catalog with the demo data. Returns `false` without
/// touching anything when exercises already exist.
pub async fn seed_catalog(pool: &SqlitePool) -> Result<bool> {
    let mut tx = begin_write(pool).await?;
    if catalog::count_exercises(&mut tx).await? > 0 {
        info!("catalog already populated, skipping seed");
        return Ok(false);
    }

    let mut exercises = HashMap::new();
    for (name, category, groups, description) in EXERCISES {
        let exercise = Exercise {
            id: Uuid::new_v4(),
            name: name.to_string(),
            category: *category,
            description: Some(description.to_string()),
            muscle_groups: groups.iter().map(|g| g.to_string()).collect(),
        };
        catalog::save_exercise(&mut tx, &exercise).await?;
        exercises.insert(*name, exercise.id);
    }

    let mut plans = HashMap::new();
    for (name, description) in PLANS {
        let plan = Plan {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: Some(description.to_string()),
        };
        catalog::save_plan(&mut tx, &plan).await?;
        plans.insert(*name, plan.id);
    }

    for (name, plan, order_id, prescriptions) in SESSIONS {
        let session = Session {
            id: Uuid::new_v4(),
            name: name.to_string(),
            plan_id: Some(lookup(&plans, plan)?),
            order_id: *order_id,
        };
        catalog::save_session(&mut tx, &session).await?;

        for (position, (exercise, sets, reps, weight)) in prescriptions.iter().enumerate() {
            let execution = ExerciseExecution {
                id: Uuid::new_v4(),
                session_id: session.id,
                exercise_id: lookup(&exercises, exercise)?,
                planned_sets: *sets,
                planned_reps: *reps,
                planned_weight: *weight,
                order_id: position as i32 + 1,
            };
            catalog::save_execution(&mut tx, &execution).await?;
        }
    }

    tx.commit().await?;
    info!(
        "seeded {} exercises, {} plans and {} sessions",
        EXERCISES.len(),
        PLANS.len(),
        SESSIONS.len()
    );
    Ok(true)
}
