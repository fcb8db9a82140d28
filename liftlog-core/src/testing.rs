//! Shared fixtures for the crate's unit tests.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use sqlx::SqlitePool;
use tempfile::TempDir;
use uuid::Uuid;

use crate::catalog::Catalog;
use crate::clock::FixedClock;
use crate::db::models::{Exercise, ExerciseCategory, ExerciseExecution, Plan, Session};
use crate::db::{self, catalog, users};
use crate::identity::SqliteIdentity;
use crate::workout::Tracker;

pub fn start_instant() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 4, 13, 17, 30, 0).unwrap()
}

pub struct Fixture {
    pub pool: SqlitePool,
    pub clock: Arc<FixedClock>,
    pub tracker: Tracker,
    pub catalog: Catalog,
    _dir: Option<TempDir>,
}

impl Fixture {
    /// Fresh in-memory database with users `alice` and `bob`.
    pub async fn new() -> Self {
        let pool = db::connect_in_memory().await.unwrap();
        Self::with_pool(pool, None).await
    }

    /// A WAL database file in a temporary directory, opened through
    /// [`db::connect`] with a pool of several connections.
    pub async fn on_disk() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("liftlog.db").display());
        let pool = db::connect(&url).await.unwrap();
        Self::with_pool(pool, Some(dir)).await
    }

    async fn with_pool(pool: SqlitePool, dir: Option<TempDir>) -> Self {
        let mut conn = pool.acquire().await.unwrap();
        for name in ["alice", "bob"] {
            users::insert_user(&mut conn, name, "unused", start_instant())
                .await
                .unwrap();
        }
        drop(conn);

        let clock = Arc::new(FixedClock::new(start_instant()));
        let identity = Arc::new(SqliteIdentity::new(pool.clone()));
        let tracker = Tracker::new(pool.clone(), clock.clone(), identity.clone());
        let catalog = Catalog::new(pool.clone(), identity);

        Self {
            pool,
            clock,
            tracker,
            catalog,
            _dir: dir,
        }
    }

    /// "Push Day" in plan "Push Pull Legs" with Bench Press 3x10@50 then
    /// Barbell Squats 4x8@80.
    pub async fn two_exercise_session(&self) -> Session {
        let bench = exercise(&self.pool, "Bench Press", &["Chest", "Triceps"]).await;
        let squat = exercise(&self.pool, "Barbell Squats", &["Quadriceps"]).await;
        let plan = plan(&self.pool, "Push Pull Legs").await;
        let session = session(&self.pool, Some(plan.id), "Push Day", 1).await;
        execution(&self.pool, &session, &bench, (3, 10, 50), 1).await;
        execution(&self.pool, &session, &squat, (4, 8, 80), 2).await;
        session
    }
}

pub async fn exercise(pool: &SqlitePool, name: &str, groups: &[&str]) -> Exercise {
    let exercise = Exercise {
        id: Uuid::new_v4(),
        name: name.to_string(),
        category: ExerciseCategory::FreeWeight,
        description: Some(format!("{name} description")),
        muscle_groups: groups.iter().map(|g| g.to_string()).collect(),
    };
    let mut conn = pool.acquire().await.unwrap();
    catalog::save_exercise(&mut conn, &exercise).await.unwrap();
    exercise
}

pub async fn plan(pool: &SqlitePool, name: &str) -> Plan {
    let plan = Plan {
        id: Uuid::new_v4(),
        name: name.to_string(),
        description: Some(format!("{name} description")),
    };
    let mut conn = pool.acquire().await.unwrap();
    catalog::save_plan(&mut conn, &plan).await.unwrap();
    plan
}

pub async fn session(pool: &SqlitePool, plan_id: Option<Uuid>, name: &str, order_id: i32) -> Session {
    let session = Session {
        id: Uuid::new_v4(),
        name: name.to_string(),
        plan_id,
        order_id,
    };
    let mut conn = pool.acquire().await.unwrap();
    catalog::save_session(&mut conn, &session).await.unwrap();
    session
}

pub async fn execution(
    pool: &SqlitePool,
    session: &Session,
    exercise: &Exercise,
    (sets, reps, weight): (i32, i32, i32),
    order_id: i32,
) -> ExerciseExecution {
    let execution = ExerciseExecution {
        id: Uuid::new_v4(),
        session_id: session.id,
        exercise_id: exercise.id,
        planned_sets: sets,
        planned_reps: reps,
        planned_weight: weight,
        order_id,
    };
    let mut conn = pool.acquire().await.unwrap();
    catalog::save_execution(&mut conn, &execution).await.unwrap();
    execution
}
