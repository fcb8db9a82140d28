//! Exercises, plans, sessions and their planned executions.
//!
//! Plain CRUD with the name and order-slot rules of each entity. Workout
//! logs only ever read from here.

mod executions;
mod exercises;
mod plans;
mod sessions;
pub mod views;

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::Result;
use crate::db::models::User;
use crate::identity::IdentityResolver;

pub use views::*;

pub const MAX_SESSIONS_PER_PLAN: i64 = 30;
pub const MIN_SESSION_ORDER: i32 = 1;
pub const MAX_SESSION_ORDER: i32 = 30;

#[derive(Clone)]
pub struct Catalog {
    pool: SqlitePool,
    identity: Arc<dyn IdentityResolver>,
}

impl Catalog {
    pub fn new(pool: SqlitePool, identity: Arc<dyn IdentityResolver>) -> Self {
        Self { pool, identity }
    }

    /// The user behind an optional principal. Anonymous and unknown
    /// principals both see no logs.
    async fn viewer(&self, principal: Option<&str>) -> Result<Option<User>> {
        match principal {
            Some(name) => self.identity.resolve(name).await,
            None => Ok(None),
        }
    }
}

fn require_name(name: &str, what: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(crate::LiftlogError::invalid(format!(
            "{what} name must not be blank"
        )));
    }
    Ok(trimmed.to_string())
}
