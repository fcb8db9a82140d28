//! Workout logs: starting a log from a planned session, moving it through
//! its life cycle and editing what was actually performed.

mod execution_logs;
pub mod gate;
mod session_logs;
pub mod start;
pub mod status;
pub mod views;

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::clock::Clock;
use crate::db::models::User;
use crate::identity::IdentityResolver;
use crate::{LiftlogError, Result};

pub use status::{LogStatus, Mutation, Transition};
pub use views::{ExecutionLogUpdate, ExecutionLogView, SessionLogUpdate, SessionLogView};

#[derive(Clone)]
pub struct Tracker {
    pool: SqlitePool,
    clock: Arc<dyn Clock>,
    identity: Arc<dyn IdentityResolver>,
}

impl Tracker {
    pub fn new(pool: SqlitePool, clock: Arc<dyn Clock>, identity: Arc<dyn IdentityResolver>) -> Self {
        Self {
            pool,
            clock,
            identity,
        }
    }

    async fn resolve_owner(&self, principal: &str) -> Result<User> {
        self.identity
            .resolve(principal)
            .await?
            .ok_or_else(|| LiftlogError::not_found(format!("user not found: {principal}")))
    }
}
