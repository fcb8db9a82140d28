use std::sync::Arc;

use liftlog::catalog::Catalog;
use liftlog::clock::{Clock, SystemClock};
use liftlog::db::SqlitePool;
use liftlog::identity::SqliteIdentity;
use liftlog::workout::Tracker;

#[derive(Clone)]
pub struct AppState {
    pub catalog: Catalog,
    pub tracker: Tracker,
    pub identity: Arc<SqliteIdentity>,
}

impl AppState {
    pub fn new(pool: SqlitePool) -> Self {
        Self::with_clock(pool, Arc::new(SystemClock))
    }

    pub fn with_clock(pool: SqlitePool, clock: Arc<dyn Clock>) -> Self {
        let identity = Arc::new(SqliteIdentity::new(pool.clone()));
        Self {
            catalog: Catalog::new(pool.clone(), identity.clone()),
            tracker: Tracker::new(pool, clock, identity.clone()),
            identity,
        }
    }
}
