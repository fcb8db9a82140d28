//! Users and the mapping from an authenticated principal name to the
//! user id that owns workout logs.

pub mod password;

use async_trait::async_trait;
use chrono::Utc;
use log::{info, warn};
use sqlx::SqlitePool;

use crate::db::models::User;
use crate::db::users;
use crate::{LiftlogError, Result};

/// Resolves a principal name to a user.
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    async fn resolve(&self, username: &str) -> Result<Option<User>>;
}

/// Users and credentials stored in the `users` table.
#[derive(Clone)]
pub struct SqliteIdentity {
    pool: SqlitePool,
}

impl SqliteIdentity {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Checks a username/password pair. `None` for an unknown user or a
    /// wrong password alike.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<Option<User>> {
        let mut conn = self.pool.acquire().await?;
        let Some(credentials) = users::find_credentials(&mut conn, username).await? else {
            warn!("authentication failed for unknown user {}", username);
            return Ok(None);
        };
        drop(conn);

        let candidate = password.to_owned();
        let hash = credentials.password_hash.clone();
        let verified =
            tokio::task::spawn_blocking(move || password::verify_password(&candidate, &hash))
                .await??;

        if verified {
            Ok(Some(credentials.into()))
        } else {
            warn!("authentication failed for user {}", username);
            Ok(None)
        }
    }

    pub async fn register(&self, username: &str, password: &str) -> Result<User> {
        let username = username.trim();
        if username.is_empty() {
            return Err(LiftlogError::invalid("username must not be blank"));
        }
        if password.is_empty() {
            return Err(LiftlogError::invalid("password must not be empty"));
        }

        let owned = password.to_owned();
        let hash = tokio::task::spawn_blocking(move || password::hash_password(&owned)).await??;

        let mut conn = self.pool.acquire().await?;
        if users::find_user_by_username(&mut conn, username).await?.is_some() {
            return Err(LiftlogError::conflict("username already exists"));
        }
        let user = users::insert_user(&mut conn, username, &hash, Utc::now()).await?;
        info!("registered user {}", user.username);
        Ok(user)
    }
}

#[async_trait]
impl IdentityResolver for SqliteIdentity {
    async fn resolve(&self, username: &str) -> Result<Option<User>> {
        let mut conn = self.pool.acquire().await?;
        users::find_user_by_username(&mut conn, username).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    #[tokio::test]
    async fn register_then_authenticate() {
        let pool = db::connect_in_memory().await.unwrap();
        let identity = SqliteIdentity::new(pool);

        let alice = identity.register("alice", "pw-alice").await.unwrap();
        assert_eq!(alice.username, "alice");

        let ok = identity.authenticate("alice", "pw-alice").await.unwrap();
        assert_eq!(ok, Some(alice.clone()));
        assert_eq!(identity.authenticate("alice", "nope").await.unwrap(), None);
        assert_eq!(identity.authenticate("mallory", "pw-alice").await.unwrap(), None);

        assert_eq!(identity.resolve("alice").await.unwrap(), Some(alice));
        assert_eq!(identity.resolve("bob").await.unwrap(), None);
    }

    #[tokio::test]
    async fn duplicate_and_blank_usernames_are_rejected() {
        let pool = db::connect_in_memory().await.unwrap();
        let identity = SqliteIdentity::new(pool);

        identity.register("bob", "pw").await.unwrap();
        assert!(matches!(
            identity.register("bob", "other").await,
            Err(LiftlogError::Conflict(_))
        ));
        assert!(matches!(
            identity.register("   ", "pw").await,
            Err(LiftlogError::Invalid(_))
        ));
    }
}
