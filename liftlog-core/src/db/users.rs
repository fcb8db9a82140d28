use chrono::{DateTime, Utc};
use sqlx::SqliteConnection;
use uuid::Uuid;

use crate::Result;
use crate::db::models::{User, UserCredentials};

pub async fn insert_user(
    conn: &mut SqliteConnection,
    username: &str,
    password_hash: &str,
    created_at: DateTime<Utc>,
) -> Result<User> {
    let id = Uuid::new_v4();
    sqlx::query(
        "INSERT INTO users (id, username, password_hash, created_at) VALUES (?1, ?2, ?3, ?4)",
    )
    .bind(id)
    .bind(username)
    .bind(password_hash)
    .bind(created_at)
    .execute(conn)
    .await?;
    Ok(User {
        id,
        username: username.to_string(),
    })
}

pub async fn find_user_by_username(conn: &mut SqliteConnection, username: &str) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>("SELECT id, username FROM users WHERE username = ?1")
        .bind(username)
        .fetch_optional(conn)
        .await?;
    Ok(user)
}

pub async fn find_credentials(
    conn: &mut SqliteConnection,
    username: &str,
) -> Result<Option<UserCredentials>> {
    let credentials = sqlx::query_as::<_, UserCredentials>(
        "SELECT id, username, password_hash FROM users WHERE username = ?1",
    )
    .bind(username)
    .fetch_optional(conn)
    .await?;
    Ok(credentials)
}
