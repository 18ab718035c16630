//! User account queries

use serde::Serialize;
use sqlx::SqlitePool;

/// Account row used for login
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AuthUser {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub role: String,
    pub is_account_banned: bool,
}

/// Account summary for admin listings
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct UserAccount {
    pub id: i64,
    pub username: String,
    pub role: String,
    pub created_at: String,
}

pub async fn find_by_username(
    pool: &SqlitePool,
    username: &str,
) -> Result<Option<AuthUser>, sqlx::Error> {
    sqlx::query_as(
        "SELECT id, username, password_hash, role, is_account_banned \
         FROM users WHERE username = ?",
    )
    .bind(username)
    .fetch_optional(pool)
    .await
}

pub async fn list_all(pool: &SqlitePool) -> Result<Vec<UserAccount>, sqlx::Error> {
    sqlx::query_as("SELECT id, username, role, created_at FROM users ORDER BY id")
        .fetch_all(pool)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::{insert_user, memory_pool};

    #[tokio::test]
    async fn test_find_by_username() {
        let pool = memory_pool().await;
        insert_user(&pool, "aisha", "chef").await;

        let user = find_by_username(&pool, "aisha").await.unwrap().unwrap();
        assert_eq!(user.role, "chef");
        assert!(!user.is_account_banned);

        assert!(find_by_username(&pool, "missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_all_in_id_order() {
        let pool = memory_pool().await;
        insert_user(&pool, "zara", "user").await;
        insert_user(&pool, "aisha", "admin").await;

        let users = list_all(&pool).await.unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].username, "zara");
        assert_eq!(users[1].username, "aisha");
    }
}
