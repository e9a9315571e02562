use crate::domain::{DomainError, Follow};
use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

#[async_trait]
pub trait FollowRepository: Send + Sync {
    async fn create(&self, user_id: i64, following_id: i64) -> Result<Follow, DomainError>;
    async fn exists(&self, user_id: i64, following_id: i64) -> Result<bool, DomainError>;
    /// Follows whose follower is `user_id`, in id order.
    async fn list_for_user(&self, user_id: i64) -> Result<Vec<Follow>, DomainError>;
}

pub struct PostgresFollowRepository {
    pool: PgPool,
}

impl PostgresFollowRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn follow_from_row(row: &PgRow) -> Result<Follow, DomainError> {
    Ok(Follow {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        user_username: row.try_get("user_username")?,
        following_id: row.try_get("following_id")?,
        following_username: row.try_get("following_username")?,
    })
}

/// Maps a violated follow constraint to the rule a concurrent request broke.
fn constraint_error(constraint: Option<&str>, message: &str) -> DomainError {
    match constraint {
        Some("unique_follow") => DomainError::validation("You are already following this user"),
        Some("prevent_self_follow") => DomainError::validation("You cannot follow yourself"),
        _ => DomainError::DatabaseError(message.to_string()),
    }
}

#[async_trait]
impl FollowRepository for PostgresFollowRepository {
    async fn create(&self, user_id: i64, following_id: i64) -> Result<Follow, DomainError> {
        let row = sqlx::query(
            r#"
            WITH inserted AS (
                INSERT INTO follows (user_id, following_id)
                VALUES ($1, $2)
                RETURNING id, user_id, following_id
            )
            SELECT f.id, f.user_id, f.following_id,
                   u.username AS user_username,
                   t.username AS following_username
            FROM inserted f
            JOIN users u ON u.id = f.user_id
            JOIN users t ON t.id = f.following_id
            "#,
        )
        .bind(user_id)
        .bind(following_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() || db.is_check_violation() => {
                constraint_error(db.constraint(), db.message())
            }
            e => {
                tracing::error!("Failed to create follow: {}", e);
                DomainError::DatabaseError(e.to_string())
            }
        })?;

        follow_from_row(&row)
    }

    async fn exists(&self, user_id: i64, following_id: i64) -> Result<bool, DomainError> {
        let row = sqlx::query(
            "SELECT EXISTS(SELECT 1 FROM follows WHERE user_id = $1 AND following_id = $2) AS found",
        )
        .bind(user_id)
        .bind(following_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.try_get("found")?)
    }

    async fn list_for_user(&self, user_id: i64) -> Result<Vec<Follow>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT f.id, f.user_id, f.following_id,
                   u.username AS user_username,
                   t.username AS following_username
            FROM follows f
            JOIN users u ON u.id = f.user_id
            JOIN users t ON t.id = f.following_id
            WHERE f.user_id = $1
            ORDER BY f.id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(follow_from_row).collect()
    }
}
