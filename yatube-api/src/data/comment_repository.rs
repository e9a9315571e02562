use crate::domain::{Comment, DomainError};
use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn create(&self, post_id: i64, author_id: i64, text: &str) -> Result<Comment, DomainError>;
    /// Looks a comment up under its parent post only.
    async fn find_for_post(&self, post_id: i64, id: i64) -> Result<Comment, DomainError>;
    async fn list_for_post(&self, post_id: i64) -> Result<Vec<Comment>, DomainError>;
    async fn update(&self, id: i64, text: &str) -> Result<Comment, DomainError>;
    async fn delete(&self, id: i64) -> Result<(), DomainError>;
}

pub struct PostgresCommentRepository {
    pool: PgPool,
}

impl PostgresCommentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn comment_from_row(row: &PgRow) -> Result<Comment, DomainError> {
    Ok(Comment {
        id: row.try_get("id")?,
        text: row.try_get("text")?,
        created: row.try_get("created")?,
        post_id: row.try_get("post_id")?,
        author_id: row.try_get("author_id")?,
        author_username: row.try_get("author_username")?,
    })
}

/// A comment insert fails on a foreign key when its post or its author was
/// deleted after the service looked them up.
fn foreign_key_error(constraint: Option<&str>) -> DomainError {
    match constraint {
        Some("comments_post_id_fkey") => DomainError::PostNotFound,
        Some("comments_author_id_fkey") => DomainError::Unauthorized("User not found".to_string()),
        other => DomainError::DatabaseError(format!(
            "Foreign key violation on {}",
            other.unwrap_or("unknown constraint")
        )),
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn create(&self, post_id: i64, author_id: i64, text: &str) -> Result<Comment, DomainError> {
        let row = sqlx::query(
            r#"
            WITH inserted AS (
                INSERT INTO comments (author_id, post_id, text, created)
                VALUES ($1, $2, $3, NOW())
                RETURNING id, text, created, post_id, author_id
            )
            SELECT c.id, c.text, c.created, c.post_id, c.author_id,
                   u.username AS author_username
            FROM inserted c
            JOIN users u ON u.id = c.author_id
            "#,
        )
        .bind(author_id)
        .bind(post_id)
        .bind(text)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create comment on post {}: {}", post_id, e);
            match e {
                sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                    foreign_key_error(db.constraint())
                }
                e => DomainError::DatabaseError(e.to_string()),
            }
        })?;

        comment_from_row(&row)
    }

    async fn find_for_post(&self, post_id: i64, id: i64) -> Result<Comment, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT c.id, c.text, c.created, c.post_id, c.author_id,
                   u.username AS author_username
            FROM comments c
            JOIN users u ON u.id = c.author_id
            WHERE c.post_id = $1 AND c.id = $2
            "#,
        )
        .bind(post_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => comment_from_row(&row),
            None => Err(DomainError::CommentNotFound),
        }
    }

    async fn list_for_post(&self, post_id: i64) -> Result<Vec<Comment>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT c.id, c.text, c.created, c.post_id, c.author_id,
                   u.username AS author_username
            FROM comments c
            JOIN users u ON u.id = c.author_id
            WHERE c.post_id = $1
            ORDER BY c.id
            "#,
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(comment_from_row).collect()
    }

    async fn update(&self, id: i64, text: &str) -> Result<Comment, DomainError> {
        let row = sqlx::query(
            r#"
            WITH updated AS (
                UPDATE comments SET text = $1
                WHERE id = $2
                RETURNING id, text, created, post_id, author_id
            )
            SELECT c.id, c.text, c.created, c.post_id, c.author_id,
                   u.username AS author_username
            FROM updated c
            JOIN users u ON u.id = c.author_id
            "#,
        )
        .bind(text)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => comment_from_row(&row),
            None => Err(DomainError::CommentNotFound),
        }
    }

    async fn delete(&self, id: i64) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            Err(DomainError::CommentNotFound)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn foreign_key_violations_map_by_constraint() {
        assert!(matches!(
            foreign_key_error(Some("comments_post_id_fkey")),
            DomainError::PostNotFound
        ));
        assert_eq!(foreign_key_error(Some("comments_author_id_fkey")).to_status_code(), 401);
        assert_eq!(foreign_key_error(Some("comments_other_fkey")).to_status_code(), 500);
    }
}
