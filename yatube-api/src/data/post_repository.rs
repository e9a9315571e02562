use crate::domain::post::{NewPost, PostChanges};
use crate::domain::{DomainError, Post};
use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn create(&self, author_id: i64, post: NewPost) -> Result<Post, DomainError>;
    async fn find_by_id(&self, id: i64) -> Result<Post, DomainError>;
    async fn update(&self, id: i64, changes: PostChanges) -> Result<Post, DomainError>;
    async fn delete(&self, id: i64) -> Result<(), DomainError>;
    /// Posts in id order. `limit = None` returns every post from `offset` on.
    async fn list(&self, limit: Option<i64>, offset: i64) -> Result<(Vec<Post>, i64), DomainError>;
}

pub struct PostgresPostRepository {
    pool: PgPool,
}

impl PostgresPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn post_from_row(row: &PgRow) -> Result<Post, DomainError> {
    Ok(Post {
        id: row.try_get("id")?,
        text: row.try_get("text")?,
        pub_date: row.try_get("pub_date")?,
        author_id: row.try_get("author_id")?,
        author_username: row.try_get("author_username")?,
        group_id: row.try_get("group_id")?,
        image: row.try_get("image")?,
    })
}

/// Maps a foreign key violation on insert to the field it concerns.
fn foreign_key_error(constraint: Option<&str>) -> DomainError {
    match constraint {
        Some("posts_group_id_fkey") => DomainError::validation("group: Invalid group"),
        Some("posts_author_id_fkey") => DomainError::Unauthorized("User not found".to_string()),
        other => DomainError::DatabaseError(format!(
            "Foreign key violation on {}",
            other.unwrap_or("unknown constraint")
        )),
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn create(&self, author_id: i64, post: NewPost) -> Result<Post, DomainError> {
        let row = sqlx::query(
            r#"
            WITH inserted AS (
                INSERT INTO posts (text, pub_date, author_id, group_id, image)
                VALUES ($1, NOW(), $2, $3, $4)
                RETURNING id, text, pub_date, author_id, group_id, image
            )
            SELECT p.id, p.text, p.pub_date, p.author_id, p.group_id, p.image,
                   u.username AS author_username
            FROM inserted p
            JOIN users u ON u.id = p.author_id
            "#,
        )
        .bind(&post.text)
        .bind(author_id)
        .bind(post.group_id)
        .bind(&post.image)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create post: {}", e);
            match e {
                sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                    foreign_key_error(db.constraint())
                }
                e => DomainError::DatabaseError(e.to_string()),
            }
        })?;

        post_from_row(&row)
    }

    async fn find_by_id(&self, id: i64) -> Result<Post, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT p.id, p.text, p.pub_date, p.author_id, p.group_id, p.image,
                   u.username AS author_username
            FROM posts p
            JOIN users u ON u.id = p.author_id
            WHERE p.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => post_from_row(&row),
            None => Err(DomainError::PostNotFound),
        }
    }

    async fn update(&self, id: i64, changes: PostChanges) -> Result<Post, DomainError> {
        let PostChanges {
            text,
            group_id,
            image,
        } = changes;

        let row = sqlx::query(
            r#"
            WITH updated AS (
                UPDATE posts
                SET
                    text = COALESCE($1, text),
                    group_id = CASE WHEN $2 THEN $3 ELSE group_id END,
                    image = CASE WHEN $4 THEN $5 ELSE image END
                WHERE id = $6
                RETURNING id, text, pub_date, author_id, group_id, image
            )
            SELECT p.id, p.text, p.pub_date, p.author_id, p.group_id, p.image,
                   u.username AS author_username
            FROM updated p
            JOIN users u ON u.id = p.author_id
            "#,
        )
        .bind(text)
        .bind(group_id.is_some())
        .bind(group_id.flatten())
        .bind(image.is_some())
        .bind(image.flatten())
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update post {}: {}", id, e);
            DomainError::DatabaseError(e.to_string())
        })?;

        match row {
            Some(row) => post_from_row(&row),
            None => Err(DomainError::PostNotFound),
        }
    }

    async fn delete(&self, id: i64) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            Err(DomainError::PostNotFound)
        } else {
            Ok(())
        }
    }

    async fn list(&self, limit: Option<i64>, offset: i64) -> Result<(Vec<Post>, i64), DomainError> {
        let count_row = sqlx::query("SELECT COUNT(*) AS count FROM posts")
            .fetch_one(&self.pool)
            .await?;

        let total: i64 = count_row.try_get("count")?;

        // LIMIT NULL is LIMIT ALL
        let rows = sqlx::query(
            r#"
            SELECT p.id, p.text, p.pub_date, p.author_id, p.group_id, p.image,
                   u.username AS author_username
            FROM posts p
            JOIN users u ON u.id = p.author_id
            ORDER BY p.id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let posts = rows.iter().map(post_from_row).collect::<Result<Vec<Post>, DomainError>>()?;

        Ok((posts, total))
    }
}
