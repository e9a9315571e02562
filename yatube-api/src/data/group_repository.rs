use crate::domain::group::NewGroup;
use crate::domain::{DomainError, Group};
use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

#[async_trait]
pub trait GroupRepository: Send + Sync {
    async fn create(&self, group: NewGroup) -> Result<Group, DomainError>;
    async fn find_by_id(&self, id: i64) -> Result<Group, DomainError>;
    async fn find_by_slug(&self, slug: &str) -> Result<Group, DomainError>;
    async fn list(&self) -> Result<Vec<Group>, DomainError>;
}

pub struct PostgresGroupRepository {
    pool: PgPool,
}

impl PostgresGroupRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn group_from_row(row: &PgRow) -> Result<Group, DomainError> {
    Ok(Group {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        slug: row.try_get("slug")?,
        description: row.try_get("description")?,
    })
}

#[async_trait]
impl GroupRepository for PostgresGroupRepository {
    async fn create(&self, group: NewGroup) -> Result<Group, DomainError> {
        let row = sqlx::query(
            r#"
            INSERT INTO groups (title, slug, description)
            VALUES ($1, $2, $3)
            RETURNING id, title, slug, description
            "#,
        )
        .bind(&group.title)
        .bind(&group.slug)
        .bind(&group.description)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                DomainError::validation(format!("slug: group '{}' already exists", group.slug))
            }
            e => {
                tracing::error!("Failed to create group: {}", e);
                DomainError::DatabaseError(e.to_string())
            }
        })?;

        group_from_row(&row)
    }

    async fn find_by_id(&self, id: i64) -> Result<Group, DomainError> {
        let row = sqlx::query("SELECT id, title, slug, description FROM groups WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => group_from_row(&row),
            None => Err(DomainError::GroupNotFound),
        }
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Group, DomainError> {
        let row = sqlx::query("SELECT id, title, slug, description FROM groups WHERE slug = $1")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => group_from_row(&row),
            None => Err(DomainError::GroupNotFound),
        }
    }

    async fn list(&self) -> Result<Vec<Group>, DomainError> {
        let rows = sqlx::query("SELECT id, title, slug, description FROM groups ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(group_from_row).collect()
    }
}
