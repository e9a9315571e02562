use crate::data::{CommentRepository, PostRepository};
use crate::domain::comment::{CommentPayload, CommentResponse};
use crate::domain::permissions::{has_object_permission, has_permission, require_authenticated, Action};
use crate::domain::validation::text_field;
use crate::domain::{Comment, DomainError, Post};
use std::sync::Arc;

pub struct CommentService {
    comment_repo: Arc<dyn CommentRepository + Send + Sync>,
    post_repo: Arc<dyn PostRepository + Send + Sync>,
}

impl CommentService {
    pub fn new(
        comment_repo: Arc<dyn CommentRepository + Send + Sync>,
        post_repo: Arc<dyn PostRepository + Send + Sync>,
    ) -> Self {
        Self {
            comment_repo,
            post_repo,
        }
    }

    async fn parent(&self, post_id: i64) -> Result<Post, DomainError> {
        self.post_repo.find_by_id(post_id).await
    }

    pub async fn list_comments(&self, post_id: i64) -> Result<Vec<CommentResponse>, DomainError> {
        let post = self.parent(post_id).await?;
        let comments = self.comment_repo.list_for_post(post.id).await?;

        Ok(comments.into_iter().map(CommentResponse::from).collect())
    }

    pub async fn get_comment(&self, post_id: i64, id: i64) -> Result<CommentResponse, DomainError> {
        let post = self.parent(post_id).await?;
        let comment = self.comment_repo.find_for_post(post.id, id).await?;

        Ok(CommentResponse::from(comment))
    }

    pub async fn create_comment(
        &self,
        requester: Option<i64>,
        post_id: i64,
        payload: CommentPayload,
    ) -> Result<CommentResponse, DomainError> {
        has_permission(requester, Action::Create)?;
        let author_id = require_authenticated(requester)?;

        let post = self.parent(post_id).await?;
        let text = text_field(payload.text, true)?.unwrap_or_default();

        let comment = self.comment_repo.create(post.id, author_id, &text).await?;

        tracing::info!(
            "Comment created: id={}, post_id={}, author_id={}",
            comment.id,
            post.id,
            author_id
        );

        Ok(CommentResponse::from(comment))
    }

    pub async fn update_comment(
        &self,
        requester: Option<i64>,
        post_id: i64,
        id: i64,
        payload: Result<CommentPayload, DomainError>,
        partial: bool,
    ) -> Result<CommentResponse, DomainError> {
        let action = if partial {
            Action::PartialUpdate
        } else {
            Action::Update
        };
        let comment = self.authorize(requester, post_id, id, action).await?;

        let updated = match text_field(payload?.text, !partial)? {
            Some(text) => self.comment_repo.update(comment.id, &text).await?,
            None => comment,
        };

        tracing::info!("Comment updated: id={}, post_id={}", updated.id, post_id);

        Ok(CommentResponse::from(updated))
    }

    pub async fn delete_comment(
        &self,
        requester: Option<i64>,
        post_id: i64,
        id: i64,
    ) -> Result<(), DomainError> {
        let comment = self.authorize(requester, post_id, id, Action::Destroy).await?;

        self.comment_repo.delete(comment.id).await?;

        tracing::info!("Comment deleted: id={}, post_id={}", id, post_id);

        Ok(())
    }

    async fn authorize(
        &self,
        requester: Option<i64>,
        post_id: i64,
        id: i64,
        action: Action,
    ) -> Result<Comment, DomainError> {
        has_permission(requester, action)?;

        let post = self.parent(post_id).await?;
        let comment = self.comment_repo.find_for_post(post.id, id).await?;

        if let Err(err) = has_object_permission(requester, &comment, action) {
            tracing::warn!(
                "User {:?} attempted to modify comment {} owned by {}",
                requester,
                id,
                comment.author_id
            );
            return Err(err);
        }

        Ok(comment)
    }
}
