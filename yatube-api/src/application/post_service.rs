use crate::data::{GroupRepository, PostRepository};
use crate::domain::permissions::{has_object_permission, has_permission, require_authenticated, Action};
use crate::domain::post::{GroupRef, NewPost, PostChanges, PostPayload, PostResponse};
use crate::domain::validation::text_field;
use crate::domain::DomainError;
use std::sync::Arc;

pub struct PostService {
    post_repo: Arc<dyn PostRepository + Send + Sync>,
    group_repo: Arc<dyn GroupRepository + Send + Sync>,
}

impl PostService {
    pub fn new(
        post_repo: Arc<dyn PostRepository + Send + Sync>,
        group_repo: Arc<dyn GroupRepository + Send + Sync>,
    ) -> Self {
        Self {
            post_repo,
            group_repo,
        }
    }

    pub async fn list_posts(
        &self,
        limit: Option<i64>,
        offset: i64,
    ) -> Result<(Vec<PostResponse>, i64), DomainError> {
        let (posts, total) = self.post_repo.list(limit, offset).await?;

        Ok((posts.into_iter().map(PostResponse::from).collect(), total))
    }

    pub async fn get_post(&self, id: i64) -> Result<PostResponse, DomainError> {
        let post = self.post_repo.find_by_id(id).await?;
        Ok(PostResponse::from(post))
    }

    pub async fn create_post(
        &self,
        requester: Option<i64>,
        payload: PostPayload,
    ) -> Result<PostResponse, DomainError> {
        has_permission(requester, Action::Create)?;
        let author_id = require_authenticated(requester)?;

        let changes = self.validate(payload, true).await?;
        let new_post = NewPost {
            text: changes.text.unwrap_or_default(),
            group_id: changes.group_id.flatten(),
            image: changes.image.flatten(),
        };

        let post = self.post_repo.create(author_id, new_post).await?;

        tracing::info!("Post created: id={}, author_id={}", post.id, author_id);

        Ok(PostResponse::from(post))
    }

    /// `PUT` when `partial` is false, `PATCH` otherwise. A body that failed
    /// to decode is only reported once the requester is known to own the post.
    pub async fn update_post(
        &self,
        requester: Option<i64>,
        id: i64,
        payload: Result<PostPayload, DomainError>,
        partial: bool,
    ) -> Result<PostResponse, DomainError> {
        let action = if partial {
            Action::PartialUpdate
        } else {
            Action::Update
        };
        has_permission(requester, action)?;

        let post = self.post_repo.find_by_id(id).await?;
        if let Err(err) = has_object_permission(requester, &post, action) {
            tracing::warn!(
                "User {:?} attempted to update post {} owned by {}",
                requester,
                id,
                post.author_id
            );
            return Err(err);
        }

        let changes = self.validate(payload?, !partial).await?;
        let updated = self.post_repo.update(id, changes).await?;

        tracing::info!("Post updated: id={}, author_id={}", id, post.author_id);

        Ok(PostResponse::from(updated))
    }

    pub async fn delete_post(&self, requester: Option<i64>, id: i64) -> Result<(), DomainError> {
        has_permission(requester, Action::Destroy)?;

        let post = self.post_repo.find_by_id(id).await?;
        if let Err(err) = has_object_permission(requester, &post, Action::Destroy) {
            tracing::warn!(
                "User {:?} attempted to delete post {} owned by {}",
                requester,
                id,
                post.author_id
            );
            return Err(err);
        }

        self.post_repo.delete(id).await?;

        tracing::info!("Post deleted: id={}, author_id={}", id, post.author_id);

        Ok(())
    }

    async fn validate(&self, payload: PostPayload, full: bool) -> Result<PostChanges, DomainError> {
        let text = text_field(payload.text, full)?;

        let group_id = match payload.group {
            None => None,
            Some(None) => Some(None),
            Some(Some(group)) => Some(Some(self.resolve_group(group).await?)),
        };

        Ok(PostChanges {
            text,
            group_id,
            image: payload.image,
        })
    }

    async fn resolve_group(&self, group: GroupRef) -> Result<i64, DomainError> {
        let found = match &group {
            GroupRef::Id(id) => self.group_repo.find_by_id(*id).await,
            GroupRef::Slug(slug) => self.group_repo.find_by_slug(slug).await,
        };

        match found {
            Ok(group) => Ok(group.id),
            Err(DomainError::GroupNotFound) => Err(DomainError::validation(format!(
                "group: Invalid group \"{}\" - object does not exist.",
                group
            ))),
            Err(err) => Err(err),
        }
    }
}
