use crate::data::{FollowRepository, UserRepository};
use crate::domain::follow::{search_terms, validate_new_follow, CreateFollowRequest, FollowResponse};
use crate::domain::permissions::require_authenticated;
use crate::domain::DomainError;
use std::sync::Arc;

pub struct FollowService {
    follow_repo: Arc<dyn FollowRepository + Send + Sync>,
    user_repo: Arc<dyn UserRepository + Send + Sync>,
}

impl FollowService {
    pub fn new(
        follow_repo: Arc<dyn FollowRepository + Send + Sync>,
        user_repo: Arc<dyn UserRepository + Send + Sync>,
    ) -> Self {
        Self {
            follow_repo,
            user_repo,
        }
    }

    pub async fn list_follows(
        &self,
        requester: Option<i64>,
        search: Option<&str>,
    ) -> Result<Vec<FollowResponse>, DomainError> {
        let user_id = require_authenticated(requester)?;
        let terms = search_terms(search);

        let follows = self.follow_repo.list_for_user(user_id).await?;

        Ok(follows
            .into_iter()
            .filter(|follow| follow.matches(&terms))
            .map(FollowResponse::from)
            .collect())
    }

    pub async fn create_follow(
        &self,
        requester: Option<i64>,
        req: CreateFollowRequest,
    ) -> Result<FollowResponse, DomainError> {
        let user_id = require_authenticated(requester)?;

        let following = match self.user_repo.find_by_username(&req.following).await {
            Ok(user) => user,
            Err(DomainError::UserNotFound) => {
                return Err(DomainError::validation(format!(
                    "following: Object with username={} does not exist.",
                    req.following
                )))
            }
            Err(err) => return Err(err),
        };

        let already_following = self.follow_repo.exists(user_id, following.id).await?;
        if let Err(err) = validate_new_follow(user_id, following.id, already_following) {
            tracing::warn!(
                "Rejected follow user_id={} -> following_id={}: {}",
                user_id,
                following.id,
                err
            );
            return Err(err);
        }

        let follow = self.follow_repo.create(user_id, following.id).await?;

        tracing::info!(
            "Follow created: user_id={}, following_id={}",
            user_id,
            following.id
        );

        Ok(FollowResponse::from(follow))
    }
}
