pub mod auth_service;
pub mod comment_service;
pub mod follow_service;
pub mod group_service;
pub mod post_service;

pub use auth_service::AuthService;
pub use comment_service::CommentService;
pub use follow_service::FollowService;
pub use group_service::GroupService;
pub use post_service::PostService;

use crate::data::{
    CommentRepository, FollowRepository, GroupRepository, PostRepository, UserRepository,
};
use crate::infrastructure::jwt::JwtService;
use std::sync::Arc;

/// Storage backends the services are built over.
pub struct Repositories {
    pub users: Arc<dyn UserRepository + Send + Sync>,
    pub groups: Arc<dyn GroupRepository + Send + Sync>,
    pub posts: Arc<dyn PostRepository + Send + Sync>,
    pub comments: Arc<dyn CommentRepository + Send + Sync>,
    pub follows: Arc<dyn FollowRepository + Send + Sync>,
}

#[derive(Clone)]
pub struct AppServices {
    pub auth: Arc<AuthService>,
    pub posts: Arc<PostService>,
    pub groups: Arc<GroupService>,
    pub comments: Arc<CommentService>,
    pub follows: Arc<FollowService>,
    pub jwt: Arc<JwtService>,
}

impl AppServices {
    pub fn new(repos: Repositories, jwt: Arc<JwtService>) -> Self {
        Self {
            auth: Arc::new(AuthService::new(repos.users.clone(), jwt.clone())),
            posts: Arc::new(PostService::new(repos.posts.clone(), repos.groups.clone())),
            groups: Arc::new(GroupService::new(repos.groups)),
            comments: Arc::new(CommentService::new(repos.comments, repos.posts)),
            follows: Arc::new(FollowService::new(repos.follows, repos.users)),
            jwt,
        }
    }
}
