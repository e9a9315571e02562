pub mod comment_repository;
pub mod follow_repository;
pub mod group_repository;
pub mod post_repository;
pub mod user_repository;

pub use comment_repository::{CommentRepository, PostgresCommentRepository};
pub use follow_repository::{FollowRepository, PostgresFollowRepository};
pub use group_repository::{GroupRepository, PostgresGroupRepository};
pub use post_repository::{PostRepository, PostgresPostRepository};
pub use user_repository::{PostgresUserRepository, UserRepository};
