pub mod comment;
pub mod error;
pub mod follow;
pub mod group;
pub mod permissions;
pub mod post;
pub mod user;
pub mod validation;

pub use comment::Comment;
pub use error::DomainError;
pub use follow::Follow;
pub use group::Group;
pub use post::Post;
pub use user::User;
