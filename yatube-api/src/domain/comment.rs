use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::permissions::Authored;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub text: String,
    pub created: DateTime<Utc>,
    pub post_id: i64,
    pub author_id: i64,
    pub author_username: String,
}

impl Authored for Comment {
    fn author_id(&self) -> i64 {
        self.author_id
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CommentPayload {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CommentResponse {
    pub id: i64,
    pub author: String,
    pub text: String,
    pub created: DateTime<Utc>,
    pub post: i64,
}

impl From<Comment> for CommentResponse {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id,
            author: comment.author_username,
            text: comment.text,
            created: comment.created,
            post: comment.post_id,
        }
    }
}
