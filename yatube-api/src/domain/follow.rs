use serde::{Deserialize, Serialize};

use super::DomainError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Follow {
    pub id: i64,
    pub user_id: i64,
    pub user_username: String,
    pub following_id: i64,
    pub following_username: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateFollowRequest {
    pub following: String,
}

#[derive(Debug, Serialize)]
pub struct FollowResponse {
    pub user: String,
    pub following: String,
}

impl From<Follow> for FollowResponse {
    fn from(follow: Follow) -> Self {
        Self {
            user: follow.user_username,
            following: follow.following_username,
        }
    }
}

/// Checks a prospective `(user, following)` pair before it is inserted.
///
/// `already_following` is whether the pair is already stored.
pub fn validate_new_follow(
    user_id: i64,
    following_id: i64,
    already_following: bool,
) -> Result<(), DomainError> {
    if user_id == following_id {
        return Err(DomainError::validation("You cannot follow yourself"));
    }
    if already_following {
        return Err(DomainError::validation(
            "You are already following this user",
        ));
    }
    Ok(())
}

/// Splits a raw `search` query value into terms on whitespace and commas.
pub fn search_terms(raw: Option<&str>) -> Vec<String> {
    raw.map(|raw| {
        raw.split(|c: char| c.is_whitespace() || c == ',')
            .filter(|term| !term.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

impl Follow {
    /// Every term must appear, case-insensitively, in either username.
    pub fn matches(&self, terms: &[String]) -> bool {
        let user = self.user_username.to_lowercase();
        let following = self.following_username.to_lowercase();
        terms.iter().all(|term| {
            let term = term.to_lowercase();
            user.contains(&term) || following.contains(&term)
        })
    }
}
