use crate::data::GroupRepository;
use crate::domain::group::{GroupResponse, NewGroup};
use crate::domain::DomainError;
use std::sync::Arc;

pub struct GroupService {
    group_repo: Arc<dyn GroupRepository + Send + Sync>,
}

impl GroupService {
    pub fn new(group_repo: Arc<dyn GroupRepository + Send + Sync>) -> Self {
        Self { group_repo }
    }

    pub async fn list_groups(&self) -> Result<Vec<GroupResponse>, DomainError> {
        self.group_repo.list().await
    }

    pub async fn get_group(&self, id: i64) -> Result<GroupResponse, DomainError> {
        self.group_repo.find_by_id(id).await
    }

    /// Administrative provisioning; not reachable over HTTP.
    pub async fn create_group(&self, group: NewGroup) -> Result<GroupResponse, DomainError> {
        if group.title.trim().is_empty() {
            return Err(DomainError::validation("title: This field may not be blank."));
        }
        if group.slug.is_empty()
            || !group
                .slug
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(DomainError::validation(
                "slug: Enter a valid slug consisting of letters, numbers, underscores or hyphens.",
            ));
        }

        let group = self.group_repo.create(group).await?;

        tracing::info!("Group created: id={}, slug={}", group.id, group.slug);

        Ok(group)
    }
}
