use super::DomainError;

/// The operation a request performs on a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    List,
    Retrieve,
    Create,
    Update,
    PartialUpdate,
    Destroy,
}

impl Action {
    pub fn is_safe(self) -> bool {
        matches!(self, Self::List | Self::Retrieve)
    }
}

/// A resource owned by the user who created it.
pub trait Authored {
    fn author_id(&self) -> i64;
}

/// Resource-level gate: anonymous requesters may only read.
pub fn has_permission(requester: Option<i64>, action: Action) -> Result<(), DomainError> {
    if action.is_safe() || requester.is_some() {
        Ok(())
    } else {
        Err(DomainError::authentication_required())
    }
}

/// Object-level gate: writes are reserved to the resource's author.
pub fn has_object_permission<R: Authored>(
    requester: Option<i64>,
    resource: &R,
    action: Action,
) -> Result<(), DomainError> {
    if action.is_safe() {
        return Ok(());
    }
    match requester {
        None => Err(DomainError::authentication_required()),
        Some(user_id) if user_id == resource.author_id() => Ok(()),
        Some(_) => Err(DomainError::Forbidden),
    }
}

/// Gate for endpoints that need an authenticated requester whatever the action.
pub fn require_authenticated(requester: Option<i64>) -> Result<i64, DomainError> {
    requester.ok_or_else(DomainError::authentication_required)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Owned(i64);

    impl Authored for Owned {
        fn author_id(&self) -> i64 {
            self.0
        }
    }

    const WRITES: [Action; 3] = [Action::Update, Action::PartialUpdate, Action::Destroy];

    #[test]
    fn reads_are_always_allowed() {
        for action in [Action::List, Action::Retrieve] {
            assert!(has_permission(None, action).is_ok());
            assert!(has_object_permission(None, &Owned(1), action).is_ok());
            assert!(has_object_permission(Some(2), &Owned(1), action).is_ok());
        }
    }

    #[test]
    fn anonymous_create_needs_authentication() {
        let err = has_permission(None, Action::Create).unwrap_err();
        assert_eq!(err.to_status_code(), 401);
        assert!(has_permission(Some(1), Action::Create).is_ok());
    }

    #[test]
    fn only_the_author_may_write() {
        for action in WRITES {
            assert!(has_object_permission(Some(1), &Owned(1), action).is_ok());
            assert!(matches!(
                has_object_permission(Some(2), &Owned(1), action),
                Err(DomainError::Forbidden)
            ));
            assert_eq!(
                has_object_permission(None, &Owned(1), action)
                    .unwrap_err()
                    .to_status_code(),
                401
            );
        }
    }
}
