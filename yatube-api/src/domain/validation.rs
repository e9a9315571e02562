use super::DomainError;

/// Validates a `text` field. A required field must be present; a present
/// field must not be blank.
pub fn text_field(text: Option<String>, required: bool) -> Result<Option<String>, DomainError> {
    match text {
        None if required => Err(DomainError::validation("text: This field is required.")),
        None => Ok(None),
        Some(text) if text.trim().is_empty() => Err(DomainError::validation(
            "text: This field may not be blank.",
        )),
        Some(text) => Ok(Some(text)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_text_must_be_present() {
        assert!(text_field(None, true).is_err());
        assert_eq!(text_field(None, false).unwrap(), None);
    }

    #[test]
    fn blank_text_is_rejected() {
        assert!(text_field(Some("   ".into()), false).is_err());
        assert_eq!(
            text_field(Some("hi".into()), true).unwrap().as_deref(),
            Some("hi")
        );
    }
}
