use crate::entities::ErrorMessage;

/// The message shown to a user when a collaborator failed without saying why.
pub const UNKNOWN_ERROR_MESSAGE: &str = "An unknown error occurred";

/// Single policy for turning collaborator failures into user-facing strings.
/// Components that surface errors receive it instead of keeping their own fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorMessagePolicy {
    fallback_message: ErrorMessage,
}

impl Default for ErrorMessagePolicy {
    fn default() -> Self {
        Self {
            fallback_message: String::from(UNKNOWN_ERROR_MESSAGE),
        }
    }
}

impl ErrorMessagePolicy {
    pub fn new(fallback_message: impl Into<ErrorMessage>) -> Self {
        Self {
            fallback_message: fallback_message.into(),
        }
    }

    pub fn fallback_message(&self) -> &str {
        &self.fallback_message
    }

    pub fn message_for(&self, error: &anyhow::Error) -> ErrorMessage {
        self.message_or_fallback(Some(&error.to_string()))
    }

    pub fn message_or_fallback(&self, message: Option<&str>) -> ErrorMessage {
        match message {
            Some(message) if !message.trim().is_empty() => message.to_string(),
            _ => self.fallback_message.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[allow(non_snake_case)]
    fn message_for__error_with_text__should_return_error_text() {
        let policy = ErrorMessagePolicy::default();

        assert_eq!(
            policy.message_for(&anyhow::anyhow!("phone is already taken")),
            "phone is already taken"
        );
    }

    #[test]
    #[allow(non_snake_case)]
    fn message_or_fallback__blank_or_missing_message__should_return_fallback() {
        let policy = ErrorMessagePolicy::new("something went wrong");

        assert_eq!(policy.message_or_fallback(None), "something went wrong");
        assert_eq!(policy.message_or_fallback(Some("   ")), "something went wrong");
    }

    #[test]
    #[allow(non_snake_case)]
    fn default__no_custom_message__should_use_unknown_error_constant() {
        assert_eq!(
            ErrorMessagePolicy::default().fallback_message(),
            UNKNOWN_ERROR_MESSAGE
        );
    }
}
