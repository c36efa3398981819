use serde::{Deserialize, Serialize};

use crate::entities::ErrorMessage;
use crate::errors::ErrorMessagePolicy;

/// Envelope returned by every data-access collaborator (client search, branch listing,
/// uniqueness checks, catalogs). The wizard core only ever looks at whether it succeeded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationResult<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorMessage>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl<T> OperationResult<T> {
    pub fn succeeded(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            warnings: Vec::new(),
        }
    }

    pub fn failed(error: impl Into<ErrorMessage>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            warnings: Vec::new(),
        }
    }

    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings = warnings;
        self
    }

    pub fn from_result(result: anyhow::Result<T>, policy: &ErrorMessagePolicy) -> Self {
        match result {
            Ok(data) => Self::succeeded(data),
            Err(e) => Self::failed(policy.message_for(&e)),
        }
    }

    /// `None` for a successful result, otherwise the error to render.
    pub fn error_message(&self, policy: &ErrorMessagePolicy) -> Option<ErrorMessage> {
        if self.success {
            return None;
        }

        Some(policy.message_or_fallback(self.error.as_deref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::UNKNOWN_ERROR_MESSAGE;

    #[test]
    #[allow(non_snake_case)]
    fn from_result__error__should_keep_error_text_and_no_data() {
        let result: OperationResult<u32> = OperationResult::from_result(
            Err(anyhow::anyhow!("branch list is unavailable")),
            &ErrorMessagePolicy::default(),
        );

        assert!(!result.success);
        assert_eq!(result.data, None);
        assert_eq!(result.error.as_deref(), Some("branch list is unavailable"));
    }

    #[test]
    #[allow(non_snake_case)]
    fn error_message__failure_without_error_text__should_return_fallback() {
        let result: OperationResult<()> = OperationResult {
            success: false,
            data: None,
            error: None,
            warnings: vec![],
        };

        assert_eq!(
            result.error_message(&ErrorMessagePolicy::default()),
            Some(String::from(UNKNOWN_ERROR_MESSAGE))
        );
    }

    #[test]
    #[allow(non_snake_case)]
    fn error_message__success__should_return_none() {
        let result = OperationResult::succeeded(5).with_warnings(vec![String::from("slow")]);

        assert_eq!(result.error_message(&ErrorMessagePolicy::default()), None);
        assert_eq!(result.warnings, vec![String::from("slow")]);
    }

    #[test]
    #[allow(non_snake_case)]
    fn deserialize__json_without_optional_fields__should_use_defaults() {
        let result: OperationResult<String> =
            serde_json::from_str(r#"{"success":false,"error":"timeout"}"#).unwrap();

        assert_eq!(result, OperationResult::failed("timeout"));
    }
}
