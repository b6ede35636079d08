use std::fmt;

use serde::{Deserialize, Serialize};

/// Status of a single step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum StepStatus {
    #[default]
    Pending,
    Loading,
    Success,
    Error {
        message: String,
    },
}

impl StepStatus {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Error { message } => Some(message),
            _ => None,
        }
    }
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => f.write_str("pending"),
            Self::Loading => f.write_str("loading"),
            Self::Success => f.write_str("success"),
            Self::Error { message } => write!(f, "error: {message}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_shape() {
        let json = serde_json::to_string(&StepStatus::error("boom")).unwrap();
        assert_eq!(json, r#"{"status":"error","message":"boom"}"#);

        let back: StepStatus = serde_json::from_str(r#"{"status":"loading"}"#).unwrap();
        assert_eq!(back, StepStatus::Loading);
    }

    #[test]
    fn test_error_message() {
        assert_eq!(StepStatus::error("x").error_message(), Some("x"));
        assert_eq!(StepStatus::Success.error_message(), None);
    }
}
