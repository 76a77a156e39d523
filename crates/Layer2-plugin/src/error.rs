//! Plugin-specific error types
//!
//! PluginError는 플러그인 호출 경로의 에러를 표현합니다.
//! datawedge_foundation::Error와의 변환을 지원합니다.

use datawedge_foundation::Error as FoundationError;
use thiserror::Error;

/// Errors that can occur while invoking the plugin
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PluginError {
    /// The active implementation cannot perform the operation
    #[error("DataWedge is not supported on {platform} ({operation})")]
    Unsupported { operation: String, platform: String },

    /// Error relayed unchanged from the native bridge
    #[error("{message}")]
    Bridge { method: String, message: String },

    /// Bridge replied with a payload that does not match the documented shape
    #[error("Invalid response from {method}: {message}")]
    InvalidResponse { method: String, message: String },

    /// Options could not be encoded for the bridge
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl PluginError {
    pub fn unsupported(operation: impl Into<String>, platform: impl Into<String>) -> Self {
        PluginError::Unsupported {
            operation: operation.into(),
            platform: platform.into(),
        }
    }

    pub fn bridge(method: impl Into<String>, message: impl Into<String>) -> Self {
        PluginError::Bridge {
            method: method.into(),
            message: message.into(),
        }
    }

    pub fn is_unsupported(&self) -> bool {
        matches!(self, PluginError::Unsupported { .. })
    }

    /// Operation or bridge method the error belongs to
    pub fn operation(&self) -> Option<&str> {
        match self {
            PluginError::Unsupported { operation, .. } => Some(operation),
            PluginError::Bridge { method, .. } | PluginError::InvalidResponse { method, .. } => {
                Some(method)
            }
            PluginError::Serialization(_) => None,
        }
    }
}

// ============================================================================
// datawedge_foundation::Error 변환
// ============================================================================

impl From<PluginError> for FoundationError {
    fn from(err: PluginError) -> Self {
        match err {
            PluginError::Unsupported {
                operation,
                platform,
            } => FoundationError::Unsupported {
                operation,
                platform,
            },
            PluginError::Bridge { method, message } => FoundationError::Bridge { method, message },
            PluginError::InvalidResponse { method, message } => {
                FoundationError::InvalidResponse { method, message }
            }
            PluginError::Serialization(msg) => FoundationError::InvalidInput(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_message() {
        let err = PluginError::unsupported("enableScanner", "web");
        assert_eq!(
            err.to_string(),
            "DataWedge is not supported on web (enableScanner)"
        );
        assert_eq!(err.operation(), Some("enableScanner"));
    }

    #[test]
    fn test_bridge_message_is_relayed_verbatim() {
        let err = PluginError::bridge("configure", "Invalid profile name");
        assert_eq!(err.to_string(), "Invalid profile name");
    }

    #[test]
    fn test_into_foundation_error() {
        let err: FoundationError = PluginError::unsupported("isReady", "web").into();
        assert!(err.is_unsupported());

        let err: FoundationError = PluginError::bridge("enable", "broadcast failed").into();
        assert!(matches!(err, FoundationError::Bridge { .. }));
    }
}
