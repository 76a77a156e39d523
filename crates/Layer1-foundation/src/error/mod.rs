//! Error types for the DataWedge binding
//!
//! 모든 에러를 중앙에서 관리

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// DataWedge 바인딩 에러 타입
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // 설정 관련
    // ========================================================================
    #[error("Configuration error: {0}")]
    Config(String),

    // ========================================================================
    // 플랫폼 / 브리지 관련
    // ========================================================================
    #[error("{operation} is not supported on {platform}")]
    Unsupported { operation: String, platform: String },

    #[error("Bridge error: {method} - {message}")]
    Bridge { method: String, message: String },

    #[error("Invalid bridge response: {method} - {message}")]
    InvalidResponse { method: String, message: String },

    // ========================================================================
    // 이벤트 관련
    // ========================================================================
    #[error("Unknown event: {0}")]
    UnknownEvent(String),

    #[error("Invalid event payload: {event} - {message}")]
    InvalidEvent { event: String, message: String },

    // ========================================================================
    // 일반
    // ========================================================================
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // ========================================================================
    // 외부 에러 변환
    // ========================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ========================================================================
    // 기타
    // ========================================================================
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// 지원하지 않는 플랫폼 에러인지 확인
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Error::Unsupported { .. })
    }

    /// 사용자에게 보여줄 수 있는 에러인지 확인
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Error::Unsupported { .. } | Error::Bridge { .. } | Error::InvalidInput(_)
        )
    }

    /// Unsupported 에러 생성 헬퍼
    pub fn unsupported(operation: impl Into<String>, platform: impl Into<String>) -> Self {
        Error::Unsupported {
            operation: operation.into(),
            platform: platform.into(),
        }
    }

    /// Bridge 에러 생성 헬퍼
    pub fn bridge(method: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Bridge {
            method: method.into(),
            message: message.into(),
        }
    }
}

// ============================================================================
// From 구현 (추가 변환)
// ============================================================================

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Internal(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Internal(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_message_names_operation_and_platform() {
        let err = Error::unsupported("startScanning", "web");
        assert_eq!(err.to_string(), "startScanning is not supported on web");
        assert!(err.is_unsupported());
        assert!(err.is_user_facing());
    }

    #[test]
    fn test_internal_is_not_user_facing() {
        let err: Error = "boom".into();
        assert!(!err.is_user_facing());
        assert!(!err.is_unsupported());
    }
}
