//! # datawedge-foundation
//!
//! Foundation layer for the DataWedge binding:
//! - Error: 공통 에러 타입
//! - Config: 플러그인 설정 (글로벌 + 프로젝트 + 환경변수)
//! - Storage: JSON 설정 파일 로드
//! - Event: 스캔 이벤트 타입과 리스너 레지스트리
//! - Platform: 네이티브 브리지 사용 가능 여부 감지

pub mod config;
pub mod error;
pub mod event;
pub mod platform;
pub mod storage;

// ============================================================================
// Error
// ============================================================================
pub use error::{Error, Result};

// ============================================================================
// Config (설정)
// ============================================================================
pub use config::{
    PluginConfig, DEFAULT_AVAILABILITY_TIMEOUT_MS, DEFAULT_INTENT_CATEGORY,
    DEFAULT_PACKAGE_NAME, DEFAULT_PROFILE_NAME, PLUGIN_CONFIG_FILE,
};

// ============================================================================
// Storage (저장소)
// ============================================================================
pub use storage::JsonStore;

// ============================================================================
// Event (이벤트 시스템)
// ============================================================================
pub use event::{
    // Types
    DataWedgeResultEvent,
    EventName,
    // Registry
    Listener,
    ListenerHandle,
    ListenerId,
    ListenerRegistry,
    PluginEvent,
    ScanEvent,
};

// ============================================================================
// Platform (플랫폼 감지)
// ============================================================================
pub use platform::Platform;
