//! Event System - 스캔 이벤트 구독/전달
//!
//! 네이티브 브리지가 올려보내는 이벤트를 애플리케이션 콜백으로 전달합니다.
//!
//! ## 아키텍처
//!
//! ```text
//! ┌──────────────┐     ┌──────────────────────────────────────────┐
//! │ Native Bridge│ ──▶ │            ListenerRegistry               │
//! │ ("scan",     │     │  scan            ─▶ [cb1, cb2, ...]       │
//! │  "datawedge  │     │  datawedgeResult ─▶ [cb3, ...]            │
//! │   Result")   │     └──────────────────────────────────────────┘
//! └──────────────┘
//! ```
//!
//! ## 사용법
//!
//! ```ignore
//! use datawedge_foundation::event::{EventName, ListenerRegistry, PluginEvent};
//!
//! let registry = Arc::new(ListenerRegistry::new());
//! let handle = registry.add(EventName::Scan, Arc::new(|event: &PluginEvent| {
//!     if let Some(scan) = event.as_scan() {
//!         println!("Scanned: {}", scan.data);
//!     }
//! }));
//!
//! // 해제 (여러 번 호출해도 안전)
//! handle.remove();
//! ```

pub mod registry;
pub mod types;

// Re-exports
pub use registry::{Listener, ListenerHandle, ListenerId, ListenerRegistry};

pub use types::{DataWedgeResultEvent, EventName, PluginEvent, ScanEvent};
