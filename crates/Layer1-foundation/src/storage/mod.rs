//! Storage module for the DataWedge binding
//!
//! - `json`: JSON - 설정 파일 로드 (읽기 전용)

mod json;

// JSON Storage (설정)
pub use json::JsonStore;
