//! Event Types - 브리지가 발행하는 이벤트 정의

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

// ============================================================================
// EventName
// ============================================================================

/// 이벤트 채널 이름
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventName {
    /// 바코드 스캔 결과
    #[serde(rename = "scan")]
    Scan,

    /// DataWedge API 결과 (디버깅용)
    #[serde(rename = "datawedgeResult")]
    DataWedgeResult,
}

impl EventName {
    pub const ALL: [EventName; 2] = [EventName::Scan, EventName::DataWedgeResult];

    /// 브리지에서 사용하는 채널 이름
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scan => "scan",
            Self::DataWedgeResult => "datawedgeResult",
        }
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "scan" => Ok(Self::Scan),
            "datawedgeResult" => Ok(Self::DataWedgeResult),
            other => Err(Error::UnknownEvent(other.to_string())),
        }
    }
}

// ============================================================================
// ScanEvent
// ============================================================================

/// 스캔 한 번의 디코딩 결과
///
/// `labelType`이 표준 필드입니다. 구버전 브리지가 보내는 `type` 키는
/// 읽을 때만 허용되며 직렬화 시에는 항상 `labelType`으로 나갑니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanEvent {
    /// 디코딩된 데이터
    pub data: String,

    /// 심볼로지 (예: "LABEL-TYPE-EAN13")
    #[serde(default, alias = "type", skip_serializing_if = "Option::is_none")]
    pub label_type: Option<String>,

    /// 입력 소스 (예: "scanner")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl ScanEvent {
    pub fn new(data: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            label_type: None,
            source: None,
        }
    }

    pub fn with_label_type(mut self, label_type: impl Into<String>) -> Self {
        self.label_type = Some(label_type.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

// ============================================================================
// DataWedgeResultEvent
// ============================================================================

/// DataWedge API 결과 브로드캐스트
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataWedgeResultEvent {
    /// 수신한 intent action
    pub action: String,

    /// 명령 식별자 (COMMAND_IDENTIFIER)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command_identifier: Option<String>,

    /// intent extras (JSON 변환본)
    #[serde(default)]
    pub extras: Value,
}

// ============================================================================
// PluginEvent
// ============================================================================

/// 리스너에게 전달되는 이벤트
#[derive(Debug, Clone, PartialEq)]
pub enum PluginEvent {
    Scan(ScanEvent),
    DataWedgeResult(DataWedgeResultEvent),
}

impl PluginEvent {
    pub fn name(&self) -> EventName {
        match self {
            Self::Scan(_) => EventName::Scan,
            Self::DataWedgeResult(_) => EventName::DataWedgeResult,
        }
    }

    /// 브리지 원본 payload 파싱
    pub fn from_payload(name: EventName, payload: Value) -> Result<Self> {
        let invalid = |e: serde_json::Error| Error::InvalidEvent {
            event: name.to_string(),
            message: e.to_string(),
        };

        match name {
            EventName::Scan => serde_json::from_value(payload)
                .map(Self::Scan)
                .map_err(invalid),
            EventName::DataWedgeResult => serde_json::from_value(payload)
                .map(Self::DataWedgeResult)
                .map_err(invalid),
        }
    }

    pub fn as_scan(&self) -> Option<&ScanEvent> {
        match self {
            Self::Scan(scan) => Some(scan),
            _ => None,
        }
    }
}
