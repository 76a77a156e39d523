//! Request and response payloads exchanged with the bridge
//!
//! Field names are camelCase on the wire and optional fields are omitted when
//! absent, so a reply from the bridge passes through the typed layer unchanged.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

// ============================================================================
// initialize
// ============================================================================

/// Options for `initialize`; omitted fields fall back to the bridge defaults
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent_action: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent_category: Option<String>,
}

impl InitializeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn profile_name(mut self, name: impl Into<String>) -> Self {
        self.profile_name = Some(name.into());
        self
    }

    pub fn intent_action(mut self, action: impl Into<String>) -> Self {
        self.intent_action = Some(action.into());
        self
    }

    pub fn intent_category(mut self, category: impl Into<String>) -> Self {
        self.intent_category = Some(category.into());
        self
    }
}

/// Effective profile and intent action chosen by `initialize`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeResult {
    pub profile_name: String,
    pub intent_action: String,
}

// ============================================================================
// getAvailability
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

impl AvailabilityOptions {
    pub fn with_timeout_ms(timeout_ms: u64) -> Self {
        Self {
            timeout_ms: Some(timeout_ms),
        }
    }
}

/// Scanner state reported by DataWedge
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ScannerStatus {
    Waiting,
    Scanning,
    Disabled,
    Connected,
    Disconnected,
    /// Any status string this binding does not know about
    Other(String),
}

impl ScannerStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Waiting => "WAITING",
            Self::Scanning => "SCANNING",
            Self::Disabled => "DISABLED",
            Self::Connected => "CONNECTED",
            Self::Disconnected => "DISCONNECTED",
            Self::Other(raw) => raw,
        }
    }

    /// Whether the scanner can currently produce reads
    pub fn is_usable(&self) -> bool {
        matches!(self, Self::Waiting | Self::Scanning | Self::Connected)
    }
}

impl From<String> for ScannerStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "WAITING" => Self::Waiting,
            "SCANNING" => Self::Scanning,
            "DISABLED" => Self::Disabled,
            "CONNECTED" => Self::Connected,
            "DISCONNECTED" => Self::Disconnected,
            _ => Self::Other(raw),
        }
    }
}

impl From<ScannerStatus> for String {
    fn from(status: ScannerStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for ScannerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the enumerated scanner list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScannerInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connected: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
}

/// DataWedge service state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataWedgeAvailability {
    pub present: bool,

    /// `None` when the status string was neither ENABLED nor DISABLED
    #[serde(default)]
    pub enabled: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_raw: Option<Value>,
}

impl DataWedgeAvailability {
    /// Derive presence/enabled from the raw GET_DATAWEDGE_STATUS string
    pub fn from_status(status: Option<&str>) -> Self {
        let enabled = status.and_then(|s| {
            if s.eq_ignore_ascii_case("enabled") {
                Some(true)
            } else if s.eq_ignore_ascii_case("disabled") {
                Some(false)
            } else {
                None
            }
        });

        Self {
            present: status.is_some(),
            enabled,
            status_raw: status.map(|s| Value::String(s.to_string())),
        }
    }
}

/// Scanner hardware state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScannerAvailability {
    /// `None` when the scanner list was never received
    #[serde(default)]
    pub present: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ScannerStatus>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scanners: Option<Vec<ScannerInfo>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<Value>,
}

/// Snapshot of DataWedge and scanner state at the time of the query
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResult {
    pub datawedge: DataWedgeAvailability,

    pub scanner: ScannerAvailability,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<Value>,

    /// Set when the query ran out of time; fields hold whatever was known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timed_out: Option<bool>,
}

impl AvailabilityResult {
    /// Result reported when nothing answered before the deadline
    pub fn timed_out() -> Self {
        Self {
            timed_out: Some(true),
            ..Self::default()
        }
    }

    pub fn is_timed_out(&self) -> bool {
        self.timed_out.unwrap_or(false)
    }

    /// DataWedge is present, enabled and a usable scanner was reported
    pub fn is_ready_to_scan(&self) -> bool {
        self.datawedge.present
            && self.datawedge.enabled == Some(true)
            && self.scanner.present == Some(true)
            && self
                .scanner
                .status
                .as_ref()
                .map(ScannerStatus::is_usable)
                .unwrap_or(true)
    }
}

// ============================================================================
// isReady / hasScanner
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadyResult {
    pub ready: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScannerStatusResult {
    pub has_scanner: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ScannerStatus>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<Value>,
}

// ============================================================================
// configure / configureProfile
// ============================================================================

/// Create-or-update a named profile
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigureOptions {
    pub profile_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent_action: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent_category: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity_name: Option<String>,
}

impl ConfigureOptions {
    pub fn new(profile_name: impl Into<String>) -> Self {
        Self {
            profile_name: profile_name.into(),
            ..Self::default()
        }
    }

    pub fn intent_action(mut self, action: impl Into<String>) -> Self {
        self.intent_action = Some(action.into());
        self
    }

    pub fn package_name(mut self, package: impl Into<String>) -> Self {
        self.package_name = Some(package.into());
        self
    }

    pub fn activity_name(mut self, activity: impl Into<String>) -> Self {
        self.activity_name = Some(activity.into());
        self
    }
}

/// `configure` plus input/output plugin toggles
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigureProfileOptions {
    #[serde(flatten)]
    pub profile: ConfigureOptions,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub barcode_enabled: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keystroke_enabled: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent_enabled: Option<bool>,
}

impl ConfigureProfileOptions {
    pub fn new(profile_name: impl Into<String>) -> Self {
        Self {
            profile: ConfigureOptions::new(profile_name),
            ..Self::default()
        }
    }

    pub fn barcode_enabled(mut self, enabled: bool) -> Self {
        self.barcode_enabled = Some(enabled);
        self
    }

    pub fn keystroke_enabled(mut self, enabled: bool) -> Self {
        self.keystroke_enabled = Some(enabled);
        self
    }

    pub fn intent_enabled(mut self, enabled: bool) -> Self {
        self.intent_enabled = Some(enabled);
        self
    }
}

/// Outcome of a profile configuration command
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigureResult {
    pub success: bool,

    /// Raw RESULT string from DataWedge
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,

    /// Raw RESULT_INFO string from DataWedge
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_info: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command_identifier: Option<String>,
}

// ============================================================================
// __registerReceiver
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterReceiverOptions {
    /// Intent action the receiver should listen for
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scanner_status_strings() {
        let status: ScannerStatus = serde_json::from_value(json!("SCANNING")).unwrap();
        assert_eq!(status, ScannerStatus::Scanning);

        let other: ScannerStatus = serde_json::from_value(json!("IDLE")).unwrap();
        assert_eq!(other, ScannerStatus::Other("IDLE".to_string()));
        assert_eq!(serde_json::to_value(&other).unwrap(), json!("IDLE"));
    }

    #[test]
    fn test_datawedge_status_derivation() {
        let enabled = DataWedgeAvailability::from_status(Some("ENABLED"));
        assert!(enabled.present);
        assert_eq!(enabled.enabled, Some(true));

        let disabled = DataWedgeAvailability::from_status(Some("disabled"));
        assert_eq!(disabled.enabled, Some(false));

        let unknown = DataWedgeAvailability::from_status(Some("STARTING"));
        assert!(unknown.present);
        assert_eq!(unknown.enabled, None);

        let missing = DataWedgeAvailability::from_status(None);
        assert!(!missing.present);
        assert!(missing.status_raw.is_none());
    }

    #[test]
    fn test_availability_from_bridge_payload() {
        let result: AvailabilityResult = serde_json::from_value(json!({
            "datawedge": {"present": true, "enabled": true, "statusRaw": "ENABLED"},
            "scanner": {
                "present": true,
                "status": "WAITING",
                "scanners": [{"name": "2D Barcode Imager", "connected": true, "index": 0, "identifier": "INTERNAL_IMAGER"}]
            },
            "raw": {"dwStatus": "ENABLED", "scannerStatus": "WAITING"}
        }))
        .unwrap();

        assert!(!result.is_timed_out());
        assert!(result.is_ready_to_scan());
        assert_eq!(result.scanner.scanners.as_ref().map(Vec::len), Some(1));
    }

    #[test]
    fn test_timed_out_result_shape() {
        let value = serde_json::to_value(AvailabilityResult::timed_out()).unwrap();
        assert_eq!(
            value,
            json!({
                "datawedge": {"present": false, "enabled": null},
                "scanner": {"present": null},
                "timedOut": true
            })
        );
    }

    #[test]
    fn test_configure_profile_options_flatten() {
        let options = ConfigureProfileOptions::new("Demo")
            .barcode_enabled(true)
            .keystroke_enabled(false);

        assert_eq!(
            serde_json::to_value(&options).unwrap(),
            json!({"profileName": "Demo", "barcodeEnabled": true, "keystrokeEnabled": false})
        );
    }

    #[test]
    fn test_initialize_options_omit_absent_fields() {
        let options = InitializeOptions::new().profile_name("Demo");
        assert_eq!(
            serde_json::to_value(&options).unwrap(),
            json!({"profileName": "Demo"})
        );
    }
}
