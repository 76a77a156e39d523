//! Simulated DataWedge device
//!
//! Emulates the native side closely enough to drive the demo and the tests:
//! initialize defaults, availability probing, scanner state transitions,
//! profile configuration results and scan broadcasts.

use crate::{
    bridge::{Bridge, BridgeMethod, EventEmitter},
    error::PluginError,
    types::{
        AvailabilityResult, ConfigureProfileOptions, DataWedgeAvailability, InitializeOptions,
        RegisterReceiverOptions, ScannerAvailability, ScannerInfo, ScannerStatus,
    },
};
use async_trait::async_trait;
use datawedge_foundation::{EventName, PluginConfig};
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{debug, trace};

/// Action DataWedge uses for API result broadcasts
pub const RESULT_ACTION: &str = "com.symbol.datawedge.api.RESULT_ACTION";

/// SET_CONFIG command extra
pub const SET_CONFIG_COMMAND: &str = "com.symbol.datawedge.api.SET_CONFIG";

const STATUS_ENABLED: &str = "ENABLED";
const STATUS_DISABLED: &str = "DISABLED";
const DEFAULT_LABEL_TYPE: &str = "LABEL-TYPE-CODE128";

struct DeviceState {
    profile_name: String,
    intent_action: String,
    intent_category: String,
    /// GET_DATAWEDGE_STATUS reply; `None` when DataWedge is not installed
    datawedge_status: Option<String>,
    scanners: Vec<ScannerInfo>,
    scanner_status: ScannerStatus,
    responsive: bool,
    initialized: bool,
}

impl DeviceState {
    /// Status strings compare case-insensitively, like the availability report
    fn is_enabled(&self) -> bool {
        self.datawedge_status
            .as_deref()
            .is_some_and(|s| s.eq_ignore_ascii_case(STATUS_ENABLED))
    }
}

/// In-process stand-in for the native DataWedge bridge
pub struct SimulatedBridge {
    state: Mutex<DeviceState>,
    emitter: Mutex<Option<EventEmitter>>,
    calls: Mutex<Vec<(BridgeMethod, Value)>>,
    channels: Mutex<Vec<EventName>>,
}

impl SimulatedBridge {
    /// Zebra device with DataWedge enabled and one internal imager
    pub fn new(config: &PluginConfig) -> Self {
        Self {
            state: Mutex::new(DeviceState {
                profile_name: config.effective_profile_name().to_string(),
                intent_action: config.effective_intent_action(),
                intent_category: config.effective_intent_category().to_string(),
                datawedge_status: Some(STATUS_ENABLED.to_string()),
                scanners: vec![ScannerInfo {
                    name: Some("2D Barcode Imager".to_string()),
                    connected: Some(true),
                    index: Some(0),
                    identifier: Some("INTERNAL_IMAGER".to_string()),
                }],
                scanner_status: ScannerStatus::Waiting,
                responsive: true,
                initialized: false,
            }),
            emitter: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
            channels: Mutex::new(Vec::new()),
        }
    }

    /// Android device without DataWedge; status queries never answer
    pub fn without_datawedge(self) -> Self {
        {
            let mut state = self.state.lock();
            state.datawedge_status = None;
            state.scanners.clear();
        }
        self
    }

    /// Device whose availability query never answers
    pub fn unresponsive(self) -> Self {
        self.state.lock().responsive = false;
        self
    }

    pub fn with_scanners(self, scanners: Vec<ScannerInfo>) -> Self {
        self.state.lock().scanners = scanners;
        self
    }

    pub fn with_datawedge_status(self, status: impl Into<String>) -> Self {
        self.state.lock().datawedge_status = Some(status.into());
        self
    }

    // ========================================================================
    // Inspection
    // ========================================================================

    /// Every bridge call received so far
    pub fn calls(&self) -> Vec<(BridgeMethod, Value)> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self, method: BridgeMethod) -> usize {
        self.calls.lock().iter().filter(|(m, _)| *m == method).count()
    }

    /// Native channels opened so far, in order
    pub fn opened_channels(&self) -> Vec<EventName> {
        self.channels.lock().clone()
    }

    pub fn profile_name(&self) -> String {
        self.state.lock().profile_name.clone()
    }

    pub fn intent_action(&self) -> String {
        self.state.lock().intent_action.clone()
    }

    pub fn intent_category(&self) -> String {
        self.state.lock().intent_category.clone()
    }

    pub fn scanner_status(&self) -> ScannerStatus {
        self.state.lock().scanner_status.clone()
    }

    // ========================================================================
    // Event injection
    // ========================================================================

    /// Simulate a physical scan
    ///
    /// Returns the number of listeners reached; 0 when the scan channel was
    /// never opened or the scanner cannot read.
    pub fn scan(&self, data: &str, label_type: Option<&str>) -> usize {
        {
            let state = self.state.lock();
            if !state.is_enabled() || state.scanner_status == ScannerStatus::Disabled {
                debug!(data, "Scan ignored, scanner unavailable");
                return 0;
            }
        }

        self.emit_raw(
            EventName::Scan.as_str(),
            json!({
                "data": data,
                "labelType": label_type.unwrap_or(DEFAULT_LABEL_TYPE),
                "source": "scanner",
            }),
        )
    }

    /// Push a raw payload through the emitter, as the native receiver would
    pub fn emit_raw(&self, event_name: &str, payload: Value) -> usize {
        let opened = event_name
            .parse::<EventName>()
            .map(|name| self.channels.lock().contains(&name))
            .unwrap_or(true);
        if !opened {
            trace!(event = event_name, "Channel not opened, event not forwarded");
            return 0;
        }

        let emitter = self.emitter.lock().clone();
        match emitter {
            Some(emitter) => emitter.notify(event_name, payload),
            None => 0,
        }
    }

    // ========================================================================
    // Method handlers
    // ========================================================================

    fn parse<T: DeserializeOwned>(method: BridgeMethod, options: Value) -> Result<T, PluginError> {
        serde_json::from_value(options)
            .map_err(|e| PluginError::bridge(method.as_str(), format!("Invalid options: {}", e)))
    }

    fn require_enabled(state: &DeviceState, method: BridgeMethod) -> Result<(), PluginError> {
        match state.datawedge_status {
            Some(_) if state.is_enabled() => Ok(()),
            Some(_) => Err(PluginError::bridge(method.as_str(), "DataWedge is disabled")),
            None => Err(PluginError::bridge(method.as_str(), "DataWedge is not installed")),
        }
    }

    fn initialize(&self, options: Value) -> Result<(Value, Option<Value>), PluginError> {
        let options: InitializeOptions = Self::parse(BridgeMethod::Initialize, options)?;
        let mut state = self.state.lock();

        let trimmed = |v: Option<String>| {
            v.map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };
        if let Some(name) = trimmed(options.profile_name) {
            state.profile_name = name;
        }
        if let Some(action) = trimmed(options.intent_action) {
            state.intent_action = action;
        }
        if let Some(category) = trimmed(options.intent_category) {
            state.intent_category = category;
        }
        state.initialized = true;

        let event = Self::set_config_event(&state.profile_name, json!({}));
        Ok((
            json!({
                "profileName": state.profile_name,
                "intentAction": state.intent_action,
            }),
            Some(event),
        ))
    }

    fn availability(state: &DeviceState) -> Value {
        let status = state.datawedge_status.as_deref();
        let result = AvailabilityResult {
            datawedge: DataWedgeAvailability::from_status(status),
            scanner: ScannerAvailability {
                present: Some(!state.scanners.is_empty()),
                status: Some(state.scanner_status.clone()),
                scanners: Some(state.scanners.clone()),
                raw: None,
            },
            raw: Some(json!({
                "dwStatus": status,
                "scannerStatus": state.scanner_status.as_str(),
            })),
            timed_out: None,
        };

        serde_json::to_value(result).unwrap_or(Value::Null)
    }

    fn configure(
        &self,
        method: BridgeMethod,
        options: Value,
    ) -> Result<(Value, Option<Value>), PluginError> {
        let options: ConfigureProfileOptions = Self::parse(method, options)?;
        let profile = options.profile.profile_name.trim().to_string();
        if profile.is_empty() {
            return Err(PluginError::bridge(method.as_str(), "Invalid profile name"));
        }

        let mut state = self.state.lock();
        Self::require_enabled(&state, method)?;

        if let Some(action) = options.profile.intent_action.as_deref() {
            if !action.trim().is_empty() && profile == state.profile_name {
                state.intent_action = action.trim().to_string();
            }
        }

        let toggles = json!({
            "barcodeEnabled": options.barcode_enabled,
            "keystrokeEnabled": options.keystroke_enabled,
            "intentEnabled": options.intent_enabled,
        });
        let command_identifier = format!("SET_CONFIG_{}", profile);

        Ok((
            json!({
                "success": true,
                "result": "SUCCESS",
                "commandIdentifier": command_identifier,
            }),
            Some(Self::set_config_event(&profile, toggles)),
        ))
    }

    fn set_config_event(profile: &str, params: Value) -> Value {
        json!({
            "action": RESULT_ACTION,
            "commandIdentifier": format!("SET_CONFIG_{}", profile),
            "extras": {
                "COMMAND": SET_CONFIG_COMMAND,
                "RESULT": "SUCCESS",
                "PROFILE_NAME": profile,
                "PARAMS": params,
            },
        })
    }

    fn handle(&self, method: BridgeMethod, options: Value) -> Result<(Value, Option<Value>), PluginError> {
        match method {
            BridgeMethod::Initialize => self.initialize(options),
            BridgeMethod::Configure | BridgeMethod::ConfigureProfile => {
                self.configure(method, options)
            }
            BridgeMethod::RegisterReceiver => {
                let options: RegisterReceiverOptions = Self::parse(method, options)?;
                if let Some(intent) = options.intent.filter(|i| !i.trim().is_empty()) {
                    self.state.lock().intent_action = intent.trim().to_string();
                }
                Ok((Value::Null, None))
            }
            _ => {
                let mut state = self.state.lock();
                let reply = match method {
                    BridgeMethod::Enable | BridgeMethod::Disable => {
                        if state.datawedge_status.is_none() {
                            return Err(PluginError::bridge(
                                method.as_str(),
                                "DataWedge is not installed",
                            ));
                        }
                        let status = if method == BridgeMethod::Enable {
                            STATUS_ENABLED
                        } else {
                            STATUS_DISABLED
                        };
                        state.datawedge_status = Some(status.to_string());
                        Value::Null
                    }
                    BridgeMethod::EnableScanner => {
                        Self::require_enabled(&state, method)?;
                        state.scanner_status = ScannerStatus::Waiting;
                        Value::Null
                    }
                    BridgeMethod::DisableScanner => {
                        Self::require_enabled(&state, method)?;
                        state.scanner_status = ScannerStatus::Disabled;
                        Value::Null
                    }
                    BridgeMethod::StartScanning => {
                        Self::require_enabled(&state, method)?;
                        if state.scanners.is_empty() {
                            return Err(PluginError::bridge(method.as_str(), "No scanner present"));
                        }
                        if state.scanner_status == ScannerStatus::Disabled {
                            return Err(PluginError::bridge(method.as_str(), "Scanner is disabled"));
                        }
                        state.scanner_status = ScannerStatus::Scanning;
                        Value::Null
                    }
                    BridgeMethod::StopScanning => {
                        Self::require_enabled(&state, method)?;
                        if state.scanner_status == ScannerStatus::Scanning {
                            state.scanner_status = ScannerStatus::Waiting;
                        }
                        Value::Null
                    }
                    BridgeMethod::IsReady => json!({
                        "ready": state.is_enabled(),
                        "status": state.datawedge_status,
                        "raw": {"initialized": state.initialized},
                    }),
                    BridgeMethod::HasScanner => json!({
                        "hasScanner": !state.scanners.is_empty(),
                        "status": state.scanner_status.as_str(),
                        "raw": {"scannerCount": state.scanners.len()},
                    }),
                    BridgeMethod::GetAvailability => Self::availability(&state),
                    BridgeMethod::Initialize
                    | BridgeMethod::Configure
                    | BridgeMethod::ConfigureProfile
                    | BridgeMethod::RegisterReceiver => Value::Null,
                };
                Ok((reply, None))
            }
        }
    }
}

impl Default for SimulatedBridge {
    fn default() -> Self {
        Self::new(&PluginConfig::default())
    }
}

#[async_trait]
impl Bridge for SimulatedBridge {
    fn name(&self) -> &str {
        "simulated"
    }

    async fn call(&self, method: BridgeMethod, options: Value) -> Result<Value, PluginError> {
        self.calls.lock().push((method, options.clone()));
        trace!(method = %method, "Simulated bridge call");

        if method == BridgeMethod::GetAvailability {
            let answers = {
                let state = self.state.lock();
                state.responsive && state.datawedge_status.is_some()
            };
            if !answers {
                debug!("Simulated device does not answer availability query");
                return std::future::pending().await;
            }
        }

        let (reply, event) = self.handle(method, options)?;
        if let Some(event) = event {
            self.emit_raw(EventName::DataWedgeResult.as_str(), event);
        }
        Ok(reply)
    }

    async fn open_channel(&self, event: EventName) -> Result<(), PluginError> {
        self.channels.lock().push(event);
        Ok(())
    }

    fn attach(&self, emitter: EventEmitter) {
        *self.emitter.lock() = Some(emitter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use datawedge_foundation::{ListenerRegistry, PluginEvent};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_initialize_applies_defaults() {
        let bridge = SimulatedBridge::new(&PluginConfig::new().package_name("com.acme.picker"));

        let reply = bridge
            .call(BridgeMethod::Initialize, json!({"profileName": "   "}))
            .await
            .unwrap();

        assert_eq!(
            reply,
            json!({"profileName": "CAP_DW_PROFILE", "intentAction": "com.acme.picker.SCAN"})
        );
        assert_eq!(bridge.intent_category(), "android.intent.category.DEFAULT");
    }

    #[tokio::test]
    async fn test_initialize_is_idempotent() {
        let bridge = SimulatedBridge::default();
        let options = json!({"profileName": " Demo ", "intentAction": "com.example.RESULT"});

        let first = bridge
            .call(BridgeMethod::Initialize, options.clone())
            .await
            .unwrap();
        let second = bridge.call(BridgeMethod::Initialize, options).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(bridge.profile_name(), "Demo");
    }

    #[tokio::test]
    async fn test_scanner_transitions() {
        let bridge = SimulatedBridge::default();

        bridge.call(BridgeMethod::StartScanning, json!({})).await.unwrap();
        assert_eq!(bridge.scanner_status(), ScannerStatus::Scanning);

        bridge.call(BridgeMethod::StopScanning, json!({})).await.unwrap();
        assert_eq!(bridge.scanner_status(), ScannerStatus::Waiting);

        bridge.call(BridgeMethod::DisableScanner, json!({})).await.unwrap();
        let err = bridge
            .call(BridgeMethod::StartScanning, json!({}))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Scanner is disabled");
    }

    #[tokio::test]
    async fn test_disabled_datawedge_rejects_scanner_control() {
        let bridge = SimulatedBridge::default();
        bridge.call(BridgeMethod::Disable, json!({})).await.unwrap();

        let err = bridge
            .call(BridgeMethod::EnableScanner, json!({}))
            .await
            .unwrap_err();
        assert_eq!(err, PluginError::bridge("enableScanner", "DataWedge is disabled"));
    }

    #[tokio::test]
    async fn test_lowercase_enabled_status_allows_control() {
        let registry = Arc::new(ListenerRegistry::new());
        let bridge = SimulatedBridge::default().with_datawedge_status("enabled");
        bridge.attach(EventEmitter::new(registry.clone()));

        let reply = bridge
            .call(BridgeMethod::GetAvailability, json!({}))
            .await
            .unwrap();
        assert_eq!(reply["datawedge"]["enabled"], true);

        let ready = bridge.call(BridgeMethod::IsReady, json!({})).await.unwrap();
        assert_eq!(ready["ready"], true);

        bridge
            .call(BridgeMethod::Configure, json!({"profileName": "Demo"}))
            .await
            .unwrap();
        bridge.call(BridgeMethod::StartScanning, json!({})).await.unwrap();
        assert_eq!(bridge.scanner_status(), ScannerStatus::Scanning);

        bridge.open_channel(EventName::Scan).await.unwrap();
        let _handle = registry.add(EventName::Scan, Arc::new(|_event: &PluginEvent| {}));
        assert_eq!(bridge.scan("123", None), 1);
    }

    #[tokio::test]
    async fn test_configure_rejects_blank_profile() {
        let bridge = SimulatedBridge::default();
        let err = bridge
            .call(BridgeMethod::Configure, json!({"profileName": " "}))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid profile name");
    }

    #[tokio::test]
    async fn test_scan_requires_open_channel() {
        let registry = Arc::new(ListenerRegistry::new());
        let bridge = SimulatedBridge::default();
        bridge.attach(EventEmitter::new(registry));

        assert_eq!(bridge.scan("123", None), 0);

        bridge.open_channel(EventName::Scan).await.unwrap();
        // Channel is open but nobody listens yet
        assert_eq!(bridge.scan("123", None), 0);
        assert_eq!(bridge.opened_channels(), vec![EventName::Scan]);
    }

    #[tokio::test]
    async fn test_availability_reply_shape() {
        let bridge = SimulatedBridge::default().with_datawedge_status("disabled");
        let reply = bridge
            .call(BridgeMethod::GetAvailability, json!({"timeoutMs": 100}))
            .await
            .unwrap();

        let result: AvailabilityResult = serde_json::from_value(reply).unwrap();
        assert!(result.datawedge.present);
        assert_eq!(result.datawedge.enabled, Some(false));
        assert_eq!(result.scanner.present, Some(true));
        assert!(!result.is_timed_out());
    }
}
