//! Demo Session - 데모 화면 상태
//!
//! 플러그인 호출 결과를 사람이 읽을 수 있는 형태로 보관:
//! - 상태 메시지 (마지막 액션 결과)
//! - 로그 (최신순, 최대 100개)
//! - 스캔 기록 (최신순, 최대 50개)
//! - 스캐너 attach/detach 상태

use chrono::{DateTime, Local};
use datawedge_plugin::{
    AvailabilityOptions, AvailabilityResult, ConfigureProfileOptions, ConfigureResult, DataWedge,
    InitializeOptions, InitializeResult, PluginError, RemoveListener, ScanEvent,
};
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::VecDeque;
use std::future::Future;
use std::sync::Arc;
use tracing::debug;

/// 로그 최대 개수
pub const MAX_LOGS: usize = 100;

/// 스캔 기록 최대 개수
pub const MAX_SCANS: usize = 50;

/// 데모 기본 프로필
pub const DEMO_PROFILE: &str = "DataWedgeDemo";

/// 데모에서 사용하는 가용성 조회 타임아웃
pub const DEMO_AVAILABILITY_TIMEOUT_MS: u64 = 5000;

/// 수신된 스캔 한 건
#[derive(Debug, Clone, Serialize)]
pub struct ScanEntry {
    #[serde(flatten)]
    pub scan: ScanEvent,
    pub timestamp: DateTime<Local>,
}

/// 리스너 콜백과 공유하는 기록
#[derive(Debug, Default)]
struct History {
    logs: VecDeque<String>,
    scans: VecDeque<ScanEntry>,
}

impl History {
    fn log(&mut self, message: &str) {
        let timestamp = Local::now().format("%H:%M:%S");
        self.logs.push_front(format!("[{}] {}", timestamp, message));
        self.logs.truncate(MAX_LOGS);
    }

    fn record_scan(&mut self, scan: ScanEvent) {
        let label = scan.label_type.as_deref().unwrap_or("no type").to_string();
        let data = scan.data.clone();

        self.scans.push_front(ScanEntry {
            scan,
            timestamp: Local::now(),
        });
        self.scans.truncate(MAX_SCANS);
        self.log(&format!("Scan received ({}): {}", label, data));
    }
}

/// 데모 세션
pub struct DemoSession {
    datawedge: Arc<DataWedge>,
    profile_name: String,
    status_message: String,
    history: Arc<Mutex<History>>,
    active_action: Option<String>,
    init_result: Option<InitializeResult>,
    availability: Option<AvailabilityResult>,
    unsubscribe_scan: Option<RemoveListener>,
}

impl DemoSession {
    pub fn new(datawedge: Arc<DataWedge>) -> Self {
        Self {
            datawedge,
            profile_name: DEMO_PROFILE.to_string(),
            status_message: "Ready to call the DataWedge plugin.".to_string(),
            history: Arc::new(Mutex::new(History::default())),
            active_action: None,
            init_result: None,
            availability: None,
            unsubscribe_scan: None,
        }
    }

    pub fn with_profile(mut self, profile_name: impl Into<String>) -> Self {
        self.profile_name = profile_name.into();
        self
    }

    // ========================================================================
    // 상태 조회
    // ========================================================================

    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    pub fn profile_name(&self) -> &str {
        &self.profile_name
    }

    /// 로그 (최신순)
    pub fn logs(&self) -> Vec<String> {
        self.history.lock().logs.iter().cloned().collect()
    }

    /// 스캔 기록 (최신순)
    pub fn scans(&self) -> Vec<ScanEntry> {
        self.history.lock().scans.iter().cloned().collect()
    }

    pub fn is_busy(&self) -> bool {
        self.active_action.is_some()
    }

    pub fn is_initialized(&self) -> bool {
        self.init_result.is_some()
    }

    pub fn init_result(&self) -> Option<&InitializeResult> {
        self.init_result.as_ref()
    }

    pub fn availability(&self) -> Option<&AvailabilityResult> {
        self.availability.as_ref()
    }

    pub fn is_attached(&self) -> bool {
        self.unsubscribe_scan.is_some()
    }

    fn log(&self, message: &str) {
        self.history.lock().log(message);
    }

    // ========================================================================
    // 액션
    // ========================================================================

    /// 액션 하나를 실행하고 결과를 상태 메시지/로그에 남김
    ///
    /// 실패는 삼키고 `None`을 돌려줍니다. 데모 화면은 에러로 중단되지 않습니다.
    pub async fn run_action_with_result<T, Fut, F>(
        &mut self,
        action_name: &str,
        action: Fut,
        format_message: F,
    ) -> Option<T>
    where
        Fut: Future<Output = Result<T, PluginError>>,
        F: FnOnce(&T) -> String,
    {
        self.active_action = Some(action_name.to_string());
        let started_at = Local::now();
        debug!(action = action_name, "Running demo action");

        let outcome = match action.await {
            Ok(result) => {
                let detail = format_message(&result);
                self.status_message = format!(
                    "Action \"{}\" completed at {}. {}",
                    action_name,
                    started_at.format("%H:%M:%S"),
                    detail
                );
                self.log(&format!("✔ {} completed: {}", action_name, detail));
                Some(result)
            }
            Err(e) => {
                self.status_message = format!("Could not complete \"{}\": {}", action_name, e);
                self.log(&format!("✖ {}: {}", action_name, e));
                None
            }
        };

        self.active_action = None;
        outcome
    }

    pub async fn initialize(&mut self) -> Option<InitializeResult> {
        let datawedge = self.datawedge.clone();
        let options = InitializeOptions::new().profile_name(self.profile_name.clone());

        let result = self
            .run_action_with_result(
                "initialize",
                async move { datawedge.initialize(Some(options)).await },
                |result: &InitializeResult| {
                    format!(
                        "Profile: {}, Intent: {}",
                        result.profile_name, result.intent_action
                    )
                },
            )
            .await;

        if let Some(result) = &result {
            self.init_result = Some(result.clone());
        }
        result
    }

    pub async fn get_availability(&mut self) -> Option<AvailabilityResult> {
        let datawedge = self.datawedge.clone();
        let options = AvailabilityOptions::with_timeout_ms(DEMO_AVAILABILITY_TIMEOUT_MS);

        let result = self
            .run_action_with_result(
                "getAvailability",
                async move { datawedge.get_availability(Some(options)).await },
                format_availability,
            )
            .await;

        if let Some(result) = &result {
            self.availability = Some(result.clone());
        }
        result
    }

    pub async fn configure_profile(&mut self, intent_output: bool) -> Option<ConfigureResult> {
        let datawedge = self.datawedge.clone();
        let options = ConfigureProfileOptions::new(self.profile_name.clone())
            .barcode_enabled(true)
            .intent_enabled(intent_output)
            .keystroke_enabled(!intent_output);

        self.run_action_with_result(
            "configureProfile",
            async move { datawedge.configure_profile(options).await },
            |result: &ConfigureResult| {
                format!(
                    "Result: {}, Command: {}",
                    result.result.as_deref().unwrap_or("none"),
                    result.command_identifier.as_deref().unwrap_or("none")
                )
            },
        )
        .await
    }

    pub async fn start_scanning(&mut self) -> bool {
        let datawedge = self.datawedge.clone();
        self.run_action_with_result(
            "startScanning",
            async move { datawedge.start_scanning().await },
            |_| "Soft trigger pressed".to_string(),
        )
        .await
        .is_some()
    }

    pub async fn stop_scanning(&mut self) -> bool {
        let datawedge = self.datawedge.clone();
        self.run_action_with_result(
            "stopScanning",
            async move { datawedge.stop_scanning().await },
            |_| "Soft trigger released".to_string(),
        )
        .await
        .is_some()
    }

    // ========================================================================
    // 스캐너 attach/detach
    // ========================================================================

    /// 스캔 이벤트 구독 시작. 이미 구독 중이면 로그만 남김.
    pub async fn attach_scanner(&mut self) {
        if self.is_attached() {
            self.log("Already attached to the scanner.");
            return;
        }

        let history = self.history.clone();
        match self
            .datawedge
            .on_scan_result(move |scan| history.lock().record_scan(scan))
            .await
        {
            Ok(unsubscribe) => {
                self.unsubscribe_scan = Some(unsubscribe);
                self.log("Scanner attached. Ready to receive scans.");
            }
            Err(e) => {
                self.log(&format!("Failed to attach scanner: {}", e));
            }
        }
    }

    pub fn detach_scanner(&mut self) {
        match self.unsubscribe_scan.take() {
            Some(unsubscribe) => {
                unsubscribe.remove();
                self.log("Scanner detached. No more scans will be received.");
            }
            None => self.log("The scanner is not attached."),
        }
    }
}

impl Drop for DemoSession {
    fn drop(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe_scan.take() {
            unsubscribe.remove();
        }
    }
}

/// 가용성 결과 한 줄 요약
///
/// 예: `DataWedge: present (enabled), Scanner: present (WAITING)`
pub fn format_availability(result: &AvailabilityResult) -> String {
    let dw_status = if result.datawedge.present {
        "present"
    } else {
        "not present"
    };
    let dw_enabled = if result.datawedge.enabled == Some(true) {
        "enabled"
    } else {
        "disabled"
    };
    let scanner_status = if result.scanner.present == Some(true) {
        "present"
    } else {
        "not present"
    };
    let scanner_state = result
        .scanner
        .status
        .as_ref()
        .map(|s| s.to_string())
        .unwrap_or_else(|| "no status".to_string());

    format!(
        "DataWedge: {} ({}), Scanner: {} ({})",
        dw_status, dw_enabled, scanner_status, scanner_state
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use datawedge_plugin::{Bridge, SimulatedBridge};

    fn simulated() -> (Arc<SimulatedBridge>, DemoSession) {
        let sim = Arc::new(SimulatedBridge::default());
        let bridge: Arc<dyn Bridge> = sim.clone();
        (sim, DemoSession::new(Arc::new(DataWedge::native(bridge))))
    }

    #[test]
    fn test_format_availability() {
        let result: AvailabilityResult = serde_json::from_value(serde_json::json!({
            "datawedge": {"present": true, "enabled": true},
            "scanner": {"present": true, "status": "WAITING"},
        }))
        .unwrap();

        assert_eq!(
            format_availability(&result),
            "DataWedge: present (enabled), Scanner: present (WAITING)"
        );
        assert_eq!(
            format_availability(&AvailabilityResult::timed_out()),
            "DataWedge: not present (disabled), Scanner: not present (no status)"
        );
    }

    #[tokio::test]
    async fn test_initialize_records_result() {
        let (_sim, mut session) = simulated();

        let result = session.initialize().await.unwrap();
        assert_eq!(result.profile_name, DEMO_PROFILE);
        assert!(session.is_initialized());
        assert!(!session.is_busy());
        assert!(session
            .status_message()
            .contains("Profile: DataWedgeDemo, Intent: com.example.datawedge.SCAN"));
        assert!(session.logs()[0].contains("✔ initialize completed"));
    }

    #[tokio::test]
    async fn test_failed_action_is_logged() {
        let mut session = DemoSession::new(Arc::new(DataWedge::web()));

        assert!(session.initialize().await.is_none());
        assert!(!session.is_initialized());
        assert!(!session.is_busy());
        assert!(session
            .status_message()
            .starts_with("Could not complete \"initialize\""));
        assert!(session.logs()[0].contains("✖ initialize"));
    }

    #[tokio::test]
    async fn test_attach_detach_scanner() {
        let (sim, mut session) = simulated();

        session.attach_scanner().await;
        session.attach_scanner().await;
        assert!(session.is_attached());
        assert!(session.logs()[0].contains("Already attached"));

        sim.scan("4006381333931", Some("LABEL-TYPE-EAN13"));
        assert_eq!(session.scans().len(), 1);
        assert_eq!(session.scans()[0].scan.data, "4006381333931");

        session.detach_scanner();
        assert!(!session.is_attached());
        sim.scan("ignored", None);
        assert_eq!(session.scans().len(), 1);

        session.detach_scanner();
        assert!(session.logs()[0].contains("not attached"));
    }

    #[tokio::test]
    async fn test_history_is_bounded() {
        let (sim, mut session) = simulated();
        session.attach_scanner().await;

        for i in 0..(MAX_LOGS + 10) {
            sim.scan(&format!("CODE-{}", i), None);
        }

        assert_eq!(session.scans().len(), MAX_SCANS);
        assert_eq!(session.logs().len(), MAX_LOGS);
        // 최신순
        assert_eq!(session.scans()[0].scan.data, format!("CODE-{}", MAX_LOGS + 9));
    }
}
