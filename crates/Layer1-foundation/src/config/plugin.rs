//! Plugin Config - DataWedge 플러그인 설정
//!
//! 글로벌 → 프로젝트 → 환경변수 순으로 병합합니다.

use crate::storage::JsonStore;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 설정 파일명
pub const PLUGIN_CONFIG_FILE: &str = "datawedge.json";

/// 기본 DataWedge 프로필 이름
pub const DEFAULT_PROFILE_NAME: &str = "CAP_DW_PROFILE";

/// 기본 앱 패키지 이름 (intent action 기본값 계산용)
pub const DEFAULT_PACKAGE_NAME: &str = "com.example.datawedge";

/// Android 기본 intent category
pub const DEFAULT_INTENT_CATEGORY: &str = "android.intent.category.DEFAULT";

/// getAvailability 기본 타임아웃 (ms)
pub const DEFAULT_AVAILABILITY_TIMEOUT_MS: u64 = 1000;

// 환경변수 이름
pub const ENV_PROFILE_NAME: &str = "DATAWEDGE_PROFILE_NAME";
pub const ENV_INTENT_ACTION: &str = "DATAWEDGE_INTENT_ACTION";
pub const ENV_INTENT_CATEGORY: &str = "DATAWEDGE_INTENT_CATEGORY";
pub const ENV_PACKAGE_NAME: &str = "DATAWEDGE_PACKAGE_NAME";
pub const ENV_AVAILABILITY_TIMEOUT_MS: &str = "DATAWEDGE_AVAILABILITY_TIMEOUT_MS";

/// DataWedge 플러그인 설정
///
/// 모든 필드는 선택 사항이며, `effective_*` 메서드가 기본값을 적용합니다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginConfig {
    /// DataWedge 프로필 이름
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_name: Option<String>,

    /// 스캔 결과를 받을 intent action
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intent_action: Option<String>,

    /// 스캔 결과 intent category
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intent_category: Option<String>,

    /// 앱 패키지 이름
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_name: Option<String>,

    /// getAvailability 기본 타임아웃 (ms)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub availability_timeout_ms: Option<u64>,
}

impl PluginConfig {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Load
    // ========================================================================

    /// 글로벌 + 프로젝트 + 환경변수 병합 로드
    pub fn load() -> Result<Self> {
        let mut config = Self::new();

        // 1. 글로벌 설정
        if let Ok(global) = JsonStore::global() {
            if let Some(global_config) = global.load_optional::<PluginConfig>(PLUGIN_CONFIG_FILE)? {
                config.merge(global_config);
            }
        }

        // 2. 프로젝트 설정
        if let Ok(project) = JsonStore::current_project() {
            if let Some(project_config) =
                project.load_optional::<PluginConfig>(PLUGIN_CONFIG_FILE)?
            {
                config.merge(project_config);
            }
        }

        // 3. 환경변수 오버라이드
        config.apply_env_overrides(|key| std::env::var(key).ok())?;

        Ok(config)
    }

    /// 특정 저장소에서만 로드
    pub fn load_from(store: &JsonStore) -> Result<Self> {
        Ok(store
            .load_optional::<PluginConfig>(PLUGIN_CONFIG_FILE)?
            .unwrap_or_default())
    }

    /// 다른 설정 병합 (other 값이 우선)
    pub fn merge(&mut self, other: PluginConfig) {
        if other.profile_name.is_some() {
            self.profile_name = other.profile_name;
        }
        if other.intent_action.is_some() {
            self.intent_action = other.intent_action;
        }
        if other.intent_category.is_some() {
            self.intent_category = other.intent_category;
        }
        if other.package_name.is_some() {
            self.package_name = other.package_name;
        }
        if other.availability_timeout_ms.is_some() {
            self.availability_timeout_ms = other.availability_timeout_ms;
        }
    }

    /// 환경변수 적용 (lookup은 테스트에서 주입 가능)
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = non_empty(ENV_PROFILE_NAME) {
            self.profile_name = Some(v.trim().to_string());
        }
        if let Some(v) = non_empty(ENV_INTENT_ACTION) {
            self.intent_action = Some(v.trim().to_string());
        }
        if let Some(v) = non_empty(ENV_INTENT_CATEGORY) {
            self.intent_category = Some(v.trim().to_string());
        }
        if let Some(v) = non_empty(ENV_PACKAGE_NAME) {
            self.package_name = Some(v.trim().to_string());
        }
        if let Some(v) = non_empty(ENV_AVAILABILITY_TIMEOUT_MS) {
            let ms = v.trim().parse::<u64>().map_err(|e| {
                Error::Config(format!("{} must be a number of ms: {}", ENV_AVAILABILITY_TIMEOUT_MS, e))
            })?;
            self.availability_timeout_ms = Some(ms);
        }
        Ok(())
    }

    // ========================================================================
    // Builder
    // ========================================================================

    pub fn profile_name(mut self, name: impl Into<String>) -> Self {
        self.profile_name = Some(name.into());
        self
    }

    pub fn intent_action(mut self, action: impl Into<String>) -> Self {
        self.intent_action = Some(action.into());
        self
    }

    pub fn package_name(mut self, package: impl Into<String>) -> Self {
        self.package_name = Some(package.into());
        self
    }

    pub fn availability_timeout_ms(mut self, ms: u64) -> Self {
        self.availability_timeout_ms = Some(ms);
        self
    }

    // ========================================================================
    // effective 값들
    // ========================================================================

    pub fn effective_profile_name(&self) -> &str {
        self.profile_name.as_deref().unwrap_or(DEFAULT_PROFILE_NAME)
    }

    pub fn effective_package_name(&self) -> &str {
        self.package_name.as_deref().unwrap_or(DEFAULT_PACKAGE_NAME)
    }

    /// 설정이 없으면 `<package>.SCAN`
    pub fn effective_intent_action(&self) -> String {
        self.intent_action
            .clone()
            .unwrap_or_else(|| format!("{}.SCAN", self.effective_package_name()))
    }

    pub fn effective_intent_category(&self) -> &str {
        self.intent_category
            .as_deref()
            .unwrap_or(DEFAULT_INTENT_CATEGORY)
    }

    /// 0은 "설정 안 됨"으로 취급
    pub fn effective_availability_timeout(&self) -> Duration {
        let ms = self
            .availability_timeout_ms
            .filter(|ms| *ms > 0)
            .unwrap_or(DEFAULT_AVAILABILITY_TIMEOUT_MS);
        Duration::from_millis(ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_plugin_config_defaults() {
        let config = PluginConfig::default();
        assert_eq!(config.effective_profile_name(), "CAP_DW_PROFILE");
        assert_eq!(config.effective_intent_action(), "com.example.datawedge.SCAN");
        assert_eq!(
            config.effective_intent_category(),
            "android.intent.category.DEFAULT"
        );
        assert_eq!(
            config.effective_availability_timeout(),
            Duration::from_millis(1000)
        );
    }

    #[test]
    fn test_intent_action_follows_package() {
        let config = PluginConfig::new().package_name("com.acme.picker");
        assert_eq!(config.effective_intent_action(), "com.acme.picker.SCAN");

        let config = config.intent_action("com.acme.RESULT");
        assert_eq!(config.effective_intent_action(), "com.acme.RESULT");
    }

    #[test]
    fn test_zero_timeout_uses_default() {
        let config = PluginConfig::new().availability_timeout_ms(0);
        assert_eq!(
            config.effective_availability_timeout(),
            Duration::from_millis(DEFAULT_AVAILABILITY_TIMEOUT_MS)
        );
    }

    #[test]
    fn test_config_merge() {
        let mut base = PluginConfig::new()
            .profile_name("Base")
            .availability_timeout_ms(500);
        base.merge(PluginConfig::new().profile_name("Project"));

        assert_eq!(base.effective_profile_name(), "Project");
        assert_eq!(base.availability_timeout_ms, Some(500));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            (ENV_PROFILE_NAME, "  Warehouse "),
            (ENV_INTENT_ACTION, ""),
            (ENV_AVAILABILITY_TIMEOUT_MS, "250"),
        ]
        .into_iter()
        .collect();

        let mut config = PluginConfig::new().intent_action("com.acme.RESULT");
        config
            .apply_env_overrides(|k| env.get(k).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.effective_profile_name(), "Warehouse");
        // 빈 값은 무시
        assert_eq!(config.effective_intent_action(), "com.acme.RESULT");
        assert_eq!(config.availability_timeout_ms, Some(250));
    }

    #[test]
    fn test_env_invalid_timeout() {
        let mut config = PluginConfig::new();
        let result = config.apply_env_overrides(|k| {
            (k == ENV_AVAILABILITY_TIMEOUT_MS).then(|| "soon".to_string())
        });
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_load_from_store() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(PLUGIN_CONFIG_FILE),
            r#"{"profileName":"Demo","availabilityTimeoutMs":5000}"#,
        )
        .unwrap();

        let config = PluginConfig::load_from(&JsonStore::new(dir.path())).unwrap();
        assert_eq!(config.effective_profile_name(), "Demo");
        assert_eq!(
            config.effective_availability_timeout(),
            Duration::from_millis(5000)
        );
    }
}
