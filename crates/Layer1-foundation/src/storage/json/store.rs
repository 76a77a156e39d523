//! JSON 설정 파일 저장소 (읽기 전용)

use crate::{Error, Result};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

/// 설정 디렉토리 이름
pub const CONFIG_DIR_NAME: &str = "datawedge";

/// JSON 설정 저장소
#[derive(Debug, Clone)]
pub struct JsonStore {
    base_dir: PathBuf,
}

impl JsonStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// 글로벌 설정 (<config_dir>/datawedge/)
    pub fn global() -> Result<Self> {
        let dir = dirs::config_dir()
            .ok_or_else(|| Error::Config("Cannot find config directory".to_string()))?
            .join(CONFIG_DIR_NAME);
        Ok(Self::new(dir))
    }

    /// 프로젝트 설정 (.datawedge/)
    pub fn project(root: impl Into<PathBuf>) -> Self {
        Self::new(root.into().join(format!(".{}", CONFIG_DIR_NAME)))
    }

    /// 현재 디렉토리 프로젝트 설정
    pub fn current_project() -> Result<Self> {
        let cwd = std::env::current_dir()
            .map_err(|e| Error::Config(format!("Cannot get current directory: {}", e)))?;
        Ok(Self::project(cwd))
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn file_path(&self, filename: &str) -> PathBuf {
        self.base_dir.join(filename)
    }

    /// JSON 로드
    pub fn load<T: DeserializeOwned>(&self, filename: &str) -> Result<T> {
        let path = self.file_path(filename);
        let content = std::fs::read_to_string(&path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        serde_json::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))
    }

    /// JSON 로드 (기본값)
    pub fn load_or_default<T: DeserializeOwned + Default>(&self, filename: &str) -> T {
        self.load(filename).unwrap_or_default()
    }

    /// JSON 로드 (Optional)
    pub fn load_optional<T: DeserializeOwned>(&self, filename: &str) -> Result<Option<T>> {
        let path = self.file_path(filename);
        if !path.exists() {
            return Ok(None);
        }
        self.load(filename).map(Some)
    }

    /// 파일 존재 여부
    pub fn exists(&self, filename: &str) -> bool {
        self.file_path(filename).exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Default, Deserialize, PartialEq)]
    struct Sample {
        name: String,
    }

    #[test]
    fn test_project_store_uses_hidden_dir() {
        let store = JsonStore::project("/tmp/app");
        assert_eq!(store.base_dir(), Path::new("/tmp/app/.datawedge"));
    }

    #[test]
    fn test_load_optional_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path());
        let loaded: Option<Sample> = store.load_optional("missing.json").unwrap();
        assert!(loaded.is_none());
        assert!(!store.exists("missing.json"));
    }

    #[test]
    fn test_load_and_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("ok.json"), r#"{"name":"demo"}"#).unwrap();
        std::fs::write(dir.path().join("bad.json"), "{not json").unwrap();

        let store = JsonStore::new(dir.path());
        let ok: Sample = store.load("ok.json").unwrap();
        assert_eq!(ok.name, "demo");

        let bad = store.load::<Sample>("bad.json");
        assert!(matches!(bad, Err(Error::Config(_))));
        assert_eq!(store.load_or_default::<Sample>("bad.json"), Sample::default());
    }
}
