//! Platform Detection - 실행 플랫폼 감지
//!
//! 네이티브 브리지를 쓸 수 있는 플랫폼인지 프로세스 시작 시 한 번 판단합니다.

use std::fmt;

/// 실행 플랫폼
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    /// DataWedge 서비스가 있을 수 있는 Android 기기
    Android,
    /// 그 외 (웹, 데스크톱) - 네이티브 브리지 없음
    Web,
}

impl Platform {
    pub fn detect() -> Self {
        if cfg!(target_os = "android") {
            Self::Android
        } else {
            Self::Web
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Android => "android",
            Self::Web => "web",
        }
    }

    /// 네이티브 브리지를 사용할 수 있는 플랫폼인지
    pub fn is_native(&self) -> bool {
        matches!(self, Self::Android)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
