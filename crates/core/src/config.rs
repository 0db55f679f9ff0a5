//! 설정 관리 — netpulse.toml 파싱 및 런타임 설정
//!
//! [`NetpulseConfig`]는 모든 모듈의 설정을 담는 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`NETPULSE_CAPTURE_TICK_INTERVAL_MS=250` 형식)
//! 3. 설정 파일 (`netpulse.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), netpulse_core::error::NetpulseError> {
//! use netpulse_core::config::NetpulseConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = NetpulseConfig::load("netpulse.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = NetpulseConfig::parse("[capture]\ntick_interval_ms = 250")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, NetpulseError};

/// Netpulse 통합 설정
///
/// `netpulse.toml` 파일의 최상위 구조를 나타냅니다.
/// 각 모듈은 자기 섹션만 읽어 사용합니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NetpulseConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// 캡처 파이프라인 설정
    #[serde(default)]
    pub capture: CaptureConfig,
    /// 위협 분석 설정
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

impl NetpulseConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    ///
    /// 설정 로딩 순서:
    /// 1. TOML 파일 파싱
    /// 2. 환경변수 오버라이드 적용
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, NetpulseError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, NetpulseError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                NetpulseError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                NetpulseError::Io(e)
            }
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, NetpulseError> {
        toml::from_str(toml_str).map_err(|e| {
            NetpulseError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `NETPULSE_{SECTION}_{FIELD}`
    /// 예: `NETPULSE_CAPTURE_BUFFER_CAPACITY=500`
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "NETPULSE_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "NETPULSE_GENERAL_LOG_FORMAT");
        override_string(&mut self.general.data_dir, "NETPULSE_GENERAL_DATA_DIR");

        // Capture
        override_u64(
            &mut self.capture.tick_interval_ms,
            "NETPULSE_CAPTURE_TICK_INTERVAL_MS",
        );
        override_usize(
            &mut self.capture.buffer_capacity,
            "NETPULSE_CAPTURE_BUFFER_CAPACITY",
        );
        override_usize(&mut self.capture.batch_min, "NETPULSE_CAPTURE_BATCH_MIN");
        override_usize(&mut self.capture.batch_max, "NETPULSE_CAPTURE_BATCH_MAX");

        // Analysis
        override_u64(
            &mut self.analysis.ddos_packet_threshold,
            "NETPULSE_ANALYSIS_DDOS_PACKET_THRESHOLD",
        );
        override_usize(
            &mut self.analysis.port_scan_threshold,
            "NETPULSE_ANALYSIS_PORT_SCAN_THRESHOLD",
        );
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), NetpulseError> {
        // log_level 검증
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_level".to_owned(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            }
            .into());
        }

        // log_format 검증
        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_format".to_owned(),
                reason: format!("must be one of: {}", valid_formats.join(", ")),
            }
            .into());
        }

        // 캡처 설정 검증
        if self.capture.tick_interval_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "capture.tick_interval_ms".to_owned(),
                reason: "must be greater than 0".to_owned(),
            }
            .into());
        }
        if self.capture.buffer_capacity == 0 {
            return Err(ConfigError::InvalidValue {
                field: "capture.buffer_capacity".to_owned(),
                reason: "must be greater than 0".to_owned(),
            }
            .into());
        }
        if self.capture.batch_min == 0 {
            return Err(ConfigError::InvalidValue {
                field: "capture.batch_min".to_owned(),
                reason: "must be greater than 0".to_owned(),
            }
            .into());
        }
        if self.capture.batch_min > self.capture.batch_max {
            return Err(ConfigError::InvalidValue {
                field: "capture.batch_max".to_owned(),
                reason: format!(
                    "must not be smaller than batch_min ({})",
                    self.capture.batch_min
                ),
            }
            .into());
        }

        // 분석 임계값 검증
        if self.analysis.ddos_packet_threshold == 0 {
            return Err(ConfigError::InvalidValue {
                field: "analysis.ddos_packet_threshold".to_owned(),
                reason: "must be greater than 0".to_owned(),
            }
            .into());
        }
        if self.analysis.port_scan_threshold == 0 {
            return Err(ConfigError::InvalidValue {
                field: "analysis.port_scan_threshold".to_owned(),
                reason: "must be greater than 0".to_owned(),
            }
            .into());
        }

        Ok(())
    }
}

// Default는 derive 매크로로 자동 생성 (각 필드가 Default를 구현하므로)

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
    /// 데이터 디렉토리 (내보내기 문서 저장 위치)
    pub data_dir: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "json".to_owned(),
            data_dir: "/var/lib/netpulse".to_owned(),
        }
    }
}

/// 캡처 파이프라인 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// 생성 틱 간격 (밀리초)
    pub tick_interval_ms: u64,
    /// 패킷 버퍼 최대 용량
    pub buffer_capacity: usize,
    /// 틱당 최소 생성 패킷 수
    pub batch_min: usize,
    /// 틱당 최대 생성 패킷 수
    pub batch_max: usize,
}

impl CaptureConfig {
    /// 틱 간격을 `Duration`으로 반환합니다.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 500,
            buffer_capacity: 1000,
            batch_min: 1,
            batch_max: 5,
        }
    }
}

/// 위협 분석 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// 단일 출발지 DDoS 의심 패킷 수 임계값 (초과 시 알림)
    pub ddos_packet_threshold: u64,
    /// 단일 출발지 포트 스캔 고유 포트 수 임계값 (초과 시 알림)
    pub port_scan_threshold: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            ddos_packet_threshold: 50,
            port_scan_threshold: 10,
        }
    }
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_usize(target: &mut usize, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<usize>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse usize from env var, ignoring"
            ),
        }
    }
}

fn override_u64(target: &mut u64, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<u64>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse u64 from env var, ignoring"
            ),
        }
    }
}
