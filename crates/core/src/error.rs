//! 에러 타입 — 도메인별 에러 정의
//!
//! 파이프라인은 외부 I/O나 신뢰할 수 없는 입력 파싱이 거의 없으므로
//! 에러 분류가 좁습니다. 잘못된 필터 입력, 알 수 없는 인터페이스 ID,
//! 빈 뷰 내보내기는 관대 정책에 따라 에러가 아닙니다.

/// Netpulse 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum NetpulseError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 내보내기 에러
    #[error("export error: {0}")]
    Export(#[from] ExportError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 내보내기 에러
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// 뷰 직렬화 실패
    #[error("failed to serialize view: {reason}")]
    Serialize { reason: String },

    /// 내보내기 문서 파싱 실패
    #[error("failed to parse export document: {reason}")]
    Parse { reason: String },
}
