#![doc = include_str!("../README.md")]

pub mod analyzer;
pub mod config;
pub mod error;
pub mod metrics;
pub mod types;

// --- 주요 타입 re-export ---
// 각 모듈의 핵심 타입을 크레이트 루트에서 바로 사용할 수 있도록 합니다.

// 에러
pub use error::{ConfigError, ExportError, NetpulseError};

// 설정
pub use config::NetpulseConfig;

// 분석 trait
pub use analyzer::ThreatRule;

// 도메인 타입
pub use types::{
    InterfaceKind, InterfaceRecord, Packet, Protocol, RunningStats, Severity, Snapshot, TcpFlag,
    ThreatAlert, ThreatKind,
};
