#![doc = include_str!("../README.md")]
//!
//! # 아키텍처
//!
//! ```text
//! PacketBuffer.snapshot ──▶ FilterEngine.apply ──▶ ThreatEngine.analyze
//!                                  │
//!                                  └──▶ ExportDocument.render
//! ```
//!
//! 모든 연산은 입력 뷰에 대해 순수하며 버퍼를 변경하지 않습니다.

pub mod export;
pub mod filter;
pub mod threat;

// --- 주요 타입 re-export ---

// 필터
pub use filter::{FilterEngine, FilterSpec};

// 위협 탐지
pub use threat::{ClassificationRule, ReconRule, ThreatEngine, VolumetricRule};

// 내보내기
pub use export::ExportDocument;
