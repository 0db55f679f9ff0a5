#![doc = include_str!("../README.md")]
//!
//! # 아키텍처
//!
//! ```text
//! PacketFactory ──batch──▶ PacketBuffer (FIFO, 용량 제한)
//!       │                        │
//!       └──동일 배치──▶ TrafficAggregator (누적 통계)
//!                                │
//!                     InterfaceRegistry.tick (합성 처리량)
//! ```
//!
//! 네 컴포넌트는 클럭(세션)이 틱마다 한 번씩, 같은 순서로 호출합니다.

pub mod buffer;
pub mod generator;
pub mod interface;
pub mod stats;

// --- 주요 타입 re-export ---

// 생성기
pub use generator::{PacketFactory, COMMON_PORTS, MAX_PACKET_SIZE, MIN_PACKET_SIZE};

// 버퍼
pub use buffer::PacketBuffer;

// 통계
pub use stats::TrafficAggregator;

// 인터페이스
pub use interface::InterfaceRegistry;
