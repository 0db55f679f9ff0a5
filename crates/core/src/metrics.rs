//! 메트릭 상수 정의
//!
//! 모든 메트릭의 이름을 중앙에서 정의합니다.
//! 각 모듈은 이 상수를 사용하여 `metrics::counter!()`, `metrics::gauge!()`
//! 매크로를 호출합니다. 레코더를 설치하지 않으면 호출은 no-op이 됩니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `netpulse_`
//! - 모듈명: `traffic_`, `analysis_`
//! - 접미어: `_total` (counter), 없음 (gauge)
//!
//! # 사용 예시
//!
//! ```ignore
//! use metrics::counter;
//!
//! counter!(netpulse_core::metrics::TRAFFIC_PACKETS_TOTAL).increment(batch.len() as u64);
//! ```

// ─── 레이블 키 상수 ────────────────────────────────────────────────

/// 프로토콜 레이블 키 (TCP, UDP, ...)
pub const LABEL_PROTOCOL: &str = "protocol";

/// 심각도 레이블 키 (low, medium, high, critical)
pub const LABEL_SEVERITY: &str = "severity";

// ─── Traffic Engine 메트릭 ─────────────────────────────────────────

/// Traffic: 생성된 전체 패킷 수 (counter)
pub const TRAFFIC_PACKETS_TOTAL: &str = "netpulse_traffic_packets_total";

/// Traffic: 생성된 전체 바이트 수 (counter)
pub const TRAFFIC_BYTES_TOTAL: &str = "netpulse_traffic_bytes_total";

/// Traffic: high/critical 패킷 수 (counter)
pub const TRAFFIC_THREATS_TOTAL: &str = "netpulse_traffic_threats_total";

/// Traffic: 프로토콜별 패킷 수 (counter, label: protocol)
pub const TRAFFIC_PROTOCOL_PACKETS_TOTAL: &str = "netpulse_traffic_protocol_packets_total";

/// Traffic: 최근 틱 패킷 수 (gauge)
pub const TRAFFIC_CURRENT_RATE: &str = "netpulse_traffic_current_rate";

/// Traffic: 버퍼에서 축출된 패킷 수 (counter)
pub const TRAFFIC_EVICTED_TOTAL: &str = "netpulse_traffic_evicted_total";

// ─── Analysis 메트릭 ───────────────────────────────────────────────

/// Analysis: 생성된 알림 수 (counter, label: severity)
pub const ANALYSIS_ALERTS_TOTAL: &str = "netpulse_analysis_alerts_total";
