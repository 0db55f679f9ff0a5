//! 통계 집계 — 틱 단위 누적 카운터 관리
//!
//! [`TrafficAggregator`]는 새로 추가된 배치(버퍼 전체가 아님)를 입력으로
//! 받아 [`RunningStats`]를 갱신합니다. 누적 카운터는 버퍼 축출과 무관하게
//! 세션 전체 도착량을 추적합니다.
//!
//! # 데이터 흐름
//! ```text
//! PacketFactory ──batch──▶ PacketBuffer.append
//!                    └────▶ TrafficAggregator.on_batch (동일 배치, 틱당 1회)
//! ```

use metrics::{counter, gauge};
use rand::Rng;

use netpulse_core::metrics as m;
use netpulse_core::types::{Packet, RunningStats};

/// 활성 연결 합성 게이지 하한
const MIN_ACTIVE_CONNECTIONS: u64 = 10;
/// 활성 연결 합성 게이지 상한
const MAX_ACTIVE_CONNECTIONS: u64 = 59;

/// 트래픽 통계 집계기
///
/// 틱마다 [`on_batch`](Self::on_batch)를 정확히 한 번 호출해야 하며,
/// 버퍼에 추가한 것과 같은 배치를 전달해야 두 상태가 일관성을 유지합니다.
#[derive(Debug, Default, Clone)]
pub struct TrafficAggregator {
    stats: RunningStats,
}

impl TrafficAggregator {
    /// 제로 초기화된 집계기를 생성합니다.
    pub fn new() -> Self {
        Self {
            stats: RunningStats::default(),
        }
    }

    /// 새로 추가된 배치로 통계를 갱신하고 갱신된 값을 반환합니다.
    ///
    /// - `total_packets`, `total_bytes`, `threat_count`: 누적 증가
    /// - `current_rate`: 배치 길이로 설정
    /// - `active_connections`: 새 합성 게이지 값으로 재설정
    pub fn on_batch(&mut self, batch: &[Packet]) -> RunningStats {
        let batch_len = batch.len() as u64;
        let batch_bytes: u64 = batch.iter().map(|p| u64::from(p.size)).sum();
        let batch_threats = batch
            .iter()
            .filter(|p| p.threat_level.is_elevated())
            .count() as u64;

        self.stats.total_packets += batch_len;
        self.stats.current_rate = batch_len;
        self.stats.total_bytes += batch_bytes;
        self.stats.threat_count += batch_threats;
        self.stats.active_connections =
            rand::thread_rng().gen_range(MIN_ACTIVE_CONNECTIONS..=MAX_ACTIVE_CONNECTIONS);

        counter!(m::TRAFFIC_PACKETS_TOTAL).increment(batch_len);
        counter!(m::TRAFFIC_BYTES_TOTAL).increment(batch_bytes);
        counter!(m::TRAFFIC_THREATS_TOTAL).increment(batch_threats);
        for packet in batch {
            counter!(
                m::TRAFFIC_PROTOCOL_PACKETS_TOTAL,
                m::LABEL_PROTOCOL => packet.protocol.to_string()
            )
            .increment(1);
        }
        #[allow(clippy::cast_precision_loss)]
        gauge!(m::TRAFFIC_CURRENT_RATE).set(batch_len as f64);

        self.stats
    }

    /// 현재 통계를 반환합니다.
    pub fn stats(&self) -> RunningStats {
        self.stats
    }

    /// 통계를 초기화합니다.
    pub fn reset(&mut self) {
        self.stats.reset();
    }
}
