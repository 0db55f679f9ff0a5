//! 패킷 버퍼링 -- 용량 제한 FIFO 버퍼
//!
//! [`PacketBuffer`]는 최근 패킷을 인메모리에 보관하는 단일 진실 공급원입니다.
//!
//! # 축출 정책
//! 배치 추가 후 용량을 초과하면 가장 오래된 패킷부터 제거하여
//! 버퍼가 항상 가장 최근 N개의 패킷을 유지하도록 합니다.

use std::collections::VecDeque;

use metrics::counter;

use netpulse_core::metrics as m;
use netpulse_core::types::Packet;

/// 인메모리 패킷 버퍼
///
/// 삽입 순서를 유지하며, 변경 연산은 배치 추가와 전체 비우기 둘뿐입니다.
/// 읽기는 [`snapshot`](Self::snapshot)으로 복사본을 얻으므로 호출자가
/// 변경 중인 상태를 관찰할 수 없습니다.
pub struct PacketBuffer {
    /// 버퍼 내부 저장소
    buffer: VecDeque<Packet>,
    /// 최대 용량
    capacity: usize,
    /// 축출된 패킷 카운터 (통계용)
    evicted_count: u64,
    /// 총 유입 패킷 카운터
    total_received: u64,
}

impl PacketBuffer {
    /// 새 패킷 버퍼를 생성합니다.
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: VecDeque::with_capacity(capacity.min(10_000)),
            capacity,
            evicted_count: 0,
            total_received: 0,
        }
    }

    /// 배치를 순서대로 추가한 뒤 용량을 초과한 만큼 앞에서 축출합니다.
    ///
    /// 축출된 패킷 수를 반환합니다.
    pub fn append(&mut self, batch: &[Packet]) -> usize {
        self.total_received += batch.len() as u64;
        self.buffer.extend(batch.iter().cloned());

        let mut evicted = 0usize;
        while self.buffer.len() > self.capacity {
            self.buffer.pop_front();
            evicted += 1;
        }

        if evicted > 0 {
            self.evicted_count += evicted as u64;
            counter!(m::TRAFFIC_EVICTED_TOTAL).increment(evicted as u64);
            tracing::debug!(
                evicted,
                total_evicted = self.evicted_count,
                capacity = self.capacity,
                "buffer full, evicted oldest packets"
            );
        }

        evicted
    }

    /// 버퍼를 무조건 비웁니다.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// 현재 내용의 복사본을 삽입 순서대로 반환합니다 (가장 최근이 마지막).
    pub fn snapshot(&self) -> Vec<Packet> {
        self.buffer.iter().cloned().collect()
    }

    /// 현재 버퍼에 저장된 패킷 수를 반환합니다.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// 버퍼가 비어있는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// 버퍼 최대 용량을 반환합니다.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// 지금까지 축출된 패킷 수를 반환합니다.
    pub fn evicted_count(&self) -> u64 {
        self.evicted_count
    }

    /// 총 유입 패킷 수를 반환합니다.
    pub fn total_received(&self) -> u64 {
        self.total_received
    }

    /// 버퍼 사용률을 0.0~1.0 범위로 반환합니다.
    pub fn utilization(&self) -> f64 {
        if self.capacity == 0 {
            return 0.0;
        }
        f64::from(u32::try_from(self.buffer.len()).unwrap_or(u32::MAX))
            / f64::from(u32::try_from(self.capacity).unwrap_or(u32::MAX))
    }
}
