//! 합성 패킷 생성기 — 현실적인 필드 분포를 가진 트래픽 모델링
//!
//! [`PacketFactory`]는 호출마다 독립적인 합성 패킷을 생성합니다.
//! 유일한 부수 효과는 프로세스 전역 ID 카운터 소모이며, 실패 조건이 없습니다.
//!
//! # 분포 정책
//! - 프로토콜: 8개 프로토콜 중 균등 선택
//! - 포트: 고정된 잘 알려진 포트 집합에서 균등 선택 — 같은 포트가 여러
//!   패킷에 반복 등장해야 DDoS/포트 스캔 휴리스틱이 의미를 가집니다
//! - 주소: 사설/공인 5개 대역에서 균등 선택
//! - 크기: [64, 1563] 균등
//! - 플래그: SYN/ACK/PSH/FIN 각각 독립적으로 확률 0.3
//! - 위협 수준: low 편향 가중 분포 (6버킷 중 low 3, medium/high/critical 각 1)
//! - 암호화: HTTPS/SSH는 항상, 그 외에는 확률 0.2

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use rand::seq::SliceRandom;
use rand::Rng;

use netpulse_core::types::{Packet, Protocol, Severity, TcpFlag};

/// 프로세스 전역 패킷 ID 카운터
///
/// 생성 순서대로 단조 증가하는 ID를 보장합니다.
static NEXT_PACKET_ID: AtomicU64 = AtomicU64::new(1);

/// 생성기가 샘플링하는 잘 알려진 포트 집합
pub const COMMON_PORTS: [u16; 12] = [80, 443, 22, 21, 53, 25, 110, 143, 993, 995, 8080, 3389];

/// 위협 수준 가중 버킷 — low로 편향된 분포
const THREAT_BUCKETS: [Severity; 6] = [
    Severity::Low,
    Severity::Low,
    Severity::Low,
    Severity::Medium,
    Severity::High,
    Severity::Critical,
];

/// 패킷 크기 하한 (바이트)
pub const MIN_PACKET_SIZE: u32 = 64;
/// 패킷 크기 상한 (바이트)
pub const MAX_PACKET_SIZE: u32 = 1563;

/// 페이로드 미리보기 접미사에 사용하는 문자 집합
const PREVIEW_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// 합성 패킷 생성기
///
/// 필드 생성은 호출 간 상관관계가 없으며, 각 호출은 프로세스 전역
/// 카운터에서 다음 ID를 소모하는 것 외에는 부수 효과가 없습니다.
#[derive(Debug, Default, Clone)]
pub struct PacketFactory;

impl PacketFactory {
    /// 새 생성기를 만듭니다.
    pub fn new() -> Self {
        Self
    }

    /// 합성 패킷 하나를 생성합니다.
    pub fn generate(&self) -> Packet {
        let mut rng = rand::thread_rng();

        let id = NEXT_PACKET_ID.fetch_add(1, Ordering::Relaxed);
        let protocol = *Protocol::ALL
            .choose(&mut rng)
            .unwrap_or(&Protocol::Tcp);
        let src_port = *COMMON_PORTS.choose(&mut rng).unwrap_or(&80);
        let dst_port = *COMMON_PORTS.choose(&mut rng).unwrap_or(&443);
        let threat_level = *THREAT_BUCKETS.choose(&mut rng).unwrap_or(&Severity::Low);

        let flags: Vec<TcpFlag> = TcpFlag::ALL
            .iter()
            .copied()
            .filter(|_| rng.gen_bool(0.3))
            .collect();

        let encrypted = match protocol {
            Protocol::Https | Protocol::Ssh => true,
            _ => rng.gen_bool(0.2),
        };

        Packet {
            id,
            timestamp: Utc::now(),
            src_addr: synth_addr(&mut rng),
            dst_addr: synth_addr(&mut rng),
            protocol,
            src_port,
            dst_port,
            size: rng.gen_range(MIN_PACKET_SIZE..=MAX_PACKET_SIZE),
            flags,
            payload_preview: payload_preview(protocol, &mut rng),
            threat_level,
            encrypted,
        }
    }

    /// 합성 패킷 n개를 순서대로 생성합니다.
    ///
    /// n은 호출자(클럭)가 스케줄링 정책에 따라 결정합니다.
    pub fn generate_batch(&self, n: usize) -> Vec<Packet> {
        (0..n).map(|_| self.generate()).collect()
    }
}

/// 사설/공인 5개 대역에서 합성 주소를 생성합니다.
///
/// 생성된 주소는 라우팅 가능성을 보장하지 않습니다.
fn synth_addr(rng: &mut impl Rng) -> String {
    match rng.gen_range(0..5) {
        0 => format!("192.168.{}.{}", rng.gen_range(0..255), rng.gen_range(0..255)),
        1 => format!(
            "10.{}.{}.{}",
            rng.gen_range(0..255),
            rng.gen_range(0..255),
            rng.gen_range(0..255)
        ),
        2 => format!(
            "172.{}.{}.{}",
            rng.gen_range(16..32),
            rng.gen_range(0..255),
            rng.gen_range(0..255)
        ),
        3 => format!("8.8.{}.{}", rng.gen_range(0..10), rng.gen_range(0..255)),
        _ => format!("1.1.1.{}", rng.gen_range(0..255)),
    }
}

/// 프로토콜명과 랜덤 접미사로 페이로드 미리보기를 만듭니다.
fn payload_preview(protocol: Protocol, rng: &mut impl Rng) -> String {
    let suffix: String = (0..6)
        .map(|_| {
            let idx = rng.gen_range(0..PREVIEW_CHARSET.len());
            PREVIEW_CHARSET[idx] as char
        })
        .collect();
    format!("{protocol} packet data - {suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_assigns_monotonic_ids() {
        let factory = PacketFactory::new();
        let first = factory.generate();
        let second = factory.generate();
        let third = factory.generate();
        assert!(first.id < second.id);
        assert!(second.id < third.id);
    }

    #[test]
    fn generate_size_within_bounds() {
        let factory = PacketFactory::new();
        for _ in 0..200 {
            let packet = factory.generate();
            assert!(packet.size >= MIN_PACKET_SIZE);
            assert!(packet.size <= MAX_PACKET_SIZE);
        }
    }

    #[test]
    fn generate_ports_from_common_set() {
        let factory = PacketFactory::new();
        for _ in 0..200 {
            let packet = factory.generate();
            assert!(COMMON_PORTS.contains(&packet.src_port));
            assert!(COMMON_PORTS.contains(&packet.dst_port));
        }
    }

    #[test]
    fn generate_https_and_ssh_always_encrypted() {
        let factory = PacketFactory::new();
        let mut saw_encrypted_protocol = false;
        for _ in 0..500 {
            let packet = factory.generate();
            if matches!(packet.protocol, Protocol::Https | Protocol::Ssh) {
                assert!(packet.encrypted);
                saw_encrypted_protocol = true;
            }
        }
        // 500회 샘플링에서 HTTPS/SSH가 한 번도 안 나올 확률은 무시 가능
        assert!(saw_encrypted_protocol);
    }

    #[test]
    fn generate_flags_are_subset_without_duplicates() {
        let factory = PacketFactory::new();
        for _ in 0..200 {
            let packet = factory.generate();
            assert!(packet.flags.len() <= TcpFlag::ALL.len());
            let mut seen = std::collections::HashSet::new();
            for flag in &packet.flags {
                assert!(seen.insert(*flag), "duplicate flag in {:?}", packet.flags);
            }
        }
    }

    #[test]
    fn generate_addr_in_known_ranges() {
        let factory = PacketFactory::new();
        for _ in 0..200 {
            let packet = factory.generate();
            for addr in [&packet.src_addr, &packet.dst_addr] {
                let known = addr.starts_with("192.168.")
                    || addr.starts_with("10.")
                    || addr.starts_with("172.")
                    || addr.starts_with("8.8.")
                    || addr.starts_with("1.1.1.");
                assert!(known, "unexpected address range: {addr}");
            }
        }
    }

    #[test]
    fn generate_payload_preview_mentions_protocol() {
        let factory = PacketFactory::new();
        for _ in 0..50 {
            let packet = factory.generate();
            assert!(
                packet
                    .payload_preview
                    .starts_with(&packet.protocol.to_string()),
                "preview {:?} does not start with protocol",
                packet.payload_preview
            );
            assert!(packet.payload_preview.contains("packet data - "));
        }
    }

    #[test]
    fn generate_threat_level_from_weighted_buckets() {
        let factory = PacketFactory::new();
        let mut low_count = 0usize;
        let total = 600usize;
        for _ in 0..total {
            let packet = factory.generate();
            if packet.threat_level == Severity::Low {
                low_count += 1;
            }
        }
        // 기대값 50% — 난수 변동을 감안한 넓은 범위만 확인
        assert!(low_count > total / 4, "low count suspiciously small: {low_count}");
    }

    #[test]
    fn generate_batch_preserves_order_and_length() {
        let factory = PacketFactory::new();
        let batch = factory.generate_batch(5);
        assert_eq!(batch.len(), 5);
        for pair in batch.windows(2) {
            assert!(pair[0].id < pair[1].id);
        }
    }

    #[test]
    fn generate_batch_zero_is_empty() {
        let factory = PacketFactory::new();
        assert!(factory.generate_batch(0).is_empty());
    }
}
