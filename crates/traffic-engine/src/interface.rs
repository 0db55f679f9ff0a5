//! 인터페이스 레지스트리 — 캡처 소스 활성화 상태 및 합성 처리량 관리
//!
//! [`InterfaceRegistry`]는 캡처 인터페이스의 활성화/비활성화 상태를 추적하고,
//! 생성 틱마다 활성 인터페이스의 합성 처리량을 갱신합니다.

use rand::Rng;

use netpulse_core::types::{InterfaceKind, InterfaceRecord};

/// 활성 인터페이스 합성 처리량 하한 (pps)
const MIN_THROUGHPUT_PPS: u64 = 10;
/// 활성 인터페이스 합성 처리량 상한 (pps)
const MAX_THROUGHPUT_PPS: u64 = 109;

/// 캡처 인터페이스 레지스트리
///
/// 토글은 지정된 인터페이스에만 영향을 주며 (상호 배제 없음),
/// 알 수 없는 ID는 조용히 무시합니다.
pub struct InterfaceRegistry {
    records: Vec<InterfaceRecord>,
}

impl InterfaceRegistry {
    /// 기본 인터페이스 테이블로 레지스트리를 생성합니다.
    pub fn new() -> Self {
        Self {
            records: default_records(),
        }
    }

    /// 지정된 레코드로 레지스트리를 생성합니다.
    pub fn with_records(records: Vec<InterfaceRecord>) -> Self {
        Self { records }
    }

    /// 지정된 인터페이스의 활성화 상태를 반전합니다.
    ///
    /// 알 수 없는 ID는 no-op이며 에러가 아닙니다.
    /// 대상을 찾았으면 `true`를 반환합니다.
    pub fn toggle(&mut self, id: &str) -> bool {
        match self.records.iter_mut().find(|r| r.id == id) {
            Some(record) => {
                record.enabled = !record.enabled;
                if !record.enabled {
                    record.throughput_pps = 0;
                }
                tracing::debug!(
                    interface = record.name.as_str(),
                    enabled = record.enabled,
                    "interface toggled"
                );
                true
            }
            None => {
                tracing::debug!(interface_id = id, "toggle ignored for unknown interface");
                false
            }
        }
    }

    /// 생성 틱마다 호출되어 합성 처리량을 갱신합니다.
    ///
    /// 활성 인터페이스는 새 양수 값을, 비활성 인터페이스는 0을 받습니다.
    pub fn tick(&mut self) {
        let mut rng = rand::thread_rng();
        for record in &mut self.records {
            record.throughput_pps = if record.enabled {
                rng.gen_range(MIN_THROUGHPUT_PPS..=MAX_THROUGHPUT_PPS)
            } else {
                0
            };
        }
    }

    /// 전체 레코드의 복사본을 반환합니다.
    pub fn records(&self) -> Vec<InterfaceRecord> {
        self.records.clone()
    }

    /// 레코드 수를 반환합니다.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// 레지스트리가 비어있는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 활성 인터페이스 수를 반환합니다.
    pub fn enabled_count(&self) -> usize {
        self.records.iter().filter(|r| r.enabled).count()
    }
}

impl Default for InterfaceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// 기본 캡처 인터페이스 테이블
fn default_records() -> Vec<InterfaceRecord> {
    vec![
        InterfaceRecord {
            id: "1".to_owned(),
            name: "eth0".to_owned(),
            description: "Intel(R) Ethernet Connection I217-LM".to_owned(),
            enabled: true,
            throughput_pps: 0,
            hardware_addr: "00:1B:21:3C:4D:5E".to_owned(),
            network_addr: "192.168.1.100".to_owned(),
            kind: InterfaceKind::Ethernet,
        },
        InterfaceRecord {
            id: "2".to_owned(),
            name: "wlan0".to_owned(),
            description: "Realtek RTL8822BE 802.11ac PCIe Adapter".to_owned(),
            enabled: false,
            throughput_pps: 0,
            hardware_addr: "A4:B1:C2:D3:E4:F5".to_owned(),
            network_addr: "192.168.1.101".to_owned(),
            kind: InterfaceKind::Wireless,
        },
        InterfaceRecord {
            id: "3".to_owned(),
            name: "lo".to_owned(),
            description: "Software Loopback Interface".to_owned(),
            enabled: false,
            throughput_pps: 0,
            hardware_addr: "00:00:00:00:00:00".to_owned(),
            network_addr: "127.0.0.1".to_owned(),
            kind: InterfaceKind::Loopback,
        },
        InterfaceRecord {
            id: "4".to_owned(),
            name: "vmnet1".to_owned(),
            description: "VMware Virtual Ethernet Adapter (VMnet1)".to_owned(),
            enabled: false,
            throughput_pps: 0,
            hardware_addr: "00:50:56:C0:00:01".to_owned(),
            network_addr: "192.168.56.1".to_owned(),
            kind: InterfaceKind::Virtual,
        },
        InterfaceRecord {
            id: "5".to_owned(),
            name: "bluetooth0".to_owned(),
            description: "Bluetooth Device (Personal Area Network)".to_owned(),
            enabled: false,
            throughput_pps: 0,
            hardware_addr: "B8:27:EB:A1:B2:C3".to_owned(),
            network_addr: "169.254.1.1".to_owned(),
            kind: InterfaceKind::Bluetooth,
        },
    ]
}
