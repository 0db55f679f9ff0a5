//! 도메인 타입 — 시스템 전역에서 사용되는 공통 타입
//!
//! 모든 모듈이 공유하는 데이터 구조를 정의합니다.
//! 트래픽 엔진이 생성한 [`Packet`]이 파이프라인의 기본 단위이며,
//! 분석 모듈은 [`ThreatAlert`]를 파생 결과로 생성합니다.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 네트워크 프로토콜
///
/// 합성 트래픽 생성기가 사용하는 프로토콜 집합입니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Protocol {
    /// TCP
    Tcp,
    /// UDP
    Udp,
    /// HTTP
    Http,
    /// HTTPS (암호화)
    Https,
    /// DNS
    Dns,
    /// FTP
    Ftp,
    /// SSH (암호화)
    Ssh,
    /// ICMP
    Icmp,
}

impl Protocol {
    /// 전체 프로토콜 목록 (생성기의 균등 샘플링에 사용)
    pub const ALL: [Self; 8] = [
        Self::Tcp,
        Self::Udp,
        Self::Http,
        Self::Https,
        Self::Dns,
        Self::Ftp,
        Self::Ssh,
        Self::Icmp,
    ];

    /// 문자열에서 프로토콜을 파싱합니다.
    ///
    /// 대소문자를 구분하지 않습니다.
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "tcp" => Some(Self::Tcp),
            "udp" => Some(Self::Udp),
            "http" => Some(Self::Http),
            "https" => Some(Self::Https),
            "dns" => Some(Self::Dns),
            "ftp" => Some(Self::Ftp),
            "ssh" => Some(Self::Ssh),
            "icmp" => Some(Self::Icmp),
            _ => None,
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tcp => write!(f, "TCP"),
            Self::Udp => write!(f, "UDP"),
            Self::Http => write!(f, "HTTP"),
            Self::Https => write!(f, "HTTPS"),
            Self::Dns => write!(f, "DNS"),
            Self::Ftp => write!(f, "FTP"),
            Self::Ssh => write!(f, "SSH"),
            Self::Icmp => write!(f, "ICMP"),
        }
    }
}

/// 심각도 레벨
///
/// 패킷의 위협 수준과 알림의 심각도를 모두 표현합니다.
/// `Ord` 구현으로 심각도 비교가 가능합니다 (`Low < Medium < High < Critical`).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// 낮은 심각도
    #[default]
    Low,
    /// 중간 심각도
    Medium,
    /// 높은 심각도
    High,
    /// 치명적 — 즉시 대응 필요
    Critical,
}

impl Severity {
    /// 문자열에서 심각도를 파싱합니다.
    ///
    /// 대소문자를 구분하지 않습니다.
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" | "med" => Some(Self::Medium),
            "high" => Some(Self::High),
            "critical" | "crit" => Some(Self::Critical),
            _ => None,
        }
    }

    /// high 이상인지 확인합니다 (위협 카운팅 기준).
    pub fn is_elevated(self) -> bool {
        self >= Self::High
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
            Self::Critical => write!(f, "critical"),
        }
    }
}

/// TCP 제어 플래그
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TcpFlag {
    /// 연결 시작
    Syn,
    /// 수신 확인
    Ack,
    /// 즉시 전달
    Psh,
    /// 연결 종료
    Fin,
}

impl TcpFlag {
    /// 생성기가 샘플링하는 플래그 집합
    pub const ALL: [Self; 4] = [Self::Syn, Self::Ack, Self::Psh, Self::Fin];
}

impl fmt::Display for TcpFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Syn => write!(f, "SYN"),
            Self::Ack => write!(f, "ACK"),
            Self::Psh => write!(f, "PSH"),
            Self::Fin => write!(f, "FIN"),
        }
    }
}

/// 합성 패킷 이벤트
///
/// 트래픽 엔진이 생성하는 파이프라인의 기본 단위입니다.
/// `id`는 프로세스 전역 카운터에서 발급되어 생성 순서대로 단조 증가하며,
/// `threat_level`은 생성 시점에 한 번 부여되고 이후 변경되지 않습니다.
/// 주소는 합성 값이므로 라우팅 가능성을 보장하지 않는 문자열로 유지합니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Packet {
    /// 패킷 ID (생성 순서대로 단조 증가)
    pub id: u64,
    /// 캡처 시각
    pub timestamp: DateTime<Utc>,
    /// 출발지 주소
    pub src_addr: String,
    /// 목적지 주소
    pub dst_addr: String,
    /// 프로토콜
    pub protocol: Protocol,
    /// 출발지 포트
    pub src_port: u16,
    /// 목적지 포트
    pub dst_port: u16,
    /// 패킷 크기 (바이트)
    pub size: u32,
    /// TCP 제어 플래그 (부분집합, 순서 무관)
    pub flags: Vec<TcpFlag>,
    /// 페이로드 미리보기 (실제 페이로드 바이트가 아닌 설명 문자열)
    pub payload_preview: String,
    /// 위협 수준 (생성 시 부여, 불변)
    pub threat_level: Severity,
    /// 암호화 여부
    pub encrypted: bool,
}

impl fmt::Display for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Packet[{}] {}:{} -> {}:{} proto={} size={} threat={}",
            self.id,
            self.src_addr,
            self.src_port,
            self.dst_addr,
            self.dst_port,
            self.protocol,
            self.size,
            self.threat_level,
        )
    }
}

/// 위협 알림 유형
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThreatKind {
    /// 치명적 패킷에서 파생된 악성 활동
    MaliciousActivity,
    /// 높은 위협 수준 패킷에서 파생된 의심 행위
    SuspiciousBehavior,
    /// 단일 출발지의 과도한 트래픽 (볼류메트릭)
    PotentialDdos,
    /// 다수 포트 접근 (정찰)
    PortScanning,
}

impl fmt::Display for ThreatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MaliciousActivity => write!(f, "Malicious Activity"),
            Self::SuspiciousBehavior => write!(f, "Suspicious Behavior"),
            Self::PotentialDdos => write!(f, "Potential DDoS"),
            Self::PortScanning => write!(f, "Port Scanning"),
        }
    }
}

/// 위협 알림
///
/// 분석 엔진이 뷰를 스캔할 때마다 처음부터 다시 계산하는 파생 결과입니다.
/// `id`는 원인별로 안정적입니다 (같은 패킷/출발지는 같은 ID를 생성).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreatAlert {
    /// 알림 ID (원인별 안정)
    pub id: String,
    /// 알림 유형
    pub kind: ThreatKind,
    /// 심각도 (생성 규칙이 독립적으로 부여)
    pub severity: Severity,
    /// 상세 설명
    pub description: String,
    /// 원인 출발지 주소
    pub src_addr: String,
    /// 관측 시각
    pub observed_at: DateTime<Utc>,
    /// 발생 횟수 (규칙별 의미: 패킷 수 또는 포트 수)
    pub occurrence_count: u64,
}

impl fmt::Display for ThreatAlert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} src={} count={}",
            self.severity, self.kind, self.src_addr, self.occurrence_count,
        )
    }
}

/// 캡처 인터페이스 유형
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InterfaceKind {
    /// 유선 이더넷
    Ethernet,
    /// 무선랜
    Wireless,
    /// 블루투스 PAN
    Bluetooth,
    /// 가상 어댑터
    Virtual,
    /// 루프백
    Loopback,
    /// 기타
    Other,
}

impl fmt::Display for InterfaceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ethernet => write!(f, "ethernet"),
            Self::Wireless => write!(f, "wireless"),
            Self::Bluetooth => write!(f, "bluetooth"),
            Self::Virtual => write!(f, "virtual"),
            Self::Loopback => write!(f, "loopback"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// 캡처 인터페이스 레코드
///
/// 사용자가 토글할 수 있는 캡처 소스를 나타냅니다.
/// `throughput_pps`는 활성 상태에서 틱마다 갱신되는 합성 값입니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceRecord {
    /// 인터페이스 ID
    pub id: String,
    /// 인터페이스 이름 (예: "eth0")
    pub name: String,
    /// 하드웨어 설명
    pub description: String,
    /// 활성화 여부 (사용자 토글)
    pub enabled: bool,
    /// 초당 패킷 처리량 (합성, 비활성 시 0)
    pub throughput_pps: u64,
    /// 하드웨어 주소 (MAC)
    pub hardware_addr: String,
    /// 네트워크 주소
    pub network_addr: String,
    /// 인터페이스 유형
    pub kind: InterfaceKind,
}

impl fmt::Display for InterfaceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.enabled { "up" } else { "down" };
        write!(
            f,
            "{} ({}) {} {} pps={}",
            self.name, self.kind, state, self.network_addr, self.throughput_pps,
        )
    }
}

/// 세션 누적 통계
///
/// `total_packets`와 `total_bytes`는 세션 수명 동안 단조 증가하며
/// 버퍼 축출과 무관하게 전체 도착량을 추적합니다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunningStats {
    /// 전체 패킷 수 (누적, 축출과 무관)
    pub total_packets: u64,
    /// 최근 틱의 패킷 수
    pub current_rate: u64,
    /// 전체 바이트 수 (누적)
    pub total_bytes: u64,
    /// high/critical 패킷 누적 수
    pub threat_count: u64,
    /// 활성 연결 수 (합성 게이지)
    pub active_connections: u64,
}

impl RunningStats {
    /// 모든 카운터를 0으로 되돌립니다.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl fmt::Display for RunningStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "packets={} rate={} bytes={} threats={} conns={}",
            self.total_packets,
            self.current_rate,
            self.total_bytes,
            self.threat_count,
            self.active_connections,
        )
    }
}

/// 프레젠테이션 레이어에 전달되는 일관된 시점 스냅샷
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    /// 버퍼 내용 (가장 최근 패킷이 마지막)
    pub packets: Vec<Packet>,
    /// 누적 통계
    pub stats: RunningStats,
    /// 인터페이스 목록
    pub interfaces: Vec<InterfaceRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_packet() -> Packet {
        Packet {
            id: 7,
            timestamp: Utc::now(),
            src_addr: "192.168.1.100".to_owned(),
            dst_addr: "10.0.0.1".to_owned(),
            protocol: Protocol::Tcp,
            src_port: 443,
            dst_port: 8080,
            size: 512,
            flags: vec![TcpFlag::Syn, TcpFlag::Ack],
            payload_preview: "TCP packet data - ab12cd".to_owned(),
            threat_level: Severity::High,
            encrypted: false,
        }
    }

    #[test]
    fn severity_ordering() {
        assert!(Severity::Low < Severity::Medium);
        assert!(Severity::Medium < Severity::High);
        assert!(Severity::High < Severity::Critical);
    }

    #[test]
    fn severity_default_is_low() {
        assert_eq!(Severity::default(), Severity::Low);
    }

    #[test]
    fn severity_is_elevated() {
        assert!(!Severity::Low.is_elevated());
        assert!(!Severity::Medium.is_elevated());
        assert!(Severity::High.is_elevated());
        assert!(Severity::Critical.is_elevated());
    }

    #[test]
    fn severity_from_str_loose() {
        assert_eq!(Severity::from_str_loose("low"), Some(Severity::Low));
        assert_eq!(Severity::from_str_loose("MEDIUM"), Some(Severity::Medium));
        assert_eq!(Severity::from_str_loose("Crit"), Some(Severity::Critical));
        assert_eq!(Severity::from_str_loose("unknown"), None);
    }

    #[test]
    fn severity_display_lowercase() {
        assert_eq!(Severity::Low.to_string(), "low");
        assert_eq!(Severity::Critical.to_string(), "critical");
    }

    #[test]
    fn severity_serialize_roundtrip() {
        let json = serde_json::to_string(&Severity::High).unwrap();
        assert_eq!(json, "\"high\"");
        let back: Severity = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Severity::High);
    }

    #[test]
    fn protocol_from_str_loose() {
        assert_eq!(Protocol::from_str_loose("tcp"), Some(Protocol::Tcp));
        assert_eq!(Protocol::from_str_loose("HTTPS"), Some(Protocol::Https));
        assert_eq!(Protocol::from_str_loose("gopher"), None);
    }

    #[test]
    fn protocol_all_covers_every_variant() {
        assert_eq!(Protocol::ALL.len(), 8);
        for proto in Protocol::ALL {
            assert_eq!(Protocol::from_str_loose(&proto.to_string()), Some(proto));
        }
    }

    #[test]
    fn packet_display() {
        let display = sample_packet().to_string();
        assert!(display.contains("192.168.1.100:443"));
        assert!(display.contains("10.0.0.1:8080"));
        assert!(display.contains("proto=TCP"));
        assert!(display.contains("threat=high"));
    }

    #[test]
    fn packet_serialize_roundtrip() {
        let packet = sample_packet();
        let json = serde_json::to_string(&packet).unwrap();
        let back: Packet = serde_json::from_str(&json).unwrap();
        assert_eq!(packet, back);
    }

    #[test]
    fn threat_kind_display_labels() {
        assert_eq!(
            ThreatKind::MaliciousActivity.to_string(),
            "Malicious Activity"
        );
        assert_eq!(
            ThreatKind::SuspiciousBehavior.to_string(),
            "Suspicious Behavior"
        );
        assert_eq!(ThreatKind::PotentialDdos.to_string(), "Potential DDoS");
        assert_eq!(ThreatKind::PortScanning.to_string(), "Port Scanning");
    }

    #[test]
    fn threat_alert_display() {
        let alert = ThreatAlert {
            id: "ddos-10.0.0.50".to_owned(),
            kind: ThreatKind::PotentialDdos,
            severity: Severity::High,
            description: "Unusually high traffic volume from 10.0.0.50 (61 packets)".to_owned(),
            src_addr: "10.0.0.50".to_owned(),
            observed_at: Utc::now(),
            occurrence_count: 61,
        };
        let display = alert.to_string();
        assert!(display.contains("high"));
        assert!(display.contains("Potential DDoS"));
        assert!(display.contains("count=61"));
    }

    #[test]
    fn running_stats_reset() {
        let mut stats = RunningStats {
            total_packets: 42,
            current_rate: 3,
            total_bytes: 9000,
            threat_count: 5,
            active_connections: 17,
        };
        stats.reset();
        assert_eq!(stats, RunningStats::default());
    }

    #[test]
    fn interface_record_display() {
        let record = InterfaceRecord {
            id: "1".to_owned(),
            name: "eth0".to_owned(),
            description: "Intel(R) Ethernet Connection I217-LM".to_owned(),
            enabled: true,
            throughput_pps: 55,
            hardware_addr: "00:1B:21:3C:4D:5E".to_owned(),
            network_addr: "192.168.1.100".to_owned(),
            kind: InterfaceKind::Ethernet,
        };
        let display = record.to_string();
        assert!(display.contains("eth0"));
        assert!(display.contains("up"));
        assert!(display.contains("pps=55"));
    }
}
