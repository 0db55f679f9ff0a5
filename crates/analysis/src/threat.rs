//! 위협 탐지 — 뷰 스캔 기반 알림 생성
//!
//! 패킷 분류, 볼류메트릭(DDoS), 정찰(포트 스캔) 휴리스틱을 수행합니다.
//! 각 규칙은 [`ThreatRule`] trait을 구현하여 탐지 엔진에 참여합니다.
//!
//! # 탐지 전략
//! - **분류**: high/critical 패킷마다 알림 1건
//! - **볼류메트릭**: 단일 출발지에서 임계값 초과 패킷 수 → DDoS 의심 알림
//! - **정찰**: 단일 출발지에서 임계값 초과 고유 목적지 포트 → 포트 스캔 알림
//!
//! # 아키텍처
//! ```text
//! Vec<Packet> ──▶ ThreatEngine.analyze ──▶ Vec<ThreatAlert> (심각도 내림차순)
//!                      │
//!                      ├── ClassificationRule (impl ThreatRule)
//!                      ├── VolumetricRule     (impl ThreatRule)
//!                      └── ReconRule          (impl ThreatRule)
//! ```
//!
//! 엔진은 호출 간 상태를 유지하지 않고 매번 뷰 전체를 다시 스캔합니다.
//! 뷰 크기가 버퍼 용량으로 제한되므로 전체 재계산이 검증하기 쉽고 충분히
//! 빠릅니다.

use std::collections::{HashMap, HashSet};

use chrono::Utc;
use metrics::counter;

use netpulse_core::analyzer::ThreatRule;
use netpulse_core::config::AnalysisConfig;
use netpulse_core::metrics as m;
use netpulse_core::types::{Packet, Severity, ThreatAlert, ThreatKind};

// =============================================================================
// 분류 규칙
// =============================================================================

/// 패킷 단위 분류 규칙
///
/// 위협 수준이 high 이상인 패킷마다 알림을 1건 생성합니다.
/// critical은 악성 활동, high는 의심 행위로 분류합니다.
#[derive(Debug, Default)]
pub struct ClassificationRule;

impl ThreatRule for ClassificationRule {
    fn name(&self) -> &str {
        "classification"
    }

    fn scan(&self, view: &[Packet]) -> Vec<ThreatAlert> {
        view.iter()
            .filter(|packet| packet.threat_level.is_elevated())
            .map(|packet| {
                let kind = if packet.threat_level == Severity::Critical {
                    ThreatKind::MaliciousActivity
                } else {
                    ThreatKind::SuspiciousBehavior
                };
                ThreatAlert {
                    id: format!("threat-{}", packet.id),
                    kind,
                    severity: packet.threat_level,
                    description: format!(
                        "{} traffic from {} shows {} risk patterns",
                        packet.protocol, packet.src_addr, packet.threat_level,
                    ),
                    src_addr: packet.src_addr.clone(),
                    observed_at: packet.timestamp,
                    occurrence_count: 1,
                }
            })
            .collect()
    }
}

// =============================================================================
// 볼류메트릭 (DDoS) 규칙
// =============================================================================

/// 볼류메트릭 규칙
///
/// 단일 출발지의 패킷 수가 임계값을 초과하면 DDoS 의심 알림을 생성합니다.
/// 알림은 출발지가 뷰에 처음 등장한 순서대로 반환됩니다.
#[derive(Debug)]
pub struct VolumetricRule {
    /// 출발지당 패킷 수 임계값 (초과 시 탐지)
    packet_threshold: u64,
}

impl VolumetricRule {
    /// 새 볼류메트릭 규칙을 생성합니다.
    pub fn new(packet_threshold: u64) -> Self {
        Self { packet_threshold }
    }
}

impl ThreatRule for VolumetricRule {
    fn name(&self) -> &str {
        "volumetric"
    }

    fn scan(&self, view: &[Packet]) -> Vec<ThreatAlert> {
        // 출발지별 패킷 수 집계 — 첫 등장 순서를 별도로 유지해야
        // 동일 심각도 알림의 순서가 결정적입니다.
        let mut counts: HashMap<&str, u64> = HashMap::new();
        let mut order: Vec<&str> = Vec::new();
        for packet in view {
            let count = counts.entry(packet.src_addr.as_str()).or_insert_with(|| {
                order.push(packet.src_addr.as_str());
                0
            });
            *count += 1;
        }

        order
            .into_iter()
            .filter_map(|src_addr| {
                let count = counts[src_addr];
                if count <= self.packet_threshold {
                    return None;
                }
                Some(ThreatAlert {
                    id: format!("ddos-{src_addr}"),
                    kind: ThreatKind::PotentialDdos,
                    severity: Severity::High,
                    description: format!(
                        "Unusually high traffic volume from {src_addr} ({count} packets)"
                    ),
                    src_addr: src_addr.to_owned(),
                    observed_at: Utc::now(),
                    occurrence_count: count,
                })
            })
            .collect()
    }
}

// =============================================================================
// 정찰 (포트 스캔) 규칙
// =============================================================================

/// 정찰 규칙
///
/// 단일 출발지가 접근한 고유 목적지 포트 수가 임계값을 초과하면
/// 포트 스캔 알림을 생성합니다.
#[derive(Debug)]
pub struct ReconRule {
    /// 출발지당 고유 포트 수 임계값 (초과 시 탐지)
    port_threshold: usize,
}

impl ReconRule {
    /// 새 정찰 규칙을 생성합니다.
    pub fn new(port_threshold: usize) -> Self {
        Self { port_threshold }
    }
}

impl ThreatRule for ReconRule {
    fn name(&self) -> &str {
        "recon"
    }

    fn scan(&self, view: &[Packet]) -> Vec<ThreatAlert> {
        let mut ports: HashMap<&str, HashSet<u16>> = HashMap::new();
        let mut order: Vec<&str> = Vec::new();
        for packet in view {
            let set = ports.entry(packet.src_addr.as_str()).or_insert_with(|| {
                order.push(packet.src_addr.as_str());
                HashSet::new()
            });
            set.insert(packet.dst_port);
        }

        order
            .into_iter()
            .filter_map(|src_addr| {
                let distinct = ports[src_addr].len();
                if distinct <= self.port_threshold {
                    return None;
                }
                Some(ThreatAlert {
                    id: format!("portscan-{src_addr}"),
                    kind: ThreatKind::PortScanning,
                    severity: Severity::Medium,
                    description: format!(
                        "Port scanning detected from {src_addr} ({distinct} different ports)"
                    ),
                    src_addr: src_addr.to_owned(),
                    observed_at: Utc::now(),
                    occurrence_count: distinct as u64,
                })
            })
            .collect()
    }
}

// =============================================================================
// 탐지 엔진
// =============================================================================

/// 위협 탐지 엔진
///
/// 등록된 규칙을 순서대로 실행하여 결과를 이어붙인 뒤 심각도 내림차순으로
/// 정렬합니다. 동일 심각도는 규칙 등록 순서와 뷰 순회 순서를 유지합니다
/// (안정 정렬).
pub struct ThreatEngine {
    rules: Vec<Box<dyn ThreatRule>>,
}

impl ThreatEngine {
    /// 분석 설정의 임계값으로 기본 규칙 집합을 구성합니다.
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            rules: vec![
                Box::new(ClassificationRule),
                Box::new(VolumetricRule::new(config.ddos_packet_threshold)),
                Box::new(ReconRule::new(config.port_scan_threshold)),
            ],
        }
    }

    /// 지정된 규칙 목록으로 엔진을 구성합니다.
    pub fn with_rules(rules: Vec<Box<dyn ThreatRule>>) -> Self {
        Self { rules }
    }

    /// 등록된 규칙 수를 반환합니다.
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// 뷰를 분석하여 순위화된 알림 목록을 반환합니다.
    ///
    /// 입력 뷰에 대해 순수하며, 호출마다 처음부터 다시 계산합니다.
    /// 빈 뷰는 빈 목록을 반환합니다 (에러 아님).
    pub fn analyze(&self, view: &[Packet]) -> Vec<ThreatAlert> {
        if view.is_empty() {
            return Vec::new();
        }

        let mut alerts: Vec<ThreatAlert> = Vec::new();
        for rule in &self.rules {
            let found = rule.scan(view);
            if !found.is_empty() {
                tracing::debug!(
                    rule = rule.name(),
                    alerts = found.len(),
                    "threat rule produced alerts"
                );
            }
            alerts.extend(found);
        }

        for alert in &alerts {
            counter!(
                m::ANALYSIS_ALERTS_TOTAL,
                m::LABEL_SEVERITY => alert.severity.to_string()
            )
            .increment(1);
        }

        // 안정 정렬이므로 동일 심각도는 이어붙인 순서를 유지
        alerts.sort_by(|a, b| b.severity.cmp(&a.severity));
        alerts
    }
}
