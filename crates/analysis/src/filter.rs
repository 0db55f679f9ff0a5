//! 필터 엔진 — 술어 집합으로 뷰를 파생하는 순수 함수
//!
//! [`FilterSpec`]의 존재하는 술어는 모두 AND로 결합되며, 없는 술어는
//! 모든 패킷을 통과시킵니다. [`FilterEngine::apply`]는 순서를 보존하고
//! 멱등이며, 술어를 좁힐수록 결과가 커지지 않습니다.
//!
//! # 관대 정책
//! 잘못된 필터 입력(숫자가 아닌 포트, 알 수 없는 프로토콜명 등)은
//! 해당 술어를 "제약 없음"으로 처리하며 에러를 발생시키지 않습니다.

use serde::{Deserialize, Serialize};

use netpulse_core::types::{Packet, Protocol, Severity};

/// 필터 명세
///
/// 각 필드는 `None`이면 해당 술어가 없는 것으로 간주되어 모든 패킷을
/// 통과시킵니다. 주소 필드는 대소문자를 구분하는 부분 문자열 매치,
/// 포트는 출발지 또는 목적지 포트 일치, 나머지는 정확 일치입니다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSpec {
    /// 출발지 주소 부분 문자열
    pub src_addr: Option<String>,
    /// 목적지 주소 부분 문자열
    pub dst_addr: Option<String>,
    /// 프로토콜 정확 일치 (`None` = 전체)
    pub protocol: Option<Protocol>,
    /// 포트 일치 (출발지 또는 목적지)
    pub port: Option<u16>,
    /// 위협 수준 정확 일치 (`None` = 전체)
    pub threat_level: Option<Severity>,
}

impl FilterSpec {
    /// 모든 패킷을 통과시키는 빈 명세를 반환합니다.
    pub fn all() -> Self {
        Self::default()
    }

    /// 사용자 입력 문자열에서 필터 명세를 만듭니다.
    ///
    /// 관대 정책: 빈 문자열과 `"all"`은 술어 없음이며, 파싱할 수 없는
    /// 포트/프로토콜/위협 수준도 술어 없음으로 처리합니다 (에러 없음).
    pub fn from_input(
        src_addr: &str,
        dst_addr: &str,
        protocol: &str,
        port: &str,
        threat_level: &str,
    ) -> Self {
        Self {
            src_addr: non_empty(src_addr),
            dst_addr: non_empty(dst_addr),
            protocol: match protocol {
                "" | "all" => None,
                other => Protocol::from_str_loose(other),
            },
            port: port.trim().parse::<u16>().ok(),
            threat_level: match threat_level {
                "" | "all" => None,
                other => Severity::from_str_loose(other),
            },
        }
    }

    /// 술어가 하나도 없는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.src_addr.is_none()
            && self.dst_addr.is_none()
            && self.protocol.is_none()
            && self.port.is_none()
            && self.threat_level.is_none()
    }

    /// 패킷이 모든 술어를 통과하는지 확인합니다.
    pub fn matches(&self, packet: &Packet) -> bool {
        if let Some(needle) = &self.src_addr
            && !packet.src_addr.contains(needle.as_str())
        {
            return false;
        }
        if let Some(needle) = &self.dst_addr
            && !packet.dst_addr.contains(needle.as_str())
        {
            return false;
        }
        if let Some(protocol) = self.protocol
            && packet.protocol != protocol
        {
            return false;
        }
        if let Some(port) = self.port
            && packet.src_port != port
            && packet.dst_port != port
        {
            return false;
        }
        if let Some(level) = self.threat_level
            && packet.threat_level != level
        {
            return false;
        }
        true
    }
}

/// 필터 엔진
///
/// 상태가 없는 순수 함수 모음입니다.
pub struct FilterEngine;

impl FilterEngine {
    /// 뷰에 명세를 적용하여 파생 뷰를 반환합니다.
    ///
    /// 상대 순서를 보존하며, `apply(apply(v, s), s) == apply(v, s)`가
    /// 항상 성립합니다.
    pub fn apply(view: &[Packet], spec: &FilterSpec) -> Vec<Packet> {
        view.iter()
            .filter(|packet| spec.matches(packet))
            .cloned()
            .collect()
    }
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_owned())
    }
}
