//! 뷰 내보내기 — 필터링된 뷰의 JSON 문서 생성
//!
//! 현재 필터링된 뷰를 모든 필드를 포함한 JSON 배열로 직렬화합니다.
//! 문서 이름은 현재 날짜로 정해지며 (`packets_YYYY-MM-DD.json`),
//! 빈 뷰도 정상적으로 빈 배열 문서를 생성합니다.
//! 디스크 기록은 호출자(데몬) 책임입니다.

use chrono::Utc;

use netpulse_core::error::ExportError;
use netpulse_core::types::Packet;

/// 내보내기 문서
///
/// 직렬화된 내용과 날짜 기반 파일명을 담습니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportDocument {
    /// 문서 파일명 (예: "packets_2026-08-06.json")
    pub file_name: String,
    /// JSON 배열 내용
    pub contents: String,
}

impl ExportDocument {
    /// 뷰를 내보내기 문서로 직렬화합니다.
    ///
    /// 레코드 순서와 필드 구성을 그대로 유지하며, 빈 뷰는 빈 배열을
    /// 생성합니다 (에러 아님).
    pub fn render(view: &[Packet]) -> Result<Self, ExportError> {
        let contents = serde_json::to_string_pretty(view).map_err(|e| ExportError::Serialize {
            reason: e.to_string(),
        })?;
        Ok(Self {
            file_name: format!("packets_{}.json", Utc::now().format("%Y-%m-%d")),
            contents,
        })
    }

    /// 내보내기 문서 내용을 다시 패킷 목록으로 파싱합니다.
    pub fn parse(contents: &str) -> Result<Vec<Packet>, ExportError> {
        serde_json::from_str(contents).map_err(|e| ExportError::Parse {
            reason: e.to_string(),
        })
    }
}
