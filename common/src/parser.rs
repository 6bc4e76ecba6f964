//! ランキングレスポンスパーサー
//!
//! ランキングAIのレスポンスからコードフェンスを除去し、
//! `{"rankings": [...]}` 契約としてパースする。
//! 契約に合わない場合は空リストで代用せず、必ずエラーを返す。

use crate::error::{Error, Result};
use crate::types::RankingContract;

const FENCE: &str = "```";

/// コードフェンス（```json や ```）を除去してtrimする
///
/// フェンス直後の言語タグ（json など）も一緒に除去する。
/// 何度適用しても結果は変わらない。
///
/// # Examples
/// ```
/// use rescue_match_common::strip_code_fences;
///
/// let cleaned = strip_code_fences("```json\n{\"rankings\": []}\n```");
/// assert_eq!(cleaned, "{\"rankings\": []}");
/// ```
pub fn strip_code_fences(response: &str) -> String {
    let mut current = strip_fences_once(response);
    // 除去でフェンスが新たに連結された場合に備えて繰り返す
    while current.contains(FENCE) {
        current = strip_fences_once(&current);
    }
    current.trim().to_string()
}

fn strip_fences_once(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(pos) = rest.find(FENCE) {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + FENCE.len()..];
        let tag_len = after
            .find(|c: char| !c.is_ascii_alphanumeric())
            .unwrap_or(after.len());
        rest = &after[tag_len..];
    }

    out.push_str(rest);
    out
}

/// レスポンスから JSONオブジェクト部分を切り出す
///
/// 抽出優先順位:
/// 1. フェンス除去後の全体
/// 2. 最初の `{` から最後の `}` まで（前後に説明文がある場合）
fn extract_json_object(cleaned: &str) -> Option<&str> {
    let start = cleaned.find('{')?;
    let end = cleaned.rfind('}')?;
    if end > start {
        Some(&cleaned[start..=end])
    } else {
        None
    }
}

/// ランキングレスポンスをパース
///
/// # Arguments
/// * `response` - ランキングAIの生レスポンス
///
/// # Returns
/// * `Ok(RankingContract)` - パース成功（rankingsは順位順）
/// * `Err(Error::RankingContract)` - JSONでない、または rankings 配列がない
pub fn parse_ranking_response(response: &str) -> Result<RankingContract> {
    let cleaned = strip_code_fences(response);
    if cleaned.is_empty() {
        return Err(Error::RankingContract("empty ranking response".into()));
    }

    match serde_json::from_str::<RankingContract>(&cleaned) {
        Ok(contract) => Ok(contract),
        Err(first_err) => {
            let fallback = extract_json_object(&cleaned)
                .filter(|candidate| candidate.len() < cleaned.len())
                .and_then(|candidate| serde_json::from_str::<RankingContract>(candidate).ok());

            fallback.ok_or_else(|| Error::RankingContract(format!("{}", first_err)))
        }
    }
}
