//! 結果マージ（サーバー/CLI共通）
//!
//! エンリッチャーの詳細プロフィールから近接フィルタ用の候補を抽出し、
//! 近接フィルタの出力（近い順）にプロフィール項目を付与する。

use crate::types::{
    ClosestOrg, EnrichedResult, GeoCandidate, MatchResponse, OrganizationProfile, ProfileFields,
    ProfileLookup,
};
use std::collections::HashMap;
use tracing::{debug, warn};

/// 近接フィルタに渡す候補を抽出
///
/// 名前と座標の両方が揃ったプロフィールだけを残す。
/// エラーマーカーや座標のない団体はエラーにせず除外する。
pub fn geo_candidates(lookups: &[ProfileLookup]) -> Vec<GeoCandidate> {
    lookups
        .iter()
        .filter_map(|lookup| {
            let profile = match lookup {
                ProfileLookup::Found(profile) => profile,
                ProfileLookup::Missing { name, error } => {
                    debug!(organization = %name, %error, "プロフィール取得失敗のため距離計算から除外");
                    return None;
                }
            };

            match (profile.name.trim().is_empty(), profile.coordinate) {
                (false, Some(coordinate)) => Some(GeoCandidate {
                    name: profile.name.clone(),
                    coordinate,
                }),
                _ => {
                    debug!(organization = %profile.name, "名前または座標がないため距離計算から除外");
                    None
                }
            }
        })
        .collect()
}

/// 近接フィルタの出力にプロフィールを付与
///
/// - 出力順は `closest` の順（近い順）をそのまま保つ
/// - 一致するプロフィールがない場合は距離結果のみで残す（診断ログを出力）
pub fn merge_results(closest: &[ClosestOrg], lookups: &[ProfileLookup]) -> Vec<EnrichedResult> {
    // 名前→プロフィールのマップ（同名は先勝ち）
    let mut profile_map: HashMap<&str, &OrganizationProfile> = HashMap::new();
    for profile in lookups.iter().filter_map(ProfileLookup::profile) {
        profile_map.entry(profile.name.as_str()).or_insert(profile);
    }

    closest
        .iter()
        .map(|org| match profile_map.get(org.name.as_str()) {
            Some(profile) => EnrichedResult {
                closest: org.clone(),
                profile: Some(ProfileFields::from(*profile)),
            },
            None => {
                warn!(organization = %org.name, "No match found for organization; returning distance result only");
                EnrichedResult {
                    closest: org.clone(),
                    profile: None,
                }
            }
        })
        .collect()
}

/// 最終レスポンスを組み立てる（先頭に画像解析テキスト）
pub fn build_response(
    image_summary: &str,
    closest: &[ClosestOrg],
    lookups: &[ProfileLookup],
) -> MatchResponse {
    MatchResponse::new(image_summary.to_string(), merge_results(closest, lookups))
}
