//! マッチング処理の型定義
//!
//! サーバーとCLIで共有される型:
//! - Coordinate: 緯度経度
//! - OrganizationSummary: ランキングプロンプト用の団体概要
//! - RankingContract: ランキングAIの出力（JSON契約）
//! - OrganizationProfile / ProfileLookup: 団体の詳細情報（またはエラーマーカー）
//! - ClosestOrg: 近接フィルタの出力（近い順）
//! - MatchResponse: 最終出力（先頭にimageSummary、続いて団体）

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// 緯度経度
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

/// ディレクトリの概要エントリ（ランキングプロンプト構築専用）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrganizationSummary {
    pub name: String,
    #[serde(default)]
    pub summary: String,
}

/// ランキングの1要素
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RankingEntry {
    pub name: String,
    /// 順位の理由（説明用。後段の処理では使わない）
    #[serde(default)]
    pub reason: String,
}

/// ランキングAIの出力契約: `{"rankings": [{"name", "reason"}, ...]}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RankingContract {
    pub rankings: Vec<RankingEntry>,
}

impl RankingContract {
    /// 候補団体名を順位順に返す（重複は最初の出現のみ、空名は除外）
    pub fn candidate_names(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.rankings
            .iter()
            .map(|entry| entry.name.trim())
            .filter(|name| !name.is_empty())
            .filter(|name| seen.insert(name.to_string()))
            .map(str::to_string)
            .collect()
    }
}

/// 団体の詳細プロフィール
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationProfile {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    #[serde(default, alias = "googleMapLocation", skip_serializing_if = "Option::is_none")]
    pub coordinate: Option<Coordinate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_number: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_address: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focus_area: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operating_hours: Option<String>,

    #[serde(default)]
    pub emergency_response: bool,
}

/// エンリッチャーの1件分の結果
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ProfileLookup {
    Found(OrganizationProfile),
    /// 名前に対応するプロフィールが取得できなかった
    Missing { name: String, error: String },
}

impl ProfileLookup {
    pub fn name(&self) -> &str {
        match self {
            ProfileLookup::Found(profile) => &profile.name,
            ProfileLookup::Missing { name, .. } => name,
        }
    }

    pub fn profile(&self) -> Option<&OrganizationProfile> {
        match self {
            ProfileLookup::Found(profile) => Some(profile),
            ProfileLookup::Missing { .. } => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, ProfileLookup::Missing { .. })
    }
}

/// 近接フィルタへの入力（名前と座標が揃ったものだけ）
#[derive(Debug, Clone, PartialEq)]
pub struct GeoCandidate {
    pub name: String,
    pub coordinate: Coordinate,
}

/// 近接フィルタの出力（近い順）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClosestOrg {
    pub name: String,
    pub distance_km: f64,
}

/// 距離結果に付与するプロフィール項目
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub emergency_response: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focus_area: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operating_hours: Option<String>,
}

impl From<&OrganizationProfile> for ProfileFields {
    fn from(profile: &OrganizationProfile) -> Self {
        Self {
            address: profile.address.clone(),
            emergency_response: profile.emergency_response,
            contact_number: profile.contact_number.clone(),
            email_address: profile.email_address.clone(),
            website: profile.website.clone(),
            focus_area: profile.focus_area.clone(),
            operating_hours: profile.operating_hours.clone(),
        }
    }
}

/// 距離結果 + プロフィール（一致なしの場合は距離結果のみ）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedResult {
    #[serde(flatten)]
    pub closest: ClosestOrg,
    #[serde(flatten)]
    pub profile: Option<ProfileFields>,
}

impl EnrichedResult {
    pub fn name(&self) -> &str {
        &self.closest.name
    }

    pub fn is_enriched(&self) -> bool {
        self.profile.is_some()
    }
}

/// レスポンス配列の要素
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResponseItem {
    ImageSummary {
        #[serde(rename = "imageSummary")]
        image_summary: String,
    },
    Organization(EnrichedResult),
}

/// 最終レスポンス: `[{"imageSummary": ...}, {団体}, ...]`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MatchResponse(Vec<ResponseItem>);

impl MatchResponse {
    pub fn new(image_summary: String, organizations: Vec<EnrichedResult>) -> Self {
        let mut items = Vec::with_capacity(organizations.len() + 1);
        items.push(ResponseItem::ImageSummary { image_summary });
        items.extend(organizations.into_iter().map(ResponseItem::Organization));
        Self(items)
    }

    pub fn image_summary(&self) -> &str {
        match self.0.first() {
            Some(ResponseItem::ImageSummary { image_summary }) => image_summary,
            _ => "",
        }
    }

    pub fn organizations(&self) -> Vec<&EnrichedResult> {
        self.0
            .iter()
            .filter_map(|item| match item {
                ResponseItem::Organization(result) => Some(result),
                ResponseItem::ImageSummary { .. } => None,
            })
            .collect()
    }

    pub fn items(&self) -> &[ResponseItem] {
        &self.0
    }
}
