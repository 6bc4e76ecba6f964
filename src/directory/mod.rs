//! 団体ディレクトリ
//!
//! - OrganizationDirectory: ランキングプロンプト用の概要一覧（読み取り専用）
//! - OrganizationEnricher: 団体名 → 詳細プロフィール（またはエラーマーカー）

mod json_file;

pub use json_file::{DirectoryEntry, JsonDirectory};

use crate::error::Result;
use async_trait::async_trait;
use rescue_match_common::{OrganizationSummary, ProfileLookup};

#[async_trait]
pub trait OrganizationDirectory: Send + Sync {
    async fn summaries(&self) -> Result<Vec<OrganizationSummary>>;
}

#[async_trait]
pub trait OrganizationEnricher: Send + Sync {
    /// 名前ごとに1件ずつ、入力と同じ順で返す
    async fn fetch_profiles(&self, names: &[String]) -> Result<Vec<ProfileLookup>>;
}
