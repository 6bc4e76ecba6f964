//! JSONファイルのディレクトリ
//!
//! 起動時に団体一覧（JSON配列）を読み込み、メモリ上のスナップショットから応答する。

use super::{OrganizationDirectory, OrganizationEnricher};
use crate::error::{RescueMatchError, Result};
use async_trait::async_trait;
use rescue_match_common::{OrganizationProfile, OrganizationSummary, ProfileLookup};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// ディレクトリファイルの1エントリ（プロフィール + 概要）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DirectoryEntry {
    #[serde(flatten)]
    pub profile: OrganizationProfile,
    #[serde(default)]
    pub summary: String,
}

#[derive(Debug, Clone, Default)]
pub struct JsonDirectory {
    entries: Arc<Vec<DirectoryEntry>>,
}

impl JsonDirectory {
    pub fn new(entries: Vec<DirectoryEntry>) -> Self {
        Self {
            entries: Arc::new(entries),
        }
    }

    /// JSONファイルから読み込み
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(RescueMatchError::DirectoryUnavailable(format!(
                "directory file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let directory = Self::from_json_str(&content)?;
        info!(path = %path.display(), organizations = directory.len(), "ディレクトリ読み込み完了");
        Ok(directory)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let entries: Vec<DirectoryEntry> = serde_json::from_str(content).map_err(|e| {
            RescueMatchError::DirectoryUnavailable(format!("invalid directory JSON: {}", e))
        })?;
        Ok(Self::new(entries))
    }

    pub fn entries(&self) -> &[DirectoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 完全一致 → 前後空白を除いた大文字小文字無視の一致 の順で検索
    fn find(&self, name: &str) -> Option<&DirectoryEntry> {
        self.entries
            .iter()
            .find(|e| e.profile.name == name)
            .or_else(|| {
                let wanted = name.trim().to_lowercase();
                self.entries
                    .iter()
                    .find(|e| e.profile.name.trim().to_lowercase() == wanted)
            })
    }
}

#[async_trait]
impl OrganizationDirectory for JsonDirectory {
    async fn summaries(&self) -> Result<Vec<OrganizationSummary>> {
        Ok(self
            .entries
            .iter()
            .map(|e| OrganizationSummary {
                name: e.profile.name.clone(),
                summary: e.summary.clone(),
            })
            .collect())
    }
}

#[async_trait]
impl OrganizationEnricher for JsonDirectory {
    async fn fetch_profiles(&self, names: &[String]) -> Result<Vec<ProfileLookup>> {
        let lookups = names
            .iter()
            .map(|name| match self.find(name) {
                Some(entry) => ProfileLookup::Found(entry.profile.clone()),
                None => {
                    debug!(organization = %name, "ディレクトリに存在しない団体名");
                    ProfileLookup::Missing {
                        name: name.clone(),
                        error: "Organization not found".to_string(),
                    }
                }
            })
            .collect();
        Ok(lookups)
    }
}
