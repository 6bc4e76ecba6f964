use crate::ai_provider::AiProvider;
use crate::error::{RescueMatchError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_key: Option<String>,
    pub model: String,
    pub ai_provider: AiProvider,
    pub max_image_size: u32,
    pub directory_path: PathBuf,
    pub bind_addr: String,
    pub max_results: usize,
    pub max_body_bytes: usize,
    pub timeout_seconds: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gemini-2.0-flash".into(),
            ai_provider: AiProvider::Gemini,
            max_image_size: 1568,
            directory_path: PathBuf::from("organizations.json"),
            bind_addr: "0.0.0.0:3000".into(),
            max_results: 5,
            max_body_bytes: 20 * 1024 * 1024,
            timeout_seconds: 120,
        }
    }
}

impl Config {
    /// 設定ファイル + 環境変数（.env含む）から読み込み
    pub fn load() -> Result<Self> {
        let _ = dotenvy::dotenv();

        let config_path = Self::config_path()?;
        let config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            serde_json::from_str(&content)?
        } else {
            Self::default()
        };

        Ok(config.with_env_overrides())
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| RescueMatchError::Config("home directory not found".into()))?;
        Ok(home.join(".config").join("rescue-match").join("config.json"))
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(path) = std::env::var("RESCUE_MATCH_DIRECTORY") {
            if !path.trim().is_empty() {
                self.directory_path = PathBuf::from(path);
            }
        }
        if let Ok(addr) = std::env::var("RESCUE_MATCH_BIND") {
            if !addr.trim().is_empty() {
                self.bind_addr = addr;
            }
        }
        self
    }

    pub fn get_api_key(&self) -> Result<String> {
        // 環境変数を優先
        if let Ok(key) = std::env::var("GEMINI_API_KEY") {
            if !key.trim().is_empty() {
                return Ok(key);
            }
        }

        self.api_key.clone().ok_or(RescueMatchError::MissingApiKey)
    }

    pub fn set_api_key(&mut self, key: String) -> Result<()> {
        self.api_key = Some(key);
        self.save()
    }
}
