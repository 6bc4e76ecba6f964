//! AIモデル連携
//!
//! - SpeciesAnalyzer: 画像 + 固定プロンプト → 種・ケア情報
//! - Summarizer: プロンプト → テキスト（要約とランキングの2回使う）
//!
//! 実装は Gemini API（HTTP）と Claude CLI の2種類。

mod claude_cli;
mod gemini;

pub use claude_cli::ClaudeCli;
pub use gemini::GeminiClient;

use crate::ai_provider::AiProvider;
use crate::config::Config;
use crate::error::Result;
use crate::image_payload::ImagePayload;
use async_trait::async_trait;
use std::sync::Arc;

/// 画像から種を特定する外部モデル
#[async_trait]
pub trait SpeciesAnalyzer: Send + Sync {
    async fn identify(&self, image: &ImagePayload, prompt: &str) -> Result<String>;
}

/// テキストを要約・ランキングする外部モデル
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, prompt: &str) -> Result<String>;
}

/// 設定のプロバイダに応じてモデル実装を構築
pub fn build_models(
    provider: AiProvider,
    config: &Config,
) -> Result<(Arc<dyn SpeciesAnalyzer>, Arc<dyn Summarizer>)> {
    match provider {
        AiProvider::Gemini => {
            let client = Arc::new(GeminiClient::new(
                config.get_api_key()?,
                config.model.clone(),
                config.timeout_seconds,
            )?);
            Ok((client.clone(), client))
        }
        AiProvider::Claude => {
            let cli = Arc::new(ClaudeCli::new());
            Ok((cli.clone(), cli))
        }
    }
}
