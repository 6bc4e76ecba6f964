pub mod ai_provider;
pub mod analyzer;
pub mod cli;
pub mod config;
pub mod directory;
pub mod error;
pub mod image_payload;
pub mod pipeline;
pub mod proximity;
pub mod server;

use analyzer::build_models;
use config::Config;
use directory::JsonDirectory;
use error::Result;
use pipeline::MatchPipeline;
use proximity::HaversineProximity;
use std::path::Path;
use std::sync::Arc;

/// 設定からパイプラインを組み立てる
pub fn build_pipeline(
    config: &Config,
    provider: ai_provider::AiProvider,
    directory_path: &Path,
) -> Result<MatchPipeline> {
    let (analyzer, summarizer) = build_models(provider, config)?;
    let directory = Arc::new(JsonDirectory::load(directory_path)?);
    let proximity = Arc::new(HaversineProximity::new(config.max_results));

    Ok(MatchPipeline::new(
        analyzer,
        summarizer,
        directory.clone(),
        directory,
        proximity,
    )
    .with_max_image_size(config.max_image_size))
}
