//! マッチングパイプライン
//!
//! 1リクエスト = 1本の直列チェーン:
//! 画像解析 → 要約 → ディレクトリ取得 → ランキング → 契約パース
//! → プロフィール取得 → 近接フィルタ → マージ
//!
//! どの段階の失敗もその場で中断し、呼び出し元へそのまま返す。
//! 許容する劣化は「座標なしの団体を除外」と「プロフィール不一致の団体を素のまま返す」の2つだけ。

use crate::analyzer::{SpeciesAnalyzer, Summarizer};
use crate::directory::{OrganizationDirectory, OrganizationEnricher};
use crate::error::{RescueMatchError, Result};
use crate::image_payload::ImagePayload;
use crate::proximity::ProximityFilter;
use rescue_match_common::{
    build_condense_prompt, build_ranking_prompt, build_response, geo_candidates,
    parse_ranking_response, Coordinate, MatchResponse, SPECIES_IDENTIFICATION_PROMPT,
};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

#[derive(Clone)]
pub struct MatchPipeline {
    analyzer: Arc<dyn SpeciesAnalyzer>,
    summarizer: Arc<dyn Summarizer>,
    directory: Arc<dyn OrganizationDirectory>,
    enricher: Arc<dyn OrganizationEnricher>,
    proximity: Arc<dyn ProximityFilter>,
    max_image_size: Option<u32>,
}

impl MatchPipeline {
    pub fn new(
        analyzer: Arc<dyn SpeciesAnalyzer>,
        summarizer: Arc<dyn Summarizer>,
        directory: Arc<dyn OrganizationDirectory>,
        enricher: Arc<dyn OrganizationEnricher>,
        proximity: Arc<dyn ProximityFilter>,
    ) -> Self {
        Self {
            analyzer,
            summarizer,
            directory,
            enricher,
            proximity,
            max_image_size: None,
        }
    }

    /// 画像解析の前に長辺を `max_side` 以下へ縮小する
    pub fn with_max_image_size(mut self, max_side: u32) -> Self {
        self.max_image_size = Some(max_side);
        self
    }

    #[instrument(
        name = "match_pipeline",
        skip_all,
        fields(caller = caller_id.unwrap_or("-"), image = %image.digest())
    )]
    pub async fn run(
        &self,
        image: &ImagePayload,
        location: Coordinate,
        caller_id: Option<&str>,
    ) -> Result<MatchResponse> {
        info!(latitude = location.latitude, longitude = location.longitude, "マッチング開始");

        // 1. 画像解析
        let image = match self.max_image_size {
            Some(max_side) => image.downscaled(max_side)?,
            None => image.clone(),
        };
        let species_info = self
            .analyzer
            .identify(&image, SPECIES_IDENTIFICATION_PROMPT)
            .await
            .map_err(|e| reclassify(e, RescueMatchError::AnalysisFailure))?;
        ensure_text(&species_info, "species identification")?;
        debug!(chars = species_info.len(), "画像解析完了");

        // 2. 照合用に要約
        let condense_prompt = build_condense_prompt(&species_info);
        let animal_summary = self
            .summarizer
            .summarize(&condense_prompt)
            .await
            .map_err(|e| reclassify(e, RescueMatchError::AnalysisFailure))?;
        ensure_text(&animal_summary, "species summary")?;
        debug!(chars = animal_summary.len(), "要約完了");

        // 3. ディレクトリのスナップショット
        let organizations = self
            .directory
            .summaries()
            .await
            .map_err(|e| reclassify(e, RescueMatchError::DirectoryUnavailable))?;
        debug!(organizations = organizations.len(), "ディレクトリ取得完了");

        // 4. ランキング
        let ranking_prompt = build_ranking_prompt(&animal_summary, &organizations)?;
        let ranking_text = self
            .summarizer
            .summarize(&ranking_prompt)
            .await
            .map_err(|e| reclassify(e, RescueMatchError::AnalysisFailure))?;
        let contract = parse_ranking_response(&ranking_text)?;
        let names = contract.candidate_names();
        info!(candidates = names.len(), "ランキング完了");

        if names.is_empty() {
            warn!("ランキングに候補がないため団体なしで返却");
            return Ok(build_response(&species_info, &[], &[]));
        }

        // 5. プロフィール取得
        let lookups = self
            .enricher
            .fetch_profiles(&names)
            .await
            .map_err(|e| reclassify(e, RescueMatchError::EnrichmentFailure))?;
        let missing = lookups.iter().filter(|l| l.is_missing()).count();
        if missing > 0 {
            warn!(missing, "一部の団体のプロフィールが取得できませんでした");
        }

        // 6. 近接フィルタ（座標のある団体のみ）
        let candidates = geo_candidates(&lookups);
        if candidates.len() < lookups.len() {
            debug!(
                dropped = lookups.len() - candidates.len(),
                "座標のない団体を距離計算から除外"
            );
        }
        let closest = self
            .proximity
            .closest(&candidates, location)
            .await
            .map_err(|e| reclassify(e, RescueMatchError::ProximityFailure))?;

        // 7. マージ
        let response = build_response(&species_info, &closest, &lookups);
        info!(organizations = response.organizations().len(), "マッチング完了");
        Ok(response)
    }
}

fn ensure_text(text: &str, stage: &str) -> Result<()> {
    if text.trim().is_empty() {
        return Err(RescueMatchError::AnalysisFailure(format!("{} returned no text", stage)));
    }
    Ok(())
}

/// 外部コラボレーターのエラーを段階ごとの分類に寄せる（同じ分類ならそのまま）
fn reclassify(err: RescueMatchError, wrap: fn(String) -> RescueMatchError) -> RescueMatchError {
    let target = wrap(String::new());
    if std::mem::discriminant(&err) == std::mem::discriminant(&target) {
        err
    } else {
        wrap(err.to_string())
    }
}
