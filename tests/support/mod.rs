//! テスト用のコラボレーター実装

#![allow(dead_code)]

use async_trait::async_trait;
use rescue_match::analyzer::{SpeciesAnalyzer, Summarizer};
use rescue_match::directory::{DirectoryEntry, JsonDirectory, OrganizationDirectory, OrganizationEnricher};
use rescue_match::error::{RescueMatchError, Result};
use rescue_match::image_payload::ImagePayload;
use rescue_match::pipeline::MatchPipeline;
use rescue_match::proximity::{HaversineProximity, ProximityFilter};
use rescue_match_common::{
    ClosestOrg, Coordinate, GeoCandidate, OrganizationProfile, OrganizationSummary, ProfileLookup,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// 画像解析: 画像ごとに関数で応答を作る
pub struct FnAnalyzer<F>(pub F);

#[async_trait]
impl<F> SpeciesAnalyzer for FnAnalyzer<F>
where
    F: Fn(&ImagePayload) -> Result<String> + Send + Sync,
{
    async fn identify(&self, image: &ImagePayload, _prompt: &str) -> Result<String> {
        tokio::task::yield_now().await;
        (self.0)(image)
    }
}

pub fn static_analyzer(text: &str) -> Arc<dyn SpeciesAnalyzer> {
    let text = text.to_string();
    Arc::new(FnAnalyzer(move |_: &ImagePayload| -> Result<String> { Ok(text.clone()) }))
}

/// 要約/ランキング: 受け取ったプロンプトを記録し、関数で応答を作る
pub struct ScriptedSummarizer<F> {
    respond: F,
    pub prompts: Mutex<Vec<String>>,
}

impl<F> ScriptedSummarizer<F>
where
    F: Fn(&str) -> Result<String> + Send + Sync,
{
    pub fn new(respond: F) -> Self {
        Self {
            respond,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl<F> Summarizer for ScriptedSummarizer<F>
where
    F: Fn(&str) -> Result<String> + Send + Sync,
{
    async fn summarize(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        tokio::task::yield_now().await;
        (self.respond)(prompt)
    }
}

/// ランキングプロンプトかどうか
pub fn is_ranking_prompt(prompt: &str) -> bool {
    prompt.contains("\"rankings\"")
}

/// 要約とランキングで固定の応答を返す
pub fn two_step_summarizer(
    condensed: &str,
    ranking: &str,
) -> Arc<ScriptedSummarizer<impl Fn(&str) -> Result<String> + Send + Sync>> {
    let condensed = condensed.to_string();
    let ranking = ranking.to_string();
    Arc::new(ScriptedSummarizer::new(move |prompt: &str| {
        if is_ranking_prompt(prompt) {
            Ok(ranking.clone())
        } else {
            Ok(condensed.clone())
        }
    }))
}

/// 呼び出し回数を数えるエンリッチャー
pub struct CountingEnricher<E> {
    pub inner: E,
    pub calls: AtomicUsize,
}

impl<E> CountingEnricher<E> {
    pub fn new(inner: E) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<E: OrganizationEnricher> OrganizationEnricher for CountingEnricher<E> {
    async fn fetch_profiles(&self, names: &[String]) -> Result<Vec<ProfileLookup>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.fetch_profiles(names).await
    }
}

/// 常に失敗するディレクトリ/エンリッチャー
pub struct FailingDirectory(pub fn() -> RescueMatchError);

#[async_trait]
impl OrganizationDirectory for FailingDirectory {
    async fn summaries(&self) -> Result<Vec<OrganizationSummary>> {
        Err((self.0)())
    }
}

#[async_trait]
impl OrganizationEnricher for FailingDirectory {
    async fn fetch_profiles(&self, _names: &[String]) -> Result<Vec<ProfileLookup>> {
        Err((self.0)())
    }
}

/// 入力候補を記録する近接フィルタ
pub struct RecordingProximity {
    inner: HaversineProximity,
    pub seen: Mutex<Vec<String>>,
}

impl RecordingProximity {
    pub fn new(max_results: usize) -> Self {
        Self {
            inner: HaversineProximity::new(max_results),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProximityFilter for RecordingProximity {
    async fn closest(
        &self,
        candidates: &[GeoCandidate],
        reference: Coordinate,
    ) -> Result<Vec<ClosestOrg>> {
        self.seen
            .lock()
            .unwrap()
            .extend(candidates.iter().map(|c| c.name.clone()));
        self.inner.closest(candidates, reference).await
    }
}

/// 入力に関係なく決まった順序を返す近接フィルタ
pub struct FixedProximity(pub Vec<ClosestOrg>);

#[async_trait]
impl ProximityFilter for FixedProximity {
    async fn closest(
        &self,
        _candidates: &[GeoCandidate],
        _reference: Coordinate,
    ) -> Result<Vec<ClosestOrg>> {
        Ok(self.0.clone())
    }
}

pub fn entry(name: &str, summary: &str, coordinate: Option<Coordinate>) -> DirectoryEntry {
    DirectoryEntry {
        profile: OrganizationProfile {
            name: name.to_string(),
            address: Some(format!("1 {} Lane", name)),
            coordinate,
            contact_number: Some("+44 20 7946 0000".to_string()),
            email_address: Some(format!("help@{}.example", name.to_lowercase().replace(' ', "-"))),
            website: Some(format!("https://{}.example", name.to_lowercase().replace(' ', "-"))),
            focus_area: Some("Wildlife rehabilitation".to_string()),
            operating_hours: Some("24/7".to_string()),
            emergency_response: true,
        },
        summary: summary.to_string(),
    }
}

/// 北へ約 `km` キロ移動した座標
pub fn north_of(origin: Coordinate, km: f64) -> Coordinate {
    Coordinate::new(origin.latitude + km / 111.195, origin.longitude)
}

pub const LONDON: Coordinate = Coordinate {
    latitude: 51.5074,
    longitude: -0.1278,
};

pub fn fox_directory() -> JsonDirectory {
    JsonDirectory::new(vec![
        entry("Fox Rescue", "Urban fox rescue and rehabilitation", Some(north_of(LONDON, 2.0))),
        entry("Whale Watch", "Marine mammal stranding response", Some(north_of(LONDON, 40.0))),
    ])
}

pub const FENCED_FOX_RANKING: &str = "```json\n{\"rankings\":[{\"name\":\"Fox Rescue\",\"reason\":\"Specialises in foxes\"}]}\n```";

pub fn fox_image() -> ImagePayload {
    ImagePayload::new("image/jpeg", b"red fox photo".to_vec())
}

pub fn pipeline(
    analyzer: Arc<dyn SpeciesAnalyzer>,
    summarizer: Arc<dyn Summarizer>,
    directory: Arc<dyn OrganizationDirectory>,
    enricher: Arc<dyn OrganizationEnricher>,
    proximity: Arc<dyn ProximityFilter>,
) -> MatchPipeline {
    MatchPipeline::new(analyzer, summarizer, directory, enricher, proximity)
}

pub fn fox_pipeline() -> MatchPipeline {
    let directory = Arc::new(fox_directory());
    pipeline(
        static_analyzer("Red Fox: Vulpes vulpes, appears uninjured."),
        two_step_summarizer("Canid, omnivore, urban-adapted", FENCED_FOX_RANKING),
        directory.clone(),
        directory,
        Arc::new(HaversineProximity::new(5)),
    )
}
