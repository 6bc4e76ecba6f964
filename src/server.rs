//! HTTPサーバー
//!
//! - POST /api/match: `{ image, location }` → マッチング結果の配列
//! - GET  /health

use crate::error::{RescueMatchError, Result};
use crate::image_payload::ImagePayload;
use crate::pipeline::MatchPipeline;
use axum::extract::rejection::JsonRejection;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::HeaderMap;
use axum::routing::{get, post};
use axum::{Json, Router};
use rescue_match_common::{parse_location, MatchResponse};
use serde::Deserialize;
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;
use tracing::info;

/// 相関ログ用の呼び出し元ID（制御には使わない）
pub const CALLER_ID_HEADER: &str = "x-firebase-id";

#[derive(Clone)]
pub struct AppState {
    pub pipeline: MatchPipeline,
}

/// リクエストボディ
#[derive(Debug, Deserialize)]
pub struct MatchRequestBody {
    /// data URL または base64（null は空として扱う）
    #[serde(default)]
    pub image: Option<String>,
    /// JSON文字列 または オブジェクト
    #[serde(default)]
    pub location: Value,
}

pub fn create_router(state: AppState, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/api/match", post(match_animal))
        .route("/health", get(health))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn match_animal(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: std::result::Result<Json<MatchRequestBody>, JsonRejection>,
) -> Result<Json<MatchResponse>> {
    let Json(body) =
        body.map_err(|rejection| RescueMatchError::InvalidRequestBody(rejection.body_text()))?;
    let caller_id = headers
        .get(CALLER_ID_HEADER)
        .and_then(|value| value.to_str().ok());
    info!(caller = caller_id.unwrap_or("-"), "マッチングリクエスト受信");

    let location = parse_location(&body.location)?;
    let image = ImagePayload::from_request_field(body.image.as_deref().unwrap_or_default())?;

    let response = state.pipeline.run(&image, location, caller_id).await?;
    Ok(Json(response))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// サーバーを起動（終了までブロック）
pub async fn serve(router: Router, bind_addr: &str) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, router).await?;
    Ok(())
}
