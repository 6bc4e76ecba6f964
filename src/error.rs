use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RescueMatchError {
    #[error("位置情報の形式が不正: {0}")]
    MalformedLocation(String),

    #[error("位置情報の型が不正: {0}")]
    InvalidLocationType(String),

    #[error("リクエストボディが不正: {0}")]
    InvalidRequestBody(String),

    #[error("画像が不正: {0}")]
    InvalidImage(String),

    #[error("AI解析エラー: {0}")]
    AnalysisFailure(String),

    #[error("ランキング応答が形式に違反: {0}")]
    RankingContractViolation(String),

    #[error("団体ディレクトリを利用できません: {0}")]
    DirectoryUnavailable(String),

    #[error("団体プロフィールの取得に失敗: {0}")]
    EnrichmentFailure(String),

    #[error("距離計算エラー: {0}")]
    ProximityFailure(String),

    #[error("設定エラー: {0}")]
    Config(String),

    #[error("APIキーが設定されていません。`rescue-match config --set-api-key YOUR_KEY` で設定するか、環境変数 GEMINI_API_KEY を設定してください")]
    MissingApiKey,

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RescueMatchError>;

impl RescueMatchError {
    /// レスポンスボディの `kind`
    pub fn kind(&self) -> &'static str {
        match self {
            RescueMatchError::MalformedLocation(_) => "malformed_location",
            RescueMatchError::InvalidLocationType(_) => "invalid_location_type",
            RescueMatchError::InvalidRequestBody(_) => "invalid_request_body",
            RescueMatchError::InvalidImage(_) => "invalid_image",
            RescueMatchError::AnalysisFailure(_) => "analysis_failure",
            RescueMatchError::RankingContractViolation(_) => "ranking_contract_violation",
            RescueMatchError::DirectoryUnavailable(_) => "directory_unavailable",
            RescueMatchError::EnrichmentFailure(_) => "enrichment_failure",
            RescueMatchError::ProximityFailure(_) => "proximity_failure",
            RescueMatchError::Config(_) | RescueMatchError::MissingApiKey => "config",
            RescueMatchError::JsonParse(_) => "json",
            RescueMatchError::Io(_) => "io",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            RescueMatchError::MalformedLocation(_)
            | RescueMatchError::InvalidLocationType(_)
            | RescueMatchError::InvalidRequestBody(_)
            | RescueMatchError::InvalidImage(_) => StatusCode::BAD_REQUEST,
            RescueMatchError::AnalysisFailure(_)
            | RescueMatchError::RankingContractViolation(_)
            | RescueMatchError::EnrichmentFailure(_)
            | RescueMatchError::ProximityFailure(_) => StatusCode::BAD_GATEWAY,
            RescueMatchError::DirectoryUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            RescueMatchError::Config(_)
            | RescueMatchError::MissingApiKey
            | RescueMatchError::JsonParse(_)
            | RescueMatchError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<rescue_match_common::Error> for RescueMatchError {
    fn from(err: rescue_match_common::Error) -> Self {
        use rescue_match_common::Error as CommonError;

        match err {
            CommonError::MalformedLocation(msg) => RescueMatchError::MalformedLocation(msg),
            CommonError::InvalidLocationType(msg) => RescueMatchError::InvalidLocationType(msg),
            CommonError::RankingContract(msg) => RescueMatchError::RankingContractViolation(msg),
            CommonError::Json(e) => RescueMatchError::JsonParse(e),
            CommonError::Config(msg) => RescueMatchError::Config(msg),
        }
    }
}

impl IntoResponse for RescueMatchError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(kind = self.kind(), error = %self, "Request failed");
        } else {
            tracing::warn!(kind = self.kind(), error = %self, "Request rejected");
        }

        let body = Json(json!({
            "error": self.to_string(),
            "kind": self.kind(),
        }));

        (status, body).into_response()
    }
}
