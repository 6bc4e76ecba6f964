//! エラーケーステスト
//!
//! 各種エラー条件でのエラーハンドリングを検証

use axum::http::StatusCode;
use rescue_match::config::Config;
use rescue_match::error::RescueMatchError;
use rescue_match::image_payload::ImagePayload;
use rescue_match_common::parse_location;
use serde_json::json;

/// RescueMatchErrorのDisplay実装確認
#[test]
fn test_error_display() {
    let errors = vec![
        RescueMatchError::MalformedLocation("missing `latitude`".to_string()),
        RescueMatchError::InvalidLocationType("got number".to_string()),
        RescueMatchError::InvalidRequestBody("expected value".to_string()),
        RescueMatchError::InvalidImage("empty".to_string()),
        RescueMatchError::AnalysisFailure("timeout".to_string()),
        RescueMatchError::RankingContractViolation("not JSON".to_string()),
        RescueMatchError::DirectoryUnavailable("offline".to_string()),
        RescueMatchError::EnrichmentFailure("lookup failed".to_string()),
        RescueMatchError::ProximityFailure("overflow".to_string()),
        RescueMatchError::Config("bad config".to_string()),
        RescueMatchError::MissingApiKey,
    ];

    for err in errors {
        let display = format!("{}", err);
        assert!(!display.is_empty(), "Error display should not be empty");
        assert!(!err.kind().is_empty());
    }
}

/// 入力由来のエラーは 400
#[test]
fn test_input_errors_are_bad_request() {
    for err in [
        RescueMatchError::MalformedLocation("x".into()),
        RescueMatchError::InvalidLocationType("x".into()),
        RescueMatchError::InvalidRequestBody("x".into()),
        RescueMatchError::InvalidImage("x".into()),
    ] {
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST, "{}", err.kind());
    }
}

/// 上流の失敗は 502 / 503
#[test]
fn test_upstream_errors_status() {
    assert_eq!(
        RescueMatchError::AnalysisFailure("x".into()).status_code(),
        StatusCode::BAD_GATEWAY
    );
    assert_eq!(
        RescueMatchError::RankingContractViolation("x".into()).status_code(),
        StatusCode::BAD_GATEWAY
    );
    assert_eq!(
        RescueMatchError::EnrichmentFailure("x".into()).status_code(),
        StatusCode::BAD_GATEWAY
    );
    assert_eq!(
        RescueMatchError::DirectoryUnavailable("x".into()).status_code(),
        StatusCode::SERVICE_UNAVAILABLE
    );
    assert_eq!(
        RescueMatchError::MissingApiKey.status_code(),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}

/// 共通ライブラリのエラーが対応する分類に変換される
#[test]
fn test_common_error_conversion() {
    let err: RescueMatchError = parse_location(&json!(true)).unwrap_err().into();
    assert!(matches!(err, RescueMatchError::InvalidLocationType(_)));
    assert_eq!(err.kind(), "invalid_location_type");

    let err: RescueMatchError = parse_location(&json!("[1, 2]")).unwrap_err().into();
    assert!(matches!(err, RescueMatchError::MalformedLocation(_)));

    let err: RescueMatchError = rescue_match_common::parse_ranking_response("no json here")
        .unwrap_err()
        .into();
    assert!(matches!(err, RescueMatchError::RankingContractViolation(_)));
}

/// IOエラーからの変換
#[test]
fn test_io_error_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err: RescueMatchError = io_err.into();

    assert!(matches!(err, RescueMatchError::Io(_)));
    assert!(format!("{}", err).contains("file not found"));
}

/// JSONパースエラーからの変換
#[test]
fn test_json_error_conversion() {
    let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
    let err: RescueMatchError = json_err.into();

    assert!(matches!(err, RescueMatchError::JsonParse(_)));
}

/// 存在しない画像ファイル
#[test]
fn test_missing_image_file() {
    let result = ImagePayload::from_file(std::path::Path::new("/nonexistent/fox-12345.jpg"));
    assert!(matches!(result, Err(RescueMatchError::Io(_))));
}

/// APIキー未設定のメッセージに設定方法が含まれる
#[test]
fn test_missing_api_key_message() {
    let message = RescueMatchError::MissingApiKey.to_string();
    assert!(message.contains("--set-api-key"));
    assert!(message.contains("GEMINI_API_KEY"));

    // 環境変数があればそちらが優先されるため、未設定の場合のみ検証
    if std::env::var("GEMINI_API_KEY").is_err() {
        let config = Config::default();
        assert!(matches!(config.get_api_key(), Err(RescueMatchError::MissingApiKey)));
    }
}
