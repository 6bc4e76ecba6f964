//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("位置情報の形式が不正: {0}")]
    MalformedLocation(String),

    #[error("位置情報の型が不正: {0}")]
    InvalidLocationType(String),

    #[error("ランキング応答が形式に違反: {0}")]
    RankingContract(String),

    #[error("JSON解析エラー: {0}")]
    Json(#[from] serde_json::Error),

    #[error("設定エラー: {0}")]
    Config(String),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
