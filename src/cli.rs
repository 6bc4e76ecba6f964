use clap::{Parser, Subcommand};
use crate::ai_provider::AiProvider;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rescue-match")]
#[command(about = "動物写真から最寄りの保護団体を探すマッチングサーバー", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// AIプロバイダ (gemini/claude)。省略時は設定ファイルの値
    #[arg(long, global = true)]
    pub ai_provider: Option<AiProvider>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// HTTPサーバーを起動
    Serve {
        /// 待ち受けアドレス（例: 0.0.0.0:3000）
        #[arg(short, long)]
        bind: Option<String>,

        /// 団体ディレクトリJSONファイル
        #[arg(short, long)]
        directory: Option<PathBuf>,
    },

    /// 画像1枚でマッチングを実行してJSONを出力
    Match {
        /// 画像ファイルのパス
        #[arg(required = true)]
        image: PathBuf,

        /// 位置情報JSON（例: '{"latitude": 51.5, "longitude": -0.12}'）
        #[arg(short, long)]
        location: String,

        /// 団体ディレクトリJSONファイル
        #[arg(short, long)]
        directory: Option<PathBuf>,

        /// 出力JSONファイル（省略時は標準出力）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 設定を表示/編集
    Config {
        /// APIキーを設定
        #[arg(long)]
        set_api_key: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },

    /// 団体ディレクトリを読み込んで一覧表示
    Directory {
        /// 団体ディレクトリJSONファイル
        #[arg(short, long)]
        directory: Option<PathBuf>,
    },
}
