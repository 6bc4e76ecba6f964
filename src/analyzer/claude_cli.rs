//! Claude CLI連携モジュール
//!
//! `claude -p <prompt> --output-format text` を子プロセスで実行する。
//! 画像解析では画像を一時ファイルに書き出し、そのパスをプロンプトで読ませる。

use super::{SpeciesAnalyzer, Summarizer};
use crate::error::{RescueMatchError, Result};
use crate::image_payload::ImagePayload;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::process::Command;
use tracing::{debug, warn};

pub struct ClaudeCli {
    program: String,
    temp_dir: PathBuf,
    counter: AtomicU64,
}

impl ClaudeCli {
    pub fn new() -> Self {
        Self {
            program: "claude".to_string(),
            temp_dir: std::env::temp_dir(),
            counter: AtomicU64::new(0),
        }
    }

    /// 実行するコマンド名を差し替える
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    fn temp_image_path(&self, image: &ImagePayload) -> PathBuf {
        let seq = self.counter.fetch_add(1, Ordering::Relaxed);
        self.temp_dir.join(format!(
            "rescue-match-{}-{}-{}.{}",
            std::process::id(),
            seq,
            image.digest(),
            image.file_extension()
        ))
    }

    async fn run(&self, prompt: &str) -> Result<String> {
        // Windowsではcmd /c経由（改行と引用符はcmdで分断されるため置換）
        #[cfg(windows)]
        let output = {
            let prompt = escape_for_cmd(prompt);
            Command::new("cmd")
                .args(["/c", &self.program, "-p", &prompt, "--output-format", "text"])
                .kill_on_drop(true)
                .output()
                .await
        };

        #[cfg(not(windows))]
        let output = Command::new(&self.program)
            .args(["-p", prompt, "--output-format", "text"])
            .kill_on_drop(true)
            .output()
            .await;

        let output = output.map_err(|e| {
            RescueMatchError::AnalysisFailure(format!("failed to run {}: {}", self.program, e))
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(RescueMatchError::AnalysisFailure(format!(
                "{} failed (code {:?}): {}",
                self.program,
                output.status.code(),
                stderr.trim()
            )));
        }

        let response = String::from_utf8_lossy(&output.stdout).to_string();
        if response.trim().is_empty() {
            return Err(RescueMatchError::AnalysisFailure(format!(
                "{} returned an empty response",
                self.program
            )));
        }

        let preview: String = response.chars().take(200).collect();
        debug!(chars = response.len(), %preview, "Claude CLI応答");
        Ok(response)
    }
}

impl Default for ClaudeCli {
    fn default() -> Self {
        Self::new()
    }
}

/// cmd /c に渡すプロンプトを1行にして引用符をエスケープ
#[cfg_attr(not(windows), allow(dead_code))]
fn escape_for_cmd(prompt: &str) -> String {
    prompt.replace('\n', " ").replace('"', "\\\"")
}

/// スコープを抜けると一時画像を削除する（リクエスト中断時も含む）
struct TempImage {
    path: PathBuf,
}

impl TempImage {
    async fn write(path: PathBuf, bytes: &[u8]) -> Result<Self> {
        let guard = Self { path };
        tokio::fs::write(&guard.path, bytes).await?;
        Ok(guard)
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempImage {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = %self.path.display(), error = %e, "一時ファイルの削除に失敗"),
        }
    }
}

#[async_trait]
impl SpeciesAnalyzer for ClaudeCli {
    async fn identify(&self, image: &ImagePayload, prompt: &str) -> Result<String> {
        let temp = TempImage::write(self.temp_image_path(image), image.bytes()).await?;

        let full_prompt = format!(
            "Read the following image file and analyze it: {}\n\n{}",
            temp.path().display().to_string().replace('\\', "/"),
            prompt
        );

        self.run(&full_prompt).await
    }
}

#[async_trait]
impl Summarizer for ClaudeCli {
    async fn summarize(&self, prompt: &str) -> Result<String> {
        self.run(prompt).await
    }
}
