//! リクエストの画像ペイロード
//!
//! `image` フィールドは Data URL（`data:image/png;base64,...`）または
//! 生のBase64文字列で届く。デコードしてモデルへ送る前に縮小する。

use crate::error::{RescueMatchError, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::{DynamicImage, GenericImageView, ImageFormat};
use regex::Regex;
use sha2::{Digest, Sha256};
use std::io::Cursor;
use std::path::Path;

const DEFAULT_MIME_TYPE: &str = "image/jpeg";

lazy_static::lazy_static! {
    // data:<mime>[;param...];base64,<data>
    static ref DATA_URL_RE: Regex =
        Regex::new(r"(?s)^data:(?P<mime>[\w.+-]+/[\w.+-]+)?(?:;[\w.=-]+)*;base64,(?P<data>.*)$").unwrap();
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImagePayload {
    mime_type: String,
    bytes: Vec<u8>,
}

impl ImagePayload {
    pub fn new(mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// リクエストボディの `image` 文字列からデコード
    pub fn from_request_field(field: &str) -> Result<Self> {
        let field = field.trim();
        if field.is_empty() {
            return Err(RescueMatchError::InvalidImage("image is empty".into()));
        }

        let (mime_type, data) = match DATA_URL_RE.captures(field) {
            Some(caps) => {
                let mime = caps
                    .name("mime")
                    .map(|m| m.as_str())
                    .unwrap_or(DEFAULT_MIME_TYPE);
                let data = caps.name("data").map(|m| m.as_str()).unwrap_or_default();
                (mime.to_string(), data)
            }
            None if field.starts_with("data:") => {
                return Err(RescueMatchError::InvalidImage(
                    "data URL must be base64 encoded".into(),
                ))
            }
            None => (DEFAULT_MIME_TYPE.to_string(), field),
        };

        let compact: String = data.chars().filter(|c| !c.is_whitespace()).collect();
        let bytes = STANDARD
            .decode(compact.as_bytes())
            .map_err(|e| RescueMatchError::InvalidImage(format!("invalid base64: {}", e)))?;

        if bytes.is_empty() {
            return Err(RescueMatchError::InvalidImage("image data is empty".into()));
        }

        Ok(Self { mime_type, bytes })
    }

    /// ローカルファイルから読み込み（CLI用）
    pub fn from_file(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let mime_type = ImageFormat::from_path(path)
            .map(|format| format.to_mime_type())
            .unwrap_or(DEFAULT_MIME_TYPE);
        Ok(Self::new(mime_type, bytes))
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.bytes)
    }

    pub fn file_extension(&self) -> &'static str {
        ImageFormat::from_mime_type(&self.mime_type)
            .and_then(|format| format.extensions_str().first().copied())
            .unwrap_or("jpg")
    }

    /// ログ相関用の短いダイジェスト（SHA-256先頭12桁）
    pub fn digest(&self) -> String {
        let hash = Sha256::digest(&self.bytes);
        hex::encode(hash)[..12].to_string()
    }

    /// 長辺が `max_side` を超える場合は縮小してJPEGに再エンコード
    pub fn downscaled(&self, max_side: u32) -> Result<Self> {
        let img = image::load_from_memory(&self.bytes)
            .map_err(|e| RescueMatchError::InvalidImage(format!("cannot decode image: {}", e)))?;

        let (width, height) = img.dimensions();
        if width.max(height) <= max_side {
            return Ok(self.clone());
        }

        let resized = img.resize(max_side, max_side, image::imageops::FilterType::Triangle);
        // JPEGはアルファなし
        let rgb = DynamicImage::ImageRgb8(resized.to_rgb8());

        let mut buffer = Vec::new();
        rgb.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Jpeg)
            .map_err(|e| RescueMatchError::InvalidImage(format!("cannot encode image: {}", e)))?;

        tracing::debug!(
            from = %format!("{}x{}", width, height),
            to = %format!("{}x{}", rgb.width(), rgb.height()),
            "画像を縮小"
        );

        Ok(Self::new(ImageFormat::Jpeg.to_mime_type(), buffer))
    }
}
