//! 位置情報パーサー
//!
//! リクエストボディの `location` は JSON文字列 または オブジェクトのどちらでも届く。
//! どちらの形式でも同じ Coordinate に正規化する。

use crate::error::{Error, Result};
use crate::types::Coordinate;
use serde_json::Value;

/// `location` フィールドを Coordinate に変換
///
/// - 文字列: JSONとしてパース（失敗時は MalformedLocation）
/// - オブジェクト: そのまま latitude/longitude を取り出す
/// - それ以外（null、数値、配列など）: InvalidLocationType
///
/// 緯度経度の範囲チェックは行わない。
///
/// # Examples
/// ```
/// use rescue_match_common::parse_location;
/// use serde_json::json;
///
/// let from_text = parse_location(&json!("{\"latitude\": 12.5, \"longitude\": 77.6}")).unwrap();
/// let from_object = parse_location(&json!({"latitude": 12.5, "longitude": 77.6})).unwrap();
/// assert_eq!(from_text, from_object);
/// ```
pub fn parse_location(value: &Value) -> Result<Coordinate> {
    match value {
        Value::String(text) => {
            let parsed: Value = serde_json::from_str(text)
                .map_err(|e| Error::MalformedLocation(format!("invalid JSON in location: {}", e)))?;
            match &parsed {
                Value::Object(_) => extract_coordinate(&parsed),
                other => Err(Error::MalformedLocation(format!(
                    "location JSON must be an object, got {}",
                    type_name(other)
                ))),
            }
        }
        Value::Object(_) => extract_coordinate(value),
        other => Err(Error::InvalidLocationType(format!(
            "location must be a JSON string or an object, got {}",
            type_name(other)
        ))),
    }
}

fn extract_coordinate(object: &Value) -> Result<Coordinate> {
    let latitude = number_field(object, "latitude")?;
    let longitude = number_field(object, "longitude")?;
    Ok(Coordinate { latitude, longitude })
}

fn number_field(object: &Value, field: &str) -> Result<f64> {
    match object.get(field) {
        Some(value) => value.as_f64().ok_or_else(|| {
            Error::MalformedLocation(format!("`{}` must be a number, got {}", field, type_name(value)))
        }),
        None => Err(Error::MalformedLocation(format!("missing `{}`", field))),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
