//! 距離計算
//!
//! Haversine距離と、基準点から近い順に K 件を選ぶ処理。

use crate::types::{ClosestOrg, Coordinate, GeoCandidate};
use std::cmp::Ordering;

const EARTH_RADIUS_KM: f64 = 6371.0;

/// 2点間の距離（km）
///
/// Haversine公式で地球表面上の距離を計算する
pub fn distance_km(from: Coordinate, to: Coordinate) -> f64 {
    let dlat = (to.latitude - from.latitude).to_radians();
    let dlng = (to.longitude - from.longitude).to_radians();

    let a = (dlat / 2.0).sin().powi(2)
        + from.latitude.to_radians().cos()
            * to.latitude.to_radians().cos()
            * (dlng / 2.0).sin().powi(2);

    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// 基準点から近い順に最大 `max_results` 件を返す
///
/// 同距離の場合は入力順（＝AIランキング順）を保つ。
/// 距離は 0.01km 単位に丸める。
pub fn nearest(
    candidates: &[GeoCandidate],
    reference: Coordinate,
    max_results: usize,
) -> Vec<ClosestOrg> {
    let mut scored: Vec<(&GeoCandidate, f64)> = candidates
        .iter()
        .map(|c| (c, distance_km(reference, c.coordinate)))
        .collect();

    // NaN（不正な座標）は末尾へ
    scored.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or_else(|| nan_last(a.1, b.1)));

    scored
        .into_iter()
        .take(max_results)
        .map(|(candidate, distance)| ClosestOrg {
            name: candidate.name.clone(),
            distance_km: round_km(distance),
        })
        .collect()
}

fn nan_last(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        _ => Ordering::Equal,
    }
}

fn round_km(distance: f64) -> f64 {
    (distance * 100.0).round() / 100.0
}
