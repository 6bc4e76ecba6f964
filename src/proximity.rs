//! 近接フィルタ
//!
//! 候補団体を基準点から近い順に並べ、上位 K 件を返す。

use crate::error::Result;
use async_trait::async_trait;
use rescue_match_common::{nearest, ClosestOrg, Coordinate, GeoCandidate};

#[async_trait]
pub trait ProximityFilter: Send + Sync {
    async fn closest(
        &self,
        candidates: &[GeoCandidate],
        reference: Coordinate,
    ) -> Result<Vec<ClosestOrg>>;
}

/// Haversine距離による最近傍 K 件
#[derive(Debug, Clone, Copy)]
pub struct HaversineProximity {
    pub max_results: usize,
}

impl HaversineProximity {
    pub fn new(max_results: usize) -> Self {
        Self { max_results }
    }
}

#[async_trait]
impl ProximityFilter for HaversineProximity {
    async fn closest(
        &self,
        candidates: &[GeoCandidate],
        reference: Coordinate,
    ) -> Result<Vec<ClosestOrg>> {
        Ok(nearest(candidates, reference, self.max_results))
    }
}
