//! Rescue Match Common Library
//!
//! サーバーとCLIで共有される型とマッチング処理（I/Oなし）

pub mod types;
pub mod error;
pub mod location;
pub mod prompts;
pub mod parser;
pub mod geo;
pub mod merger;

pub use types::{
    ClosestOrg, Coordinate, EnrichedResult, GeoCandidate, MatchResponse, OrganizationProfile,
    OrganizationSummary, ProfileFields, ProfileLookup, RankingContract, RankingEntry, ResponseItem,
};
pub use error::{Error, Result};
pub use location::parse_location;
pub use prompts::{build_condense_prompt, build_ranking_prompt, SPECIES_IDENTIFICATION_PROMPT};
pub use parser::{parse_ranking_response, strip_code_fences};
pub use geo::{distance_km, nearest};
pub use merger::{build_response, geo_candidates, merge_results};
