//! プロンプト生成モジュール
//!
//! サーバーとCLIで共有されるプロンプト生成ロジック:
//! - SPECIES_IDENTIFICATION_PROMPT: 画像から種を特定する固定プロンプト
//! - build_condense_prompt: 種情報を照合用に要約するプロンプト
//! - build_ranking_prompt: 団体ランキング用プロンプト
//!
//! テンプレートは定数のまま変更しない。リクエスト固有のデータを含む
//! プロンプトは毎回新しい String として組み立てる。

use crate::error::Result;
use crate::types::OrganizationSummary;
use serde_json::json;

/// 画像解析（種の特定とケア情報）
pub const SPECIES_IDENTIFICATION_PROMPT: &str = "Identify the exact species of the animal in this image. \
Start with a short paragraph (about 50 words) of general information about the species. \
Then check whether the animal appears injured. If it is, give step-by-step first aid and immediate care \
a volunteer can provide before reaching a rescue organization. State its legal protection status and the \
safest, most ethical way to transport it. Describe its natural habitat, diet and behavior. \
Finish with detailed care instructions covering handling, feeding and general well-being, as structured points.";

/// 種情報の要約（照合用）
const CONDENSE_TEMPLATE: &str = "Below is detailed information about an animal. Condense it into a concise, \
information-dense summary covering habitat, behavior, physical attributes, care needs and conservation status. \
The summary will be used by an AI to match this animal with the most suitable rescue or rehabilitation \
organization by comparing it against the organizations' own summaries.";

/// 団体ランキング
const RANKING_TEMPLATE: &str = r#"Below is a summary of an animal species, followed by a list of organizations with their names and summaries. Rank the organizations by how well their mission, expertise and focus fit the needs of this animal, best suited first.

Respond with JSON only, in exactly this format:

{
  "rankings": [
    { "name": "Prairie Protectors", "reason": "Runs grassland programs that include this species." },
    { "name": "Wild Haven Trust", "reason": "Rescues and rehabilitates this species in its native habitat." }
  ]
}

Rules:
- Every "name" must be copied exactly from the organization list.
- "reason" explains the position in one or two sentences.
- If no organization is a perfect match, still rank the most relevant ones (general wildlife care, habitat conservation, related work).
- Never return an empty list."#;

/// 要約プロンプト生成
///
/// # Arguments
/// * `species_info` - 画像解析で得られた種・ケア情報
///
/// # Returns
/// テンプレート + 種情報の新しいプロンプト文字列
pub fn build_condense_prompt(species_info: &str) -> String {
    format!("{}\n\nAnimal information:\n{}", CONDENSE_TEMPLATE, species_info.trim())
}

/// ランキングプロンプト生成
///
/// # Arguments
/// * `animal_summary` - 要約済みの種情報
/// * `organizations` - ディレクトリのスナップショット（名前と概要）
///
/// # Returns
/// テンプレート + 種の要約 + 団体一覧(JSON)の新しいプロンプト文字列
pub fn build_ranking_prompt(
    animal_summary: &str,
    organizations: &[OrganizationSummary],
) -> Result<String> {
    let organizations_json =
        serde_json::to_string_pretty(&json!({ "organizations": organizations }))?;

    Ok(format!(
        "{}\n\nAnimal summary:\n{}\n\nOrganizations:\n{}",
        RANKING_TEMPLATE,
        animal_summary.trim(),
        organizations_json
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directory() -> Vec<OrganizationSummary> {
        vec![
            OrganizationSummary {
                name: "Fox Rescue".to_string(),
                summary: "Urban fox rehabilitation".to_string(),
            },
            OrganizationSummary {
                name: "Whale Watch".to_string(),
                summary: "Marine mammal strandings".to_string(),
            },
        ]
    }

    // =============================================
    // build_condense_prompt テスト
    // =============================================

    #[test]
    fn test_build_condense_prompt_contains_species() {
        let prompt = build_condense_prompt("Red Fox: Vulpes vulpes ...");

        assert!(prompt.starts_with(CONDENSE_TEMPLATE));
        assert!(prompt.contains("Red Fox: Vulpes vulpes ..."));
    }

    #[test]
    fn test_build_condense_prompt_does_not_accumulate() {
        let first = build_condense_prompt("Red Fox");
        let second = build_condense_prompt("Barn Owl");

        assert!(!second.contains("Red Fox"));
        assert_eq!(first.len() - "Red Fox".len(), second.len() - "Barn Owl".len());
    }

    // =============================================
    // build_ranking_prompt テスト
    // =============================================

    #[test]
    fn test_build_ranking_prompt_contains_directory() {
        let prompt = build_ranking_prompt("Canid, omnivore", &directory()).unwrap();

        assert!(prompt.starts_with(RANKING_TEMPLATE));
        assert!(prompt.contains("Canid, omnivore"));
        assert!(prompt.contains("\"organizations\""));
        assert!(prompt.contains("\"name\": \"Fox Rescue\""));
        assert!(prompt.contains("\"summary\": \"Marine mammal strandings\""));
    }

    #[test]
    fn test_build_ranking_prompt_contains_contract_format() {
        let prompt = build_ranking_prompt("summary", &[]).unwrap();

        assert!(prompt.contains("\"rankings\""));
        assert!(prompt.contains("\"reason\""));
        assert!(prompt.contains("\"organizations\": []"));
    }

    #[test]
    fn test_build_ranking_prompt_is_request_scoped() {
        let fox = build_ranking_prompt("Canid", &directory()).unwrap();
        let owl = build_ranking_prompt("Strigiform", &directory()[1..]).unwrap();

        assert!(!owl.contains("Canid"));
        assert!(!owl.contains("Fox Rescue"));
        assert!(fox.contains("Fox Rescue"));
    }

    #[test]
    fn test_species_prompt_mentions_care() {
        assert!(SPECIES_IDENTIFICATION_PROMPT.contains("species"));
        assert!(SPECIES_IDENTIFICATION_PROMPT.contains("first aid"));
    }
}
