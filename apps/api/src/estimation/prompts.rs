// Korean task lines for the estimation prompts, one per endpoint, plus the
// builder that assembles task, seed lines, field skeleton and example object
// into the JSON-only prompt the model receives.

use super::schema::{json_number, FieldSpec};

pub const PRODUCT_TASK: &str = "다음 상품에 대한 마케팅 정보를 추정해주세요. 실제 시장 데이터를 기반으로 합리적인 추정치를 제공해주세요.";

pub const BREAK_EVEN_TASK: &str = "다음 상품에 대한 손익분기점 계산에 필요한 정보를 추정해주세요. 실제 시장 데이터를 기반으로 합리적인 추정치를 제공해주세요.";

pub const BUDGET_TASK: &str = "다음 상품/목표에 대한 광고 예산 계산에 필요한 정보를 추정해주세요. 실제 시장 데이터를 기반으로 합리적인 추정치를 제공해주세요.";

pub const ROI_TASK: &str = "다음 상품/비즈니스에 대한 ROI 계산에 필요한 정보를 추정해주세요. 실제 시장 데이터를 기반으로 합리적인 추정치를 제공해주세요.";

pub const CONVERSION_TASK: &str = "다음 상품/비즈니스에 대한 전환율 개선 계산에 필요한 정보를 추정해주세요. 실제 시장 데이터를 기반으로 합리적인 추정치를 제공해주세요.";

pub const KEYWORD_TASK: &str = "다음 키워드에 대한 마케팅 정보를 추정해주세요. 실제 시장 데이터를 기반으로 합리적인 추정치를 제공해주세요.";

pub const TARGET_CPA_TASK: &str = "다음 상품에 대한 목표 CPA 계산에 필요한 정보를 추정해주세요. 실제 시장 데이터를 기반으로 합리적인 추정치를 제공해주세요.";

pub const LTV_TASK: &str = "다음 상품에 대한 LTV(고객생애가치) 계산에 필요한 정보를 추정해주세요. 실제 시장 데이터를 기반으로 합리적인 추정치를 제공해주세요.";

pub const LTV_CAC_TASK: &str = "다음 상품에 대한 LTV:CAC 비율 계산에 필요한 정보를 추정해주세요. 실제 시장 데이터를 기반으로 합리적인 추정치를 제공해주세요.";

const JSON_ONLY_HEADER: &str = "다음 정보를 JSON 형식으로만 응답해주세요 (설명 없이 JSON만):";
const EXAMPLE_HEADER: &str = "예시:";
const JSON_ONLY_FOOTER: &str = "응답은 JSON 형식만 제공하고, 다른 설명은 포함하지 마세요.";

/// Assembles an estimation prompt. `seeds` carries the already-validated
/// (label, value) pairs; the skeleton and example blocks are rendered from
/// the same field list the validator uses.
pub fn build_estimation_prompt(
    task: &str,
    seeds: &[(&str, &str)],
    fields: &[FieldSpec],
) -> String {
    let seed_lines = seeds
        .iter()
        .map(|(label, value)| format!("{label}: {value}"))
        .collect::<Vec<_>>()
        .join("\n");

    let skeleton = fields
        .iter()
        .map(|f| format!("  \"{}\": {}", f.name, f.description))
        .collect::<Vec<_>>()
        .join(",\n");

    let example = fields
        .iter()
        .map(|f| format!("  \"{}\": {}", f.name, json_number(f.example)))
        .collect::<Vec<_>>()
        .join(",\n");

    format!(
        "{task}\n\n{seed_lines}\n\n{JSON_ONLY_HEADER}\n{{\n{skeleton}\n}}\n\n\
         {EXAMPLE_HEADER}\n{{\n{example}\n}}\n\n{JSON_ONLY_FOOTER}"
    )
}
