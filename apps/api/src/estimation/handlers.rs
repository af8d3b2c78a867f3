//! Axum route handlers for the AI estimation API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::AppError;
use crate::llm_client::DEFAULT_MODEL_CHAIN;
use crate::state::AppState;

use super::pipeline::{run_estimation, EstimationJob};
use super::prompts;
use super::schema::FieldSpec;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateProductRequest {
    #[serde(default)]
    pub product_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateBreakEvenRequest {
    #[serde(default)]
    pub product_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateBudgetRequest {
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub target: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateRoiRequest {
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub business_info: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateConversionRequest {
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub business_info: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateKeywordRequest {
    #[serde(default)]
    pub keyword: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateProfitabilityRequest {
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub step: Option<u8>,
}

/// Envelope for every estimation success: the normalized numeric record.
#[derive(Debug, Serialize)]
pub struct EstimateResponse {
    pub success: bool,
    pub data: Map<String, Value>,
}

// ────────────────────────────────────────────────────────────────────────────
// Field tables (drive both the prompt skeleton and the validator)
// ────────────────────────────────────────────────────────────────────────────

const PRODUCT_FIELDS: &[FieldSpec] = &[
    FieldSpec::whole("price", "판매가격(숫자만)", 50000.0),
    FieldSpec::whole("profitPerUnit", "개당순이익(숫자만)", 15000.0),
    FieldSpec::whole("adCost", "광고비(숫자만)", 100000.0),
    FieldSpec::whole("conversions", "전환수(숫자만)", 20.0),
];

const BREAK_EVEN_FIELDS: &[FieldSpec] = &[
    FieldSpec::whole("fixedCost", "월 고정비(임대료, 인건비 등, 숫자만)", 2000000.0),
    FieldSpec::whole("variableCost", "개당 변동비(원가, 포장비 등, 숫자만)", 15000.0),
    FieldSpec::whole("sellingPrice", "판매가격(숫자만)", 50000.0),
];

const BUDGET_FIELDS: &[FieldSpec] = &[
    FieldSpec::whole("targetConversions", "목표 전환수(숫자만)", 100.0),
    FieldSpec::whole("cpc", "예상 클릭당 비용(원, 숫자만)", 500.0),
    FieldSpec::rate("conversionRate", "예상 전환율(%, 숫자만)", 2.5),
];

const ROI_FIELDS: &[FieldSpec] = &[
    FieldSpec::whole("investment", "투자 금액(원, 숫자만)", 1000000.0),
    FieldSpec::whole("revenue", "예상 매출(원, 숫자만)", 3000000.0),
    FieldSpec::whole("cost", "예상 비용(원, 숫자만)", 1500000.0),
];

const CONVERSION_FIELDS: &[FieldSpec] = &[
    FieldSpec::whole("monthlyVisitors", "월 방문자 수(숫자만)", 10000.0),
    FieldSpec::rate("currentConversionRate", "현재 전환율(%, 숫자만)", 2.0),
    FieldSpec::rate("improvedConversionRate", "개선 후 예상 전환율(%, 숫자만)", 3.5),
    FieldSpec::whole("averageOrderValue", "평균 주문 금액(원, 숫자만)", 50000.0),
];

const KEYWORD_FIELDS: &[FieldSpec] = &[
    FieldSpec::whole("searchVolume", "월간 검색량(숫자만)", 8000.0),
    FieldSpec::whole("cpc", "클릭당 비용(원, 숫자만)", 500.0),
    FieldSpec::bounded("competition", "경쟁도(1-10 사이의 숫자만)", 7.0, 1.0, 10.0),
];

const PROFITABILITY_STEP1_FIELDS: &[FieldSpec] = &[
    FieldSpec::whole("sellingPrice", "판매가(원, 숫자만)", 50000.0),
    FieldSpec::whole("cost", "원가(원, 숫자만)", 20000.0),
];

const PROFITABILITY_STEP2_FIELDS: &[FieldSpec] = &[
    FieldSpec::whole("orderAmount", "평균 주문 금액(원, 숫자만)", 50000.0),
    FieldSpec::whole("purchaseFrequency", "연간 구매 횟수(숫자만)", 3.0),
];

const PROFITABILITY_STEP3_FIELDS: &[FieldSpec] = &[
    FieldSpec::whole("ltv", "고객생애가치(원, 숫자만)", 90000.0),
    FieldSpec::whole("cac", "고객획득비용(원, 숫자만)", 30000.0),
];

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/estimate-product
///
/// Estimates price, per-unit profit, ad spend and conversions for a product.
pub async fn handle_estimate_product(
    State(state): State<AppState>,
    Json(request): Json<EstimateProductRequest>,
) -> Result<Json<EstimateResponse>, AppError> {
    let product_name = require_text(&request.product_name, "상품명을 입력해주세요.")?;

    let data = run_estimation(
        state.llm.as_ref(),
        EstimationJob {
            task: prompts::PRODUCT_TASK,
            seeds: vec![("상품명", product_name)],
            fields: PRODUCT_FIELDS,
            models: DEFAULT_MODEL_CHAIN,
            failure_message: "상품 정보 추정 중 오류가 발생했습니다.",
        },
    )
    .await?;

    Ok(Json(EstimateResponse {
        success: true,
        data,
    }))
}

/// POST /api/estimate-break-even
///
/// Estimates the fixed cost, per-unit variable cost and selling price that
/// feed the break-even calculator.
pub async fn handle_estimate_break_even(
    State(state): State<AppState>,
    Json(request): Json<EstimateBreakEvenRequest>,
) -> Result<Json<EstimateResponse>, AppError> {
    let product_name = require_text(&request.product_name, "상품명을 입력해주세요.")?;

    let data = run_estimation(
        state.llm.as_ref(),
        EstimationJob {
            task: prompts::BREAK_EVEN_TASK,
            seeds: vec![("상품명", product_name)],
            fields: BREAK_EVEN_FIELDS,
            models: DEFAULT_MODEL_CHAIN,
            failure_message: "손익분기점 정보 추정 중 오류가 발생했습니다.",
        },
    )
    .await?;

    Ok(Json(EstimateResponse {
        success: true,
        data,
    }))
}

/// POST /api/estimate-budget
///
/// Estimates target conversions, CPC and conversion rate from a product name
/// and/or a campaign goal. At least one seed is required.
pub async fn handle_estimate_budget(
    State(state): State<AppState>,
    Json(request): Json<EstimateBudgetRequest>,
) -> Result<Json<EstimateResponse>, AppError> {
    let product_name = optional_text(&request.product_name);
    let target = optional_text(&request.target);
    if product_name.is_none() && target.is_none() {
        return Err(AppError::Validation("상품명 또는 목표를 입력해주세요.".to_string()));
    }

    let mut seeds = Vec::new();
    if let Some(value) = product_name {
        seeds.push(("상품명", value));
    }
    if let Some(value) = target {
        seeds.push(("목표", value));
    }

    let data = run_estimation(
        state.llm.as_ref(),
        EstimationJob {
            task: prompts::BUDGET_TASK,
            seeds,
            fields: BUDGET_FIELDS,
            models: DEFAULT_MODEL_CHAIN,
            failure_message: "광고 예산 정보 추정 중 오류가 발생했습니다.",
        },
    )
    .await?;

    Ok(Json(EstimateResponse {
        success: true,
        data,
    }))
}

/// POST /api/estimate-roi
///
/// Estimates investment, revenue and cost from a product name and/or a free
/// form business description. At least one seed is required.
pub async fn handle_estimate_roi(
    State(state): State<AppState>,
    Json(request): Json<EstimateRoiRequest>,
) -> Result<Json<EstimateResponse>, AppError> {
    let product_name = optional_text(&request.product_name);
    let business_info = optional_text(&request.business_info);
    if product_name.is_none() && business_info.is_none() {
        return Err(AppError::Validation(
            "상품명 또는 비즈니스 정보를 입력해주세요.".to_string(),
        ));
    }

    let mut seeds = Vec::new();
    if let Some(value) = product_name {
        seeds.push(("상품명", value));
    }
    if let Some(value) = business_info {
        seeds.push(("비즈니스 정보", value));
    }

    let data = run_estimation(
        state.llm.as_ref(),
        EstimationJob {
            task: prompts::ROI_TASK,
            seeds,
            fields: ROI_FIELDS,
            models: DEFAULT_MODEL_CHAIN,
            failure_message: "ROI 정보 추정 중 오류가 발생했습니다.",
        },
    )
    .await?;

    Ok(Json(EstimateResponse {
        success: true,
        data,
    }))
}

/// POST /api/estimate-conversion
///
/// Estimates traffic, current/improved conversion rates and average order
/// value for the CRO calculator. At least one seed is required.
pub async fn handle_estimate_conversion(
    State(state): State<AppState>,
    Json(request): Json<EstimateConversionRequest>,
) -> Result<Json<EstimateResponse>, AppError> {
    let product_name = optional_text(&request.product_name);
    let business_info = optional_text(&request.business_info);
    if product_name.is_none() && business_info.is_none() {
        return Err(AppError::Validation(
            "상품명 또는 비즈니스 정보를 입력해주세요.".to_string(),
        ));
    }

    let mut seeds = Vec::new();
    if let Some(value) = product_name {
        seeds.push(("상품명", value));
    }
    if let Some(value) = business_info {
        seeds.push(("비즈니스 정보", value));
    }

    let data = run_estimation(
        state.llm.as_ref(),
        EstimationJob {
            task: prompts::CONVERSION_TASK,
            seeds,
            fields: CONVERSION_FIELDS,
            models: DEFAULT_MODEL_CHAIN,
            failure_message: "전환율 정보 추정 중 오류가 발생했습니다.",
        },
    )
    .await?;

    Ok(Json(EstimateResponse {
        success: true,
        data,
    }))
}

/// POST /api/estimate-keyword
///
/// Estimates search volume, CPC and a 1-10 competition score for a keyword.
pub async fn handle_estimate_keyword(
    State(state): State<AppState>,
    Json(request): Json<EstimateKeywordRequest>,
) -> Result<Json<EstimateResponse>, AppError> {
    let keyword = require_text(&request.keyword, "키워드를 입력해주세요.")?;

    let data = run_estimation(
        state.llm.as_ref(),
        EstimationJob {
            task: prompts::KEYWORD_TASK,
            seeds: vec![("키워드", keyword)],
            fields: KEYWORD_FIELDS,
            models: DEFAULT_MODEL_CHAIN,
            failure_message: "키워드 정보 추정 중 오류가 발생했습니다.",
        },
    )
    .await?;

    Ok(Json(EstimateResponse {
        success: true,
        data,
    }))
}

/// POST /api/estimate-profitability
///
/// Three-step profitability diagnosis. Step 1 estimates selling price and
/// cost, step 2 order amount and purchase frequency, step 3 LTV and CAC.
pub async fn handle_estimate_profitability(
    State(state): State<AppState>,
    Json(request): Json<EstimateProfitabilityRequest>,
) -> Result<Json<EstimateResponse>, AppError> {
    let product_name = require_text(&request.product_name, "상품명을 입력해주세요.")?;

    let (task, fields) = match request.step {
        Some(1) => (prompts::TARGET_CPA_TASK, PROFITABILITY_STEP1_FIELDS),
        Some(2) => (prompts::LTV_TASK, PROFITABILITY_STEP2_FIELDS),
        Some(3) => (prompts::LTV_CAC_TASK, PROFITABILITY_STEP3_FIELDS),
        _ => {
            return Err(AppError::Validation(
                "올바른 단계를 지정해주세요 (1, 2, 또는 3).".to_string(),
            ))
        }
    };

    let data = run_estimation(
        state.llm.as_ref(),
        EstimationJob {
            task,
            seeds: vec![("상품명", product_name)],
            fields,
            models: DEFAULT_MODEL_CHAIN,
            failure_message: "수익성 진단 정보 추정 중 오류가 발생했습니다.",
        },
    )
    .await?;

    Ok(Json(EstimateResponse {
        success: true,
        data,
    }))
}

// ────────────────────────────────────────────────────────────────────────────
// Seed helpers
// ────────────────────────────────────────────────────────────────────────────

/// Rejects absent or whitespace-only seeds with the endpoint's Korean message.
fn require_text<'a>(value: &'a Option<String>, message: &str) -> Result<&'a str, AppError> {
    optional_text(value).ok_or_else(|| AppError::Validation(message.to_string()))
}

/// Treats absent and whitespace-only values alike.
fn optional_text(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contact::Mailer;
    use crate::llm_client::{LlmError, TextGenerator};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Arc;

    struct ScriptedGenerator(&'static str);

    #[async_trait]
    impl TextGenerator for ScriptedGenerator {
        async fn generate(&self, _prompt: &str, _models: &[&str]) -> Result<String, LlmError> {
            Ok(self.0.to_string())
        }
    }

    fn test_state(completion: &'static str) -> AppState {
        AppState {
            llm: Arc::new(ScriptedGenerator(completion)),
            mailer: Mailer::new(None),
        }
    }

    #[tokio::test]
    async fn test_estimate_product_returns_normalized_data() {
        let state = test_state(
            "```json\n{\"price\": 12000, \"profitPerUnit\": 4000, \"adCost\": 80000, \"conversions\": 15}\n```",
        );
        let request = EstimateProductRequest {
            product_name: Some("유기농 비누".to_string()),
        };

        let Json(response) = handle_estimate_product(State(state), Json(request))
            .await
            .unwrap();

        assert!(response.success);
        assert_eq!(
            Value::Object(response.data),
            json!({"price": 12000, "profitPerUnit": 4000, "adCost": 80000, "conversions": 15})
        );
    }

    #[tokio::test]
    async fn test_estimate_product_rejects_blank_name() {
        let state = test_state("{}");
        let request = EstimateProductRequest {
            product_name: Some("   ".to_string()),
        };

        let err = handle_estimate_product(State(state), Json(request))
            .await
            .unwrap_err();
        match err {
            AppError::Validation(msg) => assert_eq!(msg, "상품명을 입력해주세요."),
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_estimate_budget_accepts_target_alone() {
        let state = test_state("{\"targetConversions\": 100, \"cpc\": 500, \"conversionRate\": 2.5}");
        let request = EstimateBudgetRequest {
            product_name: None,
            target: Some("월 100건 판매".to_string()),
        };

        let Json(response) = handle_estimate_budget(State(state), Json(request))
            .await
            .unwrap();
        assert_eq!(response.data["conversionRate"], json!(2.5));
    }

    #[tokio::test]
    async fn test_estimate_budget_requires_some_seed() {
        let state = test_state("{}");
        let request = EstimateBudgetRequest {
            product_name: Some("".to_string()),
            target: None,
        };

        let err = handle_estimate_budget(State(state), Json(request))
            .await
            .unwrap_err();
        match err {
            AppError::Validation(msg) => assert_eq!(msg, "상품명 또는 목표를 입력해주세요."),
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_estimate_roi_requires_some_seed() {
        let state = test_state("{}");
        let request = EstimateRoiRequest {
            product_name: None,
            business_info: None,
        };

        let err = handle_estimate_roi(State(state), Json(request)).await.unwrap_err();
        match err {
            AppError::Validation(msg) => {
                assert_eq!(msg, "상품명 또는 비즈니스 정보를 입력해주세요.")
            }
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_estimate_keyword_rejects_blank_keyword() {
        let state = test_state("{}");
        let request = EstimateKeywordRequest { keyword: None };

        let err = handle_estimate_keyword(State(state), Json(request))
            .await
            .unwrap_err();
        match err {
            AppError::Validation(msg) => assert_eq!(msg, "키워드를 입력해주세요."),
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_estimate_keyword_clamps_competition() {
        let state = test_state("{\"searchVolume\": 8000, \"cpc\": 500, \"competition\": 15}");
        let request = EstimateKeywordRequest {
            keyword: Some("유기농 비누".to_string()),
        };

        let Json(response) = handle_estimate_keyword(State(state), Json(request))
            .await
            .unwrap();
        assert_eq!(response.data["competition"], json!(10));
    }

    #[tokio::test]
    async fn test_estimate_profitability_rejects_bad_step() {
        let state = test_state("{}");
        for step in [None, Some(0), Some(4)] {
            let request = EstimateProfitabilityRequest {
                product_name: Some("유기농 비누".to_string()),
                step,
            };
            let err = handle_estimate_profitability(State(state.clone()), Json(request))
                .await
                .unwrap_err();
            match err {
                AppError::Validation(msg) => {
                    assert_eq!(msg, "올바른 단계를 지정해주세요 (1, 2, 또는 3).")
                }
                other => panic!("expected Validation, got {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn test_estimate_profitability_step_selects_fields() {
        let state = test_state("{\"orderAmount\": 45000, \"purchaseFrequency\": 4}");
        let request = EstimateProfitabilityRequest {
            product_name: Some("유기농 비누".to_string()),
            step: Some(2),
        };

        let Json(response) = handle_estimate_profitability(State(state), Json(request))
            .await
            .unwrap();
        assert_eq!(
            Value::Object(response.data),
            json!({"orderAmount": 45000, "purchaseFrequency": 4})
        );
    }
}
