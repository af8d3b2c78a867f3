//! Axum route handlers for the calculator API.

use std::collections::HashMap;

use axum::Json;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

use super::formulas::{self, AdPerformance, BreakEven, BudgetPlan, CroProjection, RoiSummary};

/// Guard message shared by the endpoints whose inputs arrived all zero.
const ALL_ZERO_INPUT: &str = "계산할 값을 입력해주세요.";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculateBreakEvenRequest {
    #[serde(default)]
    pub fixed_cost: f64,
    #[serde(default)]
    pub variable_cost: f64,
    #[serde(default)]
    pub selling_price: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculateRoiRequest {
    #[serde(default)]
    pub investment: f64,
    #[serde(default)]
    pub revenue: f64,
    #[serde(default)]
    pub cost: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculateBudgetRequest {
    #[serde(default)]
    pub target_conversions: f64,
    #[serde(default)]
    pub cpc: f64,
    #[serde(default)]
    pub conversion_rate: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculateConversionRequest {
    #[serde(default)]
    pub monthly_visitors: f64,
    #[serde(default)]
    pub current_conversion_rate: f64,
    #[serde(default)]
    pub improved_conversion_rate: f64,
    #[serde(default)]
    pub average_order_value: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordInput {
    #[serde(default)]
    pub keyword: String,
    #[serde(default)]
    pub search_volume: f64,
    #[serde(default)]
    pub competition: f64,
    #[serde(default)]
    pub cpc: f64,
}

#[derive(Debug, Deserialize)]
pub struct CalculateKeywordScoreRequest {
    #[serde(default)]
    pub keywords: Vec<KeywordInput>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub profit_per_unit: f64,
    #[serde(default)]
    pub ad_cost: f64,
    #[serde(default)]
    pub conversions: f64,
}

#[derive(Debug, Deserialize)]
pub struct CalculateAdPerformanceRequest {
    #[serde(default)]
    pub products: Vec<ProductInput>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculateProfitabilityRequest {
    #[serde(default)]
    pub step: Option<u8>,
    #[serde(default)]
    pub selling_price: f64,
    #[serde(default)]
    pub cost: f64,
    #[serde(default)]
    pub order_amount: f64,
    #[serde(default)]
    pub purchase_frequency: f64,
    #[serde(default)]
    pub ltv: f64,
    #[serde(default)]
    pub cac: f64,
}

/// Envelope for every calculator success.
#[derive(Debug, Serialize)]
pub struct CalcResponse<T> {
    pub success: bool,
    pub data: T,
}

/// Keyword row with its computed score, shaped as the keyword analysis
/// endpoint expects it back.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredKeyword {
    pub keyword: String,
    pub search_volume: f64,
    pub competition: f64,
    pub cpc: f64,
    pub score: f64,
}

#[derive(Debug, Serialize)]
pub struct KeywordScoreData {
    pub keywords: Vec<ScoredKeyword>,
}

#[derive(Debug, Serialize)]
pub struct AdPerformanceData {
    pub results: HashMap<String, AdPerformance>,
}

/// One profitability step's result; the step decides the shape.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ProfitabilityOutcome {
    TargetCpa {
        #[serde(rename = "targetCPA")]
        target_cpa: f64,
    },
    Ltv {
        ltv: f64,
    },
    Diagnosis {
        ratio: f64,
        #[serde(rename = "healthStatus")]
        health_status: &'static str,
    },
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/calculate-break-even
pub async fn handle_calculate_break_even(
    Json(request): Json<CalculateBreakEvenRequest>,
) -> Result<Json<CalcResponse<BreakEven>>, AppError> {
    if request.fixed_cost == 0.0 && request.variable_cost == 0.0 && request.selling_price == 0.0 {
        return Err(AppError::Validation(ALL_ZERO_INPUT.to_string()));
    }

    let data = formulas::break_even_point(request.fixed_cost, request.variable_cost, request.selling_price)
        .ok_or_else(|| AppError::Validation("판매가는 변동비보다 커야 합니다.".to_string()))?;

    Ok(Json(CalcResponse { success: true, data }))
}

/// POST /api/calculate-roi
pub async fn handle_calculate_roi(
    Json(request): Json<CalculateRoiRequest>,
) -> Result<Json<CalcResponse<RoiSummary>>, AppError> {
    if request.investment == 0.0 && request.revenue == 0.0 && request.cost == 0.0 {
        return Err(AppError::Validation(ALL_ZERO_INPUT.to_string()));
    }

    let data = formulas::roi_summary(request.investment, request.revenue, request.cost)
        .ok_or_else(|| AppError::Validation("투자 금액을 입력해주세요.".to_string()))?;

    Ok(Json(CalcResponse { success: true, data }))
}

/// POST /api/calculate-budget
pub async fn handle_calculate_budget(
    Json(request): Json<CalculateBudgetRequest>,
) -> Result<Json<CalcResponse<BudgetPlan>>, AppError> {
    if request.target_conversions == 0.0 && request.cpc == 0.0 && request.conversion_rate == 0.0 {
        return Err(AppError::Validation(ALL_ZERO_INPUT.to_string()));
    }

    let data = formulas::budget_plan(request.target_conversions, request.cpc, request.conversion_rate)
        .ok_or_else(|| AppError::Validation("전환율은 0보다 커야 합니다.".to_string()))?;

    Ok(Json(CalcResponse { success: true, data }))
}

/// POST /api/calculate-conversion
pub async fn handle_calculate_conversion(
    Json(request): Json<CalculateConversionRequest>,
) -> Result<Json<CalcResponse<CroProjection>>, AppError> {
    if request.monthly_visitors == 0.0
        && request.current_conversion_rate == 0.0
        && request.improved_conversion_rate == 0.0
        && request.average_order_value == 0.0
    {
        return Err(AppError::Validation(ALL_ZERO_INPUT.to_string()));
    }

    let data = formulas::cro_projection(
        request.monthly_visitors,
        request.current_conversion_rate,
        request.improved_conversion_rate,
        request.average_order_value,
    );

    Ok(Json(CalcResponse { success: true, data }))
}

/// POST /api/calculate-keyword-score
pub async fn handle_calculate_keyword_score(
    Json(request): Json<CalculateKeywordScoreRequest>,
) -> Result<Json<CalcResponse<KeywordScoreData>>, AppError> {
    if request.keywords.is_empty() {
        return Err(AppError::Validation("계산할 키워드 데이터가 없습니다.".to_string()));
    }

    let keywords = request
        .keywords
        .into_iter()
        .map(|k| {
            let score = formulas::keyword_score(k.search_volume, k.competition, k.cpc);
            ScoredKeyword {
                keyword: k.keyword,
                search_volume: k.search_volume,
                competition: k.competition,
                cpc: k.cpc,
                score,
            }
        })
        .collect();

    Ok(Json(CalcResponse {
        success: true,
        data: KeywordScoreData { keywords },
    }))
}

/// POST /api/calculate-ad-performance
pub async fn handle_calculate_ad_performance(
    Json(request): Json<CalculateAdPerformanceRequest>,
) -> Result<Json<CalcResponse<AdPerformanceData>>, AppError> {
    if request.products.is_empty() {
        return Err(AppError::Validation("계산할 상품 데이터가 없습니다.".to_string()));
    }

    let results = request
        .products
        .into_iter()
        .map(|p| {
            let performance =
                formulas::ad_performance(p.price, p.profit_per_unit, p.ad_cost, p.conversions);
            (p.id, performance)
        })
        .collect();

    Ok(Json(CalcResponse {
        success: true,
        data: AdPerformanceData { results },
    }))
}

/// POST /api/calculate-profitability
///
/// Three-step diagnosis: 1 derives the target CPA, 2 the LTV, 3 the LTV:CAC
/// ratio with its health label.
pub async fn handle_calculate_profitability(
    Json(request): Json<CalculateProfitabilityRequest>,
) -> Result<Json<CalcResponse<ProfitabilityOutcome>>, AppError> {
    let data = match request.step {
        Some(1) => {
            if request.selling_price == 0.0 && request.cost == 0.0 {
                return Err(AppError::Validation(ALL_ZERO_INPUT.to_string()));
            }
            ProfitabilityOutcome::TargetCpa {
                target_cpa: formulas::target_cpa(request.selling_price, request.cost),
            }
        }
        Some(2) => {
            if request.order_amount == 0.0 && request.purchase_frequency == 0.0 {
                return Err(AppError::Validation(ALL_ZERO_INPUT.to_string()));
            }
            ProfitabilityOutcome::Ltv {
                ltv: formulas::customer_ltv(request.order_amount, request.purchase_frequency),
            }
        }
        Some(3) => {
            if request.ltv == 0.0 && request.cac == 0.0 {
                return Err(AppError::Validation(ALL_ZERO_INPUT.to_string()));
            }
            let ratio = formulas::ltv_cac_ratio(request.ltv, request.cac)
                .ok_or_else(|| AppError::Validation("CAC를 입력해주세요.".to_string()))?;
            ProfitabilityOutcome::Diagnosis {
                ratio,
                health_status: formulas::health_status(ratio),
            }
        }
        _ => {
            return Err(AppError::Validation(
                "올바른 단계를 지정해주세요 (1, 2, 또는 3).".to_string(),
            ))
        }
    };

    Ok(Json(CalcResponse { success: true, data }))
}
