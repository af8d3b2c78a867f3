//! Axum route handlers for the AI analysis API.

use std::collections::HashMap;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::llm_client::{DEFAULT_MODEL_CHAIN, EXTENDED_MODEL_CHAIN};
use crate::state::AppState;

use super::prompts;

/// Guard message shared by the endpoints that require computed inputs.
const NO_CALCULATION_DATA: &str = "계산된 데이터가 없습니다. 먼저 계산을 수행해주세요.";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakEvenAnalysisRequest {
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub fixed_cost: f64,
    #[serde(default)]
    pub variable_cost: f64,
    #[serde(default)]
    pub selling_price: f64,
    #[serde(default)]
    pub contribution_margin: f64,
    #[serde(default)]
    pub break_even_quantity: f64,
    #[serde(default)]
    pub break_even_revenue: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoiAnalysisRequest {
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub investment: f64,
    #[serde(default)]
    pub revenue: f64,
    #[serde(default)]
    pub cost: f64,
    #[serde(default)]
    pub net_profit: f64,
    #[serde(default)]
    pub roi: f64,
    #[serde(default)]
    pub roas: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetAnalysisRequest {
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub target_conversions: f64,
    #[serde(default)]
    pub cpc: f64,
    #[serde(default)]
    pub conversion_rate: f64,
    #[serde(default)]
    pub required_clicks: f64,
    #[serde(default)]
    pub required_budget: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CroAnalysisRequest {
    #[serde(default)]
    pub monthly_visitors: f64,
    #[serde(default)]
    pub current_conversion_rate: f64,
    #[serde(default)]
    pub improved_conversion_rate: f64,
    #[serde(default)]
    pub average_order_value: f64,
    #[serde(default)]
    pub additional_conversions: f64,
    #[serde(default)]
    pub monthly_revenue_increase: f64,
    #[serde(default)]
    pub yearly_revenue_increase: f64,
    #[serde(default)]
    pub conversion_rate_improvement: f64,
}

/// One keyword row as the keyword calculator produces it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordMetrics {
    #[serde(default)]
    pub keyword: String,
    #[serde(default)]
    pub search_volume: f64,
    #[serde(default)]
    pub competition: f64,
    #[serde(default)]
    pub cpc: f64,
    #[serde(default)]
    pub score: f64,
}

#[derive(Debug, Deserialize)]
pub struct KeywordsAnalysisRequest {
    #[serde(default)]
    pub keywords: Vec<KeywordMetrics>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductEntry {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub profit_per_unit: f64,
    #[serde(default)]
    pub ad_cost: f64,
    #[serde(default)]
    pub conversions: f64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductResult {
    #[serde(default)]
    pub revenue: f64,
    #[serde(default)]
    pub roas: f64,
    #[serde(default)]
    pub roi: f64,
    #[serde(default)]
    pub net_profit: f64,
}

#[derive(Debug, Deserialize)]
pub struct PerformanceAnalysisRequest {
    #[serde(default)]
    pub products: Vec<ProductEntry>,
    /// Calculator results keyed by product id; missing entries render as zero.
    #[serde(default)]
    pub results: HashMap<String, ProductResult>,
}

#[derive(Debug, Deserialize)]
pub struct ProfitabilityAnalysisRequest {
    #[serde(rename = "productName", default)]
    pub product_name: Option<String>,
    #[serde(rename = "targetCPA", default)]
    pub target_cpa: f64,
    #[serde(default)]
    pub ltv: f64,
    #[serde(default)]
    pub ratio: f64,
    #[serde(rename = "healthStatus", default)]
    pub health_status: String,
}

/// Envelope for every analysis success: the narrative passed through verbatim.
#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    pub success: bool,
    pub analysis: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/analyze-break-even
pub async fn handle_analyze_break_even(
    State(state): State<AppState>,
    Json(request): Json<BreakEvenAnalysisRequest>,
) -> Result<Json<AnalysisResponse>, AppError> {
    if request.fixed_cost == 0.0 && request.variable_cost == 0.0 && request.selling_price == 0.0 {
        return Err(AppError::Validation(NO_CALCULATION_DATA.to_string()));
    }

    let prompt = prompts::break_even_analysis_prompt(&request);
    let analysis = state
        .llm
        .generate(&prompt, EXTENDED_MODEL_CHAIN)
        .await
        .map_err(|e| AppError::from_llm(e, "손익분기점 분석 중 오류가 발생했습니다."))?;

    info!("Break-even analysis complete: {} chars", analysis.len());

    Ok(Json(AnalysisResponse {
        success: true,
        analysis,
    }))
}

/// POST /api/analyze-roi
pub async fn handle_analyze_roi(
    State(state): State<AppState>,
    Json(request): Json<RoiAnalysisRequest>,
) -> Result<Json<AnalysisResponse>, AppError> {
    if request.investment == 0.0 && request.revenue == 0.0 && request.cost == 0.0 {
        return Err(AppError::Validation(NO_CALCULATION_DATA.to_string()));
    }

    let prompt = prompts::roi_analysis_prompt(&request);
    let analysis = state
        .llm
        .generate(&prompt, EXTENDED_MODEL_CHAIN)
        .await
        .map_err(|e| AppError::from_llm(e, "ROI 분석 중 오류가 발생했습니다."))?;

    info!("ROI analysis complete: {} chars", analysis.len());

    Ok(Json(AnalysisResponse {
        success: true,
        analysis,
    }))
}

/// POST /api/analyze-budget
pub async fn handle_analyze_budget(
    State(state): State<AppState>,
    Json(request): Json<BudgetAnalysisRequest>,
) -> Result<Json<AnalysisResponse>, AppError> {
    if request.target_conversions == 0.0 && request.cpc == 0.0 && request.conversion_rate == 0.0 {
        return Err(AppError::Validation(NO_CALCULATION_DATA.to_string()));
    }

    let prompt = prompts::budget_analysis_prompt(&request);
    let analysis = state
        .llm
        .generate(&prompt, EXTENDED_MODEL_CHAIN)
        .await
        .map_err(|e| AppError::from_llm(e, "광고 예산 분석 중 오류가 발생했습니다."))?;

    info!("Budget analysis complete: {} chars", analysis.len());

    Ok(Json(AnalysisResponse {
        success: true,
        analysis,
    }))
}

/// POST /api/analyze-cro
pub async fn handle_analyze_cro(
    State(state): State<AppState>,
    Json(request): Json<CroAnalysisRequest>,
) -> Result<Json<AnalysisResponse>, AppError> {
    let prompt = prompts::cro_analysis_prompt(&request);
    let analysis = state
        .llm
        .generate(&prompt, DEFAULT_MODEL_CHAIN)
        .await
        .map_err(|e| AppError::from_llm(e, "CRO 분석 중 오류가 발생했습니다."))?;

    info!("CRO analysis complete: {} chars", analysis.len());

    Ok(Json(AnalysisResponse {
        success: true,
        analysis,
    }))
}

/// POST /api/analyze-keywords
///
/// Rejects an empty list outright, then drops rows with a blank keyword or
/// no positive metric at all before building the prompt.
pub async fn handle_analyze_keywords(
    State(state): State<AppState>,
    Json(request): Json<KeywordsAnalysisRequest>,
) -> Result<Json<AnalysisResponse>, AppError> {
    if request.keywords.is_empty() {
        return Err(AppError::Validation("분석할 키워드 데이터가 없습니다.".to_string()));
    }

    let valid_keywords: Vec<&KeywordMetrics> = request
        .keywords
        .iter()
        .filter(|k| {
            !k.keyword.trim().is_empty()
                && (k.search_volume > 0.0 || k.cpc > 0.0 || k.competition > 0.0)
        })
        .collect();

    if valid_keywords.is_empty() {
        return Err(AppError::Validation(
            "분석할 수 있는 키워드 데이터가 없습니다.".to_string(),
        ));
    }

    info!("Analyzing {} keywords", valid_keywords.len());

    let prompt = prompts::keywords_analysis_prompt(&valid_keywords);
    let analysis = state
        .llm
        .generate(&prompt, EXTENDED_MODEL_CHAIN)
        .await
        .map_err(|e| AppError::from_llm(e, "키워드 분석 중 오류가 발생했습니다."))?;

    info!("Keyword analysis complete: {} chars", analysis.len());

    Ok(Json(AnalysisResponse {
        success: true,
        analysis,
    }))
}

/// POST /api/analyze-performance
pub async fn handle_analyze_performance(
    State(state): State<AppState>,
    Json(request): Json<PerformanceAnalysisRequest>,
) -> Result<Json<AnalysisResponse>, AppError> {
    if request.products.is_empty() {
        return Err(AppError::Validation("분석할 상품 데이터가 없습니다.".to_string()));
    }

    info!("Analyzing performance of {} products", request.products.len());

    let prompt = prompts::performance_analysis_prompt(&request);
    let analysis = state
        .llm
        .generate(&prompt, DEFAULT_MODEL_CHAIN)
        .await
        .map_err(|e| AppError::from_llm(e, "광고 성과 분석 중 오류가 발생했습니다."))?;

    info!("Performance analysis complete: {} chars", analysis.len());

    Ok(Json(AnalysisResponse {
        success: true,
        analysis,
    }))
}

/// POST /api/analyze-profitability
pub async fn handle_analyze_profitability(
    State(state): State<AppState>,
    Json(request): Json<ProfitabilityAnalysisRequest>,
) -> Result<Json<AnalysisResponse>, AppError> {
    if request.target_cpa == 0.0 && request.ltv == 0.0 && request.ratio == 0.0 {
        return Err(AppError::Validation(NO_CALCULATION_DATA.to_string()));
    }

    let prompt = prompts::profitability_analysis_prompt(&request);
    let analysis = state
        .llm
        .generate(&prompt, EXTENDED_MODEL_CHAIN)
        .await
        .map_err(|e| AppError::from_llm(e, "수익성 진단 분석 중 오류가 발생했습니다."))?;

    info!("Profitability analysis complete: {} chars", analysis.len());

    Ok(Json(AnalysisResponse {
        success: true,
        analysis,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contact::Mailer;
    use crate::llm_client::{LlmError, TextGenerator};
    use async_trait::async_trait;
    use std::sync::Arc;

    struct ScriptedGenerator(&'static str);

    #[async_trait]
    impl TextGenerator for ScriptedGenerator {
        async fn generate(&self, _prompt: &str, _models: &[&str]) -> Result<String, LlmError> {
            Ok(self.0.to_string())
        }
    }

    struct FailingGenerator;

    #[async_trait]
    impl TextGenerator for FailingGenerator {
        async fn generate(&self, _prompt: &str, _models: &[&str]) -> Result<String, LlmError> {
            Err(LlmError::Api {
                status: 500,
                message: "internal".to_string(),
            })
        }
    }

    fn test_state(llm: impl TextGenerator + 'static) -> AppState {
        AppState {
            llm: Arc::new(llm),
            mailer: Mailer::new(None),
        }
    }

    fn roi_request() -> RoiAnalysisRequest {
        RoiAnalysisRequest {
            product_name: Some("유기농 비누".to_string()),
            investment: 1000000.0,
            revenue: 3000000.0,
            cost: 1500000.0,
            net_profit: 1500000.0,
            roi: 150.0,
            roas: 3.0,
        }
    }

    #[tokio::test]
    async fn test_analysis_passes_markdown_through_verbatim() {
        let narrative = "## ROI 성과 평가\n\n**우수한 수준**입니다.";
        let state = test_state(ScriptedGenerator(narrative));

        let Json(response) = handle_analyze_roi(State(state), Json(roi_request()))
            .await
            .unwrap();

        assert!(response.success);
        assert_eq!(response.analysis, narrative);
    }

    #[tokio::test]
    async fn test_all_zero_inputs_are_rejected_before_any_call() {
        let state = test_state(FailingGenerator);
        let request = RoiAnalysisRequest {
            product_name: None,
            investment: 0.0,
            revenue: 0.0,
            cost: 0.0,
            net_profit: 0.0,
            roi: 0.0,
            roas: 0.0,
        };

        let err = handle_analyze_roi(State(state), Json(request)).await.unwrap_err();
        match err {
            AppError::Validation(msg) => assert_eq!(msg, NO_CALCULATION_DATA),
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_exhausted_tiers_surface_the_endpoint_message() {
        let state = test_state(FailingGenerator);

        let err = handle_analyze_roi(State(state), Json(roi_request()))
            .await
            .unwrap_err();
        match err {
            AppError::Upstream(msg) => assert_eq!(msg, "ROI 분석 중 오류가 발생했습니다."),
            other => panic!("expected Upstream, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_empty_keyword_list_is_rejected() {
        let state = test_state(ScriptedGenerator("분석"));
        let request = KeywordsAnalysisRequest { keywords: vec![] };

        let err = handle_analyze_keywords(State(state), Json(request))
            .await
            .unwrap_err();
        match err {
            AppError::Validation(msg) => assert_eq!(msg, "분석할 키워드 데이터가 없습니다."),
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_keywords_without_metrics_are_rejected_after_filtering() {
        let state = test_state(ScriptedGenerator("분석"));
        let request = KeywordsAnalysisRequest {
            keywords: vec![
                KeywordMetrics {
                    keyword: "   ".to_string(),
                    search_volume: 8000.0,
                    competition: 7.0,
                    cpc: 500.0,
                    score: 2.29,
                },
                KeywordMetrics {
                    keyword: "유기농 비누".to_string(),
                    search_volume: 0.0,
                    competition: 0.0,
                    cpc: 0.0,
                    score: 0.0,
                },
            ],
        };

        let err = handle_analyze_keywords(State(state), Json(request))
            .await
            .unwrap_err();
        match err {
            AppError::Validation(msg) => {
                assert_eq!(msg, "분석할 수 있는 키워드 데이터가 없습니다.")
            }
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_one_valid_keyword_is_enough() {
        let state = test_state(ScriptedGenerator("## 키워드 분석"));
        let request = KeywordsAnalysisRequest {
            keywords: vec![KeywordMetrics {
                keyword: "유기농 비누".to_string(),
                search_volume: 8000.0,
                competition: 7.0,
                cpc: 500.0,
                score: 2.29,
            }],
        };

        let Json(response) = handle_analyze_keywords(State(state), Json(request))
            .await
            .unwrap();
        assert_eq!(response.analysis, "## 키워드 분석");
    }

    #[tokio::test]
    async fn test_empty_product_list_is_rejected() {
        let state = test_state(ScriptedGenerator("분석"));
        let request = PerformanceAnalysisRequest {
            products: vec![],
            results: HashMap::new(),
        };

        let err = handle_analyze_performance(State(state), Json(request))
            .await
            .unwrap_err();
        match err {
            AppError::Validation(msg) => assert_eq!(msg, "분석할 상품 데이터가 없습니다."),
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_cro_analysis_has_no_zero_guard() {
        let state = test_state(ScriptedGenerator("## CRO 분석"));
        let request = CroAnalysisRequest {
            monthly_visitors: 0.0,
            current_conversion_rate: 0.0,
            improved_conversion_rate: 0.0,
            average_order_value: 0.0,
            additional_conversions: 0.0,
            monthly_revenue_increase: 0.0,
            yearly_revenue_increase: 0.0,
            conversion_rate_improvement: 0.0,
        };

        let Json(response) = handle_analyze_cro(State(state), Json(request)).await.unwrap();
        assert!(response.success);
    }

    #[test]
    fn test_profitability_request_uses_wire_casing() {
        let raw = r#"{"productName": "유기농 비누", "targetCPA": 30000, "ltv": 90000, "ratio": 3, "healthStatus": "건강"}"#;
        let request: ProfitabilityAnalysisRequest = serde_json::from_str(raw).unwrap();
        assert_eq!(request.target_cpa, 30000.0);
        assert_eq!(request.health_status, "건강");
    }
}
