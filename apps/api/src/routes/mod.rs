pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::analysis;
use crate::calc;
use crate::contact;
use crate::estimation;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // AI estimation API
        .route(
            "/api/estimate-product",
            post(estimation::handlers::handle_estimate_product),
        )
        .route(
            "/api/estimate-break-even",
            post(estimation::handlers::handle_estimate_break_even),
        )
        .route(
            "/api/estimate-budget",
            post(estimation::handlers::handle_estimate_budget),
        )
        .route(
            "/api/estimate-roi",
            post(estimation::handlers::handle_estimate_roi),
        )
        .route(
            "/api/estimate-conversion",
            post(estimation::handlers::handle_estimate_conversion),
        )
        .route(
            "/api/estimate-keyword",
            post(estimation::handlers::handle_estimate_keyword),
        )
        .route(
            "/api/estimate-profitability",
            post(estimation::handlers::handle_estimate_profitability),
        )
        // AI analysis API
        .route(
            "/api/analyze-break-even",
            post(analysis::handlers::handle_analyze_break_even),
        )
        .route(
            "/api/analyze-roi",
            post(analysis::handlers::handle_analyze_roi),
        )
        .route(
            "/api/analyze-budget",
            post(analysis::handlers::handle_analyze_budget),
        )
        .route(
            "/api/analyze-cro",
            post(analysis::handlers::handle_analyze_cro),
        )
        .route(
            "/api/analyze-keywords",
            post(analysis::handlers::handle_analyze_keywords),
        )
        .route(
            "/api/analyze-performance",
            post(analysis::handlers::handle_analyze_performance),
        )
        .route(
            "/api/analyze-profitability",
            post(analysis::handlers::handle_analyze_profitability),
        )
        // Calculator API
        .route(
            "/api/calculate-break-even",
            post(calc::handlers::handle_calculate_break_even),
        )
        .route(
            "/api/calculate-roi",
            post(calc::handlers::handle_calculate_roi),
        )
        .route(
            "/api/calculate-budget",
            post(calc::handlers::handle_calculate_budget),
        )
        .route(
            "/api/calculate-conversion",
            post(calc::handlers::handle_calculate_conversion),
        )
        .route(
            "/api/calculate-keyword-score",
            post(calc::handlers::handle_calculate_keyword_score),
        )
        .route(
            "/api/calculate-ad-performance",
            post(calc::handlers::handle_calculate_ad_performance),
        )
        .route(
            "/api/calculate-profitability",
            post(calc::handlers::handle_calculate_profitability),
        )
        // Contact API
        .route("/api/contact", post(contact::handlers::handle_contact))
        .with_state(state)
}
