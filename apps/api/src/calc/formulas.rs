//! Marketing calculator arithmetic.
//!
//! Pure functions over `f64`. Guards that depend on caller intent (all-zero
//! input, empty lists) live in the handlers; guards that are mathematical
//! (zero margin, zero investment, zero rate, zero CAC) live here and surface
//! as `None` or a zeroed ratio.

use serde::Serialize;

/// Break-even figures for one product.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakEven {
    pub contribution_margin: f64,
    pub break_even_quantity: f64,
    pub break_even_revenue: f64,
}

/// `None` when the selling price does not exceed the variable cost, i.e. the
/// contribution margin is zero or negative and no quantity ever breaks even.
pub fn break_even_point(fixed_cost: f64, variable_cost: f64, selling_price: f64) -> Option<BreakEven> {
    let contribution_margin = selling_price - variable_cost;
    if contribution_margin <= 0.0 {
        return None;
    }
    let break_even_quantity = fixed_cost / contribution_margin;
    Some(BreakEven {
        contribution_margin,
        break_even_quantity,
        break_even_revenue: break_even_quantity * selling_price,
    })
}

/// Return-on-investment figures. `roi` is a percentage, `roas` a multiple.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoiSummary {
    pub net_profit: f64,
    pub roi: f64,
    pub roas: f64,
}

/// `None` when there is no positive investment to divide by.
pub fn roi_summary(investment: f64, revenue: f64, cost: f64) -> Option<RoiSummary> {
    if investment <= 0.0 {
        return None;
    }
    let net_profit = revenue - cost;
    Some(RoiSummary {
        net_profit,
        roi: net_profit / investment * 100.0,
        roas: revenue / investment,
    })
}

/// Clicks and budget needed to hit a conversion target at a given CPC.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetPlan {
    pub required_clicks: f64,
    pub required_budget: f64,
}

/// `None` when the conversion rate is zero or negative.
pub fn budget_plan(target_conversions: f64, cpc: f64, conversion_rate: f64) -> Option<BudgetPlan> {
    if conversion_rate <= 0.0 {
        return None;
    }
    let required_clicks = target_conversions / (conversion_rate / 100.0);
    Some(BudgetPlan {
        required_clicks,
        required_budget: required_clicks * cpc,
    })
}

/// Projected gains from lifting the conversion rate.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CroProjection {
    pub additional_conversions: f64,
    pub monthly_revenue_increase: f64,
    pub yearly_revenue_increase: f64,
    pub conversion_rate_improvement: f64,
}

pub fn cro_projection(
    monthly_visitors: f64,
    current_rate: f64,
    improved_rate: f64,
    average_order_value: f64,
) -> CroProjection {
    let additional_conversions = monthly_visitors * (improved_rate - current_rate) / 100.0;
    let monthly_revenue_increase = additional_conversions * average_order_value;
    // Relative improvement is undefined from a zero baseline; report 0.
    let conversion_rate_improvement = if current_rate == 0.0 {
        0.0
    } else {
        (improved_rate - current_rate) / current_rate * 100.0
    };
    CroProjection {
        additional_conversions,
        monthly_revenue_increase,
        yearly_revenue_increase: monthly_revenue_increase * 12.0,
        conversion_rate_improvement,
    }
}

/// Search volume per won of competition-weighted click cost. Zero when the
/// denominator is zero.
pub fn keyword_score(search_volume: f64, competition: f64, cpc: f64) -> f64 {
    let denominator = competition * cpc;
    if denominator == 0.0 {
        0.0
    } else {
        search_volume / denominator
    }
}

/// Per-product ad performance. Ratios are zeroed when there was no ad spend.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdPerformance {
    pub revenue: f64,
    pub roas: f64,
    pub roi: f64,
    pub net_profit: f64,
}

pub fn ad_performance(price: f64, profit_per_unit: f64, ad_cost: f64, conversions: f64) -> AdPerformance {
    let revenue = price * conversions;
    let net_profit = profit_per_unit * conversions - ad_cost;
    let (roas, roi) = if ad_cost == 0.0 {
        (0.0, 0.0)
    } else {
        (revenue / ad_cost, net_profit / ad_cost * 100.0)
    };
    AdPerformance {
        revenue,
        roas,
        roi,
        net_profit,
    }
}

/// Maximum ad spend per conversion that still leaves the sale profitable.
pub fn target_cpa(selling_price: f64, cost: f64) -> f64 {
    selling_price - cost
}

/// Lifetime value: average order amount times yearly purchase frequency.
pub fn customer_ltv(order_amount: f64, purchase_frequency: f64) -> f64 {
    order_amount * purchase_frequency
}

/// `None` when there is no positive acquisition cost to divide by.
pub fn ltv_cac_ratio(ltv: f64, cac: f64) -> Option<f64> {
    if cac <= 0.0 {
        return None;
    }
    Some(ltv / cac)
}

/// Marketing health label for an LTV:CAC ratio: 3:1 and up is healthy,
/// break-even and up needs attention, below that is losing money.
pub fn health_status(ratio: f64) -> &'static str {
    if ratio >= 3.0 {
        "건강"
    } else if ratio >= 1.0 {
        "주의"
    } else {
        "위험"
    }
}
