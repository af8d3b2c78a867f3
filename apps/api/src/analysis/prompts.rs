// Korean prompt builders for the analysis endpoints. Each builder embeds the
// caller's computed numbers with the display formatting the narrative expects:
// currency with thousands separators, rates with fixed decimals, keyword and
// performance tables as pretty-printed JSON with Korean keys.

use serde_json::{json, Value};

use crate::estimation::schema::{json_number, round_to};

use super::handlers::{
    BreakEvenAnalysisRequest, BudgetAnalysisRequest, CroAnalysisRequest, KeywordMetrics,
    PerformanceAnalysisRequest, ProfitabilityAnalysisRequest, RoiAnalysisRequest,
};

pub fn break_even_analysis_prompt(request: &BreakEvenAnalysisRequest) -> String {
    format!(
        "다음은 손익분기점 계산 결과입니다. 이 데이터를 종합적으로 분석하고 인사이트를 제공해주세요.

**상품 정보:**
- 상품명: {name}

**계산 결과:**
- 총 고정비: {fixed_cost}원
- 제품 1개당 변동비: {variable_cost}원
- 제품 1개당 판매가: {selling_price}원
- 단위당 기여이익: {contribution_margin}원
- 손익분기점 수량: {quantity:.2}개
- 손익분기점 매출: {revenue}원

다음 항목들을 포함하여 상세한 분석을 제공해주세요:

1. **손익분기점 달성 가능성**: 계산된 손익분기점이 현실적으로 달성 가능한지 평가
2. **기여이익 분석**: 기여이익률이 업계 평균 대비 어떤 수준인지 분석
3. **가격 전략 평가**: 현재 판매가가 적정한지 평가
4. **비용 구조 분석**: 고정비와 변동비의 구조가 효율적인지 분석
5. **목표 달성 전략**: 손익분기점을 달성하기 위한 구체적인 전략 제안
6. **리스크 관리**: 손익분기점 미달성 시 대응 방안

분석은 한국어로 작성하고, 구체적인 수치와 근거를 포함하여 설명해주세요.
분석 결과는 마크다운 형식으로 작성해주세요.",
        name = display_name(&request.product_name),
        fixed_cost = format_won(request.fixed_cost),
        variable_cost = format_won(request.variable_cost),
        selling_price = format_won(request.selling_price),
        contribution_margin = format_won(request.contribution_margin),
        quantity = request.break_even_quantity,
        revenue = format_won(request.break_even_revenue),
    )
}

pub fn roi_analysis_prompt(request: &RoiAnalysisRequest) -> String {
    format!(
        "다음은 ROI(투자 대비 수익률) 계산 결과입니다. 이 데이터를 종합적으로 분석하고 인사이트를 제공해주세요.

**상품/비즈니스 정보:**
- 상품명: {name}

**계산 결과:**
- 투자금 (광고비): {investment}원
- 매출: {revenue}원
- 비용: {cost}원
- 순이익: {net_profit}원
- ROI: {roi:.2}%
- ROAS: {roas:.2}배

다음 항목들을 포함하여 상세한 분석을 제공해주세요:

1. **ROI 성과 평가**: 현재 ROI 수치가 업계 평균 대비 어떤 수준인지 평가
2. **수익성 분석**: 순이익과 ROAS를 기반으로 한 수익성 평가
3. **투자 효율성**: 투자금 대비 매출 및 순이익의 효율성 분석
4. **개선 방안**: ROI를 높이기 위한 구체적인 개선 제안
5. **비교 분석**: ROAS와 ROI의 관계를 통한 광고 전략 평가
6. **전략적 권장사항**: 향후 광고 예산 배분 및 전략에 대한 권장사항

분석은 한국어로 작성하고, 구체적인 수치와 근거를 포함하여 설명해주세요.
분석 결과는 마크다운 형식으로 작성해주세요.",
        name = display_name(&request.product_name),
        investment = format_won(request.investment),
        revenue = format_won(request.revenue),
        cost = format_won(request.cost),
        net_profit = format_won(request.net_profit),
        roi = request.roi,
        roas = request.roas,
    )
}

pub fn budget_analysis_prompt(request: &BudgetAnalysisRequest) -> String {
    format!(
        "다음은 광고 예산 계산 결과입니다. 이 데이터를 종합적으로 분석하고 인사이트를 제공해주세요.

**상품/목표 정보:**
- 상품명: {name}

**계산 결과:**
- 목표 전환수: {target_conversions}건
- CPC (클릭당 비용): {cpc}원
- 전환율: {conversion_rate:.2}%
- 필요한 클릭수: {required_clicks}회
- 필요한 예산: {required_budget}원

다음 항목들을 포함하여 상세한 분석을 제공해주세요:

1. **예산 적정성 평가**: 계산된 예산이 업계 평균 대비 적정한지 평가
2. **CPC 분석**: 현재 CPC가 경쟁력 있는 수준인지 분석
3. **전환율 평가**: 전환율이 업계 평균 대비 어떤 수준인지 평가
4. **예산 최적화 방안**: 예산을 효율적으로 사용하기 위한 구체적인 제안
5. **리스크 분석**: 예산 집행 시 예상되는 리스크와 대응 방안
6. **단계별 예산 배분**: 예산을 단계적으로 배분하는 전략 제안

분석은 한국어로 작성하고, 구체적인 수치와 근거를 포함하여 설명해주세요.
분석 결과는 마크다운 형식으로 작성해주세요.",
        name = display_name(&request.product_name),
        target_conversions = format_won(request.target_conversions),
        cpc = format_won(request.cpc),
        conversion_rate = request.conversion_rate,
        required_clicks = format_won(request.required_clicks.ceil()),
        required_budget = format_won(request.required_budget.ceil()),
    )
}

pub fn cro_analysis_prompt(request: &CroAnalysisRequest) -> String {
    format!(
        "다음은 전환율 최적화(CRO) 계산 결과입니다. 이 데이터를 분석하여 실용적이고 구체적인 개선 전략을 제안해주세요.

**현재 상황:**
- 월간 방문자 수: {visitors}명
- 현재 전환율: {current_rate}%
- 목표 전환율: {improved_rate}%
- 평균 주문 금액: {order_value}원

**예상 개선 효과:**
- 추가 확보 전환수: {additional:.0}건/월
- 월간 매출 증가액: {monthly_increase}원
- 연간 매출 증가액: {yearly_increase}원
- 전환율 개선률: {sign}{improvement:.1}%

다음 항목들을 포함하여 상세하고 실용적인 분석을 제공해주세요:

1. **현재 상황 분석**: 현재 전환율 수준과 개선 여지 평가
2. **핵심 개선 전략**: 전환율을 {current_rate}%에서 {improved_rate}%로 높이기 위한 구체적인 5가지 전략 제안
3. **A/B 테스트 아이디어**: 실제로 테스트할 수 있는 구체적인 A/B 테스트 아이디어 5가지 (테스트할 요소, 예상 효과 포함)
4. **우선순위별 액션 플랜**: 즉시 실행 가능한 단계별 액션 플랜 (1단계, 2단계, 3단계)
5. **예상 성과**: 각 전략별 예상 개선 효과와 ROI

분석은 한국어로 작성하고, 구체적이고 실행 가능한 내용으로 작성해주세요.
마크다운 형식으로 작성하되, 각 섹션은 명확하게 구분해주세요.
수치와 근거를 포함하여 설득력 있게 작성해주세요.",
        visitors = format_won(request.monthly_visitors),
        current_rate = json_number(request.current_conversion_rate),
        improved_rate = json_number(request.improved_conversion_rate),
        order_value = format_won(request.average_order_value),
        additional = request.additional_conversions,
        monthly_increase = format_won(request.monthly_revenue_increase),
        yearly_increase = format_won(request.yearly_revenue_increase),
        sign = if request.conversion_rate_improvement > 0.0 { "+" } else { "" },
        improvement = request.conversion_rate_improvement,
    )
}

pub fn keywords_analysis_prompt(keywords: &[&KeywordMetrics]) -> String {
    let rows: Vec<Value> = keywords
        .iter()
        .map(|k| {
            json!({
                "키워드": k.keyword,
                "검색량": json_number(k.search_volume),
                "경쟁도": json_number(k.competition),
                "CPC": format!("{}원", format_won(k.cpc)),
                "점수": format!("{:.2}", k.score),
            })
        })
        .collect();

    format!(
        "다음은 여러 키워드의 분석 데이터입니다. 이 데이터를 종합적으로 분석하고 인사이트를 제공해주세요.

키워드 데이터:
{table}

다음 항목들을 포함하여 상세한 분석을 제공해주세요:

1. **최적 키워드 선정**: 점수를 기반으로 가장 효율적인 키워드 분석
2. **키워드 그룹화**: 검색량, 경쟁도, CPC를 기준으로 키워드를 그룹화하여 분석
3. **경쟁력 분석**: 각 키워드의 경쟁력과 기회 분석
4. **예산 효율성**: CPC와 검색량을 고려한 예산 효율성 분석
5. **키워드 전략**: 키워드별 광고 전략 제안
6. **개선 제안**: 키워드 선택 및 활용 개선 방안

분석은 한국어로 작성하고, 구체적인 수치와 근거를 포함하여 설명해주세요.
분석 결과는 마크다운 형식으로 작성해주세요.",
        table = serde_json::to_string_pretty(&rows).unwrap_or_default(),
    )
}

pub fn performance_analysis_prompt(request: &PerformanceAnalysisRequest) -> String {
    let rows: Vec<Value> = request
        .products
        .iter()
        .map(|product| {
            let result = request.results.get(&product.id);
            json!({
                "상품명": product.name,
                "판매가": json_number(product.price),
                "개당순이익": json_number(product.profit_per_unit),
                "광고비": json_number(product.ad_cost),
                "전환수": json_number(product.conversions),
                "매출": json_number(result.map_or(0.0, |r| r.revenue)),
                "ROAS": json_number(result.map_or(0.0, |r| r.roas)),
                "ROI": json_number(result.map_or(0.0, |r| r.roi)),
                "순이익": json_number(result.map_or(0.0, |r| r.net_profit)),
            })
        })
        .collect();

    format!(
        "다음은 여러 상품의 광고 성과 데이터입니다. 이 데이터를 종합적으로 분석하고 인사이트를 제공해주세요.

상품 데이터:
{table}

다음 항목들을 포함하여 상세한 분석을 제공해주세요:

1. **전체 성과 요약**: 전체적인 광고 성과를 한눈에 파악할 수 있도록 요약
2. **최고 성과 상품 분석**: 가장 좋은 성과를 낸 상품의 특징과 강점 분석
3. **개선이 필요한 상품**: 성과가 낮은 상품의 문제점과 개선 방안 제시
4. **비교 분석**: 상품들 간의 차이점과 패턴 분석
5. **구체적인 개선 제안**: 각 상품별로 구체적인 개선 방안 제시 (광고비 조정, 전환율 개선 등)
6. **전략적 권장사항**: 전체적인 광고 전략에 대한 권장사항

분석은 한국어로 작성하고, 구체적인 수치와 근거를 포함하여 설명해주세요.
분석 결과는 마크다운 형식으로 작성해주세요.",
        table = serde_json::to_string_pretty(&rows).unwrap_or_default(),
    )
}

pub fn profitability_analysis_prompt(request: &ProfitabilityAnalysisRequest) -> String {
    format!(
        "다음은 마케팅 수익성 진단 결과입니다. 이 데이터를 종합적으로 분석하고 인사이트를 제공해주세요.

**상품 정보:**
- 상품명: {name}

**진단 결과:**
- 목표 CPA (1회 전환당 최대 광고비): {target_cpa}원
- LTV (고객 생애 가치): {ltv}원
- LTV:CAC 비율: {ratio:.2}:1
- 마케팅 건전성: {health_status}

다음 항목들을 포함하여 상세한 분석을 제공해주세요:

1. **건전성 평가**: 현재 마케팅 건전성이 업계 평균 대비 어떤 수준인지 평가
2. **CPA 적정성**: 목표 CPA가 LTV 대비 적정한지 분석
3. **LTV 최적화**: LTV를 높이기 위한 구체적인 방안 제시
4. **비율 개선**: LTV:CAC 비율을 개선하기 위한 전략 제안
5. **예산 배분**: 건전성을 고려한 광고 예산 배분 전략
6. **리스크 관리**: 수익성 저하 시 대응 방안

분석은 한국어로 작성하고, 구체적인 수치와 근거를 포함하여 설명해주세요.
분석 결과는 마크다운 형식으로 작성해주세요.",
        name = display_name(&request.product_name),
        target_cpa = format_won(request.target_cpa),
        ltv = format_won(request.ltv),
        ratio = request.ratio,
        health_status = request.health_status,
    )
}

/// Product name for display; blank names render as `미입력`.
fn display_name(name: &Option<String>) -> &str {
    name.as_deref().filter(|v| !v.trim().is_empty()).unwrap_or("미입력")
}

/// Formats a currency-like amount with thousands separators, keeping up to
/// three decimal places and trimming trailing zeros.
pub(crate) fn format_won(value: f64) -> String {
    let rounded = round_to(value, 3);
    let negative = rounded < 0.0;
    let abs = rounded.abs();
    let int_part = abs.trunc() as i64;
    let fraction = abs.fract();

    let digits = int_part.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if negative {
        grouped.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if fraction > 0.0 {
        let frac = format!("{fraction:.3}");
        let frac = frac.trim_start_matches('0').trim_end_matches('0');
        grouped.push_str(frac);
    }

    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_format_won_groups_thousands() {
        assert_eq!(format_won(1234567.0), "1,234,567");
        assert_eq!(format_won(1000.0), "1,000");
        assert_eq!(format_won(999.0), "999");
        assert_eq!(format_won(0.0), "0");
    }

    #[test]
    fn test_format_won_keeps_short_fractions() {
        assert_eq!(format_won(1234.5), "1,234.5");
        assert_eq!(format_won(0.25), "0.25");
    }

    #[test]
    fn test_format_won_handles_negative_amounts() {
        assert_eq!(format_won(-1234567.0), "-1,234,567");
    }

    #[test]
    fn test_break_even_prompt_embeds_formatted_figures() {
        let request = BreakEvenAnalysisRequest {
            product_name: Some("유기농 비누".to_string()),
            fixed_cost: 2000000.0,
            variable_cost: 15000.0,
            selling_price: 50000.0,
            contribution_margin: 35000.0,
            break_even_quantity: 57.142857,
            break_even_revenue: 2857142.85,
        };
        let prompt = break_even_analysis_prompt(&request);
        assert!(prompt.contains("- 상품명: 유기농 비누"));
        assert!(prompt.contains("- 총 고정비: 2,000,000원"));
        assert!(prompt.contains("- 손익분기점 수량: 57.14개"));
        assert!(prompt.contains("분석 결과는 마크다운 형식으로 작성해주세요."));
    }

    #[test]
    fn test_blank_product_name_renders_as_placeholder() {
        let request = RoiAnalysisRequest {
            product_name: Some("  ".to_string()),
            investment: 1000000.0,
            revenue: 3000000.0,
            cost: 1500000.0,
            net_profit: 1500000.0,
            roi: 150.0,
            roas: 3.0,
        };
        let prompt = roi_analysis_prompt(&request);
        assert!(prompt.contains("- 상품명: 미입력"));
        assert!(prompt.contains("- ROI: 150.00%"));
        assert!(prompt.contains("- ROAS: 3.00배"));
    }

    #[test]
    fn test_budget_prompt_ceils_derived_figures() {
        let request = BudgetAnalysisRequest {
            product_name: None,
            target_conversions: 100.0,
            cpc: 500.0,
            conversion_rate: 2.5,
            required_clicks: 4000.2,
            required_budget: 2000100.1,
        };
        let prompt = budget_analysis_prompt(&request);
        assert!(prompt.contains("- 필요한 클릭수: 4,001회"));
        assert!(prompt.contains("- 필요한 예산: 2,000,101원"));
        assert!(prompt.contains("- 전환율: 2.50%"));
    }

    #[test]
    fn test_cro_prompt_marks_positive_improvement() {
        let request = CroAnalysisRequest {
            monthly_visitors: 10000.0,
            current_conversion_rate: 2.0,
            improved_conversion_rate: 3.5,
            average_order_value: 50000.0,
            additional_conversions: 150.0,
            monthly_revenue_increase: 7500000.0,
            yearly_revenue_increase: 90000000.0,
            conversion_rate_improvement: 75.0,
        };
        let prompt = cro_analysis_prompt(&request);
        assert!(prompt.contains("- 전환율 개선률: +75.0%"));
        assert!(prompt.contains("전환율을 2%에서 3.5%로 높이기"));
    }

    #[test]
    fn test_keywords_table_formats_cpc_and_score() {
        let keyword = KeywordMetrics {
            keyword: "유기농 비누".to_string(),
            search_volume: 8000.0,
            competition: 7.0,
            cpc: 1500.0,
            score: 0.7619,
        };
        let prompt = keywords_analysis_prompt(&[&keyword]);
        assert!(prompt.contains("\"키워드\": \"유기농 비누\""));
        assert!(prompt.contains("\"검색량\": 8000"));
        assert!(prompt.contains("\"CPC\": \"1,500원\""));
        assert!(prompt.contains("\"점수\": \"0.76\""));
    }

    #[test]
    fn test_performance_rows_default_missing_results_to_zero() {
        let request = PerformanceAnalysisRequest {
            products: vec![super::super::handlers::ProductEntry {
                id: "p1".to_string(),
                name: "유기농 비누".to_string(),
                price: 12000.0,
                profit_per_unit: 4000.0,
                ad_cost: 80000.0,
                conversions: 15.0,
            }],
            results: HashMap::new(),
        };
        let prompt = performance_analysis_prompt(&request);
        assert!(prompt.contains("\"상품명\": \"유기농 비누\""));
        assert!(prompt.contains("\"매출\": 0"));
    }

    #[test]
    fn test_profitability_prompt_carries_health_status() {
        let request = ProfitabilityAnalysisRequest {
            product_name: Some("유기농 비누".to_string()),
            target_cpa: 30000.0,
            ltv: 90000.0,
            ratio: 3.0,
            health_status: "건강".to_string(),
        };
        let prompt = profitability_analysis_prompt(&request);
        assert!(prompt.contains("- LTV:CAC 비율: 3.00:1"));
        assert!(prompt.contains("- 마케팅 건전성: 건강"));
    }
}
