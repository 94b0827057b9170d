//! Money model: turns effort estimates and saving metrics into cost and
//! revenue figures. Pure arithmetic; bad input surfaces as NaN, never as an
//! error.

use crate::config::FinanceConfig;
use crate::models::{AggregatedReport, BusinessParams, EnrichmentResult, SavingsEstimate};

/// Revenue multiplier by number of ads on a page (1..=5).
pub const ADS_COEFFICIENTS: [f64; 5] = [1.0, 1.7, 2.4, 2.8, 3.4];

pub fn ads_coefficient(ads_per_page: i64) -> f64 {
    let last = ADS_COEFFICIENTS.len() - 1;
    let index = usize::try_from(ads_per_page.saturating_sub(1))
        .unwrap_or(0)
        .min(last);
    ADS_COEFFICIENTS[index]
}

pub fn work_cost(total_hours: f64, developer_rate: f64) -> f64 {
    total_hours * developer_rate
}

/// Annualized ad revenue proxy: 30 days a month, 12 months.
pub fn current_income(visitor_quantity: f64, pages_per_visit: f64, ads_per_page: i64) -> f64 {
    30.0 * visitor_quantity / 10000.0 * pages_per_visit * ads_coefficient(ads_per_page) * 12.0
}

pub fn potential_income_increase(current_income: f64, income_coefficient: f64, total_blocking_time: f64) -> f64 {
    current_income * income_coefficient / 100.0 * total_blocking_time / 1000.0
}

pub fn potential_revenue_gain(largest_contentful_paint: f64, income_coefficient: f64) -> f64 {
    largest_contentful_paint / 1000.0 * income_coefficient
}

/// Sum of the parsed estimates. Failed findings count as zero; an
/// unparseable estimate poisons the sum with NaN.
pub fn total_estimate_hours(tasks: &[EnrichmentResult]) -> f64 {
    tasks.iter().flatten().map(|task| task.hours()).sum()
}

/// Mean of the present scores, scaled to 0..100. `None` when no run
/// produced a score.
pub fn average_score(scores: &[Option<f64>]) -> Option<f64> {
    let present: Vec<f64> = scores.iter().flatten().copied().collect();
    if present.is_empty() {
        return None;
    }
    Some(present.iter().sum::<f64>() / present.len() as f64 * 100.0)
}

pub fn calculate_savings(
    total_hours: f64,
    params: &BusinessParams,
    finance: &FinanceConfig,
    total_blocking_time: f64,
    largest_contentful_paint: f64,
) -> SavingsEstimate {
    let income = current_income(params.visitor_quantity, params.pages_per_visit, params.ads_per_page);
    SavingsEstimate {
        work_cost: work_cost(total_hours, finance.developer_rate),
        potential_income_increase: potential_income_increase(
            income,
            finance.income_cost_coefficient,
            total_blocking_time,
        ),
        potential_revenue_gain: potential_revenue_gain(
            largest_contentful_paint,
            finance.income_cost_coefficient,
        ),
    }
}

/// Money figures for one analysis, reading TBT and LCP from the aggregated
/// saving metrics.
pub fn estimate(
    aggregated: &AggregatedReport,
    tasks: &[EnrichmentResult],
    params: &BusinessParams,
    finance: &FinanceConfig,
) -> SavingsEstimate {
    calculate_savings(
        total_estimate_hours(tasks),
        params,
        finance,
        aggregated.saving("TBT"),
        aggregated.saving("LCP"),
    )
}
