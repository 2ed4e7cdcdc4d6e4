use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::contributions::social;
use crate::regimes::{lump_sum, MonthBasis, Regime};
use crate::tables::TaxTables;
use crate::types::*;
use crate::JdgTaxResult;

use super::plan::{ProjectionPlan, ProjectionRequest};
use super::summary::{prefix_summary, yearly_summaries, MonthlyResult, PeriodSummary, PERIOD_CUTS};

/// Sixty-month projection for a single regime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegimeResult {
    pub regime: Regime,
    pub months: Vec<MonthlyResult>,
    pub summary_6_months: PeriodSummary,
    pub summary_12_months: PeriodSummary,
    pub summary_30_months: PeriodSummary,
    pub summary_60_months: PeriodSummary,
    /// Totals per calendar year.
    pub yearly: Vec<PeriodSummary>,
}

impl RegimeResult {
    /// Net income over the whole horizon.
    pub fn total_net_income(&self) -> Money {
        self.summary_60_months.net_income
    }
}

/// Run one regime over a validated plan. Pure; never fails.
pub fn project(regime: Regime, plan: &ProjectionPlan, tables: &TaxTables) -> RegimeResult {
    let months: Vec<MonthlyResult> = plan
        .months()
        .iter()
        .enumerate()
        .map(|(i, &month)| {
            let by_rate = plan.lump_sum_revenue(i);
            let revenue = if regime.taxes_revenue() {
                finalize(lump_sum::total_revenue(by_rate))
            } else {
                finalize(plan.revenue(i))
            };
            let costs = finalize(plan.cost(i));
            let income = revenue - costs;

            let stage = social::stage(plan.business_start(), month, tables);
            let contribution = social::stage_amount(stage, tables);

            let assessed = regime.assess_month(
                &MonthBasis {
                    income,
                    revenue_by_rate: by_rate,
                },
                tables,
            );

            MonthlyResult {
                month_index: i,
                month,
                revenue,
                costs,
                income,
                contribution_stage: stage,
                contribution,
                tax: assessed.tax,
                health: assessed.health,
                net_income: income - contribution - assessed.tax - assessed.health,
            }
        })
        .collect();

    let [s6, s12, s30, s60] = PERIOD_CUTS.map(|(count, label)| prefix_summary(label, &months, count));
    let yearly = yearly_summaries(&months);

    tracing::debug!(
        regime = regime.id(),
        net_income = %s60.net_income,
        tax = %s60.tax,
        "projection complete"
    );

    RegimeResult {
        regime,
        months,
        summary_6_months: s6,
        summary_12_months: s12,
        summary_30_months: s30,
        summary_60_months: s60,
        yearly,
    }
}

/// Validate a request and project a single regime.
pub fn project_regime(
    request: &ProjectionRequest,
    regime: Regime,
    tables: &TaxTables,
) -> JdgTaxResult<ComputationOutput<RegimeResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let plan = request.plan()?;
    if regime == Regime::LumpSum && !plan.has_lump_sum_revenue() {
        warnings.push(
            "No lump-sum revenue supplied; the lump-sum projection carries zero revenue."
                .to_string(),
        );
    }

    let result = project(regime, &plan, tables);
    warnings.extend(super::revenue_limit_warnings(&result, tables));

    let assumptions = serde_json::json!({
        "regime": regime,
        "base_month": request.base_month.to_string(),
        "business_start_date": request.business_start_date.to_string(),
        "horizon_months": HORIZON_MONTHS,
        "one_time_costs": request.one_time_costs.len(),
    });

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        &format!(
            "Sixty-month projection under the {} with staged social contributions",
            regime.description()
        ),
        &assumptions,
        warnings,
        tables.tax_year,
        elapsed,
        result,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contributions::social::ContributionStage;
    use crate::projection::plan::{LumpSumMonth, OneTimeCost};
    use crate::regimes::RevenueByRate;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn tables() -> TaxTables {
        TaxTables::fiscal_2025()
    }

    fn request(revenue: Decimal, cost: Decimal) -> ProjectionRequest {
        ProjectionRequest {
            base_month: "2025-01".parse().unwrap(),
            business_start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            monthly_revenues: vec![revenue; HORIZON_MONTHS],
            monthly_costs: vec![cost; HORIZON_MONTHS],
            one_time_costs: vec![],
            lump_sum_revenues: None,
        }
    }

    #[test]
    fn test_scale_contribution_stages() {
        let plan = request(dec!(50000), dec!(5000)).plan().unwrap();
        let r = project(Regime::Scale, &plan, &tables());

        assert_eq!(r.months.len(), 60);
        assert_eq!(r.months[0].contribution, dec!(0));
        assert_eq!(r.months[0].contribution_stage, ContributionStage::Relief);
        assert_eq!(r.months[5].contribution, dec!(0));
        assert_eq!(r.months[6].contribution, dec!(626.49));
        assert_eq!(r.months[29].contribution, dec!(626.49));
        assert_eq!(r.months[30].contribution, dec!(1860.88));
        assert_eq!(r.months[59].contribution_stage, ContributionStage::Full);
    }

    #[test]
    fn test_scale_month_values() {
        let plan = request(dec!(50000), dec!(5000)).plan().unwrap();
        let r = project(Regime::Scale, &plan, &tables());
        let m = &r.months[0];

        assert_eq!(m.month.to_string(), "2025-01");
        assert_eq!(m.income, dec!(45000));
        assert_eq!(m.tax, dec!(12100.00));
        assert_eq!(m.health, dec!(4050.00));
        assert_eq!(m.net_income, dec!(28850.00));
    }

    #[test]
    fn test_linear_month_values() {
        let plan = request(dec!(50000), dec!(5000)).plan().unwrap();
        let r = project(Regime::Linear, &plan, &tables());

        let m0 = &r.months[0];
        assert_eq!(m0.tax, dec!(8550.00));
        assert_eq!(m0.health, dec!(2205.00));
        assert_eq!(m0.net_income, dec!(34245.00));

        let m6 = &r.months[6];
        assert_eq!(m6.net_income, dec!(34245.00) - dec!(626.49));
    }

    #[test]
    fn test_lump_sum_taxes_revenue_and_shows_income_after_costs() {
        let mut req = request(dec!(0), dec!(5000));
        req.lump_sum_revenues = Some(
            (0..HORIZON_MONTHS)
                .map(|i| LumpSumMonth {
                    month_index: i,
                    revenues_by_rate: if i == 0 {
                        [(dec!(0.055), dec!(50000)), (dec!(0.085), dec!(30000))]
                            .into_iter()
                            .collect()
                    } else {
                        RevenueByRate::new()
                    },
                })
                .collect(),
        );
        let plan = req.plan().unwrap();
        let r = project(Regime::LumpSum, &plan, &tables());

        let m0 = &r.months[0];
        assert_eq!(m0.revenue, dec!(80000));
        assert_eq!(m0.costs, dec!(5000));
        assert_eq!(m0.income, dec!(75000));
        assert_eq!(m0.tax, dec!(5300.00));
        assert_eq!(m0.health, dec!(554.43));
        assert_eq!(m0.net_income, dec!(69145.57));

        let m1 = &r.months[1];
        assert_eq!(m1.revenue, dec!(0));
        assert_eq!(m1.tax, dec!(0));
        assert_eq!(m1.income, dec!(-5000));
        assert_eq!(m1.health, dec!(554.43));
    }

    #[test]
    fn test_negative_income_reported_as_is() {
        let plan = request(dec!(1000), dec!(4000)).plan().unwrap();
        let r = project(Regime::Scale, &plan, &tables());
        let m = &r.months[0];
        assert_eq!(m.income, dec!(-3000));
        assert_eq!(m.tax, dec!(0));
        assert_eq!(m.health, dec!(314.96));
        assert_eq!(m.net_income, dec!(-3314.96));
    }

    #[test]
    fn test_one_time_cost_lands_in_its_month() {
        let mut req = request(dec!(20000), dec!(2000));
        req.one_time_costs = vec![
            OneTimeCost { month_index: 12, amount: dec!(3000) },
            OneTimeCost { month_index: 12, amount: dec!(2000) },
        ];
        let plan = req.plan().unwrap();
        let r = project(Regime::Linear, &plan, &tables());
        assert_eq!(r.months[11].costs, dec!(2000));
        assert_eq!(r.months[12].costs, dec!(7000));
        assert_eq!(r.months[12].income, dec!(13000));
        assert_eq!(r.summary_60_months.costs, dec!(2000) * dec!(60) + dec!(5000));
    }

    #[test]
    fn test_summaries_are_prefix_sums() {
        let plan = request(dec!(30000), dec!(3000)).plan().unwrap();
        let r = project(Regime::Linear, &plan, &tables());

        assert_eq!(r.summary_6_months.months_count, 6);
        assert_eq!(r.summary_12_months.months_count, 12);
        assert_eq!(r.summary_30_months.months_count, 30);
        assert_eq!(r.summary_60_months.months_count, 60);

        let first_12: Decimal = r.months[..12].iter().map(|m| m.net_income).sum();
        assert_eq!(r.summary_12_months.net_income, first_12);
        assert_eq!(r.summary_6_months.contribution, dec!(0));
        assert_eq!(r.summary_30_months.contribution, dec!(626.49) * dec!(24));
    }

    #[test]
    fn test_yearly_summaries_cover_horizon() {
        let plan = request(dec!(30000), dec!(3000)).plan().unwrap();
        let r = project(Regime::Scale, &plan, &tables());
        assert_eq!(r.yearly.len(), 5);
        let total: Decimal = r.yearly.iter().map(|y| y.net_income).sum();
        assert_eq!(total, r.total_net_income());
    }

    #[test]
    fn test_project_regime_warns_without_lump_sum_revenue() {
        let out = project_regime(&request(dec!(10000), dec!(0)), Regime::LumpSum, &tables())
            .unwrap();
        assert_eq!(out.result.summary_60_months.revenue, dec!(0));
        assert!(out.warnings.iter().any(|w| w.contains("No lump-sum revenue")));
    }

    #[test]
    fn test_project_regime_warns_above_book_limit() {
        let out = project_regime(&request(dec!(200000), dec!(0)), Regime::Scale, &tables())
            .unwrap();
        // 12 * 200000 = 2.4M per calendar year
        assert_eq!(out.warnings.len(), 5);
    }

    #[test]
    fn test_project_regime_rejects_invalid_request() {
        let mut req = request(dec!(10000), dec!(0));
        req.monthly_costs.truncate(10);
        assert!(project_regime(&req, Regime::Linear, &tables()).is_err());
    }
}
