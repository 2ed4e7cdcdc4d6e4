use chrono::NaiveDate;
use jdg_tax_core::calendar::{horizon, CalendarMonth};
use jdg_tax_core::comparison::compare_regimes;
use jdg_tax_core::contributions::social::{contribution_schedule, ContributionStage, ScheduleInput};
use jdg_tax_core::projection::{project_regime, LumpSumMonth, ProjectionRequest};
use jdg_tax_core::regimes::{annual_tax, lump_sum, AnnualTaxInput, Regime, RevenueByRate};
use jdg_tax_core::tables::{self, TaxTables};
use jdg_tax_core::HORIZON_MONTHS;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn flat_request(revenue: Decimal, cost: Decimal) -> ProjectionRequest {
    ProjectionRequest {
        base_month: "2025-01".parse().unwrap(),
        business_start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        monthly_revenues: vec![revenue; HORIZON_MONTHS],
        monthly_costs: vec![cost; HORIZON_MONTHS],
        one_time_costs: vec![],
        lump_sum_revenues: None,
    }
}

// ===========================================================================
// End-to-end scenarios
// ===========================================================================

#[test]
fn test_scenario_a_contribution_stages_under_scale() {
    let tables = tables::published().unwrap();
    let out = project_regime(&flat_request(dec!(50000), dec!(5000)), Regime::Scale, tables).unwrap();
    let months = &out.result.months;

    assert_eq!(months[0].contribution, dec!(0.00));
    assert_eq!(months[6].contribution, dec!(626.49));
    assert_eq!(months[30].contribution, dec!(1860.88));

    assert_eq!(months[5].contribution_stage, ContributionStage::Relief);
    assert_eq!(months[29].contribution_stage, ContributionStage::Preferential);
}

#[test]
fn test_scenario_b_multi_rate_lump_sum() {
    let mut req = flat_request(dec!(0), dec!(0));
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

    let out = project_regime(&req, Regime::LumpSum, &TaxTables::fiscal_2025()).unwrap();
    assert_eq!(out.result.months[0].tax, dec!(5300.00));
    assert_eq!(out.result.months[1].tax, dec!(0.00));
    assert_eq!(out.result.summary_60_months.tax, dec!(5300.00));
}

#[test]
fn test_scenario_c_annual_scale_tax() {
    let input = AnnualTaxInput {
        regime: Regime::Scale,
        revenue: Some(dec!(200000)),
        costs: None,
        revenue_by_rate: None,
    };
    let out = annual_tax(&input, &TaxTables::fiscal_2025()).unwrap();
    assert_eq!(out.result.tax, dec!(36400.00));
    assert_eq!(out.metadata.tax_year, 2025);
}

#[test]
fn test_horizon_labels_round_trip() {
    let months = horizon("2025-01".parse().unwrap()).unwrap();
    let labels: Vec<String> = months.iter().map(|m| m.to_string()).collect();

    let expected: Vec<String> = (2025..=2029)
        .flat_map(|y| (1..=12).map(move |m| format!("{y}-{m:02}")))
        .collect();
    assert_eq!(labels, expected);

    for label in &labels {
        let parsed: CalendarMonth = label.parse().unwrap();
        assert_eq!(&parsed.to_string(), label);
    }
}

// ===========================================================================
// Cross-module identities
// ===========================================================================

#[test]
fn test_sixty_month_summary_is_sum_of_months() {
    let out = compare_regimes(&flat_request(dec!(23456.78), dec!(3210.99)), &TaxTables::fiscal_2025())
        .unwrap();
    for regime in Regime::ALL {
        let r = out.result.get(regime);
        let net: Decimal = r.months.iter().map(|m| m.net_income).sum();
        let tax: Decimal = r.months.iter().map(|m| m.tax).sum();
        let health: Decimal = r.months.iter().map(|m| m.health).sum();
        assert_eq!(r.summary_60_months.net_income, net, "{regime}");
        assert_eq!(r.summary_60_months.tax, tax, "{regime}");
        assert_eq!(r.summary_60_months.health, health, "{regime}");
    }
}

#[test]
fn test_projection_contributions_match_schedule() {
    let tables = TaxTables::fiscal_2025();
    let req = flat_request(dec!(12000), dec!(2000));
    let projected = project_regime(&req, Regime::Linear, &tables).unwrap().result;
    let schedule = contribution_schedule(
        &ScheduleInput {
            business_start_date: req.business_start_date,
            base_month: req.base_month,
            months: None,
        },
        &tables,
    )
    .unwrap()
    .result;

    assert_eq!(schedule.entries.len(), HORIZON_MONTHS);
    for (m, s) in projected.months.iter().zip(&schedule.entries) {
        assert_eq!(m.month, s.month);
        assert_eq!(m.contribution, s.amount);
    }
    assert_eq!(projected.summary_60_months.contribution, schedule.total);
}

#[test]
fn test_business_started_before_base_month() {
    let mut req = flat_request(dec!(10000), dec!(1000));
    req.business_start_date = NaiveDate::from_ymd_opt(2023, 3, 20).unwrap();
    let out = project_regime(&req, Regime::Scale, &TaxTables::fiscal_2025()).unwrap();

    // 22 months elapsed at 2025-01: full stage from 2025-09
    let months = &out.result.months;
    assert_eq!(months[0].contribution_stage, ContributionStage::Preferential);
    assert_eq!(months[7].contribution_stage, ContributionStage::Preferential);
    assert_eq!(months[8].contribution_stage, ContributionStage::Full);
}

#[test]
fn test_lump_sum_annual_matches_aggregated_months() {
    let months: Vec<RevenueByRate> = (0..12)
        .map(|i| {
            [(dec!(0.055), Decimal::from(10000 + i * 100)), (dec!(0.12), dec!(2500))]
                .into_iter()
                .collect()
        })
        .collect();
    let monthly_total: Decimal = months.iter().map(lump_sum::monthly_tax).sum();
    let annual = lump_sum::annual_tax(&lump_sum::aggregate(&months));
    assert_eq!(monthly_total, annual);
}

#[test]
fn test_custom_tables_change_results() {
    let mut custom = TaxTables::fiscal_2025();
    custom.linear_rate = dec!(0.20);
    custom.validate().unwrap();

    let standard = project_regime(&flat_request(dec!(20000), dec!(0)), Regime::Linear, &TaxTables::fiscal_2025())
        .unwrap();
    let changed = project_regime(&flat_request(dec!(20000), dec!(0)), Regime::Linear, &custom).unwrap();
    assert_eq!(standard.result.months[0].tax, dec!(3800.00));
    assert_eq!(changed.result.months[0].tax, dec!(4000.00));
}

#[test]
fn test_comparison_serializes_regime_ids() {
    let out = compare_regimes(&flat_request(dec!(50000), dec!(5000)), &TaxTables::fiscal_2025()).unwrap();
    let json = serde_json::to_value(&out).unwrap();

    assert_eq!(json["result"]["best_regime"], "linear_tax");
    assert_eq!(json["result"]["tax_scale"]["regime"], "tax_scale");
    assert_eq!(json["result"]["lump_sum"]["months"][0]["month"], "2025-01");
    assert_eq!(json["result"]["linear_tax"]["months"][0]["net_income"], "34245.00");
    assert_eq!(
        json["result"]["tax_scale"]["summary_6_months"]["label"],
        "After 6 months (end of start-up relief)"
    );
}
