use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calendar::{group_by_year, CalendarMonth};
use crate::contributions::social::ContributionStage;
use crate::types::{Money, MonthIndex};

/// One month of a regime projection. All amounts are final (2 dp).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyResult {
    pub month_index: MonthIndex,
    pub month: CalendarMonth,
    pub revenue: Money,
    pub costs: Money,
    /// Revenue less costs; may be negative.
    pub income: Money,
    pub contribution_stage: ContributionStage,
    /// Social contribution (ZUS).
    pub contribution: Money,
    pub tax: Money,
    pub health: Money,
    pub net_income: Money,
}

/// Totals over the first `months_count` months (or over a calendar year).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodSummary {
    pub label: String,
    pub months_count: usize,
    pub revenue: Money,
    pub costs: Money,
    pub income: Money,
    pub contribution: Money,
    pub tax: Money,
    pub health: Money,
    /// Social plus health contributions.
    pub total_contributions: Money,
    /// Contributions plus tax.
    pub total_burden: Money,
    pub net_income: Money,
}

/// Reporting cut points: end of relief, first year, end of the preferential
/// stage, full horizon.
pub const PERIOD_CUTS: [(usize, &str); 4] = [
    (6, "After 6 months (end of start-up relief)"),
    (12, "After 12 months (first year)"),
    (30, "After 30 months (end of preferential contributions)"),
    (60, "After 60 months (5 years)"),
];

pub fn summarize<'a, I>(label: &str, entries: I) -> PeriodSummary
where
    I: IntoIterator<Item = &'a MonthlyResult>,
{
    let mut s = PeriodSummary {
        label: label.to_string(),
        months_count: 0,
        revenue: Decimal::ZERO,
        costs: Decimal::ZERO,
        income: Decimal::ZERO,
        contribution: Decimal::ZERO,
        tax: Decimal::ZERO,
        health: Decimal::ZERO,
        total_contributions: Decimal::ZERO,
        total_burden: Decimal::ZERO,
        net_income: Decimal::ZERO,
    };

    for m in entries {
        s.months_count += 1;
        s.revenue += m.revenue;
        s.costs += m.costs;
        s.income += m.income;
        s.contribution += m.contribution;
        s.tax += m.tax;
        s.health += m.health;
        s.net_income += m.net_income;
    }
    s.total_contributions = s.contribution + s.health;
    s.total_burden = s.total_contributions + s.tax;
    s
}

/// Summary of the first `count` months.
pub fn prefix_summary(label: &str, months: &[MonthlyResult], count: usize) -> PeriodSummary {
    summarize(label, &months[..count.min(months.len())])
}

/// One summary per calendar year touched by the projection.
pub fn yearly_summaries(months: &[MonthlyResult]) -> Vec<PeriodSummary> {
    let calendar: Vec<CalendarMonth> = months.iter().map(|m| m.month).collect();
    group_by_year(&calendar)
        .into_iter()
        .map(|(year, indices)| summarize(&year.to_string(), indices.iter().map(|&i| &months[i])))
        .collect()
}
