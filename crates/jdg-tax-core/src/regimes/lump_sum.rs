//! Lump-sum tax on recorded revenue (ryczałt od przychodów ewidencjonowanych).
//!
//! Revenue is taxed gross, each slice at the rate declared for its activity.
//! Costs are never deducted.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Instant;

use crate::tables::{LumpSumRate, TaxTables};
use crate::types::{finalize, with_metadata, ComputationOutput, Money, Rate};
use crate::JdgTaxResult;

/// Revenue per declared lump-sum rate. Keys are unique by value.
pub type RevenueByRate = BTreeMap<Rate, Money>;

/// Sum of `revenue × rate` over slices with positive revenue.
pub fn tax(revenue_by_rate: &RevenueByRate) -> Money {
    let total: Decimal = revenue_by_rate
        .iter()
        .filter(|(_, revenue)| **revenue > Decimal::ZERO)
        .map(|(rate, revenue)| *revenue * *rate)
        .sum();
    finalize(total)
}

pub fn monthly_tax(monthly_revenue_by_rate: &RevenueByRate) -> Money {
    tax(monthly_revenue_by_rate)
}

pub fn annual_tax(annual_revenue_by_rate: &RevenueByRate) -> Money {
    tax(annual_revenue_by_rate)
}

/// Revenue summed across all rates.
pub fn total_revenue(revenue_by_rate: &RevenueByRate) -> Money {
    revenue_by_rate.values().copied().sum()
}

/// Gross revenue less the lump-sum tax, before contributions.
pub fn net_income(revenue_by_rate: &RevenueByRate) -> Money {
    finalize(total_revenue(revenue_by_rate) - tax(revenue_by_rate))
}

/// Merge several per-rate maps, summing revenue for equal rates.
pub fn aggregate(months: &[RevenueByRate]) -> RevenueByRate {
    let mut aggregated = RevenueByRate::new();
    for month in months {
        for (rate, revenue) in month {
            *aggregated.entry(*rate).or_insert(Decimal::ZERO) += *revenue;
        }
    }
    aggregated
}

/// Every rate lies strictly between 0 and 1.
pub fn rates_valid(revenue_by_rate: &RevenueByRate) -> bool {
    revenue_by_rate
        .keys()
        .all(|r| *r > Decimal::ZERO && *r < Decimal::ONE)
}

// ---------------------------------------------------------------------------
// Published rate table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateTableOutput {
    pub tax_year: i32,
    pub rates: Vec<LumpSumRate>,
    pub note: String,
}

/// The published lump-sum rates with descriptive labels, for display.
pub fn rate_table(tables: &TaxTables) -> RateTableOutput {
    RateTableOutput {
        tax_year: tables.tax_year,
        rates: tables.lump_sum_rates.clone(),
        note: "The applicable rate depends on the kind of activity. Revenue is never \
               assigned to a rate automatically."
            .to_string(),
    }
}

/// [`rate_table`] in the standard output envelope.
pub fn lump_sum_rates(tables: &TaxTables) -> JdgTaxResult<ComputationOutput<RateTableOutput>> {
    let start = Instant::now();
    let result = rate_table(tables);

    let assumptions = serde_json::json!({
        "tax_year": tables.tax_year,
        "lump_sum_revenue_limit": tables.lump_sum_revenue_limit.to_string(),
    });

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Published lump-sum rates by kind of activity",
        &assumptions,
        Vec::new(),
        tables.tax_year,
        elapsed,
        result,
    ))
}
