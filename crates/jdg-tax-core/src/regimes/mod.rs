pub mod linear;
pub mod lump_sum;
pub mod scale;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use crate::contributions::health;
use crate::error::JdgTaxError;
use crate::tables::TaxTables;
use crate::types::*;
use crate::JdgTaxResult;

pub use lump_sum::RevenueByRate;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// The three mutually exclusive taxation regimes for a JDG.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Regime {
    /// Progressive two-bracket scale with a fixed credit.
    #[serde(rename = "tax_scale")]
    Scale,
    /// Flat rate on income.
    #[serde(rename = "linear_tax")]
    Linear,
    /// Activity-specific rates on gross revenue.
    #[serde(rename = "lump_sum")]
    LumpSum,
}

/// What a regime needs to know about one month.
#[derive(Debug, Clone, Copy)]
pub struct MonthBasis<'a> {
    /// Revenue less costs; may be negative.
    pub income: Money,
    /// Lump-sum revenue by declared rate; empty for months without any.
    pub revenue_by_rate: &'a RevenueByRate,
}

/// Tax and health contribution assessed for one month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthlyAssessment {
    pub tax: Money,
    pub health: Money,
}

impl Regime {
    /// Iteration order of the comparison; also the tie-break order.
    pub const ALL: [Regime; 3] = [Regime::Scale, Regime::Linear, Regime::LumpSum];

    /// Wire identifier.
    pub fn id(&self) -> &'static str {
        match self {
            Regime::Scale => "tax_scale",
            Regime::Linear => "linear_tax",
            Regime::LumpSum => "lump_sum",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Regime::Scale => "progressive tax scale",
            Regime::Linear => "linear tax",
            Regime::LumpSum => "lump-sum tax on recorded revenue",
        }
    }

    /// Whether tax is levied on revenue rather than on income.
    pub fn taxes_revenue(&self) -> bool {
        matches!(self, Regime::LumpSum)
    }

    /// Monthly tax and health contribution under this regime.
    pub fn assess_month(&self, basis: &MonthBasis<'_>, tables: &TaxTables) -> MonthlyAssessment {
        match self {
            Regime::Scale => MonthlyAssessment {
                tax: scale::monthly_tax(basis.income, tables),
                health: health::monthly_scale(basis.income, tables),
            },
            Regime::Linear => MonthlyAssessment {
                tax: linear::monthly_tax(basis.income, tables),
                health: health::monthly_linear(basis.income, tables),
            },
            Regime::LumpSum => MonthlyAssessment {
                tax: lump_sum::monthly_tax(basis.revenue_by_rate),
                health: health::monthly_lump_sum(tables),
            },
        }
    }
}

impl fmt::Display for Regime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Regime {
    type Err = JdgTaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tax_scale" | "scale" => Ok(Regime::Scale),
            "linear_tax" | "linear" => Ok(Regime::Linear),
            "lump_sum" | "lump-sum" | "lumpsum" => Ok(Regime::LumpSum),
            other => Err(JdgTaxError::InvalidInput {
                field: "regime".into(),
                reason: format!("unknown regime '{other}' (expected tax_scale, linear_tax or lump_sum)"),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Annual one-shot query
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnualTaxInput {
    pub regime: Regime,
    /// Annual revenue (scale and linear).
    #[serde(default)]
    pub revenue: Option<Money>,
    /// Annual deductible costs (scale and linear).
    #[serde(default)]
    pub costs: Option<Money>,
    /// Annual revenue by lump-sum rate.
    #[serde(default)]
    pub revenue_by_rate: Option<RevenueByRate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnualTaxOutput {
    pub regime: Regime,
    /// Income for scale and linear, gross revenue for lump-sum.
    pub taxable_base: Money,
    pub tax: Money,
    pub effective_rate: Rate,
    /// After tax, before social and health contributions.
    pub net_income: Money,
    /// Twelve monthly advances on an even split of the year.
    pub monthly_advances_total: Money,
}

/// Annual tax for one regime, with the sum of twelve even monthly advances for
/// comparison.
pub fn annual_tax(
    input: &AnnualTaxInput,
    tables: &TaxTables,
) -> JdgTaxResult<ComputationOutput<AnnualTaxOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();
    let twelve = dec!(12);

    let result = match input.regime {
        Regime::Scale | Regime::Linear => {
            let revenue = input.revenue.ok_or_else(|| JdgTaxError::InvalidInput {
                field: "revenue".into(),
                reason: "required for the scale and linear regimes".into(),
            })?;
            let costs = input.costs.unwrap_or(Decimal::ZERO);
            check_amount("revenue", revenue)?;
            check_amount("costs", costs)?;
            if input.revenue_by_rate.is_some() {
                warnings.push("revenue_by_rate is ignored outside the lump-sum regime".into());
            }

            let income = revenue - costs;
            let (tax, net_income, monthly) = if input.regime == Regime::Scale {
                (
                    scale::annual_tax(income, tables),
                    scale::annual_net_income(revenue, costs, tables),
                    scale::monthly_tax(income / twelve, tables),
                )
            } else {
                (
                    linear::annual_tax(income, tables),
                    linear::annual_net_income(revenue, costs, tables),
                    linear::monthly_tax(income / twelve, tables),
                )
            };
            if revenue > tables.book_revenue_limit {
                warnings.push(format!(
                    "Annual revenue {} exceeds the book-keeping limit of {} PLN",
                    finalize(revenue),
                    tables.book_revenue_limit
                ));
            }
            if input.regime == Regime::Scale && monthly * twelve != tax {
                warnings.push(
                    "Monthly advances are computed month by month against a twelfth of the \
                     threshold and credit; their sum differs from the annual settlement."
                        .into(),
                );
            }

            AnnualTaxOutput {
                regime: input.regime,
                taxable_base: finalize(income),
                tax,
                effective_rate: effective_rate(tax, income),
                net_income,
                monthly_advances_total: finalize(monthly * twelve),
            }
        }
        Regime::LumpSum => {
            let by_rate = input
                .revenue_by_rate
                .as_ref()
                .ok_or_else(|| JdgTaxError::InvalidInput {
                    field: "revenue_by_rate".into(),
                    reason: "required for the lump-sum regime".into(),
                })?;
            if !lump_sum::rates_valid(by_rate) {
                return Err(JdgTaxError::InvalidInput {
                    field: "revenue_by_rate".into(),
                    reason: "every rate must lie strictly between 0 and 1".into(),
                });
            }
            for revenue in by_rate.values() {
                check_amount("revenue_by_rate", *revenue)?;
            }
            for rate in by_rate.keys() {
                if tables.lump_sum_label(*rate).is_none() {
                    warnings.push(format!("Rate {rate} is not in the published lump-sum table"));
                }
            }

            let revenue = lump_sum::total_revenue(by_rate);
            if revenue > tables.lump_sum_revenue_limit {
                warnings.push(format!(
                    "Annual revenue {} exceeds the lump-sum limit of {} PLN",
                    finalize(revenue),
                    tables.lump_sum_revenue_limit
                ));
            }
            let tax = lump_sum::annual_tax(by_rate);
            let monthly_split: RevenueByRate =
                by_rate.iter().map(|(r, v)| (*r, *v / twelve)).collect();

            AnnualTaxOutput {
                regime: Regime::LumpSum,
                taxable_base: finalize(revenue),
                tax,
                effective_rate: effective_rate(tax, revenue),
                net_income: lump_sum::net_income(by_rate),
                monthly_advances_total: finalize(lump_sum::monthly_tax(&monthly_split) * twelve),
            }
        }
    };

    let assumptions = serde_json::json!({
        "regime": input.regime,
        "tax_year": tables.tax_year,
        "scale_threshold": tables.scale.threshold.to_string(),
        "scale_reduction": tables.scale.reduction.to_string(),
        "linear_rate": tables.linear_rate.to_string(),
    });

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        &format!("Annual {} settlement", input.regime.description()),
        &assumptions,
        warnings,
        tables.tax_year,
        elapsed,
        result,
    ))
}

fn effective_rate(tax: Money, base: Money) -> Rate {
    if base > Decimal::ZERO {
        (tax / base).round_dp(6)
    } else {
        Decimal::ZERO
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
