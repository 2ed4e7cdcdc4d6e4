//! Published tax and contribution tables.
//!
//! The engine never reads a constant directly: every formula takes a
//! `&TaxTables`. [`published`] hands out the frozen fiscal-year tables after
//! validating them once per process; custom tables loaded from JSON go through
//! the same [`TaxTables::validate`] before use.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use crate::error::JdgTaxError;
use crate::types::{Money, Rate};
use crate::JdgTaxResult;

static PUBLISHED: OnceLock<TaxTables> = OnceLock::new();

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Two-bracket progressive scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaleTable {
    pub threshold: Money,
    pub rate_low: Rate,
    pub rate_high: Rate,
    pub tax_free_amount: Money,
    /// Annual credit deducted from the computed tax.
    pub reduction: Money,
}

/// Staged social contributions (ZUS).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContributionTable {
    pub relief_months: u32,
    pub preferential_months: u32,
    pub relief_monthly: Money,
    pub preferential_monthly: Money,
    pub full_monthly: Money,
}

/// Inputs to the health-contribution formulas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthTable {
    pub minimum_wage: Money,
    pub average_salary: Money,
    /// Share of the wage figure used as the contribution base (0.75).
    pub base_share: Rate,
    /// Rate applied to the base for the floor and the lump-sum amount.
    pub floor_rate: Rate,
    pub rate_scale: Rate,
    pub rate_linear: Rate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LumpSumRate {
    pub rate: Rate,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxTables {
    pub tax_year: i32,
    pub scale: ScaleTable,
    pub linear_rate: Rate,
    pub contributions: ContributionTable,
    pub health: HealthTable,
    pub lump_sum_rates: Vec<LumpSumRate>,
    /// Annual revenue ceiling for the lump-sum regime.
    pub lump_sum_revenue_limit: Money,
    /// Annual revenue ceiling for simplified book-keeping (scale and linear).
    pub book_revenue_limit: Money,
}

// ---------------------------------------------------------------------------
// Fiscal year 2025
// ---------------------------------------------------------------------------

impl TaxTables {
    /// Rules frozen at their 2025 state.
    pub fn fiscal_2025() -> Self {
        TaxTables {
            tax_year: 2025,
            scale: ScaleTable {
                threshold: dec!(120000),
                rate_low: dec!(0.12),
                rate_high: dec!(0.32),
                tax_free_amount: dec!(30000),
                reduction: dec!(3600),
            },
            linear_rate: dec!(0.19),
            contributions: ContributionTable {
                relief_months: 6,
                preferential_months: 24,
                relief_monthly: dec!(0),
                preferential_monthly: dec!(626.49),
                full_monthly: dec!(1860.88),
            },
            health: HealthTable {
                minimum_wage: dec!(4666),
                average_salary: dec!(8213.76),
                base_share: dec!(0.75),
                floor_rate: dec!(0.09),
                rate_scale: dec!(0.09),
                rate_linear: dec!(0.049),
            },
            lump_sum_rates: vec![
                rate(dec!(0.02), "Sales of goods and industrial products"),
                rate(dec!(0.03), "Transport services, manufacturing"),
                rate(dec!(0.055), "Programming and IT services"),
                rate(dec!(0.085), "Gastronomy and trade"),
                rate(dec!(0.10), "Liberal professions, up to the revenue limit"),
                rate(dec!(0.12), "Renovation and construction services"),
                rate(dec!(0.14), "Liberal professions, above the revenue limit"),
                rate(dec!(0.15), "Intangible services, consulting"),
                rate(dec!(0.17), "Liberal professions, highest rate"),
            ],
            lump_sum_revenue_limit: dec!(2000000),
            book_revenue_limit: dec!(2000000),
        }
    }

    /// Health-contribution floor for the scale and linear regimes, unrounded.
    pub fn health_floor(&self) -> Decimal {
        self.health.minimum_wage * self.health.base_share * self.health.floor_rate
    }

    /// Flat monthly health contribution under the lump-sum regime, unrounded.
    pub fn lump_sum_health(&self) -> Decimal {
        self.health.average_salary * self.health.base_share * self.health.floor_rate
    }

    /// First elapsed month that falls in the full contribution stage.
    pub fn full_stage_start(&self) -> u32 {
        self.contributions.relief_months + self.contributions.preferential_months
    }

    /// Label of a published lump-sum rate, if the rate is in the table.
    pub fn lump_sum_label(&self, rate: Rate) -> Option<&str> {
        self.lump_sum_rates
            .iter()
            .find(|r| r.rate == rate)
            .map(|r| r.label.as_str())
    }

    /// Internal consistency checks for a table set.
    pub fn validate(&self) -> JdgTaxResult<()> {
        let s = &self.scale;
        let c = &self.contributions;
        let h = &self.health;

        require(s.threshold > Decimal::ZERO, "scale.threshold", "must be positive")?;
        require(is_fraction(s.rate_low), "scale.rate_low", "must lie in (0, 1)")?;
        require(is_fraction(s.rate_high), "scale.rate_high", "must lie in (0, 1)")?;
        require(
            s.rate_high > s.rate_low,
            "scale.rate_high",
            "must exceed scale.rate_low",
        )?;
        require(
            s.tax_free_amount >= Decimal::ZERO,
            "scale.tax_free_amount",
            "must not be negative",
        )?;
        require(
            s.reduction >= Decimal::ZERO,
            "scale.reduction",
            "must not be negative",
        )?;
        require(is_fraction(self.linear_rate), "linear_rate", "must lie in (0, 1)")?;

        require(c.relief_months > 0, "contributions.relief_months", "must be positive")?;
        require(
            c.preferential_months > 0,
            "contributions.preferential_months",
            "must be positive",
        )?;
        require(
            c.relief_monthly >= Decimal::ZERO,
            "contributions.relief_monthly",
            "must not be negative",
        )?;
        require(
            c.preferential_monthly >= c.relief_monthly,
            "contributions.preferential_monthly",
            "must be at least the relief amount",
        )?;
        require(
            c.full_monthly > c.preferential_monthly,
            "contributions.full_monthly",
            "must exceed the preferential amount",
        )?;

        require(h.rate_scale > Decimal::ZERO, "health.rate_scale", "must be positive")?;
        require(h.rate_linear > Decimal::ZERO, "health.rate_linear", "must be positive")?;
        require(
            self.health_floor() > Decimal::ZERO,
            "health.minimum_wage",
            "derived health floor must be positive",
        )?;
        require(
            self.lump_sum_health() > Decimal::ZERO,
            "health.average_salary",
            "derived lump-sum health contribution must be positive",
        )?;

        for entry in &self.lump_sum_rates {
            require(
                is_fraction(entry.rate),
                "lump_sum_rates",
                &format!("rate {} must lie in (0, 1)", entry.rate),
            )?;
        }

        Ok(())
    }
}

/// The validated fiscal-year tables, checked on first access and shared
/// read-only for the rest of the process.
pub fn published() -> JdgTaxResult<&'static TaxTables> {
    if let Some(tables) = PUBLISHED.get() {
        return Ok(tables);
    }
    let tables = TaxTables::fiscal_2025();
    tables.validate()?;
    tracing::debug!(tax_year = tables.tax_year, "published tax tables validated");
    Ok(PUBLISHED.get_or_init(|| tables))
}

/// Parse and validate a custom table set.
pub fn from_json(json: &str) -> JdgTaxResult<TaxTables> {
    let tables: TaxTables = serde_json::from_str(json)?;
    tables.validate()?;
    Ok(tables)
}

fn rate(rate: Rate, label: &str) -> LumpSumRate {
    LumpSumRate {
        rate,
        label: label.to_string(),
    }
}

fn is_fraction(r: Rate) -> bool {
    r > Decimal::ZERO && r < Decimal::ONE
}

fn require(ok: bool, constant: &str, reason: &str) -> JdgTaxResult<()> {
    if ok {
        Ok(())
    } else {
        Err(JdgTaxError::ConstantsViolation {
            constant: constant.into(),
            reason: reason.into(),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
