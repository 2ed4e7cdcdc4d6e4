use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::calendar::{generate_months, CalendarMonth};
use crate::error::JdgTaxError;
use crate::tables::TaxTables;
use crate::types::*;
use crate::JdgTaxResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Social-contribution (ZUS) stage. Ordered: stages only ever move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContributionStage {
    /// Start-up relief: no social contributions.
    Relief,
    /// Reduced fixed contribution.
    Preferential,
    /// Standard fixed contribution.
    Full,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledContribution {
    pub month: CalendarMonth,
    pub elapsed_months: u32,
    pub stage: ContributionStage,
    pub amount: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleInput {
    pub business_start_date: NaiveDate,
    pub base_month: CalendarMonth,
    /// Number of months to list; defaults to the projection horizon.
    #[serde(default)]
    pub months: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleOutput {
    pub entries: Vec<ScheduledContribution>,
    pub relief_total: Money,
    pub preferential_total: Money,
    pub full_total: Money,
    pub total: Money,
}

// ---------------------------------------------------------------------------
// Stage lookup
// ---------------------------------------------------------------------------

/// Full calendar months elapsed between the start of the business and `month`.
///
/// The start month is always month 0, whatever the day the business opened.
/// Months before the start month count as 0.
pub fn elapsed_months(start: NaiveDate, month: CalendarMonth) -> u32 {
    let n = month.months_since(&CalendarMonth::of(start));
    n.clamp(0, i64::from(u32::MAX)) as u32
}

pub fn stage_for_elapsed(elapsed: u32, tables: &TaxTables) -> ContributionStage {
    if elapsed < tables.contributions.relief_months {
        ContributionStage::Relief
    } else if elapsed < tables.full_stage_start() {
        ContributionStage::Preferential
    } else {
        ContributionStage::Full
    }
}

pub fn stage(start: NaiveDate, month: CalendarMonth, tables: &TaxTables) -> ContributionStage {
    stage_for_elapsed(elapsed_months(start, month), tables)
}

/// Published monthly amount for a stage.
pub fn stage_amount(stage: ContributionStage, tables: &TaxTables) -> Money {
    let c = &tables.contributions;
    finalize(match stage {
        ContributionStage::Relief => c.relief_monthly,
        ContributionStage::Preferential => c.preferential_monthly,
        ContributionStage::Full => c.full_monthly,
    })
}

pub fn amount(start: NaiveDate, month: CalendarMonth, tables: &TaxTables) -> Money {
    stage_amount(stage(start, month, tables), tables)
}

/// Stage and amount for each of `months`.
pub fn schedule(
    start: NaiveDate,
    months: &[CalendarMonth],
    tables: &TaxTables,
) -> Vec<ScheduledContribution> {
    months
        .iter()
        .map(|&month| {
            let elapsed = elapsed_months(start, month);
            let stage = stage_for_elapsed(elapsed, tables);
            ScheduledContribution {
                month,
                elapsed_months: elapsed,
                stage,
                amount: stage_amount(stage, tables),
            }
        })
        .collect()
}

/// Contribution schedule for a business start date, listed from a base month.
pub fn contribution_schedule(
    input: &ScheduleInput,
    tables: &TaxTables,
) -> JdgTaxResult<ComputationOutput<ScheduleOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let count = input.months.unwrap_or(HORIZON_MONTHS);
    if count == 0 || count > 12 * 100 {
        return Err(JdgTaxError::InvalidInput {
            field: "months".into(),
            reason: "must be between 1 and 1200".into(),
        });
    }

    let start_month = CalendarMonth::of(input.business_start_date);
    if input.base_month < start_month {
        warnings.push(format!(
            "Base month {} precedes the business start month {}; earlier months are \
             treated as the first relief month.",
            input.base_month, start_month
        ));
    }

    let entries = schedule(
        input.business_start_date,
        &generate_months(input.base_month, count)?,
        tables,
    );

    let total_for = |s: ContributionStage| -> Money {
        entries
            .iter()
            .filter(|e| e.stage == s)
            .map(|e| e.amount)
            .sum()
    };
    let relief_total = total_for(ContributionStage::Relief);
    let preferential_total = total_for(ContributionStage::Preferential);
    let full_total = total_for(ContributionStage::Full);

    let result = ScheduleOutput {
        total: relief_total + preferential_total + full_total,
        relief_total,
        preferential_total,
        full_total,
        entries,
    };

    let assumptions = serde_json::json!({
        "business_start_date": input.business_start_date.to_string(),
        "base_month": input.base_month.to_string(),
        "months": count,
        "relief_months": tables.contributions.relief_months,
        "preferential_months": tables.contributions.preferential_months,
    });

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Staged social contributions keyed to calendar months since business start \
         (start month counts as month 0)",
        &assumptions,
        warnings,
        tables.tax_year,
        elapsed,
        result,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
