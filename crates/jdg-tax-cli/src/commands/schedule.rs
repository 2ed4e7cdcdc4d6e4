use chrono::NaiveDate;
use clap::Args;
use serde_json::Value;

use jdg_tax_core::calendar::CalendarMonth;
use jdg_tax_core::contributions::social::{self, ScheduleInput};
use jdg_tax_core::tables::TaxTables;

use crate::input;

/// Arguments for the social-contribution schedule
#[derive(Args)]
pub struct ScheduleArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Business start date (YYYY-MM-DD)
    #[arg(long)]
    pub start_date: Option<NaiveDate>,

    /// First listed month (YYYY-MM); defaults to the start month
    #[arg(long)]
    pub base_month: Option<CalendarMonth>,

    /// Number of months to list (default 60)
    #[arg(long)]
    pub months: Option<usize>,
}

pub fn run_contribution_schedule(
    args: ScheduleArgs,
    tables: &TaxTables,
) -> Result<Value, Box<dyn std::error::Error>> {
    let schedule_input: ScheduleInput = match input::read_request(args.input.as_deref())? {
        Some(request) => request,
        None => {
            let start = args
                .start_date
                .ok_or("--start-date is required (or provide --input)")?;
            ScheduleInput {
                business_start_date: start,
                base_month: args.base_month.unwrap_or_else(|| CalendarMonth::of(start)),
                months: args.months,
            }
        }
    };

    let result = social::contribution_schedule(&schedule_input, tables)?;
    Ok(serde_json::to_value(result)?)
}
