pub mod annual;
pub mod compare;
pub mod project;
pub mod rates;
pub mod schedule;

use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;

use jdg_tax_core::calendar::CalendarMonth;
use jdg_tax_core::projection::{LumpSumMonth, ProjectionRequest};
use jdg_tax_core::regimes::RevenueByRate;
use jdg_tax_core::HORIZON_MONTHS;

use crate::input;

/// Request source shared by `compare` and `project`.
///
/// A full request comes from `--input` or stdin. Without one, the flags
/// describe a flat plan: the same revenue and cost in each of the 60 months.
#[derive(Args)]
pub struct RequestArgs {
    /// Path to JSON request file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// First projected month (YYYY-MM)
    #[arg(long)]
    pub base_month: Option<CalendarMonth>,

    /// Business start date (YYYY-MM-DD); defaults to the first day of the base month
    #[arg(long)]
    pub start_date: Option<NaiveDate>,

    /// Monthly revenue, repeated for all 60 months
    #[arg(long)]
    pub revenue: Option<Decimal>,

    /// Monthly recurring costs, repeated for all 60 months
    #[arg(long, default_value = "0")]
    pub costs: Decimal,

    /// Lump-sum rate applied to the whole monthly revenue (e.g. 0.055)
    #[arg(long)]
    pub lump_sum_rate: Option<Decimal>,
}

impl RequestArgs {
    pub fn into_request(self) -> Result<ProjectionRequest, Box<dyn std::error::Error>> {
        if let Some(request) = input::read_request(self.input.as_deref())? {
            return Ok(request);
        }

        let base_month = self
            .base_month
            .ok_or("--base-month is required (or provide --input)")?;
        let revenue = self
            .revenue
            .ok_or("--revenue is required (or provide --input)")?;
        let business_start_date = match self.start_date {
            Some(date) => date,
            None => NaiveDate::from_ymd_opt(base_month.year(), base_month.month(), 1)
                .ok_or("--base-month is not a valid calendar month")?,
        };

        let lump_sum_revenues = self.lump_sum_rate.map(|rate| {
            let by_rate: RevenueByRate = [(rate, revenue)].into_iter().collect();
            (0..HORIZON_MONTHS)
                .map(|month_index| LumpSumMonth {
                    month_index,
                    revenues_by_rate: by_rate.clone(),
                })
                .collect()
        });

        Ok(ProjectionRequest {
            base_month,
            business_start_date,
            monthly_revenues: vec![revenue; HORIZON_MONTHS],
            monthly_costs: vec![self.costs; HORIZON_MONTHS],
            one_time_costs: vec![],
            lump_sum_revenues,
        })
    }
}
