use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use jdg_tax_core::regimes::{self, AnnualTaxInput, Regime, RevenueByRate};
use jdg_tax_core::tables::TaxTables;

use crate::input;

/// Arguments for the annual tax query
#[derive(Args)]
pub struct AnnualTaxArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Regime: tax_scale, linear_tax or lump_sum
    #[arg(long)]
    pub regime: Option<Regime>,

    /// Annual revenue (scale and linear)
    #[arg(long)]
    pub revenue: Option<Decimal>,

    /// Annual deductible costs (scale and linear)
    #[arg(long)]
    pub costs: Option<Decimal>,

    /// Annual lump-sum revenue at one rate, as RATE=AMOUNT (repeatable, e.g. 0.055=600000)
    #[arg(long = "rate-revenue", value_parser = parse_rate_revenue)]
    pub rate_revenue: Vec<(Decimal, Decimal)>,
}

pub fn run_annual_tax(args: AnnualTaxArgs, tables: &TaxTables) -> Result<Value, Box<dyn std::error::Error>> {
    let annual_input: AnnualTaxInput = match input::read_request(args.input.as_deref())? {
        Some(request) => request,
        None => {
            let regime = args
                .regime
                .ok_or("--regime is required (or provide --input)")?;
            let revenue_by_rate = if args.rate_revenue.is_empty() {
                None
            } else {
                let mut by_rate = RevenueByRate::new();
                for (rate, amount) in args.rate_revenue {
                    *by_rate.entry(rate).or_insert(Decimal::ZERO) += amount;
                }
                Some(by_rate)
            };

            AnnualTaxInput {
                regime,
                revenue: args.revenue,
                costs: args.costs,
                revenue_by_rate,
            }
        }
    };

    let result = regimes::annual_tax(&annual_input, tables)?;
    Ok(serde_json::to_value(result)?)
}

fn parse_rate_revenue(s: &str) -> Result<(Decimal, Decimal), String> {
    let (rate, amount) = s
        .split_once('=')
        .ok_or_else(|| format!("expected RATE=AMOUNT, got '{s}'"))?;
    let rate: Decimal = rate
        .trim()
        .parse()
        .map_err(|e| format!("invalid rate '{rate}': {e}"))?;
    let amount: Decimal = amount
        .trim()
        .parse()
        .map_err(|e| format!("invalid amount '{amount}': {e}"))?;
    Ok((rate, amount))
}
