use clap::Args;
use serde_json::Value;

use jdg_tax_core::projection;
use jdg_tax_core::regimes::Regime;
use jdg_tax_core::tables::TaxTables;

use super::RequestArgs;

/// Arguments for a single-regime projection
#[derive(Args)]
pub struct ProjectArgs {
    /// Regime to project: tax_scale, linear_tax or lump_sum
    #[arg(long)]
    pub regime: Regime,

    #[command(flatten)]
    pub request: RequestArgs,
}

pub fn run_project(args: ProjectArgs, tables: &TaxTables) -> Result<Value, Box<dyn std::error::Error>> {
    let request = args.request.into_request()?;
    let result = projection::project_regime(&request, args.regime, tables)?;
    Ok(serde_json::to_value(result)?)
}
