use clap::Args;
use serde_json::Value;

use jdg_tax_core::comparison;
use jdg_tax_core::tables::TaxTables;

use super::RequestArgs;

/// Arguments for the three-regime comparison
#[derive(Args)]
pub struct CompareArgs {
    #[command(flatten)]
    pub request: RequestArgs,
}

pub fn run_compare(args: CompareArgs, tables: &TaxTables) -> Result<Value, Box<dyn std::error::Error>> {
    let request = args.request.into_request()?;
    let result = comparison::compare_regimes(&request, tables)?;
    tracing::debug!(
        best = %result.result.best_regime,
        warnings = result.warnings.len(),
        "comparison finished"
    );
    Ok(serde_json::to_value(result)?)
}
