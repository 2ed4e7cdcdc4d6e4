use serde_json::Value;

use jdg_tax_core::regimes::lump_sum;
use jdg_tax_core::tables::TaxTables;

pub fn run_tax_rates(tables: &TaxTables) -> Result<Value, Box<dyn std::error::Error>> {
    let output = lump_sum::lump_sum_rates(tables)?;
    Ok(serde_json::to_value(output)?)
}
