use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::JdgTaxError;
use crate::JdgTaxResult;

/// All monetary values (PLN). Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.19 = 19%). Never as percentages.
pub type Rate = Decimal;

/// Offset of a month from the base month of a projection, in `0..HORIZON_MONTHS`.
pub type MonthIndex = usize;

/// Length of every projection.
pub const HORIZON_MONTHS: usize = 60;

/// Largest single amount accepted on input, in PLN.
///
/// Sixty months of amounts at this size stay far inside `Decimal` range.
pub const MAX_AMOUNT: Money = dec!(1000000000000);

/// Reject negative amounts and amounts above [`MAX_AMOUNT`].
pub fn check_amount(field: &str, amount: Money) -> JdgTaxResult<()> {
    if amount < Decimal::ZERO {
        return Err(JdgTaxError::InvalidInput {
            field: field.into(),
            reason: "must not be negative".into(),
        });
    }
    if amount > MAX_AMOUNT {
        return Err(JdgTaxError::InvalidInput {
            field: field.into(),
            reason: format!("must not exceed {MAX_AMOUNT} PLN"),
        });
    }
    Ok(())
}

/// Round a monetary value to grosze (2 dp, half away from zero).
///
/// Every emitted amount passes through here exactly once.
pub fn finalize(amount: Decimal) -> Money {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub tax_year: i32,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    tax_year: i32,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            tax_year,
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}
