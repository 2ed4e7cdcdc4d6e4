use std::borrow::Cow;

use jdg_tax_core::tables::{self, TaxTables};
use napi::Result as NapiResult;
use napi_derive::napi;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Published tables, or a validated replacement supplied as JSON.
fn resolve_tables(tables_json: Option<String>) -> NapiResult<Cow<'static, TaxTables>> {
    match tables_json {
        None => Ok(Cow::Borrowed(tables::published().map_err(to_napi_error)?)),
        Some(json) => Ok(Cow::Owned(tables::from_json(&json).map_err(to_napi_error)?)),
    }
}

// ---------------------------------------------------------------------------
// Projection and comparison
// ---------------------------------------------------------------------------

#[napi]
pub fn compare_regimes(input_json: String, tables_json: Option<String>) -> NapiResult<String> {
    let tables = resolve_tables(tables_json)?;
    let input: jdg_tax_core::projection::ProjectionRequest =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        jdg_tax_core::comparison::compare_regimes(&input, &tables).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn project_regime(
    input_json: String,
    regime: String,
    tables_json: Option<String>,
) -> NapiResult<String> {
    let tables = resolve_tables(tables_json)?;
    let regime: jdg_tax_core::regimes::Regime = regime.parse().map_err(to_napi_error)?;
    let input: jdg_tax_core::projection::ProjectionRequest =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = jdg_tax_core::projection::project_regime(&input, regime, &tables)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// One-shot queries
// ---------------------------------------------------------------------------

#[napi]
pub fn annual_tax(input_json: String, tables_json: Option<String>) -> NapiResult<String> {
    let tables = resolve_tables(tables_json)?;
    let input: jdg_tax_core::regimes::AnnualTaxInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = jdg_tax_core::regimes::annual_tax(&input, &tables).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn contribution_schedule(input_json: String, tables_json: Option<String>) -> NapiResult<String> {
    let tables = resolve_tables(tables_json)?;
    let input: jdg_tax_core::contributions::social::ScheduleInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = jdg_tax_core::contributions::social::contribution_schedule(&input, &tables)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn lump_sum_rates(tables_json: Option<String>) -> NapiResult<String> {
    let tables = resolve_tables(tables_json)?;
    let output =
        jdg_tax_core::regimes::lump_sum::lump_sum_rates(&tables).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
