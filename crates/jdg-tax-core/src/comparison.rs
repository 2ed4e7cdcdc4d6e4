use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::projection::{project, revenue_limit_warnings, ProjectionPlan, ProjectionRequest, RegimeResult};
use crate::regimes::Regime;
use crate::tables::TaxTables;
use crate::types::*;
use crate::JdgTaxResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub tax_scale: RegimeResult,
    pub linear_tax: RegimeResult,
    pub lump_sum: RegimeResult,
    /// Regime with the highest sixty-month net income.
    pub best_regime: Regime,
    /// Factual statement of the arithmetic outcome.
    pub best_regime_description: String,
}

impl ComparisonResult {
    pub fn get(&self, regime: Regime) -> &RegimeResult {
        match regime {
            Regime::Scale => &self.tax_scale,
            Regime::Linear => &self.linear_tax,
            Regime::LumpSum => &self.lump_sum,
        }
    }

    pub fn best(&self) -> &RegimeResult {
        self.get(self.best_regime)
    }
}

// ---------------------------------------------------------------------------
// Comparison
// ---------------------------------------------------------------------------

/// Highest sixty-month net income; the earliest regime in `results` wins a tie.
pub fn select_best(results: &[&RegimeResult]) -> Option<Regime> {
    let mut best: Option<&RegimeResult> = None;
    for r in results {
        if best.map_or(true, |b| r.total_net_income() > b.total_net_income()) {
            best = Some(r);
        }
    }
    best.map(|b| b.regime)
}

/// The justification line for a comparison. States the outcome, never advises.
pub fn describe_outcome(best: &RegimeResult) -> String {
    format!(
        "Arithmetic outcome: the {} regime yields the highest 60-month net income of {} PLN.",
        best.regime.description(),
        finalize(best.total_net_income())
    )
}

/// Project all three regimes over the same plan and pick the best. Pure.
pub fn compare(plan: &ProjectionPlan, tables: &TaxTables) -> ComparisonResult {
    let [tax_scale, linear_tax, lump_sum] = Regime::ALL.map(|regime| project(regime, plan, tables));

    let best_regime =
        select_best(&[&tax_scale, &linear_tax, &lump_sum]).unwrap_or(Regime::ALL[0]);
    let best_regime_description = describe_outcome(match best_regime {
        Regime::Scale => &tax_scale,
        Regime::Linear => &linear_tax,
        Regime::LumpSum => &lump_sum,
    });

    tracing::debug!(best = best_regime.id(), "comparison complete");

    ComparisonResult {
        tax_scale,
        linear_tax,
        lump_sum,
        best_regime,
        best_regime_description,
    }
}

/// Validate a request, project every regime and select the best.
pub fn compare_regimes(
    request: &ProjectionRequest,
    tables: &TaxTables,
) -> JdgTaxResult<ComputationOutput<ComparisonResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let plan = request.plan()?;
    if !plan.has_lump_sum_revenue() {
        warnings.push(
            "No lump-sum revenue supplied; the lump-sum projection carries zero revenue."
                .to_string(),
        );
    }

    let result = compare(&plan, tables);
    for regime in Regime::ALL {
        warnings.extend(revenue_limit_warnings(result.get(regime), tables));
    }

    let assumptions = serde_json::json!({
        "base_month": request.base_month.to_string(),
        "business_start_date": request.business_start_date.to_string(),
        "horizon_months": HORIZON_MONTHS,
        "tax_year": tables.tax_year,
        "selection": "highest 60-month net income, first regime wins ties",
        "regime_order": Regime::ALL.map(|r| r.id()),
    });

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Sixty-month comparison of the progressive scale, linear and lump-sum regimes",
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
