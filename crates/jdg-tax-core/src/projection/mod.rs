pub mod engine;
pub mod plan;
pub mod summary;

pub use engine::{project, project_regime, RegimeResult};
pub use plan::{LumpSumMonth, OneTimeCost, ProjectionPlan, ProjectionRequest};
pub use summary::{MonthlyResult, PeriodSummary};

use crate::regimes::Regime;
use crate::tables::TaxTables;

/// Calendar years whose projected revenue passes the regime's revenue ceiling.
///
/// Informational only: the projection itself applies no eligibility rules.
pub fn revenue_limit_warnings(result: &RegimeResult, tables: &TaxTables) -> Vec<String> {
    let (limit, what) = match result.regime {
        Regime::LumpSum => (tables.lump_sum_revenue_limit, "lump-sum revenue limit"),
        Regime::Scale | Regime::Linear => (tables.book_revenue_limit, "book-keeping revenue limit"),
    };

    result
        .yearly
        .iter()
        .filter(|y| y.revenue > limit)
        .map(|y| {
            format!(
                "{}: revenue in {} ({} PLN) exceeds the {} of {} PLN",
                result.regime, y.label, y.revenue, what, limit
            )
        })
        .collect()
}
