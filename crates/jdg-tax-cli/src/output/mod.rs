pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use clap::ValueEnum;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// The full envelope, pretty-printed
    Json,
    /// Monthly series and period summaries as tables
    Table,
    /// One row per month (per regime and month for a comparison)
    Csv,
    /// Only the headline figure
    Minimal,
}

/// Which command produced a result object, told apart by its keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Comparison,
    Projection,
    Schedule,
    Rates,
    Fields,
}

impl Shape {
    pub fn of(result: &Map<String, Value>) -> Self {
        if result.contains_key("best_regime") {
            Shape::Comparison
        } else if result.contains_key("months") {
            Shape::Projection
        } else if result.contains_key("entries") {
            Shape::Schedule
        } else if result.contains_key("rates") {
            Shape::Rates
        } else {
            Shape::Fields
        }
    }
}

/// Array under `key`, or an empty slice when it is missing or not an array.
pub fn items<'a>(map: &'a Map<String, Value>, key: &str) -> &'a [Value] {
    match map.get(key) {
        Some(Value::Array(items)) => items,
        _ => &[],
    }
}

impl OutputFormat {
    pub fn render(self, value: &Value) {
        let shape = value
            .get("result")
            .and_then(Value::as_object)
            .map(Shape::of);
        tracing::debug!(format = ?self, ?shape, "rendering output");
        match self {
            OutputFormat::Json => json::print_json(value),
            OutputFormat::Table => table::print_table(value),
            OutputFormat::Csv => csv_out::print_csv(value),
            OutputFormat::Minimal => minimal::print_minimal(value),
        }
    }
}
