use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use jdg_tax_core::regimes::Regime;

use super::{items, Shape};

/// Columns shown for each projected month.
pub const MONTH_COLUMNS: [&str; 9] = [
    "month",
    "revenue",
    "costs",
    "income",
    "contribution_stage",
    "contribution",
    "tax",
    "health",
    "net_income",
];

/// Columns shown for each period or calendar-year summary.
pub const SUMMARY_COLUMNS: [&str; 9] = [
    "label",
    "revenue",
    "costs",
    "income",
    "contribution",
    "health",
    "tax",
    "total_burden",
    "net_income",
];

pub const PERIOD_KEYS: [&str; 4] = [
    "summary_6_months",
    "summary_12_months",
    "summary_30_months",
    "summary_60_months",
];

/// Format output as tables using the tabled crate.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(result) = map.get("result") {
                print_result_table(result, map);
            } else {
                print_flat_object(value);
            }
        }
        Value::Array(arr) => {
            print_array_table(arr);
        }
        _ => {
            println!("{}", value);
        }
    }
}

fn print_result_table(result: &Value, envelope: &Map<String, Value>) {
    match result {
        Value::Object(res) => match Shape::of(res) {
            Shape::Comparison => print_comparison(res),
            Shape::Projection => print_projection(res),
            Shape::Schedule => {
                print_columns(items(res, "entries"), &["month", "elapsed_months", "stage", "amount"]);
                print_fields(res, &["relief_total", "preferential_total", "full_total", "total"]);
            }
            Shape::Rates => {
                print_columns(items(res, "rates"), &["rate", "label"]);
                if let Some(Value::String(note)) = res.get("note") {
                    println!("\n{}", note);
                }
            }
            Shape::Fields => {
                let keys: Vec<&str> = res.keys().map(|k| k.as_str()).collect();
                print_fields(res, &keys);
            }
        },
        _ => print_flat_object(&Value::Object(envelope.clone())),
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

/// Net income per period side by side, then the selected regime.
fn print_comparison(res: &Map<String, Value>) {
    let mut builder = Builder::default();
    let mut header = vec!["Net income".to_string()];
    header.extend(Regime::ALL.iter().map(|r| r.id().to_string()));
    builder.push_record(header);

    for key in PERIOD_KEYS {
        let label = res
            .get(Regime::ALL[0].id())
            .and_then(|r| r.get(key))
            .and_then(|s| s.get("label"))
            .map(format_value)
            .unwrap_or_else(|| key.to_string());
        let mut row = vec![label];
        for regime in Regime::ALL {
            row.push(
                res.get(regime.id())
                    .and_then(|r| r.get(key))
                    .and_then(|s| s.get("net_income"))
                    .map(format_value)
                    .unwrap_or_default(),
            );
        }
        builder.push_record(row);
    }
    println!("{}", Table::from(builder));

    if let Some(best) = res.get("best_regime") {
        println!("\nBest regime: {}", format_value(best));
    }
    if let Some(Value::String(description)) = res.get("best_regime_description") {
        println!("{}", description);
    }
}

/// Monthly series followed by the period and calendar-year summaries.
fn print_projection(res: &Map<String, Value>) {
    if let Some(regime) = res.get("regime") {
        println!("Regime: {}\n", format_value(regime));
    }
    print_columns(items(res, "months"), &MONTH_COLUMNS);

    let periods: Vec<Value> = PERIOD_KEYS
        .iter()
        .filter_map(|k| res.get(*k).cloned())
        .collect();
    println!();
    print_columns(&periods, &SUMMARY_COLUMNS);

    let yearly = items(res, "yearly");
    if !yearly.is_empty() {
        println!();
        print_columns(yearly, &SUMMARY_COLUMNS);
    }
}

fn print_columns(rows: &[Value], columns: &[&str]) {
    if rows.is_empty() {
        println!("(empty)");
        return;
    }
    let mut builder = Builder::default();
    builder.push_record(columns.iter().copied());
    for row in rows {
        builder.push_record(
            columns
                .iter()
                .map(|c| row.get(*c).map(format_value).unwrap_or_default()),
        );
    }
    println!("{}", Table::from(builder));
}

fn print_fields(map: &Map<String, Value>, keys: &[&str]) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for key in keys {
        if let Some(val) = map.get(*key) {
            builder.push_record([key.to_string(), format_value(val)]);
        }
    }
    println!("{}", Table::from(builder));
}

fn print_flat_object(value: &Value) {
    if let Value::Object(map) = value {
        let keys: Vec<&str> = map.keys().map(|k| k.as_str()).collect();
        print_fields(map, &keys);
    }
}

fn print_array_table(arr: &[Value]) {
    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
        print_columns(arr, &headers);
    } else if arr.is_empty() {
        println!("(empty)");
    } else {
        for item in arr {
            println!("{}", format_value(item));
        }
    }
}

pub fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(format_value).collect();
            items.join(", ")
        }
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
