use serde_json::{Map, Value};
use std::io;

use jdg_tax_core::regimes::Regime;

use super::table::MONTH_COLUMNS;
use super::{items, Shape};

type StdoutWriter<'a> = csv::Writer<io::StdoutLock<'a>>;

/// Write output as CSV to stdout.
///
/// Projections are written one row per month; a comparison adds a leading
/// `regime` column and lists all three regimes.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    match value {
        Value::Object(map) => match map.get("result") {
            Some(Value::Object(result)) => write_result(&mut wtr, result),
            _ => write_fields(&mut wtr, map),
        },
        Value::Array(arr) => {
            write_array_csv(&mut wtr, arr);
        }
        _ => {
            let _ = wtr.write_record([&format_csv_value(value)]);
        }
    }

    let _ = wtr.flush();
}

fn write_result(wtr: &mut StdoutWriter<'_>, result: &Map<String, Value>) {
    match Shape::of(result) {
        Shape::Comparison => {
            let mut header = vec!["regime"];
            header.extend(MONTH_COLUMNS);
            let _ = wtr.write_record(&header);
            for regime in Regime::ALL {
                let projection = result.get(regime.id()).and_then(Value::as_object);
                for month in projection.map(|p| items(p, "months")).unwrap_or_default() {
                    let mut row = vec![regime.id().to_string()];
                    row.extend(month_row(month));
                    let _ = wtr.write_record(&row);
                }
            }
        }
        Shape::Projection => {
            let _ = wtr.write_record(MONTH_COLUMNS);
            for month in items(result, "months") {
                let _ = wtr.write_record(month_row(month));
            }
        }
        Shape::Schedule => write_array_csv(wtr, items(result, "entries")),
        Shape::Rates => write_array_csv(wtr, items(result, "rates")),
        Shape::Fields => write_fields(wtr, result),
    }
}

fn month_row(month: &Value) -> Vec<String> {
    MONTH_COLUMNS
        .iter()
        .map(|c| month.get(*c).map(format_csv_value).unwrap_or_default())
        .collect()
}

fn write_fields(wtr: &mut StdoutWriter<'_>, map: &Map<String, Value>) {
    let _ = wtr.write_record(["field", "value"]);
    for (key, val) in map {
        let _ = wtr.write_record([key.as_str(), &format_csv_value(val)]);
    }
}

fn write_array_csv(wtr: &mut StdoutWriter<'_>, arr: &[Value]) {
    if arr.is_empty() {
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
        let _ = wtr.write_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(*h).map(format_csv_value).unwrap_or_default())
                    .collect();
                let _ = wtr.write_record(&row);
            }
        }
    } else {
        for item in arr {
            let _ = wtr.write_record([&format_csv_value(item)]);
        }
    }
}

fn format_csv_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
