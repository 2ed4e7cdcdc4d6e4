use serde_json::Value;

/// Print just the key answer value from the output.
///
/// A comparison prints its outcome line and a projection its 60-month net
/// income; otherwise the first well-known field present, then the first
/// field of the result object.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    let priority_keys = ["best_regime_description", "tax", "total", "note"];

    if let Value::Object(map) = result_obj {
        if let Some(net) = map
            .get("summary_60_months")
            .and_then(|s| s.get("net_income"))
        {
            println!("{}", format_minimal(net));
            return;
        }

        for key in &priority_keys {
            if let Some(val) = map.get(*key) {
                if !val.is_null() {
                    println!("{}", format_minimal(val));
                    return;
                }
            }
        }

        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_minimal(val));
            return;
        }
    }

    println!("{}", format_minimal(result_obj));
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
