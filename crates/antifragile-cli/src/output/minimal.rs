use serde_json::Value;

/// Print just the key answer value from the output.
///
/// Heuristic: the antifragility index, else the portfolio total return,
/// else the first field in the result object. A list of results prints
/// one headline per entry.
pub fn print_minimal(value: &Value) {
    // Try to extract the "result" envelope
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    // Priority list of key output fields
    let priority_keys = [
        "antifragility_index",
        "portfolio_total_return_pct",
        "horizon_months",
    ];

    if let Some(Value::Array(results)) = result_obj.get("results") {
        for row in results {
            let headline = priority_keys
                .iter()
                .find_map(|k| row.get(*k).filter(|v| !v.is_null()));
            if let (Some(intensity), Some(val)) = (row.get("intensity"), headline) {
                println!("{}: {}", intensity, format_minimal(val));
            }
        }
        return;
    }

    if let Value::Object(map) = result_obj {
        // Try priority keys first (skip null values)
        for key in &priority_keys {
            if let Some(val) = map.get(*key) {
                if !val.is_null() {
                    println!("{}", format_minimal(val));
                    return;
                }
            }
        }

        // Fall back to first field
        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_minimal(val));
            return;
        }
    }

    // Not an object, just print directly
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
