use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

/// Arrays longer than this are summarised instead of printed inline.
const MAX_INLINE_ITEMS: usize = 12;

/// Format output as a table using the tabled crate.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(result) = map.get("result") {
                print_result(result);
                print_envelope_notes(map);
            } else {
                print_fields(map);
            }
        }
        Value::Array(arr) => print_array_table(arr),
        _ => println!("{}", value),
    }
}

fn print_result(result: &Value) {
    match result {
        Value::Array(arr) => print_array_table(arr),
        Value::Object(map) if is_matrix(map) => print_matrix(map),
        Value::Object(map) => {
            print_fields(map);
            for key in ["rows", "results"] {
                if let Some(Value::Array(arr)) = map.get(key) {
                    println!();
                    print_array_table(arr);
                }
            }
        }
        other => println!("{}", format_value(other)),
    }
}

fn print_envelope_notes(envelope: &Map<String, Value>) {
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

/// Field/value table of every entry except the row arrays printed separately.
fn print_fields(map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in map {
        if matches!(key.as_str(), "rows" | "results") && val.is_array() {
            continue;
        }
        builder.push_record([key.as_str(), &format_value(val)]);
    }
    println!("{}", Table::from(builder));
}

fn is_matrix(map: &Map<String, Value>) -> bool {
    map.len() == 2
        && map.get("assets").is_some_and(Value::is_array)
        && map.get("values").is_some_and(Value::is_array)
}

/// Square grid with the asset names as both header row and first column.
fn print_matrix(map: &Map<String, Value>) {
    let assets: Vec<String> = map
        .get("assets")
        .and_then(Value::as_array)
        .map(|a| a.iter().map(format_value).collect())
        .unwrap_or_default();
    let rows = map.get("values").and_then(Value::as_array);

    let mut builder = Builder::default();
    let mut header = vec![String::new()];
    header.extend(assets.iter().cloned());
    builder.push_record(header);

    if let Some(rows) = rows {
        for (asset, row) in assets.iter().zip(rows) {
            let mut record = vec![asset.clone()];
            if let Value::Array(cells) = row {
                record.extend(cells.iter().map(format_cell));
            }
            builder.push_record(record);
        }
    }
    println!("{}", Table::from(builder));
}

fn print_array_table(arr: &[Value]) {
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<String> = first.keys().cloned().collect();
        let mut builder = Builder::default();
        builder.push_record(headers.clone());

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(h.as_str()).map(format_cell).unwrap_or_default())
                    .collect();
                builder.push_record(row);
            }
        }

        println!("{}", Table::from(builder));
    } else {
        for item in arr {
            println!("{}", format_value(item));
        }
    }
}

/// Numbers rounded to four decimals for grid cells.
fn format_cell(value: &Value) -> String {
    match value.as_f64() {
        Some(f) if value.is_f64() => format!("{:.4}", f),
        _ => format_value(value),
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(arr) if arr.len() > MAX_INLINE_ITEMS => {
            format!("[{} values]", arr.len())
        }
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(format_value).collect();
            items.join(", ")
        }
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_long_arrays_are_summarised() {
        let long: Vec<f64> = (0..60).map(|i| i as f64).collect();
        assert_eq!(format_value(&json!(long)), "[60 values]");
        assert_eq!(format_value(&json!([1, 2])), "1, 2");
    }

    #[test]
    fn test_matrix_detection() {
        let m = json!({"assets": ["equities"], "values": [[1.0]]});
        assert!(is_matrix(m.as_object().unwrap()));
        let not = json!({"assets": ["equities"], "values": [[1.0]], "extra": 1});
        assert!(!is_matrix(not.as_object().unwrap()));
    }

    #[test]
    fn test_cells_are_rounded() {
        assert_eq!(format_cell(&json!(0.123456)), "0.1235");
        assert_eq!(format_cell(&json!("undefined")), "undefined");
        assert_eq!(format_cell(&json!(7)), "7");
    }
}
