use serde_json::{Map, Value};
use std::io;

type CsvWriter<'a> = csv::Writer<io::StdoutLock<'a>>;

/// Write output as CSV to stdout.
///
/// Time series become one row per month; tables of rows or results are
/// written as-is; anything else falls back to a two-column field/value list.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    match result {
        Value::Object(map) if map.contains_key("dates") && map.contains_key("portfolio") => {
            write_series_csv(&mut wtr, map);
        }
        Value::Object(map) if map.contains_key("assets") && map.contains_key("values") => {
            write_matrix_csv(&mut wtr, map);
        }
        Value::Object(map) => {
            if let Some(Value::Array(rows)) = map.get("rows").or_else(|| map.get("results")) {
                write_array_csv(&mut wtr, rows);
            } else {
                let _ = wtr.write_record(["field", "value"]);
                for (key, val) in map {
                    let _ = wtr.write_record([key.as_str(), &format_csv_value(val)]);
                }
            }
        }
        Value::Array(arr) => write_array_csv(&mut wtr, arr),
        _ => {
            let _ = wtr.write_record([&format_csv_value(result)]);
        }
    }

    let _ = wtr.flush();
}

/// One row per month: date, portfolio, benchmark, ramp, then each asset.
fn write_series_csv(wtr: &mut CsvWriter<'_>, map: &Map<String, Value>) {
    let column = move |key: &str| map.get(key).and_then(Value::as_array);
    let dates = column("dates").map(Vec::as_slice).unwrap_or_default();

    let mut columns: Vec<(String, &[Value])> = ["portfolio", "benchmark", "intensity_ramp"]
        .iter()
        .filter_map(|k| column(*k).map(|v| (k.to_string(), v.as_slice())))
        .collect();
    if let Some(Value::Object(assets)) = map.get("assets") {
        for (asset, series) in assets {
            if let Value::Array(values) = series {
                columns.push((asset.clone(), values.as_slice()));
            }
        }
    }

    let mut header = vec!["date".to_string()];
    header.extend(columns.iter().map(|(name, _)| name.clone()));
    let _ = wtr.write_record(&header);

    for (i, date) in dates.iter().enumerate() {
        let mut row = vec![format_csv_value(date)];
        row.extend(
            columns
                .iter()
                .map(|(_, values)| values.get(i).map(format_csv_value).unwrap_or_default()),
        );
        let _ = wtr.write_record(&row);
    }
}

fn write_matrix_csv(wtr: &mut CsvWriter<'_>, map: &Map<String, Value>) {
    let assets: Vec<String> = map
        .get("assets")
        .and_then(Value::as_array)
        .map(|a| a.iter().map(format_csv_value).collect())
        .unwrap_or_default();

    let mut header = vec!["asset".to_string()];
    header.extend(assets.iter().cloned());
    let _ = wtr.write_record(&header);

    if let Some(Value::Array(rows)) = map.get("values") {
        for (asset, row) in assets.iter().zip(rows) {
            let mut record = vec![asset.clone()];
            if let Value::Array(cells) = row {
                record.extend(cells.iter().map(format_csv_value));
            }
            let _ = wtr.write_record(&record);
        }
    }
}

fn write_array_csv(wtr: &mut CsvWriter<'_>, arr: &[Value]) {
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
