use serde_json::Value;
use std::io;

use super::{row_list, scalar_text};

/// Write output as CSV to stdout. Row lists become one record per row;
/// anything else is written as field/value pairs.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    if let Some(rows) = row_list(value) {
        write_rows(&mut wtr, rows);
    } else {
        let fields = value
            .as_object()
            .and_then(|m| m.get("result"))
            .unwrap_or(value);
        match fields {
            Value::Object(map) => {
                let _ = wtr.write_record(["field", "value"]);
                for (key, val) in map {
                    let _ = wtr.write_record([key.as_str(), scalar_text(val, "").as_str()]);
                }
            }
            Value::Array(arr) => write_rows(&mut wtr, arr),
            other => {
                let _ = wtr.write_record([&scalar_text(other, "")]);
            }
        }
    }

    let _ = wtr.flush();
}

fn write_rows(wtr: &mut csv::Writer<io::StdoutLock<'_>>, rows: &[Value]) {
    let Some(Value::Object(first)) = rows.first() else {
        for item in rows {
            let _ = wtr.write_record([&scalar_text(item, "")]);
        }
        return;
    };

    // Nested lists (a vehicle's entries) do not flatten into one row
    let headers: Vec<&str> = first
        .iter()
        .filter(|(_, v)| !v.is_array())
        .map(|(k, _)| k.as_str())
        .collect();
    let _ = wtr.write_record(&headers);

    for item in rows {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(*h).map(|v| scalar_text(v, "")).unwrap_or_default())
                .collect();
            let _ = wtr.write_record(&row);
        }
    }
}
