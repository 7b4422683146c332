use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::{row_list, scalar_text};

/// Report columns shown in table mode; the full set is in JSON and CSV.
const REPORT_COLUMNS: [&str; 8] = [
    "name",
    "days_owned",
    "miles_driven",
    "vehicle_cost",
    "total_cost",
    "total_cost_per_day",
    "cost_per_mile",
    "average_efficiency",
];

/// Format output as a table using the tabled crate.
pub fn print_table(value: &Value) {
    if let Some(rows) = row_list(value) {
        print_rows(rows);
    } else {
        match value.as_object().and_then(|m| m.get("result")) {
            Some(result) => print_fields(result),
            None => print_fields(value),
        }
    }

    if let Some(envelope) = value.as_object() {
        print_trailer(envelope);
    }
}

fn print_fields(value: &Value) {
    let Value::Object(map) = value else {
        println!("{}", scalar_text(value, "null"));
        return;
    };
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in map {
        builder.push_record([key.as_str(), &cell(val)]);
    }
    println!("{}", Table::from(builder));
}

fn print_rows(rows: &[Value]) {
    let Some(Value::Object(first)) = rows.first() else {
        println!("(empty)");
        return;
    };

    let headers: Vec<String> = if first.contains_key("total_cost") {
        REPORT_COLUMNS.iter().map(|c| c.to_string()).collect()
    } else {
        first
            .iter()
            .filter(|(_, v)| !v.is_array())
            .map(|(k, _)| k.clone())
            .collect()
    };

    let mut builder = Builder::default();
    builder.push_record(&headers);
    for item in rows {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(h.as_str()).map(cell).unwrap_or_default())
                .collect();
            builder.push_record(row);
        }
    }
    println!("{}", Table::from(builder));
}

/// Highlights, warnings and methodology below the main table.
fn print_trailer(envelope: &Map<String, Value>) {
    let highlights = envelope
        .get("result")
        .and_then(|r| r.get("highlights"))
        .and_then(Value::as_object)
        .filter(|h| !h.is_empty());
    if let Some(highlights) = highlights {
        let mut builder = Builder::default();
        builder.push_record(["Field", "Min", "Max"]);
        for (field, ext) in highlights {
            builder.push_record([
                field.as_str(),
                &ext.get("min").map(cell).unwrap_or_default(),
                &ext.get("max").map(cell).unwrap_or_default(),
            ]);
        }
        println!("\nHighlights:\n{}", Table::from(builder));
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {w}");
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {meth}");
    }
}

fn cell(value: &Value) -> String {
    match value {
        Value::Array(arr) => arr.iter().map(cell).collect::<Vec<_>>().join(", "),
        other => scalar_text(other, "-"),
    }
}
