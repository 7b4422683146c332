pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::Value;

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// Row list of a result, if it has one: fleet reports and payment runs
/// carry `rows`, exports carry `vehicles`.
pub(crate) fn row_list(value: &Value) -> Option<&Vec<Value>> {
    let map = value.as_object()?;
    let inner = map.get("result").unwrap_or(value);
    inner
        .get("rows")
        .or_else(|| inner.get("vehicles"))
        .or_else(|| map.get("vehicles"))
        .and_then(Value::as_array)
}

pub(crate) fn scalar_text(value: &Value, null: &str) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => null.to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
