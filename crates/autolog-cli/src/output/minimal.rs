use serde_json::Value;

use super::scalar_text;

/// Headline figure of each command, in priority order.
const PRIORITY_KEYS: [&str; 7] = [
    "monthly_payment",
    "mpg",
    "mpge",
    "created",
    "accepted",
    "total_cost",
    "vehicle_cost",
];

/// Print just the key answer value from the output.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    // Fleet reports: one line per vehicle
    if let Some(Value::Array(rows)) = result_obj.get("rows") {
        if rows.iter().all(|r| r.get("total_cost").is_some()) {
            for row in rows {
                let name = row.get("name").map(|v| scalar_text(v, "")).unwrap_or_default();
                let total = row.get("total_cost").map(|v| scalar_text(v, "")).unwrap_or_default();
                println!("{name}: {total}");
            }
            return;
        }
    }

    if let Value::Object(map) = result_obj {
        for key in PRIORITY_KEYS {
            if let Some(val) = map.get(key).filter(|v| !v.is_null()) {
                println!("{}", scalar_text(val, "null"));
                return;
            }
        }
        if let Some((key, val)) = map.iter().next() {
            println!("{key}: {}", scalar_text(val, "null"));
            return;
        }
    }

    println!("{}", scalar_text(result_obj, "null"));
}
