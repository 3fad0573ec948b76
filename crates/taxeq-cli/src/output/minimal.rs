use serde_json::Value;

use super::format_value;

/// Print just the key answer value from the output.
///
/// Heuristic: look for well-known result fields in order of priority,
/// then fall back to the first field in the result object.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    // Priority list of key output fields
    let priority_keys = [
        "verdict",
        "difference",
        "advantage",
        "equivalent_rate",
        "taxed_net_rate",
        "taxed_net_amount",
        "tax_rate",
    ];

    if let Value::Object(map) = result_obj {
        for key in &priority_keys {
            if let Some(val) = map.get(*key) {
                if !val.is_null() {
                    println!("{}", format_value(val));
                    return;
                }
            }
        }

        // Equivalence tables: one "label: rate" line per bracket
        if let Some(Value::Array(rows)) = map.get("rows") {
            for row in rows {
                if let Value::Object(r) = row {
                    let label = r.get("bracket").map(format_value).unwrap_or_default();
                    let rate = r.get("equivalent_rate").map(format_value).unwrap_or_default();
                    println!("{}: {}", label, rate);
                }
            }
            return;
        }

        // Fall back to first field
        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_value(val));
            return;
        }
    }

    println!("{}", format_value(result_obj));
}
