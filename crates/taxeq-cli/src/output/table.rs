use serde_json::Value;
use tabled::{builder::Builder, Table};

use super::format_value;

/// Format output as a table using the tabled crate.
///
/// Equivalence-table results carry a `rows` array and render one row per
/// withholding bracket; every other result renders as field/value pairs.
pub fn print_table(value: &Value) {
    let Some(envelope) = value.as_object() else {
        println!("{}", value);
        return;
    };

    match envelope.get("result") {
        Some(Value::Object(result)) => {
            if let Some(Value::Array(rows)) = result.get("rows") {
                print_header_fields(result);
                print_rows(rows);
            } else {
                print_field_value(result);
            }
        }
        _ => print_field_value(envelope),
    }

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

/// Scalar fields that precede an embedded `rows` table.
fn print_header_fields(result: &serde_json::Map<String, Value>) {
    for (key, val) in result {
        if key != "rows" {
            println!("{}: {}", key, format_value(val));
        }
    }
}

fn print_field_value(map: &serde_json::Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in map {
        builder.push_record([key.as_str(), &format_value(val)]);
    }
    println!("{}", Table::from(builder));
}

fn print_rows(rows: &[Value]) {
    let Some(Value::Object(first)) = rows.first() else {
        println!("(empty)");
        return;
    };

    let headers: Vec<String> = first.keys().cloned().collect();
    let mut builder = Builder::default();
    builder.push_record(&headers);

    for row in rows {
        if let Value::Object(map) = row {
            let record: Vec<String> = headers
                .iter()
                .map(|h| map.get(h.as_str()).map(format_value).unwrap_or_default())
                .collect();
            builder.push_record(record);
        }
    }

    println!("{}", Table::from(builder));
}
