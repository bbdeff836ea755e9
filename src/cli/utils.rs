use serde_json::{json, Map, Value};
use std::io::{self, BufRead, Write};

use crate::cli::OutputFormat;

/// Output a success message in the appropriate format
pub fn output_success(
    output_format: &OutputFormat,
    message: &str,
    data: Option<Value>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = Map::new();
            response.insert("success".to_string(), json!(true));
            response.insert("message".to_string(), json!(message));

            match data {
                Some(Value::Object(fields)) => response.extend(fields),
                Some(other) => {
                    response.insert("data".to_string(), other);
                }
                None => {}
            }

            println!("{}", serde_json::to_string_pretty(&Value::Object(response))?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output a collection; text mode prints one line per item via `line`.
pub fn output_collection<F>(
    output_format: &OutputFormat,
    collection_name: &str,
    items: &Value,
    empty_message: &str,
    line: F,
) -> anyhow::Result<()>
where
    F: Fn(&Value) -> String,
{
    let list = items.as_array().map(Vec::as_slice).unwrap_or_default();

    match output_format {
        OutputFormat::Json => {
            let mut response = Map::new();
            response.insert(collection_name.to_string(), Value::Array(list.to_vec()));
            println!("{}", serde_json::to_string_pretty(&Value::Object(response))?);
        }
        OutputFormat::Text if list.is_empty() => println!("{}", empty_message),
        OutputFormat::Text => {
            for item in list {
                println!("{}", line(item));
            }
        }
    }
    Ok(())
}

/// Output a single record; text mode prints `key: value` pairs.
pub fn output_record(output_format: &OutputFormat, record: &Value) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(record)?),
        OutputFormat::Text => match record.as_object() {
            Some(fields) => {
                for (key, value) in fields {
                    println!("{:>12}: {}", key, display_value(value));
                }
            }
            None => println!("{}", display_value(record)),
        },
    }
    Ok(())
}

/// String field from a JSON object, or "-" when absent
pub fn field<'a>(value: &'a Value, key: &str) -> &'a str {
    value.get(key).and_then(Value::as_str).unwrap_or("-")
}

pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "-".to_string(),
        other => other.to_string(),
    }
}

/// Read a secret from the terminal when it was not passed as a flag.
pub fn prompt(label: &str) -> anyhow::Result<String> {
    let mut stderr = io::stderr();
    write!(stderr, "{}: ", label)?;
    stderr.flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
