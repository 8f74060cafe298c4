//! Invoke a function from the command line

use super::{CliError, json_to_value, value_to_json};
use crate::{Session, Value};

/// Options for the call command
#[derive(Debug, Clone, Default)]
pub struct CallOptions {
    /// Function name
    pub name: String,
    /// Arguments, one JSON document each
    pub args: Vec<String>,
    /// JSON array of arguments, used when `args` is empty
    pub stdin: Option<String>,
}

/// Parse a single argument; text that is not valid JSON is taken as a string.
fn parse_arg(raw: &str) -> Value {
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(v) => json_to_value(v),
        Err(_) => Value::String(raw.to_string()),
    }
}

fn collect_args(options: &CallOptions) -> Result<Vec<Value>, CliError> {
    if !options.args.is_empty() {
        return Ok(options.args.iter().map(|a| parse_arg(a)).collect());
    }
    match &options.stdin {
        Some(input) if !input.trim().is_empty() => {
            match json_to_value(serde_json::from_str(input)?) {
                Value::Array(items) => Ok(items),
                other => Err(CliError::NotAnArray(other.type_name())),
            }
        }
        _ => Ok(Vec::new()),
    }
}

/// Run one function call in `session` and return its JSON result
pub fn execute_call(session: &Session, options: &CallOptions) -> Result<serde_json::Value, CliError> {
    let args = collect_args(options)?;
    let result = session.call(&options.name, &args)?;
    Ok(value_to_json(result))
}
