//! Output formatting
//!
//! Every command builds one [`Output`]: JSON fields for `--json`, plain lines
//! otherwise.

use callforge_sdk::abi::{outputs_to_json, ParamSpec, ParamType, Token};
use serde_json::{Map, Value};

use crate::CliError;

/// Result of a command, printed as JSON or as text lines
pub struct Output {
    json_mode: bool,
    fields: Map<String, Value>,
    lines: Vec<String>,
}

impl Output {
    /// Create a new output builder
    pub fn new(json_mode: bool) -> Self {
        Self {
            json_mode,
            fields: Map::new(),
            lines: Vec::new(),
        }
    }

    /// Add a string field
    pub fn field(mut self, key: &str, value: &str) -> Self {
        self.fields.insert(key.to_string(), Value::String(value.to_string()));
        self
    }

    /// Add a numeric field
    pub fn field_u64(mut self, key: &str, value: u64) -> Self {
        self.fields.insert(key.to_string(), Value::Number(value.into()));
        self
    }

    /// Add a boolean field
    pub fn field_bool(mut self, key: &str, value: bool) -> Self {
        self.fields.insert(key.to_string(), Value::Bool(value));
        self
    }

    /// Decoded values: a `values` array in JSON, one value per line in text
    pub fn decoded(mut self, types: &[ParamType], tokens: &[Token]) -> Self {
        let values = decoded_values(types, tokens);
        self.lines.extend(values.iter().map(|v| match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }));
        self.fields.insert("values".to_string(), Value::Array(values));
        self
    }

    /// Append a text line
    pub fn line(mut self, text: &str) -> Self {
        self.lines.push(text.to_string());
        self
    }

    /// Print to stdout
    pub fn print(self) {
        if self.json_mode {
            let json = Value::Object(self.fields);
            println!("{}", serde_json::to_string_pretty(&json).unwrap_or_default());
        } else if !self.lines.is_empty() {
            println!("{}", self.lines.join("\n"));
        }
    }

    /// Report a failed command: JSON on stdout with `--json`, text on stderr otherwise
    pub fn error(json_mode: bool, error: &CliError) {
        if json_mode {
            println!(
                "{}",
                serde_json::json!({
                    "error": error.to_string(),
                    "success": false
                })
            );
        } else {
            eprintln!("Error: {}", error);
        }
    }
}

/// Decoded values in declaration order
fn decoded_values(types: &[ParamType], tokens: &[Token]) -> Vec<Value> {
    let specs: Vec<ParamSpec> = types.iter().map(ParamSpec::from_param_type).collect();
    match outputs_to_json(&specs, tokens) {
        Value::Object(map) => {
            // Unnamed outputs are keyed by index
            let mut entries: Vec<_> = map.into_iter().collect();
            entries.sort_by_key(|(k, _)| k.parse::<usize>().unwrap_or(usize::MAX));
            entries.into_iter().map(|(_, v)| v).collect()
        }
        other => vec![other],
    }
}
