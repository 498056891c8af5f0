//! Structural JSON rendering of decoded values

use serde_json::{Map, Value};

use super::param::ParamSpec;
use super::types::Token;

/// Render a token as JSON following its descriptor
///
/// Tuples become objects keyed by component name (the index when unnamed),
/// arrays become arrays, integers decimal strings, bytes and addresses hex.
pub fn to_json(spec: &ParamSpec, token: &Token) -> Value {
    match token {
        Token::Address(addr) => Value::String(addr.to_hex()),
        Token::Uint(value) => Value::String(value.to_string()),
        Token::Int(value) => Value::String(value.to_string()),
        Token::Bool(b) => Value::Bool(*b),
        Token::Bytes(bytes) | Token::FixedBytes(bytes) => {
            Value::String(format!("0x{}", hex::encode(bytes)))
        }
        Token::String(s) => Value::String(s.clone()),
        Token::Array(items) | Token::FixedArray(items) => {
            let element = spec
                .element()
                .unwrap_or_else(|| ParamSpec::new("", spec.ty.clone()));
            Value::Array(items.iter().map(|item| to_json(&element, item)).collect())
        }
        Token::Tuple(items) => {
            let mut object = Map::new();
            for (i, item) in items.iter().enumerate() {
                let (key, member) = match spec.components.get(i) {
                    Some(c) if !c.name.is_empty() => (c.name.clone(), c.clone()),
                    Some(c) => (i.to_string(), c.clone()),
                    None => (i.to_string(), ParamSpec::new("", "")),
                };
                object.insert(key, to_json(&member, item));
            }
            Value::Object(object)
        }
    }
}

/// Render a list of decoded outputs as one object keyed like a tuple
pub fn outputs_to_json(specs: &[ParamSpec], tokens: &[Token]) -> Value {
    let tuple = ParamSpec::tuple("", "tuple", specs.to_vec());
    to_json(&tuple, &Token::Tuple(tokens.to_vec()))
}
