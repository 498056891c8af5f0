//! Subcommands

pub mod abi;
pub mod call;
pub mod supports;

use callforge_sdk::abi::{parse_type_list, ParamSpec, ParamType};
use callforge_sdk::{MethodDescriptor, Mutability};

use crate::CliError;

/// Split `name(inputs)` or `name(inputs)(outputs)` into its parts
pub fn parse_signature(signature: &str) -> Result<(String, Vec<ParamType>, Vec<ParamType>), CliError> {
    let signature = signature.trim();
    let open = signature
        .find('(')
        .ok_or_else(|| CliError::InvalidInput(format!("missing '(' in {}", signature)))?;
    let name = &signature[..open];
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$') {
        return Err(CliError::InvalidInput(format!("invalid method name in {}", signature)));
    }

    let rest = &signature[open..];
    let close = closing_paren(rest)
        .ok_or_else(|| CliError::InvalidInput(format!("unbalanced parentheses in {}", signature)))?;
    let inputs = parse_type_list(&rest[..=close])?;
    let outputs = parse_type_list(&rest[close + 1..])?;

    Ok((name.to_string(), inputs, outputs))
}

/// Descriptor for a textual signature; the selector is hashed from it
pub fn descriptor_from_signature(signature: &str) -> Result<MethodDescriptor, CliError> {
    let (name, inputs, outputs) = parse_signature(signature)?;
    let specs = |types: &[ParamType]| -> Vec<ParamSpec> {
        types.iter().map(ParamSpec::from_param_type).collect()
    };
    let method = MethodDescriptor::from_signature(name, specs(&inputs), specs(&outputs), Mutability::View)?;
    Ok(method)
}

fn closing_paren(s: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in s.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}
