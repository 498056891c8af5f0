//! Type names and textual argument parsing

use callforge_primitives::{hex_to_bytes, Address, U256};

use super::error::AbiError;
use super::types::{ParamType, Token, I256};

/// Parse a type name such as `uint256`, `bytes32[]` or `(address,uint256)[2]`
pub fn parse_type(s: &str) -> Result<ParamType, AbiError> {
    let s = s.trim();

    if s.starts_with('(') {
        let close = matching_paren(s).ok_or_else(|| invalid_type(s))?;
        let members = split_top_level(&s[1..close])
            .into_iter()
            .map(parse_type)
            .collect::<Result<Vec<_>, _>>()?;
        return apply_array_suffixes(&s[close + 1..], ParamType::Tuple(members));
    }

    match s.find('[') {
        Some(idx) => apply_array_suffixes(&s[idx..], parse_elementary(&s[..idx])?),
        None => parse_elementary(s),
    }
}

/// Parse a comma-separated type list, optionally wrapped in parentheses
///
/// `"(uint256,string)"`, `"uint256,string"` and `""` are all accepted.
pub fn parse_type_list(s: &str) -> Result<Vec<ParamType>, AbiError> {
    let s = s.trim();
    let inner = match matching_paren(s) {
        Some(close) if s.starts_with('(') && close == s.len() - 1 => &s[1..close],
        _ => s,
    };
    split_top_level(inner).into_iter().map(parse_type).collect()
}

/// Wrap `base` in one array layer per `[]` / `[k]` group, left to right
pub(crate) fn apply_array_suffixes(suffix: &str, base: ParamType) -> Result<ParamType, AbiError> {
    let mut ty = base;
    let mut rest = suffix.trim();

    while !rest.is_empty() {
        let body = rest.strip_prefix('[').ok_or_else(|| invalid_type(suffix))?;
        let close = body.find(']').ok_or_else(|| invalid_type(suffix))?;
        let dim = &body[..close];
        ty = if dim.is_empty() {
            ParamType::Array(Box::new(ty))
        } else {
            let size = parse_size(dim).ok_or_else(|| invalid_type(suffix))?;
            ParamType::FixedArray(Box::new(ty), size)
        };
        rest = &body[close + 1..];
    }

    Ok(ty)
}

fn parse_elementary(s: &str) -> Result<ParamType, AbiError> {
    match s {
        "address" => return Ok(ParamType::Address),
        "bool" => return Ok(ParamType::Bool),
        "string" => return Ok(ParamType::String),
        "bytes" => return Ok(ParamType::Bytes),
        "uint" => return Ok(ParamType::Uint(256)),
        "int" => return Ok(ParamType::Int(256)),
        _ => {}
    }

    if let Some(rest) = s.strip_prefix("uint") {
        return Ok(ParamType::Uint(parse_int_bits(s, rest)?));
    }
    if let Some(rest) = s.strip_prefix("int") {
        return Ok(ParamType::Int(parse_int_bits(s, rest)?));
    }
    if let Some(rest) = s.strip_prefix("bytes") {
        let size = parse_size(rest).ok_or_else(|| invalid_type(s))?;
        if !(1..=32).contains(&size) {
            return Err(invalid_type(s));
        }
        return Ok(ParamType::FixedBytes(size));
    }

    Err(invalid_type(s))
}

fn parse_int_bits(full: &str, digits: &str) -> Result<usize, AbiError> {
    let bits = parse_size(digits).ok_or_else(|| invalid_type(full))?;
    if bits == 0 || bits > 256 || bits % 8 != 0 {
        return Err(invalid_type(full));
    }
    Ok(bits)
}

/// Plain decimal size: ASCII digits only, no sign and no leading zero
fn parse_size(digits: &str) -> Option<usize> {
    let canonical = !digits.is_empty()
        && digits.bytes().all(|b| b.is_ascii_digit())
        && (digits == "0" || !digits.starts_with('0'));
    if !canonical {
        return None;
    }
    digits.parse().ok()
}

fn invalid_type(s: &str) -> AbiError {
    AbiError::InvalidType(s.to_string())
}

/// Index of the `)` closing the `(` at position 0
fn matching_paren(s: &str) -> Option<usize> {
    if !s.starts_with('(') {
        return None;
    }
    let mut depth = 0usize;
    for (i, c) in s.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Split on commas that are not nested in brackets, parentheses or quotes
pub(crate) fn split_top_level(s: &str) -> Vec<&str> {
    let s = s.trim();
    if s.is_empty() {
        return Vec::new();
    }

    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut quoted = false;
    let mut start = 0;

    for (i, c) in s.char_indices() {
        match c {
            '"' => quoted = !quoted,
            '(' | '[' if !quoted => depth += 1,
            ')' | ']' if !quoted => depth -= 1,
            ',' if depth == 0 && !quoted => {
                parts.push(s[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(s[start..].trim());
    parts
}

/// Parse a textual argument into a token of the given type
///
/// Integers accept decimal or `0x` hex, signed integers a leading `-`.
/// Bytes are hex. Arrays use `[a,b]`, tuples `(a,b)`. Strings may be quoted.
pub fn parse_token(param_type: &ParamType, input: &str) -> Result<Token, AbiError> {
    let s = input.trim();
    let invalid = || AbiError::InvalidValue {
        ty: param_type.to_string(),
        value: s.to_string(),
    };

    match param_type {
        ParamType::Address => Address::from_hex(s).map(Token::Address).map_err(|_| invalid()),
        ParamType::Uint(_) => parse_u256(s).map(Token::Uint).ok_or_else(invalid),
        ParamType::Int(_) => {
            let (negative, digits) = match s.strip_prefix('-') {
                Some(rest) => (true, rest),
                None => (false, s),
            };
            let abs = parse_u256(digits).ok_or_else(invalid)?;
            Ok(Token::Int(I256::new(abs, negative)))
        }
        ParamType::Bool => match s {
            "true" => Ok(Token::Bool(true)),
            "false" => Ok(Token::Bool(false)),
            _ => Err(invalid()),
        },
        ParamType::Bytes => Ok(Token::Bytes(hex_to_bytes(s, None)?)),
        ParamType::FixedBytes(size) => Ok(Token::FixedBytes(hex_to_bytes(s, Some(*size))?)),
        ParamType::String => {
            let unquoted = s
                .strip_prefix('"')
                .and_then(|rest| rest.strip_suffix('"'))
                .unwrap_or(s);
            Ok(Token::String(unquoted.to_string()))
        }
        ParamType::Array(inner) => {
            let body = s
                .strip_prefix('[')
                .and_then(|rest| rest.strip_suffix(']'))
                .ok_or_else(invalid)?;
            let items = split_top_level(body)
                .into_iter()
                .map(|item| parse_token(inner, item))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Token::Array(items))
        }
        ParamType::FixedArray(inner, size) => {
            let body = s
                .strip_prefix('[')
                .and_then(|rest| rest.strip_suffix(']'))
                .ok_or_else(invalid)?;
            let parts = split_top_level(body);
            if parts.len() != *size {
                return Err(AbiError::LengthMismatch {
                    expected: *size,
                    got: parts.len(),
                });
            }
            let items = parts
                .into_iter()
                .map(|item| parse_token(inner, item))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Token::FixedArray(items))
        }
        ParamType::Tuple(types) => {
            let body = s
                .strip_prefix('(')
                .and_then(|rest| rest.strip_suffix(')'))
                .ok_or_else(invalid)?;
            let parts = split_top_level(body);
            if parts.len() != types.len() {
                return Err(AbiError::LengthMismatch {
                    expected: types.len(),
                    got: parts.len(),
                });
            }
            let items = types
                .iter()
                .zip(parts)
                .map(|(ty, item)| parse_token(ty, item))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Token::Tuple(items))
        }
    }
}

fn parse_u256(s: &str) -> Option<U256> {
    match s.strip_prefix("0x") {
        Some(hex) => U256::from_str_radix(hex, 16).ok(),
        None => U256::from_dec_str(s).ok(),
    }
}
