//! Offline ABI commands: selector, encode, decode

use callforge_primitives::hex_to_bytes;
use callforge_sdk::abi::{
    decode, encode, encode_function_call, parse_token, parse_type_list, ParamType, Token,
};
use clap::Args;

use super::parse_signature;
use crate::{output::Output, CliError};

/// Arguments of `selector`
#[derive(Debug, Args)]
pub struct SelectorArgs {
    /// Function signature, e.g. "transfer(address,uint256)"
    pub signature: String,
}

/// Arguments of `encode`
#[derive(Debug, Args)]
pub struct EncodeArgs {
    /// Function signature, e.g. "transfer(address,uint256)"
    pub signature: String,
    /// Arguments, one per input
    pub args: Vec<String>,
    /// Encode the arguments only, without the selector
    #[arg(long)]
    pub no_selector: bool,
}

/// Arguments of `decode`
#[derive(Debug, Args)]
pub struct DecodeArgs {
    /// Types, e.g. "(uint256,string)"
    pub types: String,
    /// Hex data
    pub data: String,
    /// Skip a leading 4-byte selector
    #[arg(long)]
    pub calldata: bool,
}

pub fn selector(args: SelectorArgs, json: bool) -> Result<(), CliError> {
    let (name, inputs, _) = parse_signature(&args.signature)?;
    let canonical = format!("{}({})", name, join_types(&inputs));
    let selector = callforge_sdk::abi::function_selector(&canonical);
    let hex = format!("0x{}", hex::encode(selector));

    Output::new(json)
        .field("signature", &canonical)
        .field("selector", &hex)
        .line(&hex)
        .print();
    Ok(())
}

pub fn encode_args(args: EncodeArgs, json: bool) -> Result<(), CliError> {
    let (name, inputs, _) = parse_signature(&args.signature)?;
    let tokens = parse_tokens(&inputs, &args.args)?;

    let data = if args.no_selector {
        encode(&inputs, &tokens)?
    } else {
        let canonical = format!("{}({})", name, join_types(&inputs));
        encode_function_call(callforge_sdk::abi::function_selector(&canonical), &inputs, &tokens)?
    };
    let hex = format!("0x{}", hex::encode(&data));

    Output::new(json)
        .field("data", &hex)
        .field_u64("bytes", data.len() as u64)
        .line(&hex)
        .print();
    Ok(())
}

pub fn decode_data(args: DecodeArgs, json: bool) -> Result<(), CliError> {
    let types = parse_type_list(&args.types)?;
    let bytes = hex_to_bytes(&args.data, None).map_err(|e| CliError::InvalidHex(e.to_string()))?;
    let body = if args.calldata {
        bytes
            .get(4..)
            .ok_or_else(|| CliError::InvalidInput("calldata shorter than a selector".to_string()))?
    } else {
        &bytes[..]
    };

    let tokens = decode(&types, body)?;

    Output::new(json).decoded(&types, &tokens).print();
    Ok(())
}

/// Parse one textual argument per input type
pub fn parse_tokens(types: &[ParamType], args: &[String]) -> Result<Vec<Token>, CliError> {
    if types.len() != args.len() {
        return Err(CliError::InvalidInput(format!(
            "expected {} arguments, got {}",
            types.len(),
            args.len()
        )));
    }
    types
        .iter()
        .zip(args)
        .map(|(ty, arg)| parse_token(ty, arg).map_err(CliError::from))
        .collect()
}

fn join_types(types: &[ParamType]) -> String {
    types.iter().map(ParamType::to_string).collect::<Vec<_>>().join(",")
}
