//! Read-only contract calls against the configured node

use callforge_primitives::Address;
use callforge_sdk::abi::Token;
use callforge_sdk::types::BlockId;
use callforge_sdk::{read_call_at, ContractRef, RpcClient};
use clap::Args;
use tracing::debug;

use super::abi::parse_tokens;
use super::descriptor_from_signature;
use crate::{config::Config, output::Output, CliError};

/// Arguments of `call`
#[derive(Debug, Args)]
pub struct CallArgs {
    /// Contract address
    pub to: String,
    /// Signature with outputs, e.g. "balanceOf(address)(uint256)"
    pub signature: String,
    /// Arguments, one per input
    pub args: Vec<String>,
    /// Block tag or number; defaults to the configured block
    #[arg(long)]
    pub block: Option<String>,
}

pub async fn execute(args: CallArgs, config: &Config, json: bool) -> Result<(), CliError> {
    let address = Address::from_hex(&args.to).map_err(|e| CliError::InvalidAddress(e.to_string()))?;
    let method = descriptor_from_signature(&args.signature)?;
    let inputs = method.input_types()?;
    let outputs = method.output_types()?;
    let tokens = parse_tokens(&inputs, &args.args)?;

    let block_arg = args.block.as_deref().unwrap_or(&config.block);
    let block: BlockId = block_arg
        .parse()
        .map_err(|_| CliError::InvalidInput(format!("invalid block: {}", block_arg)))?;

    debug!(rpc = %config.rpc_url, method = %method, "read call");
    let client = RpcClient::http(&config.rpc_url);
    let contract = ContractRef::new(address, config.chain_id);
    let result = read_call_at(&client, contract, &method, tokens, block).await?;

    let decoded = if outputs.len() == 1 {
        vec![result]
    } else {
        match result {
            Token::Tuple(items) => items,
            other => vec![other],
        }
    };
    Output::new(json)
        .field("to", &address.to_hex())
        .field("selector", &method.selector_hex())
        .decoded(&outputs, &decoded)
        .print();
    Ok(())
}
