//! Read-only contract calls

use tracing::debug;

use crate::abi::{decode, Token};
use crate::client::RpcClient;
use crate::method::MethodDescriptor;
use crate::overrides::Overrides;
use crate::prepared::{prepare_call, ContractRef, PreparedCall};
use crate::types::{BlockId, CallRequest};
use crate::SdkError;

/// Call `method` on `contract` at the latest block and decode its outputs
///
/// One output is returned as is, any other count as a `Token::Tuple`.
/// Transport and RPC errors are returned unchanged; nothing is retried.
pub async fn read_call(
    client: &RpcClient,
    contract: ContractRef,
    method: &MethodDescriptor,
    params: Vec<Token>,
) -> Result<Token, SdkError> {
    read_call_at(client, contract, method, params, BlockId::Latest).await
}

/// `read_call` at a specific block
pub async fn read_call_at(
    client: &RpcClient,
    contract: ContractRef,
    method: &MethodDescriptor,
    params: Vec<Token>,
    block: BlockId,
) -> Result<Token, SdkError> {
    let call = prepare_call(contract, method.clone(), params, Overrides::new());
    read_prepared_at(client, &call, block).await
}

/// Read a prepared call at the latest block
pub async fn read_prepared(client: &RpcClient, call: &PreparedCall) -> Result<Token, SdkError> {
    read_prepared_at(client, call, BlockId::Latest).await
}

/// Read a prepared call at a specific block
pub async fn read_prepared_at(
    client: &RpcClient,
    call: &PreparedCall,
    block: BlockId,
) -> Result<Token, SdkError> {
    let request = CallRequest {
        to: Some(call.contract().address),
        data: Some(call.encode().await?),
        ..Default::default()
    };

    let raw = client.call(&request, block).await?;
    debug!(method = %call.method().name, bytes = raw.len(), "read call returned");
    decode_output(call.method(), &raw)
}

/// Decode return data against a method's outputs and shape the result
pub fn decode_output(method: &MethodDescriptor, data: &[u8]) -> Result<Token, SdkError> {
    let types = method.output_types()?;
    let mut tokens = decode(&types, data)?;
    if tokens.len() == 1 {
        if let Some(token) = tokens.pop() {
            return Ok(token);
        }
    }
    Ok(Token::Tuple(tokens))
}
