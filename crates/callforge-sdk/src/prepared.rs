//! Prepared calls: contract, method, params and overrides, encoded on demand
//!
//! Preparing a call performs no encoding and no I/O. Deferred params are
//! produced at most once per `PreparedCall`; every consumer (gas estimation,
//! encoding for submission, read calls) sees the same resolved values.

use std::fmt;
use std::future::Future;

use bytes::Bytes;
use callforge_primitives::{Address, ChainId};
use futures_util::future::{BoxFuture, Shared};
use futures_util::FutureExt;
use tracing::{debug, trace};

use crate::abi::{encode_function_call, Token};
use crate::client::RpcClient;
use crate::method::MethodDescriptor;
use crate::overrides::{Overrides, ResolvedOverrides};
use crate::types::CallRequest;
use crate::SdkError;

/// Target contract
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContractRef {
    /// Contract address
    pub address: Address,
    /// Chain the contract lives on
    pub chain_id: ChainId,
}

impl ContractRef {
    /// Create a contract reference
    pub fn new(address: Address, chain_id: ChainId) -> Self {
        Self { address, chain_id }
    }
}

type ParamsFuture = Shared<BoxFuture<'static, Result<Vec<Token>, SdkError>>>;

/// A params producer that runs at most once
///
/// The producer starts on first resolution. Later and concurrent resolutions
/// await the same shared future and get the same value or error. Dropping a
/// resolution midway does not restart the producer. Clones share the result.
#[derive(Clone)]
pub struct ResolveOnce {
    future: ParamsFuture,
}

impl ResolveOnce {
    /// Wrap a producer
    pub fn new<F, Fut>(producer: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<Vec<Token>, SdkError>> + Send + 'static,
    {
        let future = async move {
            debug!("resolving deferred call params");
            producer().await
        }
        .boxed()
        .shared();
        Self { future }
    }

    /// Resolve, starting the producer on first use
    pub async fn resolve(&self) -> Result<Vec<Token>, SdkError> {
        self.future.clone().await
    }

    /// Whether the producer has finished
    pub fn is_resolved(&self) -> bool {
        self.future.peek().is_some()
    }
}

impl fmt::Debug for ResolveOnce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolveOnce")
            .field("resolved", &self.is_resolved())
            .finish()
    }
}

/// Call parameters, given directly or produced later
#[derive(Debug, Clone)]
pub enum Params {
    /// Ready tokens
    Direct(Vec<Token>),
    /// Produced once on demand
    Deferred(ResolveOnce),
}

impl Params {
    /// Deferred params from an async producer
    pub fn deferred<F, Fut>(producer: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<Vec<Token>, SdkError>> + Send + 'static,
    {
        Params::Deferred(ResolveOnce::new(producer))
    }

    /// Resolve to tokens
    pub async fn resolve(&self) -> Result<Vec<Token>, SdkError> {
        match self {
            Params::Direct(tokens) => Ok(tokens.clone()),
            Params::Deferred(once) => once.resolve().await,
        }
    }
}

impl From<Vec<Token>> for Params {
    fn from(tokens: Vec<Token>) -> Self {
        Params::Direct(tokens)
    }
}

/// A contract call ready to be encoded, estimated, read or handed to a signer
#[derive(Debug, Clone)]
pub struct PreparedCall {
    contract: ContractRef,
    method: MethodDescriptor,
    params: Params,
    overrides: Overrides,
}

/// Bundle a contract, method, params and overrides
///
/// Synchronous; nothing is encoded or fetched. Argument count is checked
/// when the call is encoded.
pub fn prepare_call(
    contract: ContractRef,
    method: MethodDescriptor,
    params: impl Into<Params>,
    overrides: Overrides,
) -> PreparedCall {
    PreparedCall {
        contract,
        method,
        params: params.into(),
        overrides,
    }
}

impl PreparedCall {
    /// Target contract
    pub fn contract(&self) -> &ContractRef {
        &self.contract
    }

    /// Called method
    pub fn method(&self) -> &MethodDescriptor {
        &self.method
    }

    /// Overrides
    pub fn overrides(&self) -> &Overrides {
        &self.overrides
    }

    /// Resolved params
    pub async fn params(&self) -> Result<Vec<Token>, SdkError> {
        self.params.resolve().await
    }

    /// Calldata: selector followed by the encoded params
    pub async fn encode(&self) -> Result<Bytes, SdkError> {
        let tokens = self.params().await?;
        let types = self.method.input_types()?;
        let data = encode_function_call(self.method.selector, &types, &tokens)?;
        trace!(method = %self.method.name, bytes = data.len(), "encoded calldata");
        Ok(Bytes::from(data))
    }

    /// RPC request with calldata and every override resolved
    ///
    /// `extra_gas` is added to `gas` when both are set.
    pub async fn to_call_request(&self, from: Option<Address>) -> Result<CallRequest, SdkError> {
        let (data, resolved) = futures_util::try_join!(self.encode(), self.overrides.resolve_all())?;
        Ok(self.build_request(from, data, &resolved))
    }

    /// Gas for this call
    ///
    /// The `gas` override when set, the node's estimate otherwise; `extra_gas`
    /// is added in both cases.
    pub async fn estimate_gas(&self, client: &RpcClient) -> Result<u64, SdkError> {
        let (data, resolved) = futures_util::try_join!(self.encode(), self.overrides.resolve_all())?;
        if let Some(gas) = resolved.total_gas() {
            return Ok(gas);
        }

        let request = self.build_request(None, data, &resolved);
        let estimate = client.estimate_gas(&request).await?;
        Ok(estimate.saturating_add(resolved.extra_gas.unwrap_or(0)))
    }

    fn build_request(&self, from: Option<Address>, data: Bytes, resolved: &ResolvedOverrides) -> CallRequest {
        CallRequest {
            from,
            to: Some(self.contract.address),
            gas: resolved.total_gas(),
            gas_price: resolved.gas_price,
            max_fee_per_gas: resolved.max_fee_per_gas,
            max_priority_fee_per_gas: resolved.max_priority_fee_per_gas,
            value: resolved.value,
            nonce: resolved.nonce,
            data: Some(data),
            access_list: resolved.access_list.clone(),
            authorization_list: resolved.authorization_list.clone(),
        }
    }
}
