//! RpcClient - JSON-RPC client for read calls and estimation

use bytes::Bytes;
use callforge_primitives::{hex_to_bytes, Address};
use serde_json::Value;
use tracing::debug;

use crate::transport::{deserialize_response, MockTransport, Transport};
use crate::types::{BlockId, CallRequest};
use crate::SdkError;

#[cfg(feature = "http")]
use crate::transport::HttpTransport;

/// RPC client over an injected transport
pub struct RpcClient {
    transport: Box<dyn Transport>,
}

impl RpcClient {
    /// Create a new client with HTTP transport
    ///
    /// Does not contact the node.
    #[cfg(feature = "http")]
    pub fn http(url: &str) -> Self {
        Self::with_transport(HttpTransport::new(url))
    }

    /// Create a new client with mock transport (for testing)
    pub fn new_mock() -> Self {
        Self::with_transport(MockTransport::new())
    }

    /// Create a client with a custom transport
    pub fn with_transport(transport: impl Transport + 'static) -> Self {
        Self {
            transport: Box::new(transport),
        }
    }

    /// Helper method to make RPC request and deserialize
    async fn request<T: serde::de::DeserializeOwned>(
        &self,
        method: &str,
        params: Vec<Value>,
    ) -> Result<T, SdkError> {
        debug!(method, params = params.len(), "rpc call");
        let value = self.transport.request_json(method, params).await?;
        deserialize_response(value)
    }

    // ==================== Chain Info ====================

    /// Get the chain ID
    pub async fn chain_id(&self) -> Result<u64, SdkError> {
        let result: String = self.request("eth_chainId", vec![]).await?;
        parse_hex_u64(&result)
    }

    /// Get the current block number
    pub async fn block_number(&self) -> Result<u64, SdkError> {
        let result: String = self.request("eth_blockNumber", vec![]).await?;
        parse_hex_u64(&result)
    }

    /// Get the code at an address
    pub async fn get_code(&self, address: &Address, block: BlockId) -> Result<Bytes, SdkError> {
        let result: String = self
            .request(
                "eth_getCode",
                vec![Value::String(address.to_hex()), serde_json::to_value(block)?],
            )
            .await?;
        parse_hex_bytes(&result)
    }

    // ==================== Call & Estimation ====================

    /// Execute a call (read-only, does not create transaction)
    pub async fn call(&self, request: &CallRequest, block: BlockId) -> Result<Bytes, SdkError> {
        let result: String = self
            .request(
                "eth_call",
                vec![serde_json::to_value(request)?, serde_json::to_value(block)?],
            )
            .await?;
        parse_hex_bytes(&result)
    }

    /// Estimate gas for a transaction
    pub async fn estimate_gas(&self, request: &CallRequest) -> Result<u64, SdkError> {
        let result: String = self
            .request("eth_estimateGas", vec![serde_json::to_value(request)?])
            .await?;
        parse_hex_u64(&result)
    }
}

// ==================== Helper Functions ====================

fn parse_hex_u64(s: &str) -> Result<u64, SdkError> {
    let s = s.strip_prefix("0x").unwrap_or(s);
    u64::from_str_radix(s, 16).map_err(|e| SdkError::InvalidHex(e.to_string()))
}

fn parse_hex_bytes(s: &str) -> Result<Bytes, SdkError> {
    Ok(Bytes::from(hex_to_bytes(s, None)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use callforge_primitives::CodecError;

    #[tokio::test]
    async fn test_client_mock_chain_id() {
        let client = RpcClient::new_mock();
        assert_eq!(client.chain_id().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_client_mock_block_number() {
        let client = RpcClient::new_mock();
        assert_eq!(client.block_number().await.unwrap(), 256);
    }

    #[tokio::test]
    async fn test_client_mock_get_code_empty() {
        let client = RpcClient::new_mock();
        let code = client.get_code(&Address::ZERO, BlockId::Latest).await.unwrap();
        assert!(code.is_empty());
    }

    #[tokio::test]
    async fn test_client_mock_estimate_gas() {
        let client = RpcClient::new_mock();
        let gas = client.estimate_gas(&CallRequest::default()).await.unwrap();
        assert_eq!(gas, 21000);
    }

    #[tokio::test]
    async fn test_client_call_sends_request_and_block() {
        let transport = std::sync::Arc::new(MockTransport::new());
        transport.set_response("eth_call", Value::String("0x1234".into()));
        let client = RpcClient::with_transport(transport.clone());

        let request = CallRequest {
            to: Some(Address::ZERO),
            ..Default::default()
        };
        let out = client.call(&request, BlockId::Number(16)).await.unwrap();
        assert_eq!(out.as_ref(), &[0x12, 0x34]);

        let sent = transport.requests();
        assert_eq!(sent[0].method, "eth_call");
        assert_eq!(sent[0].params[1], Value::String("0x10".into()));
    }

    #[test]
    fn test_parse_hex_u64() {
        assert_eq!(parse_hex_u64("0x1").unwrap(), 1);
        assert_eq!(parse_hex_u64("0x100").unwrap(), 256);
        assert_eq!(parse_hex_u64("100").unwrap(), 256);
        assert!(parse_hex_u64("0xzz").is_err());
    }

    #[test]
    fn test_parse_hex_bytes() {
        assert_eq!(parse_hex_bytes("0x1234").unwrap().as_ref(), &[0x12, 0x34]);
        assert!(parse_hex_bytes("0x").unwrap().is_empty());
        assert!(parse_hex_bytes("").unwrap().is_empty());
        assert_eq!(parse_hex_bytes("0xabc").unwrap().as_ref(), &[0x0a, 0xbc]);
        assert_eq!(parse_hex_bytes("1234").unwrap().as_ref(), &[0x12, 0x34]);
    }

    #[test]
    fn test_parse_hex_bytes_invalid_digit() {
        assert_eq!(
            parse_hex_bytes("0x12zz"),
            Err(SdkError::Codec(CodecError::InvalidHex {
                position: 1,
                chunk: "zz".to_string()
            }))
        );
    }
}
