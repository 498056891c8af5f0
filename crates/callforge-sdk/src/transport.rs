//! Transport layer for RPC communication

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;

use crate::SdkError;

/// Transport trait for RPC communication (object-safe)
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send an RPC request and get JSON response
    async fn request_json(&self, method: &str, params: Vec<Value>) -> Result<Value, SdkError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    async fn request_json(&self, method: &str, params: Vec<Value>) -> Result<Value, SdkError> {
        (**self).request_json(method, params).await
    }
}

/// Helper to deserialize response
pub fn deserialize_response<T: serde::de::DeserializeOwned>(value: Value) -> Result<T, SdkError> {
    serde_json::from_value(value).map_err(|e| SdkError::Serialization(e.to_string()))
}

/// A request seen by `MockTransport`
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    /// RPC method
    pub method: String,
    /// RPC params
    pub params: Vec<Value>,
}

/// Mock transport for testing
///
/// Answers from per-method canned responses, records every request and can
/// be told to fail a method.
pub struct MockTransport {
    responses: Mutex<HashMap<String, Value>>,
    defaults: HashMap<String, Value>,
    errors: Mutex<HashMap<String, SdkError>>,
    log: Mutex<Vec<RecordedRequest>>,
}

impl MockTransport {
    /// Create a new mock transport
    pub fn new() -> Self {
        let mut defaults = HashMap::new();
        defaults.insert("eth_chainId".to_string(), Value::String("0x1".to_string()));
        defaults.insert("eth_blockNumber".to_string(), Value::String("0x100".to_string())); // 256
        defaults.insert("eth_estimateGas".to_string(), Value::String("0x5208".to_string())); // 21000
        defaults.insert("eth_call".to_string(), Value::String("0x".to_string()));
        defaults.insert("eth_getCode".to_string(), Value::String("0x".to_string()));

        Self {
            responses: Mutex::new(HashMap::new()),
            defaults,
            errors: Mutex::new(HashMap::new()),
            log: Mutex::new(Vec::new()),
        }
    }

    /// Set a mock response for a specific method
    pub fn set_response(&self, method: &str, response: Value) {
        self.responses.lock().insert(method.to_string(), response);
    }

    /// Make every request for `method` fail with `error`
    pub fn set_error(&self, method: &str, error: SdkError) {
        self.errors.lock().insert(method.to_string(), error);
    }

    /// Clear custom responses and injected errors
    pub fn clear_responses(&self) {
        self.responses.lock().clear();
        self.errors.lock().clear();
    }

    /// Number of requests received so far
    pub fn request_count(&self) -> usize {
        self.log.lock().len()
    }

    /// Number of requests received for one method
    pub fn request_count_for(&self, method: &str) -> usize {
        self.log.lock().iter().filter(|r| r.method == method).count()
    }

    /// Snapshot of every request received
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.log.lock().clone()
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn request_json(&self, method: &str, params: Vec<Value>) -> Result<Value, SdkError> {
        self.log.lock().push(RecordedRequest {
            method: method.to_string(),
            params,
        });

        if let Some(error) = self.errors.lock().get(method).cloned() {
            return Err(error);
        }

        let custom = self.responses.lock().get(method).cloned();
        if let Some(response) = custom.or_else(|| self.defaults.get(method).cloned()) {
            return Ok(response);
        }

        Err(SdkError::Rpc {
            code: -32601,
            message: format!("Method not found: {}", method),
        })
    }
}

/// HTTP transport for real RPC communication
///
/// Request ids come from a per-instance counter.
#[cfg(feature = "http")]
pub struct HttpTransport {
    client: reqwest::Client,
    url: String,
    request_id: std::sync::atomic::AtomicU64,
}

#[cfg(feature = "http")]
impl HttpTransport {
    /// Create a new HTTP transport
    pub fn new(url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.to_string(),
            request_id: std::sync::atomic::AtomicU64::new(1),
        }
    }

    /// Endpoint URL
    pub fn url(&self) -> &str {
        &self.url
    }

    fn next_id(&self) -> u64 {
        self.request_id
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(feature = "http")]
#[async_trait]
impl Transport for HttpTransport {
    async fn request_json(&self, method: &str, params: Vec<Value>) -> Result<Value, SdkError> {
        let id = self.next_id();
        tracing::debug!(id, method, url = %self.url, "rpc request");

        let request = serde_json::json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });

        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| SdkError::Transport(e.to_string()))?;

        let response: JsonRpcResponse = response
            .json()
            .await
            .map_err(|e| SdkError::Transport(e.to_string()))?;

        if let Some(error) = response.error {
            tracing::debug!(id, code = error.code, "rpc error");
            return Err(SdkError::Rpc {
                code: error.code,
                message: error.message,
            });
        }

        response.result.ok_or_else(|| SdkError::Rpc {
            code: -32603,
            message: "No result in response".to_string(),
        })
    }
}

#[cfg(feature = "http")]
#[derive(serde::Deserialize)]
struct JsonRpcResponse {
    result: Option<Value>,
    error: Option<JsonRpcError>,
}

#[cfg(feature = "http")]
#[derive(serde::Deserialize)]
struct JsonRpcError {
    code: i64,
    message: String,
}
