//! # callforge-sdk
//!
//! Contract call preparation for EVM chains.
//!
//! ## Features
//!
//! - **ABI**: head/tail encoding and decoding of Solidity parameters
//! - **MethodDescriptor**: selector, parameter schema and a capability probe
//! - **PreparedCall**: params resolved once, overrides resolved lazily, encoded on demand
//! - **Reader**: read-only calls decoded against a method's outputs
//! - **RpcClient**: JSON-RPC over an injected transport
//! - **Auth**: sign-in payloads and their verification
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use callforge_sdk::{methods, ContractRef, RpcClient};
//! use callforge_primitives::Address;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = RpcClient::http("http://localhost:8545");
//!     let token = ContractRef::new(
//!         Address::from_hex("0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48")?,
//!         1,
//!     );
//!
//!     let owner = Address::from_hex("0x742d35Cc6634C0532925a3b844Bc9e7595f0aB3d")?;
//!     let balance = methods::read_balance_of(&client, token, owner).await?;
//!     println!("Balance: {}", balance);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Deferred params
//!
//! ```rust
//! use callforge_sdk::{abi::{ParamSpec, Token}, prepare_call, ContractRef, MethodDescriptor, Mutability, Overrides, Params};
//! use callforge_primitives::{Address, U256};
//!
//! # async fn run() -> Result<(), callforge_sdk::SdkError> {
//! let method = MethodDescriptor::new(
//!     "setPrice",
//!     [0x91, 0xb7, 0xf5, 0xed],
//!     vec![ParamSpec::new("price", "uint256")],
//!     vec![],
//!     Mutability::NonPayable,
//! );
//! let call = prepare_call(
//!     ContractRef::new(Address::ZERO, 1),
//!     method,
//!     Params::deferred(|| async { Ok(vec![Token::Uint(U256::from(10))]) }),
//!     Overrides::new().gas(100_000),
//! );
//!
//! // The producer runs once, however many times the call is encoded
//! let first = call.encode().await?;
//! let second = call.encode().await?;
//! assert_eq!(first, second);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod abi;
pub mod auth;
mod client;
mod error;
pub mod method;
pub mod methods;
pub mod overrides;
pub mod prepared;
pub mod reader;
mod transport;
pub mod types;

// Re-export main types
pub use client::RpcClient;
pub use error::SdkError;
pub use method::{MethodDescriptor, Mutability};
pub use overrides::{OverrideKey, OverrideValue, Overrides, ResolvedOverrides};
pub use prepared::{prepare_call, ContractRef, Params, PreparedCall, ResolveOnce};
pub use reader::{decode_output, read_call, read_call_at, read_prepared, read_prepared_at};
pub use transport::{MockTransport, RecordedRequest};

/// Re-export Transport trait for custom implementations
pub use transport::Transport;

#[cfg(feature = "http")]
pub use transport::HttpTransport;

// Re-export primitives for convenience
pub use callforge_primitives::{Address, ChainId, Selector, H256, U256};
