//! Descriptors for common token methods
//!
//! Each method comes with its descriptor, an `is_*_supported` probe over a
//! list of selectors, and a typed read or prepare helper.

use callforge_primitives::{Address, H256, U256};

use crate::abi::{ParamSpec, Token};
use crate::client::RpcClient;
use crate::method::{MethodDescriptor, Mutability};
use crate::overrides::Overrides;
use crate::prepared::{prepare_call, ContractRef, Params, PreparedCall};
use crate::reader::read_call;
use crate::SdkError;

/// `decimals()` selector
pub const DECIMALS_SELECTOR: [u8; 4] = [0x31, 0x3c, 0xe5, 0x67];
/// `balanceOf(address)` selector
pub const BALANCE_OF_SELECTOR: [u8; 4] = [0x70, 0xa0, 0x82, 0x31];
/// `transfer(address,uint256)` selector
pub const TRANSFER_SELECTOR: [u8; 4] = [0xa9, 0x05, 0x9c, 0xbb];
/// `approve(address,uint256)` selector
pub const APPROVE_SELECTOR: [u8; 4] = [0x09, 0x5e, 0xa7, 0xb3];
/// `allowance(address,address)` selector
pub const ALLOWANCE_SELECTOR: [u8; 4] = [0xdd, 0x62, 0xed, 0x3e];
/// `ownerOf(uint256)` selector
pub const OWNER_OF_SELECTOR: [u8; 4] = [0x63, 0x52, 0x21, 0x1e];
/// `mintWithSignature((address,address,uint256,address,string,uint256,address,uint128,uint128,bytes32),bytes)` selector
pub const MINT_WITH_SIGNATURE_SELECTOR: [u8; 4] = [0x2c, 0x45, 0x10, 0xf8];

// ==================== ERC-20 ====================

/// ERC-20 `decimals()`
pub fn decimals() -> MethodDescriptor {
    MethodDescriptor::new(
        "decimals",
        DECIMALS_SELECTOR,
        vec![],
        vec![ParamSpec::new("", "uint8")],
        Mutability::View,
    )
}

/// Whether `decimals()` is among `available`
pub fn is_decimals_supported<S: AsRef<str>>(available: &[S]) -> bool {
    decimals().is_supported(available)
}

/// Read a token's decimals
pub async fn read_decimals(client: &RpcClient, contract: ContractRef) -> Result<u8, SdkError> {
    let token = read_call(client, contract, &decimals(), vec![]).await?;
    let value = uint_output(&token)?;
    if value > U256::from(u8::MAX) {
        return Err(SdkError::InvalidResponse(format!("decimals out of range: {}", value)));
    }
    Ok(value.low_u64() as u8)
}

/// ERC-20 `balanceOf(address)`
pub fn balance_of() -> MethodDescriptor {
    MethodDescriptor::new(
        "balanceOf",
        BALANCE_OF_SELECTOR,
        vec![ParamSpec::new("account", "address")],
        vec![ParamSpec::new("", "uint256")],
        Mutability::View,
    )
}

/// Whether `balanceOf(address)` is among `available`
pub fn is_balance_of_supported<S: AsRef<str>>(available: &[S]) -> bool {
    balance_of().is_supported(available)
}

/// Read an account's token balance
pub async fn read_balance_of(
    client: &RpcClient,
    contract: ContractRef,
    account: Address,
) -> Result<U256, SdkError> {
    let token = read_call(client, contract, &balance_of(), vec![Token::Address(account)]).await?;
    uint_output(&token)
}

/// ERC-20 `transfer(address,uint256)`
pub fn transfer() -> MethodDescriptor {
    MethodDescriptor::new(
        "transfer",
        TRANSFER_SELECTOR,
        vec![ParamSpec::new("to", "address"), ParamSpec::new("value", "uint256")],
        vec![ParamSpec::new("", "bool")],
        Mutability::NonPayable,
    )
}

/// Whether `transfer(address,uint256)` is among `available`
pub fn is_transfer_supported<S: AsRef<str>>(available: &[S]) -> bool {
    transfer().is_supported(available)
}

/// Prepare a token transfer
pub fn prepare_transfer(
    contract: ContractRef,
    to: Address,
    amount: U256,
    overrides: Overrides,
) -> PreparedCall {
    prepare_call(
        contract,
        transfer(),
        vec![Token::Address(to), Token::Uint(amount)],
        overrides,
    )
}

/// ERC-20 `approve(address,uint256)`
pub fn approve() -> MethodDescriptor {
    MethodDescriptor::new(
        "approve",
        APPROVE_SELECTOR,
        vec![ParamSpec::new("spender", "address"), ParamSpec::new("value", "uint256")],
        vec![ParamSpec::new("", "bool")],
        Mutability::NonPayable,
    )
}

/// Whether `approve(address,uint256)` is among `available`
pub fn is_approve_supported<S: AsRef<str>>(available: &[S]) -> bool {
    approve().is_supported(available)
}

/// Prepare an allowance grant
pub fn prepare_approve(
    contract: ContractRef,
    spender: Address,
    amount: U256,
    overrides: Overrides,
) -> PreparedCall {
    prepare_call(
        contract,
        approve(),
        vec![Token::Address(spender), Token::Uint(amount)],
        overrides,
    )
}

/// ERC-20 `allowance(address,address)`
pub fn allowance() -> MethodDescriptor {
    MethodDescriptor::new(
        "allowance",
        ALLOWANCE_SELECTOR,
        vec![ParamSpec::new("owner", "address"), ParamSpec::new("spender", "address")],
        vec![ParamSpec::new("", "uint256")],
        Mutability::View,
    )
}

/// Whether `allowance(address,address)` is among `available`
pub fn is_allowance_supported<S: AsRef<str>>(available: &[S]) -> bool {
    allowance().is_supported(available)
}

/// Read how much `spender` may move on behalf of `owner`
pub async fn read_allowance(
    client: &RpcClient,
    contract: ContractRef,
    owner: Address,
    spender: Address,
) -> Result<U256, SdkError> {
    let params = vec![Token::Address(owner), Token::Address(spender)];
    let token = read_call(client, contract, &allowance(), params).await?;
    uint_output(&token)
}

// ==================== ERC-721 ====================

/// ERC-721 `ownerOf(uint256)`
pub fn owner_of() -> MethodDescriptor {
    MethodDescriptor::new(
        "ownerOf",
        OWNER_OF_SELECTOR,
        vec![ParamSpec::new("tokenId", "uint256")],
        vec![ParamSpec::new("", "address")],
        Mutability::View,
    )
}

/// Whether `ownerOf(uint256)` is among `available`
pub fn is_owner_of_supported<S: AsRef<str>>(available: &[S]) -> bool {
    owner_of().is_supported(available)
}

/// Read the owner of an NFT
pub async fn read_owner_of(
    client: &RpcClient,
    contract: ContractRef,
    token_id: U256,
) -> Result<Address, SdkError> {
    let token = read_call(client, contract, &owner_of(), vec![Token::Uint(token_id)]).await?;
    token
        .as_address()
        .ok_or_else(|| SdkError::InvalidResponse(format!("expected address, got {}", token.kind())))
}

// ==================== Signature mint ====================

/// Signed mint request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintRequest {
    /// Recipient
    pub to: Address,
    /// Royalty recipient
    pub royalty_recipient: Address,
    /// Royalty in basis points
    pub royalty_bps: U256,
    /// Primary sale recipient
    pub primary_sale_recipient: Address,
    /// Metadata URI
    pub uri: String,
    /// Price per token
    pub price: U256,
    /// Payment currency
    pub currency: Address,
    /// Request valid from (unix seconds)
    pub validity_start_timestamp: u128,
    /// Request valid until (unix seconds)
    pub validity_end_timestamp: u128,
    /// Unique request id
    pub uid: H256,
}

impl MintRequest {
    /// Tuple token in component order
    pub fn to_token(&self) -> Token {
        Token::Tuple(vec![
            Token::Address(self.to),
            Token::Address(self.royalty_recipient),
            Token::Uint(self.royalty_bps),
            Token::Address(self.primary_sale_recipient),
            Token::String(self.uri.clone()),
            Token::Uint(self.price),
            Token::Address(self.currency),
            Token::uint(self.validity_start_timestamp),
            Token::uint(self.validity_end_timestamp),
            Token::bytes32(self.uid),
        ])
    }
}

fn mint_request_components() -> Vec<ParamSpec> {
    vec![
        ParamSpec::new("to", "address"),
        ParamSpec::new("royaltyRecipient", "address"),
        ParamSpec::new("royaltyBps", "uint256"),
        ParamSpec::new("primarySaleRecipient", "address"),
        ParamSpec::new("uri", "string"),
        ParamSpec::new("price", "uint256"),
        ParamSpec::new("currency", "address"),
        ParamSpec::new("validityStartTimestamp", "uint128"),
        ParamSpec::new("validityEndTimestamp", "uint128"),
        ParamSpec::new("uid", "bytes32"),
    ]
}

/// `mintWithSignature(MintRequest, bytes)`
pub fn mint_with_signature() -> MethodDescriptor {
    MethodDescriptor::new(
        "mintWithSignature",
        MINT_WITH_SIGNATURE_SELECTOR,
        vec![
            ParamSpec::tuple("req", "tuple", mint_request_components()),
            ParamSpec::new("signature", "bytes"),
        ],
        vec![ParamSpec::new("tokenIdMinted", "uint256")],
        Mutability::Payable,
    )
}

/// Whether `mintWithSignature` is among `available`
pub fn is_mint_with_signature_supported<S: AsRef<str>>(available: &[S]) -> bool {
    mint_with_signature().is_supported(available)
}

/// Prepare a signature mint
///
/// The request and signature usually depend on other async work (uploading
/// metadata, asking a signer), so they come from a producer that runs once.
pub fn prepare_mint_with_signature<F, Fut>(
    contract: ContractRef,
    producer: F,
    overrides: Overrides,
) -> PreparedCall
where
    F: FnOnce() -> Fut + Send + 'static,
    Fut: std::future::Future<Output = Result<(MintRequest, Vec<u8>), SdkError>> + Send + 'static,
{
    let params = Params::deferred(move || async move {
        let (request, signature) = producer().await?;
        Ok::<_, SdkError>(vec![request.to_token(), Token::Bytes(signature)])
    });
    prepare_call(contract, mint_with_signature(), params, overrides)
}

/// All descriptors in this module
pub fn all() -> Vec<MethodDescriptor> {
    vec![
        decimals(),
        balance_of(),
        transfer(),
        approve(),
        allowance(),
        owner_of(),
        mint_with_signature(),
    ]
}

/// Look up a descriptor by method name
pub fn by_name(name: &str) -> Option<MethodDescriptor> {
    all().into_iter().find(|m| m.name == name)
}

fn uint_output(token: &Token) -> Result<U256, SdkError> {
    token
        .as_uint()
        .ok_or_else(|| SdkError::InvalidResponse(format!("expected uint, got {}", token.kind())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_selectors_match_signatures() {
        for method in all() {
            assert_eq!(
                method.computed_selector().unwrap(),
                method.selector,
                "{}",
                method.canonical_signature().unwrap()
            );
        }
    }

    #[test]
    fn test_probes() {
        let available = ["0x70a08231", "0xa9059cbb"];
        assert!(is_balance_of_supported(&available));
        assert!(is_transfer_supported(&available));
        assert!(!is_approve_supported(&available));
        assert!(!is_owner_of_supported(&available));
        assert!(!is_mint_with_signature_supported(&available));
        assert!(is_mint_with_signature_supported(&["0x2c4510f8"]));
    }

    #[test]
    fn test_by_name() {
        assert_eq!(by_name("ownerOf").unwrap().selector, OWNER_OF_SELECTOR);
        assert!(by_name("burn").is_none());
    }

    #[tokio::test]
    async fn test_prepare_transfer_encodes() {
        let contract = ContractRef::new(Address::ZERO, 1);
        let call = prepare_transfer(contract, Address::ZERO, U256::from(1000), Overrides::new());
        let data = call.encode().await.unwrap();
        assert_eq!(&data[..4], &TRANSFER_SELECTOR);
        assert_eq!(data.len(), 68);
        assert_eq!(data[67], 0xe8);
        assert_eq!(data[66], 0x03);
    }

    #[tokio::test]
    async fn test_prepare_mint_with_signature_encodes_tuple() {
        let contract = ContractRef::new(Address::ZERO, 1);
        let call = prepare_mint_with_signature(
            contract,
            || async {
                let request = MintRequest {
                    to: Address::from_bytes([1; 20]),
                    royalty_recipient: Address::ZERO,
                    royalty_bps: U256::zero(),
                    primary_sale_recipient: Address::ZERO,
                    uri: "ipfs://meta".into(),
                    price: U256::zero(),
                    currency: Address::ZERO,
                    validity_start_timestamp: 0,
                    validity_end_timestamp: u128::from(u64::MAX),
                    uid: H256::ZERO,
                };
                Ok((request, vec![0xaa; 65]))
            },
            Overrides::new(),
        );
        let data = call.encode().await.unwrap();
        assert_eq!(&data[..4], &MINT_WITH_SIGNATURE_SELECTOR);
        // Both params are dynamic: two offsets in the head
        assert_eq!(data[4 + 31], 0x40);
    }
}
