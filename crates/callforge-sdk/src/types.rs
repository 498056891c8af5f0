//! SDK types

use std::fmt;
use std::str::FromStr;

use bytes::Bytes;
use callforge_primitives::{Address, H256, U256};
use serde::{Deserialize, Serialize};

use crate::SdkError;

/// Block identifier for RPC queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockId {
    /// Block number
    Number(u64),
    /// Latest block
    #[default]
    Latest,
    /// Pending block (includes pending transactions)
    Pending,
    /// Earliest block (genesis)
    Earliest,
    /// Safe block
    Safe,
    /// Finalized block
    Finalized,
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockId::Number(n) => write!(f, "0x{:x}", n),
            BlockId::Latest => f.write_str("latest"),
            BlockId::Pending => f.write_str("pending"),
            BlockId::Earliest => f.write_str("earliest"),
            BlockId::Safe => f.write_str("safe"),
            BlockId::Finalized => f.write_str("finalized"),
        }
    }
}

/// Accepts tags, `0x` hex numbers and decimal numbers
impl FromStr for BlockId {
    type Err = SdkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "latest" => Ok(BlockId::Latest),
            "pending" => Ok(BlockId::Pending),
            "earliest" => Ok(BlockId::Earliest),
            "safe" => Ok(BlockId::Safe),
            "finalized" => Ok(BlockId::Finalized),
            other => {
                let parsed = match other.strip_prefix("0x") {
                    Some(hex) => u64::from_str_radix(hex, 16),
                    None => other.parse(),
                };
                parsed
                    .map(BlockId::Number)
                    .map_err(|_| SdkError::InvalidResponse(format!("invalid block id: {}", other)))
            }
        }
    }
}

impl Serialize for BlockId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for BlockId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// One access list entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessListItem {
    /// Accessed contract
    pub address: Address,
    /// Accessed storage slots
    pub storage_keys: Vec<H256>,
}

/// Signed delegation authorization (EIP-7702)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Authorization {
    /// Chain the authorization is valid on
    pub chain_id: u64,
    /// Delegate contract
    pub address: Address,
    /// Authority nonce
    pub nonce: u64,
    /// Signature parity
    pub y_parity: u8,
    /// Signature r
    pub r: U256,
    /// Signature s
    pub s: U256,
}

impl Serialize for Authorization {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(6))?;
        map.serialize_entry("chainId", &format!("0x{:x}", self.chain_id))?;
        map.serialize_entry("address", &self.address.to_hex())?;
        map.serialize_entry("nonce", &format!("0x{:x}", self.nonce))?;
        map.serialize_entry("yParity", &format!("0x{:x}", self.y_parity))?;
        map.serialize_entry("r", &quantity(&self.r))?;
        map.serialize_entry("s", &quantity(&self.s))?;
        map.end()
    }
}

/// ERC-20 amount a call expects to be approved alongside it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Erc20Value {
    /// Token contract
    pub token_address: Address,
    /// Amount in the token's smallest unit
    pub amount_wei: U256,
}

/// Call request for eth_call and eth_estimateGas
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallRequest {
    /// Sender address
    pub from: Option<Address>,
    /// Recipient address
    pub to: Option<Address>,
    /// Gas limit
    pub gas: Option<u64>,
    /// Gas price (legacy)
    pub gas_price: Option<u128>,
    /// Max fee per gas (EIP-1559)
    pub max_fee_per_gas: Option<u128>,
    /// Max priority fee per gas (EIP-1559)
    pub max_priority_fee_per_gas: Option<u128>,
    /// Value to transfer
    pub value: Option<U256>,
    /// Sender nonce
    pub nonce: Option<u64>,
    /// Input data
    pub data: Option<Bytes>,
    /// Pre-declared storage access
    pub access_list: Option<Vec<AccessListItem>>,
    /// Delegation authorizations
    pub authorization_list: Option<Vec<Authorization>>,
}

impl Serialize for CallRequest {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;

        // None fields are skipped
        let mut map = serializer.serialize_map(None)?;

        if let Some(from) = &self.from {
            map.serialize_entry("from", &from.to_hex())?;
        }
        if let Some(to) = &self.to {
            map.serialize_entry("to", &to.to_hex())?;
        }
        if let Some(gas) = &self.gas {
            map.serialize_entry("gas", &format!("0x{:x}", gas))?;
        }
        if let Some(gas_price) = &self.gas_price {
            map.serialize_entry("gasPrice", &format!("0x{:x}", gas_price))?;
        }
        if let Some(max_fee) = &self.max_fee_per_gas {
            map.serialize_entry("maxFeePerGas", &format!("0x{:x}", max_fee))?;
        }
        if let Some(max_priority) = &self.max_priority_fee_per_gas {
            map.serialize_entry("maxPriorityFeePerGas", &format!("0x{:x}", max_priority))?;
        }
        if let Some(value) = &self.value {
            map.serialize_entry("value", &quantity(value))?;
        }
        if let Some(nonce) = &self.nonce {
            map.serialize_entry("nonce", &format!("0x{:x}", nonce))?;
        }
        if let Some(data) = &self.data {
            map.serialize_entry("data", &format!("0x{}", hex::encode(data)))?;
        }
        if let Some(access_list) = &self.access_list {
            map.serialize_entry("accessList", access_list)?;
        }
        if let Some(authorizations) = &self.authorization_list {
            map.serialize_entry("authorizationList", authorizations)?;
        }

        map.end()
    }
}

/// Minimal `0x` hex quantity
fn quantity(value: &U256) -> String {
    format!("0x{:x}", value)
}
