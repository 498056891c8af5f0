//! Keccak-256 hashing

use callforge_primitives::{Address, Selector, H256};
use sha3::{Digest, Keccak256};

/// Compute Keccak-256 hash of the input data
pub fn keccak256(data: &[u8]) -> H256 {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    H256::from_bytes(hasher.finalize().into())
}

/// First four bytes of the Keccak-256 hash of a canonical function signature
pub fn selector(signature: &str) -> Selector {
    let hash = keccak256(signature.as_bytes());
    let mut out = [0u8; 4];
    out.copy_from_slice(&hash.as_bytes()[..4]);
    out
}

/// EIP-191 personal message hash:
/// `keccak256("\x19Ethereum Signed Message:\n" ++ len ++ message)`
pub fn hash_message(message: &[u8]) -> H256 {
    let mut hasher = Keccak256::new();
    hasher.update(b"\x19Ethereum Signed Message:\n");
    hasher.update(message.len().to_string().as_bytes());
    hasher.update(message);
    H256::from_bytes(hasher.finalize().into())
}

/// EIP-55 mixed-case checksum form of an address
///
/// A letter is uppercased when the matching nibble of
/// `keccak256(lowercase hex)` is 8 or more.
pub fn to_checksum_address(address: &Address) -> String {
    let addr_hex = hex::encode(address.as_bytes());
    let hash = keccak256(addr_hex.as_bytes());

    let mut result = String::with_capacity(42);
    result.push_str("0x");
    for (i, c) in addr_hex.chars().enumerate() {
        let byte = hash.as_bytes()[i / 2];
        let nibble = if i % 2 == 0 { byte >> 4 } else { byte & 0x0f };
        if nibble >= 8 {
            result.push(c.to_ascii_uppercase());
        } else {
            result.push(c);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keccak256_empty() {
        assert_eq!(
            keccak256(&[]).to_hex(),
            "0xc5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn test_selector_transfer() {
        assert_eq!(selector("transfer(address,uint256)"), [0xa9, 0x05, 0x9c, 0xbb]);
    }

    #[test]
    fn test_checksum_address_vectors() {
        for expected in [
            "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
            "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359",
            "0xD1220A0cf47c7B9Be7A2E6BA89F429762e7b9aDb",
        ] {
            let address = Address::from_hex(&expected.to_lowercase()).unwrap();
            assert_eq!(to_checksum_address(&address), expected);
        }
    }

    #[test]
    fn test_checksum_address_digits_only() {
        assert_eq!(
            to_checksum_address(&Address::ZERO),
            "0x0000000000000000000000000000000000000000"
        );
    }

    #[test]
    fn test_hash_message_differs_from_plain_hash() {
        assert_ne!(hash_message(b"hello"), keccak256(b"hello"));
    }
}
