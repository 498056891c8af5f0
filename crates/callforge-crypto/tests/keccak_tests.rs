//! Keccak-256 and selector test vectors

use callforge_crypto::{keccak256, selector};

#[test]
fn test_keccak256_hello() {
    assert_eq!(
        keccak256(b"hello").to_hex(),
        "0x1c8aff950685c2ed4bc3174f3472287b56d9517b9c948127319a09a7a36deac8"
    );
}

#[test]
fn test_keccak256_quick_brown_fox() {
    assert_eq!(
        keccak256(b"The quick brown fox jumps over the lazy dog").to_hex(),
        "0x4d741b6f1eb29cb2a9b9911c82f56fa8d73b04959d3d9d222895df6c0b28aa15"
    );
}

// ==================== Well-known selectors ====================

#[test]
fn test_erc20_selectors() {
    assert_eq!(selector("balanceOf(address)"), [0x70, 0xa0, 0x82, 0x31]);
    assert_eq!(selector("approve(address,uint256)"), [0x09, 0x5e, 0xa7, 0xb3]);
    assert_eq!(selector("allowance(address,address)"), [0xdd, 0x62, 0xed, 0x3e]);
    assert_eq!(selector("decimals()"), [0x31, 0x3c, 0xe5, 0x67]);
    assert_eq!(selector("totalSupply()"), [0x18, 0x16, 0x0d, 0xdd]);
}

#[test]
fn test_erc721_owner_of_selector() {
    assert_eq!(selector("ownerOf(uint256)"), [0x63, 0x52, 0x21, 0x1e]);
}
