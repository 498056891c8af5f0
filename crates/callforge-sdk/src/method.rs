//! Method descriptors and the selector capability probe

use std::fmt;
use std::hash::{Hash, Hasher};

use callforge_primitives::Selector;
use serde::{Deserialize, Serialize};

use crate::abi::{function_selector, param_types, AbiError, ParamSpec, ParamType};

/// State mutability of a contract method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mutability {
    /// Reads no state
    Pure,
    /// Reads but does not write state
    View,
    /// Writes state, rejects value
    #[default]
    NonPayable,
    /// Writes state, accepts value
    Payable,
}

impl Mutability {
    /// Whether the method can be served by `eth_call` alone
    pub fn is_read_only(&self) -> bool {
        matches!(self, Mutability::Pure | Mutability::View)
    }
}

/// Static description of one contract method
///
/// The selector is fixed at construction. Two descriptors are equal when
/// their selectors are.
#[derive(Debug, Clone)]
pub struct MethodDescriptor {
    /// Method name
    pub name: String,
    /// 4-byte selector
    pub selector: Selector,
    /// Input parameters
    pub inputs: Vec<ParamSpec>,
    /// Output parameters
    pub outputs: Vec<ParamSpec>,
    /// State mutability
    pub mutability: Mutability,
}

impl MethodDescriptor {
    /// Create a descriptor with a literal selector
    pub fn new(
        name: impl Into<String>,
        selector: Selector,
        inputs: Vec<ParamSpec>,
        outputs: Vec<ParamSpec>,
        mutability: Mutability,
    ) -> Self {
        Self {
            name: name.into(),
            selector,
            inputs,
            outputs,
            mutability,
        }
    }

    /// Create a descriptor whose selector is hashed from its signature
    pub fn from_signature(
        name: impl Into<String>,
        inputs: Vec<ParamSpec>,
        outputs: Vec<ParamSpec>,
        mutability: Mutability,
    ) -> Result<Self, AbiError> {
        let mut method = Self::new(name, [0u8; 4], inputs, outputs, mutability);
        method.selector = method.computed_selector()?;
        Ok(method)
    }

    /// Selector as lowercase `0x`-prefixed hex
    pub fn selector_hex(&self) -> String {
        format!("0x{}", hex::encode(self.selector))
    }

    /// Resolved input types
    pub fn input_types(&self) -> Result<Vec<ParamType>, AbiError> {
        param_types(&self.inputs)
    }

    /// Resolved output types
    pub fn output_types(&self) -> Result<Vec<ParamType>, AbiError> {
        param_types(&self.outputs)
    }

    /// `name(type1,type2,...)` with tuples expanded
    pub fn canonical_signature(&self) -> Result<String, AbiError> {
        let types = self
            .input_types()?
            .iter()
            .map(ParamType::to_string)
            .collect::<Vec<_>>();
        Ok(format!("{}({})", self.name, types.join(",")))
    }

    /// Selector hashed from the canonical signature
    pub fn computed_selector(&self) -> Result<Selector, AbiError> {
        Ok(function_selector(&self.canonical_signature()?))
    }

    /// Whether the selector appears in `available` (hex strings, case-insensitive)
    ///
    /// Pure membership test; no I/O.
    pub fn is_supported<S: AsRef<str>>(&self, available: &[S]) -> bool {
        let needle = self.selector_hex();
        available
            .iter()
            .any(|s| s.as_ref().eq_ignore_ascii_case(&needle))
    }

    /// Whether the selector appears in a list of raw selectors
    pub fn supports_any(&self, available: &[Selector]) -> bool {
        available.contains(&self.selector)
    }
}

impl PartialEq for MethodDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.selector == other.selector
    }
}

impl Eq for MethodDescriptor {}

impl Hash for MethodDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.selector.hash(state);
    }
}

impl fmt::Display for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.selector_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transfer() -> MethodDescriptor {
        MethodDescriptor::new(
            "transfer",
            [0xa9, 0x05, 0x9c, 0xbb],
            vec![ParamSpec::new("to", "address"), ParamSpec::new("value", "uint256")],
            vec![ParamSpec::new("", "bool")],
            Mutability::NonPayable,
        )
    }

    #[test]
    fn test_selector_hex() {
        assert_eq!(transfer().selector_hex(), "0xa9059cbb");
    }

    #[test]
    fn test_canonical_signature() {
        assert_eq!(transfer().canonical_signature().unwrap(), "transfer(address,uint256)");
        assert_eq!(transfer().computed_selector().unwrap(), transfer().selector);
    }

    #[test]
    fn test_canonical_signature_tuple() {
        let method = MethodDescriptor::new(
            "submit",
            [0; 4],
            vec![ParamSpec::tuple(
                "orders",
                "tuple[]",
                vec![ParamSpec::new("maker", "address"), ParamSpec::new("amount", "uint256")],
            )],
            vec![],
            Mutability::NonPayable,
        );
        assert_eq!(
            method.canonical_signature().unwrap(),
            "submit((address,uint256)[])"
        );
    }

    #[test]
    fn test_from_signature() {
        let method = MethodDescriptor::from_signature(
            "balanceOf",
            vec![ParamSpec::new("owner", "address")],
            vec![ParamSpec::new("", "uint256")],
            Mutability::View,
        )
        .unwrap();
        assert_eq!(method.selector_hex(), "0x70a08231");
    }

    #[test]
    fn test_is_supported() {
        let method = transfer();
        assert!(method.is_supported(&["0x095ea7b3", "0xa9059cbb"]));
        assert!(method.is_supported(&["0xA9059CBB".to_string()]));
        assert!(!method.is_supported(&["0x095ea7b3"]));
        assert!(!method.is_supported::<&str>(&[]));
    }

    #[test]
    fn test_supports_any() {
        let method = transfer();
        assert!(method.supports_any(&[[0xa9, 0x05, 0x9c, 0xbb]]));
        assert!(!method.supports_any(&[[0, 0, 0, 0]]));
    }

    #[test]
    fn test_identity_is_selector() {
        let mut renamed = transfer();
        renamed.name = "send".into();
        assert_eq!(renamed, transfer());
    }

    #[test]
    fn test_mutability_serde() {
        assert_eq!(serde_json::to_string(&Mutability::NonPayable).unwrap(), "\"nonpayable\"");
        assert!(Mutability::View.is_read_only());
        assert!(!Mutability::Payable.is_read_only());
    }
}
