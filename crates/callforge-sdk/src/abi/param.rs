//! Named parameter descriptors in ABI JSON form

use serde::{Deserialize, Serialize};

use super::error::AbiError;
use super::parse::{apply_array_suffixes, parse_type};
use super::types::ParamType;

/// A named ABI parameter: `{"name": .., "type": .., "components": [..]}`
///
/// Tuple-typed parameters (`tuple`, `tuple[]`, `tuple[2][]`, ...) carry their
/// members in `components`; every other type has none.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParamSpec {
    /// Parameter name, empty when unnamed
    #[serde(default)]
    pub name: String,
    /// Type name
    #[serde(rename = "type")]
    pub ty: String,
    /// Tuple members
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<ParamSpec>,
}

impl ParamSpec {
    /// Parameter of a non-tuple type
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            components: Vec::new(),
        }
    }

    /// Tuple-typed parameter; `ty` is `tuple` optionally followed by array suffixes
    pub fn tuple(name: impl Into<String>, ty: impl Into<String>, components: Vec<ParamSpec>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            components,
        }
    }

    /// Whether the type is a tuple or an array of tuples
    pub fn is_tuple(&self) -> bool {
        self.ty.starts_with("tuple")
    }

    /// Resolve the descriptor into a `ParamType`
    ///
    /// Fails when a tuple type has no components or a non-tuple type has some.
    pub fn param_type(&self) -> Result<ParamType, AbiError> {
        if let Some(suffix) = self.ty.strip_prefix("tuple") {
            if self.components.is_empty() {
                return Err(AbiError::InvalidType(format!(
                    "{}: tuple without components",
                    self.ty
                )));
            }
            let members = self
                .components
                .iter()
                .map(ParamSpec::param_type)
                .collect::<Result<Vec<_>, _>>()?;
            return apply_array_suffixes(suffix, ParamType::Tuple(members));
        }

        if !self.components.is_empty() {
            return Err(AbiError::InvalidType(format!(
                "{}: components on a non-tuple type",
                self.ty
            )));
        }
        parse_type(&self.ty)
    }

    /// Element descriptor of an array parameter (last suffix removed)
    pub fn element(&self) -> Option<ParamSpec> {
        let base = self.ty.strip_suffix(']')?;
        let open = base.rfind('[')?;
        Some(Self {
            name: self.name.clone(),
            ty: base[..open].to_string(),
            components: self.components.clone(),
        })
    }

    /// Build an unnamed descriptor from a `ParamType`
    pub fn from_param_type(param_type: &ParamType) -> Self {
        match param_type {
            ParamType::Tuple(members) => Self::tuple(
                "",
                "tuple",
                members.iter().map(Self::from_param_type).collect(),
            ),
            ParamType::Array(inner) => {
                let mut spec = Self::from_param_type(inner);
                spec.ty.push_str("[]");
                spec
            }
            ParamType::FixedArray(inner, size) => {
                let mut spec = Self::from_param_type(inner);
                spec.ty.push_str(&format!("[{}]", size));
                spec
            }
            other => Self::new("", other.to_string()),
        }
    }
}

/// Resolve a list of descriptors
pub fn param_types(specs: &[ParamSpec]) -> Result<Vec<ParamType>, AbiError> {
    specs.iter().map(ParamSpec::param_type).collect()
}
