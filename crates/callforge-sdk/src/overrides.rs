//! Transaction overrides as named, independently lazy resolvers

use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use callforge_primitives::U256;
use futures_util::future::{try_join_all, BoxFuture};
use futures_util::FutureExt;

use crate::types::{AccessListItem, Authorization, Erc20Value};
use crate::SdkError;

/// Name of an override field
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OverrideKey {
    /// Native value sent with the call
    Value,
    /// Gas limit
    Gas,
    /// Legacy gas price
    GasPrice,
    /// EIP-1559 fee cap
    MaxFeePerGas,
    /// EIP-1559 tip
    MaxPriorityFeePerGas,
    /// Sender nonce
    Nonce,
    /// Access list
    AccessList,
    /// EIP-7702 authorizations
    AuthorizationList,
    /// Gas added on top of the limit or the estimate
    ExtraGas,
    /// ERC-20 amount paid alongside the call
    Erc20Value,
}

/// A resolved override
#[derive(Debug, Clone, PartialEq)]
pub enum OverrideValue {
    /// Native value
    Value(U256),
    /// Gas limit
    Gas(u64),
    /// Legacy gas price
    GasPrice(u128),
    /// EIP-1559 fee cap
    MaxFeePerGas(u128),
    /// EIP-1559 tip
    MaxPriorityFeePerGas(u128),
    /// Sender nonce
    Nonce(u64),
    /// Access list
    AccessList(Vec<AccessListItem>),
    /// EIP-7702 authorizations
    AuthorizationList(Vec<Authorization>),
    /// Extra gas
    ExtraGas(u64),
    /// ERC-20 payment
    Erc20Value(Erc20Value),
}

impl OverrideValue {
    /// The key this value belongs to
    pub fn key(&self) -> OverrideKey {
        match self {
            OverrideValue::Value(_) => OverrideKey::Value,
            OverrideValue::Gas(_) => OverrideKey::Gas,
            OverrideValue::GasPrice(_) => OverrideKey::GasPrice,
            OverrideValue::MaxFeePerGas(_) => OverrideKey::MaxFeePerGas,
            OverrideValue::MaxPriorityFeePerGas(_) => OverrideKey::MaxPriorityFeePerGas,
            OverrideValue::Nonce(_) => OverrideKey::Nonce,
            OverrideValue::AccessList(_) => OverrideKey::AccessList,
            OverrideValue::AuthorizationList(_) => OverrideKey::AuthorizationList,
            OverrideValue::ExtraGas(_) => OverrideKey::ExtraGas,
            OverrideValue::Erc20Value(_) => OverrideKey::Erc20Value,
        }
    }
}

type Resolver = Arc<dyn Fn() -> BoxFuture<'static, Result<OverrideValue, SdkError>> + Send + Sync>;

/// Optional overrides, each a nullary resolver
///
/// Resolvers run only when their key is asked for and are not cached:
/// every access invokes the resolver again.
#[derive(Clone, Default)]
pub struct Overrides {
    entries: BTreeMap<OverrideKey, Resolver>,
}

/// Every present override, resolved
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedOverrides {
    /// Native value
    pub value: Option<U256>,
    /// Gas limit
    pub gas: Option<u64>,
    /// Legacy gas price
    pub gas_price: Option<u128>,
    /// EIP-1559 fee cap
    pub max_fee_per_gas: Option<u128>,
    /// EIP-1559 tip
    pub max_priority_fee_per_gas: Option<u128>,
    /// Sender nonce
    pub nonce: Option<u64>,
    /// Access list
    pub access_list: Option<Vec<AccessListItem>>,
    /// EIP-7702 authorizations
    pub authorization_list: Option<Vec<Authorization>>,
    /// Extra gas
    pub extra_gas: Option<u64>,
    /// ERC-20 payment
    pub erc20_value: Option<Erc20Value>,
}

impl ResolvedOverrides {
    fn apply(&mut self, value: OverrideValue) {
        match value {
            OverrideValue::Value(v) => self.value = Some(v),
            OverrideValue::Gas(v) => self.gas = Some(v),
            OverrideValue::GasPrice(v) => self.gas_price = Some(v),
            OverrideValue::MaxFeePerGas(v) => self.max_fee_per_gas = Some(v),
            OverrideValue::MaxPriorityFeePerGas(v) => self.max_priority_fee_per_gas = Some(v),
            OverrideValue::Nonce(v) => self.nonce = Some(v),
            OverrideValue::AccessList(v) => self.access_list = Some(v),
            OverrideValue::AuthorizationList(v) => self.authorization_list = Some(v),
            OverrideValue::ExtraGas(v) => self.extra_gas = Some(v),
            OverrideValue::Erc20Value(v) => self.erc20_value = Some(v),
        }
    }

    /// Gas limit with extra gas added, if a limit is set
    pub fn total_gas(&self) -> Option<u64> {
        self.gas
            .map(|gas| gas.saturating_add(self.extra_gas.unwrap_or(0)))
    }
}

impl Overrides {
    /// No overrides
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a ready value
    pub fn with(mut self, value: OverrideValue) -> Self {
        let key = value.key();
        let resolver: Resolver = Arc::new(move || {
            let value = value.clone();
            async move { Ok::<_, SdkError>(value) }.boxed()
        });
        self.entries.insert(key, resolver);
        self
    }

    /// Whether a key is present
    pub fn contains(&self, key: OverrideKey) -> bool {
        self.entries.contains_key(&key)
    }

    /// Present keys in order
    pub fn keys(&self) -> impl Iterator<Item = OverrideKey> + '_ {
        self.entries.keys().copied()
    }

    /// Whether no override is present
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve one key; `None` when absent
    pub async fn resolve(&self, key: OverrideKey) -> Result<Option<OverrideValue>, SdkError> {
        match self.entries.get(&key) {
            Some(resolver) => resolver().await.map(Some),
            None => Ok(None),
        }
    }

    /// Resolve every present key concurrently
    pub async fn resolve_all(&self) -> Result<ResolvedOverrides, SdkError> {
        let values = try_join_all(self.entries.values().map(|resolver| resolver())).await?;
        let mut resolved = ResolvedOverrides::default();
        for value in values {
            resolved.apply(value);
        }
        Ok(resolved)
    }

    fn insert_with<T, F, Fut>(mut self, key: OverrideKey, wrap: fn(T) -> OverrideValue, f: F) -> Self
    where
        T: Send + 'static,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, SdkError>> + Send + 'static,
    {
        let resolver: Resolver = Arc::new(move || f().map(move |r| r.map(wrap)).boxed());
        self.entries.insert(key, resolver);
        self
    }
}

macro_rules! override_accessors {
    ($($setter:ident, $setter_with:ident, $getter:ident, $variant:ident, $ty:ty;)*) => {
        impl Overrides {
            $(
                #[doc = concat!("Set `", stringify!($variant), "` to a ready value")]
                pub fn $setter(self, value: $ty) -> Self {
                    self.with(OverrideValue::$variant(value))
                }

                #[doc = concat!("Set `", stringify!($variant), "` to an async resolver")]
                pub fn $setter_with<F, Fut>(self, f: F) -> Self
                where
                    F: Fn() -> Fut + Send + Sync + 'static,
                    Fut: Future<Output = Result<$ty, SdkError>> + Send + 'static,
                {
                    self.insert_with(OverrideKey::$variant, OverrideValue::$variant, f)
                }

                #[doc = concat!("Resolve `", stringify!($variant), "` only")]
                pub async fn $getter(&self) -> Result<Option<$ty>, SdkError> {
                    match self.resolve(OverrideKey::$variant).await? {
                        Some(OverrideValue::$variant(value)) => Ok(Some(value)),
                        Some(other) => Err(SdkError::Params(format!(
                            "override {:?} resolved to {:?}",
                            OverrideKey::$variant,
                            other.key()
                        ))),
                        None => Ok(None),
                    }
                }
            )*
        }
    };
}

override_accessors! {
    value, value_with, resolve_value, Value, U256;
    gas, gas_with, resolve_gas, Gas, u64;
    gas_price, gas_price_with, resolve_gas_price, GasPrice, u128;
    max_fee_per_gas, max_fee_per_gas_with, resolve_max_fee_per_gas, MaxFeePerGas, u128;
    max_priority_fee_per_gas, max_priority_fee_per_gas_with, resolve_max_priority_fee_per_gas, MaxPriorityFeePerGas, u128;
    nonce, nonce_with, resolve_nonce, Nonce, u64;
    access_list, access_list_with, resolve_access_list, AccessList, Vec<AccessListItem>;
    authorization_list, authorization_list_with, resolve_authorization_list, AuthorizationList, Vec<Authorization>;
    extra_gas, extra_gas_with, resolve_extra_gas, ExtraGas, u64;
    erc20_value, erc20_value_with, resolve_erc20_value, Erc20Value, Erc20Value;
}

impl fmt::Debug for Overrides {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.entries.keys()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_empty_overrides() {
        let overrides = Overrides::new();
        assert!(overrides.is_empty());
        assert_eq!(overrides.resolve_gas().await.unwrap(), None);
        assert_eq!(overrides.resolve_all().await.unwrap(), ResolvedOverrides::default());
    }

    #[tokio::test]
    async fn test_ready_values() {
        let overrides = Overrides::new().value(U256::from(5)).gas(100_000).nonce(7);
        assert_eq!(overrides.resolve_value().await.unwrap(), Some(U256::from(5)));
        assert_eq!(overrides.resolve_nonce().await.unwrap(), Some(7));
        assert_eq!(
            overrides.keys().collect::<Vec<_>>(),
            vec![OverrideKey::Value, OverrideKey::Gas, OverrideKey::Nonce]
        );
    }

    #[tokio::test]
    async fn test_only_requested_key_resolves() {
        let gas_calls = Arc::new(AtomicUsize::new(0));
        let counter = gas_calls.clone();
        let overrides = Overrides::new()
            .value(U256::one())
            .gas_with(move || {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok(50_000)
                }
            });

        assert_eq!(overrides.resolve_value().await.unwrap(), Some(U256::one()));
        assert_eq!(gas_calls.load(Ordering::SeqCst), 0);

        assert_eq!(overrides.resolve_gas().await.unwrap(), Some(50_000));
        assert_eq!(overrides.resolve_gas().await.unwrap(), Some(50_000));
        assert_eq!(gas_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_resolve_all() {
        let overrides = Overrides::new()
            .gas(21_000)
            .extra_gas(1_000)
            .max_fee_per_gas_with(|| async { Ok(30) });
        let resolved = overrides.resolve_all().await.unwrap();
        assert_eq!(resolved.gas, Some(21_000));
        assert_eq!(resolved.max_fee_per_gas, Some(30));
        assert_eq!(resolved.total_gas(), Some(22_000));
        assert_eq!(resolved.nonce, None);
    }

    #[tokio::test]
    async fn test_resolver_error_propagates() {
        let overrides = Overrides::new()
            .gas(1)
            .nonce_with(|| async { Err(SdkError::Transport("down".into())) });
        assert_eq!(
            overrides.resolve_all().await,
            Err(SdkError::Transport("down".into()))
        );
        assert_eq!(overrides.resolve_gas().await.unwrap(), Some(1));
    }

    #[test]
    fn test_later_setter_replaces() {
        let overrides = Overrides::new().gas(1).gas(2);
        assert_eq!(overrides.keys().count(), 1);
        assert_eq!(format!("{:?}", overrides), "{Gas}");
    }
}
