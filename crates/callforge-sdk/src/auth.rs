//! Sign-in payloads and verification for the auth REST surface
//!
//! Only the boundary lives here: the route table, the payload a client
//! signs and the check a server runs. Serving the routes, issuing tokens
//! and cookie handling belong to the embedding application.

use std::sync::atomic::{AtomicU64, Ordering};

use callforge_crypto::{
    hash_message, recover_address, sign, to_checksum_address, PrivateKey, Signature,
};
use callforge_primitives::{Address, ChainId};
use chrono::{DateTime, Duration, SecondsFormat, SubsecRound, Utc};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default validity window of a login payload
pub const DEFAULT_LOGIN_TTL_SECS: i64 = 600;

/// Auth endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthRoute {
    /// Fetch a payload to sign
    Payload,
    /// Exchange a signed payload for a session
    Login,
    /// Check the current session
    IsLoggedIn,
    /// End the session
    Logout,
}

impl AuthRoute {
    /// Every route
    pub const ALL: [AuthRoute; 4] = [
        AuthRoute::Payload,
        AuthRoute::Login,
        AuthRoute::IsLoggedIn,
        AuthRoute::Logout,
    ];

    /// HTTP method
    pub fn method(&self) -> &'static str {
        match self {
            AuthRoute::Payload | AuthRoute::IsLoggedIn => "GET",
            AuthRoute::Login | AuthRoute::Logout => "POST",
        }
    }

    /// Path relative to the auth prefix
    pub fn path(&self) -> &'static str {
        match self {
            AuthRoute::Payload => "/payload",
            AuthRoute::Login => "/login",
            AuthRoute::IsLoggedIn => "/is-logged-in",
            AuthRoute::Logout => "/logout",
        }
    }
}

/// Auth error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Payload is past its expiration time
    #[error("login payload expired at {0}")]
    Expired(String),

    /// Payload is not valid yet
    #[error("login payload not valid before {0}")]
    NotYetValid(String),

    /// Payload was issued for another domain
    #[error("domain mismatch: expected {expected}, got {found}")]
    DomainMismatch {
        /// Domain the server expects
        expected: String,
        /// Domain in the payload
        found: String,
    },

    /// Signature recovers to a different address
    #[error("signature does not match {expected}, recovered {recovered}")]
    SignatureMismatch {
        /// Address in the payload
        expected: Address,
        /// Address recovered from the signature
        recovered: Address,
    },

    /// Signature could not be processed
    #[error("invalid signature: {0}")]
    InvalidSignature(String),
}

/// Per-session state passed explicitly into auth calls
///
/// Nonces are unique within a session; separate sessions never share a counter.
#[derive(Debug)]
pub struct SessionContext {
    id: String,
    counter: AtomicU64,
}

impl SessionContext {
    /// New session with a random id
    pub fn new() -> Self {
        let mut bytes = [0u8; 16];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self::with_id(hex::encode(bytes))
    }

    /// Session with a fixed id
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            counter: AtomicU64::new(0),
        }
    }

    /// Session id
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Next nonce of this session
    pub fn next_nonce(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        format!("{}-{}", self.id, n)
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Payload a wallet signs to log in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginPayload {
    /// Requesting domain
    pub domain: String,
    /// Signing account
    pub address: Address,
    /// Human readable statement
    pub statement: String,
    /// Requesting URI
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    /// Message version
    pub version: String,
    /// Chain the account is on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<ChainId>,
    /// Replay protection
    pub nonce: String,
    /// Issue time
    pub issued_at: DateTime<Utc>,
    /// Expiration time
    pub expiration_time: DateTime<Utc>,
    /// Not valid before
    pub invalid_before: DateTime<Utc>,
    /// Resources the session grants access to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<Vec<String>>,
}

impl LoginPayload {
    /// Payload valid from `now` for `DEFAULT_LOGIN_TTL_SECS`
    pub fn new(
        domain: impl Into<String>,
        address: Address,
        chain_id: Option<ChainId>,
        session: &SessionContext,
        now: DateTime<Utc>,
    ) -> Self {
        let now = now.trunc_subsecs(3);
        Self {
            domain: domain.into(),
            address,
            statement: "Please ensure that the domain above matches the URL of the current website."
                .to_string(),
            uri: None,
            version: "1".to_string(),
            chain_id,
            nonce: session.next_nonce(),
            issued_at: now,
            expiration_time: now + Duration::seconds(DEFAULT_LOGIN_TTL_SECS),
            invalid_before: now,
            resources: None,
        }
    }

    /// Sign-in message text
    pub fn message(&self) -> String {
        let mut message = format!(
            "{} wants you to sign in with your Ethereum account:\n{}\n\n",
            self.domain,
            to_checksum_address(&self.address)
        );
        if !self.statement.is_empty() {
            message.push_str(&self.statement);
            message.push('\n');
        }
        message.push('\n');
        if let Some(uri) = &self.uri {
            message.push_str(&format!("URI: {}\n", uri));
        }
        message.push_str(&format!("Version: {}\n", self.version));
        if let Some(chain_id) = self.chain_id {
            message.push_str(&format!("Chain ID: {}\n", chain_id));
        }
        message.push_str(&format!("Nonce: {}\n", self.nonce));
        message.push_str(&format!("Issued At: {}\n", iso(&self.issued_at)));
        message.push_str(&format!("Expiration Time: {}\n", iso(&self.expiration_time)));
        message.push_str(&format!("Not Before: {}\n", iso(&self.invalid_before)));
        if let Some(resources) = &self.resources {
            message.push_str("Resources:\n");
            for resource in resources {
                message.push_str(&format!("- {}\n", resource));
            }
        }
        message
    }

    /// Sign the message with EIP-191 personal-sign
    pub fn sign(&self, key: &PrivateKey) -> Result<Signature, AuthError> {
        let digest = hash_message(self.message().as_bytes());
        sign(&digest, key).map_err(|e| AuthError::InvalidSignature(e.to_string()))
    }
}

/// Check a signed payload at time `now`
///
/// Verifies the validity window, the domain when one is expected, and that
/// the signature recovers to `payload.address`. Returns the address.
pub fn verify_login(
    payload: &LoginPayload,
    signature: &Signature,
    now: DateTime<Utc>,
    expected_domain: Option<&str>,
) -> Result<Address, AuthError> {
    if let Some(expected) = expected_domain {
        if payload.domain != expected {
            return Err(AuthError::DomainMismatch {
                expected: expected.to_string(),
                found: payload.domain.clone(),
            });
        }
    }
    if now < payload.invalid_before {
        return Err(AuthError::NotYetValid(iso(&payload.invalid_before)));
    }
    if now > payload.expiration_time {
        return Err(AuthError::Expired(iso(&payload.expiration_time)));
    }

    let digest = hash_message(payload.message().as_bytes());
    let recovered = recover_address(&digest, signature)
        .map_err(|e| AuthError::InvalidSignature(e.to_string()))?;
    if recovered != payload.address {
        return Err(AuthError::SignatureMismatch {
            expected: payload.address,
            recovered,
        });
    }
    Ok(recovered)
}

fn iso(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Millis, true)
}
