//! Read-only lookup capabilities the engine consumes.
//!
//! Every method answers `None` (or an empty list) when it cannot resolve; the
//! caller decides whether that is a shape mismatch or a logged skip.

use serde::Deserialize;
use serde_json::Value;

use payload_core::ChainId;

/// Address book: chain names and address <-> path resolution.
pub trait AddressBook {
    fn chain_name(&self, chain_id: ChainId) -> Option<String>;

    /// Path registered for `address` on `chain`. Addresses compare
    /// case-insensitively.
    fn reverse(&self, chain: &str, address: &str) -> Option<String>;

    /// Address of the single entry whose path matches `path`.
    fn search_unique(&self, chain: &str, path: &str) -> Option<String>;
}

/// Authorizer action ids -> permission paths.
pub trait Permissions {
    fn action_paths(&self, chain: &str, action_id: &str) -> Option<Vec<String>>;
}

/// Contract state on a chain.
pub trait ChainState {
    /// Function names the contract at `address` exposes.
    fn selectors(&self, chain: &str, address: &str) -> Vec<String>;

    /// Result of a read-only call.
    fn call(&self, chain: &str, address: &str, method: &str, args: &[String]) -> Option<Value>;

    /// Decode calldata against the contract at `address`.
    fn decode_input(&self, chain: &str, address: &str, data: &str) -> Option<DecodedCall>;
}

/// Calldata decoded against a contract ABI.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DecodedCall {
    /// Full signature, e.g. `killGauge()`.
    pub function: String,
    #[serde(default)]
    pub inputs: Vec<Value>,
}

/// Resolves nothing. Useful for engine runs without any external data.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullLookup;

impl AddressBook for NullLookup {
    fn chain_name(&self, _chain_id: ChainId) -> Option<String> {
        None
    }

    fn reverse(&self, _chain: &str, _address: &str) -> Option<String> {
        None
    }

    fn search_unique(&self, _chain: &str, _path: &str) -> Option<String> {
        None
    }
}

impl Permissions for NullLookup {
    fn action_paths(&self, _chain: &str, _action_id: &str) -> Option<Vec<String>> {
        None
    }
}

impl ChainState for NullLookup {
    fn selectors(&self, _chain: &str, _address: &str) -> Vec<String> {
        Vec::new()
    }

    fn call(&self, _chain: &str, _address: &str, _method: &str, _args: &[String]) -> Option<Value> {
        None
    }

    fn decode_input(&self, _chain: &str, _address: &str, _data: &str) -> Option<DecodedCall> {
        None
    }
}

// ---------------------------------------------------------------------------
// Value helpers
// ---------------------------------------------------------------------------

/// A call result as display text. Strings are unquoted.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// A call result as an unsigned integer. Accepts JSON numbers and decimal
/// strings (large uint256 values are recorded as strings).
pub fn value_u128(value: &Value) -> Option<u128> {
    match value {
        Value::Number(n) => n.as_u64().map(u128::from),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// A call result as a list of display strings.
pub fn value_list(value: &Value) -> Option<Vec<String>> {
    match value {
        Value::Array(items) => Some(items.iter().map(value_text).collect()),
        _ => None,
    }
}

/// `0x` followed by exactly 40 hex digits.
pub fn is_address(value: &str) -> bool {
    value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .is_some_and(|hex| hex.len() == 40 && hex.chars().all(|c| c.is_ascii_hexdigit()))
}
