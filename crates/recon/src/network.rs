use std::cell::RefCell;

use serde_json::Value;

use crate::lookup::{ChainState, DecodedCall};

/// The single "current chain" every chain-state lookup runs against.
///
/// Lookups only happen through a [`Connection`]. Dropping the connection
/// puts back whatever chain was active before it, so an early return inside
/// a classifier cannot leave the next one pointed at the wrong network.
pub struct Network<'s> {
    state: &'s dyn ChainState,
    active: RefCell<Option<String>>,
}

impl<'s> Network<'s> {
    pub fn new(state: &'s dyn ChainState) -> Self {
        Self {
            state,
            active: RefCell::new(None),
        }
    }

    /// Chain currently connected, if any.
    pub fn active(&self) -> Option<String> {
        self.active.borrow().clone()
    }

    /// Make `chain` the active chain until the returned guard drops.
    pub fn connect(&self, chain: &str) -> Connection<'_> {
        let previous = self.active.replace(Some(chain.to_string()));
        log::trace!("connect {chain} (was {})", previous.as_deref().unwrap_or("none"));
        Connection {
            network: self,
            chain: chain.to_string(),
            previous,
        }
    }
}

impl std::fmt::Debug for Network<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Network").field("active", &self.active()).finish()
    }
}

/// Scoped access to one chain.
#[derive(Debug)]
pub struct Connection<'a> {
    network: &'a Network<'a>,
    chain: String,
    previous: Option<String>,
}

impl Connection<'_> {
    pub fn chain(&self) -> &str {
        &self.chain
    }

    pub fn selectors(&self, address: &str) -> Vec<String> {
        self.network.state.selectors(&self.chain, address)
    }

    pub fn has_selector(&self, address: &str, selector: &str) -> bool {
        self.selectors(address).iter().any(|s| s == selector)
    }

    /// Zero-argument read-only call.
    pub fn call(&self, address: &str, method: &str) -> Option<Value> {
        self.call_with(address, method, &[])
    }

    pub fn call_with(&self, address: &str, method: &str, args: &[String]) -> Option<Value> {
        self.network.state.call(&self.chain, address, method, args)
    }

    pub fn decode_input(&self, address: &str, data: &str) -> Option<DecodedCall> {
        self.network.state.decode_input(&self.chain, address, data)
    }
}

impl Drop for Connection<'_> {
    fn drop(&mut self) {
        self.network.active.replace(self.previous.take());
    }
}
