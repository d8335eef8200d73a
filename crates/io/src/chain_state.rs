// Recorded chain state
//
// {
//   "<chain>": {
//     "<address>": {
//       "selectors": ["name", "lp_token"],                 // optional
//       "calls":     { "symbol": "BAL", "getPoolTokens(0x..)": [[...], [...], 0] },
//       "inputs":    { "<calldata>": { "function": "killGauge()", "inputs": [] } }
//     }
//   }
// }
//
// Without "selectors" a contract exposes the method names it has calls for.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use payload_recon::{ChainState, DecodedCall};

use crate::error::LoadError;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ContractRecord {
    selectors: Option<Vec<String>>,
    calls: HashMap<String, Value>,
    inputs: HashMap<String, DecodedCall>,
}

/// File-backed [`ChainState`]. Addresses are matched case-insensitively.
#[derive(Debug, Default)]
pub struct JsonChainState {
    chains: HashMap<String, HashMap<String, ContractRecord>>,
}

impl JsonChainState {
    pub fn from_json(contents: &str) -> Result<Self, serde_json::Error> {
        let raw: HashMap<String, HashMap<String, ContractRecord>> = serde_json::from_str(contents)?;
        let chains = raw
            .into_iter()
            .map(|(chain, contracts)| {
                let contracts = contracts
                    .into_iter()
                    .map(|(address, record)| (address.to_ascii_lowercase(), record))
                    .collect();
                (chain, contracts)
            })
            .collect();
        Ok(Self { chains })
    }

    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let contents = fs::read_to_string(path).map_err(|source| LoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&contents).map_err(|source| LoadError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load, or start empty when the file does not exist.
    pub fn load_or_empty(path: &Path) -> Result<Self, LoadError> {
        if !path.exists() {
            log::warn!("chain state {} not found; contract lookups will not resolve", path.display());
            return Ok(Self::default());
        }
        Self::load(path)
    }

    fn record(&self, chain: &str, address: &str) -> Option<&ContractRecord> {
        self.chains.get(chain)?.get(&address.to_ascii_lowercase())
    }
}

fn call_key(method: &str, args: &[String]) -> String {
    if args.is_empty() {
        method.to_string()
    } else {
        format!("{method}({})", args.join(","))
    }
}

impl ChainState for JsonChainState {
    fn selectors(&self, chain: &str, address: &str) -> Vec<String> {
        let Some(record) = self.record(chain, address) else {
            return Vec::new();
        };
        if let Some(selectors) = &record.selectors {
            return selectors.clone();
        }
        let mut names: Vec<String> = record
            .calls
            .keys()
            .map(|key| key.split('(').next().unwrap_or(key).to_string())
            .collect();
        names.sort();
        names.dedup();
        names
    }

    fn call(&self, chain: &str, address: &str, method: &str, args: &[String]) -> Option<Value> {
        let value = self.record(chain, address)?.calls.get(&call_key(method, args)).cloned();
        if value.is_none() {
            log::trace!("{chain}: no recorded {method} on {address}");
        }
        value
    }

    fn decode_input(&self, chain: &str, address: &str, data: &str) -> Option<DecodedCall> {
        let record = self.record(chain, address)?;
        record
            .inputs
            .get(data)
            .or_else(|| record.inputs.get(&data.to_ascii_lowercase()))
            .cloned()
    }
}
