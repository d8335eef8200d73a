//! In-memory lookups for unit tests.

use std::collections::HashMap;

use serde_json::{json, Value};

use payload_core::{Batch, ChainId, Transaction};

use crate::classifiers::{AA_ENTRYPOINT_PATH, AUTHORIZER_PATH, GAUGE_ADDER_PATH, VAULT_PATH};
use crate::lookup::{AddressBook, ChainState, DecodedCall, Permissions};

pub(crate) const GAUGE_ADDER: &str = "0x5DbAd78818D4c8958EfF2d5b95b28385A22113Cd";
pub(crate) const AA_ENTRYPOINT: &str = "0xf5dECDB1f3d1ee384908Fbe16D2F0348AE43a9eA";
pub(crate) const AUTHORIZER: &str = "0xA331D84eC860Bf466b4CdCcFb4aC09a1B43F3aE6";
pub(crate) const VAULT: &str = "0xBA12222222228d8Ba445958a75a0704d566BF2C8";
pub(crate) const DAO_MULTISIG: &str = "0x10A19e7eE7d7F8a52822f6817de8ea18204F2e4f";
pub(crate) const BAL: &str = "0xba100000625a3754423978a60c9317c58a424e3D";
pub(crate) const WETH: &str = "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2";

pub(crate) const MAINNET_GAUGE: &str = "0x1111111111111111111111111111111111111111";
pub(crate) const MAINNET_POOL: &str = "0x2222222222222222222222222222222222222222";
pub(crate) const ARB_ROOT_GAUGE: &str = "0x3333333333333333333333333333333333333333";
pub(crate) const ARB_RECIPIENT: &str = "0x4444444444444444444444444444444444444444";
pub(crate) const ARB_POOL: &str = "0x5555555555555555555555555555555555555555";

pub(crate) const POOL_ID: &str = "0x2222222222222222222222222222222222222222000200000000000000000001";
pub(crate) const KILL_DATA: &str = "0xab8f0945";
pub(crate) const ACTION_ID: &str = "0x1282ab709b2b70070f829c46bc36f76b32ad4989fecb2fcb09a1b3ce00bbfc30";

// ---------------------------------------------------------------------------
// Address book
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub(crate) struct MemoryBook {
    chains: Vec<(String, u64)>,
    entries: Vec<(String, String, String)>,
    permissions: Vec<(String, String, Vec<String>)>,
}

impl MemoryBook {
    pub fn chain(mut self, name: &str, id: u64) -> Self {
        self.chains.push((name.into(), id));
        self
    }

    pub fn entry(mut self, chain: &str, path: &str, address: &str) -> Self {
        self.entries.push((chain.into(), path.into(), address.into()));
        self
    }

    pub fn permission(mut self, chain: &str, action_id: &str, paths: &[&str]) -> Self {
        self.permissions.push((
            chain.into(),
            action_id.into(),
            paths.iter().map(|p| p.to_string()).collect(),
        ));
        self
    }
}

impl AddressBook for MemoryBook {
    fn chain_name(&self, chain_id: ChainId) -> Option<String> {
        self.chains.iter().find(|(_, id)| *id == chain_id.0).map(|(n, _)| n.clone())
    }

    fn reverse(&self, chain: &str, address: &str) -> Option<String> {
        self.entries
            .iter()
            .find(|(c, _, a)| c == chain && a.eq_ignore_ascii_case(address))
            .map(|(_, p, _)| p.clone())
    }

    fn search_unique(&self, chain: &str, path: &str) -> Option<String> {
        let mut hits = self.entries.iter().filter(|(c, p, _)| c == chain && p.contains(path));
        let first = hits.next()?;
        if hits.next().is_some() {
            return None;
        }
        Some(first.2.clone())
    }
}

impl Permissions for MemoryBook {
    fn action_paths(&self, chain: &str, action_id: &str) -> Option<Vec<String>> {
        self.permissions
            .iter()
            .find(|(c, id, _)| c == chain && id == action_id)
            .map(|(_, _, paths)| paths.clone())
    }
}

// ---------------------------------------------------------------------------
// Chain state
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct Contract {
    selectors: Option<Vec<String>>,
    calls: HashMap<String, Value>,
    inputs: HashMap<String, DecodedCall>,
}

#[derive(Debug, Default)]
pub(crate) struct MemoryState {
    contracts: HashMap<(String, String), Contract>,
}

impl MemoryState {
    fn contract(&mut self, chain: &str, address: &str) -> &mut Contract {
        self.contracts
            .entry((chain.to_string(), address.to_ascii_lowercase()))
            .or_default()
    }

    pub fn call(mut self, chain: &str, address: &str, method: &str, value: Value) -> Self {
        self.contract(chain, address).calls.insert(method.to_string(), value);
        self
    }

    pub fn call_args(mut self, chain: &str, address: &str, method: &str, args: &[&str], value: Value) -> Self {
        let key = format!("{method}({})", args.join(","));
        self.contract(chain, address).calls.insert(key, value);
        self
    }

    pub fn selectors(mut self, chain: &str, address: &str, selectors: &[&str]) -> Self {
        self.contract(chain, address).selectors = Some(selectors.iter().map(|s| s.to_string()).collect());
        self
    }

    pub fn decoded(mut self, chain: &str, address: &str, data: &str, function: &str) -> Self {
        self.contract(chain, address).inputs.insert(
            data.to_string(),
            DecodedCall {
                function: function.to_string(),
                inputs: Vec::new(),
            },
        );
        self
    }

    fn get(&self, chain: &str, address: &str) -> Option<&Contract> {
        self.contracts.get(&(chain.to_string(), address.to_ascii_lowercase()))
    }
}

impl ChainState for MemoryState {
    fn selectors(&self, chain: &str, address: &str) -> Vec<String> {
        let Some(contract) = self.get(chain, address) else {
            return Vec::new();
        };
        match &contract.selectors {
            Some(selectors) => selectors.clone(),
            None => contract
                .calls
                .keys()
                .map(|k| k.split('(').next().unwrap_or(k).to_string())
                .collect(),
        }
    }

    fn call(&self, chain: &str, address: &str, method: &str, args: &[String]) -> Option<Value> {
        let key = if args.is_empty() {
            method.to_string()
        } else {
            format!("{method}({})", args.join(","))
        };
        self.get(chain, address)?.calls.get(&key).cloned()
    }

    fn decode_input(&self, chain: &str, address: &str, data: &str) -> Option<DecodedCall> {
        self.get(chain, address)?.inputs.get(data).cloned()
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub(crate) fn gauge_world_book() -> MemoryBook {
    MemoryBook::default()
        .chain("mainnet", 1)
        .chain("polygon", 137)
        .chain("arbitrum", 42161)
        .entry("mainnet", GAUGE_ADDER_PATH, GAUGE_ADDER)
        .entry("mainnet", AA_ENTRYPOINT_PATH, AA_ENTRYPOINT)
        .entry("mainnet", AUTHORIZER_PATH, AUTHORIZER)
        .entry("mainnet", VAULT_PATH, VAULT)
        .entry("mainnet", "multisigs/dao", DAO_MULTISIG)
        .entry("mainnet", "tokens/BAL", BAL)
        .permission("mainnet", ACTION_ID, &["20210418-vault/Vault/setRelayerApproval(address,address,bool)"])
}

pub(crate) fn gauge_world_state() -> MemoryState {
    MemoryState::default()
        // mainnet gauge -> 80/20 pool
        .selectors("mainnet", MAINNET_GAUGE, &["name", "lp_token", "getRelativeWeightCap"])
        .call("mainnet", MAINNET_GAUGE, "lp_token", json!(MAINNET_POOL))
        .call("mainnet", MAINNET_GAUGE, "getRelativeWeightCap", json!("20000000000000000"))
        .call("mainnet", MAINNET_POOL, "name", json!("Balancer 80BAL-20WETH"))
        .call("mainnet", MAINNET_POOL, "symbol", json!("B-80BAL-20WETH"))
        .call("mainnet", MAINNET_POOL, "getPoolId", json!(POOL_ID))
        .call("mainnet", MAINNET_POOL, "getSwapFeePercentage", json!("3000000000000000"))
        .call("mainnet", MAINNET_POOL, "getAmplificationParameter", json!(["200000", false, "1000"]))
        .call(
            "mainnet",
            MAINNET_POOL,
            "getRateProviders",
            json!([
                "0x0000000000000000000000000000000000000000",
                "0x0000000000000000000000000000000000000000"
            ]),
        )
        .call("mainnet", MAINNET_POOL, "totalSupply", json!("1000000"))
        .call_args("mainnet", VAULT, "getPoolTokens", &[POOL_ID], json!([[BAL, WETH], ["1", "1"], 0]))
        .call("mainnet", BAL, "symbol", json!("BAL"))
        .call("mainnet", BAL, "decimals", json!(18))
        .call("mainnet", WETH, "symbol", json!("WETH"))
        .decoded("mainnet", MAINNET_GAUGE, KILL_DATA, "killGauge()")
        // arbitrum root gauge -> L0 recipient -> uninitialized pool
        .selectors("mainnet", ARB_ROOT_GAUGE, &["getRecipient", "getTotalBridgeCost", "getRelativeWeightCap"])
        .call("mainnet", ARB_ROOT_GAUGE, "getRecipient", json!(ARB_RECIPIENT))
        .call("mainnet", ARB_ROOT_GAUGE, "getRelativeWeightCap", json!("100000000000000000"))
        .decoded("mainnet", ARB_ROOT_GAUGE, KILL_DATA, "killGauge()")
        .call("arbitrum", ARB_RECIPIENT, "lp_token", json!(ARB_POOL))
        .call("arbitrum", ARB_POOL, "name", json!("Arbitrum Pool"))
        .call("arbitrum", ARB_POOL, "symbol", json!("ARB-POOL"))
        .call("arbitrum", ARB_POOL, "totalSupply", json!(0))
}

pub(crate) fn gauge_world() -> (MemoryBook, MemoryState) {
    (gauge_world_book(), gauge_world_state())
}

pub(crate) fn tx(value: Value) -> Transaction {
    serde_json::from_value(value).unwrap()
}

pub(crate) fn batch(file_name: &str, chain_id: u64, transactions: Vec<Transaction>) -> Batch {
    Batch::new(file_name, ChainId(chain_id), transactions)
}

pub(crate) fn add_gauge_tx(gauge: &str, gauge_type: &str) -> Transaction {
    tx(json!({
        "to": GAUGE_ADDER,
        "value": "0",
        "contractMethod": {"name": "addGauge"},
        "contractInputsValues": {"gauge": gauge, "gaugeType": gauge_type},
    }))
}

pub(crate) fn kill_gauge_tx(gauge: &str) -> Transaction {
    tx(json!({
        "to": AA_ENTRYPOINT,
        "value": "0",
        "contractMethod": {"name": "performAction"},
        "contractInputsValues": {"target": gauge, "data": KILL_DATA},
    }))
}

pub(crate) fn transfer_tx(token: &str, recipient: &str, amount: &str) -> Transaction {
    tx(json!({
        "to": token,
        "value": "0",
        "contractMethod": {"name": "transfer"},
        "contractInputsValues": {"to": recipient, "amount": amount},
    }))
}

pub(crate) fn grant_role_tx(roles: &str, account: &str) -> Transaction {
    tx(json!({
        "to": AUTHORIZER,
        "value": "0",
        "contractMethod": {"name": "grantRoles"},
        "contractInputsValues": {"roles": roles, "account": account},
    }))
}
