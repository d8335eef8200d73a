use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::inputs::ContractInputs;
use crate::naming::{bip_from_file_name, NA};

// ---------------------------------------------------------------------------
// Chain id
// ---------------------------------------------------------------------------

/// EVM chain id. Payload files write it either as a number or as a string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ChainId(pub u64);

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for ChainId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Int(u64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Int(id) => Ok(ChainId(id)),
            Raw::Text(text) => text
                .trim()
                .parse()
                .map(ChainId)
                .map_err(|_| serde::de::Error::custom(format!("invalid chain id: {text:?}"))),
        }
    }
}

// ---------------------------------------------------------------------------
// Transaction
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractMethod {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxMeta {
    #[serde(default)]
    pub bip_number: Option<String>,
}

/// One transaction-builder record. Read-only after loading.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde(default)]
    pub to: String,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub contract_method: Option<ContractMethod>,
    #[serde(default, deserialize_with = "lenient_inputs")]
    pub contract_inputs_values: Option<ContractInputs>,
    #[serde(default)]
    pub data: Option<String>,
    #[serde(default)]
    pub meta: Option<TxMeta>,
}

impl Transaction {
    /// `contractMethod.name`, empty when the record has no method.
    pub fn method_name(&self) -> &str {
        self.contract_method.as_ref().map(|m| m.name.as_str()).unwrap_or("")
    }

    pub fn inputs(&self) -> Option<&ContractInputs> {
        self.contract_inputs_values.as_ref()
    }

    /// BIP number recorded in the transaction's own metadata, if any.
    pub fn meta_bip_number(&self) -> Option<&str> {
        self.meta
            .as_ref()
            .and_then(|m| m.bip_number.as_deref())
            .filter(|b| !b.is_empty())
    }
}

fn lenient_inputs<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<ContractInputs>, D::Error> {
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(ContractInputs::from_json))
}

// ---------------------------------------------------------------------------
// Batch
// ---------------------------------------------------------------------------

/// One proposal payload file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Batch {
    /// Repository-relative path; unique key across a run.
    pub file_name: String,
    pub chain_id: ChainId,
    pub transactions: Vec<Transaction>,
    pub forum_link: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BatchPayload {
    chain_id: ChainId,
    transactions: Vec<Transaction>,
    #[serde(default)]
    meta: Option<BatchMeta>,
}

#[derive(Deserialize)]
struct BatchMeta {
    #[serde(default)]
    forum_link: Option<String>,
}

impl Batch {
    pub fn new(file_name: impl Into<String>, chain_id: ChainId, transactions: Vec<Transaction>) -> Self {
        Self {
            file_name: file_name.into(),
            chain_id,
            transactions,
            forum_link: None,
        }
    }

    /// Parse a payload document and attach its file name.
    pub fn from_json(file_name: impl Into<String>, json: &str) -> Result<Self, serde_json::Error> {
        let payload: BatchPayload = serde_json::from_str(json)?;
        Ok(Self::from_payload(file_name.into(), payload))
    }

    /// Same as [`Batch::from_json`] for an already parsed document.
    pub fn from_value(file_name: impl Into<String>, value: Value) -> Result<Self, serde_json::Error> {
        let payload: BatchPayload = serde_json::from_value(value)?;
        Ok(Self::from_payload(file_name.into(), payload))
    }

    fn from_payload(file_name: String, payload: BatchPayload) -> Self {
        Self {
            file_name,
            chain_id: payload.chain_id,
            transactions: payload.transactions,
            forum_link: payload.meta.and_then(|m| m.forum_link).filter(|l| !l.is_empty()),
        }
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// BIP number from the file name, else from the first transaction whose
    /// metadata carries one, else `N/A`.
    pub fn bip_number(&self) -> String {
        let from_name = bip_from_file_name(&self.file_name);
        if from_name != NA {
            return from_name;
        }
        self.transactions
            .iter()
            .filter_map(Transaction::meta_bip_number)
            .find(|b| *b != NA)
            .map(str::to_string)
            .unwrap_or_else(|| NA.to_string())
    }
}
