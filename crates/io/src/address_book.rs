// Address book + permissions document
//
// {
//   "chains":      { "<chain>": <chain id> },
//   "books":       { "<chain>": { "<path>": "<address>" } },
//   "permissions": { "<chain>": { "<action id>": ["<path>", ...] } }
// }

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use serde::Deserialize;

use payload_core::ChainId;
use payload_recon::{AddressBook, Permissions};

use crate::error::LoadError;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Document {
    chains: BTreeMap<String, ChainId>,
    books: BTreeMap<String, BTreeMap<String, String>>,
    permissions: BTreeMap<String, BTreeMap<String, Vec<String>>>,
}

/// File-backed [`AddressBook`] and [`Permissions`].
#[derive(Debug, Default)]
pub struct JsonAddressBook {
    doc: Document,
    /// (chain, lower-case address) -> path
    reverse: HashMap<(String, String), String>,
}

impl JsonAddressBook {
    pub fn from_json(contents: &str) -> Result<Self, serde_json::Error> {
        let doc: Document = serde_json::from_str(contents)?;
        let reverse = doc
            .books
            .iter()
            .flat_map(|(chain, book)| {
                book.iter()
                    .map(move |(path, address)| ((chain.clone(), address.to_ascii_lowercase()), path.clone()))
            })
            .collect();
        Ok(Self { doc, reverse })
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
            log::warn!("address book {} not found; names will not resolve", path.display());
            return Ok(Self::default());
        }
        Self::load(path)
    }
}

impl AddressBook for JsonAddressBook {
    fn chain_name(&self, chain_id: ChainId) -> Option<String> {
        self.doc
            .chains
            .iter()
            .find(|(_, id)| **id == chain_id)
            .map(|(name, _)| name.clone())
    }

    fn reverse(&self, chain: &str, address: &str) -> Option<String> {
        self.reverse
            .get(&(chain.to_string(), address.to_ascii_lowercase()))
            .cloned()
    }

    fn search_unique(&self, chain: &str, path: &str) -> Option<String> {
        let book = self.doc.books.get(chain)?;
        if let Some(address) = book.get(path) {
            return Some(address.clone());
        }
        let hits: Vec<&String> = book
            .iter()
            .filter(|(p, _)| p.contains(path))
            .map(|(_, address)| address)
            .collect();
        match hits.as_slice() {
            [single] => Some((*single).clone()),
            [] => None,
            many => {
                log::warn!("{chain}: {} entries match {path}", many.len());
                None
            }
        }
    }
}

impl Permissions for JsonAddressBook {
    fn action_paths(&self, chain: &str, action_id: &str) -> Option<Vec<String>> {
        self.doc.permissions.get(chain)?.get(action_id).cloned()
    }
}
