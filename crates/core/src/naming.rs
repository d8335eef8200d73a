//! Identifiers encoded in payload file names.

use std::sync::OnceLock;

use regex::Regex;

use crate::batch::ChainId;

/// Placeholder for values that could not be determined.
pub const NA: &str = "N/A";

fn bip_pattern() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"BIP-?\d+").ok()).as_ref()
}

fn target_pattern() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d+)-(0x[0-9a-fA-F]+)").ok()).as_ref()
}

/// First `BIP-123` / `BIP123` token in the file name, else `N/A`.
pub fn bip_from_file_name(file_name: &str) -> String {
    bip_pattern()
        .and_then(|re| re.find(file_name))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| NA.to_string())
}

/// Chain id and multisig address of a merged payload named `<chain>-<address>`.
pub fn merged_payload_target(file_name: &str) -> Option<(ChainId, String)> {
    let caps = target_pattern()?.captures(file_name)?;
    let chain_id = caps.get(1)?.as_str().parse().ok()?;
    let address = caps.get(2)?.as_str().to_string();
    Some((ChainId(chain_id), address))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bip_with_and_without_dash() {
        assert_eq!(bip_from_file_name("BIPs/2024-W10/BIP-512-add-gauge.json"), "BIP-512");
        assert_eq!(bip_from_file_name("BIPs/BIP77.json"), "BIP77");
    }

    #[test]
    fn bip_missing() {
        assert_eq!(bip_from_file_name("BIPs/2024-W10/misc.json"), "N/A");
    }

    #[test]
    fn merged_target() {
        let (chain, addr) =
            merged_payload_target("BIPs/00merging/1-0x10A19e7eE7d7F8a52822f6817de8ea18204F2e4f.json").unwrap();
        assert_eq!(chain, ChainId(1));
        assert_eq!(addr, "0x10A19e7eE7d7F8a52822f6817de8ea18204F2e4f");
    }

    #[test]
    fn no_merged_target() {
        assert!(merged_payload_target("BIPs/BIP-1.json").is_none());
    }
}
