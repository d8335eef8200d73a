//! Built-in classifiers and the helpers they share.

mod gauge_add;
mod gauge_kill;
mod permissions;
mod pool;
mod transfer;

pub use gauge_add::GaugeAdd;
pub use gauge_kill::GaugeKill;
pub use permissions::RoleChange;
pub use transfer::Transfer;

use crate::lookup::AddressBook;

pub const CHAIN_MAINNET: &str = "mainnet";

pub const GAUGE_ADDER_PATH: &str = "20230519-gauge-adder-v4/GaugeAdder";
pub const AA_ENTRYPOINT_PATH: &str = "20221124-authorizer-adaptor-entrypoint/AuthorizerAdaptorEntrypoint";
pub const AUTHORIZER_PATH: &str = "20210418-authorizer/Authorizer";
pub const VAULT_PATH: &str = "vault/Vault";

/// Swap fees and weight caps are 18-decimal fractions; `/ 1e16` gives percent.
pub(crate) const PERCENT_DECIMALS: u32 = 16;

/// Short label for a known deployment, else `!!<name>??`.
pub(crate) fn target_label(book: &dyn AddressBook, chain: &str, to: &str, known_path: &str, short: &str) -> String {
    match book.reverse(chain, to) {
        Some(name) if name == known_path => short.to_string(),
        Some(name) => format!("!!{name}??"),
        None => "!!NOT-FOUND??".to_string(),
    }
}

/// Exact decimal rendering of `raw / 10^decimals`.
///
/// Trailing fractional zeros are dropped but one fractional digit is always
/// kept, so whole amounts read `100.0`.
pub fn format_units(raw: u128, decimals: u32) -> String {
    let digits = raw.to_string();
    let decimals = decimals as usize;
    let (int_part, frac_part) = if digits.len() > decimals {
        let split = digits.len() - decimals;
        (digits[..split].to_string(), digits[split..].to_string())
    } else {
        ("0".to_string(), format!("{digits:0>decimals$}"))
    };
    let frac = frac_part.trim_end_matches('0');
    if frac.is_empty() {
        format!("{int_part}.0")
    } else {
        format!("{int_part}.{frac}")
    }
}

/// Addresses compare case-insensitively (checksummed vs lower-case).
pub(crate) fn same_address(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}
