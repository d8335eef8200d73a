//! Pool information behind a gauge.

use payload_core::NA;

use super::{format_units, CHAIN_MAINNET, PERCENT_DECIMALS, VAULT_PATH};
use crate::classify::ClassifyContext;
use crate::lookup::{value_list, value_text, value_u128};
use crate::network::Connection;

pub(crate) const STYLE_MAINNET: &str = "mainnet";
pub(crate) const STYLE_SINGLE_RECIPIENT: &str = "Single Recipient";
pub(crate) const STYLE_CHILD_CHAIN_STREAMER: &str = "ChildChainStreamer";
pub(crate) const STYLE_L0: &str = "L0 sidechain";

const POOL_ID_CUSTOM: &str = "Custom";
const FEE_NOT_FOUND: &str = "Not Found";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PoolInfo {
    pub name: String,
    pub symbol: String,
    pub pool_id: String,
    pub address: String,
    pub a_factor: String,
    /// Swap fee in percent, if the pool exposes one.
    pub fee: Option<String>,
    pub style: &'static str,
    /// `SYMBOL(address)` per token.
    pub tokens: Vec<String>,
    pub rate_providers: Vec<String>,
}

impl PoolInfo {
    pub fn fee_text(&self) -> String {
        self.fee.clone().unwrap_or_else(|| FEE_NOT_FOUND.to_string())
    }

    pub fn fee_percent(&self) -> String {
        match &self.fee {
            Some(fee) => format!("{fee}%"),
            None => FEE_NOT_FOUND.to_string(),
        }
    }
}

/// `getRelativeWeightCap()` as a percentage, `N/A` when the gauge has no cap.
pub(crate) fn gauge_cap(conn: &Connection<'_>, gauge: &str) -> String {
    if !conn.has_selector(gauge, "getRelativeWeightCap") {
        return NA.to_string();
    }
    conn.call(gauge, "getRelativeWeightCap")
        .as_ref()
        .and_then(value_u128)
        .map(|cap| format!("{}%", format_units(cap, PERCENT_DECIMALS)))
        .unwrap_or_else(|| NA.to_string())
}

/// Follow a mainnet gauge to its pool, hopping to `chain` for root gauges.
///
/// `conn` must be connected to mainnet.
pub(crate) fn extract_pool(
    ctx: &ClassifyContext<'_>,
    chain: &str,
    conn: &Connection<'_>,
    gauge: &str,
) -> Option<PoolInfo> {
    if chain != CHAIN_MAINNET {
        let recipient = lookup_address(conn, gauge, "getRecipient")?;
        let side = ctx.network.connect(chain);
        let (receiver, style) = if side.has_selector(&recipient, "reward_receiver") {
            (lookup_address(&side, &recipient, "reward_receiver")?, STYLE_CHILD_CHAIN_STREAMER)
        } else {
            (recipient, STYLE_L0)
        };
        let pool = lookup_address(&side, &receiver, "lp_token")?;
        return pool_info(ctx, &side, &pool, style);
    }

    if !conn.has_selector(gauge, "name") {
        let recipient = lookup_address(conn, gauge, "getRecipient")?;
        let escrow = lookup_address(conn, &recipient, "getVotingEscrow")?;
        let pool = lookup_address(conn, &escrow, "token")?;
        return pool_info(ctx, conn, &pool, STYLE_SINGLE_RECIPIENT);
    }

    let pool = lookup_address(conn, gauge, "lp_token")?;
    pool_info(ctx, conn, &pool, STYLE_MAINNET)
}

fn lookup_address(conn: &Connection<'_>, contract: &str, method: &str) -> Option<String> {
    let value = conn.call(contract, method).map(|v| value_text(&v));
    if value.is_none() {
        log::warn!("{}: {method}() unavailable on {contract}", conn.chain());
    }
    value
}

fn pool_info(ctx: &ClassifyContext<'_>, conn: &Connection<'_>, pool: &str, style: &'static str) -> Option<PoolInfo> {
    let name = lookup_address(conn, pool, "name")?;
    let mut symbol = lookup_address(conn, pool, "symbol")?;

    let a_factor = conn
        .call(pool, "getAmplificationParameter")
        .and_then(|v| value_list(&v))
        .and_then(|parts| {
            let value: u128 = parts.first()?.parse().ok()?;
            let precision: u128 = parts.get(2)?.parse().ok()?;
            value.checked_div(precision)
        })
        .map(|a| a.to_string())
        .unwrap_or_else(|| NA.to_string());

    let pool_id = conn
        .call(pool, "getPoolId")
        .map(|v| value_text(&v))
        .unwrap_or_else(|| POOL_ID_CUSTOM.to_string());

    let fee = conn
        .call(pool, "getSwapFeePercentage")
        .as_ref()
        .and_then(value_u128)
        .map(|fee| format_units(fee, PERCENT_DECIMALS));

    let token_addresses = ctx
        .book
        .search_unique(conn.chain(), VAULT_PATH)
        .and_then(|vault| conn.call_with(&vault, "getPoolTokens", std::slice::from_ref(&pool_id)))
        .and_then(|v| v.get(0).and_then(value_list))
        .unwrap_or_default();

    let rate_providers = conn
        .call(pool, "getRateProviders")
        .and_then(|v| value_list(&v))
        .unwrap_or_default();

    if conn.call(pool, "totalSupply").as_ref().and_then(value_u128) == Some(0) {
        symbol = format!("WARN: {symbol} no initjoin");
    }

    let tokens = token_addresses
        .iter()
        .map(|token| {
            let token_symbol = conn
                .call(token, "symbol")
                .map(|v| value_text(&v))
                .unwrap_or_else(|| NA.to_string());
            format!("{token_symbol}({token})")
        })
        .collect();

    Some(PoolInfo {
        name,
        symbol,
        pool_id,
        address: pool.to_string(),
        a_factor,
        fee,
        style,
        tokens,
        rate_providers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::NullLookup;
    use crate::network::Network;
    use crate::testing::*;

    #[test]
    fn mainnet_gauge_pool() {
        let (book, state) = gauge_world();
        let network = Network::new(&state);
        let ctx = ClassifyContext::new(&book, &book, &network);
        let conn = network.connect(CHAIN_MAINNET);

        let pool = extract_pool(&ctx, CHAIN_MAINNET, &conn, MAINNET_GAUGE).unwrap();
        assert_eq!(pool.style, STYLE_MAINNET);
        assert_eq!(pool.symbol, "B-80BAL-20WETH");
        assert_eq!(pool.pool_id, POOL_ID);
        assert_eq!(pool.a_factor, "200");
        assert_eq!(pool.fee.as_deref(), Some("0.3"));
        assert_eq!(pool.tokens, vec![format!("BAL({BAL})"), format!("WETH({WETH})")]);
        assert_eq!(pool.rate_providers.len(), 2);
        assert_eq!(gauge_cap(&conn, MAINNET_GAUGE), "2.0%");
    }

    #[test]
    fn sidechain_gauge_hops_and_restores() {
        let (book, state) = gauge_world();
        let network = Network::new(&state);
        let ctx = ClassifyContext::new(&book, &book, &network);
        let conn = network.connect(CHAIN_MAINNET);

        let pool = extract_pool(&ctx, "arbitrum", &conn, ARB_ROOT_GAUGE).unwrap();
        assert_eq!(pool.style, STYLE_L0);
        assert_eq!(pool.address, ARB_POOL);
        assert_eq!(pool.symbol, "WARN: ARB-POOL no initjoin");
        assert_eq!(pool.pool_id, "Custom");
        assert_eq!(pool.a_factor, "N/A");
        assert!(pool.tokens.is_empty());
        assert_eq!(network.active().as_deref(), Some(CHAIN_MAINNET));
    }

    #[test]
    fn unresolved_pool_is_none() {
        let network = Network::new(&NullLookup);
        let ctx = ClassifyContext::new(&NullLookup, &NullLookup, &network);
        let conn = network.connect(CHAIN_MAINNET);
        assert!(extract_pool(&ctx, CHAIN_MAINNET, &conn, MAINNET_GAUGE).is_none());
        assert_eq!(gauge_cap(&conn, MAINNET_GAUGE), "N/A");
    }
}
