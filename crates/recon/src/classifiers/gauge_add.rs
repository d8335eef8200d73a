use payload_core::Transaction;

use super::pool::{extract_pool, gauge_cap};
use super::{same_address, target_label, CHAIN_MAINNET, GAUGE_ADDER_PATH};
use crate::classify::{Classifier, ClassifyContext};
use crate::model::{ClassificationResult, TxPosition};

const GAUGE_INPUTS: [&str; 2] = ["gauge", "rootGauge"];

/// Gauge types known to GaugeAdderV4 and the chain their pools live on.
const GAUGE_TYPE_CHAINS: [(&str, &str); 7] = [
    ("Ethereum", CHAIN_MAINNET),
    ("EthereumSingleRecipientGauge", CHAIN_MAINNET),
    ("Polygon", "polygon"),
    ("Arbitrum", "arbitrum"),
    ("Optimism", "optimism"),
    ("Gnosis", "gnosis"),
    ("PolygonZkEvm", "zkevm"),
];

pub(crate) fn chain_for_gauge_type(gauge_type: &str) -> Option<&'static str> {
    GAUGE_TYPE_CHAINS
        .iter()
        .find(|(t, _)| *t == gauge_type)
        .map(|(_, chain)| *chain)
}

/// `GaugeAdderV4` calls that add a gauge.
#[derive(Debug, Clone, Copy, Default)]
pub struct GaugeAdd;

impl Classifier for GaugeAdd {
    fn name(&self) -> &'static str {
        "gauge_add"
    }

    fn classify(
        &self,
        tx: &Transaction,
        position: &TxPosition,
        ctx: &ClassifyContext<'_>,
    ) -> Option<ClassificationResult> {
        let inputs = tx.inputs()?;
        if !GAUGE_INPUTS.iter().any(|name| inputs.contains(name)) {
            return None;
        }
        let Some(gauge_type) = inputs.get_str("gaugeType") else {
            log::warn!("tx {}: no gauge type, cannot process gauge addition", position.tx_index);
            return None;
        };

        let Some(adder) = ctx.book.search_unique(CHAIN_MAINNET, GAUGE_ADDER_PATH) else {
            log::warn!("{GAUGE_ADDER_PATH} missing from the mainnet address book");
            return None;
        };
        if !same_address(&tx.to, &adder) {
            return None;
        }

        let Some(chain) = chain_for_gauge_type(gauge_type) else {
            log::warn!("tx {}: unknown gauge type {gauge_type}", position.tx_index);
            return None;
        };
        let Some(gauge) = GAUGE_INPUTS.iter().find_map(|name| inputs.get_str(name)) else {
            log::warn!("tx {}: gauge address not found in transaction inputs", position.tx_index);
            return None;
        };

        let conn = ctx.network.connect(CHAIN_MAINNET);
        let cap = gauge_cap(&conn, gauge);
        let pool = extract_pool(ctx, chain, &conn, gauge)?;
        log::debug!("gauge {gauge} -> {} ({})", pool.name, pool.address);

        let label = target_label(ctx.book, CHAIN_MAINNET, &tx.to, GAUGE_ADDER_PATH, "GaugeAdderV4");
        Some(
            ClassificationResult::new(position, chain)
                .with_field("function", format!("{label}/{}", tx.method_name()))
                .with_field(
                    "pool_id_and_address",
                    format!("{} \npool_address: {}", pool.pool_id, pool.address),
                )
                .with_field(
                    "symbol_and_info",
                    format!("{}\nfee: {}, a-factor: {}", pool.symbol, pool.fee_text(), pool.a_factor),
                )
                .with_field(
                    "gauge_address_and_info",
                    format!("{gauge} \n Style: {}, cap: {cap}", pool.style),
                )
                .with_field("tokens", pool.tokens.join("\n"))
                .with_field("rate_providers", pool.rate_providers.join("\n")),
        )
    }
}
