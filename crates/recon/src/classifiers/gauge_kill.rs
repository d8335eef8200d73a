use payload_core::Transaction;

use super::pool::{extract_pool, gauge_cap};
use super::{target_label, AA_ENTRYPOINT_PATH, CHAIN_MAINNET};
use crate::classify::{Classifier, ClassifyContext};
use crate::model::{ClassificationResult, TxPosition};

const KILL_GAUGE: &str = "killGauge()";

/// Root-gauge selectors that identify the chain a gauge streams to.
const BRIDGE_SELECTORS: [(&str, &str); 6] = [
    ("getTotalBridgeCost", "arbitrum"),
    ("getArbitrumBridge", "arbitrum"),
    ("getPolygonBridge", "polygon"),
    ("getGnosisBridge", "gnosis"),
    ("getOptimismBridge", "optimism"),
    ("getPolygonZkEVMBridge", "zkevm"),
];

/// Chain of the first gauge selector that names a bridge, else mainnet.
pub(crate) fn chain_for_selectors(selectors: &[String]) -> &'static str {
    selectors
        .iter()
        .find_map(|selector| {
            BRIDGE_SELECTORS
                .iter()
                .find(|(s, _)| s == selector)
                .map(|(_, chain)| *chain)
        })
        .unwrap_or(CHAIN_MAINNET)
}

/// Authorizer-adaptor calls whose payload is `killGauge()` on a gauge.
#[derive(Debug, Clone, Copy, Default)]
pub struct GaugeKill;

impl Classifier for GaugeKill {
    fn name(&self) -> &'static str {
        "gauge_kill"
    }

    fn classify(
        &self,
        tx: &Transaction,
        position: &TxPosition,
        ctx: &ClassifyContext<'_>,
    ) -> Option<ClassificationResult> {
        let inputs = tx.inputs()?;
        let gauge = inputs.get_str("target")?;
        let data = inputs.get_str("data")?;

        let conn = ctx.network.connect(CHAIN_MAINNET);
        let decoded = conn.decode_input(gauge, data)?;
        if decoded.function != KILL_GAUGE || !decoded.inputs.is_empty() {
            log::debug!("tx {}: {} is not a gauge kill", position.tx_index, decoded.function);
            return None;
        }

        let cap = gauge_cap(&conn, gauge);
        let chain = chain_for_selectors(&conn.selectors(gauge));
        let pool = extract_pool(ctx, chain, &conn, gauge)?;

        let label = target_label(ctx.book, CHAIN_MAINNET, &tx.to, AA_ENTRYPOINT_PATH, "AAEntrypoint");
        Some(
            ClassificationResult::new(position, chain)
                .with_field("function", format!("{label}/{}", decoded.function))
                .with_field("pool_id", pool.pool_id.clone())
                .with_field("symbol", pool.symbol.clone())
                .with_field("a", pool.a_factor.clone())
                .with_field("gauge_address", gauge)
                .with_field("fee", pool.fee_percent())
                .with_field("cap", cap)
                .with_field("style", pool.style)
                .with_field("tokens", pool.tokens.join("\n")),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::Network;
    use crate::testing::*;
    use payload_core::ChainId;
    use serde_json::json;

    fn position() -> TxPosition {
        TxPosition {
            chain_id: ChainId(1),
            bip_number: "BIP-600".into(),
            tx_index: 1,
        }
    }

    #[test]
    fn kills_mainnet_gauge() {
        let (book, state) = gauge_world();
        let network = Network::new(&state);
        let ctx = ClassifyContext::new(&book, &book, &network);

        let result = GaugeKill.classify(&kill_gauge_tx(MAINNET_GAUGE), &position(), &ctx).unwrap();
        assert_eq!(result.chain, "mainnet");
        assert_eq!(result.field("function"), Some("AAEntrypoint/killGauge()"));
        assert_eq!(result.field("symbol"), Some("B-80BAL-20WETH"));
        assert_eq!(result.field("a"), Some("200"));
        assert_eq!(result.field("fee"), Some("0.3%"));
        assert_eq!(result.field("cap"), Some("2.0%"));
        assert_eq!(result.field("style"), Some("mainnet"));
        assert_eq!(result.field("gauge_address"), Some(MAINNET_GAUGE));
    }

    #[test]
    fn kills_arbitrum_root_gauge() {
        let (book, state) = gauge_world();
        let network = Network::new(&state);
        let ctx = ClassifyContext::new(&book, &book, &network);

        let result = GaugeKill.classify(&kill_gauge_tx(ARB_ROOT_GAUGE), &position(), &ctx).unwrap();
        assert_eq!(result.chain, "arbitrum");
        assert_eq!(result.field("fee"), Some("Not Found"));
        assert_eq!(result.field("style"), Some("L0 sidechain"));
        assert_eq!(network.active(), None);
    }

    #[test]
    fn other_calls_are_not_kills() {
        let (book, state) = gauge_world();
        let state = state.decoded("mainnet", MAINNET_GAUGE, "0xdeadbeef", "setRelativeWeightCap(uint256)");
        let network = Network::new(&state);
        let ctx = ClassifyContext::new(&book, &book, &network);

        let tx = tx(json!({
            "to": AA_ENTRYPOINT,
            "contractMethod": {"name": "performAction"},
            "contractInputsValues": {"target": MAINNET_GAUGE, "data": "0xdeadbeef"},
        }));
        assert!(GaugeKill.classify(&tx, &position(), &ctx).is_none());
        assert!(GaugeKill.classify(&add_gauge_tx(MAINNET_GAUGE, "Ethereum"), &position(), &ctx).is_none());
    }

    #[test]
    fn bridge_selector_order() {
        let selectors = vec!["getRecipient".to_string(), "getPolygonBridge".to_string()];
        assert_eq!(chain_for_selectors(&selectors), "polygon");
        assert_eq!(chain_for_selectors(&[]), "mainnet");
    }
}
