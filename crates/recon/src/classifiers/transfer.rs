use payload_core::{Transaction, NA};

use super::format_units;
use crate::classify::{Classifier, ClassifyContext};
use crate::lookup::{value_text, value_u128};
use crate::model::{ClassificationResult, TxPosition};

/// ERC-20 `transfer(to, amount)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Transfer;

impl Classifier for Transfer {
    fn name(&self) -> &'static str {
        "transfer"
    }

    fn classify(
        &self,
        tx: &Transaction,
        position: &TxPosition,
        ctx: &ClassifyContext<'_>,
    ) -> Option<ClassificationResult> {
        let inputs = tx.inputs()?;
        if tx.method_name() != "transfer" {
            return None;
        }
        let Some(chain) = ctx.book.chain_name(position.chain_id) else {
            log::warn!("chain {} not in address book, cannot process transfer", position.chain_id);
            return None;
        };

        let conn = ctx.network.connect(&chain);
        let Some(decimals) = conn.call(&tx.to, "decimals").as_ref().and_then(value_u128) else {
            log::warn!("{chain}: decimals() unavailable on token {}", tx.to);
            return None;
        };
        let Some(symbol) = conn.call(&tx.to, "symbol").map(|v| value_text(&v)) else {
            log::warn!("{chain}: symbol() unavailable on token {}", tx.to);
            return None;
        };

        let recipient = inputs.get_str("to").unwrap_or(NA);
        let recipient_name = ctx.book.reverse(&chain, recipient).unwrap_or_else(|| NA.to_string());
        let raw_amount = inputs.get_str("amount").or_else(|| inputs.get_str("value"));
        let amount = raw_amount
            .and_then(|raw| raw.parse::<u128>().ok())
            .zip(u32::try_from(decimals).ok())
            .map(|(raw, decimals)| format_units(raw, decimals))
            .unwrap_or_else(|| NA.to_string());

        Some(
            ClassificationResult::new(position, chain)
                .with_field("function", "transfer")
                .with_field("token_symbol", format!("{symbol}:{}", tx.to))
                .with_field("recipient", format!("{recipient_name}:{recipient}"))
                .with_field("amount", format!("{amount} (RAW: {})", raw_amount.unwrap_or(NA))),
        )
    }
}
