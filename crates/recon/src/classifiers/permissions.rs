use payload_core::{Transaction, NA};

use super::{target_label, AUTHORIZER_PATH};
use crate::classify::{Classifier, ClassifyContext};
use crate::model::{ClassificationResult, TxPosition};

/// Authorizer role grants and revocations (`grantRole`, `revokeRoles`, ...).
#[derive(Debug, Clone, Copy, Default)]
pub struct RoleChange;

impl Classifier for RoleChange {
    fn name(&self) -> &'static str {
        "permissions"
    }

    fn classify(
        &self,
        tx: &Transaction,
        position: &TxPosition,
        ctx: &ClassifyContext<'_>,
    ) -> Option<ClassificationResult> {
        let inputs = tx.inputs()?;
        let function = tx.method_name();
        if !function.contains("Role") {
            return None;
        }
        let Some(chain) = ctx.book.chain_name(position.chain_id) else {
            log::warn!("chain {} not in address book, cannot process {function}", position.chain_id);
            return None;
        };

        let action_ids: Vec<&str> = match inputs.get("roles") {
            Some(roles) => roles.values().into_iter().filter(|id| !id.is_empty()).collect(),
            None => inputs.get_str("role").into_iter().collect(),
        };
        if action_ids.is_empty() {
            log::debug!("tx {}: {function} carries no action ids", position.tx_index);
            return None;
        }

        let mut fx_paths = Vec::new();
        for action_id in &action_ids {
            let Some(paths) = ctx.permissions.action_paths(&chain, action_id) else {
                log::warn!("{chain}: unknown action id {action_id}");
                return None;
            };
            fx_paths.extend(paths);
        }

        let caller_address = inputs.get_str("account").unwrap_or(NA);
        let caller_name = ctx
            .book
            .reverse(&chain, caller_address)
            .unwrap_or_else(|| "!!NOT FOUND!!".to_string());
        let label = target_label(ctx.book, &chain, &tx.to, AUTHORIZER_PATH, "Authorizer");

        Some(
            ClassificationResult::new(position, chain)
                .with_field("function", format!("{label}/{function}"))
                .with_field("caller_name", caller_name)
                .with_field("caller_address", caller_address)
                .with_field("fx_paths", fx_paths.join("\n"))
                .with_field("action_ids", action_ids.join("\n")),
        )
    }
}
