use payload_core::Transaction;

use crate::classifiers::{GaugeAdd, GaugeKill, RoleChange, Transfer};
use crate::lookup::{AddressBook, Permissions};
use crate::model::{ClassificationResult, TxPosition};
use crate::network::Network;

/// Lookup capabilities handed to every classifier invocation.
#[derive(Clone, Copy)]
pub struct ClassifyContext<'a> {
    pub book: &'a dyn AddressBook,
    pub permissions: &'a dyn Permissions,
    pub network: &'a Network<'a>,
}

impl<'a> ClassifyContext<'a> {
    pub fn new(book: &'a dyn AddressBook, permissions: &'a dyn Permissions, network: &'a Network<'a>) -> Self {
        Self {
            book,
            permissions,
            network,
        }
    }
}

/// A partial recognizer for one category of transaction intent.
///
/// `None` means "not mine" (shape mismatch) or "could not resolve" (logged at
/// warn by the implementation). Neither aborts the batch.
pub trait Classifier {
    fn name(&self) -> &'static str;

    fn classify(
        &self,
        tx: &Transaction,
        position: &TxPosition,
        ctx: &ClassifyContext<'_>,
    ) -> Option<ClassificationResult>;
}

/// Built-in classifiers in pipeline order. Order only affects report layout.
pub fn default_registry() -> Vec<Box<dyn Classifier>> {
    vec![
        Box::new(GaugeAdd),
        Box::new(GaugeKill),
        Box::new(Transfer),
        Box::new(RoleChange),
    ]
}
