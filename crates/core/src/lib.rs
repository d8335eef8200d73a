//! `payload-core`: data model shared by every payload-report crate.
//!
//! A *batch* is one proposal payload file: a chain id plus an ordered list of
//! transactions. Transactions are identified by their 0-based position in the
//! batch and never change after loading.

pub mod batch;
pub mod inputs;
pub mod naming;

pub use batch::{Batch, ChainId, ContractMethod, Transaction, TxMeta};
pub use inputs::{ContractInputs, InputValue};
pub use naming::{bip_from_file_name, merged_payload_target, NA};
