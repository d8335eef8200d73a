/// Structural reconciliation failures.
///
/// Each one is scoped to a single batch: the reconciler logs it, skips the
/// batch (or the offending index) and carries on with the rest of the run.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReportError {
    /// A classifier report names a file that is not in the batch list.
    #[error("report references unknown batch {0}")]
    UnknownBatch(String),

    /// A classification claims an index past the end of its batch.
    #[error("{file_name}: tx_index {tx_index} is outside a batch of {len} transaction(s)")]
    IndexOutOfRange {
        file_name: String,
        tx_index: usize,
        len: usize,
    },

    /// Nothing to report on: the batch holds no transactions at all.
    #[error("{0}: batch has no transactions")]
    EmptyBatch(String),
}
