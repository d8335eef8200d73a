//! `payload-recon`: classification and coverage reconciliation of payload batches.
//!
//! Pure engine crate: receives pre-loaded batches and lookup capabilities,
//! returns per-classifier reports, the residual (uncovered) report and the
//! merged per-file report text. No file or network IO.

pub mod classifiers;
pub mod classify;
pub mod coverage;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod lookup;
pub mod merge;
pub mod model;
pub mod network;
pub mod render;
pub mod snapshot;

#[cfg(test)]
mod testing;

pub use classify::{default_registry, Classifier, ClassifyContext};
pub use coverage::{compute_coverage, prettify_inputs, reconcile, Coverage, CoverageSet, RESIDUAL};
pub use dispatch::{classify_batch, dispatch};
pub use engine::{Pipeline, PipelineOutput};
pub use error::ReportError;
pub use lookup::{AddressBook, ChainState, DecodedCall, NullLookup, Permissions};
pub use merge::merge;
pub use model::{ClassificationResult, ClassifierReport, MergedReport, MergedReports, ReportSet, TxPosition};
pub use network::{Connection, Network};
pub use render::{GridRenderer, ReportRenderer};
pub use snapshot::{derive_snapshot_options, option_string, week_file_name, SnapshotOptions};
