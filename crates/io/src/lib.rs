// File I/O: payload loading, file-backed lookups, report output

pub mod address_book;
pub mod batches;
pub mod chain_state;
pub mod error;
pub mod reports;

pub use address_book::JsonAddressBook;
pub use batches::{discover_batches, load_batch, load_batches, PAYLOAD_DIR};
pub use chain_state::JsonChainState;
pub use error::{LoadError, WriteError};
pub use reports::{report_path, write_batch_reports, write_combined_report, write_snapshot};
