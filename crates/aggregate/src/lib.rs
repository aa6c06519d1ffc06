//! Build-time registry aggregation.
//!
//! One [`Aggregator::run`] pass resolves every declaration from a
//! [`DeclarationSource`](implreg_contract::DeclarationSource), merges the
//! discovered records with whatever is already persisted for each touched
//! contract, and writes the merged sets back through a [`RecordStore`].
//! Failures are scoped to one declaration or one contract and collected in the
//! [`AggregationReport`]; the pass itself never aborts.

mod aggregator;
mod error;
mod options;
mod store;

pub use aggregator::{AggregationReport, Aggregator, ContractRegistry};
pub use error::AggregateError;
pub use implreg_record::{DEFAULT_BASE_LOCATION, RecordStore, normalize_base};
pub use options::{OptionsError, RegistryOptions};
pub use store::{FsStore, MemoryStore};
