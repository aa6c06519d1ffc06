use std::sync::Arc;

use implreg_record::{ImplementationInfo, RecordFormat, decode_all};

use crate::error::QueryError;
use crate::loader::ImplementationLoader;
use crate::lookup::LookupProvider;
use crate::result_set::ResultSet;

/// Entry point for runtime queries: lookup, decode, wrap.
#[derive(Clone)]
pub struct Finder {
	lookup: Arc<dyn LookupProvider>,
	loader: Arc<dyn ImplementationLoader>,
	format: RecordFormat,
}

impl Finder {
	pub fn new(lookup: impl LookupProvider + 'static, loader: impl ImplementationLoader + 'static) -> Self {
		Self {
			lookup: Arc::new(lookup),
			loader: Arc::new(loader),
			format: RecordFormat::default(),
		}
	}

	/// Uses `format` to decode persisted streams. It must match the format the
	/// registry was written with.
	pub fn with_format(mut self, format: RecordFormat) -> Self {
		self.format = format;
		self
	}

	pub fn format(&self) -> &RecordFormat {
		&self.format
	}

	/// Decoded records for `contract`, in stream order, duplicates collapsed.
	pub fn find_raw(&self, contract: &str) -> Result<Vec<ImplementationInfo>, QueryError> {
		let streams = self.lookup.lookup(contract).map_err(|source| QueryError::Lookup {
			contract: contract.to_string(),
			source,
		})?;
		if streams.is_empty() {
			tracing::debug!(contract, "no registry streams found");
		}
		Ok(decode_all(&self.format, streams)?)
	}

	/// A [`ResultSet`] over the records registered for `contract`.
	pub fn find(&self, contract: &str) -> Result<ResultSet, QueryError> {
		let infos = self.find_raw(contract)?;
		tracing::debug!(contract, count = infos.len(), "loaded registry");
		Ok(ResultSet::new(contract, Arc::clone(&self.loader), infos))
	}
}
