use std::collections::{BTreeMap, BTreeSet};

use implreg_contract::{Declaration, DeclarationSource, TypeUniverse, resolve_contract};
use implreg_record::{ImplementationInfo, RecordFormat, RecordStore, decode, encode_to_string, union_into};
use indexmap::IndexSet;

use crate::error::AggregateError;
use crate::options::{OptionsError, RegistryOptions};

#[cfg(test)]
mod tests;

/// Contract id to its registered implementations, unique by implementor.
///
/// Contracts iterate in lexical order.
pub type ContractRegistry = BTreeMap<String, IndexSet<ImplementationInfo>>;

/// Outcome of one aggregation pass.
#[derive(Debug, Default)]
pub struct AggregationReport {
	/// Merged sets for every contract touched by discovery.
	pub registry: ContractRegistry,
	/// Per-declaration and per-contract failures, in the order they occurred.
	pub errors: Vec<AggregateError>,
	/// Locations written, in contract order.
	pub written: Vec<String>,
}

impl AggregationReport {
	pub fn is_clean(&self) -> bool {
		self.errors.is_empty()
	}

	/// Implementors registered for `contract`, in set order.
	pub fn implementors(&self, contract: &str) -> Vec<&str> {
		self.registry
			.get(contract)
			.map(|set| set.iter().map(ImplementationInfo::implementor).collect())
			.unwrap_or_default()
	}
}

/// Runs discovery, merge and write-back for one build pass.
#[derive(Debug, Clone)]
pub struct Aggregator {
	options: RegistryOptions,
	format: RecordFormat,
}

impl Aggregator {
	pub fn new(options: RegistryOptions) -> Result<Self, OptionsError> {
		let format = options.format()?;
		Ok(Self { options, format })
	}

	pub fn options(&self) -> &RegistryOptions {
		&self.options
	}

	pub fn format(&self) -> &RecordFormat {
		&self.format
	}

	/// Aggregates everything `source` declares into `store`.
	pub fn run<S, St>(&self, source: &S, store: &St) -> AggregationReport
	where
		S: DeclarationSource + ?Sized,
		St: RecordStore + ?Sized,
	{
		let types = source.types();
		self.run_declarations(&types, &source.declarations(), store)
	}

	/// Aggregates `declarations`, resolved against `universe`, into `store`.
	pub fn run_declarations<U, St>(&self, universe: &U, declarations: &[Declaration], store: &St) -> AggregationReport
	where
		U: TypeUniverse + ?Sized,
		St: RecordStore + ?Sized,
	{
		let mut report = AggregationReport::default();
		self.discover(universe, declarations, &mut report);
		let skipped = self.merge_persisted(store, &mut report);
		self.write_back(store, &skipped, &mut report);
		report
	}

	fn discover<U>(&self, universe: &U, declarations: &[Declaration], report: &mut AggregationReport)
	where
		U: TypeUniverse + ?Sized,
	{
		for decl in declarations {
			let contract = match resolve_contract(universe, decl) {
				Ok(contract) => contract,
				Err(e) => {
					tracing::error!(implementor = decl.implementor_name(), error = %e, "rejected declaration");
					report.errors.push(e.into());
					continue;
				}
			};
			let info = match decl.to_info() {
				Ok(info) => info,
				Err(source) => {
					let error = AggregateError::Record {
						implementor: decl.implementor_name().to_string(),
						source,
					};
					tracing::error!(error = %error, "rejected declaration");
					report.errors.push(error);
					continue;
				}
			};
			tracing::debug!(%contract, implementor = info.implementor(), "discovered implementation");
			let set = report.registry.entry(contract).or_default();
			if !set.insert(info) {
				tracing::debug!(implementor = decl.implementor_name(), "duplicate declaration ignored");
			}
		}
	}

	/// Unions persisted records into every touched contract. Returns the
	/// contracts whose persisted data could not be read or decoded.
	fn merge_persisted<St>(&self, store: &St, report: &mut AggregationReport) -> BTreeSet<String>
	where
		St: RecordStore + ?Sized,
	{
		let mut skipped = BTreeSet::new();
		for (contract, set) in report.registry.iter_mut() {
			let location = self.options.location(contract);
			let persisted = match store.read(&location) {
				Ok(Some(contents)) => decode(&self.format, contents.as_bytes()).map_err(|source| AggregateError::PersistedDecode {
					contract: contract.clone(),
					location: location.clone(),
					source,
				}),
				Ok(None) => Ok(Vec::new()),
				Err(source) => Err(AggregateError::PersistedRead {
					contract: contract.clone(),
					location: location.clone(),
					source,
				}),
			};
			match persisted {
				Ok(records) => {
					let added = union_into(set, records);
					if added > 0 {
						tracing::debug!(%contract, added, "merged persisted records");
					}
				}
				Err(error) => {
					tracing::error!(%contract, %location, error = %error, "persisted registry unreadable, not rewriting");
					report.errors.push(error);
					skipped.insert(contract.clone());
				}
			}
		}
		skipped
	}

	fn write_back<St>(&self, store: &St, skipped: &BTreeSet<String>, report: &mut AggregationReport)
	where
		St: RecordStore + ?Sized,
	{
		for (contract, set) in &report.registry {
			if set.is_empty() || skipped.contains(contract) {
				continue;
			}
			let location = self.options.location(contract);
			tracing::info!("writing {location}");
			for info in set {
				tracing::debug!(%location, record = %info, "writing record");
			}
			match store.write(&location, &encode_to_string(&self.format, set)) {
				Ok(()) => report.written.push(location),
				Err(source) => {
					let error = AggregateError::PersistedWrite {
						contract: contract.clone(),
						location,
						source,
					};
					tracing::error!(error = %error, "failed to write registry");
					report.errors.push(error);
				}
			}
		}
	}
}
