//! Subcommand implementations.

use std::path::{Path, PathBuf};

use anyhow::Context;
use implreg_aggregate::{AggregationReport, Aggregator, FsStore, RegistryOptions};
use implreg_contract::{DeclarationSource, Manifest, TypeTable};
use implreg_query::predicates::{self, PredicateRef};
use implreg_query::{DirLookup, Finder, TypeTableLoader};
use implreg_record::ImplementationInfo;

fn load_options(path: Option<&Path>) -> anyhow::Result<RegistryOptions> {
	match path {
		Some(path) => RegistryOptions::load(path).with_context(|| format!("loading options from {}", path.display())),
		None => Ok(RegistryOptions::default()),
	}
}

pub fn aggregate(manifest: &Path, out: &Path, options: Option<&Path>) -> anyhow::Result<AggregationReport> {
	let options = load_options(options)?;
	let manifest = Manifest::load(manifest).with_context(|| format!("loading manifest {}", manifest.display()))?;
	let aggregator = Aggregator::new(options)?;

	tracing::info!(declarations = manifest.provides.len(), out = %out.display(), "aggregating");
	Ok(aggregator.run(&manifest, &FsStore::new(out)))
}

#[derive(Debug, Clone, Default)]
pub struct QueryArgs {
	pub contract: String,
	pub roots: Vec<PathBuf>,
	pub kinds: Vec<String>,
	pub pattern: Option<String>,
	pub manifest: Option<PathBuf>,
	pub assignable: Vec<String>,
	pub options: Option<PathBuf>,
}

/// Looks up the contract and applies the filters in order: kinds, pattern,
/// assignability.
pub fn query(args: &QueryArgs) -> anyhow::Result<Vec<ImplementationInfo>> {
	let options = load_options(args.options.as_deref())?;
	let types = match &args.manifest {
		Some(path) => Manifest::load(path).with_context(|| format!("loading manifest {}", path.display()))?.types(),
		None => TypeTable::default(),
	};

	let lookup = DirLookup::new(args.roots.iter().cloned()).with_base(&options.base_location);
	let finder = Finder::new(lookup, TypeTableLoader::new(types)).with_format(options.format()?);
	let mut set = finder.find(&args.contract)?;

	if !args.kinds.is_empty() {
		set.by_kinds(args.kinds.iter().cloned()).retain_any(&[]);
	}
	if let Some(pattern) = &args.pattern {
		set.by_implementor_pattern(pattern).with_context(|| format!("invalid pattern {pattern:?}"))?.retain_any(&[]);
	}
	if !args.assignable.is_empty() {
		let preds: Vec<PredicateRef> = args.assignable.iter().map(|target| predicates::assignable_to(target.as_str())).collect();
		set.retain_any(&preds);
	}

	Ok(set.into_iter().collect())
}

/// One output line: identifier, priority and kind when present.
pub fn describe(info: &ImplementationInfo) -> String {
	match info.kind() {
		Some(kind) => format!("{}\t{}\t{kind}", info.implementor(), info.priority()),
		None => format!("{}\t{}", info.implementor(), info.priority()),
	}
}
