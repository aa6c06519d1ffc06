use std::io;

use implreg_contract::{ResolveError, TypeDecl, TypeTable};
use pretty_assertions::assert_eq;

use super::*;
use crate::store::MemoryStore;

fn universe() -> TypeTable {
	TypeTable::default()
		.with(TypeDecl::interface("X"))
		.with(TypeDecl::interface("Y"))
		.with(TypeDecl::class("Base").abstract_class())
}

fn provides(name: &str, contract: &str, priority: i32) -> Declaration {
	Declaration::new(TypeDecl::class(name).implements(contract)).with_priority(priority)
}

fn aggregator() -> Aggregator {
	Aggregator::new(RegistryOptions::default()).unwrap()
}

/// Store whose reads or writes fail for one location.
struct FailingStore {
	inner: MemoryStore,
	fail_read: Option<&'static str>,
	fail_write: Option<&'static str>,
}

impl RecordStore for FailingStore {
	fn read(&self, location: &str) -> io::Result<Option<String>> {
		if self.fail_read == Some(location) {
			return Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
		}
		self.inner.read(location)
	}

	fn write(&self, location: &str, contents: &str) -> io::Result<()> {
		if self.fail_write == Some(location) {
			return Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
		}
		self.inner.write(location, contents)
	}
}

#[test]
fn writes_one_file_per_contract() {
	let store = MemoryStore::new();
	let decls = [provides("A", "X", 10), provides("B", "X", 5), provides("C", "Y", 0)];
	let report = aggregator().run_declarations(&universe(), &decls, &store);

	assert!(report.is_clean());
	assert_eq!(report.written, ["services/X", "services/Y"]);
	assert_eq!(store.get("services/X").unwrap(), "A\t10\nB\t5\n");
	assert_eq!(store.get("services/Y").unwrap(), "C\n");
}

#[test]
fn first_declaration_wins_within_a_pass() {
	let store = MemoryStore::new();
	let decls = [provides("A", "X", 10), provides("A", "X", 99)];
	let report = aggregator().run_declarations(&universe(), &decls, &store);

	assert_eq!(report.registry["X"].len(), 1);
	assert_eq!(store.get("services/X").unwrap(), "A\t10\n");
}

#[test]
fn discovered_entries_shadow_persisted_ones() {
	let store = MemoryStore::new().with("services/X", "A\t1\tstale\nOld\t3\n");
	let report = aggregator().run_declarations(&universe(), &[provides("A", "X", 10)], &store);

	assert_eq!(report.implementors("X"), ["A", "Old"]);
	assert_eq!(store.get("services/X").unwrap(), "A\t10\nOld\t3\n");
}

#[test]
fn rerunning_a_pass_is_idempotent() {
	let store = MemoryStore::new();
	let decls = [provides("A", "X", 10), provides("B", "X", 5)];
	aggregator().run_declarations(&universe(), &decls, &store);
	let first = store.get("services/X");
	aggregator().run_declarations(&universe(), &decls, &store);
	assert_eq!(store.get("services/X"), first);
}

#[test]
fn untouched_contracts_are_left_alone() {
	let store = MemoryStore::new().with("services/Y", "Kept\n");
	let report = aggregator().run_declarations(&universe(), &[provides("A", "X", 0)], &store);

	assert_eq!(report.written, ["services/X"]);
	assert_eq!(store.get("services/Y").unwrap(), "Kept\n");
}

#[test]
fn declaration_errors_do_not_stop_the_pass() {
	let store = MemoryStore::new();
	let decls = [
		Declaration::new(TypeDecl::class("Abstract").abstract_class().implements("X")),
		Declaration::new(TypeDecl::class("Both").extends("Base").implements("X")),
		Declaration::new(TypeDecl::class("Wrong").implements("X")).of("Y"),
		provides("Good", "X", 1),
	];
	let report = aggregator().run_declarations(&universe(), &decls, &store);

	assert_eq!(report.errors.len(), 3);
	assert!(matches!(report.errors[0], AggregateError::Declaration(ResolveError::NotConcrete { .. })));
	assert!(matches!(report.errors[1], AggregateError::Declaration(ResolveError::NotInferable { .. })));
	assert_eq!(report.errors[2].contract(), Some("Y"));
	assert_eq!(report.implementors("X"), ["Good"]);
	assert_eq!(report.written, ["services/X"]);
}

#[test]
fn unreadable_persisted_data_skips_only_that_contract() {
	let store = FailingStore {
		inner: MemoryStore::new().with("services/X", "Old\n"),
		fail_read: Some("services/X"),
		fail_write: None,
	};
	let decls = [provides("A", "X", 0), provides("B", "Y", 0)];
	let report = aggregator().run_declarations(&universe(), &decls, &store);

	assert_eq!(report.errors.len(), 1);
	assert!(matches!(&report.errors[0], AggregateError::PersistedRead { contract, .. } if contract == "X"));
	assert_eq!(report.written, ["services/Y"]);
	assert_eq!(store.inner.get("services/X").unwrap(), "Old\n");
}

#[test]
fn undecodable_persisted_data_is_not_overwritten() {
	let store = MemoryStore::new().with("services/X", "Old\tnot-a-number\n");
	let report = aggregator().run_declarations(&universe(), &[provides("A", "X", 0)], &store);

	assert!(matches!(&report.errors[0], AggregateError::PersistedDecode { location, .. } if location == "services/X"));
	assert!(report.written.is_empty());
	assert_eq!(store.get("services/X").unwrap(), "Old\tnot-a-number\n");
}

#[test]
fn write_failure_is_scoped_to_its_contract() {
	let store = FailingStore {
		inner: MemoryStore::new(),
		fail_read: None,
		fail_write: Some("services/X"),
	};
	let decls = [provides("A", "X", 0), provides("B", "Y", 0)];
	let report = aggregator().run_declarations(&universe(), &decls, &store);

	assert_eq!(report.errors.len(), 1);
	assert!(matches!(&report.errors[0], AggregateError::PersistedWrite { contract, .. } if contract == "X"));
	assert_eq!(report.written, ["services/Y"]);
	assert_eq!(store.inner.get("services/Y").unwrap(), "B\n");
}

#[test]
fn identifier_only_mode_writes_bare_names() {
	let options = RegistryOptions {
		identifier_only: true,
		base_location: "META-INF/services".into(),
		..RegistryOptions::default()
	};
	let store = MemoryStore::new();
	let decls = [provides("A", "X", 10).with_kind("fast")];
	let report = Aggregator::new(options).unwrap().run_declarations(&universe(), &decls, &store);

	assert_eq!(report.written, ["META-INF/services/X"]);
	assert_eq!(store.get("META-INF/services/X").unwrap(), "A\n");
}

#[test]
fn invalid_options_are_rejected() {
	let options = RegistryOptions {
		line_terminators: Vec::new(),
		..RegistryOptions::default()
	};
	assert!(matches!(Aggregator::new(options), Err(OptionsError::EmptyTerminators)));
}
