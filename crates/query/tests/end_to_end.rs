use implreg_aggregate::{Aggregator, FsStore, MemoryStore, RegistryOptions};
use implreg_contract::{Declaration, DeclarationSource, Manifest, TypeDecl, TypeTable};
use implreg_query::predicates::kind_equals;
use implreg_query::{DirLookup, Finder, StoreLookup, TypeTableLoader};
use pretty_assertions::assert_eq;

fn universe() -> TypeTable {
	TypeTable::default()
		.with(TypeDecl::interface("X"))
		.with(TypeDecl::class("A").implements("X"))
		.with(TypeDecl::class("B").implements("X"))
		.with(TypeDecl::class("C").implements("X"))
}

fn declarations() -> Vec<Declaration> {
	[("A", 10), ("B", 5), ("C", 10)]
		.into_iter()
		.map(|(name, priority)| Declaration::new(TypeDecl::class(name).implements("X")).with_priority(priority))
		.collect()
}

#[test]
fn aggregate_then_query() {
	let aggregator = Aggregator::new(RegistryOptions::default()).unwrap();
	let store = MemoryStore::new();
	let report = aggregator.run_declarations(&universe(), &declarations(), &store);
	assert!(report.is_clean());

	let finder = Finder::new(StoreLookup::new(store), TypeTableLoader::new(universe()));
	let raw = finder.find_raw("X").unwrap();
	let names: Vec<_> = raw.iter().map(|i| i.implementor()).collect();
	assert_eq!(names, ["A", "B", "C"]);

	let mut set = finder.find("X").unwrap();
	assert_eq!(set.len(), 3);
	assert_eq!(set.first_info().unwrap().priority(), 10);
	assert_eq!(set.first_info().unwrap().implementor(), "A");
	assert_eq!(set.first().unwrap().name, "A");

	set.retain_any(&[kind_equals("foo")]);
	assert_eq!(set.len(), 0);
}

#[test]
fn unknown_contract_is_an_empty_set() {
	let finder = Finder::new(StoreLookup::new(MemoryStore::new()), TypeTableLoader::default());
	let set = finder.find("Nothing").unwrap();
	assert!(set.is_empty());
	assert!(set.first().is_err());
}

#[test]
fn manifest_to_directories_to_query() {
	let manifest: Manifest = r#"
[[type]]
name = "X"
kind = "interface"

[[type]]
name = "A"
implements = ["X"]

[[type]]
name = "B"
implements = ["X"]

[[provide]]
implementor = "A"
priority = 1
kind = "fast"
"#
	.parse()
	.unwrap();

	let options: RegistryOptions = "base_location = \"META-INF/services\"".parse().unwrap();
	let aggregator = Aggregator::new(options.clone()).unwrap();

	let app = tempfile::tempdir().unwrap();
	let plugin = tempfile::tempdir().unwrap();
	aggregator.run(&manifest, &FsStore::new(app.path()));
	std::fs::create_dir_all(plugin.path().join("META-INF").join("services")).unwrap();
	std::fs::write(plugin.path().join("META-INF").join("services").join("X"), "B\t7\nA\t99\n").unwrap();

	let lookup = DirLookup::new([app.path(), plugin.path()]).with_base(&options.base_location);
	let finder = Finder::new(lookup, TypeTableLoader::new(manifest.types()));
	let mut set = finder.find("X").unwrap();

	let entries: Vec<_> = set.iter().map(|i| (i.implementor(), i.priority())).collect();
	assert_eq!(entries, [("B", 7), ("A", 1)]);

	set.by_kind("fast").retain_any(&[]);
	assert_eq!(set.first().unwrap().name, "A");
}

#[test]
fn corrupt_stream_fails_the_query() {
	let store = MemoryStore::new().with("services/X", "A\tten\n");
	let finder = Finder::new(StoreLookup::new(store), TypeTableLoader::default());
	let err = finder.find("X").unwrap_err();
	assert!(err.to_string().contains("line 1"), "{err}");
}
