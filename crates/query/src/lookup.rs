//! Locating the raw record streams for a contract.

use std::fs::File;
use std::io::{self, Cursor, Read};
use std::path::{Path, PathBuf};

use implreg_record::{DEFAULT_BASE_LOCATION, RecordStore, location_path, normalize_base};

/// Finds the persisted record streams registered for a contract.
pub trait LookupProvider: Send + Sync {
	/// Opens every stream for `contract`, in precedence order. An empty list
	/// means nothing is registered.
	fn lookup(&self, contract: &str) -> io::Result<Vec<Box<dyn Read>>>;
}

/// Looks up `{base}{contract}` under an ordered list of root directories.
///
/// Each root contributes at most one stream. Roots without the file are
/// skipped.
#[derive(Debug, Clone)]
pub struct DirLookup {
	roots: Vec<PathBuf>,
	base: String,
}

impl DirLookup {
	pub fn new(roots: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
		Self {
			roots: roots.into_iter().map(Into::into).collect(),
			base: DEFAULT_BASE_LOCATION.to_string(),
		}
	}

	pub fn with_base(mut self, base: &str) -> Self {
		self.base = normalize_base(base);
		self
	}

	pub fn base(&self) -> &str {
		&self.base
	}

	pub fn roots(&self) -> &[PathBuf] {
		&self.roots
	}

	fn path_in(&self, root: &Path, contract: &str) -> io::Result<PathBuf> {
		location_path(root, &format!("{}{contract}", self.base))
	}
}

impl LookupProvider for DirLookup {
	fn lookup(&self, contract: &str) -> io::Result<Vec<Box<dyn Read>>> {
		let mut streams: Vec<Box<dyn Read>> = Vec::new();
		for root in &self.roots {
			let path = self.path_in(root, contract)?;
			match File::open(&path) {
				Ok(file) => {
					tracing::trace!(path = %path.display(), "found registry file");
					streams.push(Box::new(file));
				}
				Err(e) if e.kind() == io::ErrorKind::NotFound => {}
				Err(e) => return Err(e),
			}
		}
		Ok(streams)
	}
}

/// Serves lookups from a [`RecordStore`].
#[derive(Debug, Clone)]
pub struct StoreLookup<S> {
	store: S,
	base: String,
}

impl<S: RecordStore> StoreLookup<S> {
	pub fn new(store: S) -> Self {
		Self {
			store,
			base: DEFAULT_BASE_LOCATION.to_string(),
		}
	}

	pub fn with_base(mut self, base: &str) -> Self {
		self.base = normalize_base(base);
		self
	}

	pub fn store(&self) -> &S {
		&self.store
	}
}

impl<S: RecordStore> LookupProvider for StoreLookup<S> {
	fn lookup(&self, contract: &str) -> io::Result<Vec<Box<dyn Read>>> {
		let location = format!("{}{contract}", self.base);
		Ok(self
			.store
			.read(&location)?
			.map(|contents| Box::new(Cursor::new(contents.into_bytes())) as Box<dyn Read>)
			.into_iter()
			.collect())
	}
}

#[cfg(test)]
mod tests {
	use implreg_aggregate::MemoryStore;

	use super::*;

	fn read_all(streams: Vec<Box<dyn Read>>) -> Vec<String> {
		streams
			.into_iter()
			.map(|mut s| {
				let mut out = String::new();
				s.read_to_string(&mut out).unwrap();
				out
			})
			.collect()
	}

	#[test]
	fn dir_lookup_reads_every_root_in_order() {
		let first = tempfile::tempdir().unwrap();
		let empty = tempfile::tempdir().unwrap();
		let second = tempfile::tempdir().unwrap();
		for (dir, contents) in [(&first, "A\n"), (&second, "B\n")] {
			std::fs::create_dir_all(dir.path().join("META-INF").join("services")).unwrap();
			std::fs::write(dir.path().join("META-INF").join("services").join("X"), contents).unwrap();
		}

		let lookup = DirLookup::new([first.path(), empty.path(), second.path()]).with_base("META-INF/services");
		assert_eq!(lookup.base(), "META-INF/services/");
		assert_eq!(read_all(lookup.lookup("X").unwrap()), ["A\n", "B\n"]);
		assert!(lookup.lookup("Y").unwrap().is_empty());
	}

	#[test]
	fn dir_lookup_rejects_contracts_outside_the_roots() {
		let dir = tempfile::tempdir().unwrap();
		std::fs::write(dir.path().join("secret"), "S\n").unwrap();
		let root = dir.path().join("root");
		std::fs::create_dir_all(root.join("services")).unwrap();

		let lookup = DirLookup::new([&root]);
		let err = lookup.lookup("../../secret").err().unwrap();
		assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
	}

	#[test]
	fn store_lookup_reads_one_stream() {
		let lookup = StoreLookup::new(MemoryStore::new().with("services/X", "A\t3\n"));
		assert_eq!(read_all(lookup.lookup("X").unwrap()), ["A\t3\n"]);
		assert!(lookup.lookup("Y").unwrap().is_empty());
	}
}
