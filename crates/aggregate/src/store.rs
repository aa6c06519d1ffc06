//! Record stores used by the aggregator.

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use implreg_record::{RecordStore, location_path};
use parking_lot::Mutex;

/// Stores registry files under a root directory.
#[derive(Debug, Clone)]
pub struct FsStore {
	root: PathBuf,
}

impl FsStore {
	pub fn new(root: impl Into<PathBuf>) -> Self {
		Self { root: root.into() }
	}

	pub fn root(&self) -> &Path {
		&self.root
	}

	/// Fails with [`io::ErrorKind::InvalidInput`] for locations that would
	/// leave the root.
	pub fn path_of(&self, location: &str) -> io::Result<PathBuf> {
		location_path(&self.root, location)
	}
}

impl RecordStore for FsStore {
	fn read(&self, location: &str) -> io::Result<Option<String>> {
		match std::fs::read_to_string(self.path_of(location)?) {
			Ok(contents) => Ok(Some(contents)),
			Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
			Err(e) => Err(e),
		}
	}

	fn write(&self, location: &str, contents: &str) -> io::Result<()> {
		let path = self.path_of(location)?;
		if let Some(parent) = path.parent() {
			std::fs::create_dir_all(parent)?;
		}
		std::fs::write(path, contents)
	}
}

/// In-memory store, keyed by location.
#[derive(Debug, Default)]
pub struct MemoryStore {
	files: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with(self, location: impl Into<String>, contents: impl Into<String>) -> Self {
		self.files.lock().insert(location.into(), contents.into());
		self
	}

	pub fn get(&self, location: &str) -> Option<String> {
		self.files.lock().get(location).cloned()
	}

	/// Stored locations in lexical order.
	pub fn locations(&self) -> Vec<String> {
		self.files.lock().keys().cloned().collect()
	}
}

impl RecordStore for MemoryStore {
	fn read(&self, location: &str) -> io::Result<Option<String>> {
		Ok(self.get(location))
	}

	fn write(&self, location: &str, contents: &str) -> io::Result<()> {
		self.files.lock().insert(location.to_string(), contents.to_string());
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn fs_store_missing_file_is_none() {
		let dir = tempfile::tempdir().unwrap();
		let store = FsStore::new(dir.path());
		assert_eq!(store.read("services/app.Codec").unwrap(), None);
	}

	#[test]
	fn fs_store_creates_parent_directories() {
		let dir = tempfile::tempdir().unwrap();
		let store = FsStore::new(dir.path());
		store.write("services/nested/app.Codec", "a.A\n").unwrap();
		assert!(dir.path().join("services").join("nested").join("app.Codec").is_file());
		assert_eq!(store.read("services/nested/app.Codec").unwrap().as_deref(), Some("a.A\n"));
	}

	#[test]
	fn fs_store_directory_in_the_way_is_an_error() {
		let dir = tempfile::tempdir().unwrap();
		std::fs::create_dir_all(dir.path().join("services").join("app.Codec")).unwrap();
		let store = FsStore::new(dir.path());
		assert!(store.read("services/app.Codec").is_err());
		assert!(store.write("services/app.Codec", "x\n").is_err());
	}

	#[test]
	fn fs_store_rejects_locations_outside_the_root() {
		let dir = tempfile::tempdir().unwrap();
		let store = FsStore::new(dir.path().join("out"));
		let err = store.write("services/../../escaped", "x\n").unwrap_err();
		assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
		assert_eq!(store.read("services/../../escaped").unwrap_err().kind(), io::ErrorKind::InvalidInput);
		assert!(!dir.path().join("escaped").exists());
		assert!(!dir.path().join("out").exists());
	}

	#[test]
	fn memory_store_round_trips() {
		let store = MemoryStore::new().with("b", "2");
		store.write("a", "1").unwrap();
		assert_eq!(store.read("a").unwrap().as_deref(), Some("1"));
		assert_eq!(store.read("missing").unwrap(), None);
		assert_eq!(store.locations(), ["a", "b"]);
	}
}
