//! Where registry files live.
//!
//! Locations are `/`-separated relative paths such as `services/app.Codec`:
//! the base location followed by the contract name.

use std::io;
use std::path::{Component, Path, PathBuf};

/// Directory prefix for persisted registry files when none is configured.
pub const DEFAULT_BASE_LOCATION: &str = "services/";

/// Reads and writes registry files by location.
pub trait RecordStore: Send + Sync {
	/// Returns the file contents, or `None` if nothing is stored there.
	fn read(&self, location: &str) -> io::Result<Option<String>>;

	/// Replaces the file at `location`.
	fn write(&self, location: &str, contents: &str) -> io::Result<()>;
}

/// Appends a trailing `/` to a non-empty base location that lacks one.
pub fn normalize_base(base: &str) -> String {
	if base.is_empty() || base.ends_with('/') {
		base.to_string()
	} else {
		format!("{base}/")
	}
}

/// Joins `location` onto `root`.
///
/// Empty segments are skipped. Any segment that is not a plain file name
/// (`..`, `.`, an absolute path or a drive prefix) is rejected with
/// [`io::ErrorKind::InvalidInput`], so the result never leaves `root`.
pub fn location_path(root: &Path, location: &str) -> io::Result<PathBuf> {
	let mut path = root.to_path_buf();
	for part in location.split('/').filter(|part| !part.is_empty()) {
		let mut components = Path::new(part).components();
		match (components.next(), components.next()) {
			(Some(Component::Normal(name)), None) => path.push(name),
			_ => {
				return Err(io::Error::new(
					io::ErrorKind::InvalidInput,
					format!("location {location:?} has invalid segment {part:?}"),
				));
			}
		}
	}
	Ok(path)
}
