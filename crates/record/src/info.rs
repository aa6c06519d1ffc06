use std::fmt;
use std::hash::{Hash, Hasher};

use indexmap::IndexSet;

use crate::error::InfoError;

/// One implementor registered for a contract.
///
/// Equality and hashing only look at [`implementor`](Self::implementor). Two
/// records naming the same implementor are the same set key even when their
/// priority, kind or extras differ, which makes every union in the registry an
/// insert-if-absent.
#[derive(Clone)]
pub struct ImplementationInfo {
	implementor: String,
	priority: i32,
	kind: Option<String>,
	extras: Option<String>,
}

impl ImplementationInfo {
	/// Creates a record with priority 0 and no kind or extras.
	pub fn new(implementor: impl Into<String>) -> Result<Self, InfoError> {
		let implementor = implementor.into();
		if implementor.is_empty() {
			return Err(InfoError::EmptyIdentifier);
		}
		Ok(Self {
			implementor,
			priority: 0,
			kind: None,
			extras: None,
		})
	}

	/// Sets the priority. Higher sorts first.
	pub fn with_priority(mut self, priority: i32) -> Self {
		self.priority = priority;
		self
	}

	/// Sets the classification kind. An empty kind counts as absent.
	pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
		self.kind = non_empty(kind.into());
		self
	}

	/// Sets the opaque payload. An empty payload counts as absent.
	pub fn with_extras(mut self, extras: impl Into<String>) -> Self {
		self.extras = non_empty(extras.into());
		self
	}

	pub fn implementor(&self) -> &str {
		&self.implementor
	}

	pub fn priority(&self) -> i32 {
		self.priority
	}

	pub fn kind(&self) -> Option<&str> {
		self.kind.as_deref()
	}

	pub fn extras(&self) -> Option<&str> {
		self.extras.as_deref()
	}

	/// Returns true if every field, not just the identity, matches `other`.
	pub fn same_fields(&self, other: &Self) -> bool {
		self.implementor == other.implementor
			&& self.priority == other.priority
			&& self.kind == other.kind
			&& self.extras == other.extras
	}
}

fn non_empty(value: String) -> Option<String> {
	(!value.is_empty()).then_some(value)
}

impl PartialEq for ImplementationInfo {
	fn eq(&self, other: &Self) -> bool {
		self.implementor == other.implementor
	}
}

impl Eq for ImplementationInfo {}

impl Hash for ImplementationInfo {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.implementor.hash(state);
	}
}

impl fmt::Debug for ImplementationInfo {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut s = f.debug_struct("ImplementationInfo");
		s.field("implementor", &self.implementor).field("priority", &self.priority);
		if let Some(kind) = &self.kind {
			s.field("kind", kind);
		}
		if let Some(extras) = &self.extras {
			s.field("extras", extras);
		}
		s.finish()
	}
}

impl fmt::Display for ImplementationInfo {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} (priority {})", self.implementor, self.priority)?;
		if let Some(kind) = &self.kind {
			write!(f, " [{kind}]")?;
		}
		Ok(())
	}
}

/// Inserts every record from `incoming` that is not already in `set`.
///
/// Returns how many records were added. Records whose implementor is already
/// present are dropped, whatever their other fields say.
pub fn union_into(set: &mut IndexSet<ImplementationInfo>, incoming: impl IntoIterator<Item = ImplementationInfo>) -> usize {
	let before = set.len();
	for info in incoming {
		set.insert(info);
	}
	set.len() - before
}
