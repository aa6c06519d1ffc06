//! Ordered, filterable view of the implementations registered for a contract.

use std::cmp::Reverse;
use std::fmt;
use std::sync::Arc;

use implreg_record::{ImplementationInfo, union_into};
use indexmap::IndexSet;

use crate::error::QueryError;
use crate::loader::{ImplementationLoader, LoadedType};
use crate::predicates::{self, PredicateRef};


/// Implementations of one contract, highest priority first.
///
/// Entries are unique by implementor. Equal priorities keep the order in which
/// the entries were first inserted.
///
/// Filtering methods take an explicit predicate list. An empty list falls back
/// to the pending predicates set with [`use_predicates`](Self::use_predicates)
/// or one of the `by_*` builders; a non-empty list replaces them. After a
/// filter the pending predicates are cleared unless
/// [`consume_predicates_on_filter`](Self::consume_predicates_on_filter) was
/// turned off.
///
/// `Clone` produces an independent copy of the entry list. Predicates and the
/// loader are shared.
#[derive(Clone)]
pub struct ResultSet {
	contract: String,
	loader: Arc<dyn ImplementationLoader>,
	entries: Vec<ImplementationInfo>,
	pending: Vec<PredicateRef>,
	consume_on_filter: bool,
}

impl ResultSet {
	pub fn new(contract: impl Into<String>, loader: Arc<dyn ImplementationLoader>, infos: impl IntoIterator<Item = ImplementationInfo>) -> Self {
		let mut set = Self {
			contract: contract.into(),
			loader,
			entries: Vec::new(),
			pending: Vec::new(),
			consume_on_filter: true,
		};
		set.join(infos);
		set
	}

	pub fn contract(&self) -> &str {
		&self.contract
	}

	pub fn loader(&self) -> &Arc<dyn ImplementationLoader> {
		&self.loader
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn clear(&mut self) -> &mut Self {
		self.entries.clear();
		self
	}

	/// Entries from highest to lowest priority. Reverse it to walk the
	/// lowest priority first.
	pub fn iter(&self) -> std::slice::Iter<'_, ImplementationInfo> {
		self.entries.iter()
	}

	pub fn as_slice(&self) -> &[ImplementationInfo] {
		&self.entries
	}

	/// The highest-priority entry.
	pub fn first_info(&self) -> Result<&ImplementationInfo, QueryError> {
		self.entries.first().ok_or_else(|| QueryError::Empty {
			contract: self.contract.clone(),
		})
	}

	/// Loads the highest-priority entry.
	pub fn first(&self) -> Result<LoadedType, QueryError> {
		let info = self.first_info()?;
		self.resolve(info).ok_or_else(|| QueryError::Unresolved {
			implementor: info.implementor().to_string(),
			contract: self.contract.clone(),
		})
	}

	/// Loads `info` as an implementation of this set's contract.
	pub fn resolve(&self, info: &ImplementationInfo) -> Option<LoadedType> {
		self.loader.resolve(info.implementor(), &self.contract)
	}

	/// Adds every record whose implementor is not present yet, then re-sorts.
	/// Existing entries are never replaced.
	pub fn join(&mut self, infos: impl IntoIterator<Item = ImplementationInfo>) -> &mut Self {
		let mut merged: IndexSet<ImplementationInfo> = self.entries.drain(..).collect();
		union_into(&mut merged, infos);
		self.entries = merged.into_iter().collect();
		self.entries.sort_by_key(|info| Reverse(info.priority()));
		self
	}

	/// [`join`](Self::join) with the entries of another set.
	pub fn join_set(&mut self, other: &ResultSet) -> &mut Self {
		self.join(other.entries.iter().cloned())
	}

	/// Replaces the pending predicates.
	pub fn use_predicates(&mut self, predicates: &[PredicateRef]) -> &mut Self {
		self.pending = predicates.to_vec();
		self
	}

	/// Clears the pending predicates.
	pub fn forget(&mut self) -> &mut Self {
		self.pending.clear();
		self
	}

	pub fn pending(&self) -> &[PredicateRef] {
		&self.pending
	}

	pub fn consume_predicates_on_filter(&mut self, consume: bool) -> &mut Self {
		self.consume_on_filter = consume;
		self
	}

	pub fn consumes_predicates_on_filter(&self) -> bool {
		self.consume_on_filter
	}

	/// Keeps entries matching at least one predicate.
	pub fn retain_any(&mut self, predicates: &[PredicateRef]) -> &mut Self {
		self.filter(false, false, predicates)
	}

	/// Removes entries matching at least one predicate.
	pub fn remove_any(&mut self, predicates: &[PredicateRef]) -> &mut Self {
		self.filter(true, false, predicates)
	}

	/// Keeps entries matching every predicate.
	pub fn retain_all(&mut self, predicates: &[PredicateRef]) -> &mut Self {
		self.filter(false, true, predicates)
	}

	/// Removes entries matching every predicate.
	pub fn remove_all(&mut self, predicates: &[PredicateRef]) -> &mut Self {
		self.filter(true, true, predicates)
	}

	/// Removes every entry whose match result equals `remove_on_match`.
	///
	/// In "any" mode an entry matches once one predicate matches; in "all"
	/// mode it matches unless one predicate fails. Evaluation per entry stops
	/// at the first deciding predicate.
	///
	/// Entries are removed as the pass goes, so predicates observe the set
	/// without the entries already removed in this pass.
	pub fn filter(&mut self, remove_on_match: bool, all_mode: bool, predicates: &[PredicateRef]) -> &mut Self {
		if !predicates.is_empty() {
			self.use_predicates(predicates);
		}

		if !self.pending.is_empty() {
			let any_mode = !all_mode;
			let before = self.entries.len();
			let mut index = 0;
			while index < self.entries.len() {
				let info = &self.entries[index];
				let decided = self.pending.iter().any(|p| p.matches(info, self, any_mode) == any_mode);
				let matched = if decided { any_mode } else { all_mode };
				if matched == remove_on_match {
					self.entries.remove(index);
				} else {
					index += 1;
				}
			}
			tracing::trace!(contract = %self.contract, before, after = self.entries.len(), "filtered result set");
		}

		if self.consume_on_filter {
			self.pending.clear();
		}
		self
	}

	pub fn by_kind(&mut self, kind: impl Into<String>) -> &mut Self {
		self.use_predicates(&[predicates::kind_equals(kind)])
	}

	pub fn by_kinds(&mut self, kinds: impl IntoIterator<Item = impl Into<String>>) -> &mut Self {
		self.use_predicates(&[predicates::kind_in(kinds)])
	}

	pub fn by_kind_pattern(&mut self, pattern: &str) -> Result<&mut Self, regex::Error> {
		Ok(self.use_predicates(&[predicates::kind_matches(pattern)?]))
	}

	pub fn by_implementor(&mut self, name: impl Into<String>) -> &mut Self {
		self.use_predicates(&[predicates::implementor_equals(name)])
	}

	pub fn by_implementors(&mut self, names: impl IntoIterator<Item = impl Into<String>>) -> &mut Self {
		self.use_predicates(&[predicates::implementor_in(names)])
	}

	pub fn by_implementor_pattern(&mut self, pattern: &str) -> Result<&mut Self, regex::Error> {
		Ok(self.use_predicates(&[predicates::implementor_matches(pattern)?]))
	}

	pub fn by_assignable(&mut self, target: impl Into<String>) -> &mut Self {
		self.use_predicates(&[predicates::assignable_to(target)])
	}

	/// One assignability predicate per target.
	pub fn by_assignable_any(&mut self, targets: impl IntoIterator<Item = impl Into<String>>) -> &mut Self {
		let preds: Vec<PredicateRef> = targets.into_iter().map(predicates::assignable_to).collect();
		self.use_predicates(&preds)
	}
}

impl fmt::Debug for ResultSet {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ResultSet")
			.field("contract", &self.contract)
			.field("entries", &self.entries)
			.field("pending", &self.pending.len())
			.field("consume_on_filter", &self.consume_on_filter)
			.finish_non_exhaustive()
	}
}

impl<'a> IntoIterator for &'a ResultSet {
	type Item = &'a ImplementationInfo;
	type IntoIter = std::slice::Iter<'a, ImplementationInfo>;

	fn into_iter(self) -> Self::IntoIter {
		self.entries.iter()
	}
}

impl IntoIterator for ResultSet {
	type Item = ImplementationInfo;
	type IntoIter = std::vec::IntoIter<ImplementationInfo>;

	fn into_iter(self) -> Self::IntoIter {
		self.entries.into_iter()
	}
}
