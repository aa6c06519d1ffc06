//! Filters applied to a [`ResultSet`].
//!
//! A predicate is asked about one record at a time and also sees the set it is
//! filtering, so it can reach the set's loader. The `any_mode` flag tells
//! composite predicates whether the surrounding filter combines with "any"
//! (true) or "all" (false) semantics.

use std::fmt;
use std::sync::Arc;

use implreg_record::ImplementationInfo;
use regex::Regex;

use crate::result_set::ResultSet;


/// Decides whether one record matches.
pub trait Predicate: Send + Sync {
	fn matches(&self, info: &ImplementationInfo, set: &ResultSet, any_mode: bool) -> bool;
}

impl<F> Predicate for F
where
	F: Fn(&ImplementationInfo, &ResultSet, bool) -> bool + Send + Sync,
{
	fn matches(&self, info: &ImplementationInfo, set: &ResultSet, any_mode: bool) -> bool {
		self(info, set, any_mode)
	}
}

/// Shared handle to a predicate, as stored in a set's pending buffer.
pub type PredicateRef = Arc<dyn Predicate>;

/// Which part of a record a predicate looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
	Implementor,
	Kind,
	Extras,
}

impl Field {
	/// The field's value, or `None` if the record leaves it absent.
	pub fn project(self, info: &ImplementationInfo) -> Option<&str> {
		match self {
			Self::Implementor => Some(info.implementor()),
			Self::Kind => info.kind(),
			Self::Extras => info.extras(),
		}
	}
}

impl fmt::Display for Field {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::Implementor => "implementor",
			Self::Kind => "kind",
			Self::Extras => "extras",
		})
	}
}

/// Matches records whose implementor loads as a subtype of `target`.
///
/// Loading goes through the set's loader. An implementor that cannot be
/// loaded never matches.
#[derive(Debug, Clone)]
pub struct AssignableTo {
	target: String,
}

impl AssignableTo {
	pub fn new(target: impl Into<String>) -> Self {
		Self { target: target.into() }
	}

	pub fn target(&self) -> &str {
		&self.target
	}
}

impl Predicate for AssignableTo {
	fn matches(&self, info: &ImplementationInfo, set: &ResultSet, _any_mode: bool) -> bool {
		set.resolve(info).is_some_and(|ty| ty.is_assignable_to(&self.target))
	}
}

/// Matches records whose projected field equals a value.
#[derive(Debug, Clone)]
pub struct FieldEquals {
	field: Field,
	value: String,
}

impl FieldEquals {
	pub fn new(field: Field, value: impl Into<String>) -> Self {
		Self { field, value: value.into() }
	}
}

impl Predicate for FieldEquals {
	fn matches(&self, info: &ImplementationInfo, _set: &ResultSet, _any_mode: bool) -> bool {
		self.field.project(info) == Some(self.value.as_str())
	}
}

/// Compares a projected field against several values.
///
/// Under "any" filtering one equal value suffices; under "all" filtering every
/// value must be equal.
#[derive(Debug, Clone)]
pub struct FieldEqualsEach {
	field: Field,
	values: Vec<String>,
}

impl FieldEqualsEach {
	pub fn new(field: Field, values: impl IntoIterator<Item = impl Into<String>>) -> Self {
		Self {
			field,
			values: values.into_iter().map(Into::into).collect(),
		}
	}
}

impl Predicate for FieldEqualsEach {
	fn matches(&self, info: &ImplementationInfo, _set: &ResultSet, any_mode: bool) -> bool {
		let projected = self.field.project(info);
		let equal = |value: &String| projected == Some(value.as_str());
		if any_mode {
			self.values.iter().any(equal)
		} else {
			self.values.iter().all(equal)
		}
	}
}

/// Matches records whose projected field fully matches a pattern.
#[derive(Debug, Clone)]
pub struct FieldMatches {
	field: Field,
	pattern: Regex,
}

impl FieldMatches {
	/// Compiles `pattern`, anchored at both ends.
	pub fn new(field: Field, pattern: &str) -> Result<Self, regex::Error> {
		Ok(Self {
			field,
			pattern: Regex::new(&format!("^(?:{pattern})$"))?,
		})
	}

	pub fn pattern(&self) -> &Regex {
		&self.pattern
	}
}

impl Predicate for FieldMatches {
	fn matches(&self, info: &ImplementationInfo, _set: &ResultSet, _any_mode: bool) -> bool {
		self.field.project(info).is_some_and(|value| self.pattern.is_match(value))
	}
}

pub fn assignable_to(target: impl Into<String>) -> PredicateRef {
	Arc::new(AssignableTo::new(target))
}

pub fn field_equals(field: Field, value: impl Into<String>) -> PredicateRef {
	Arc::new(FieldEquals::new(field, value))
}

pub fn field_equals_each(field: Field, values: impl IntoIterator<Item = impl Into<String>>) -> PredicateRef {
	Arc::new(FieldEqualsEach::new(field, values))
}

pub fn field_matches(field: Field, pattern: &str) -> Result<PredicateRef, regex::Error> {
	Ok(Arc::new(FieldMatches::new(field, pattern)?))
}

pub fn kind_equals(kind: impl Into<String>) -> PredicateRef {
	field_equals(Field::Kind, kind)
}

pub fn kind_in(kinds: impl IntoIterator<Item = impl Into<String>>) -> PredicateRef {
	field_equals_each(Field::Kind, kinds)
}

pub fn kind_matches(pattern: &str) -> Result<PredicateRef, regex::Error> {
	field_matches(Field::Kind, pattern)
}

pub fn implementor_equals(name: impl Into<String>) -> PredicateRef {
	field_equals(Field::Implementor, name)
}

pub fn implementor_in(names: impl IntoIterator<Item = impl Into<String>>) -> PredicateRef {
	field_equals_each(Field::Implementor, names)
}

pub fn implementor_matches(pattern: &str) -> Result<PredicateRef, regex::Error> {
	field_matches(Field::Implementor, pattern)
}
