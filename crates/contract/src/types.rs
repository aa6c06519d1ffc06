//! Declared-type model consulted by contract inference.
//!
//! Types are described by name. A [`TypeUniverse`] answers what a name denotes;
//! [`TypeTable`] is the in-memory universe used by manifests, link-time
//! declarations and tests.

use std::collections::HashSet;

use indexmap::{IndexMap, IndexSet};

/// Name of the universal root type when none is configured.
pub const DEFAULT_ROOT: &str = "Object";

/// What kind of declared type a name denotes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeShape {
	/// A class-like type.
	Class {
		/// The universal root every class implicitly extends.
		root: bool,
		/// Cannot be extended.
		sealed: bool,
		/// Can be instantiated (not abstract).
		concrete: bool,
	},
	/// An interface-like type.
	Interface,
	/// Any other declared kind (enum, annotation, alias, ...), by name.
	Other(String),
}

impl TypeShape {
	pub fn is_concrete_class(&self) -> bool {
		matches!(self, Self::Class { concrete: true, .. })
	}
}

/// A declared type with its direct supertype and interfaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDecl {
	pub name: String,
	pub shape: TypeShape,
	pub supertype: Option<String>,
	pub interfaces: Vec<String>,
}

impl TypeDecl {
	/// A concrete, extensible class with no declared supertype.
	pub fn class(name: impl Into<String>) -> Self {
		Self::with_shape(
			name,
			TypeShape::Class {
				root: false,
				sealed: false,
				concrete: true,
			},
		)
	}

	pub fn interface(name: impl Into<String>) -> Self {
		Self::with_shape(name, TypeShape::Interface)
	}

	pub fn other(name: impl Into<String>, kind: impl Into<String>) -> Self {
		Self::with_shape(name, TypeShape::Other(kind.into()))
	}

	pub fn with_shape(name: impl Into<String>, shape: TypeShape) -> Self {
		Self {
			name: name.into(),
			shape,
			supertype: None,
			interfaces: Vec::new(),
		}
	}

	/// Marks a class abstract. No effect on other shapes.
	pub fn abstract_class(mut self) -> Self {
		if let TypeShape::Class { concrete, .. } = &mut self.shape {
			*concrete = false;
		}
		self
	}

	/// Marks a class final. No effect on other shapes.
	pub fn sealed(mut self) -> Self {
		if let TypeShape::Class { sealed, .. } = &mut self.shape {
			*sealed = true;
		}
		self
	}

	pub fn extends(mut self, supertype: impl Into<String>) -> Self {
		self.supertype = Some(supertype.into());
		self
	}

	pub fn implements(mut self, interface: impl Into<String>) -> Self {
		self.interfaces.push(interface.into());
		self
	}
}

/// Answers what declared type a name denotes.
pub trait TypeUniverse {
	/// Returns the declaration for `name`, or `None` if the name does not
	/// denote a declared type.
	fn describe(&self, name: &str) -> Option<&TypeDecl>;

	/// Returns true if `name` is the universal root type.
	fn is_root(&self, name: &str) -> bool {
		matches!(self.describe(name).map(|t| &t.shape), Some(TypeShape::Class { root: true, .. }))
	}

	/// Returns true if `ty` is `target` or reaches it through its supertype chain.
	fn extends(&self, ty: &TypeDecl, target: &str) -> bool {
		if ty.name == target {
			return true;
		}
		let mut seen: HashSet<&str> = HashSet::new();
		let mut next = ty.supertype.as_deref();
		while let Some(name) = next {
			if name == target {
				return true;
			}
			if !seen.insert(name) {
				return false;
			}
			next = self.describe(name).and_then(|t| t.supertype.as_deref());
		}
		false
	}

	/// Returns true if a value of `ty` is assignable to `target`, through
	/// supertypes, interfaces and super-interfaces.
	fn assignable(&self, ty: &TypeDecl, target: &str) -> bool {
		ty.name == target || self.ancestors(ty).contains(target)
	}

	/// Every supertype and interface reachable from `ty`, nearest first.
	fn ancestors(&self, ty: &TypeDecl) -> IndexSet<String> {
		let mut out: IndexSet<String> = IndexSet::new();
		let mut queue: Vec<String> = direct_parents(ty).collect();
		let mut cursor = 0;
		while cursor < queue.len() {
			let name = queue[cursor].clone();
			cursor += 1;
			if name == ty.name || !out.insert(name.clone()) {
				continue;
			}
			if let Some(decl) = self.describe(&name) {
				queue.extend(direct_parents(decl));
			}
		}
		out
	}
}

fn direct_parents(ty: &TypeDecl) -> impl Iterator<Item = String> + '_ {
	ty.supertype.iter().chain(ty.interfaces.iter()).cloned()
}

/// In-memory [`TypeUniverse`] keyed by type name.
///
/// The root type is always present. Inserting a declaration under the root's
/// name is ignored.
#[derive(Debug, Clone)]
pub struct TypeTable {
	root: String,
	types: IndexMap<String, TypeDecl>,
}

impl Default for TypeTable {
	fn default() -> Self {
		Self::new(DEFAULT_ROOT)
	}
}

impl TypeTable {
	pub fn new(root: impl Into<String>) -> Self {
		let root = root.into();
		let mut types = IndexMap::new();
		types.insert(
			root.clone(),
			TypeDecl::with_shape(
				root.clone(),
				TypeShape::Class {
					root: true,
					sealed: false,
					concrete: true,
				},
			),
		);
		Self { root, types }
	}

	pub fn root(&self) -> &str {
		&self.root
	}

	/// Adds or replaces a declaration. Returns the replaced one.
	pub fn insert(&mut self, decl: TypeDecl) -> Option<TypeDecl> {
		if decl.name == self.root {
			return None;
		}
		self.types.insert(decl.name.clone(), decl)
	}

	pub fn with(mut self, decl: TypeDecl) -> Self {
		self.insert(decl);
		self
	}

	pub fn get(&self, name: &str) -> Option<&TypeDecl> {
		self.types.get(name)
	}

	pub fn len(&self) -> usize {
		self.types.len()
	}

	pub fn is_empty(&self) -> bool {
		self.types.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = &TypeDecl> {
		self.types.values()
	}
}

impl TypeUniverse for TypeTable {
	fn describe(&self, name: &str) -> Option<&TypeDecl> {
		self.types.get(name)
	}

	fn is_root(&self, name: &str) -> bool {
		name == self.root
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn table() -> TypeTable {
		TypeTable::default()
			.with(TypeDecl::interface("Codec"))
			.with(TypeDecl::interface("Streaming").implements("Codec"))
			.with(TypeDecl::class("Base").abstract_class().implements("Streaming"))
			.with(TypeDecl::class("Gzip").extends("Base"))
	}

	#[test]
	fn root_is_always_declared() {
		let table = TypeTable::new("Any");
		assert!(table.is_root("Any"));
		assert!(!table.is_root("Object"));
		assert!(table.get("Any").is_some());
	}

	#[test]
	fn extends_walks_the_supertype_chain() {
		let table = table();
		let gzip = table.get("Gzip").unwrap();
		assert!(table.extends(gzip, "Base"));
		assert!(table.extends(gzip, "Gzip"));
		assert!(!table.extends(gzip, "Codec"));
	}

	#[test]
	fn ancestors_include_super_interfaces() {
		let table = table();
		let gzip = table.get("Gzip").unwrap();
		let ancestors: Vec<_> = table.ancestors(gzip).into_iter().collect();
		assert_eq!(ancestors, ["Base", "Streaming", "Codec"]);
		assert!(table.assignable(gzip, "Codec"));
	}

	#[test]
	fn cycles_terminate() {
		let table = TypeTable::default()
			.with(TypeDecl::class("A").extends("B"))
			.with(TypeDecl::class("B").extends("A"));
		let a = table.get("A").unwrap();
		assert!(!table.extends(a, "C"));
		assert_eq!(table.ancestors(a).len(), 1);
	}
}
