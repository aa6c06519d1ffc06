use implreg_contract::{TypeTable, TypeUniverse};
use indexmap::IndexSet;

/// A resolved implementor type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedType {
	pub name: String,
	/// Every supertype and interface reachable from the type.
	pub ancestors: IndexSet<String>,
}

impl LoadedType {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			ancestors: IndexSet::new(),
		}
	}

	pub fn with_ancestor(mut self, ancestor: impl Into<String>) -> Self {
		self.ancestors.insert(ancestor.into());
		self
	}

	/// Returns true if this type is `target` or has it as an ancestor.
	pub fn is_assignable_to(&self, target: &str) -> bool {
		self.name == target || self.ancestors.contains(target)
	}
}

/// Turns an implementor identifier into a type handle.
pub trait ImplementationLoader: Send + Sync {
	/// Resolves `implementor` as an implementation of `contract`. Returns
	/// `None` if the implementor is unknown or not assignable to the contract.
	fn resolve(&self, implementor: &str, contract: &str) -> Option<LoadedType>;
}

/// Resolves implementors against a [`TypeTable`].
#[derive(Debug, Clone, Default)]
pub struct TypeTableLoader {
	table: TypeTable,
}

impl TypeTableLoader {
	pub fn new(table: TypeTable) -> Self {
		Self { table }
	}

	pub fn table(&self) -> &TypeTable {
		&self.table
	}
}

impl ImplementationLoader for TypeTableLoader {
	fn resolve(&self, implementor: &str, contract: &str) -> Option<LoadedType> {
		let decl = self.table.describe(implementor)?;
		if !self.table.assignable(decl, contract) {
			tracing::debug!(implementor, contract, "implementor is not assignable to its contract");
			return None;
		}
		Some(LoadedType {
			name: decl.name.clone(),
			ancestors: self.table.ancestors(decl),
		})
	}
}

#[cfg(test)]
mod tests {
	use implreg_contract::TypeDecl;

	use super::*;

	fn loader() -> TypeTableLoader {
		TypeTableLoader::new(
			TypeTable::default()
				.with(TypeDecl::interface("X"))
				.with(TypeDecl::interface("Fast"))
				.with(TypeDecl::class("A").implements("X").implements("Fast"))
				.with(TypeDecl::class("Stray")),
		)
	}

	#[test]
	fn resolves_assignable_implementors() {
		let loaded = loader().resolve("A", "X").unwrap();
		assert_eq!(loaded.name, "A");
		assert!(loaded.is_assignable_to("Fast"));
		assert!(loaded.is_assignable_to("A"));
		assert!(!loaded.is_assignable_to("Stray"));
	}

	#[test]
	fn unknown_or_unrelated_is_none() {
		assert_eq!(loader().resolve("Missing", "X"), None);
		assert_eq!(loader().resolve("Stray", "X"), None);
	}
}
