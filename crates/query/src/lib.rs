//! Query side of the registry.
//!
//! A [`Finder`] reads the persisted records for a contract through a
//! [`LookupProvider`] and hands them over as a [`ResultSet`]: an owned list
//! ordered by descending priority that can be narrowed with composable
//! [`Predicate`]s. Loading an implementor (for [`ResultSet::first`] or the
//! assignability predicate) goes through an injected [`ImplementationLoader`].

mod error;
mod finder;
mod loader;
mod lookup;
pub mod predicates;
mod result_set;

pub use error::QueryError;
pub use finder::Finder;
pub use loader::{ImplementationLoader, LoadedType, TypeTableLoader};
pub use lookup::{DirLookup, LookupProvider, StoreLookup};
pub use predicates::{Field, Predicate, PredicateRef};
pub use result_set::ResultSet;
