//! Contract inference for declared implementations.
//!
//! A [`Declaration`] says "this type provides a contract". When the contract is
//! named explicitly it is validated against the [`TypeUniverse`]; otherwise it
//! is inferred from the implementor's single non-root supertype or single
//! interface. Declarations reach the aggregator through a
//! [`DeclarationSource`](source::DeclarationSource).

pub mod resolve;
pub mod source;
pub mod types;

#[doc(hidden)]
pub use inventory;
pub use resolve::{ContractProblem, Declaration, ResolveError, resolve_contract};
pub use source::{DeclarationSource, LinkedSource, Manifest, ManifestError};
pub use types::{DEFAULT_ROOT, TypeDecl, TypeShape, TypeTable, TypeUniverse};
