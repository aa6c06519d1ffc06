//! Where declarations come from.
//!
//! Discovery is pluggable: anything that can hand over a list of
//! [`Declaration`]s together with the types they mention can feed the
//! aggregator. Two sources ship here: link-time registrations collected with
//! [`provided_implementation!`](crate::provided_implementation) and TOML
//! manifests.

mod linked;
mod manifest;

pub use linked::{ContractShape, LinkedSource, ProvidedContractReg, ProvidedReg, StaticContract, StaticDeclaration};
pub use manifest::{DeclarationSpec, Manifest, ManifestError, TypeSpec};

use crate::resolve::Declaration;
use crate::types::TypeTable;

/// Supplies declarations and the type universe they are resolved against.
pub trait DeclarationSource {
	fn declarations(&self) -> Vec<Declaration>;

	fn types(&self) -> TypeTable;
}
