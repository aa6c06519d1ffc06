//! Contract inference and validation for a single declaration.

use std::fmt;

use implreg_record::{ImplementationInfo, InfoError};
use thiserror::Error;

use crate::types::{TypeDecl, TypeShape, TypeUniverse};


/// An implementor's claim to provide a contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
	/// The implementing type as declared.
	pub implementor: TypeDecl,
	/// Explicitly named contract. `None` asks for inference.
	pub contract: Option<String>,
	pub priority: i32,
	pub kind: Option<String>,
	pub extras: Option<String>,
}

impl Declaration {
	pub fn new(implementor: TypeDecl) -> Self {
		Self {
			implementor,
			contract: None,
			priority: 0,
			kind: None,
			extras: None,
		}
	}

	pub fn of(mut self, contract: impl Into<String>) -> Self {
		self.contract = Some(contract.into());
		self
	}

	pub fn with_priority(mut self, priority: i32) -> Self {
		self.priority = priority;
		self
	}

	pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
		self.kind = Some(kind.into());
		self
	}

	pub fn with_extras(mut self, extras: impl Into<String>) -> Self {
		self.extras = Some(extras.into());
		self
	}

	pub fn implementor_name(&self) -> &str {
		&self.implementor.name
	}

	/// Builds the registry record for this declaration.
	pub fn to_info(&self) -> Result<ImplementationInfo, InfoError> {
		Ok(ImplementationInfo::new(self.implementor.name.clone())?
			.with_priority(self.priority)
			.with_kind(self.kind.clone().unwrap_or_default())
			.with_extras(self.extras.clone().unwrap_or_default()))
	}
}

/// Why an explicitly named contract was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractProblem {
	/// The name does not denote a declared type.
	Undeclared,
	/// The universal root type cannot be a contract.
	Root,
	/// Final classes cannot be extended.
	Sealed,
	/// The implementor does not extend the contract class.
	NotSupertype,
	/// The implementor does not implement the contract interface.
	NotImplemented,
	/// Neither a class nor an interface.
	WrongKind(String),
}

impl fmt::Display for ContractProblem {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Undeclared => write!(f, "has wrong type"),
			Self::Root => write!(f, "is not really a base class"),
			Self::Sealed => write!(f, "is final"),
			Self::NotSupertype => write!(f, "is not a base class of the implementor"),
			Self::NotImplemented => write!(f, "is not implemented by the implementor"),
			Self::WrongKind(kind) => write!(f, "is a {kind}"),
		}
	}
}

/// Rejection of one declaration. Sibling declarations are unaffected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
	/// The declaration has no implementor name.
	#[error("declaration has an empty implementor name")]
	EmptyName,
	/// The implementor is abstract or not a class.
	#[error("{implementor}: declared implementation must be a concrete class")]
	NotConcrete { implementor: String },
	/// No explicit contract and none could be inferred.
	#[error("{implementor}: contract could not be inferred, declare it explicitly")]
	NotInferable { implementor: String },
	/// The explicit contract failed validation.
	#[error("{implementor}: explicit contract {contract} {problem}")]
	InvalidContract {
		implementor: String,
		contract: String,
		problem: ContractProblem,
	},
}

impl ResolveError {
	/// True for contract validation failures, false for malformed or
	/// non-inferable declarations.
	pub fn is_contract_validation(&self) -> bool {
		matches!(self, Self::InvalidContract { .. })
	}
}

/// Decides which contract `decl` satisfies.
pub fn resolve_contract<U>(universe: &U, decl: &Declaration) -> Result<String, ResolveError>
where
	U: TypeUniverse + ?Sized,
{
	let ty = &decl.implementor;
	if ty.name.is_empty() {
		return Err(ResolveError::EmptyName);
	}
	if !ty.shape.is_concrete_class() {
		return Err(ResolveError::NotConcrete {
			implementor: ty.name.clone(),
		});
	}

	match &decl.contract {
		Some(contract) => validate_explicit(universe, ty, contract).map(|()| contract.clone()),
		None => infer(universe, ty),
	}
}

fn validate_explicit<U>(universe: &U, ty: &TypeDecl, contract: &str) -> Result<(), ResolveError>
where
	U: TypeUniverse + ?Sized,
{
	let reject = |problem| ResolveError::InvalidContract {
		implementor: ty.name.clone(),
		contract: contract.to_string(),
		problem,
	};

	let Some(target) = universe.describe(contract) else {
		return Err(reject(ContractProblem::Undeclared));
	};

	match &target.shape {
		TypeShape::Class { root: true, .. } => Err(reject(ContractProblem::Root)),
		TypeShape::Class { sealed: true, .. } => Err(reject(ContractProblem::Sealed)),
		TypeShape::Class { .. } if universe.extends(ty, contract) => Ok(()),
		TypeShape::Class { .. } => Err(reject(ContractProblem::NotSupertype)),
		TypeShape::Interface if universe.assignable(ty, contract) => Ok(()),
		TypeShape::Interface => Err(reject(ContractProblem::NotImplemented)),
		TypeShape::Other(kind) => Err(reject(ContractProblem::WrongKind(kind.clone()))),
	}
}

fn infer<U>(universe: &U, ty: &TypeDecl) -> Result<String, ResolveError>
where
	U: TypeUniverse + ?Sized,
{
	let base = ty.supertype.as_deref().filter(|s| !universe.is_root(s));
	let single_interface = match ty.interfaces.as_slice() {
		[only] => Some(only.as_str()),
		_ => None,
	};

	match (base, single_interface) {
		(Some(base), None) => Ok(base.to_string()),
		(None, Some(interface)) => Ok(interface.to_string()),
		_ => Err(ResolveError::NotInferable {
			implementor: ty.name.clone(),
		}),
	}
}
