use super::DeclarationSource;
use crate::resolve::Declaration;
use crate::types::{TypeDecl, TypeShape, TypeTable};

/// A declaration registered at link time.
#[derive(Debug)]
pub struct StaticDeclaration {
	pub implementor: &'static str,
	pub contract: Option<&'static str>,
	pub supertype: Option<&'static str>,
	pub interfaces: &'static [&'static str],
	pub concrete: bool,
	pub priority: i32,
	pub kind: Option<&'static str>,
	pub extras: Option<&'static str>,
}

impl StaticDeclaration {
	fn type_decl(&self) -> TypeDecl {
		TypeDecl {
			name: self.implementor.to_string(),
			shape: TypeShape::Class {
				root: false,
				sealed: false,
				concrete: self.concrete,
			},
			supertype: self.supertype.map(str::to_string),
			interfaces: self.interfaces.iter().map(|s| s.to_string()).collect(),
		}
	}

	pub fn to_declaration(&self) -> Declaration {
		Declaration {
			implementor: self.type_decl(),
			contract: self.contract.map(str::to_string),
			priority: self.priority,
			kind: self.kind.map(str::to_string),
			extras: self.extras.map(str::to_string),
		}
	}
}

/// Registry wrapper for link-time implementation declarations.
pub struct ProvidedReg(pub &'static StaticDeclaration);
inventory::collect!(ProvidedReg);

/// Shape of a contract type registered with [`provided_contract!`](crate::provided_contract).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractShape {
	Interface,
	Class,
	AbstractClass,
	FinalClass,
}

/// A contract type registered at link time.
#[derive(Debug)]
pub struct StaticContract {
	pub name: &'static str,
	pub shape: ContractShape,
	pub supertype: Option<&'static str>,
	pub interfaces: &'static [&'static str],
}

impl StaticContract {
	fn type_decl(&self) -> TypeDecl {
		let class = |sealed, concrete| TypeShape::Class {
			root: false,
			sealed,
			concrete,
		};
		let shape = match self.shape {
			ContractShape::Interface => TypeShape::Interface,
			ContractShape::Class => class(false, true),
			ContractShape::AbstractClass => class(false, false),
			ContractShape::FinalClass => class(true, true),
		};
		TypeDecl {
			name: self.name.to_string(),
			shape,
			supertype: self.supertype.map(str::to_string),
			interfaces: self.interfaces.iter().map(|s| s.to_string()).collect(),
		}
	}
}

/// Registry wrapper for link-time contract types.
pub struct ProvidedContractReg(pub &'static StaticContract);
inventory::collect!(ProvidedContractReg);

/// Declarations collected from every linked crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinkedSource;

impl DeclarationSource for LinkedSource {
	/// Sorted by implementor so passes are deterministic regardless of link order.
	fn declarations(&self) -> Vec<Declaration> {
		let mut decls: Vec<_> = inventory::iter::<ProvidedReg>().map(|reg| reg.0.to_declaration()).collect();
		decls.sort_by(|a, b| a.implementor.name.cmp(&b.implementor.name));
		decls
	}

	/// Supertypes and interfaces that are named but never registered are
	/// added as abstract classes and interfaces. Registered contracts replace
	/// those, and implementors replace both.
	fn types(&self) -> TypeTable {
		let mut contracts: Vec<TypeDecl> = inventory::iter::<ProvidedContractReg>().map(|reg| reg.0.type_decl()).collect();
		contracts.sort_by(|a, b| a.name.cmp(&b.name));
		let mut implementors: Vec<TypeDecl> = inventory::iter::<ProvidedReg>().map(|reg| reg.0.type_decl()).collect();
		implementors.sort_by(|a, b| a.name.cmp(&b.name));

		let mut table = TypeTable::default();
		for decl in contracts.iter().chain(&implementors) {
			if let Some(supertype) = &decl.supertype {
				table.insert(TypeDecl::class(supertype.as_str()).abstract_class());
			}
			for interface in &decl.interfaces {
				table.insert(TypeDecl::interface(interface.as_str()));
			}
		}
		for decl in contracts.into_iter().chain(implementors) {
			table.insert(decl);
		}
		table
	}
}

/// Registers an implementation declaration at link time.
///
/// ```ignore
/// implreg_contract::provided_contract!("app::Codec");
/// implreg_contract::provided_implementation!("app::Gzip", implements: ["app::Codec"], priority: 10, kind: "gzip");
/// ```
///
/// Optional arguments must appear in this order: `of`, `extends`,
/// `implements`, `concrete`, `priority`, `kind`, `extras`.
#[macro_export]
macro_rules! provided_implementation {
	($implementor:literal
		$(, of: $contract:literal)?
		$(, extends: $supertype:literal)?
		$(, implements: [$($interface:literal),* $(,)?])?
		$(, concrete: $concrete:expr)?
		$(, priority: $priority:expr)?
		$(, kind: $kind:literal)?
		$(, extras: $extras:literal)?
		$(,)?
	) => {
		const _: () = {
			static DECLARATION: $crate::source::StaticDeclaration = $crate::source::StaticDeclaration {
				implementor: $implementor,
				contract: $crate::__provided_some!($({$contract})?),
				supertype: $crate::__provided_some!($({$supertype})?),
				interfaces: &[$($($interface),*)?],
				concrete: $crate::__provided_or!($({$concrete})?, true),
				priority: $crate::__provided_or!($({$priority})?, 0),
				kind: $crate::__provided_some!($({$kind})?),
				extras: $crate::__provided_some!($({$extras})?),
			};

			$crate::inventory::submit! { $crate::source::ProvidedReg(&DECLARATION) }
		};
	};
}

/// Registers a contract type at link time.
///
/// The shape defaults to `Interface`; the others are `Class`,
/// `AbstractClass` and `FinalClass`.
///
/// ```ignore
/// implreg_contract::provided_contract!("app::Codec");
/// implreg_contract::provided_contract!("app::BaseCodec", shape: AbstractClass, implements: ["app::Codec"]);
/// ```
#[macro_export]
macro_rules! provided_contract {
	($name:literal
		$(, shape: $shape:ident)?
		$(, extends: $supertype:literal)?
		$(, implements: [$($interface:literal),* $(,)?])?
		$(,)?
	) => {
		const _: () = {
			static CONTRACT: $crate::source::StaticContract = $crate::source::StaticContract {
				name: $name,
				shape: $crate::__provided_or!($({$crate::source::ContractShape::$shape})?, $crate::source::ContractShape::Interface),
				supertype: $crate::__provided_some!($({$supertype})?),
				interfaces: &[$($($interface),*)?],
			};

			$crate::inventory::submit! { $crate::source::ProvidedContractReg(&CONTRACT) }
		};
	};
}

#[macro_export]
#[doc(hidden)]
macro_rules! __provided_some {
	() => {
		::core::option::Option::None
	};
	({$val:expr}) => {
		::core::option::Option::Some($val)
	};
}

#[macro_export]
#[doc(hidden)]
macro_rules! __provided_or {
	(, $default:expr) => {
		$default
	};
	({$val:expr}, $default:expr) => {
		$val
	};
}
