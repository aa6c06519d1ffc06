use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

use super::DeclarationSource;
use crate::resolve::Declaration;
use crate::types::{DEFAULT_ROOT, TypeDecl, TypeShape, TypeTable};

/// Errors raised while loading a declaration manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
	#[error("failed to read manifest {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},
	#[error("failed to parse manifest: {0}")]
	Parse(#[from] toml::de::Error),
	#[error("declaration names undeclared implementor {0:?}")]
	UnknownImplementor(String),
	#[error("type {0:?} is declared more than once")]
	DuplicateType(String),
	#[error("type {0:?} is the root type and cannot be redeclared")]
	RootRedeclared(String),
}

/// A declared type as written in a manifest.
///
/// ```toml
/// [[type]]
/// name = "app.Gzip"
/// kind = "class"
/// extends = "app.BaseCodec"
/// implements = ["app.Codec"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TypeSpec {
	pub name: String,
	/// `class`, `interface`, or any other kind name.
	#[serde(default = "default_kind")]
	pub kind: String,
	#[serde(default, rename = "abstract")]
	pub is_abstract: bool,
	#[serde(default, rename = "final")]
	pub is_final: bool,
	#[serde(default)]
	pub extends: Option<String>,
	#[serde(default)]
	pub implements: Vec<String>,
}

fn default_kind() -> String {
	"class".to_string()
}

impl TypeSpec {
	fn to_decl(&self) -> TypeDecl {
		let shape = match self.kind.as_str() {
			"class" => TypeShape::Class {
				root: false,
				sealed: self.is_final,
				concrete: !self.is_abstract,
			},
			"interface" => TypeShape::Interface,
			other => TypeShape::Other(other.to_string()),
		};
		TypeDecl {
			name: self.name.clone(),
			shape,
			supertype: self.extends.clone(),
			interfaces: self.implements.clone(),
		}
	}
}

/// One `[[provide]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeclarationSpec {
	pub implementor: String,
	#[serde(default)]
	pub contract: Option<String>,
	#[serde(default)]
	pub priority: i32,
	#[serde(default)]
	pub kind: Option<String>,
	#[serde(default)]
	pub extras: Option<String>,
}

/// TOML file listing declared types and the implementations they provide.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
	/// Name of the universal root type.
	#[serde(default)]
	pub root: Option<String>,
	#[serde(default, rename = "type")]
	pub types: Vec<TypeSpec>,
	#[serde(default, rename = "provide")]
	pub provides: Vec<DeclarationSpec>,
}

impl Manifest {
	pub fn load(path: impl AsRef<Path>) -> Result<Self, ManifestError> {
		let path = path.as_ref();
		let text = std::fs::read_to_string(path).map_err(|source| ManifestError::Io {
			path: path.to_path_buf(),
			source,
		})?;
		text.parse()
	}

	fn validate(&self) -> Result<(), ManifestError> {
		let mut seen = std::collections::HashSet::new();
		for ty in &self.types {
			if ty.name == self.root_name() {
				return Err(ManifestError::RootRedeclared(ty.name.clone()));
			}
			if !seen.insert(ty.name.as_str()) {
				return Err(ManifestError::DuplicateType(ty.name.clone()));
			}
		}
		for provide in &self.provides {
			if !seen.contains(provide.implementor.as_str()) {
				return Err(ManifestError::UnknownImplementor(provide.implementor.clone()));
			}
		}
		Ok(())
	}

	fn root_name(&self) -> &str {
		self.root.as_deref().unwrap_or(DEFAULT_ROOT)
	}
}

impl FromStr for Manifest {
	type Err = ManifestError;

	fn from_str(text: &str) -> Result<Self, Self::Err> {
		let manifest: Manifest = toml::from_str(text)?;
		manifest.validate()?;
		Ok(manifest)
	}
}

impl DeclarationSource for Manifest {
	/// In file order. Entries naming an undeclared implementor are skipped;
	/// loading through [`FromStr`] rejects them up front.
	fn declarations(&self) -> Vec<Declaration> {
		self.provides
			.iter()
			.filter_map(|provide| {
				let ty = self.types.iter().find(|t| t.name == provide.implementor)?;
				Some(Declaration {
					implementor: ty.to_decl(),
					contract: provide.contract.clone(),
					priority: provide.priority,
					kind: provide.kind.clone(),
					extras: provide.extras.clone(),
				})
			})
			.collect()
	}

	fn types(&self) -> TypeTable {
		let mut table = TypeTable::new(self.root_name());
		for ty in &self.types {
			table.insert(ty.to_decl());
		}
		table
	}
}
