//! Registry options, usually read from a TOML file.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use implreg_record::codec::{DEFAULT_DELIMITER, DEFAULT_TERMINATORS};
use implreg_record::{DEFAULT_BASE_LOCATION, EncodingMode, RecordFormat, normalize_base};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OptionsError {
	#[error("line_terminators must not be empty")]
	EmptyTerminators,
	#[error("delimiter {0:?} is also a line terminator")]
	DelimiterIsTerminator(char),
	#[error("failed to read options {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},
	#[error("failed to parse options: {0}")]
	Parse(#[from] toml::de::Error),
}

/// Where registry files live and how their records are written.
///
/// ```toml
/// base_location = "META-INF/services"
/// identifier_only = false
/// delimiter = "\t"
/// line_terminators = ["\n", "\r"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistryOptions {
	/// Prefix joined with the contract id to form a file location.
	pub base_location: String,
	/// Write bare identifiers only.
	pub identifier_only: bool,
	pub delimiter: char,
	pub line_terminators: Vec<char>,
}

impl Default for RegistryOptions {
	fn default() -> Self {
		Self {
			base_location: DEFAULT_BASE_LOCATION.to_string(),
			identifier_only: false,
			delimiter: DEFAULT_DELIMITER,
			line_terminators: DEFAULT_TERMINATORS.to_vec(),
		}
	}
}

impl RegistryOptions {
	pub fn load(path: impl AsRef<Path>) -> Result<Self, OptionsError> {
		let path = path.as_ref();
		let text = std::fs::read_to_string(path).map_err(|source| OptionsError::Io {
			path: path.to_path_buf(),
			source,
		})?;
		text.parse()
	}

	pub fn validate(&self) -> Result<(), OptionsError> {
		if self.line_terminators.is_empty() {
			return Err(OptionsError::EmptyTerminators);
		}
		if self.line_terminators.contains(&self.delimiter) {
			return Err(OptionsError::DelimiterIsTerminator(self.delimiter));
		}
		Ok(())
	}

	/// The base location, ending with `/` unless empty.
	pub fn base(&self) -> String {
		normalize_base(&self.base_location)
	}

	/// Location of the registry file for `contract`.
	pub fn location(&self, contract: &str) -> String {
		format!("{}{contract}", self.base())
	}

	/// Builds the record format these options describe.
	pub fn format(&self) -> Result<RecordFormat, OptionsError> {
		self.validate()?;
		let mode = if self.identifier_only {
			EncodingMode::IdentifierOnly
		} else {
			EncodingMode::Native
		};
		Ok(RecordFormat::new()
			.with_delimiter(self.delimiter)
			.with_terminators(self.line_terminators.iter().copied())
			.with_mode(mode))
	}
}

impl FromStr for RegistryOptions {
	type Err = OptionsError;

	fn from_str(text: &str) -> Result<Self, Self::Err> {
		let options: RegistryOptions = toml::from_str(text)?;
		options.validate()?;
		Ok(options)
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn defaults() {
		let options = RegistryOptions::default();
		assert_eq!(options.location("app.Codec"), "services/app.Codec");
		let format = options.format().unwrap();
		assert_eq!(format, RecordFormat::default());
	}

	#[test]
	fn base_location_gets_a_trailing_slash() {
		let options: RegistryOptions = "base_location = \"META-INF/services\"".parse().unwrap();
		assert_eq!(options.base(), "META-INF/services/");
		assert_eq!(options.location("a.B"), "META-INF/services/a.B");

		let flat: RegistryOptions = "base_location = \"\"".parse().unwrap();
		assert_eq!(flat.location("a.B"), "a.B");
	}

	#[test]
	fn parses_format_fields() {
		let options: RegistryOptions = "identifier_only = true\ndelimiter = \"|\"\nline_terminators = [\";\"]\n".parse().unwrap();
		let format = options.format().unwrap();
		assert_eq!(format.delimiter(), '|');
		assert_eq!(format.terminators(), &[';']);
		assert_eq!(format.mode(), EncodingMode::IdentifierOnly);
	}

	#[test]
	fn rejects_invalid_terminators() {
		let empty = "line_terminators = []".parse::<RegistryOptions>().unwrap_err();
		assert!(matches!(empty, OptionsError::EmptyTerminators));

		let clash = "delimiter = \"\\n\"".parse::<RegistryOptions>().unwrap_err();
		assert!(matches!(clash, OptionsError::DelimiterIsTerminator('\n')));
	}

	#[test]
	fn rejects_unknown_keys() {
		let err = "base = \"x\"".parse::<RegistryOptions>().unwrap_err();
		assert!(matches!(err, OptionsError::Parse(_)));
	}
}
