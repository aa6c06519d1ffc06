use implreg_contract::ResolveError;
use implreg_record::{CodecError, InfoError};
use thiserror::Error;

/// A failure scoped to one declaration or one contract.
#[derive(Debug, Error)]
pub enum AggregateError {
	/// The declaration was rejected by the resolver.
	#[error(transparent)]
	Declaration(#[from] ResolveError),
	/// The declaration resolved but could not be turned into a record.
	#[error("{implementor}: {source}")]
	Record {
		implementor: String,
		#[source]
		source: InfoError,
	},
	#[error("failed to read persisted registry for {contract} at {location}: {source}")]
	PersistedRead {
		contract: String,
		location: String,
		#[source]
		source: std::io::Error,
	},
	#[error("failed to decode persisted registry for {contract} at {location}: {source}")]
	PersistedDecode {
		contract: String,
		location: String,
		#[source]
		source: CodecError,
	},
	#[error("failed to write registry for {contract} at {location}: {source}")]
	PersistedWrite {
		contract: String,
		location: String,
		#[source]
		source: std::io::Error,
	},
}

impl AggregateError {
	/// The contract this error is scoped to, if it is not a declaration error.
	pub fn contract(&self) -> Option<&str> {
		match self {
			Self::PersistedRead { contract, .. } | Self::PersistedDecode { contract, .. } | Self::PersistedWrite { contract, .. } => Some(contract.as_str()),
			Self::Declaration(ResolveError::InvalidContract { contract, .. }) => Some(contract.as_str()),
			Self::Declaration(_) | Self::Record { .. } => None,
		}
	}
}
