use implreg_record::CodecError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum QueryError {
	/// The result set has no entries.
	#[error("no implementations of {contract}")]
	Empty { contract: String },
	/// The loader could not produce a type for the implementor.
	#[error("{implementor} could not be loaded as {contract}")]
	Unresolved { implementor: String, contract: String },
	#[error(transparent)]
	Codec(#[from] CodecError),
	#[error("lookup for {contract} failed: {source}")]
	Lookup {
		contract: String,
		#[source]
		source: std::io::Error,
	},
}
