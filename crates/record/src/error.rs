use thiserror::Error;

/// Rejected construction of an [`ImplementationInfo`](crate::ImplementationInfo).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InfoError {
	/// The implementor identifier was empty.
	#[error("implementor identifier must not be empty")]
	EmptyIdentifier,
}

/// Errors raised while decoding a record stream.
///
/// A format error is fatal for the whole decode call: records decoded before
/// the offending line are discarded along with the rest of the stream.
#[derive(Debug, Error)]
pub enum CodecError {
	/// A priority field did not parse as a 32-bit signed integer.
	#[error("line {line}: invalid priority {value:?}")]
	Format { line: usize, value: String },
	/// The underlying stream failed or was not valid UTF-8.
	#[error("failed to read record stream: {0}")]
	Io(#[from] std::io::Error),
}
