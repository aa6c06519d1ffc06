//! Implementation records and their persisted line format.
//!
//! Every registry entry is an [`ImplementationInfo`]: an implementor
//! identifier plus a priority, an optional classification kind and an optional
//! opaque payload. Identity is the implementor identifier alone, so sets of
//! records collapse duplicates without ever updating an existing entry.
//!
//! The [`codec`] module reads and writes these records one per line, which is
//! the format shared by the build-time aggregator and the runtime query side.

pub mod codec;
mod error;
mod info;
mod store;

pub use codec::{EncodingMode, RecordFormat, decode, decode_all, encode, encode_record, encode_to_string};
pub use error::{CodecError, InfoError};
pub use info::{ImplementationInfo, union_into};
pub use store::{DEFAULT_BASE_LOCATION, RecordStore, location_path, normalize_base};
