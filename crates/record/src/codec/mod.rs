//! Line-oriented record codec.
//!
//! A persisted stream holds one record per line:
//!
//! ```text
//! implementor[<delim>priority[<delim>kind[<delim>extras]]]
//! ```
//!
//! Trailing fields may be omitted and fall back to their defaults (priority 0,
//! no kind, no extras). The encoder writes fields only up to the last one that
//! differs from its default, so the common case is a bare identifier line.
//!
//! Values containing the delimiter or a terminator cannot round-trip. There is
//! no escaping scheme.

mod format;

use std::io::{Read, Write};

use indexmap::IndexSet;

pub use self::format::{DEFAULT_DELIMITER, DEFAULT_TERMINATORS, EncodingMode, RecordFormat};
use crate::error::CodecError;
use crate::info::ImplementationInfo;


/// Field the decoder is currently filling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
	ReadIdentifier,
	ReadPriority,
	ReadKind,
	ReadExtras,
	/// Extras were complete; discard everything up to the terminator.
	Drain,
}

#[derive(Default)]
struct PendingRecord {
	implementor: String,
	priority: i32,
	kind: String,
	extras: String,
}

struct Decoder<'f> {
	format: &'f RecordFormat,
	state: State,
	field: String,
	record: PendingRecord,
	line: usize,
	out: IndexSet<ImplementationInfo>,
}

impl<'f> Decoder<'f> {
	fn new(format: &'f RecordFormat, out: IndexSet<ImplementationInfo>) -> Self {
		Self {
			format,
			state: State::ReadIdentifier,
			field: String::new(),
			record: PendingRecord::default(),
			line: 1,
			out,
		}
	}

	fn feed(&mut self, c: char) -> Result<(), CodecError> {
		if self.format.is_terminator(c) {
			self.end_record()?;
			if c == '\n' {
				self.line += 1;
			}
			return Ok(());
		}

		let delimits = c == self.format.delimiter() && self.format.mode() == EncodingMode::Native;
		match self.state {
			State::Drain => {}
			_ if delimits => self.end_field()?,
			_ => self.field.push(c),
		}
		Ok(())
	}

	/// Stores the current field and advances to the next state.
	fn end_field(&mut self) -> Result<(), CodecError> {
		let field = std::mem::take(&mut self.field);
		self.state = match self.state {
			State::ReadIdentifier => {
				self.record.implementor = field;
				State::ReadPriority
			}
			State::ReadPriority => {
				self.record.priority = self.parse_priority(&field)?;
				State::ReadKind
			}
			State::ReadKind => {
				self.record.kind = field;
				State::ReadExtras
			}
			State::ReadExtras => {
				self.record.extras = field;
				State::Drain
			}
			State::Drain => State::Drain,
		};
		Ok(())
	}

	fn parse_priority(&self, field: &str) -> Result<i32, CodecError> {
		if field.is_empty() {
			return Ok(0);
		}
		field.parse().map_err(|_| CodecError::Format {
			line: self.line,
			value: field.to_string(),
		})
	}

	fn end_record(&mut self) -> Result<(), CodecError> {
		if self.state != State::Drain {
			self.end_field()?;
		}
		let record = std::mem::take(&mut self.record);
		self.state = State::ReadIdentifier;

		// Empty identifiers come from blank lines and the gap between `\r` and `\n`.
		if let Ok(info) = ImplementationInfo::new(record.implementor) {
			self.out
				.insert(info.with_priority(record.priority).with_kind(record.kind).with_extras(record.extras));
		}
		Ok(())
	}

	fn finish(mut self) -> Result<IndexSet<ImplementationInfo>, CodecError> {
		if self.state != State::ReadIdentifier || !self.field.is_empty() {
			self.end_record()?;
		}
		Ok(self.out)
	}
}

fn decode_into(
	format: &RecordFormat,
	mut reader: impl Read,
	out: IndexSet<ImplementationInfo>,
) -> Result<IndexSet<ImplementationInfo>, CodecError> {
	let mut text = String::new();
	reader.read_to_string(&mut text)?;

	let mut decoder = Decoder::new(format, out);
	for c in text.chars() {
		decoder.feed(c)?;
	}
	decoder.finish()
}

/// Decodes one record stream.
///
/// Records keep stream order; a later record naming an implementor seen
/// earlier in the stream is dropped. An unparsable priority fails the whole
/// call.
pub fn decode(format: &RecordFormat, reader: impl Read) -> Result<Vec<ImplementationInfo>, CodecError> {
	Ok(decode_into(format, reader, IndexSet::new())?.into_iter().collect())
}

/// Decodes several streams for the same contract, in order, into one list.
///
/// Duplicates across streams collapse to the first record seen.
pub fn decode_all<R: Read>(format: &RecordFormat, readers: impl IntoIterator<Item = R>) -> Result<Vec<ImplementationInfo>, CodecError> {
	let mut out = IndexSet::new();
	for reader in readers {
		out = decode_into(format, reader, out)?;
	}
	Ok(out.into_iter().collect())
}

/// Encodes a single record, without the trailing terminator.
pub fn encode_record(format: &RecordFormat, info: &ImplementationInfo) -> String {
	let mut line = String::from(info.implementor());
	if format.mode() == EncodingMode::IdentifierOnly {
		return line;
	}

	let fields = if info.extras().is_some() {
		3
	} else if info.kind().is_some() {
		2
	} else if info.priority() != 0 {
		1
	} else {
		0
	};

	let delimiter = format.delimiter();
	if fields >= 1 {
		line.push(delimiter);
		line.push_str(&info.priority().to_string());
	}
	if fields >= 2 {
		line.push(delimiter);
		line.push_str(info.kind().unwrap_or_default());
	}
	if fields >= 3 {
		line.push(delimiter);
		line.push_str(info.extras().unwrap_or_default());
	}
	line
}

/// Encodes records into a string, one terminated line each.
pub fn encode_to_string<'a>(format: &RecordFormat, infos: impl IntoIterator<Item = &'a ImplementationInfo>) -> String {
	let end = format.record_end();
	let mut out = String::new();
	for info in infos {
		out.push_str(&encode_record(format, info));
		out.push(end);
	}
	out
}

/// Encodes records into `writer`.
pub fn encode<'a>(
	format: &RecordFormat,
	infos: impl IntoIterator<Item = &'a ImplementationInfo>,
	mut writer: impl Write,
) -> std::io::Result<()> {
	writer.write_all(encode_to_string(format, infos).as_bytes())?;
	writer.flush()
}
