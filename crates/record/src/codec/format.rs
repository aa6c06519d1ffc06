/// Default field delimiter.
pub const DEFAULT_DELIMITER: char = '\t';

/// Default set of characters that end a record.
pub const DEFAULT_TERMINATORS: &[char] = &['\n', '\r'];

/// How much of a record is written and read back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EncodingMode {
	/// Identifier, then priority, kind and extras up to the last non-default field.
	#[default]
	Native,
	/// One bare identifier per line, for readers that only understand
	/// plain service lists. Delimiters are not special when decoding.
	IdentifierOnly,
}

/// Line format shared by the encoder and the decoder.
///
/// The delimiter is expected to be outside the terminator set; callers taking
/// user configuration validate that before building a format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordFormat {
	delimiter: char,
	terminators: Vec<char>,
	mode: EncodingMode,
}

impl Default for RecordFormat {
	fn default() -> Self {
		Self {
			delimiter: DEFAULT_DELIMITER,
			terminators: DEFAULT_TERMINATORS.to_vec(),
			mode: EncodingMode::Native,
		}
	}
}

impl RecordFormat {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_delimiter(mut self, delimiter: char) -> Self {
		self.delimiter = delimiter;
		self
	}

	/// Replaces the terminator set. An empty set keeps the current one.
	pub fn with_terminators(mut self, terminators: impl IntoIterator<Item = char>) -> Self {
		let mut set: Vec<char> = Vec::new();
		for c in terminators {
			if !set.contains(&c) {
				set.push(c);
			}
		}
		if !set.is_empty() {
			self.terminators = set;
		}
		self
	}

	pub fn with_mode(mut self, mode: EncodingMode) -> Self {
		self.mode = mode;
		self
	}

	pub fn delimiter(&self) -> char {
		self.delimiter
	}

	pub fn terminators(&self) -> &[char] {
		&self.terminators
	}

	pub fn mode(&self) -> EncodingMode {
		self.mode
	}

	pub fn is_terminator(&self, c: char) -> bool {
		self.terminators.contains(&c)
	}

	/// Character written after each encoded record: `'\n'` when it terminates
	/// records, otherwise the first configured terminator.
	pub fn record_end(&self) -> char {
		if self.is_terminator('\n') { '\n' } else { self.terminators[0] }
	}
}
