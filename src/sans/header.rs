//! Record headers.

use tartan_bitfield::bitfield;
use thiserror::Error;

/// Size in bytes of a record header.
pub const HEADER_SIZE: usize = 1;

/// Largest local message number a normal header can carry.
pub const MAX_LOCAL_NUMBER: u8 = 15;

// Bit 4 is reserved.
bitfield! {
    struct HeaderByte(u8) {
        [0..4] local_number: u8,
        [5] is_developer,
        [6] is_definition,
        [7] is_compressed,
    }
}

/// The kind of record a header introduces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    /// A message-shape announcement.
    Definition,
    /// Field values conforming to an earlier definition.
    Data,
}

/// An error encoding a record header.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HeaderError {
    /// Local message number does not fit in four bits.
    #[error("Local message number {0} is out of range (0-15).")]
    LocalNumberOutOfRange(u8),
}

/// A decoded record header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecordHeader {
    pub kind: RecordKind,
    pub local_number: u8,
}

impl RecordHeader {
    pub fn new(kind: RecordKind, local_number: u8) -> Self {
        Self { kind, local_number }
    }

    /// Pack a header into its byte.
    ///
    /// Local numbers above 15 are rejected rather than wrapped, so a bad
    /// caller surfaces here instead of as a record bound to the wrong
    /// definition further down the stream.
    pub fn encode(self) -> Result<u8, HeaderError> {
        if self.local_number > MAX_LOCAL_NUMBER {
            Err(HeaderError::LocalNumberOutOfRange(self.local_number))?;
        }

        let mut header = HeaderByte(0);
        header.set_local_number(self.local_number);
        header.set_is_definition(self.kind == RecordKind::Definition);

        Ok(header.0)
    }

    /// Unpack a header from its byte.
    ///
    /// Every byte decodes: the kind comes from bit 6 and the local number from
    /// the low four bits, whatever the remaining bits hold. Whether the result
    /// is legal in context is for the caller to decide.
    pub fn decode(r: u8) -> Self {
        let header = HeaderByte(r);

        let kind = if header.is_definition() {
            RecordKind::Definition
        } else {
            RecordKind::Data
        };

        Self {
            kind,
            local_number: header.local_number(),
        }
    }

    /// Whether a header byte flags developer data fields.
    pub fn has_developer_data(r: u8) -> bool {
        HeaderByte(r).is_developer()
    }

    /// Whether a header byte uses the compressed timestamp layout.
    pub fn is_compressed(r: u8) -> bool {
        HeaderByte(r).is_compressed()
    }
}

/// Pack a record kind and local message number into a header byte.
pub fn encode(kind: RecordKind, local_number: u8) -> Result<u8, HeaderError> {
    RecordHeader::new(kind, local_number).encode()
}

/// Unpack a header byte. See [`RecordHeader::decode`].
pub fn decode(r: u8) -> RecordHeader {
    RecordHeader::decode(r)
}
