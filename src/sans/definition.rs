//! Field definitions, message definitions, and the definition record layout.

use alloc::{string::String, vec::Vec};

use thiserror::Error;
use zerocopy::{FromBytes, Immutable, IntoBytes};

use super::{
    base::BaseType,
    header::{HEADER_SIZE, HeaderError, RecordHeader, RecordKind},
    view::{ByteView, ViewError},
};

/// One field within a message definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldDefinition {
    /// Stable field number within the message.
    pub number: u8,
    /// Declared size in bytes.
    pub size: u8,
    pub base_type: BaseType,
}

/// A field whose declared size does not suit its base type.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("Field {number} declares {size} bytes, not a positive multiple of {base_type:?}.")]
pub struct MalformedField {
    pub number: u8,
    pub size: u8,
    pub base_type: BaseType,
}

impl FieldDefinition {
    pub fn new(number: u8, size: u8, base_type: BaseType) -> Self {
        Self {
            number,
            size,
            base_type,
        }
    }

    /// Number of base type elements the field holds.
    ///
    /// One for scalars, more for arrays. Byte strings count their allotted
    /// bytes. A size that is zero or not a whole multiple of the natural
    /// width is malformed; it is never truncated.
    pub fn element_count(&self) -> Result<u8, MalformedField> {
        let width = self.base_type.natural_width();

        if self.size == 0 || self.size % width != 0 {
            Err(MalformedField {
                number: self.number,
                size: self.size,
                base_type: self.base_type,
            })?;
        }

        Ok(self.size / width)
    }

    /// Whether the declared size spans more than one element.
    pub fn is_array(&self) -> bool {
        !self.base_type.is_string() && self.size > self.base_type.natural_width()
    }
}

/// The shape of a message, as announced by a definition record.
///
/// Definitions are immutable once built and may be shared freely between
/// concurrent encode and decode calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Definition {
    /// Byte order flag: `false` for little-endian, `true` for big-endian.
    pub architecture: bool,
    /// Message name, as known to the field dictionary.
    pub name: String,
    /// Local message number the definition is bound to (0-15).
    pub local_number: u8,
    /// Fields in record order.
    pub fields: Vec<FieldDefinition>,
}

impl Definition {
    pub fn new(
        architecture: bool,
        name: impl Into<String>,
        local_number: u8,
        fields: Vec<FieldDefinition>,
    ) -> Self {
        Self {
            architecture,
            name: name.into(),
            local_number,
            fields,
        }
    }

    pub fn is_little_endian(&self) -> bool {
        !self.architecture
    }

    /// Length in bytes of a data record of this definition, header included.
    pub fn data_record_length(&self) -> usize {
        HEADER_SIZE + self.fields.iter().map(|f| usize::from(f.size)).sum::<usize>()
    }

    /// Length in bytes of the definition record announcing this definition.
    pub fn definition_record_length(&self) -> usize {
        HEADER_SIZE + MESSAGE_SIZE + FIELD_SIZE * self.fields.len()
    }
}

/// An error reading or writing a definition record.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DefinitionError {
    /// The buffer is too short for the record.
    #[error("Definition record does not fit the buffer: {0}")]
    View(#[from] ViewError),
    /// The header does not introduce a definition record.
    #[error("Header byte {0:#04x} does not introduce a definition record.")]
    NotDefinition(u8),
    /// Found developer data (not supported).
    #[error("Found developer data.")]
    DeveloperData,
    /// Unknown base type code.
    #[error("Field {field} has unknown base type code {code:#04x}.")]
    UnknownBaseType { field: u8, code: u8 },
    /// More fields than a record can declare.
    #[error("Definition declares {0} fields (at most 255).")]
    TooManyFields(usize),
    #[error(transparent)]
    Header(#[from] HeaderError),
}

#[repr(C, packed)]
#[derive(Debug, FromBytes, IntoBytes, Immutable)]
struct DefinitionMessage {
    reserved: u8,
    architecture: u8,
    global_message: [u8; 2],
    field_count: u8,
}

#[repr(C, packed)]
#[derive(Debug, FromBytes, IntoBytes, Immutable)]
struct FieldHeader {
    field: u8,
    size: u8,
    base_type: u8,
}

const MESSAGE_SIZE: usize = size_of::<DefinitionMessage>();
const FIELD_SIZE: usize = size_of::<FieldHeader>();

/// A definition record as it appears on the wire, keyed by global message
/// number rather than name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionRecord {
    pub architecture: bool,
    pub local_number: u8,
    pub global_number: u16,
    pub fields: Vec<FieldDefinition>,
}

impl DefinitionRecord {
    /// Length in bytes of the record, header included.
    pub fn record_length(&self) -> usize {
        HEADER_SIZE + MESSAGE_SIZE + FIELD_SIZE * self.fields.len()
    }

    /// Read a definition record starting at its header byte.
    pub fn decode<B: AsRef<[u8]>>(r: &ByteView<B>, start: usize) -> Result<Self, DefinitionError> {
        let header = r.get_u8(start)?;

        if RecordHeader::has_developer_data(header) {
            Err(DefinitionError::DeveloperData)?;
        }

        let RecordHeader { kind, local_number } = RecordHeader::decode(header);
        if kind != RecordKind::Definition || RecordHeader::is_compressed(header) {
            Err(DefinitionError::NotDefinition(header))?;
        }

        let DefinitionMessage {
            architecture,
            global_message,
            field_count,
            ..
        } = zerocopy::transmute!(r.take::<MESSAGE_SIZE>(start + HEADER_SIZE)?);

        let is_little_endian = architecture == 0;
        let global_number = if is_little_endian {
            u16::from_le_bytes(global_message)
        } else {
            u16::from_be_bytes(global_message)
        };

        let mut i = start + HEADER_SIZE + MESSAGE_SIZE;
        let mut fields = Vec::with_capacity(field_count.into());

        for _ in 0..field_count {
            let FieldHeader {
                field,
                size,
                base_type,
            } = zerocopy::transmute!(r.take::<FIELD_SIZE>(i)?);

            let base_type = BaseType::from_code(base_type).ok_or(
                DefinitionError::UnknownBaseType {
                    field,
                    code: base_type,
                },
            )?;

            fields.push(FieldDefinition::new(field, size, base_type));
            i += FIELD_SIZE;
        }

        Ok(Self {
            architecture: !is_little_endian,
            local_number,
            global_number,
            fields,
        })
    }

    /// Write the record starting at `start`, returning its length.
    ///
    /// The whole span is bounds-checked before the first byte is written.
    pub fn encode<B: AsRef<[u8]> + AsMut<[u8]>>(
        &self,
        w: &mut ByteView<B>,
        start: usize,
    ) -> Result<usize, DefinitionError> {
        let field_count = u8::try_from(self.fields.len())
            .map_err(|_| DefinitionError::TooManyFields(self.fields.len()))?;
        let header = RecordHeader::new(RecordKind::Definition, self.local_number).encode()?;

        let len = self.record_length();
        w.bytes_mut(start, len)?;

        let global_message = if self.architecture {
            self.global_number.to_be_bytes()
        } else {
            self.global_number.to_le_bytes()
        };

        let message: [u8; MESSAGE_SIZE] = zerocopy::transmute!(DefinitionMessage {
            reserved: 0,
            architecture: self.architecture.into(),
            global_message,
            field_count,
        });

        w.set_u8(start, header)?;
        w.bytes_mut(start + HEADER_SIZE, MESSAGE_SIZE)?
            .copy_from_slice(&message);

        let mut i = start + HEADER_SIZE + MESSAGE_SIZE;
        for f in &self.fields {
            let field: [u8; FIELD_SIZE] = zerocopy::transmute!(FieldHeader {
                field: f.number,
                size: f.size,
                base_type: f.base_type.code(),
            });

            w.bytes_mut(i, FIELD_SIZE)?.copy_from_slice(&field);
            i += FIELD_SIZE;
        }

        Ok(len)
    }
}
