//! The data record codec.

use alloc::{
    string::{String, ToString},
    vec::Vec,
};

use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::sans::{
    base::BaseType,
    definition::{Definition, FieldDefinition, MalformedField},
    header::{HEADER_SIZE, HeaderError, RecordHeader, RecordKind},
    number::{Number, NumberError},
    view::{ByteView, ViewError},
};

use super::{
    dictionary::{Dictionary, TypeFamily},
    value::{DataRecord, Fields, Value},
};

/// Width in bytes of a stored timestamp.
const TIMESTAMP_SIZE: u8 = 4;

/// The encoding selected for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    Number,
    /// Repeated elements of the field's base type.
    Array(u8),
    String,
    Timestamp,
}

/// Broad classes of codec failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    MalformedDefinition,
    BufferUnderflow,
    UnresolvedField,
    InvalidValue,
}

/// Why a value could not be encoded.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidValue {
    /// The value does not have the shape the field's encoding expects.
    #[error("Expected a value suited to {0:?} encoding.")]
    Shape(Strategy),
    /// An array value has more elements than the field holds.
    #[error("Found {found} elements for a field of {capacity}.")]
    TooManyElements { capacity: u8, found: usize },
    #[error("{0}")]
    Number(NumberError),
    #[error("Timestamp {0} is outside the FIT epoch range.")]
    Timestamp(u64),
}

/// Errors occurring while encoding or decoding a data record.
///
/// Each variant that concerns a field carries its number and the absolute
/// byte offset the field starts at, so a caller can log or recover the
/// fields before it.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// A field's size does not suit its base type.
    #[error("Malformed definition: {0}")]
    MalformedField(#[from] MalformedField),
    /// A timestamp field is not four bytes wide.
    #[error("Malformed definition: timestamp field {field} declares {size} bytes.")]
    MalformedTimestamp { field: u8, size: u8 },
    /// The definition's local message number cannot be put in a header.
    #[error("Malformed definition: {0}")]
    LocalNumber(#[from] HeaderError),
    /// The buffer ends before the header or a field does.
    #[error("Buffer ends before {len} bytes at offset {offset} (field {field:?}).")]
    BufferUnderflow {
        field: Option<u8>,
        offset: usize,
        len: usize,
    },
    /// The dictionary has no entry for a field.
    #[error("No dictionary entry for field {field} of message '{message}'.")]
    UnresolvedField { message: String, field: u8 },
    /// A value cannot be written to its field.
    #[error("Invalid value for field {field} at offset {offset}: {reason}")]
    InvalidValue {
        field: u8,
        offset: usize,
        reason: InvalidValue,
    },
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MalformedField(_) | Self::MalformedTimestamp { .. } | Self::LocalNumber(_) => {
                ErrorKind::MalformedDefinition
            }
            Self::BufferUnderflow { .. } => ErrorKind::BufferUnderflow,
            Self::UnresolvedField { .. } => ErrorKind::UnresolvedField,
            Self::InvalidValue { .. } => ErrorKind::InvalidValue,
        }
    }

    /// Attach field context to a byte view error.
    fn at(field: u8, offset: usize) -> impl Fn(ViewError) -> Self {
        move |err| match err {
            ViewError::OutOfBounds { offset, len } => Self::BufferUnderflow {
                field: Some(field),
                offset,
                len,
            },
            ViewError::Number(reason) => Self::InvalidValue {
                field,
                offset,
                reason: InvalidValue::Number(reason),
            },
            ViewError::TimestampOutOfRange(x) => Self::InvalidValue {
                field,
                offset,
                reason: InvalidValue::Timestamp(x),
            },
        }
    }
}

/// A field paired with its resolved name and encoding.
#[derive(Debug)]
struct Slot<'a> {
    field: FieldDefinition,
    name: &'a str,
    strategy: Strategy,
}

/// Encodes and decodes data records, resolving field meaning through a
/// dictionary.
///
/// A codec holds no state between calls. The definition is only borrowed for
/// the duration of each call, and any number of calls may share one.
#[derive(Debug, Clone)]
pub struct Codec<D> {
    dictionary: D,
}

impl<D: Dictionary> Codec<D> {
    pub fn new(dictionary: D) -> Self {
        Self { dictionary }
    }

    pub fn dictionary(&self) -> &D {
        &self.dictionary
    }

    /// Resolve and classify every field of a definition.
    ///
    /// All definition and dictionary problems surface here, before any byte
    /// is read or written.
    fn plan<'a>(&'a self, definition: &Definition) -> Result<Vec<Slot<'a>>, Error> {
        RecordHeader::new(RecordKind::Data, definition.local_number).encode()?;

        definition
            .fields
            .iter()
            .map(|&field| -> Result<Slot<'a>, Error> {
                let info = self
                    .dictionary
                    .resolve(&definition.name, field.number)
                    .ok_or_else(|| Error::UnresolvedField {
                        message: definition.name.clone(),
                        field: field.number,
                    })?;

                let strategy = if info.family == TypeFamily::String || field.base_type.is_string()
                {
                    Strategy::String
                } else if field.is_array() {
                    Strategy::Array(field.element_count()?)
                } else if info.family == TypeFamily::Timestamp {
                    field.element_count()?;
                    if field.size != TIMESTAMP_SIZE {
                        Err(Error::MalformedTimestamp {
                            field: field.number,
                            size: field.size,
                        })?;
                    }
                    Strategy::Timestamp
                } else {
                    field.element_count()?;
                    Strategy::Number
                };

                Ok(Slot {
                    field,
                    name: info.name,
                    strategy,
                })
            })
            .collect()
    }

    /// Encode a data record into `buf` starting at `start`, returning the
    /// number of bytes written.
    ///
    /// Fields without an entry in `fields` are written as their base type's
    /// invalid marker value. On error, the bytes of fields before the
    /// offending one have already been written.
    pub fn encode(
        &self,
        definition: &Definition,
        fields: &Fields,
        buf: &mut [u8],
        start: usize,
    ) -> Result<usize, Error> {
        let slots = self.plan(definition)?;
        let is_little_endian = definition.is_little_endian();

        let mut w = ByteView::new(buf);

        let header = RecordHeader::new(RecordKind::Data, definition.local_number).encode()?;
        w.set_u8(start, header)
            .map_err(|_| Error::BufferUnderflow {
                field: None,
                offset: start,
                len: HEADER_SIZE,
            })?;

        let mut i = start + HEADER_SIZE;

        for Slot {
            field,
            name,
            strategy,
        } in slots
        {
            let at = Error::at(field.number, i);
            let size = usize::from(field.size);

            // Bounds-check the whole field before writing any element of it.
            w.bytes_mut(i, size).map_err(&at)?;

            let value = fields.get(name);
            if value.is_none() {
                debug!(field = field.number, name, "writing invalid marker for missing value");
            }

            let invalid = |strategy| Error::InvalidValue {
                field: field.number,
                offset: i,
                reason: InvalidValue::Shape(strategy),
            };

            match (strategy, value) {
                (Strategy::String, None) => {
                    w.set_string(i, size, "").map_err(&at)?;
                }
                (Strategy::String, Some(Value::String(text))) => {
                    if w.set_string(i, size, text).map_err(&at)? {
                        warn!(field = field.number, name, size, "truncated string value");
                    }
                }
                (Strategy::Array(count), value) => {
                    let elements: &[Number] = match value {
                        Some(Value::Array(x)) => x.as_slice(),
                        None => &[],
                        Some(_) => Err(invalid(strategy))?,
                    };

                    if elements.len() > usize::from(count) {
                        Err(Error::InvalidValue {
                            field: field.number,
                            offset: i,
                            reason: InvalidValue::TooManyElements {
                                capacity: count,
                                found: elements.len(),
                            },
                        })?;
                    }

                    let width = usize::from(field.base_type.natural_width());
                    for k in 0..usize::from(count) {
                        let x = match elements.get(k) {
                            Some(x) => *x,
                            None => invalid_marker(field.base_type),
                        };
                        w.set_number(i + k * width, field.base_type, x, is_little_endian)
                            .map_err(&at)?;
                    }
                }
                (Strategy::Timestamp, None) => {
                    let x = invalid_marker(BaseType::Uint32);
                    w.set_number(i, BaseType::Uint32, x, is_little_endian)
                        .map_err(&at)?;
                }
                (Strategy::Timestamp, Some(Value::Timestamp(x))) => {
                    w.set_timestamp(i, *x, is_little_endian).map_err(&at)?;
                }
                (Strategy::Number, value) => {
                    let x = match value {
                        Some(Value::Number(x)) => *x,
                        None => invalid_marker(field.base_type),
                        Some(_) => Err(invalid(strategy))?,
                    };
                    w.set_number(i, field.base_type, x, is_little_endian)
                        .map_err(&at)?;
                }
                (Strategy::String | Strategy::Timestamp, Some(_)) => Err(invalid(strategy))?,
            }

            trace!(field = field.number, offset = i, ?strategy, "encoded field");

            i += size;
        }

        Ok(i - start)
    }

    /// Decode a data record from `buf` starting at its header byte.
    pub fn decode(
        &self,
        definition: &Definition,
        buf: &[u8],
        start: usize,
    ) -> Result<DataRecord, Error> {
        let mut fields = Fields::new();
        let local_number = self.decode_into(definition, buf, start, &mut fields)?;

        Ok(DataRecord {
            name: definition.name.clone(),
            local_number,
            fields,
        })
    }

    /// Decode a data record, inserting each field into `fields` as it is read.
    ///
    /// Returns the local message number from the record header. On error,
    /// `fields` holds every field decoded before the offending one.
    pub fn decode_into(
        &self,
        definition: &Definition,
        buf: &[u8],
        start: usize,
        fields: &mut Fields,
    ) -> Result<u8, Error> {
        let slots = self.plan(definition)?;
        let is_little_endian = definition.is_little_endian();

        let r = ByteView::new(buf);

        let header = r.get_u8(start).map_err(|_| Error::BufferUnderflow {
            field: None,
            offset: start,
            len: HEADER_SIZE,
        })?;
        let RecordHeader { kind, local_number } = RecordHeader::decode(header);

        if kind != RecordKind::Data || local_number != definition.local_number {
            debug!(
                ?kind,
                local_number,
                expected = definition.local_number,
                "header does not match definition"
            );
        }

        let mut i = start + HEADER_SIZE;

        for Slot {
            field,
            name,
            strategy,
        } in slots
        {
            let at = Error::at(field.number, i);
            let size = usize::from(field.size);

            r.bytes(i, size).map_err(&at)?;

            let value = match strategy {
                Strategy::String => Value::String(r.get_string(i, size).map_err(&at)?),
                Strategy::Array(count) => {
                    let width = usize::from(field.base_type.natural_width());
                    let elements = (0..usize::from(count))
                        .map(|k| r.get_number(i + k * width, field.base_type, is_little_endian))
                        .collect::<Result<Vec<_>, _>>()
                        .map_err(&at)?;
                    Value::Array(elements)
                }
                Strategy::Timestamp => {
                    Value::Timestamp(r.get_timestamp(i, is_little_endian).map_err(&at)?)
                }
                Strategy::Number => {
                    Value::Number(r.get_number(i, field.base_type, is_little_endian).map_err(&at)?)
                }
            };

            trace!(field = field.number, offset = i, ?strategy, "decoded field");

            fields.insert(name.to_string(), value);
            i += size;
        }

        Ok(local_number)
    }
}

fn invalid_marker(base_type: BaseType) -> Number {
    // Byte strings fall back to a zero byte.
    Number::invalid(base_type).unwrap_or(Number::U8(0))
}
