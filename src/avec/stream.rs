//! Reading and writing a sequence of records sharing local message numbers.

use alloc::string::String;

use either::Either::{self, Left, Right};
use thiserror::Error;
use tracing::{debug, warn};

use crate::sans::{
    definition::{Definition, DefinitionError, DefinitionRecord},
    header::{HeaderError, MAX_LOCAL_NUMBER, RecordHeader, RecordKind},
    view::ByteView,
};

use super::{
    data::{self, Codec},
    dictionary::Dictionary,
    value::{DataRecord, Fields},
};

/// Number of local message numbers a stream can bind at once.
const LOCAL_SLOTS: usize = MAX_LOCAL_NUMBER as usize + 1;

/// Errors occurring while reading or writing a record stream.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StreamError {
    /// The buffer ends before a record header.
    #[error("Unexpectedly reached the end of the buffer at offset {0}.")]
    EndOfBuffer(usize),
    /// Found a compressed timestamp header (not supported).
    #[error("Found compressed timestamp header {0:#04x}.")]
    Compressed(u8),
    /// A data record uses a local message number with no definition bound.
    #[error("No definition is bound to local message number {0}.")]
    Unbound(u8),
    /// The dictionary does not know a global message number.
    #[error("Global message number {0} is not in the dictionary.")]
    UnknownMessage(u16),
    /// The dictionary does not know a message name.
    #[error("Message '{0}' is not in the dictionary.")]
    UnknownMessageName(String),
    #[error(transparent)]
    Definition(#[from] DefinitionError),
    #[error(transparent)]
    Data(#[from] data::Error),
}

impl Definition {
    /// Read a definition record, naming its message through `dictionary`.
    pub fn decode<D: Dictionary + ?Sized>(
        buf: &[u8],
        start: usize,
        dictionary: &D,
    ) -> Result<Self, StreamError> {
        let record = DefinitionRecord::decode(&ByteView::new(buf), start)?;

        let name = dictionary
            .message_name(record.global_number)
            .ok_or(StreamError::UnknownMessage(record.global_number))?;

        Ok(Self::new(
            record.architecture,
            name,
            record.local_number,
            record.fields,
        ))
    }

    /// Write this definition as a definition record, returning its length.
    pub fn encode<D: Dictionary + ?Sized>(
        &self,
        buf: &mut [u8],
        start: usize,
        dictionary: &D,
    ) -> Result<usize, StreamError> {
        let global_number = dictionary
            .message_number(&self.name)
            .ok_or_else(|| StreamError::UnknownMessageName(self.name.clone()))?;

        let record = DefinitionRecord {
            architecture: self.architecture,
            local_number: self.local_number,
            global_number,
            fields: self.fields.clone(),
        };

        Ok(record.encode(&mut ByteView::new(buf), start)?)
    }
}

/// A table of definitions bound to local message numbers.
///
/// Binding a definition to a local number replaces whatever was bound there
/// before; later data records with that number decode against the new one.
#[derive(Debug)]
pub struct Stream<D> {
    codec: Codec<D>,
    definitions: [Option<Definition>; LOCAL_SLOTS],
}

impl<D: Dictionary> Stream<D> {
    pub fn new(dictionary: D) -> Self {
        Self {
            codec: Codec::new(dictionary),
            definitions: Default::default(),
        }
    }

    pub fn codec(&self) -> &Codec<D> {
        &self.codec
    }

    /// The definition bound to a local message number, if any.
    pub fn definition(&self, local_number: u8) -> Option<&Definition> {
        self.definitions.get(usize::from(local_number))?.as_ref()
    }

    /// Bind a definition to its local message number, returning the one it
    /// replaced.
    ///
    /// Local numbers above 15 are rejected.
    pub fn bind(&mut self, definition: Definition) -> Result<Option<Definition>, StreamError> {
        let slot = self
            .definitions
            .get_mut(usize::from(definition.local_number))
            .ok_or(data::Error::LocalNumber(HeaderError::LocalNumberOutOfRange(
                definition.local_number,
            )))?;

        if let Some(old) = slot.as_ref() {
            if old.name != definition.name {
                warn!(
                    local_number = definition.local_number,
                    old = %old.name,
                    new = %definition.name,
                    "local message number rebound to a different message"
                );
            }
        }

        Ok(slot.replace(definition))
    }

    /// Read the record starting at `start`.
    ///
    /// Definition records are bound and returned on the left; data records
    /// are decoded against their bound definition and returned on the right.
    /// Also returns the number of bytes the record occupies.
    pub fn read(
        &mut self,
        buf: &[u8],
        start: usize,
    ) -> Result<(Either<&Definition, DataRecord>, usize), StreamError> {
        let header = *buf.get(start).ok_or(StreamError::EndOfBuffer(start))?;

        if RecordHeader::is_compressed(header) {
            Err(StreamError::Compressed(header))?;
        }

        let RecordHeader { kind, local_number } = RecordHeader::decode(header);

        match kind {
            RecordKind::Definition => {
                let definition = Definition::decode(buf, start, self.codec.dictionary())?;
                let len = definition.definition_record_length();

                debug!(local_number, name = %definition.name, "bound definition");

                self.bind(definition)?;
                let definition = self
                    .definition(local_number)
                    .ok_or(StreamError::Unbound(local_number))?;

                Ok((Left(definition), len))
            }
            RecordKind::Data => {
                let definition = self
                    .definition(local_number)
                    .ok_or(StreamError::Unbound(local_number))?;

                let record = self.codec.decode(definition, buf, start)?;
                Ok((Right(record), definition.data_record_length()))
            }
        }
    }

    /// Bind a definition and write it as a definition record, returning its
    /// length.
    pub fn write_definition(
        &mut self,
        definition: Definition,
        buf: &mut [u8],
        start: usize,
    ) -> Result<usize, StreamError> {
        let len = definition.encode(buf, start, self.codec.dictionary())?;
        self.bind(definition)?;
        Ok(len)
    }

    /// Write a data record against the definition bound to `local_number`,
    /// returning its length.
    pub fn write_data(
        &self,
        local_number: u8,
        fields: &Fields,
        buf: &mut [u8],
        start: usize,
    ) -> Result<usize, StreamError> {
        let definition = self
            .definition(local_number)
            .ok_or(StreamError::Unbound(local_number))?;

        Ok(self.codec.encode(definition, fields, buf, start)?)
    }
}
