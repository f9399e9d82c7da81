//! The field dictionary capability.

/// How a field's bytes are to be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeFamily {
    Number,
    String,
    /// Seconds since the FIT epoch, stored as a 32-bit unsigned integer.
    Timestamp,
}

/// Semantic metadata for one field of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldInfo<'a> {
    pub name: &'a str,
    pub family: TypeFamily,
}

/// Resolve field numbers to names and type families, per message.
///
/// Only [`Dictionary::resolve`] is needed to encode and decode data records.
/// The message number lookups are used when reading and writing definition
/// records; the default implementation of each knows no messages.
#[allow(unused_variables)]
pub trait Dictionary {
    /// Look up a field of a message by number.
    fn resolve(&self, message: &str, field: u8) -> Option<FieldInfo<'_>>;

    /// Look up a message name by global message number.
    fn message_name(&self, global_number: u16) -> Option<&str> {
        None
    }

    /// Look up a global message number by message name.
    fn message_number(&self, message: &str) -> Option<u16> {
        None
    }
}

impl<D: Dictionary + ?Sized> Dictionary for &D {
    fn resolve(&self, message: &str, field: u8) -> Option<FieldInfo<'_>> {
        (**self).resolve(message, field)
    }

    fn message_name(&self, global_number: u16) -> Option<&str> {
        (**self).message_name(global_number)
    }

    fn message_number(&self, message: &str) -> Option<u16> {
        (**self).message_number(message)
    }
}
