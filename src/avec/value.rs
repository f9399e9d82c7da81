//! Decoded field values.

use alloc::{collections::BTreeMap, string::String, vec::Vec};

use crate::sans::number::Number;

/// The value of one field.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A scalar integer or float.
    Number(Number),
    /// Elements of an array field, in buffer order.
    Array(Vec<Number>),
    String(String),
    /// Seconds since the Unix epoch.
    Timestamp(u64),
}

impl Value {
    pub fn as_number(&self) -> Option<Number> {
        match self {
            Self::Number(x) => Some(*x),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Number]> {
        match self {
            Self::Array(x) => Some(x),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(x) => Some(x),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<u64> {
        match self {
            Self::Timestamp(x) => Some(*x),
            _ => None,
        }
    }
}

impl From<Number> for Value {
    fn from(x: Number) -> Self {
        Self::Number(x)
    }
}

impl From<Vec<Number>> for Value {
    fn from(x: Vec<Number>) -> Self {
        Self::Array(x)
    }
}

impl From<String> for Value {
    fn from(x: String) -> Self {
        Self::String(x)
    }
}

impl From<&str> for Value {
    fn from(x: &str) -> Self {
        Self::String(x.into())
    }
}

macro_rules! value_from {
    ($($t:ty),*) => {$(
        impl From<$t> for Value {
            fn from(x: $t) -> Self {
                Self::Number(x.into())
            }
        }
    )*};
}

value_from!(u8, i8, u16, i16, u32, i32, u64, i64, f32, f64);

/// Field values keyed by field name.
pub type Fields = BTreeMap<String, Value>;

/// A decoded data record.
#[derive(Debug, Clone, PartialEq)]
pub struct DataRecord {
    /// Message name of the definition the record was decoded with.
    pub name: String,
    /// Local message number found in the record header.
    pub local_number: u8,
    pub fields: Fields,
}
