//! Record encoding and decoding against a field dictionary.
//!
//! The byte layout of a data record only says how wide each field is and
//! which base type it holds. What the field *means* (its name, and whether
//! its bytes are a number, a string or a timestamp) comes from a
//! [`Dictionary`], injected into a [`Codec`] as a capability.
//!
//! A built-in table of common activity messages is provided as
//! [`profile::ACTIVITY`]. Applications with their own profile implement
//! [`Dictionary`] directly.
//!
//! ```
//! let codec = Codec::new(&profile::ACTIVITY);
//! let len = codec.encode(&definition, &fields, &mut buf, 0)?;
//! let record = codec.decode(&definition, &buf[..len], 0)?;
//! ```
//!
//! For a sequence of records sharing local message numbers, see
//! [`stream::Stream`].

pub mod data;
pub mod dictionary;
pub mod profile;
pub mod stream;
pub mod value;

pub use data::Codec;
pub use dictionary::{Dictionary, FieldInfo, TypeFamily};
pub use value::{DataRecord, Fields, Value};
