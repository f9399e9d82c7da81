//! Byte-level building blocks shared by every record.
//!
//! Nothing in this module consults a field dictionary. It knows how a record
//! header byte is laid out, which base types exist and how wide they are, and
//! how to read and write each of them at an offset of a caller-owned buffer.
//!
//! # Architecture
//!
//! A record starts with a one-byte [`header::RecordHeader`]. Definition
//! records announce a [`definition::Definition`]: an ordered list of
//! [`definition::FieldDefinition`]s, each naming a field number, a byte size
//! and a [`base::BaseType`]. Data records then carry only field bytes, packed
//! back to back in definition order.
//!
//! All reads and writes go through a [`view::ByteView`], which is keyed off
//! the declared base type of each field and an explicit byte order. The view
//! never owns the bytes it touches.

pub mod base;
pub mod definition;
pub mod header;
pub mod number;
pub mod view;
