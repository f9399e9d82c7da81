#![no_std]

//! A record codec for Garmin's Flexible and Interoperable Data Transfer
//! protocol.
//!
//! Spoke packs and unpacks the data records of a FIT stream against a
//! previously announced definition: scalars, arrays, fixed-length strings and
//! timestamps, in whichever byte order the definition declares.
//!
//! Most users should begin with [`avec::Codec::encode`] and
//! [`avec::Codec::decode`], or with [`avec::stream::Stream`] when records arrive
//! one after another. The byte-level building blocks (record headers, base
//! types, the byte view) live in [`sans`] and need no field dictionary.
//!
//! ## Cargo Features
//!
//! The following crate feature flags are available:
//!
//! - `std`: forward `std` support to the logging facade (default).

extern crate alloc;

pub mod avec;
pub mod sans;
