//! Typed access to a caller-owned byte buffer.
//!
//! A [`ByteView`] borrows (or wraps) a buffer and offers three encoding
//! strategies at arbitrary offsets:
//!
//! - numbers, one element of a [`BaseType`] at a time;
//! - fixed-length, null-padded byte strings;
//! - timestamps, stored as seconds since the FIT epoch.
//!
//! Every access is bounds-checked before any byte is touched, so a failed
//! write leaves the buffer exactly as it was.

use alloc::string::String;

use thiserror::Error;

use super::{
    base::BaseType,
    number::{Number, NumberError},
};

/// Seconds between the Unix epoch and the FIT epoch (1989-12-31T00:00:00Z).
pub const FIT_EPOCH: u64 = 631_065_600;

/// An error reading from or writing to a byte view.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ViewError {
    /// The access runs past the end of the buffer.
    #[error("Access of {len} bytes at offset {offset} runs past the end of the buffer.")]
    OutOfBounds { offset: usize, len: usize },
    /// The number cannot be stored as the requested base type.
    #[error(transparent)]
    Number(#[from] NumberError),
    /// The timestamp lies outside the 32-bit range after the FIT epoch.
    #[error("Timestamp {0} cannot be stored relative to the FIT epoch.")]
    TimestampOutOfRange(u64),
}

/// Typed get and set over a byte buffer.
#[derive(Debug)]
pub struct ByteView<B> {
    buf: B,
}

impl<B: AsRef<[u8]>> ByteView<B> {
    pub fn new(buf: B) -> Self {
        Self { buf }
    }

    pub fn len(&self) -> usize {
        self.buf.as_ref().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_inner(self) -> B {
        self.buf
    }

    /// Borrow `len` bytes at `offset`.
    pub fn bytes(&self, offset: usize, len: usize) -> Result<&[u8], ViewError> {
        let end = offset.checked_add(len);

        end.and_then(|end| self.buf.as_ref().get(offset..end))
            .ok_or(ViewError::OutOfBounds { offset, len })
    }

    /// Take an exact number of bytes at `offset`.
    pub fn take<const N: usize>(&self, offset: usize) -> Result<[u8; N], ViewError> {
        let mut r = [0; N];
        r.copy_from_slice(self.bytes(offset, N)?);
        Ok(r)
    }

    pub fn get_u8(&self, offset: usize) -> Result<u8, ViewError> {
        let [x] = self.take(offset)?;
        Ok(x)
    }

    /// Read one element of `base_type` at `offset`.
    ///
    /// Byte strings are read as their single-byte storage.
    pub fn get_number(
        &self,
        offset: usize,
        base_type: BaseType,
        is_little_endian: bool,
    ) -> Result<Number, ViewError> {
        let storage = storage(base_type);
        let r = self.bytes(offset, storage.natural_width().into())?;

        // Width is checked above and storage is always numeric.
        Number::from_bytes(storage, r, is_little_endian).ok_or(ViewError::OutOfBounds {
            offset,
            len: r.len(),
        })
    }

    /// Read a null-terminated string from a field of `size` bytes.
    ///
    /// Reading stops at the first null byte, or at `size` if there is none.
    /// Invalid UTF-8 is replaced rather than rejected.
    pub fn get_string(&self, offset: usize, size: usize) -> Result<String, ViewError> {
        let r = self.bytes(offset, size)?;
        let end = r.iter().position(|&b| b == 0).unwrap_or(r.len());

        Ok(String::from_utf8_lossy(&r[..end]).into_owned())
    }

    /// Read a timestamp, returning seconds since the Unix epoch.
    pub fn get_timestamp(&self, offset: usize, is_little_endian: bool) -> Result<u64, ViewError> {
        let r = self.take(offset)?;
        let since_fit_epoch = if is_little_endian {
            u32::from_le_bytes(r)
        } else {
            u32::from_be_bytes(r)
        };

        Ok(FIT_EPOCH + u64::from(since_fit_epoch))
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> ByteView<B> {
    /// Mutably borrow `len` bytes at `offset`.
    pub fn bytes_mut(&mut self, offset: usize, len: usize) -> Result<&mut [u8], ViewError> {
        let end = offset.checked_add(len);

        end.and_then(|end| self.buf.as_mut().get_mut(offset..end))
            .ok_or(ViewError::OutOfBounds { offset, len })
    }

    pub fn set_u8(&mut self, offset: usize, x: u8) -> Result<(), ViewError> {
        self.bytes_mut(offset, 1)?[0] = x;
        Ok(())
    }

    /// Write one element of `base_type` at `offset`, converting `value` to it.
    pub fn set_number(
        &mut self,
        offset: usize,
        base_type: BaseType,
        value: Number,
        is_little_endian: bool,
    ) -> Result<(), ViewError> {
        let storage = storage(base_type);
        let w = self.bytes_mut(offset, storage.natural_width().into())?;

        value.cast(storage)?.write_bytes(w, is_little_endian);
        Ok(())
    }

    /// Write a string into a field of `size` bytes, padding with nulls.
    ///
    /// Text longer than `size` is cut at the last character boundary that
    /// fits. This loses data silently; returns `true` when it happened.
    pub fn set_string(&mut self, offset: usize, size: usize, text: &str) -> Result<bool, ViewError> {
        let w = self.bytes_mut(offset, size)?;

        let mut end = text.len().min(size);
        while !text.is_char_boundary(end) {
            end -= 1;
        }

        let (head, padding) = w.split_at_mut(end);
        head.copy_from_slice(&text.as_bytes()[..end]);
        padding.fill(0);

        Ok(end < text.len())
    }

    /// Write a timestamp given in seconds since the Unix epoch.
    pub fn set_timestamp(
        &mut self,
        offset: usize,
        unix_seconds: u64,
        is_little_endian: bool,
    ) -> Result<(), ViewError> {
        let out_of_range = ViewError::TimestampOutOfRange(unix_seconds);

        let since_fit_epoch = unix_seconds
            .checked_sub(FIT_EPOCH)
            .and_then(|x| u32::try_from(x).ok())
            .ok_or(out_of_range)?;

        let r = if is_little_endian {
            since_fit_epoch.to_le_bytes()
        } else {
            since_fit_epoch.to_be_bytes()
        };

        self.bytes_mut(offset, r.len())?.copy_from_slice(&r);
        Ok(())
    }
}

/// The numeric type a base type is stored as.
fn storage(base_type: BaseType) -> BaseType {
    match base_type {
        BaseType::ByteString => BaseType::Uint8,
        other => other,
    }
}
