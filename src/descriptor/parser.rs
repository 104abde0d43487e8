//! Low-level byte reader for descriptor table decoding.
//!
//! A cursor over a byte slice with bounds-checked primitive reads and the compressed
//! unsigned integer encoding every record reference uses. Decoding is strictly
//! sequential; there is no random access into the blob.

use crate::{Error::OutOfBounds, Result};

/// Cursor-based reader over descriptor bytes.
///
/// # Examples
///
/// ```rust
/// use memberscope::descriptor::Parser;
/// let data = [0x7F, 0x80, 0x80];
/// let mut parser = Parser::new(&data);
/// assert_eq!(parser.read_compressed_uint()?, 127);
/// assert_eq!(parser.read_compressed_uint()?, 128);
/// # Ok::<(), memberscope::Error>(())
/// ```
pub struct Parser<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> Parser<'a> {
    /// Create a `Parser` over a byte slice.
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Parser { data, position: 0 }
    }

    /// `true` while bytes remain.
    #[must_use]
    pub fn has_more_data(&self) -> bool {
        self.position < self.data.len()
    }

    /// Number of bytes left to read.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    /// Read one byte and advance.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] when no byte remains.
    pub fn read_u8(&mut self) -> Result<u8> {
        let Some(&byte) = self.data.get(self.position) else {
            return Err(OutOfBounds);
        };
        self.position += 1;
        Ok(byte)
    }

    /// Read `length` bytes as a slice and advance.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] when fewer than `length` bytes remain.
    pub fn read_bytes(&mut self, length: usize) -> Result<&'a [u8]> {
        if self.remaining() < length {
            return Err(OutOfBounds);
        }
        let slice = &self.data[self.position..self.position + length];
        self.position += length;
        Ok(slice)
    }

    /// Read a compressed unsigned integer.
    ///
    /// Variable-length encoding for small values:
    /// - 0..=127: 1 byte (`0xxxxxxx`)
    /// - 128..=16383: 2 bytes (`10xxxxxx xxxxxxxx`)
    /// - up to 2^29-1: 4 bytes (`11xxxxxx` + 3 bytes)
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] when the encoding runs past the data, or
    /// [`crate::Error::Malformed`] for an invalid lead byte.
    pub fn read_compressed_uint(&mut self) -> Result<u32> {
        let first_byte = self.read_u8()?;

        if (first_byte & 0x80) == 0 {
            return Ok(u32::from(first_byte));
        }

        if (first_byte & 0xC0) == 0x80 {
            let second_byte = self.read_u8()?;
            return Ok(((u32::from(first_byte) & 0x3F) << 8) | u32::from(second_byte));
        }

        if (first_byte & 0xE0) == 0xC0 {
            let b1 = u32::from(self.read_u8()?);
            let b2 = u32::from(self.read_u8()?);
            let b3 = u32::from(self.read_u8()?);
            return Ok(((u32::from(first_byte) & 0x1F) << 24) | (b1 << 16) | (b2 << 8) | b3);
        }

        Err(malformed_error!("Invalid compressed uint - {}", first_byte))
    }
}
