//! Bounds guards shared by every decoder.
//!
//! All reads from untrusted buffers are validated through these two
//! functions, so truncation and misuse failures carry uniform context
//! (required, available, offset) no matter which codec raised them.

use crate::Error;

/// Validate that `offset` is a legal starting position within `buf`.
///
/// `offset == buf.len()` is valid: it denotes the end of the buffer with
/// zero bytes remaining, which a zero-width codec can decode from.
pub fn assert_valid_offset(buf: &[u8], offset: usize) -> Result<(), Error> {
    if offset > buf.len() {
        return Err(Error::InvalidOffset {
            offset,
            len: buf.len(),
        });
    }
    Ok(())
}

/// Validate that at least `required` bytes are readable starting at `offset`.
///
/// Reports the number of bytes actually available past `offset` on failure.
/// The check is overflow-safe: an `offset + required` that exceeds `usize`
/// fails like any other shortfall.
pub fn assert_sufficient_bytes(buf: &[u8], offset: usize, required: usize) -> Result<(), Error> {
    match offset.checked_add(required) {
        Some(end) if end <= buf.len() => Ok(()),
        _ => Err(Error::InsufficientBytes {
            required,
            available: buf.len().saturating_sub(offset),
            offset,
        }),
    }
}
