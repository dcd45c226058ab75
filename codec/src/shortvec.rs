//! Compact length encoding and the short vector built on it.
//!
//! A compact `u16` occupies one to three bytes. Each byte carries:
//! - 7 bits of the value, least-significant group first
//! - 1 "continuation" bit to indicate if more bytes follow
//!
//! Decoding is strict: the third byte may carry only the two bits a `u16`
//! has left, and a longer encoding of a value that fits in fewer bytes is
//! rejected. Every value has exactly one accepted encoding.

use crate::{
    codec::{Codec, Layout, SizeKind},
    util::{assert_sufficient_bytes, assert_valid_offset},
    Error,
};
use bytes::{BufMut, BytesMut};

const DATA_BITS_MASK: u8 = 0x7F;
const CONTINUATION_BIT_MASK: u8 = 0x80;

/// The maximum encoded length of a compact `u16`.
pub const MAX_ENCODED_LEN: usize = 3;

/// Encodes `value` as a compact `u16`.
pub fn write(value: u16, buf: &mut impl BufMut) {
    let mut rest = value;
    loop {
        let byte = (rest & u16::from(DATA_BITS_MASK)) as u8;
        rest >>= 7;
        if rest == 0 {
            buf.put_u8(byte);
            return;
        }
        buf.put_u8(byte | CONTINUATION_BIT_MASK);
    }
}

/// Calculates the number of bytes [write] produces for `value`.
pub fn size(value: u16) -> usize {
    match value {
        0..=0x7F => 1,
        0x80..=0x3FFF => 2,
        _ => 3,
    }
}

/// Decodes a compact `u16` from `buf` at `offset`, returning the value and
/// the number of bytes consumed.
pub fn read_at(buf: &[u8], offset: usize) -> Result<(u16, usize), Error> {
    assert_valid_offset(buf, offset)?;
    let mut value: u16 = 0;
    let mut index = 0;
    loop {
        let Some(&byte) = buf.get(offset + index) else {
            return Err(Error::InsufficientBytes {
                required: index + 1,
                available: buf.len() - offset,
                offset,
            });
        };
        // The third byte carries the two remaining bits of a u16, which also
        // rules out a continuation bit. The loop therefore always returns by
        // the third iteration.
        if index == MAX_ENCODED_LEN - 1 && byte > 0x03 {
            return Err(Error::InvalidData(
                "compact_u16".into(),
                format!("third byte {byte:#04x} overflows u16"),
            ));
        }
        value |= u16::from(byte & DATA_BITS_MASK) << (7 * index);
        if byte & CONTINUATION_BIT_MASK == 0 {
            // A zero final group is a longer alias for a shorter encoding.
            if index > 0 && byte == 0 {
                return Err(Error::InvalidData(
                    "compact_u16".into(),
                    "non-minimal encoding".into(),
                ));
            }
            return Ok((value, index + 1));
        }
        index += 1;
    }
}

struct CompactU16Layout;

impl Layout<u16> for CompactU16Layout {
    fn size_kind(&self) -> SizeKind {
        SizeKind::Variable
    }

    fn encoded_size(&self, value: &u16) -> Result<usize, Error> {
        Ok(size(*value))
    }

    fn write(&self, value: &u16, buf: &mut BytesMut) -> Result<(), Error> {
        write(*value, buf);
        Ok(())
    }

    fn read_at(&self, buf: &[u8], offset: usize) -> Result<(u16, usize), Error> {
        read_at(buf, offset)
    }
}

/// Codec for a `u16` in the compact one-to-three-byte encoding.
pub fn compact_u16() -> Codec<u16> {
    Codec::new(CompactU16Layout)
}

struct CompactVecLayout<T> {
    inner: Codec<T>,
}

impl<T> Layout<Vec<T>> for CompactVecLayout<T> {
    fn size_kind(&self) -> SizeKind {
        SizeKind::Variable
    }

    fn encoded_size(&self, value: &Vec<T>) -> Result<usize, Error> {
        let count = assert_compact("compact_vec", value.len())?;
        let mut size = size(count);
        for item in value {
            size += self.inner.encoded_size(item)?;
        }
        Ok(size)
    }

    fn write(&self, value: &Vec<T>, buf: &mut BytesMut) -> Result<(), Error> {
        let count = assert_compact("compact_vec", value.len())?;
        write(count, buf);
        for item in value {
            self.inner.write(item, buf)?;
        }
        Ok(())
    }

    fn read_at(&self, buf: &[u8], offset: usize) -> Result<(Vec<T>, usize), Error> {
        let (count, prefix) = read_at(buf, offset)?;
        let count = count as usize;
        let start = offset + prefix;
        if let Some(elem_size) = self.inner.fixed_size() {
            // Saturating: an overflowing total certainly exceeds the buffer.
            assert_sufficient_bytes(buf, start, count.saturating_mul(elem_size))?;
        }
        // Preallocation is capped by the bytes remaining, not the prefix.
        let mut items = Vec::with_capacity(count.min(buf.len() - start));
        let mut consumed = prefix;
        for _ in 0..count {
            let (item, len) = self.inner.read_at(buf, offset + consumed)?;
            items.push(item);
            consumed += len;
        }
        Ok((items, consumed))
    }
}

fn assert_compact(context: &str, len: usize) -> Result<u16, Error> {
    u16::try_from(len).map_err(|_| {
        Error::InvalidData(
            context.into(),
            format!("length {len} exceeds the compact u16 prefix"),
        )
    })
}

/// Codec for a vector of `inner` values behind a compact `u16` count
/// prefix.
///
/// Holds at most [u16::MAX] elements, in exchange for a one-byte prefix on
/// the short vectors that dominate transaction payloads.
pub fn compact_vec<T: 'static>(inner: Codec<T>) -> Codec<Vec<T>> {
    Codec::new(CompactVecLayout { inner })
}
