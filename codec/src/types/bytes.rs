//! Codecs for strings, byte sequences, and fixed-width byte blobs.
//!
//! Variable-length payloads (`string`, `bytes`) carry a 4-byte little-endian
//! byte-count prefix. Fixed-width payloads (`fixed_bytes`, `public_key`) are
//! raw bytes with no framing. Decoded values are always copied out of the
//! input buffer, never aliased into it.

use crate::{
    codec::{Codec, Layout, SizeKind},
    util::assert_sufficient_bytes,
    Error,
};
use bytes::{Buf, BufMut, Bytes, BytesMut};
use std::{fmt, ops::Deref};

/// Byte-count prefix width shared by all length-prefixed codecs.
pub(crate) const LENGTH_PREFIX: usize = 4;

/// Validate that a length fits the 4-byte prefix.
pub(crate) fn assert_prefixable(context: &str, len: usize) -> Result<u32, Error> {
    u32::try_from(len).map_err(|_| {
        Error::InvalidData(
            context.into(),
            format!("length {len} exceeds the u32 prefix"),
        )
    })
}

/// Read a 4-byte little-endian length prefix at `offset`.
pub(crate) fn read_length_prefix(buf: &[u8], offset: usize) -> Result<(usize, usize), Error> {
    assert_sufficient_bytes(buf, offset, LENGTH_PREFIX)?;
    let mut src = &buf[offset..];
    Ok((src.get_u32_le() as usize, LENGTH_PREFIX))
}

// String codec implementation
struct StringLayout;

impl Layout<String> for StringLayout {
    fn size_kind(&self) -> SizeKind {
        SizeKind::Variable
    }

    fn encoded_size(&self, value: &String) -> Result<usize, Error> {
        assert_prefixable("string", value.len())?;
        Ok(LENGTH_PREFIX + value.len())
    }

    fn write(&self, value: &String, buf: &mut BytesMut) -> Result<(), Error> {
        let len = assert_prefixable("string", value.len())?;
        buf.put_u32_le(len);
        buf.put_slice(value.as_bytes());
        Ok(())
    }

    fn read_at(&self, buf: &[u8], offset: usize) -> Result<(String, usize), Error> {
        let (len, prefix) = read_length_prefix(buf, offset)?;
        let start = offset + prefix;
        assert_sufficient_bytes(buf, start, len)?;
        let decoded = std::str::from_utf8(&buf[start..start + len])
            .map_err(|err| Error::InvalidData("string".into(), err.to_string()))?;
        Ok((decoded.to_owned(), prefix + len))
    }
}

/// Codec for UTF-8 strings.
///
/// The prefix counts encoded bytes, not characters, so multi-byte code
/// points contribute their full UTF-8 width. Decoding validates UTF-8.
pub fn string() -> Codec<String> {
    Codec::new(StringLayout)
}

// Bytes codec implementation
struct BytesLayout;

impl Layout<Bytes> for BytesLayout {
    fn size_kind(&self) -> SizeKind {
        SizeKind::Variable
    }

    fn encoded_size(&self, value: &Bytes) -> Result<usize, Error> {
        assert_prefixable("bytes", value.len())?;
        Ok(LENGTH_PREFIX + value.len())
    }

    fn write(&self, value: &Bytes, buf: &mut BytesMut) -> Result<(), Error> {
        let len = assert_prefixable("bytes", value.len())?;
        buf.put_u32_le(len);
        buf.put_slice(value);
        Ok(())
    }

    fn read_at(&self, buf: &[u8], offset: usize) -> Result<(Bytes, usize), Error> {
        let (len, prefix) = read_length_prefix(buf, offset)?;
        let start = offset + prefix;
        assert_sufficient_bytes(buf, start, len)?;
        let decoded = Bytes::copy_from_slice(&buf[start..start + len]);
        Ok((decoded, prefix + len))
    }
}

/// Codec for length-prefixed byte sequences.
pub fn bytes() -> Codec<Bytes> {
    Codec::new(BytesLayout)
}

// Fixed-width byte blob implementation
struct FixedBytesLayout {
    size: usize,
}

impl Layout<Bytes> for FixedBytesLayout {
    fn size_kind(&self) -> SizeKind {
        SizeKind::Fixed(self.size)
    }

    fn encoded_size(&self, _: &Bytes) -> Result<usize, Error> {
        Ok(self.size)
    }

    fn write(&self, value: &Bytes, buf: &mut BytesMut) -> Result<(), Error> {
        if value.len() != self.size {
            return Err(Error::InvalidData(
                "fixed_bytes".into(),
                format!("expected {} bytes, got {}", self.size, value.len()),
            ));
        }
        buf.put_slice(value);
        Ok(())
    }

    fn read_at(&self, buf: &[u8], offset: usize) -> Result<(Bytes, usize), Error> {
        assert_sufficient_bytes(buf, offset, self.size)?;
        let decoded = Bytes::copy_from_slice(&buf[offset..offset + self.size]);
        Ok((decoded, self.size))
    }
}

/// Codec for exactly `size` raw bytes, no framing.
///
/// Encoding a value whose length differs from `size` fails with
/// [Error::InvalidData].
pub fn fixed_bytes(size: usize) -> Codec<Bytes> {
    Codec::new(FixedBytesLayout { size })
}

const PUBLIC_KEY_LEN: usize = 32;

/// A 32-byte account address.
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct PublicKey([u8; PUBLIC_KEY_LEN]);

impl PublicKey {
    /// Width of a public key in bytes.
    pub const LEN: usize = PUBLIC_KEY_LEN;

    /// Creates a new `PublicKey` from an array of length [PublicKey::LEN].
    pub fn new(value: [u8; Self::LEN]) -> Self {
        Self(value)
    }

    /// The raw bytes of the key.
    pub fn as_bytes(&self) -> &[u8; Self::LEN] {
        &self.0
    }
}

impl From<[u8; PublicKey::LEN]> for PublicKey {
    fn from(value: [u8; PublicKey::LEN]) -> Self {
        Self(value)
    }
}

impl TryFrom<&[u8]> for PublicKey {
    type Error = Error;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        let array: [u8; Self::LEN] = value.try_into().map_err(|_| {
            Error::InvalidData(
                "public_key".into(),
                format!("expected {} bytes, got {}", Self::LEN, value.len()),
            )
        })?;
        Ok(Self(array))
    }
}

impl TryFrom<Vec<u8>> for PublicKey {
    type Error = Error;

    fn try_from(value: Vec<u8>) -> Result<Self, Self::Error> {
        Self::try_from(value.as_slice())
    }
}

impl AsRef<[u8]> for PublicKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Deref for PublicKey {
    type Target = [u8];
    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({self})")
    }
}

// Public key codec implementation
struct PublicKeyLayout;

impl Layout<PublicKey> for PublicKeyLayout {
    fn size_kind(&self) -> SizeKind {
        SizeKind::Fixed(PublicKey::LEN)
    }

    fn encoded_size(&self, _: &PublicKey) -> Result<usize, Error> {
        Ok(PublicKey::LEN)
    }

    fn write(&self, value: &PublicKey, buf: &mut BytesMut) -> Result<(), Error> {
        buf.put_slice(value.as_bytes());
        Ok(())
    }

    fn read_at(&self, buf: &[u8], offset: usize) -> Result<(PublicKey, usize), Error> {
        assert_sufficient_bytes(buf, offset, PublicKey::LEN)?;
        let mut dst = [0; PublicKey::LEN];
        dst.copy_from_slice(&buf[offset..offset + PublicKey::LEN]);
        Ok((PublicKey(dst), PublicKey::LEN))
    }
}

/// Codec for 32-byte [PublicKey] values, raw bytes with no framing.
pub fn public_key() -> Codec<PublicKey> {
    Codec::new(PublicKeyLayout)
}
