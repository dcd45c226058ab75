//! Core codec contract: size classification, the [Layout] strategy trait,
//! and the shared [Codec] handle.

use crate::{util::assert_valid_offset, Error};
use bytes::{Bytes, BytesMut};
use std::{fmt, sync::Arc};

/// How the encoded length of a codec relates to the values it encodes.
///
/// The classification is decided once, at construction, and never changes.
/// Composites derive their kind from their children: all-fixed children
/// produce a fixed composite, any variable child makes it variable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SizeKind {
    /// Every value encodes to exactly this many bytes.
    Fixed(usize),
    /// The encoded length depends on the value.
    Variable,
}

/// Encoding strategy behind a [Codec].
///
/// Implementations define the wire layout; [Codec] adds offset validation,
/// buffer allocation, and the encode-length contract on top. Every provided
/// combinator is a `Layout`, and external types can implement it to supply
/// custom codecs.
pub trait Layout<T>: Send + Sync {
    /// The size classification decided at construction.
    fn size_kind(&self) -> SizeKind;

    /// Number of bytes [Layout::write] will produce for `value`.
    fn encoded_size(&self, value: &T) -> Result<usize, Error>;

    /// Append the encoding of `value` to `buf`.
    fn write(&self, value: &T, buf: &mut BytesMut) -> Result<(), Error>;

    /// Decode a value from `buf` starting at `offset`.
    ///
    /// Returns the value and the number of bytes consumed. The caller has
    /// already validated `offset`; implementations bounds-check every read
    /// through [crate::assert_sufficient_bytes] before touching the buffer.
    fn read_at(&self, buf: &[u8], offset: usize) -> Result<(T, usize), Error>;
}

/// A binary codec for values of type `T`.
///
/// `Codec` is a cheap, clonable handle to a shared encoding strategy: clones
/// refer to the same instance, observable via [Codec::ptr_eq]. Instance
/// identity is what lets deferred and memoized constructors hand the same
/// codec to every caller.
pub struct Codec<T> {
    layout: Arc<dyn Layout<T>>,
}

impl<T> Clone for Codec<T> {
    fn clone(&self) -> Self {
        Self {
            layout: Arc::clone(&self.layout),
        }
    }
}

impl<T> fmt::Debug for Codec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Codec").field(&self.size_kind()).finish()
    }
}

impl<T> Codec<T> {
    /// Wrap a layout strategy in a shared handle.
    pub fn new(layout: impl Layout<T> + 'static) -> Self {
        Self {
            layout: Arc::new(layout),
        }
    }

    /// The size classification of this codec.
    pub fn size_kind(&self) -> SizeKind {
        self.layout.size_kind()
    }

    /// The constant encoded length, if this codec is fixed-size.
    pub fn fixed_size(&self) -> Option<usize> {
        match self.layout.size_kind() {
            SizeKind::Fixed(size) => Some(size),
            SizeKind::Variable => None,
        }
    }

    /// Whether every value encodes to the same number of bytes.
    pub fn is_fixed_size(&self) -> bool {
        matches!(self.layout.size_kind(), SizeKind::Fixed(_))
    }

    /// Whether the encoded length depends on the value.
    pub fn is_variable_size(&self) -> bool {
        !self.is_fixed_size()
    }

    /// Number of bytes [Codec::encode] will produce for `value`.
    ///
    /// Fixed-size codecs answer from the classification alone, without
    /// consulting the value.
    pub fn encoded_size(&self, value: &T) -> Result<usize, Error> {
        match self.layout.size_kind() {
            SizeKind::Fixed(size) => Ok(size),
            SizeKind::Variable => self.layout.encoded_size(value),
        }
    }

    /// Encode `value` into a freshly allocated buffer.
    ///
    /// # Panics
    ///
    /// Panics if the strategy writes a different number of bytes than
    /// [Codec::encoded_size] reported. That indicates a bug in the layout,
    /// not a data error.
    pub fn encode(&self, value: &T) -> Result<Bytes, Error> {
        let size = self.encoded_size(value)?;
        let mut buf = BytesMut::with_capacity(size);
        self.layout.write(value, &mut buf)?;
        assert_eq!(buf.len(), size, "write() did not write expected bytes");
        Ok(buf.freeze())
    }

    /// Append the encoding of `value` to `buf`.
    pub fn write(&self, value: &T, buf: &mut BytesMut) -> Result<(), Error> {
        self.layout.write(value, buf)
    }

    /// Decode a value from `buf` starting at `offset`.
    ///
    /// Returns the value and the number of bytes consumed. Bytes past the
    /// value are left for the caller; use [Codec::decode] to require full
    /// consumption. `offset == buf.len()` is a valid starting position with
    /// zero bytes remaining.
    pub fn read_at(&self, buf: &[u8], offset: usize) -> Result<(T, usize), Error> {
        assert_valid_offset(buf, offset)?;
        self.layout.read_at(buf, offset)
    }

    /// Decode a value from the entirety of `buf`.
    ///
    /// Fails with [Error::ExtraData] if any bytes remain after the value.
    pub fn decode(&self, buf: &[u8]) -> Result<T, Error> {
        let (value, consumed) = self.read_at(buf, 0)?;
        let remaining = buf.len() - consumed;
        if remaining > 0 {
            return Err(Error::ExtraData(remaining));
        }
        Ok(value)
    }

    /// Whether two handles share one strategy instance.
    pub fn ptr_eq(this: &Self, other: &Self) -> bool {
        Arc::ptr_eq(&this.layout, &other.layout)
    }
}

/// Number of bytes `codec` produces, answered without a value when possible.
///
/// A fixed-size codec answers immediately and ignores `value`. A
/// variable-size codec requires a value and fails with [Error::MissingValue]
/// when none is given.
pub fn codec_size<T>(codec: &Codec<T>, value: Option<&T>) -> Result<usize, Error> {
    match codec.size_kind() {
        SizeKind::Fixed(size) => Ok(size),
        SizeKind::Variable => match value {
            Some(value) => codec.encoded_size(value),
            None => Err(Error::MissingValue),
        },
    }
}
