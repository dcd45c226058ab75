//! Codec for optional values.

use crate::{
    codec::{Codec, Layout, SizeKind},
    util::assert_sufficient_bytes,
    Error,
};
use bytes::{BufMut, BytesMut};

struct OptionLayout<T> {
    inner: Codec<T>,
    kind: SizeKind,
}

impl<T> Layout<Option<T>> for OptionLayout<T> {
    fn size_kind(&self) -> SizeKind {
        self.kind
    }

    fn encoded_size(&self, value: &Option<T>) -> Result<usize, Error> {
        match value {
            Some(inner) => Ok(1 + self.inner.encoded_size(inner)?),
            None => match self.inner.fixed_size() {
                Some(size) => Ok(1 + size),
                None => Ok(1),
            },
        }
    }

    fn write(&self, value: &Option<T>, buf: &mut BytesMut) -> Result<(), Error> {
        match value {
            Some(inner) => {
                buf.put_u8(1);
                self.inner.write(inner, buf)
            }
            None => {
                buf.put_u8(0);
                // A fixed-size payload region is zero-padded so the option
                // keeps its constant width.
                if let Some(size) = self.inner.fixed_size() {
                    buf.put_bytes(0, size);
                }
                Ok(())
            }
        }
    }

    fn read_at(&self, buf: &[u8], offset: usize) -> Result<(Option<T>, usize), Error> {
        assert_sufficient_bytes(buf, offset, 1)?;
        match buf[offset] {
            0 => match self.inner.fixed_size() {
                Some(size) => {
                    // Padding is skipped, not validated.
                    assert_sufficient_bytes(buf, offset + 1, size)?;
                    Ok((None, 1 + size))
                }
                None => Ok((None, 1)),
            },
            1 => {
                let (value, consumed) = self.inner.read_at(buf, offset + 1)?;
                Ok((Some(value), 1 + consumed))
            }
            byte => Err(Error::InvalidData(
                "option".into(),
                format!("invalid discriminator: {byte}"),
            )),
        }
    }
}

/// Codec for optional values behind a 1-byte discriminator.
///
/// `None` encodes as `0x00`, `Some` as `0x01` followed by the payload. When
/// the inner codec is fixed-size the option is fixed-size too: `None`
/// zero-pads the payload region and decoding skips the padding without
/// validating it. Any discriminator other than `0x00`/`0x01` fails decoding.
pub fn option<T: 'static>(inner: Codec<T>) -> Codec<Option<T>> {
    let kind = match inner.fixed_size() {
        Some(size) => SizeKind::Fixed(1 + size),
        None => SizeKind::Variable,
    };
    Codec::new(OptionLayout { inner, kind })
}
