//! Codecs for numeric primitives, booleans, and the unit type.
//!
//! All numeric codecs are fixed-size and little-endian, matching the wire
//! format of the ledger programs this crate serves. `uint64` and wider decode
//! into native Rust integers, so no precision is lost on any representable
//! value.
//!
//! ## Strictness
//!
//! Decoding is strict: a boolean byte other than `0x00`/`0x01` is rejected
//! rather than coerced, so every accepted encoding is canonical.

use crate::{
    codec::{Codec, Layout, SizeKind},
    util::assert_sufficient_bytes,
    Error,
};
use bytes::{Buf, BufMut, BytesMut};
use paste::paste;

// Numeric codec implementation
macro_rules! impl_numeric {
    ($name:ident, $type:ty, $get_method:ident, $put_method:ident) => {
        paste! {
            struct [<$name:camel Layout>];

            impl Layout<$type> for [<$name:camel Layout>] {
                fn size_kind(&self) -> SizeKind {
                    SizeKind::Fixed(std::mem::size_of::<$type>())
                }

                fn encoded_size(&self, _: &$type) -> Result<usize, Error> {
                    Ok(std::mem::size_of::<$type>())
                }

                #[inline]
                fn write(&self, value: &$type, buf: &mut BytesMut) -> Result<(), Error> {
                    buf.$put_method(*value);
                    Ok(())
                }

                #[inline]
                fn read_at(&self, buf: &[u8], offset: usize) -> Result<($type, usize), Error> {
                    let size = std::mem::size_of::<$type>();
                    assert_sufficient_bytes(buf, offset, size)?;
                    let mut src = &buf[offset..];
                    Ok((src.$get_method(), size))
                }
            }

            #[doc = concat!("Little-endian fixed-size codec for `", stringify!($type), "` values.")]
            pub fn $name() -> Codec<$type> {
                Codec::new([<$name:camel Layout>])
            }
        }
    };
}

impl_numeric!(uint8, u8, get_u8, put_u8);
impl_numeric!(uint16, u16, get_u16_le, put_u16_le);
impl_numeric!(uint32, u32, get_u32_le, put_u32_le);
impl_numeric!(uint64, u64, get_u64_le, put_u64_le);
impl_numeric!(uint128, u128, get_u128_le, put_u128_le);
impl_numeric!(int8, i8, get_i8, put_i8);
impl_numeric!(int16, i16, get_i16_le, put_i16_le);
impl_numeric!(int32, i32, get_i32_le, put_i32_le);
impl_numeric!(int64, i64, get_i64_le, put_i64_le);
impl_numeric!(int128, i128, get_i128_le, put_i128_le);
impl_numeric!(float32, f32, get_f32_le, put_f32_le);
impl_numeric!(float64, f64, get_f64_le, put_f64_le);

// Boolean codec implementation
struct BooleanLayout;

impl Layout<bool> for BooleanLayout {
    fn size_kind(&self) -> SizeKind {
        SizeKind::Fixed(1)
    }

    fn encoded_size(&self, _: &bool) -> Result<usize, Error> {
        Ok(1)
    }

    #[inline]
    fn write(&self, value: &bool, buf: &mut BytesMut) -> Result<(), Error> {
        buf.put_u8(u8::from(*value));
        Ok(())
    }

    #[inline]
    fn read_at(&self, buf: &[u8], offset: usize) -> Result<(bool, usize), Error> {
        assert_sufficient_bytes(buf, offset, 1)?;
        match buf[offset] {
            0 => Ok((false, 1)),
            1 => Ok((true, 1)),
            byte => Err(Error::InvalidData(
                "boolean".into(),
                format!("invalid boolean byte: {byte}"),
            )),
        }
    }
}

/// Strict 1-byte codec for `bool` values.
///
/// `false` encodes as `0x00` and `true` as `0x01`; any other byte fails
/// decoding.
pub fn boolean() -> Codec<bool> {
    Codec::new(BooleanLayout)
}

// Unit codec implementation
struct UnitLayout;

impl Layout<()> for UnitLayout {
    fn size_kind(&self) -> SizeKind {
        SizeKind::Fixed(0)
    }

    fn encoded_size(&self, _: &()) -> Result<usize, Error> {
        Ok(0)
    }

    fn write(&self, _: &(), _: &mut BytesMut) -> Result<(), Error> {
        Ok(())
    }

    fn read_at(&self, _: &[u8], _: usize) -> Result<((), usize), Error> {
        Ok(((), 0))
    }
}

/// Zero-width codec for the unit type.
///
/// Writes and reads nothing. Useful as the payload of enum variants that
/// carry no data.
pub fn unit() -> Codec<()> {
    Codec::new(UnitLayout)
}
