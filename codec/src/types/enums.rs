//! Codecs for tagged unions.
//!
//! A union value is encoded as a 1-byte discriminator followed by the
//! payload of the selected variant. Variant membership and payload access
//! are expressed as typed closures, so no runtime introspection of the
//! union value is ever needed.

use crate::{
    codec::{Codec, Layout, SizeKind},
    util::assert_sufficient_bytes,
    Error,
};
use bytes::{BufMut, BytesMut};
use std::sync::Arc;

type WriteFn<E> = Arc<dyn Fn(&E, &mut BytesMut) -> Result<bool, Error> + Send + Sync>;
type SizeFn<E> = Arc<dyn Fn(&E) -> Result<Option<usize>, Error> + Send + Sync>;
type ReadFn<E> = Arc<dyn Fn(&[u8], usize) -> Result<(E, usize), Error> + Send + Sync>;

/// One variant of a tagged union: a name for diagnostics, a wire tag, and
/// the typed bridge between the union and its payload.
pub struct Variant<E> {
    name: String,
    tag: u8,
    payload_kind: SizeKind,
    write: WriteFn<E>,
    size: SizeFn<E>,
    read: ReadFn<E>,
}

impl<E> Variant<E> {
    /// The diagnostic name given at construction.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The wire discriminator.
    pub fn tag(&self) -> u8 {
        self.tag
    }
}

/// Describe one variant of a tagged union.
///
/// `project` returns the payload when the value is this variant and `None`
/// otherwise; it is how the enum codec selects a variant during encoding.
/// `inject` rebuilds the union value from a decoded payload.
pub fn variant<E, P, Pr, In>(
    name: impl Into<String>,
    tag: u8,
    payload: Codec<P>,
    project: Pr,
    inject: In,
) -> Variant<E>
where
    E: 'static,
    P: 'static,
    Pr: Fn(&E) -> Option<P> + Send + Sync + 'static,
    In: Fn(P) -> E + Send + Sync + 'static,
{
    let payload_kind = payload.size_kind();
    let project = Arc::new(project);

    let write: WriteFn<E> = {
        let payload = payload.clone();
        let project = Arc::clone(&project);
        Arc::new(move |value: &E, buf: &mut BytesMut| match project(value) {
            Some(inner) => {
                buf.put_u8(tag);
                payload.write(&inner, buf)?;
                Ok(true)
            }
            None => Ok(false),
        })
    };

    let size: SizeFn<E> = {
        let payload = payload.clone();
        let project = Arc::clone(&project);
        Arc::new(move |value: &E| match project(value) {
            Some(inner) => Ok(Some(1 + payload.encoded_size(&inner)?)),
            None => Ok(None),
        })
    };

    let read: ReadFn<E> = Arc::new(move |buf: &[u8], offset: usize| {
        let (inner, consumed) = payload.read_at(buf, offset)?;
        Ok((inject(inner), consumed))
    });

    Variant {
        name: name.into(),
        tag,
        payload_kind,
        write,
        size,
        read,
    }
}

struct EnumLayout<E> {
    variants: Vec<Variant<E>>,
    kind: SizeKind,
}

impl<E> Layout<E> for EnumLayout<E> {
    fn size_kind(&self) -> SizeKind {
        self.kind
    }

    fn encoded_size(&self, value: &E) -> Result<usize, Error> {
        for variant in &self.variants {
            if let Some(size) = (variant.size)(value)? {
                return Ok(size);
            }
        }
        Err(unmatched_value())
    }

    fn write(&self, value: &E, buf: &mut BytesMut) -> Result<(), Error> {
        for variant in &self.variants {
            if (variant.write)(value, buf)? {
                return Ok(());
            }
        }
        Err(unmatched_value())
    }

    fn read_at(&self, buf: &[u8], offset: usize) -> Result<(E, usize), Error> {
        assert_sufficient_bytes(buf, offset, 1)?;
        let tag = buf[offset];
        let variant = self
            .variants
            .iter()
            .find(|variant| variant.tag == tag)
            .ok_or_else(|| {
                Error::InvalidData("enum".into(), format!("unknown discriminator: {tag}"))
            })?;
        let (value, consumed) = (variant.read)(buf, offset + 1)?;
        Ok((value, 1 + consumed))
    }
}

fn unmatched_value() -> Error {
    Error::InvalidData("enum".into(), "value matches no declared variant".into())
}

/// Fixed exactly when every payload is fixed with one shared width.
fn enum_kind<E>(variants: &[Variant<E>]) -> SizeKind {
    let SizeKind::Fixed(first) = variants[0].payload_kind else {
        return SizeKind::Variable;
    };
    for variant in &variants[1..] {
        if variant.payload_kind != SizeKind::Fixed(first) {
            return SizeKind::Variable;
        }
    }
    SizeKind::Fixed(1 + first)
}

/// Codec for a tagged union over the given variants.
///
/// Encoding selects the first variant whose projection matches the value;
/// a value no variant claims fails with [Error::InvalidData]. Decoding
/// dispatches on the discriminator byte and rejects unknown tags.
///
/// # Panics
///
/// Panics if `variants` is empty or two variants share a discriminator.
pub fn enum_codec<E: 'static>(variants: Vec<Variant<E>>) -> Codec<E> {
    assert!(!variants.is_empty(), "enum requires at least one variant");
    for (i, variant) in variants.iter().enumerate() {
        for other in &variants[..i] {
            assert!(
                variant.tag != other.tag,
                "duplicate discriminator {} for variants {} and {}",
                variant.tag,
                other.name,
                variant.name,
            );
        }
    }
    let kind = enum_kind(&variants);
    Codec::new(EnumLayout { variants, kind })
}
