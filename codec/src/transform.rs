//! Adapters that reshape values around an existing codec without changing
//! its wire layout or size classification.

use crate::{
    codec::{Codec, Layout, SizeKind},
    Error,
};
use bytes::BytesMut;
use std::{fmt::Debug, sync::Arc};

// Map implementation
struct MapLayout<T, U> {
    inner: Codec<T>,
    into_inner: Box<dyn Fn(&U) -> T + Send + Sync>,
    from_inner: Box<dyn Fn(T) -> U + Send + Sync>,
}

impl<T, U> Layout<U> for MapLayout<T, U> {
    fn size_kind(&self) -> SizeKind {
        self.inner.size_kind()
    }

    fn encoded_size(&self, value: &U) -> Result<usize, Error> {
        self.inner.encoded_size(&(self.into_inner)(value))
    }

    fn write(&self, value: &U, buf: &mut BytesMut) -> Result<(), Error> {
        self.inner.write(&(self.into_inner)(value), buf)
    }

    fn read_at(&self, buf: &[u8], offset: usize) -> Result<(U, usize), Error> {
        let (inner, consumed) = self.inner.read_at(buf, offset)?;
        Ok(((self.from_inner)(inner), consumed))
    }
}

/// Codec for `U` expressed through an existing codec for `T`.
///
/// `into_inner` converts values for encoding and sizing; `from_inner`
/// converts decoded values back. The wire bytes and size kind are exactly
/// the inner codec's.
pub fn map_codec<T, U, F, G>(inner: Codec<T>, into_inner: F, from_inner: G) -> Codec<U>
where
    T: 'static,
    U: 'static,
    F: Fn(&U) -> T + Send + Sync + 'static,
    G: Fn(T) -> U + Send + Sync + 'static,
{
    Codec::new(MapLayout {
        inner,
        into_inner: Box::new(into_inner),
        from_inner: Box::new(from_inner),
    })
}

/// Codec for boxed values, sharing the wire layout of the unboxed codec.
///
/// Recursive types need a pointer somewhere in the cycle; this is what lets
/// `Option<Box<Node>>` reuse a `Codec<Node>`.
pub fn boxed<T: Clone + 'static>(inner: Codec<T>) -> Codec<Box<T>> {
    map_codec(inner, |value: &Box<T>| (**value).clone(), Box::new)
}

type ValueHook<T> = Arc<dyn Fn(&T) -> T + Send + Sync>;
type DecodedHook<T> = Arc<dyn Fn(T) -> T + Send + Sync>;

/// Hooks applied around an inner codec by [wrap_codec].
///
/// Every hook defaults to the identity.
pub struct Hooks<T> {
    pre_encode: Option<ValueHook<T>>,
    pre_size: Option<ValueHook<T>>,
    post_decode: Option<DecodedHook<T>>,
}

impl<T> Default for Hooks<T> {
    fn default() -> Self {
        Self {
            pre_encode: None,
            pre_size: None,
            post_decode: None,
        }
    }
}

impl<T> Hooks<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Transform the value before it is written.
    pub fn pre_encode(mut self, hook: impl Fn(&T) -> T + Send + Sync + 'static) -> Self {
        self.pre_encode = Some(Arc::new(hook));
        self
    }

    /// Transform the value before its encoded size is computed.
    pub fn pre_size(mut self, hook: impl Fn(&T) -> T + Send + Sync + 'static) -> Self {
        self.pre_size = Some(Arc::new(hook));
        self
    }

    /// Transform the value after it is read.
    pub fn post_decode(mut self, hook: impl Fn(T) -> T + Send + Sync + 'static) -> Self {
        self.post_decode = Some(Arc::new(hook));
        self
    }
}

struct WrapLayout<T> {
    inner: Codec<T>,
    hooks: Hooks<T>,
}

impl<T> Layout<T> for WrapLayout<T> {
    fn size_kind(&self) -> SizeKind {
        self.inner.size_kind()
    }

    fn encoded_size(&self, value: &T) -> Result<usize, Error> {
        match &self.hooks.pre_size {
            Some(hook) => self.inner.encoded_size(&hook(value)),
            None => self.inner.encoded_size(value),
        }
    }

    fn write(&self, value: &T, buf: &mut BytesMut) -> Result<(), Error> {
        match &self.hooks.pre_encode {
            Some(hook) => self.inner.write(&hook(value), buf),
            None => self.inner.write(value, buf),
        }
    }

    fn read_at(&self, buf: &[u8], offset: usize) -> Result<(T, usize), Error> {
        let (value, consumed) = self.inner.read_at(buf, offset)?;
        match &self.hooks.post_decode {
            Some(hook) => Ok((hook(value), consumed)),
            None => Ok((value, consumed)),
        }
    }
}

/// Codec applying [Hooks] around `inner` without changing its wire layout.
///
/// With nested wraps, the outermost `pre_encode` runs first and the
/// outermost `post_decode` runs last. A `pre_encode` hook that changes the
/// encoded size needs a matching `pre_size` hook, or size queries and
/// encodings will disagree.
pub fn wrap_codec<T: 'static>(inner: Codec<T>, hooks: Hooks<T>) -> Codec<T> {
    Codec::new(WrapLayout { inner, hooks })
}

// Constant implementation
struct ConstantLayout<T> {
    value: T,
    inner: Codec<T>,
}

impl<T> Layout<T> for ConstantLayout<T>
where
    T: PartialEq + Debug + Send + Sync,
{
    fn size_kind(&self) -> SizeKind {
        self.inner.size_kind()
    }

    fn encoded_size(&self, _: &T) -> Result<usize, Error> {
        self.inner.encoded_size(&self.value)
    }

    fn write(&self, _: &T, buf: &mut BytesMut) -> Result<(), Error> {
        self.inner.write(&self.value, buf)
    }

    fn read_at(&self, buf: &[u8], offset: usize) -> Result<(T, usize), Error> {
        let (decoded, consumed) = self.inner.read_at(buf, offset)?;
        if decoded != self.value {
            return Err(Error::InvalidData(
                "constant".into(),
                format!("expected {:?}, got {:?}", self.value, decoded),
            ));
        }
        Ok((decoded, consumed))
    }
}

/// Codec that always writes `value`, ignoring its encode input, and fails
/// decoding when the bytes do not decode back to `value`.
///
/// Useful for magic numbers and reserved fields.
pub fn constant_codec<T>(value: T, inner: Codec<T>) -> Codec<T>
where
    T: PartialEq + Debug + Send + Sync + 'static,
{
    Codec::new(ConstantLayout { value, inner })
}
