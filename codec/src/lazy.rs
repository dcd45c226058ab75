//! Deferred codec construction for recursive layouts.
//!
//! A deferred codec wraps a factory that is not run until the codec is
//! first used to size, encode, or decode a value. Recursive layouts are
//! described by factories that (transitively) defer back to themselves,
//! which terminates because construction never runs factories.

use crate::{
    codec::{Codec, Layout, SizeKind},
    Error,
};
use bytes::BytesMut;
use std::sync::Mutex;

/// The size classification a deferred factory is promised to deliver.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Expectation {
    Any,
    Fixed,
    Variable,
}

struct LazyLayout<T> {
    factory: Box<dyn Fn() -> Codec<T> + Send + Sync>,
    cell: Mutex<Option<Codec<T>>>,
    expectation: Expectation,
    context: &'static str,
}

impl<T> LazyLayout<T> {
    /// Run the factory on first use; afterwards return the cached codec.
    fn resolve(&self) -> Result<Codec<T>, Error> {
        if let Some(resolved) = self.cell.lock().unwrap().as_ref() {
            return Ok(resolved.clone());
        }
        // The factory runs with the lock released so it can freely build
        // composites that defer back to this codec.
        let produced = (self.factory)();
        self.check(&produced)?;
        let mut cell = self.cell.lock().unwrap();
        // First successful resolution wins if the factory re-entered.
        Ok(cell.get_or_insert(produced).clone())
    }

    fn check(&self, produced: &Codec<T>) -> Result<(), Error> {
        match self.expectation {
            Expectation::Any => Ok(()),
            Expectation::Fixed if produced.is_fixed_size() => Ok(()),
            Expectation::Variable if produced.is_variable_size() => Ok(()),
            Expectation::Fixed => Err(Error::InvalidData(
                self.context.into(),
                "factory must return a fixed-size codec".into(),
            )),
            Expectation::Variable => Err(Error::InvalidData(
                self.context.into(),
                "factory must return a variable-size codec".into(),
            )),
        }
    }
}

impl<T> Layout<T> for LazyLayout<T> {
    // A deferred codec never resolves just to answer classification, so
    // composites can derive their kinds eagerly without running factories.
    fn size_kind(&self) -> SizeKind {
        SizeKind::Variable
    }

    fn encoded_size(&self, value: &T) -> Result<usize, Error> {
        self.resolve()?.encoded_size(value)
    }

    fn write(&self, value: &T, buf: &mut BytesMut) -> Result<(), Error> {
        self.resolve()?.write(value, buf)
    }

    fn read_at(&self, buf: &[u8], offset: usize) -> Result<(T, usize), Error> {
        self.resolve()?.read_at(buf, offset)
    }
}

fn lazy_with<T, F>(factory: F, expectation: Expectation, context: &'static str) -> Codec<T>
where
    T: 'static,
    F: Fn() -> Codec<T> + Send + Sync + 'static,
{
    Codec::new(LazyLayout {
        factory: Box::new(factory),
        cell: Mutex::new(None),
        expectation,
        context,
    })
}

/// Codec whose strategy is built by `factory` on first use.
///
/// The factory runs at most once per codec across all clones; a failed
/// resolution leaves the codec unresolved and the next use retries.
/// Deferred codecs always classify as variable-size, whatever the factory
/// returns.
pub fn lazy<T, F>(factory: F) -> Codec<T>
where
    T: 'static,
    F: Fn() -> Codec<T> + Send + Sync + 'static,
{
    lazy_with(factory, Expectation::Any, "lazy")
}

/// [lazy], additionally requiring the factory to return a fixed-size codec.
///
/// The requirement is checked once, at resolution. A factory returning a
/// variable-size codec fails every use with [Error::InvalidData]; the
/// wrapper itself still classifies as variable-size.
pub fn lazy_fixed<T, F>(factory: F) -> Codec<T>
where
    T: 'static,
    F: Fn() -> Codec<T> + Send + Sync + 'static,
{
    lazy_with(factory, Expectation::Fixed, "lazy_fixed")
}

/// [lazy], additionally requiring the factory to return a variable-size
/// codec.
pub fn lazy_variable<T, F>(factory: F) -> Codec<T>
where
    T: 'static,
    F: Fn() -> Codec<T> + Send + Sync + 'static,
{
    lazy_with(factory, Expectation::Variable, "lazy_variable")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{boxed, map_codec, option, pair, string, uint32, uint8};
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    #[test]
    fn test_lazy_resolves_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counted = Arc::clone(&calls);
        let codec = lazy(move || {
            counted.fetch_add(1, Ordering::SeqCst);
            uint32()
        });
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        let encoded = codec.encode(&7).unwrap();
        assert_eq!(codec.decode(&encoded), Ok(7));
        assert_eq!(codec.encoded_size(&7), Ok(4));
        let other = codec.clone();
        assert_eq!(other.decode(&encoded), Ok(7));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_lazy_classifies_without_resolving() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counted = Arc::clone(&calls);
        let codec = lazy(move || {
            counted.fetch_add(1, Ordering::SeqCst);
            uint32()
        });
        // Classification must not run the factory, or composite
        // construction over deferred codecs would re-enter it.
        assert_eq!(codec.size_kind(), SizeKind::Variable);
        assert!(codec.is_variable_size());
        assert_eq!(codec.fixed_size(), None);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_lazy_fixed() {
        let codec = lazy_fixed(uint32);
        assert_eq!(codec.size_kind(), SizeKind::Variable);
        let encoded = codec.encode(&9).unwrap();
        assert_eq!(codec.decode(&encoded), Ok(9));
    }

    /// A variable-size codec for `u32`, for exercising expectation checks.
    fn stringly_uint32() -> Codec<u32> {
        map_codec(
            string(),
            |value: &u32| value.to_string(),
            |text| text.parse().unwrap(),
        )
    }

    #[test]
    fn test_lazy_fixed_rejects_variable_factory() {
        let codec = lazy_fixed(stringly_uint32);
        assert_eq!(
            codec.encode(&7).unwrap_err(),
            Error::InvalidData(
                "lazy_fixed".into(),
                "factory must return a fixed-size codec".into()
            )
        );
    }

    #[test]
    fn test_lazy_variable_rejects_fixed_factory() {
        let codec = lazy_variable(uint32);
        assert_eq!(
            codec.encode(&7).unwrap_err(),
            Error::InvalidData(
                "lazy_variable".into(),
                "factory must return a variable-size codec".into()
            )
        );
    }

    #[test]
    fn test_lazy_retries_after_failed_resolution() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counted = Arc::clone(&calls);
        let codec = lazy_fixed(move || {
            if counted.fetch_add(1, Ordering::SeqCst) == 0 {
                stringly_uint32()
            } else {
                uint32()
            }
        });
        // The first resolution fails the expectation and is not cached.
        assert!(codec.encode(&7).is_err());
        // The next use runs the factory again and succeeds.
        assert_eq!(codec.decode(&codec.encode(&7).unwrap()), Ok(7));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Node {
        value: u8,
        next: Option<Box<Node>>,
    }

    fn node_codec() -> Codec<Node> {
        map_codec(
            pair(uint8(), option(boxed(lazy(node_codec)))),
            |node: &Node| (node.value, node.next.clone()),
            |(value, next)| Node { value, next },
        )
    }

    #[test]
    fn test_lazy_recursive_list() {
        let codec = node_codec();
        let list = Node {
            value: 1,
            next: Some(Box::new(Node {
                value: 2,
                next: Some(Box::new(Node {
                    value: 3,
                    next: None,
                })),
            })),
        };
        let encoded = codec.encode(&list).unwrap();
        // value, then a 1-byte discriminator per link.
        assert_eq!(encoded, &[1, 1, 2, 1, 3, 0][..]);
        assert_eq!(codec.decode(&encoded), Ok(list));
    }
}
