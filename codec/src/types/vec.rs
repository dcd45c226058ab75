//! Codecs for repeated elements: fixed-count arrays, length-prefixed
//! vectors, and ordered maps.
//!
//! Length prefixes read from untrusted input never drive allocation beyond
//! the bytes actually present, so a hostile count fails cleanly instead of
//! reserving gigabytes.

use crate::{
    codec::{Codec, Layout, SizeKind},
    types::bytes::{assert_prefixable, read_length_prefix, LENGTH_PREFIX},
    util::assert_sufficient_bytes,
    Error,
};
use bytes::{BufMut, BytesMut};
use std::collections::BTreeMap;

// Fixed-count array implementation
struct ArrayLayout<T> {
    inner: Codec<T>,
    len: usize,
    kind: SizeKind,
}

impl<T> Layout<Vec<T>> for ArrayLayout<T> {
    fn size_kind(&self) -> SizeKind {
        self.kind
    }

    fn encoded_size(&self, value: &Vec<T>) -> Result<usize, Error> {
        self.assert_len(value)?;
        let mut size = 0;
        for item in value {
            size += self.inner.encoded_size(item)?;
        }
        Ok(size)
    }

    fn write(&self, value: &Vec<T>, buf: &mut BytesMut) -> Result<(), Error> {
        self.assert_len(value)?;
        for item in value {
            self.inner.write(item, buf)?;
        }
        Ok(())
    }

    fn read_at(&self, buf: &[u8], offset: usize) -> Result<(Vec<T>, usize), Error> {
        let mut items = Vec::with_capacity(self.len);
        let mut consumed = 0;
        for _ in 0..self.len {
            let (item, len) = self.inner.read_at(buf, offset + consumed)?;
            items.push(item);
            consumed += len;
        }
        Ok((items, consumed))
    }
}

impl<T> ArrayLayout<T> {
    fn assert_len(&self, value: &Vec<T>) -> Result<(), Error> {
        if value.len() != self.len {
            return Err(Error::InvalidData(
                "array".into(),
                format!("expected {} elements, got {}", self.len, value.len()),
            ));
        }
        Ok(())
    }
}

/// Codec for exactly `len` repetitions of `inner`, with no count prefix.
///
/// Encoding a vector whose length differs from `len` fails with
/// [Error::InvalidData]. Fixed-size elements make the array fixed-size.
pub fn array<T: 'static>(inner: Codec<T>, len: usize) -> Codec<Vec<T>> {
    let kind = match inner.fixed_size() {
        Some(size) => SizeKind::Fixed(
            size.checked_mul(len)
                .expect("array byte size overflows usize"),
        ),
        None => SizeKind::Variable,
    };
    Codec::new(ArrayLayout { inner, len, kind })
}

// Length-prefixed vector implementation
struct VecLayout<T> {
    inner: Codec<T>,
}

impl<T> Layout<Vec<T>> for VecLayout<T> {
    fn size_kind(&self) -> SizeKind {
        SizeKind::Variable
    }

    fn encoded_size(&self, value: &Vec<T>) -> Result<usize, Error> {
        assert_prefixable("vec", value.len())?;
        let mut size = LENGTH_PREFIX;
        for item in value {
            size += self.inner.encoded_size(item)?;
        }
        Ok(size)
    }

    fn write(&self, value: &Vec<T>, buf: &mut BytesMut) -> Result<(), Error> {
        let count = assert_prefixable("vec", value.len())?;
        buf.put_u32_le(count);
        for item in value {
            self.inner.write(item, buf)?;
        }
        Ok(())
    }

    fn read_at(&self, buf: &[u8], offset: usize) -> Result<(Vec<T>, usize), Error> {
        let (count, prefix) = read_length_prefix(buf, offset)?;
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

/// Codec for a vector of `inner` values behind a 4-byte little-endian count
/// prefix.
///
/// Always variable-size: the count is part of the encoding even when every
/// element is fixed-size.
pub fn vec<T: 'static>(inner: Codec<T>) -> Codec<Vec<T>> {
    Codec::new(VecLayout { inner })
}

// Ordered map implementation
struct BTreeMapLayout<K, V> {
    key: Codec<K>,
    value: Codec<V>,
}

impl<K: Ord, V> Layout<BTreeMap<K, V>> for BTreeMapLayout<K, V> {
    fn size_kind(&self) -> SizeKind {
        SizeKind::Variable
    }

    fn encoded_size(&self, value: &BTreeMap<K, V>) -> Result<usize, Error> {
        assert_prefixable("btree_map", value.len())?;
        let mut size = LENGTH_PREFIX;
        for (k, v) in value {
            size += self.key.encoded_size(k)?;
            size += self.value.encoded_size(v)?;
        }
        Ok(size)
    }

    fn write(&self, value: &BTreeMap<K, V>, buf: &mut BytesMut) -> Result<(), Error> {
        let count = assert_prefixable("btree_map", value.len())?;
        buf.put_u32_le(count);
        for (k, v) in value {
            self.key.write(k, buf)?;
            self.value.write(v, buf)?;
        }
        Ok(())
    }

    fn read_at(&self, buf: &[u8], offset: usize) -> Result<(BTreeMap<K, V>, usize), Error> {
        let (count, prefix) = read_length_prefix(buf, offset)?;
        let mut map = BTreeMap::new();
        let mut consumed = prefix;
        for _ in 0..count {
            let (k, len) = self.key.read_at(buf, offset + consumed)?;
            consumed += len;
            let (v, len) = self.value.read_at(buf, offset + consumed)?;
            consumed += len;
            // Entries must arrive in strictly ascending key order, so every
            // accepted encoding is canonical.
            if let Some((last, _)) = map.last_key_value() {
                if *last >= k {
                    return Err(Error::InvalidData(
                        "btree_map".into(),
                        "keys out of order".into(),
                    ));
                }
            }
            map.insert(k, v);
        }
        Ok((map, consumed))
    }
}

/// Codec for an ordered map behind a 4-byte little-endian entry-count
/// prefix.
///
/// Entries are written in ascending key order and decoding rejects any
/// other order, including duplicate keys.
pub fn btree_map<K: Ord + 'static, V: 'static>(
    key: Codec<K>,
    value: Codec<V>,
) -> Codec<BTreeMap<K, V>> {
    Codec::new(BTreeMapLayout { key, value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{string, uint16, uint32, uint8};

    #[test]
    fn test_array_fixed() {
        let codec = array(uint16(), 3);
        assert_eq!(codec.size_kind(), SizeKind::Fixed(6));
        let value = vec![1u16, 2, 3];
        let encoded = codec.encode(&value).unwrap();
        assert_eq!(encoded, &[1, 0, 2, 0, 3, 0][..]);
        assert_eq!(codec.decode(&encoded), Ok(value));
    }

    #[test]
    fn test_array_variable() {
        let codec = array(string(), 2);
        assert_eq!(codec.size_kind(), SizeKind::Variable);
        let value = vec!["a".to_string(), "bc".to_string()];
        let encoded = codec.encode(&value).unwrap();
        assert_eq!(codec.encoded_size(&value).unwrap(), encoded.len());
        assert_eq!(codec.decode(&encoded), Ok(value));
    }

    #[test]
    fn test_array_wrong_length() {
        let codec = array(uint8(), 4);
        let err = codec.encode(&vec![1u8, 2]).unwrap_err();
        assert_eq!(
            err,
            Error::InvalidData("array".into(), "expected 4 elements, got 2".into())
        );
    }

    #[test]
    fn test_array_empty() {
        let codec = array(uint32(), 0);
        assert_eq!(codec.size_kind(), SizeKind::Fixed(0));
        assert_eq!(codec.encode(&Vec::new()).unwrap().len(), 0);
        assert_eq!(codec.decode(&[]), Ok(Vec::new()));
    }

    #[test]
    fn test_array_truncated() {
        let codec = array(uint16(), 3);
        assert_eq!(
            codec.decode(&[1, 0, 2, 0]),
            Err(Error::InsufficientBytes {
                required: 2,
                available: 0,
                offset: 4,
            })
        );
    }

    #[test]
    fn test_vec() {
        let codec = vec(uint16());
        // The count prefix keeps vectors variable-size even when elements
        // are fixed-size.
        assert_eq!(codec.size_kind(), SizeKind::Variable);
        let value = vec![5u16, 6];
        let encoded = codec.encode(&value).unwrap();
        assert_eq!(encoded, &[2, 0, 0, 0, 5, 0, 6, 0][..]);
        assert_eq!(codec.decode(&encoded), Ok(value));
    }

    #[test]
    fn test_vec_empty() {
        let codec = vec(uint32());
        let encoded = codec.encode(&Vec::new()).unwrap();
        assert_eq!(encoded, &[0, 0, 0, 0][..]);
        assert_eq!(codec.decode(&encoded), Ok(Vec::new()));
    }

    #[test]
    fn test_vec_nested() {
        let codec = vec(vec(uint8()));
        let value = vec![vec![1u8], vec![], vec![2, 3]];
        let encoded = codec.encode(&value).unwrap();
        assert_eq!(codec.encoded_size(&value).unwrap(), encoded.len());
        assert_eq!(codec.decode(&encoded), Ok(value));
    }

    #[test]
    fn test_vec_hostile_count_fixed_elements() {
        // A count of u32::MAX with no payload must fail the bounds check,
        // not attempt a multi-gigabyte allocation.
        let codec = vec(uint16());
        let err = codec.decode(&[0xFF, 0xFF, 0xFF, 0xFF]).unwrap_err();
        assert!(matches!(err, Error::InsufficientBytes { offset: 4, .. }));
    }

    #[test]
    fn test_vec_hostile_count_variable_elements() {
        let codec = vec(string());
        let err = codec.decode(&[0xFF, 0xFF, 0xFF, 0xFF]).unwrap_err();
        assert!(matches!(err, Error::InsufficientBytes { .. }));
    }

    #[test]
    fn test_btree_map() {
        let codec = btree_map(uint8(), string());
        let mut value = BTreeMap::new();
        value.insert(2u8, "b".to_string());
        value.insert(1u8, "a".to_string());
        let encoded = codec.encode(&value).unwrap();
        // Two entries, ascending key order.
        assert_eq!(
            encoded,
            &[2, 0, 0, 0, 1, 1, 0, 0, 0, b'a', 2, 1, 0, 0, 0, b'b'][..]
        );
        assert_eq!(codec.decode(&encoded), Ok(value));
    }

    #[test]
    fn test_btree_map_rejects_unordered_keys() {
        let codec = btree_map(uint8(), uint8());
        // Keys 2 then 1.
        let err = codec.decode(&[2, 0, 0, 0, 2, 20, 1, 10]).unwrap_err();
        assert_eq!(
            err,
            Error::InvalidData("btree_map".into(), "keys out of order".into())
        );
        // Duplicate keys are out of order too.
        let err = codec.decode(&[2, 0, 0, 0, 1, 10, 1, 11]).unwrap_err();
        assert_eq!(
            err,
            Error::InvalidData("btree_map".into(), "keys out of order".into())
        );
    }

    #[test]
    fn test_btree_map_empty() {
        let codec = btree_map(uint32(), uint32());
        let encoded = codec.encode(&BTreeMap::new()).unwrap();
        assert_eq!(encoded, &[0, 0, 0, 0][..]);
        assert_eq!(codec.decode(&encoded), Ok(BTreeMap::new()));
    }
}
