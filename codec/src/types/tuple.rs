//! Codecs for tuples of independently encoded values.
//!
//! Elements are written in order with no framing between them. A tuple is
//! fixed-size exactly when every element is.

use crate::{
    codec::{Codec, Layout, SizeKind},
    Error,
};
use bytes::BytesMut;
use paste::paste;

/// Sum of child size kinds: all fixed yields a fixed total, any variable
/// child makes the composite variable.
fn sum_fixed(kinds: &[SizeKind]) -> SizeKind {
    let mut total = 0;
    for kind in kinds.iter().copied() {
        match kind {
            SizeKind::Fixed(size) => total += size,
            SizeKind::Variable => return SizeKind::Variable,
        }
    }
    SizeKind::Fixed(total)
}

// Tuple implementation for each supported arity.
macro_rules! impl_tuple_codec {
    ($name:ident, $doc:expr, $($index:literal),+) => {
        paste! {
            struct [<$name:camel Layout>]<$( [<T $index>] ),+> {
                codecs: ( $( Codec<[<T $index>]>, )+ ),
                kind: SizeKind,
            }

            impl<$( [<T $index>] ),+> Layout<( $( [<T $index>], )+ )>
                for [<$name:camel Layout>]<$( [<T $index>] ),+>
            {
                fn size_kind(&self) -> SizeKind {
                    self.kind
                }

                fn encoded_size(
                    &self,
                    value: &( $( [<T $index>], )+ ),
                ) -> Result<usize, Error> {
                    Ok(0 $( + self.codecs.$index.encoded_size(&value.$index)? )+)
                }

                fn write(
                    &self,
                    value: &( $( [<T $index>], )+ ),
                    buf: &mut BytesMut,
                ) -> Result<(), Error> {
                    $( self.codecs.$index.write(&value.$index, buf)?; )+
                    Ok(())
                }

                fn read_at(
                    &self,
                    buf: &[u8],
                    offset: usize,
                ) -> Result<(( $( [<T $index>], )+ ), usize), Error> {
                    let mut consumed = 0;
                    let value = ( $( {
                        let (item, len) = self.codecs.$index.read_at(buf, offset + consumed)?;
                        consumed += len;
                        item
                    }, )+ );
                    Ok((value, consumed))
                }
            }

            #[doc = $doc]
            pub fn $name<$( [<T $index>]: 'static ),+>(
                $( [<codec $index>]: Codec<[<T $index>]> ),+
            ) -> Codec<( $( [<T $index>], )+ )> {
                let kind = sum_fixed(&[ $( [<codec $index>].size_kind() ),+ ]);
                Codec::new([<$name:camel Layout>] {
                    codecs: ( $( [<codec $index>], )+ ),
                    kind,
                })
            }
        }
    };
}

impl_tuple_codec!(pair, "Codec for a pair of values, encoded in order.", 0, 1);
impl_tuple_codec!(tuple3, "Codec for a 3-tuple of values, encoded in order.", 0, 1, 2);
impl_tuple_codec!(tuple4, "Codec for a 4-tuple of values, encoded in order.", 0, 1, 2, 3);
impl_tuple_codec!(tuple5, "Codec for a 5-tuple of values, encoded in order.", 0, 1, 2, 3, 4);
impl_tuple_codec!(tuple6, "Codec for a 6-tuple of values, encoded in order.", 0, 1, 2, 3, 4, 5);
