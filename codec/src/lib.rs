//! Serialize structured data with composable codecs.
//!
//! # Overview
//!
//! A binary serialization library designed to efficiently and safely:
//! - Describe binary layouts as first-class [Codec] values, composed at runtime
//! - Deserialize untrusted binary input without panics or unbounded allocation
//!
//! # Supported Shapes
//!
//! Constructors are provided for:
//! - Primitives: [uint8] through [uint128], [int8] through [int128],
//!   [float32], [float64], [boolean], [unit]
//! - Byte data: [string], [bytes](crate::bytes), [fixed_bytes], [public_key]
//! - Collections: [array], [vec](crate::vec), [btree_map], [shortvec::compact_vec]
//! - Composites: [pair] through [tuple6], [option], [enum_codec], and the
//!   [struct_codec!] macro
//! - Combinators: [map_codec], [boxed], [wrap_codec], [constant_codec],
//!   [lazy], [memoize]
//!
//! Every codec reports its [SizeKind] at construction: composites over
//! fixed-size parts are themselves fixed-size, with no value in hand.
//!
//! # Example (Fixed Size)
//!
//! ```
//! use vellum_codec::{pair, uint32, Codec};
//!
//! let point: Codec<(u32, u32)> = pair(uint32(), uint32());
//! assert_eq!(point.fixed_size(), Some(8));
//!
//! let encoded = point.encode(&(3, 4)).unwrap();
//! assert_eq!(point.decode(&encoded), Ok((3, 4)));
//! ```
//!
//! # Example (Variable Size)
//!
//! ```
//! use vellum_codec::{option, string, struct_codec, uint64, vec, Codec};
//!
//! #[derive(Debug, Clone, PartialEq)]
//! struct Transfer {
//!     amount: u64,
//!     memo: Option<String>,
//!     signers: Vec<String>,
//! }
//!
//! let codec: Codec<Transfer> = struct_codec!(Transfer {
//!     amount: uint64(),
//!     memo: option(string()),
//!     signers: vec(string()),
//! });
//!
//! let transfer = Transfer {
//!     amount: 100,
//!     memo: Some("rent".into()),
//!     signers: vec!["alice".into()],
//! };
//! let encoded = codec.encode(&transfer).unwrap();
//! assert_eq!(codec.decode(&encoded), Ok(transfer));
//! ```
//!
//! # Example (Recursive)
//!
//! ```
//! use vellum_codec::{boxed, lazy, option, struct_codec, uint32, Codec};
//!
//! #[derive(Debug, Clone, PartialEq)]
//! struct Node {
//!     value: u32,
//!     next: Option<Box<Node>>,
//! }
//!
//! // The factory is deferred until first use, so the definition can refer
//! // to itself.
//! fn node_codec() -> Codec<Node> {
//!     struct_codec!(Node {
//!         value: uint32(),
//!         next: option(boxed(lazy(node_codec))),
//!     })
//! }
//!
//! let list = Node {
//!     value: 1,
//!     next: Some(Box::new(Node { value: 2, next: None })),
//! };
//! let codec = node_codec();
//! let encoded = codec.encode(&list).unwrap();
//! assert_eq!(codec.decode(&encoded), Ok(list));
//! ```

pub mod codec;
pub mod error;
pub mod lazy;
mod macros;
pub mod memo;
pub mod shortvec;
pub mod transform;
pub mod types;
pub mod util;

// Re-export main types and functions
pub use codec::{codec_size, Codec, Layout, SizeKind};
pub use error::Error;
pub use lazy::{lazy, lazy_fixed, lazy_variable};
pub use memo::memoize;
pub use shortvec::{compact_u16, compact_vec};
pub use transform::{boxed, constant_codec, map_codec, wrap_codec, Hooks};
pub use types::{
    bytes::{bytes, fixed_bytes, public_key, string, PublicKey},
    enums::{enum_codec, variant, Variant},
    option::option,
    primitives::{
        boolean, float32, float64, int128, int16, int32, int64, int8, uint128, uint16, uint32,
        uint64, uint8, unit,
    },
    tuple::{pair, tuple3, tuple4, tuple5, tuple6},
    vec::{array, btree_map, vec},
};
pub use util::{assert_sufficient_bytes, assert_valid_offset};
