//! Codecs for primitive and composite types.

pub mod bytes;
pub mod enums;
pub mod option;
pub mod primitives;
pub mod tuple;
pub mod vec;
