//! Macros for deriving codecs from struct definitions.

/// Builds a [Codec](crate::Codec) for a named-field struct from one codec
/// per field.
///
/// Fields are encoded in declaration order with no tag or padding between
/// them, exactly as the equivalent chain of [pair](crate::pair) codecs
/// would produce. A struct of fixed-size fields yields a fixed-size codec.
/// Field types must implement [Clone].
///
/// ```
/// use vellum_codec::{string, struct_codec, uint64, Codec};
///
/// #[derive(Debug, Clone, PartialEq)]
/// struct Account {
///     lamports: u64,
///     owner: String,
/// }
///
/// let codec: Codec<Account> = struct_codec!(Account {
///     lamports: uint64(),
///     owner: string(),
/// });
/// let account = Account {
///     lamports: 5,
///     owner: "alice".into(),
/// };
/// let encoded = codec.encode(&account).unwrap();
/// assert_eq!(codec.decode(&encoded), Ok(account));
/// ```
#[macro_export]
macro_rules! struct_codec {
    ($name:ident { $($field:ident: $codec:expr),+ $(,)? }) => {
        $crate::map_codec(
            $crate::struct_codec!(@codec $($field: $codec),+),
            |value: &$name| $crate::struct_codec!(@project value, $($field),+),
            |packed| {
                let $crate::struct_codec!(@pattern $($field),+) = packed;
                $name { $($field),+ }
            },
        )
    };

    // Folds field codecs into right-nested pairs.
    (@codec $field:ident: $codec:expr) => { $codec };
    (@codec $field:ident: $codec:expr, $($rest_field:ident: $rest_codec:expr),+) => {
        $crate::pair($codec, $crate::struct_codec!(@codec $($rest_field: $rest_codec),+))
    };

    // Projects struct fields into the matching right-nested tuple.
    (@project $value:ident, $field:ident) => { $value.$field.clone() };
    (@project $value:ident, $field:ident, $($rest:ident),+) => {
        ($value.$field.clone(), $crate::struct_codec!(@project $value, $($rest),+))
    };

    // The pattern that unpacks the right-nested tuple again.
    (@pattern $field:ident) => { $field };
    (@pattern $field:ident, $($rest:ident),+) => {
        ($field, $crate::struct_codec!(@pattern $($rest),+))
    };
}
