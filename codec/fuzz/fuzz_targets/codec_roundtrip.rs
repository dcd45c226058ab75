#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use std::{collections::BTreeMap, fmt::Debug};
use vellum_codec::{
    boxed, btree_map, compact_u16, compact_vec, enum_codec, lazy, option, public_key, string,
    struct_codec, uint64, unit, variant, vec, Codec, PublicKey,
};

#[derive(Debug, Clone, PartialEq)]
struct Payment {
    from: PublicKey,
    to: PublicKey,
    lamports: u64,
    memo: Option<String>,
}

fn payment_codec() -> Codec<Payment> {
    struct_codec!(Payment {
        from: public_key(),
        to: public_key(),
        lamports: uint64(),
        memo: option(string()),
    })
}

#[derive(Debug, Clone, PartialEq)]
enum Event {
    Heartbeat,
    Transfer(Payment),
    Batch(Vec<Payment>),
}

fn event_codec() -> Codec<Event> {
    enum_codec(vec![
        variant(
            "heartbeat",
            0,
            unit(),
            |event: &Event| match event {
                Event::Heartbeat => Some(()),
                _ => None,
            },
            |()| Event::Heartbeat,
        ),
        variant(
            "transfer",
            1,
            payment_codec(),
            |event: &Event| match event {
                Event::Transfer(payment) => Some(payment.clone()),
                _ => None,
            },
            Event::Transfer,
        ),
        variant(
            "batch",
            2,
            compact_vec(payment_codec()),
            |event: &Event| match event {
                Event::Batch(payments) => Some(payments.clone()),
                _ => None,
            },
            Event::Batch,
        ),
    ])
}

#[derive(Debug, Clone, PartialEq)]
struct TreeNode {
    value: u64,
    left: Option<Box<TreeNode>>,
    right: Option<Box<TreeNode>>,
}

fn tree_codec() -> Codec<TreeNode> {
    struct_codec!(TreeNode {
        value: uint64(),
        left: option(boxed(lazy(tree_codec))),
        right: option(boxed(lazy(tree_codec))),
    })
}

/// Decoding arbitrary bytes must never panic, and any accepted value must
/// re-encode and decode back to itself.
fn check_decode<T: PartialEq + Debug>(codec: &Codec<T>, data: &[u8]) {
    let Ok(value) = codec.decode(data) else {
        return;
    };
    let encoded = codec.encode(&value).expect("decoded value must re-encode");
    assert_eq!(
        codec.encoded_size(&value).expect("decoded value must size"),
        encoded.len()
    );
    let again = codec
        .decode(&encoded)
        .expect("re-encoded value must decode");
    assert_eq!(value, again);
}

/// Any value the codec accepts for encoding must round-trip exactly.
fn check_roundtrip<T: PartialEq + Debug>(codec: &Codec<T>, value: &T) {
    let encoded = codec.encode(value).expect("encoding must succeed");
    assert_eq!(
        codec.encoded_size(value).expect("sizing must succeed"),
        encoded.len()
    );
    let decoded = codec.decode(&encoded).expect("decoding must succeed");
    assert_eq!(&decoded, value);
}

#[derive(Arbitrary, Debug)]
enum FuzzInput<'a> {
    // Hostile bytes against the variable-size decoders
    DecodeEvent(&'a [u8]),
    DecodeStrings(&'a [u8]),
    DecodeMap(&'a [u8]),
    DecodeCompact(&'a [u8]),
    DecodeTree(&'a [u8]),

    // Structured values through encode and back
    Payment {
        from: [u8; 32],
        to: [u8; 32],
        lamports: u64,
        memo: Option<String>,
    },
    Compact(u16),
    Map(BTreeMap<u64, u64>),
    Strings(Vec<String>),
}

fn fuzz(input: FuzzInput) {
    match input {
        FuzzInput::DecodeEvent(data) => check_decode(&event_codec(), data),
        FuzzInput::DecodeStrings(data) => check_decode(&vec(string()), data),
        FuzzInput::DecodeMap(data) => check_decode(&btree_map(uint64(), string()), data),
        FuzzInput::DecodeCompact(data) => check_decode(&compact_vec(uint64()), data),
        FuzzInput::DecodeTree(data) => {
            // Nesting depth tracks input length; keep stack use bounded.
            let data = &data[..data.len().min(4096)];
            check_decode(&tree_codec(), data)
        }
        FuzzInput::Payment {
            from,
            to,
            lamports,
            memo,
        } => check_roundtrip(
            &payment_codec(),
            &Payment {
                from: PublicKey::new(from),
                to: PublicKey::new(to),
                lamports,
                memo,
            },
        ),
        FuzzInput::Compact(value) => check_roundtrip(&compact_u16(), &value),
        FuzzInput::Map(map) => check_roundtrip(&btree_map(uint64(), uint64()), &map),
        FuzzInput::Strings(strings) => check_roundtrip(&vec(string()), &strings),
    }
}

fuzz_target!(|input: FuzzInput| {
    fuzz(input);
});
