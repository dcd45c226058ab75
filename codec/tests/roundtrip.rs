//! Randomized round-trip tests over composed codecs.
//!
//! Values are generated from a seeded RNG so failures reproduce exactly.

use rand::{rngs::StdRng, Rng, SeedableRng};
use std::collections::BTreeMap;
use vellum_codec::{
    btree_map, compact_vec, enum_codec, option, public_key, string, struct_codec, uint64, unit,
    variant, vec, Codec, Error, PublicKey,
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

fn random_key(rng: &mut StdRng) -> PublicKey {
    let mut bytes = [0u8; 32];
    rng.fill(&mut bytes[..]);
    PublicKey::new(bytes)
}

fn random_string(rng: &mut StdRng) -> String {
    let len = rng.gen_range(0..24);
    (0..len).map(|_| rng.gen_range('a'..='z')).collect()
}

fn random_payment(rng: &mut StdRng) -> Payment {
    Payment {
        from: random_key(rng),
        to: random_key(rng),
        lamports: rng.gen(),
        memo: if rng.gen() {
            Some(random_string(rng))
        } else {
            None
        },
    }
}

fn random_event(rng: &mut StdRng) -> Event {
    match rng.gen_range(0..3) {
        0 => Event::Heartbeat,
        1 => Event::Transfer(random_payment(rng)),
        _ => Event::Batch((0..rng.gen_range(0..8)).map(|_| random_payment(rng)).collect()),
    }
}

#[test]
fn test_payment_roundtrip() {
    let codec = payment_codec();
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..256 {
        let payment = random_payment(&mut rng);
        let encoded = codec.encode(&payment).unwrap();
        assert_eq!(codec.encoded_size(&payment).unwrap(), encoded.len());
        assert_eq!(codec.decode(&encoded), Ok(payment));
    }
}

#[test]
fn test_event_roundtrip() {
    let codec = event_codec();
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..256 {
        let event = random_event(&mut rng);
        let encoded = codec.encode(&event).unwrap();
        assert_eq!(codec.encoded_size(&event).unwrap(), encoded.len());
        assert_eq!(codec.decode(&encoded), Ok(event));
    }
}

#[test]
fn test_balances_roundtrip() {
    let codec = btree_map(public_key(), uint64());
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..32 {
        let mut balances = BTreeMap::new();
        for _ in 0..rng.gen_range(0..16) {
            balances.insert(random_key(&mut rng), rng.gen());
        }
        let encoded = codec.encode(&balances).unwrap();
        assert_eq!(codec.encoded_size(&balances).unwrap(), encoded.len());
        assert_eq!(codec.decode(&encoded), Ok(balances));
    }
}

#[test]
fn test_decode_rejects_trailing_bytes() {
    let codec = event_codec();
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..64 {
        let event = random_event(&mut rng);
        let mut padded = codec.encode(&event).unwrap().to_vec();
        padded.push(0);
        assert_eq!(codec.decode(&padded), Err(Error::ExtraData(1)));
    }
}

#[test]
fn test_decode_rejects_truncation() {
    let codec = payment_codec();
    let mut rng = StdRng::seed_from_u64(19);
    let payment = random_payment(&mut rng);
    let encoded = codec.encode(&payment).unwrap();
    for cut in 0..encoded.len() {
        assert!(codec.decode(&encoded[..cut]).is_err(), "cut at {cut}");
    }
}
