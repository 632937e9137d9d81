//! Helpers for producing and disturbing part sequences.

use std::num::NonZeroUsize;

use urkit::{EncoderConfig, Ur, UrEncoder, fountain::selector::shuffle, xoshiro::Xoshiro256};

/// Emit the first `count` parts of `ur` with the given maximum fragment
/// length.
///
/// # Panics
///
/// Panics if `max_fragment_len` is zero or the bounds are infeasible.
#[must_use]
pub fn encode_parts(ur: &Ur, max_fragment_len: usize, count: usize) -> Vec<String> {
    let max = NonZeroUsize::new(max_fragment_len).expect("max_fragment_len must be non-zero");
    let mut encoder =
        UrEncoder::new(ur.clone(), &EncoderConfig::new(max)).expect("feasible fragment bounds");
    (0..count)
        .map(|_| encoder.next_part().expect("part"))
        .collect()
}

/// Reorder `items` deterministically from `seed`.
#[must_use]
pub fn shuffled<T>(items: Vec<T>, seed: &str) -> Vec<T> {
    shuffle(items, &mut Xoshiro256::from_seed_bytes(seed.as_bytes()))
}

/// Drop every `n`th item, simulating a lossy channel.
///
/// # Panics
///
/// Panics if `n` is zero.
#[must_use]
pub fn drop_every<T>(items: impl IntoIterator<Item = T>, n: usize) -> Vec<T> {
    assert!(n > 0, "cannot drop every 0th item");
    items
        .into_iter()
        .enumerate()
        .filter(|(index, _)| (index + 1) % n != 0)
        .map(|(_, item)| item)
        .collect()
}
