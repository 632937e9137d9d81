//! Deterministic choice of the fragments mixed into each part.
//!
//! Encoders and decoders both call [`choose_fragments`]; it must never be
//! re-implemented on either side. Parts numbered `1..=seq_len` are pure and
//! carry exactly one fragment. Later parts draw a degree from a distribution
//! biased toward small values, then take that many indexes from a seeded
//! shuffle of all fragment indexes.

use super::IndexSet;
use crate::{sampler::AliasSampler, xoshiro::Xoshiro256};

/// Select the fragment indexes combined into part `seq_num`.
///
/// # Examples
///
/// ```
/// use urkit::choose_fragments;
/// assert_eq!(choose_fragments(3, 11, 0x2f19_f3bb), [2].into());
/// assert_eq!(choose_fragments(15, 11, 0x2f19_f3bb), [1, 5].into());
/// ```
///
/// # Panics
///
/// Panics if `seq_num` or `seq_len` is zero. Part headers are validated
/// before they reach the selector.
#[must_use]
pub fn choose_fragments(seq_num: u32, seq_len: usize, checksum: u32) -> IndexSet {
    assert!(seq_num > 0, "sequence numbers start at one");
    assert!(seq_len > 0, "messages have at least one fragment");

    let seq_index = seq_num as usize;
    if seq_index <= seq_len {
        return IndexSet::from([seq_index - 1]);
    }

    let mut rng = Xoshiro256::for_part(seq_num, checksum);
    let degree = choose_degree(seq_len, &mut rng);
    shuffle((0..seq_len).collect(), &mut rng)
        .into_iter()
        .take(degree)
        .collect()
}

/// Draw how many fragments a mixed part combines, in `1..=seq_len`.
///
/// Degree `d` has weight `1 / d`.
#[expect(
    clippy::cast_precision_loss,
    reason = "fragment counts are bounded by the 32-bit length field"
)]
pub fn choose_degree(seq_len: usize, rng: &mut Xoshiro256) -> usize {
    let weights: Vec<f64> = (1..=seq_len).map(|degree| 1.0 / degree as f64).collect();
    AliasSampler::new(&weights).next(rng) + 1
}

/// Shuffle `items` by repeatedly removing a uniformly chosen element.
#[expect(
    clippy::cast_possible_truncation,
    reason = "the drawn position is below items.len()"
)]
pub fn shuffle<T>(mut items: Vec<T>, rng: &mut Xoshiro256) -> Vec<T> {
    let mut shuffled = Vec::with_capacity(items.len());
    while !items.is_empty() {
        let position = rng.next_int(0, items.len() as u64 - 1) as usize;
        shuffled.push(items.remove(position));
    }
    shuffled
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHECKSUM: u32 = 0x2f19_f3bb;

    #[test]
    fn pure_parts_select_their_own_fragment() {
        for seq_num in 1..=11_u32 {
            assert_eq!(
                choose_fragments(seq_num, 11, CHECKSUM),
                IndexSet::from([seq_num as usize - 1])
            );
        }
    }

    #[test]
    fn mixed_parts_match_reference_selection() {
        let expected: [&[usize]; 8] = [
            &[9],
            &[2, 5, 6, 8, 9, 10],
            &[8],
            &[1, 5],
            &[1],
            &[0, 2, 4, 5, 8, 10],
            &[5],
            &[2],
        ];
        for (offset, indexes) in expected.iter().enumerate() {
            let seq_num = 12 + u32::try_from(offset).expect("small offset");
            assert_eq!(
                choose_fragments(seq_num, 11, CHECKSUM),
                indexes.iter().copied().collect::<IndexSet>(),
                "seq_num {seq_num}"
            );
        }
    }

    #[test]
    fn selection_is_deterministic() {
        for seq_num in 12..200 {
            assert_eq!(
                choose_fragments(seq_num, 11, CHECKSUM),
                choose_fragments(seq_num, 11, CHECKSUM)
            );
        }
    }

    #[test]
    fn single_fragment_messages_always_select_zero() {
        for seq_num in 1..50 {
            assert_eq!(choose_fragments(seq_num, 1, CHECKSUM), IndexSet::from([0]));
        }
    }

    #[test]
    fn shuffle_preserves_elements() {
        let mut rng = Xoshiro256::from_seed_bytes(b"Wolf");
        let mut shuffled = shuffle((0..10).collect::<Vec<_>>(), &mut rng);
        shuffled.sort_unstable();
        assert_eq!(shuffled, (0..10).collect::<Vec<_>>());
    }
}
