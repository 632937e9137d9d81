//! Outbound helper that splits payloads into equal-length fragments.
//!
//! [`Fragmenter`] picks the fewest fragments whose length fits within the
//! configured bounds, then partitions the payload, zero-padding the final
//! fragment. The resulting [`FragmentSet`] is immutable for the life of an
//! encoder.

use std::num::NonZeroUsize;

use crate::{
    config::EncoderConfig,
    error::{Error, Result},
};

/// Splits payloads into fragment sets within fixed length bounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Fragmenter {
    max_fragment_len: NonZeroUsize,
    min_fragment_len: NonZeroUsize,
}

impl Fragmenter {
    /// Create a fragmenter with the given length bounds.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBounds`] when `min_fragment_len` exceeds
    /// `max_fragment_len`.
    pub fn new(max_fragment_len: NonZeroUsize, min_fragment_len: NonZeroUsize) -> Result<Self> {
        EncoderConfig::new(max_fragment_len)
            .with_min_fragment_len(min_fragment_len)
            .validate()?;
        Ok(Self {
            max_fragment_len,
            min_fragment_len,
        })
    }

    /// Create a fragmenter from an encoder configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBounds`] when the configured bounds are
    /// inverted.
    pub fn from_config(config: &EncoderConfig) -> Result<Self> {
        Self::new(config.max_fragment_len, config.min_fragment_len)
    }

    /// Return the largest permitted fragment length.
    #[must_use]
    pub const fn max_fragment_len(&self) -> NonZeroUsize { self.max_fragment_len }

    /// Return the preferred smallest fragment length.
    #[must_use]
    pub const fn min_fragment_len(&self) -> NonZeroUsize { self.min_fragment_len }

    /// Compute the nominal fragment length for a message of `message_len`
    /// bytes.
    ///
    /// Messages no longer than the maximum travel as a single fragment.
    /// Otherwise the smallest fragment count whose length fits within the
    /// maximum is chosen, without letting fragments fall below the minimum.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyMessage`] for a zero-length message and
    /// [`Error::InvalidBounds`] when no fragment count satisfies the bounds.
    pub fn fragment_len(&self, message_len: usize) -> Result<usize> {
        if message_len == 0 {
            return Err(Error::EmptyMessage);
        }
        let max = self.max_fragment_len.get();
        if message_len <= max {
            return Ok(message_len);
        }

        let max_fragment_count = message_len / self.min_fragment_len.get();
        (1..=max_fragment_count)
            .map(|count| message_len.div_ceil(count))
            .find(|len| *len <= max)
            .ok_or_else(|| {
                Error::InvalidBounds(format!(
                    "no fragment count splits {message_len} bytes into fragments between {} and \
                     {max} bytes",
                    self.min_fragment_len
                ))
            })
    }

    /// Split `payload` into a [`FragmentSet`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyMessage`] for an empty payload and
    /// [`Error::InvalidBounds`] when the payload cannot be split within the
    /// bounds or is too long for the 32-bit part header.
    pub fn split(&self, payload: &[u8]) -> Result<FragmentSet> {
        if u32::try_from(payload.len()).is_err() {
            return Err(Error::InvalidBounds(format!(
                "message of {} bytes exceeds the 32-bit length field",
                payload.len()
            )));
        }
        let fragment_len = self.fragment_len(payload.len())?;
        let fragments = payload
            .chunks(fragment_len)
            .map(|chunk| {
                let mut fragment = chunk.to_vec();
                fragment.resize(fragment_len, 0);
                fragment
            })
            .collect();
        Ok(FragmentSet {
            message_len: payload.len(),
            fragment_len,
            fragments,
        })
    }
}

/// Equal-length fragments produced for a single message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FragmentSet {
    message_len: usize,
    fragment_len: usize,
    fragments: Vec<Vec<u8>>,
}

impl FragmentSet {
    /// Length of the original message before padding.
    #[must_use]
    pub const fn message_len(&self) -> usize { self.message_len }

    /// Length shared by every fragment.
    #[must_use]
    pub const fn fragment_len(&self) -> usize { self.fragment_len }

    /// Number of fragments, which is also the part sequence length.
    #[expect(
        clippy::len_without_is_empty,
        reason = "fragment sets are guaranteed non-empty"
    )]
    #[must_use]
    pub fn len(&self) -> usize { self.fragments.len() }

    /// Borrow the fragment at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&[u8]> { self.fragments.get(index).map(Vec::as_slice) }

    /// Borrow all fragments in index order.
    #[must_use]
    pub fn fragments(&self) -> &[Vec<u8>] { &self.fragments }

    /// Concatenate the fragments and strip the padding.
    #[must_use]
    pub fn join(&self) -> Vec<u8> {
        join_fragments(self.fragments.iter().map(Vec::as_slice), self.message_len)
    }
}

/// Concatenate `fragments` in order and truncate to `message_len` bytes.
pub fn join_fragments<'a>(fragments: impl IntoIterator<Item = &'a [u8]>, message_len: usize) -> Vec<u8> {
    let mut message: Vec<u8> = fragments.into_iter().flatten().copied().collect();
    message.truncate(message_len);
    message
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::error::ErrorKind;

    fn fragmenter(max: usize, min: usize) -> Fragmenter {
        Fragmenter::new(
            NonZeroUsize::new(max).expect("non-zero"),
            NonZeroUsize::new(min).expect("non-zero"),
        )
        .expect("valid bounds")
    }

    #[rstest]
    #[case(12345, 1005, 1955, 1764)]
    #[case(12345, 1005, 30000, 12345)]
    #[case(100, 10, 30, 25)]
    #[case(259, 10, 30, 29)]
    #[case(7, 10, 30, 7)]
    fn nominal_fragment_length(
        #[case] message_len: usize,
        #[case] min: usize,
        #[case] max: usize,
        #[case] expected: usize,
    ) {
        assert_eq!(
            fragmenter(max, min)
                .fragment_len(message_len)
                .expect("feasible bounds"),
            expected
        );
    }

    #[test]
    fn splits_and_pads_last_fragment() {
        let payload: Vec<u8> = (1..=10).collect();
        let set = fragmenter(4, 2).split(&payload).expect("split payload");

        assert_eq!(set.len(), 3);
        assert_eq!(set.fragment_len(), 4);
        assert_eq!(set.get(0), Some(&[1, 2, 3, 4][..]));
        assert_eq!(set.get(2), Some(&[9, 10, 0, 0][..]));
        assert_eq!(set.join(), payload);
    }

    #[test]
    fn hundred_zero_bytes_split_into_four() {
        let set = fragmenter(30, 10).split(&[0; 100]).expect("split payload");
        assert_eq!(set.len(), 4);
        assert_eq!(set.fragment_len(), 25);
        assert!(set.fragments().iter().all(|fragment| fragment.len() == 25));
    }

    #[test]
    fn short_message_is_single_fragment() {
        let set = fragmenter(30, 10).split(&[7; 30]).expect("split payload");
        assert_eq!(set.len(), 1);
        assert_eq!(set.fragment_len(), 30);
    }

    #[test]
    fn rejects_inverted_bounds() {
        let err = Fragmenter::new(
            NonZeroUsize::new(5).expect("non-zero"),
            NonZeroUsize::new(6).expect("non-zero"),
        )
        .expect_err("inverted bounds");
        assert_eq!(err.kind(), ErrorKind::InvalidBounds);
    }

    #[test]
    fn rejects_infeasible_bounds() {
        // 21 bytes need at least three fragments of at most 10 bytes, but a
        // minimum of 10 allows only two.
        let err = fragmenter(10, 10).split(&[1; 21]).expect_err("infeasible");
        assert_eq!(err.kind(), ErrorKind::InvalidBounds);
    }

    #[test]
    fn rejects_empty_payload() {
        let err = fragmenter(10, 1).split(&[]).expect_err("empty payload");
        assert_eq!(err.kind(), ErrorKind::EmptyMessage);
    }
}
