//! Textual UR encoder.
//!
//! [`UrEncoder`] binds a [`Ur`] to a [`FountainEncoder`] and renders each
//! part as a `ur:` string through a [`WordCodec`].

use log::debug;

use crate::{
    bytewords::{MinimalBytewords, WordCodec},
    config::EncoderConfig,
    error::Result,
    fountain::{FountainEncoder, IndexSet},
    metrics,
    ur::Ur,
    wire,
};

/// Emits the parts of a single UR as text.
///
/// # Examples
///
/// ```
/// use std::num::NonZeroUsize;
///
/// use urkit::{EncoderConfig, Ur, UrEncoder};
/// let ur = Ur::from_bytes(&[0x5a; 100]).expect("wrap message");
/// let config = EncoderConfig::new(NonZeroUsize::new(30).expect("non-zero"));
/// let mut encoder = UrEncoder::new(ur, &config).expect("feasible bounds");
/// let part = encoder.next_part().expect("first part");
/// assert!(part.starts_with("ur:bytes/1-4/"));
/// ```
#[derive(Clone, Debug)]
pub struct UrEncoder<C = MinimalBytewords> {
    ur: Ur,
    fountain: FountainEncoder,
    codec: C,
}

impl UrEncoder {
    /// Prepare to emit `ur` in parts bounded by `config`.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`FountainEncoder::new`] for infeasible bounds
    /// or an empty payload.
    pub fn new(ur: Ur, config: &EncoderConfig) -> Result<Self> {
        Self::with_codec(ur, config, MinimalBytewords)
    }

    /// Render `ur` as a single-part string regardless of its size.
    #[must_use]
    pub fn encode(ur: &Ur) -> String { encode_single(ur, &MinimalBytewords) }
}

impl<C: WordCodec> UrEncoder<C> {
    /// Prepare to emit `ur` using a custom word codec.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`FountainEncoder::new`].
    pub fn with_codec(ur: Ur, config: &EncoderConfig, codec: C) -> Result<Self> {
        let fountain = FountainEncoder::new(ur.payload(), config)?;
        debug!(
            "encoding {} byte {} payload as {} parts of {} bytes",
            ur.payload().len(),
            ur.ur_type(),
            fountain.seq_len(),
            fountain.fragment_len()
        );
        Ok(Self {
            ur,
            fountain,
            codec,
        })
    }

    /// The UR being encoded.
    #[must_use]
    pub fn ur(&self) -> &Ur { &self.ur }

    /// Sequence number of the last emitted part.
    #[must_use]
    pub fn seq_num(&self) -> u32 { self.fountain.seq_num() }

    /// Number of fragments the payload was split into.
    #[must_use]
    pub fn seq_len(&self) -> u32 { self.fountain.seq_len() }

    /// Fragment indexes mixed into the last emitted part.
    #[must_use]
    pub fn last_part_indexes(&self) -> &IndexSet { self.fountain.last_part_indexes() }

    /// Whether every pure part has been emitted at least once.
    #[must_use]
    pub fn is_complete(&self) -> bool { self.fountain.is_complete() }

    /// Whether the payload fits in a single part.
    #[must_use]
    pub fn is_single_part(&self) -> bool { self.fountain.is_single_part() }

    /// Emit the next part.
    ///
    /// Single-part URs are rendered in the `ur:<type>/<body>` form on every
    /// call; the sequence counter still advances.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Encoding`](crate::Error::Encoding) if the part cannot
    /// be written as CBOR.
    pub fn next_part(&mut self) -> Result<String> {
        let part = self.fountain.next_part();
        if self.fountain.is_single_part() {
            metrics::inc_parts_emitted();
            return Ok(encode_single(&self.ur, &self.codec));
        }
        let cbor = part.to_cbor()?;
        metrics::inc_parts_emitted();
        let header = part.header();
        Ok(wire::format_multi(
            self.ur.ur_type(),
            header.seq_num(),
            header.seq_len(),
            &self.codec.encode(&cbor),
        ))
    }
}

fn encode_single(ur: &Ur, codec: &impl WordCodec) -> String {
    wire::format_single(ur.ur_type(), &codec.encode(ur.payload()))
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroUsize;

    use super::*;

    fn config(max: usize) -> EncoderConfig {
        EncoderConfig::new(NonZeroUsize::new(max).expect("non-zero"))
    }

    #[test]
    fn single_part_encoder_repeats_single_form() {
        let ur = Ur::from_bytes(&[1, 2, 3]).expect("wrap message");
        let mut encoder = UrEncoder::new(ur.clone(), &config(100)).expect("encoder");
        assert!(encoder.is_single_part());
        let expected = UrEncoder::encode(&ur);
        assert_eq!(encoder.next_part().expect("part"), expected);
        assert_eq!(encoder.next_part().expect("part"), expected);
        assert_eq!(encoder.seq_num(), 2);
    }

    #[test]
    fn multi_part_path_carries_sequence() {
        let ur = Ur::from_bytes(&[0; 100]).expect("wrap message");
        let mut encoder = UrEncoder::new(ur, &config(30)).expect("encoder");
        let seq_len = encoder.seq_len();
        for seq_num in 1..=seq_len + 2 {
            let part = encoder.next_part().expect("part");
            assert!(
                part.starts_with(&format!("ur:bytes/{seq_num}-{seq_len}/")),
                "{part}"
            );
        }
        assert!(encoder.is_complete());
    }

    #[test]
    fn output_is_lower_case() {
        let ur = Ur::from_message("crypto-psbt", &[0xff; 80]).expect("valid type");
        let mut encoder = UrEncoder::new(ur, &config(20)).expect("encoder");
        let part = encoder.next_part().expect("part");
        assert_eq!(part, part.to_ascii_lowercase());
    }
}
