//! Outbound fountain encoder.
//!
//! [`FountainEncoder`] owns a message's fragment set and emits an unbounded
//! sequence of parts. The first `seq_len` parts after a zero start are pure;
//! every later part mixes a seeded selection of fragments so that a decoder
//! can recover from lost parts without a back channel.

use std::num::NonZeroU32;

use super::{FountainPart, FragmentSet, Fragmenter, IndexSet, PartHeader, choose_fragments, xor_into};
use crate::{checksum::crc32, config::EncoderConfig, error::Result};

/// Generates fountain parts for a single message.
///
/// # Examples
///
/// ```
/// use std::num::NonZeroUsize;
///
/// use urkit::{EncoderConfig, FountainEncoder};
/// let config = EncoderConfig::new(NonZeroUsize::new(30).expect("non-zero"));
/// let mut encoder = FountainEncoder::new(&[0; 100], &config).expect("feasible bounds");
/// assert_eq!(encoder.seq_len(), 4);
/// let part = encoder.next_part();
/// assert_eq!(part.header().seq_num(), 1);
/// assert_eq!(part.data().len(), 25);
/// ```
#[derive(Clone, Debug)]
pub struct FountainEncoder {
    fragments: FragmentSet,
    checksum: u32,
    seq_len: u32,
    message_len: u32,
    seq_num: u32,
    seq_num_cycle: u32,
    last_part_indexes: IndexSet,
}

impl FountainEncoder {
    /// Split `message` according to `config` and prepare to emit parts.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBounds`](crate::Error::InvalidBounds) when the
    /// fragment bounds cannot be met or the sequence cycle is shorter than
    /// the number of fragments, and
    /// [`Error::EmptyMessage`](crate::Error::EmptyMessage) for an empty
    /// message.
    pub fn new(message: &[u8], config: &EncoderConfig) -> Result<Self> {
        let fragments = Fragmenter::from_config(config)?.split(message)?;
        // The splitter refuses messages longer than u32::MAX, so both values fit.
        let message_len = u32::try_from(fragments.message_len())
            .map_err(|_| oversized(fragments.message_len()))?;
        let seq_len =
            u32::try_from(fragments.len()).map_err(|_| oversized(fragments.message_len()))?;

        let seq_num_cycle = config.seq_num_cycle.map_or(u32::MAX, NonZeroU32::get);
        if seq_num_cycle < seq_len {
            return Err(crate::Error::InvalidBounds(format!(
                "sequence cycle {seq_num_cycle} is shorter than the {seq_len} fragments"
            )));
        }

        Ok(Self {
            checksum: crc32(message),
            seq_len,
            message_len,
            seq_num: config.first_seq_num,
            seq_num_cycle,
            last_part_indexes: IndexSet::new(),
            fragments,
        })
    }

    /// Sequence number of the most recently emitted part, or the configured
    /// starting value before the first call to [`next_part`](Self::next_part).
    #[must_use]
    pub const fn seq_num(&self) -> u32 { self.seq_num }

    /// Number of fragments the message was split into.
    #[must_use]
    pub const fn seq_len(&self) -> u32 { self.seq_len }

    /// Length of the message before padding.
    #[must_use]
    pub const fn message_len(&self) -> u32 { self.message_len }

    /// CRC-32 of the message.
    #[must_use]
    pub const fn checksum(&self) -> u32 { self.checksum }

    /// Length shared by every fragment.
    #[must_use]
    pub const fn fragment_len(&self) -> usize { self.fragments.fragment_len() }

    /// Fragment indexes mixed into the most recently emitted part.
    #[must_use]
    pub fn last_part_indexes(&self) -> &IndexSet { &self.last_part_indexes }

    /// Whether every pure fragment has been emitted at least once.
    #[must_use]
    pub const fn is_complete(&self) -> bool { self.seq_num >= self.seq_len }

    /// Whether the message fits in a single fragment.
    #[must_use]
    pub const fn is_single_part(&self) -> bool { self.seq_len == 1 }

    /// Emit the next part in the sequence.
    pub fn next_part(&mut self) -> FountainPart {
        self.seq_num = if self.seq_num >= self.seq_num_cycle {
            1
        } else {
            self.seq_num + 1
        };

        let indexes = choose_fragments(self.seq_num, self.seq_len as usize, self.checksum);
        let data = self.mix(&indexes);
        self.last_part_indexes = indexes;

        FountainPart::new(
            PartHeader::new(self.seq_num, self.seq_len, self.message_len, self.checksum),
            data,
        )
    }

    fn mix(&self, indexes: &IndexSet) -> Vec<u8> {
        let mut mixed = vec![0; self.fragments.fragment_len()];
        for fragment in indexes.iter().filter_map(|index| self.fragments.get(*index)) {
            xor_into(&mut mixed, fragment);
        }
        mixed
    }
}

fn oversized(message_len: usize) -> crate::Error {
    crate::Error::InvalidBounds(format!(
        "message of {message_len} bytes exceeds the 32-bit length field"
    ))
}
