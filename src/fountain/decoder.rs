//! Inbound peeling decoder for fountain parts.
//!
//! [`FountainDecoder`] accepts parts in any order, with duplicates and
//! gaps. Pure parts are stored directly. Mixed parts are reduced by every
//! known fragment and retained mixed part whose index set is a strict
//! subset of theirs; whenever a reduction leaves a single index, the
//! recovered fragment is fed back through the queue so it can peel the
//! remaining mixed parts. Once every fragment is known the message is
//! joined and verified against the advertised CRC-32.

use std::collections::{BTreeMap, VecDeque};

use log::{debug, warn};

use super::{FountainPart, IndexSet, splitter::join_fragments, xor_into};
use crate::{
    checksum::crc32,
    error::{Error, Result},
};

/// Outcome of feeding a single part to a decoder.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PartStatus {
    /// The part contributed new information but the message is not yet
    /// complete.
    Incomplete,
    /// The part completed the message.
    Complete,
    /// The part added nothing: it duplicated known information or arrived
    /// after the session finished.
    Ignored,
}

/// Header fields latched from the first accepted part.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Expected {
    seq_len: u32,
    message_len: u32,
    checksum: u32,
    fragment_len: usize,
}

impl Expected {
    fn mismatch(&self, other: &Self) -> Option<String> {
        if self.seq_len != other.seq_len {
            return Some(format!(
                "sequence length {} differs from latched {}",
                other.seq_len, self.seq_len
            ));
        }
        if self.message_len != other.message_len {
            return Some(format!(
                "message length {} differs from latched {}",
                other.message_len, self.message_len
            ));
        }
        if self.checksum != other.checksum {
            return Some(format!(
                "checksum {:#010x} differs from latched {:#010x}",
                other.checksum, self.checksum
            ));
        }
        if self.fragment_len != other.fragment_len {
            return Some(format!(
                "fragment length {} differs from latched {}",
                other.fragment_len, self.fragment_len
            ));
        }
        None
    }

    /// Reject first parts whose fields cannot come from one split message.
    fn check_consistent(&self) -> Result<()> {
        if self.fragment_len == 0 {
            return Err(Error::malformed("part carries no fragment bytes"));
        }
        let fragments = (self.message_len as usize).div_ceil(self.fragment_len);
        if fragments != self.seq_len as usize {
            return Err(Error::malformed(format!(
                "{} bytes in fragments of {} bytes need {fragments} parts, not {}",
                self.message_len, self.fragment_len, self.seq_len
            )));
        }
        Ok(())
    }
}

/// A fragment combination awaiting reduction.
#[derive(Clone, Debug)]
struct Piece {
    indexes: IndexSet,
    data: Vec<u8>,
}

impl Piece {
    fn is_pure(&self) -> bool { self.indexes.len() == 1 }

    /// Remove `other` from `self` when its indexes are a strict subset.
    fn reduce_by(mut self, other_indexes: &IndexSet, other_data: &[u8]) -> Self {
        if other_indexes.len() < self.indexes.len() && other_indexes.is_subset(&self.indexes) {
            self.indexes = self.indexes.difference(other_indexes).copied().collect();
            xor_into(&mut self.data, other_data);
        }
        self
    }
}

/// Reassembles a message from fountain parts.
///
/// The decoder is a state machine: empty until the first valid part
/// latches the header, accumulating while fragments are missing, and then
/// terminally successful or failed. Terminal states are absorbing.
#[derive(Clone, Debug, Default)]
pub struct FountainDecoder {
    expected: Option<Expected>,
    pure: BTreeMap<usize, Vec<u8>>,
    mixed: BTreeMap<IndexSet, Vec<u8>>,
    queue: VecDeque<Piece>,
    last_part_indexes: IndexSet,
    result: Option<Result<Vec<u8>>>,
}

impl FountainDecoder {
    /// Create an empty decoder.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Feed one part to the decoder.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFragmentIndexSet`] or [`Error::Malformed`] for
    /// parts whose header describes no fragment, and [`Error::Malformed`]
    /// for a first part whose sequence length does not match its message
    /// and fragment lengths; these leave the decoder untouched. Returns
    /// [`Error::HeterogeneousParts`] when the part disagrees with the
    /// latched header and [`Error::ChecksumMismatch`] when the reassembled
    /// message fails verification; both move the decoder to its failed
    /// state.
    pub fn receive(&mut self, part: &FountainPart) -> Result<PartStatus> {
        if self.is_complete() {
            return Ok(PartStatus::Ignored);
        }

        let header = part.header();
        header.validate()?;
        let incoming = Expected {
            seq_len: header.seq_len(),
            message_len: header.message_len(),
            checksum: header.checksum(),
            fragment_len: part.data().len(),
        };

        // Header checks come first: index selection costs O(seq_len²).
        match self.expected {
            Some(expected) => {
                if let Some(reason) = expected.mismatch(&incoming) {
                    return Err(self.fail(Error::HeterogeneousParts(reason)));
                }
            }
            None => incoming.check_consistent()?,
        }

        let indexes = header.fragment_indexes()?;
        if self.expected.is_none() {
            debug!(
                "latched fountain header: seq_len={}, message_len={}, checksum={:#010x}",
                incoming.seq_len, incoming.message_len, incoming.checksum
            );
            self.expected = Some(incoming);
        }

        self.last_part_indexes.clone_from(&indexes);
        self.queue.push_back(Piece {
            indexes,
            data: part.data().to_vec(),
        });
        let progressed = self.drain_queue();

        match &self.result {
            Some(Ok(_)) => Ok(PartStatus::Complete),
            Some(Err(err)) => Err(err.clone()),
            None if progressed => Ok(PartStatus::Incomplete),
            None => Ok(PartStatus::Ignored),
        }
    }

    fn drain_queue(&mut self) -> bool {
        let mut progressed = false;
        while let Some(piece) = self.queue.pop_front() {
            if self.is_complete() {
                self.queue.clear();
                break;
            }
            progressed |= if piece.is_pure() {
                self.accept_pure(piece)
            } else {
                self.accept_mixed(piece)
            };
        }
        progressed
    }

    fn accept_pure(&mut self, piece: Piece) -> bool {
        let Some(&index) = piece.indexes.first() else {
            return false;
        };
        if self.pure.contains_key(&index) {
            return false;
        }
        debug!("recovered fragment {index}");
        self.pure.insert(index, piece.data.clone());

        if self.pure.len() == self.seq_len() {
            self.finish();
        } else {
            self.reduce_mixed_by(&piece);
        }
        true
    }

    fn accept_mixed(&mut self, piece: Piece) -> bool {
        if self.mixed.contains_key(&piece.indexes) {
            return false;
        }

        let mut reduced = piece;
        for (index, data) in &self.pure {
            reduced = reduced.reduce_by(&IndexSet::from([*index]), data);
        }
        for (indexes, data) in &self.mixed {
            reduced = reduced.reduce_by(indexes, data);
        }

        if reduced.is_pure() {
            // Progress is credited when the queued fragment is accepted.
            self.queue.push_back(reduced);
            return false;
        }
        if self.mixed.contains_key(&reduced.indexes) {
            return false;
        }
        self.reduce_mixed_by(&reduced);
        self.mixed.insert(reduced.indexes, reduced.data);
        true
    }

    fn reduce_mixed_by(&mut self, by: &Piece) {
        let mixed = std::mem::take(&mut self.mixed);
        for (indexes, data) in mixed {
            let reduced = Piece { indexes, data }.reduce_by(&by.indexes, &by.data);
            if reduced.is_pure() {
                self.queue.push_back(reduced);
            } else {
                self.mixed.insert(reduced.indexes, reduced.data);
            }
        }
    }

    fn finish(&mut self) {
        let Some(expected) = self.expected else {
            return;
        };
        let message = join_fragments(
            self.pure.values().map(Vec::as_slice),
            expected.message_len as usize,
        );
        let computed = crc32(&message);
        if computed == expected.checksum {
            debug!("reassembled {} byte message", message.len());
            self.mixed.clear();
            self.result = Some(Ok(message));
        } else {
            self.fail(Error::ChecksumMismatch {
                expected: expected.checksum,
                computed,
            });
        }
    }

    fn fail(&mut self, error: Error) -> Error {
        warn!("fountain decoder failed: {error}");
        self.queue.clear();
        self.result = Some(Err(error.clone()));
        error
    }

    fn seq_len(&self) -> usize { self.expected.map_or(0, |e| e.seq_len as usize) }

    /// Number of fragments in the message, once the first part arrived.
    #[must_use]
    pub fn expected_part_count(&self) -> Option<usize> {
        self.expected.map(|e| e.seq_len as usize)
    }

    /// Length of the message, once the first part arrived.
    #[must_use]
    pub fn expected_message_len(&self) -> Option<usize> {
        self.expected.map(|e| e.message_len as usize)
    }

    /// CRC-32 advertised by the parts, once the first part arrived.
    #[must_use]
    pub fn expected_checksum(&self) -> Option<u32> { self.expected.map(|e| e.checksum) }

    /// Indexes of recovered fragments together with those referenced by
    /// retained mixed parts.
    #[must_use]
    pub fn received_part_indexes(&self) -> IndexSet {
        let mut indexes: IndexSet = self.pure.keys().copied().collect();
        for mixed in self.mixed.keys() {
            indexes.extend(mixed);
        }
        indexes
    }

    /// Fragment indexes of the most recently accepted part.
    #[must_use]
    pub fn last_part_indexes(&self) -> &IndexSet { &self.last_part_indexes }

    /// Fraction of fragments recovered so far, in `0.0..=1.0`.
    #[must_use]
    #[expect(
        clippy::cast_precision_loss,
        reason = "fragment counts are bounded by the 32-bit length field"
    )]
    pub fn estimated_percent_complete(&self) -> f64 {
        if self.is_success() {
            return 1.0;
        }
        match self.seq_len() {
            0 => 0.0,
            seq_len => self.pure.len() as f64 / seq_len as f64,
        }
    }

    /// Whether the message was reassembled and verified.
    #[must_use]
    pub fn is_success(&self) -> bool { matches!(self.result, Some(Ok(_))) }

    /// Whether the decoder failed terminally.
    #[must_use]
    pub fn is_failure(&self) -> bool { matches!(self.result, Some(Err(_))) }

    /// Whether the decoder reached a terminal state.
    #[must_use]
    pub fn is_complete(&self) -> bool { self.result.is_some() }

    /// Reassembled message after success.
    #[must_use]
    pub fn result_message(&self) -> Option<&[u8]> {
        match &self.result {
            Some(Ok(message)) => Some(message),
            _ => None,
        }
    }

    /// Terminal error after failure.
    #[must_use]
    pub fn result_error(&self) -> Option<&Error> {
        match &self.result {
            Some(Err(err)) => Some(err),
            _ => None,
        }
    }

    /// Describe how a whole message delivered outside the fountain differs
    /// from the latched header, if it does.
    ///
    /// Only the message identity is compared; the split a whole message
    /// would have had is irrelevant.
    pub(crate) fn whole_message_mismatch(&self, message: &[u8]) -> Option<String> {
        let expected = self.expected?;
        if u32::try_from(message.len()).ok() != Some(expected.message_len) {
            return Some(format!(
                "message length {} differs from latched {}",
                message.len(),
                expected.message_len
            ));
        }
        let checksum = crc32(message);
        (checksum != expected.checksum).then(|| {
            format!(
                "checksum {checksum:#010x} differs from latched {:#010x}",
                expected.checksum
            )
        })
    }

    /// Move the decoder to its failed state with `error`.
    ///
    /// Used by outer layers that detect heterogeneity the fountain header
    /// cannot see, such as a change of UR type.
    pub(crate) fn abort(&mut self, error: Error) -> Error {
        if self.is_complete() {
            return error;
        }
        self.fail(error)
    }
}
