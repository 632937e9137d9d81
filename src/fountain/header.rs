//! Per-part header of the fountain layer.
//!
//! The header is shared by every part of one message apart from its
//! sequence number, from which the mixed fragment indexes are derived.

use super::{IndexSet, choose_fragments};
use crate::error::{Error, Result};

/// Header describing a single fountain part.
///
/// Every part of one message shares `seq_len`, `message_len` and
/// `checksum`; only `seq_num` varies. The header alone determines which
/// fragments the part mixes.
///
/// # Examples
///
/// ```
/// use urkit::PartHeader;
/// let header = PartHeader::new(5, 4, 100, 0xdead_beef);
/// assert!(!header.is_pure());
/// assert_eq!(header.seq_num(), 5);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PartHeader {
    seq_num: u32,
    seq_len: u32,
    message_len: u32,
    checksum: u32,
}

impl PartHeader {
    /// Create a new part header.
    #[must_use]
    pub const fn new(seq_num: u32, seq_len: u32, message_len: u32, checksum: u32) -> Self {
        Self {
            seq_num,
            seq_len,
            message_len,
            checksum,
        }
    }

    /// One-based position of the part in the emitted stream.
    #[must_use]
    pub const fn seq_num(&self) -> u32 { self.seq_num }

    /// Number of fragments the message was split into.
    #[must_use]
    pub const fn seq_len(&self) -> u32 { self.seq_len }

    /// Length of the message before padding.
    #[must_use]
    pub const fn message_len(&self) -> u32 { self.message_len }

    /// CRC-32 of the complete message.
    #[must_use]
    pub const fn checksum(&self) -> u32 { self.checksum }

    /// Whether the part carries exactly one unmixed fragment.
    #[must_use]
    pub const fn is_pure(&self) -> bool { self.seq_num <= self.seq_len }

    /// Reject headers that cannot describe any fragment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFragmentIndexSet`] when `seq_num` or `seq_len`
    /// is zero, and [`Error::Malformed`] when `message_len` is zero.
    pub fn validate(&self) -> Result<()> {
        if self.seq_num == 0 {
            return Err(Error::InvalidFragmentIndexSet(
                "sequence number 0 selects no fragment".into(),
            ));
        }
        if self.seq_len == 0 {
            return Err(Error::InvalidFragmentIndexSet(
                "sequence length 0 leaves no fragment to select".into(),
            ));
        }
        if self.message_len == 0 {
            return Err(Error::malformed("message length is zero"));
        }
        Ok(())
    }

    /// Fragment indexes mixed into this part.
    ///
    /// # Errors
    ///
    /// Returns the error from [`validate`](Self::validate) for headers that
    /// describe no fragment.
    pub fn fragment_indexes(&self) -> Result<IndexSet> {
        self.validate()?;
        Ok(choose_fragments(
            self.seq_num,
            self.seq_len as usize,
            self.checksum,
        ))
    }
}
