//! Configuration used when splitting a UR into fountain-coded parts.

use std::num::{NonZeroU32, NonZeroUsize};

use crate::error::{Error, Result};

/// Default lower bound on fragment length, in bytes.
pub const DEFAULT_MIN_FRAGMENT_LEN: NonZeroUsize = NonZeroUsize::new(10).unwrap();

/// Settings that bound fragment sizes and the part sequence counter.
///
/// # Examples
///
/// ```
/// use std::num::NonZeroUsize;
///
/// use urkit::EncoderConfig;
/// let config = EncoderConfig::new(NonZeroUsize::new(200).expect("non-zero"))
///     .with_first_seq_num(100);
/// assert_eq!(config.min_fragment_len.get(), 10);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EncoderConfig {
    /// Largest fragment the encoder may emit.
    pub max_fragment_len: NonZeroUsize,
    /// Smallest fragment the encoder prefers to emit.
    pub min_fragment_len: NonZeroUsize,
    /// Sequence number the encoder starts counting from. The first emitted
    /// part carries `first_seq_num + 1`.
    pub first_seq_num: u32,
    /// Wrap the sequence counter back to one after this value. `None` wraps
    /// only after `u32::MAX`.
    pub seq_num_cycle: Option<NonZeroU32>,
}

impl EncoderConfig {
    /// Create a configuration with the default minimum fragment length.
    #[must_use]
    pub const fn new(max_fragment_len: NonZeroUsize) -> Self {
        Self {
            max_fragment_len,
            min_fragment_len: DEFAULT_MIN_FRAGMENT_LEN,
            first_seq_num: 0,
            seq_num_cycle: None,
        }
    }

    /// Override the minimum fragment length.
    #[must_use]
    pub const fn with_min_fragment_len(mut self, min_fragment_len: NonZeroUsize) -> Self {
        self.min_fragment_len = min_fragment_len;
        self
    }

    /// Start the sequence counter at `first_seq_num`.
    #[must_use]
    pub const fn with_first_seq_num(mut self, first_seq_num: u32) -> Self {
        self.first_seq_num = first_seq_num;
        self
    }

    /// Wrap the sequence counter after `cycle` parts.
    #[must_use]
    pub const fn with_seq_num_cycle(mut self, cycle: NonZeroU32) -> Self {
        self.seq_num_cycle = Some(cycle);
        self
    }

    /// Check that the length bounds are coherent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBounds`] when `min_fragment_len` exceeds
    /// `max_fragment_len`.
    pub fn validate(&self) -> Result<()> {
        if self.min_fragment_len > self.max_fragment_len {
            return Err(Error::InvalidBounds(format!(
                "min_fragment_len {} exceeds max_fragment_len {}",
                self.min_fragment_len, self.max_fragment_len
            )));
        }
        Ok(())
    }
}
