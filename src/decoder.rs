//! Textual UR decoder.
//!
//! [`UrDecoder`] parses `ur:` strings, latches the type of the first
//! accepted part and hands fountain parts to a [`FountainDecoder`].
//! Malformed text is counted and reported but never changes the session;
//! heterogeneous parts and checksum failures end it.

use log::{debug, warn};

use crate::{
    bytewords::{MinimalBytewords, WordCodec},
    error::{Error, Result},
    fountain::{FountainDecoder, FountainPart, IndexSet, PartStatus},
    metrics::{self, Outcome},
    ur::Ur,
    wire::{self, UrText},
};

/// Lifecycle of a decoding session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecoderState {
    /// No part has been accepted yet.
    Empty,
    /// Parts are being collected.
    Accumulating,
    /// The UR was reassembled and verified.
    Success,
    /// The session failed and must be discarded.
    Failure,
}

/// Reassembles a UR from its textual parts.
///
/// # Examples
///
/// ```
/// use urkit::{PartStatus, Ur, UrDecoder, UrEncoder};
/// let ur = Ur::from_bytes(b"hello").expect("wrap message");
/// let text = UrEncoder::encode(&ur);
///
/// let mut decoder = UrDecoder::new();
/// assert_eq!(decoder.receive_part(&text).expect("part"), PartStatus::Complete);
/// assert_eq!(decoder.result_ur(), Some(&ur));
/// ```
#[derive(Clone, Debug)]
pub struct UrDecoder<C = MinimalBytewords> {
    codec: C,
    fountain: FountainDecoder,
    expected_type: Option<String>,
    processed_parts_count: u64,
    result: Option<Result<Ur>>,
}

impl Default for UrDecoder {
    fn default() -> Self { Self::new() }
}

impl UrDecoder {
    /// Create an empty decoder using the minimal Bytewords codec.
    #[must_use]
    pub fn new() -> Self { Self::with_codec(MinimalBytewords) }

    /// Decode a single-part UR string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Malformed`] when `text` is not a well-formed
    /// single-part UR and [`Error::InvalidType`] for an invalid type tag.
    pub fn decode(text: &str) -> Result<Ur> { decode_single(text, &MinimalBytewords) }
}

impl<C: WordCodec> UrDecoder<C> {
    /// Create an empty decoder using a custom word codec.
    pub fn with_codec(codec: C) -> Self {
        Self {
            codec,
            fountain: FountainDecoder::new(),
            expected_type: None,
            processed_parts_count: 0,
            result: None,
        }
    }

    /// Feed one textual part to the decoder.
    ///
    /// Every call counts towards
    /// [`processed_parts_count`](Self::processed_parts_count).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Malformed`], [`Error::InvalidType`] or
    /// [`Error::InvalidFragmentIndexSet`] for text that cannot be used; the
    /// session is left unchanged. Returns [`Error::HeterogeneousParts`] or
    /// [`Error::ChecksumMismatch`] when the session fails; see
    /// [`Error::is_fatal`].
    pub fn receive_part(&mut self, text: &str) -> Result<PartStatus> {
        self.processed_parts_count += 1;
        if self.is_complete() {
            metrics::inc_parts_received(Outcome::Ignored);
            return Ok(PartStatus::Ignored);
        }

        match self.accept(text) {
            Ok(status) => {
                let outcome = if status == PartStatus::Ignored {
                    Outcome::Ignored
                } else {
                    Outcome::Accepted
                };
                metrics::inc_parts_received(outcome);
                Ok(status)
            }
            Err(err) if err.is_fatal() => {
                metrics::inc_parts_received(Outcome::Rejected);
                metrics::inc_decode_failures();
                self.result = Some(Err(err.clone()));
                Err(err)
            }
            Err(err) => {
                warn!("dropping part #{}: {err}", self.processed_parts_count);
                metrics::inc_parts_received(Outcome::Rejected);
                Err(err)
            }
        }
    }

    fn accept(&mut self, text: &str) -> Result<PartStatus> {
        let parsed = wire::parse(text)?;
        if let Some(expected) = &self.expected_type {
            if expected != parsed.ur_type() {
                return Err(self.fountain.abort(Error::HeterogeneousParts(format!(
                    "type {:?} differs from latched {expected:?}",
                    parsed.ur_type()
                ))));
            }
        }

        match parsed {
            UrText::Single { ur_type, body } => {
                let ur = Ur::new(ur_type, self.codec.decode(&body)?)?;
                if let Some(reason) = self.fountain.whole_message_mismatch(ur.payload()) {
                    return Err(self.fountain.abort(Error::HeterogeneousParts(format!(
                        "single-part UR: {reason}"
                    ))));
                }
                debug!("decoded single-part {} UR", ur.ur_type());
                self.expected_type = Some(ur.ur_type().to_owned());
                self.result = Some(Ok(ur));
                Ok(PartStatus::Complete)
            }
            UrText::Multi {
                ur_type,
                seq_num,
                seq_len,
                body,
            } => {
                let part = FountainPart::from_cbor(&self.codec.decode(&body)?)?;
                let header = part.header();
                if header.seq_num() != seq_num || header.seq_len() != seq_len {
                    return Err(Error::malformed(format!(
                        "path sequence {seq_num}-{seq_len} disagrees with header {}-{}",
                        header.seq_num(),
                        header.seq_len()
                    )));
                }

                let status = self.fountain.receive(&part)?;
                if self.expected_type.is_none() {
                    debug!("latched UR type {ur_type}");
                    self.expected_type = Some(ur_type);
                }
                if status == PartStatus::Complete {
                    self.complete()?;
                }
                Ok(status)
            }
        }
    }

    fn complete(&mut self) -> Result<()> {
        let (Some(ur_type), Some(message)) =
            (self.expected_type.clone(), self.fountain.result_message())
        else {
            return Ok(());
        };
        let ur = Ur::new(ur_type, message)?;
        debug!(
            "reassembled {} UR after {} parts",
            ur.ur_type(),
            self.processed_parts_count
        );
        self.result = Some(Ok(ur));
        Ok(())
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> DecoderState {
        match &self.result {
            Some(Ok(_)) => DecoderState::Success,
            Some(Err(_)) => DecoderState::Failure,
            None if self.expected_type.is_some() => DecoderState::Accumulating,
            None => DecoderState::Empty,
        }
    }

    /// Type tag latched from the first accepted part.
    #[must_use]
    pub fn expected_type(&self) -> Option<&str> { self.expected_type.as_deref() }

    /// Number of fragments in the message, once the first part arrived.
    #[must_use]
    pub fn expected_part_count(&self) -> Option<usize> { self.fountain.expected_part_count() }

    /// Fragment indexes known or referenced by retained mixed parts.
    #[must_use]
    pub fn received_part_indexes(&self) -> IndexSet { self.fountain.received_part_indexes() }

    /// Fragment indexes of the most recently accepted part.
    #[must_use]
    pub fn last_part_indexes(&self) -> &IndexSet { self.fountain.last_part_indexes() }

    /// Number of `receive_part` calls, including rejected and ignored parts.
    #[must_use]
    pub fn processed_parts_count(&self) -> u64 { self.processed_parts_count }

    /// Fraction of fragments recovered so far, in `0.0..=1.0`.
    #[must_use]
    pub fn estimated_percent_complete(&self) -> f64 {
        if self.is_success() {
            1.0
        } else {
            self.fountain.estimated_percent_complete()
        }
    }

    /// Whether the UR was reassembled.
    #[must_use]
    pub fn is_success(&self) -> bool { matches!(self.result, Some(Ok(_))) }

    /// Whether the session failed.
    #[must_use]
    pub fn is_failure(&self) -> bool { matches!(self.result, Some(Err(_))) }

    /// Whether the session reached a terminal state.
    #[must_use]
    pub fn is_complete(&self) -> bool { self.result.is_some() }

    /// Reassembled UR after success.
    #[must_use]
    pub fn result_ur(&self) -> Option<&Ur> {
        match &self.result {
            Some(Ok(ur)) => Some(ur),
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
}

fn decode_single(text: &str, codec: &impl WordCodec) -> Result<Ur> {
    match wire::parse(text)? {
        UrText::Single { ur_type, body } => Ur::new(ur_type, codec.decode(&body)?),
        UrText::Multi { .. } => Err(Error::malformed(
            "multi-part UR passed to the single-part decoder",
        )),
    }
}
