//! Canonical error and result types for the crate.
//!
//! Every failure carries a structured [`ErrorKind`] alongside a readable
//! message. Decoders distinguish per-part failures, which are tolerated as
//! noise, from fatal failures that end a decoding session.

use std::convert::Infallible;

use thiserror::Error;

use crate::session::SessionId;

/// Coarse classification of an [`Error`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Fragment length bounds cannot be satisfied.
    InvalidBounds,
    /// An encoder was asked to split an empty payload.
    EmptyMessage,
    /// A UR type tag contains characters outside `[a-z0-9-]`.
    InvalidType,
    /// A part or UR string could not be parsed.
    Malformed,
    /// A part disagrees with the header latched from earlier parts.
    HeterogeneousParts,
    /// The reconstructed payload failed its integrity check.
    ChecksumMismatch,
    /// A part refers to fragment indexes outside the message.
    InvalidFragmentIndexSet,
    /// A part stream ended before the message was recovered.
    Incomplete,
    /// No session is registered under the given identifier.
    UnknownSession,
    /// CBOR serialisation of an outbound value failed.
    Encoding,
}

/// Top-level error type exposed by `urkit`.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// Fragment length bounds cannot be satisfied for the payload.
    #[error("invalid fragment bounds: {0}")]
    InvalidBounds(String),
    /// The payload to encode was empty.
    #[error("cannot fragment an empty message")]
    EmptyMessage,
    /// The UR type tag is not a valid identifier.
    #[error("invalid UR type {0:?}: expected one or more of [a-z0-9-]")]
    InvalidType(String),
    /// The part text or its CBOR body could not be decoded.
    #[error("malformed part: {0}")]
    Malformed(String),
    /// A part's header disagrees with the message being decoded.
    #[error("heterogeneous parts: {0}")]
    HeterogeneousParts(String),
    /// The reconstructed payload does not match the advertised checksum.
    #[error("checksum mismatch: expected {expected:#010x}, computed {computed:#010x}")]
    ChecksumMismatch {
        /// Checksum carried by every part header.
        expected: u32,
        /// Checksum of the reconstructed payload.
        computed: u32,
    },
    /// A part header describes an impossible fragment index set.
    #[error("invalid fragment index set: {0}")]
    InvalidFragmentIndexSet(String),
    /// A part stream ended before the decoder completed.
    #[error("part stream ended after {processed} parts without completing the message")]
    Incomplete {
        /// Number of parts processed before the stream ended.
        processed: u64,
    },
    /// The session identifier does not refer to a live session.
    #[error("unknown session {0}")]
    UnknownSession(SessionId),
    /// An outbound value could not be written as CBOR.
    #[error("cbor encoding failed: {0}")]
    Encoding(String),
}

impl Error {
    /// Return the structured kind of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidBounds(_) => ErrorKind::InvalidBounds,
            Self::EmptyMessage => ErrorKind::EmptyMessage,
            Self::InvalidType(_) => ErrorKind::InvalidType,
            Self::Malformed(_) => ErrorKind::Malformed,
            Self::HeterogeneousParts(_) => ErrorKind::HeterogeneousParts,
            Self::ChecksumMismatch { .. } => ErrorKind::ChecksumMismatch,
            Self::InvalidFragmentIndexSet(_) => ErrorKind::InvalidFragmentIndexSet,
            Self::Incomplete { .. } => ErrorKind::Incomplete,
            Self::UnknownSession(_) => ErrorKind::UnknownSession,
            Self::Encoding(_) => ErrorKind::Encoding,
        }
    }

    /// Whether this error ends a decoding session.
    ///
    /// Fatal errors move a decoder into its terminal failure state; callers
    /// must discard the session and restart from scratch.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::HeterogeneousParts | ErrorKind::ChecksumMismatch
        )
    }

    pub(crate) fn malformed(reason: impl Into<String>) -> Self { Self::Malformed(reason.into()) }
}

impl From<minicbor::decode::Error> for Error {
    fn from(error: minicbor::decode::Error) -> Self { Self::Malformed(format!("cbor: {error}")) }
}

impl From<minicbor::encode::Error<Infallible>> for Error {
    fn from(error: minicbor::encode::Error<Infallible>) -> Self { Self::Encoding(error.to_string()) }
}

/// Canonical result alias used by `urkit` public APIs.
pub type Result<T> = std::result::Result<T, Error>;
