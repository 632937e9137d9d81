//! Metric helpers for `urkit`.
//!
//! This module defines metric names and small helper functions wrapping
//! the [`metrics`](https://docs.rs/metrics) crate. With the `metrics`
//! feature disabled the helpers compile to nothing.

#[cfg(feature = "metrics")]
use metrics::{counter, gauge};

/// Name of the counter tracking parts produced by encoders.
pub const PARTS_EMITTED: &str = "urkit_parts_emitted_total";
/// Name of the counter tracking parts fed to decoders, labelled by outcome.
pub const PARTS_RECEIVED: &str = "urkit_parts_received_total";
/// Name of the counter tracking decoders that failed terminally.
pub const DECODE_FAILURES: &str = "urkit_decode_failures_total";
/// Name of the gauge tracking live registry sessions.
pub const SESSIONS_ACTIVE: &str = "urkit_sessions_active";

/// What became of a received part.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The part added information.
    Accepted,
    /// The part was a duplicate or arrived after completion.
    Ignored,
    /// The part could not be parsed and was dropped.
    Rejected,
}

impl Outcome {
    /// Label value used for this outcome.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Accepted => "accepted",
            Outcome::Ignored => "ignored",
            Outcome::Rejected => "rejected",
        }
    }
}

/// Record an emitted part.
pub fn inc_parts_emitted() {
    #[cfg(feature = "metrics")]
    counter!(PARTS_EMITTED).increment(1);
}

/// Record a received part with its outcome.
pub fn inc_parts_received(outcome: Outcome) {
    #[cfg(feature = "metrics")]
    counter!(PARTS_RECEIVED, "outcome" => outcome.as_str()).increment(1);
    #[cfg(not(feature = "metrics"))]
    let _ = outcome;
}

/// Record a decoder entering its failed state.
pub fn inc_decode_failures() {
    #[cfg(feature = "metrics")]
    counter!(DECODE_FAILURES).increment(1);
}

/// Increment the active sessions gauge.
pub fn inc_sessions() {
    #[cfg(feature = "metrics")]
    gauge!(SESSIONS_ACTIVE).increment(1.0);
}

/// Decrement the active sessions gauge.
pub fn dec_sessions() {
    #[cfg(feature = "metrics")]
    gauge!(SESSIONS_ACTIVE).decrement(1.0);
}
