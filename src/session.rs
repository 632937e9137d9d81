//! Registry of live encoder and decoder sessions.
//!
//! `SessionRegistry` owns sessions behind opaque [`SessionId`]s so callers
//! never hold references into encoder or decoder state. Entries are guarded
//! by the per-shard locks of [`DashMap`], making a registry safe to share
//! across threads while each session stays a plain value object.
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use derive_more::{Display, From};

use crate::{
    decoder::UrDecoder,
    encoder::UrEncoder,
    error::{Error, Result},
    metrics,
};

/// Identifier assigned to a registered session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, From)]
#[display("session-{_0}")]
pub struct SessionId(u64);

impl SessionId {
    /// Create a new [`SessionId`] with the provided value.
    #[must_use]
    pub const fn new(id: u64) -> Self { Self(id) }

    /// Return the inner `u64` representation.
    #[must_use]
    pub const fn as_u64(&self) -> u64 { self.0 }
}

/// Concurrent arena of sessions keyed by [`SessionId`].
pub struct SessionRegistry<T> {
    sessions: DashMap<SessionId, T>,
    next_id: AtomicU64,
}

/// Registry of textual encoders.
pub type EncoderRegistry = SessionRegistry<UrEncoder>;

/// Registry of textual decoders.
pub type DecoderRegistry = SessionRegistry<UrDecoder>;

impl<T> Default for SessionRegistry<T> {
    fn default() -> Self {
        Self {
            sessions: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }
}

impl<T> SessionRegistry<T> {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Register `session` under a fresh identifier.
    pub fn insert(&self, session: T) -> SessionId {
        let id = SessionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.sessions.insert(id, session);
        metrics::inc_sessions();
        id
    }

    /// Run `f` against the session registered under `id`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownSession`] if `id` is not registered.
    pub fn with<R>(&self, id: SessionId, f: impl FnOnce(&T) -> R) -> Result<R> {
        let entry = self.sessions.get(&id).ok_or(Error::UnknownSession(id))?;
        Ok(f(entry.value()))
    }

    /// Run `f` with exclusive access to the session registered under `id`.
    ///
    /// The entry's shard stays locked while `f` runs; `f` must not touch the
    /// same registry.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownSession`] if `id` is not registered.
    pub fn with_mut<R>(&self, id: SessionId, f: impl FnOnce(&mut T) -> R) -> Result<R> {
        let mut entry = self.sessions.get_mut(&id).ok_or(Error::UnknownSession(id))?;
        Ok(f(entry.value_mut()))
    }

    /// Dispose of a session, returning it if it was registered.
    pub fn remove(&self, id: SessionId) -> Option<T> {
        let (_, session) = self.sessions.remove(&id)?;
        metrics::dec_sessions();
        Some(session)
    }

    /// Number of live sessions.
    #[must_use]
    pub fn len(&self) -> usize { self.sessions.len() }

    /// Whether no sessions are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.sessions.is_empty() }

    /// Identifiers of all live sessions.
    #[must_use]
    pub fn ids(&self) -> Vec<SessionId> { self.sessions.iter().map(|entry| *entry.key()).collect() }
}

impl EncoderRegistry {
    /// Emit the next part of the encoder registered under `id`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownSession`] if `id` is not registered.
    pub fn next_part(&self, id: SessionId) -> Result<String> {
        self.with_mut(id, UrEncoder::next_part)?
    }
}

impl DecoderRegistry {
    /// Feed a textual part to the decoder registered under `id`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownSession`] if `id` is not registered, and
    /// otherwise the errors of [`UrDecoder::receive_part`].
    pub fn receive_part(&self, id: SessionId, text: &str) -> Result<crate::PartStatus> {
        self.with_mut(id, |decoder| decoder.receive_part(text))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn ids_are_unique_and_displayable() {
        let registry = SessionRegistry::new();
        let a = registry.insert("a");
        let b = registry.insert("b");
        assert_ne!(a, b);
        assert_eq!(SessionId::new(7).to_string(), "session-7");
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn removed_session_is_unknown() {
        let registry = SessionRegistry::new();
        let id = registry.insert(5_u32);
        assert_eq!(registry.with(id, |value| *value), Ok(5));
        assert_eq!(registry.remove(id), Some(5));
        assert!(registry.is_empty());

        let err = registry.with_mut(id, |value| *value += 1).expect_err("disposed");
        assert_eq!(err.kind(), ErrorKind::UnknownSession);
        assert_eq!(registry.remove(id), None);
    }
}
