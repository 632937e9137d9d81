//! Optional convenience imports for common `urkit` workflows.
//!
//! This module is intentionally small and focused on high-frequency types.
//! Prefer importing specialised APIs directly from their owning modules.
//!
//! # Examples
//!
//! ```
//! use std::num::NonZeroUsize;
//!
//! use urkit::prelude::*;
//!
//! fn first_part(message: &[u8]) -> Result<String> {
//!     let config = EncoderConfig::new(NonZeroUsize::new(100).expect("non-zero"));
//!     let mut encoder = UrEncoder::new(Ur::from_bytes(message)?, &config)?;
//!     encoder.next_part()
//! }
//! # assert!(first_part(b"abc").expect("encodes").starts_with("ur:bytes/"));
//! ```

pub use crate::{
    bytewords::{MinimalBytewords, WordCodec},
    config::EncoderConfig,
    decoder::{DecoderState, UrDecoder},
    encoder::UrEncoder,
    error::{Error, ErrorKind, Result},
    fountain::PartStatus,
    session::{DecoderRegistry, EncoderRegistry, SessionId},
    ur::Ur,
};
