//! Utilities for testing `urkit` encoders and decoders.
//!
//! Messages are generated from a seeded Xoshiro256** stream so that tests
//! can share fixtures with other implementations of the protocol: the
//! message produced for a seed here matches theirs byte for byte.
//!
//! ```
//! use urkit_testing::{make_message, make_message_ur};
//! let message = make_message("Wolf", 16);
//! assert_eq!(message[..4], [0x91, 0x6e, 0xc6, 0x5c]);
//! assert_eq!(make_message_ur(16, "Wolf").message().expect("bytes"), message);
//! ```

pub mod logging;
pub mod parts;

pub use logging::{LoggerHandle, logger};
pub use parts::{drop_every, encode_parts, shuffled};
use urkit::{Ur, xoshiro::Xoshiro256};

/// Generate `len` deterministic bytes from `seed`.
#[must_use]
pub fn make_message(seed: &str, len: usize) -> Vec<u8> {
    Xoshiro256::from_seed_bytes(seed.as_bytes()).next_data(len)
}

/// Wrap [`make_message`] output in a `bytes` UR.
///
/// # Panics
///
/// Panics if the message cannot be written as a CBOR byte string.
#[must_use]
pub fn make_message_ur(len: usize, seed: &str) -> Ur {
    Ur::from_bytes(&make_message(seed, len)).expect("wrap message")
}
