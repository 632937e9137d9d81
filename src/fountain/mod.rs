//! Fountain-code primitives for splitting and rebuilding messages.
//!
//! This module collects the domain types of the fountain layer. Each
//! sub-module focuses on a single concept: splitting payloads into
//! fragments, selecting the fragments mixed into each part, the part wire
//! format, and the encoder and decoder built on top of them.

pub mod decoder;
pub mod encoder;
pub mod header;
pub mod part;
pub mod selector;
pub mod splitter;

use std::collections::BTreeSet;

pub use decoder::{FountainDecoder, PartStatus};
pub use encoder::FountainEncoder;
pub use header::PartHeader;
pub use part::FountainPart;
pub use selector::choose_fragments;
pub use splitter::{FragmentSet, Fragmenter};

/// Ordered set of zero-based fragment indexes mixed into one part.
pub type IndexSet = BTreeSet<usize>;

/// XOR `src` into `dst` in place. Both slices share the fragment length.
pub(crate) fn xor_into(dst: &mut [u8], src: &[u8]) {
    debug_assert_eq!(dst.len(), src.len(), "fragments must share a length");
    for (d, s) in dst.iter_mut().zip(src) {
        *d ^= s;
    }
}
