#![doc(html_root_url = "https://docs.rs/urkit/latest")]
//! Public API for the `urkit` library.
//!
//! This crate encodes typed binary payloads as Uniform Resources (URs) and
//! splits large ones into an unbounded, fountain-coded stream of textual
//! parts. A decoder can rebuild the payload from any sufficiently large
//! subset of those parts, in any order and with duplicates.

pub mod bytewords;
pub mod checksum;
pub mod config;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod fountain;
pub mod metrics;
pub mod prelude;
pub mod sampler;
pub mod session;
pub mod stream;
pub mod ur;
pub mod wire;
pub mod xoshiro;

pub use bytewords::{MinimalBytewords, WordCodec};
pub use config::EncoderConfig;
pub use decoder::{DecoderState, UrDecoder};
pub use encoder::UrEncoder;
pub use error::{Error, ErrorKind, Result};
pub use fountain::{
    FountainDecoder,
    FountainEncoder,
    FountainPart,
    FragmentSet,
    Fragmenter,
    IndexSet,
    PartHeader,
    PartStatus,
    choose_fragments,
};
pub use session::{DecoderRegistry, EncoderRegistry, SessionId, SessionRegistry};
pub use ur::Ur;
