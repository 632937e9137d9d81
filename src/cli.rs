//! Command line interface for the `urkit` binary.
//!
//! Shared with the build script, which renders the manual page from these
//! definitions.

use std::num::NonZeroUsize;

use clap::{Args, Parser, Subcommand};

/// Command line arguments for the `urkit` binary.
#[derive(Debug, Parser)]
#[command(
    name = "urkit",
    version,
    about = "Encode and decode multi-part Uniform Resources"
)]
pub struct Cli {
    /// Operation to perform.
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands understood by `urkit`.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Split a hex-encoded message into UR parts, one per line.
    Encode(EncodeArgs),
    /// Read UR parts from stdin, one per line, and print the message as hex.
    Decode,
}

/// Arguments for `urkit encode`.
#[derive(Debug, Args)]
pub struct EncodeArgs {
    /// UR type tag.
    #[arg(long = "type", default_value = "bytes")]
    pub ur_type: String,
    /// Largest fragment, in bytes.
    #[arg(long, default_value = "200")]
    pub max_fragment_len: NonZeroUsize,
    /// Smallest preferred fragment, in bytes.
    #[arg(long, default_value = "10")]
    pub min_fragment_len: NonZeroUsize,
    /// Sequence number to count from.
    #[arg(long, default_value_t = 0)]
    pub first_seq_num: u32,
    /// Number of parts to print. Defaults to one pass over the fragments.
    #[arg(long, conflicts_with = "fps")]
    pub parts: Option<usize>,
    /// Print parts at this many per second instead of all at once.
    #[arg(long, requires = "duration")]
    pub fps: Option<NonZeroUsize>,
    /// Seconds to keep printing paced parts.
    #[arg(long, requires = "fps")]
    pub duration: Option<u64>,
    /// Message to encode, as hex.
    pub hex: String,
}
