//! Byte-to-text codec used to render part bodies as URL- and QR-safe text.
//!
//! The core only needs a reversible mapping with an integrity suffix, so it
//! talks to the codec through [`WordCodec`]. [`MinimalBytewords`] is the
//! interoperable default: every byte becomes the first and last letter of its
//! Bytewords word, and a big-endian CRC-32 of the body is appended before
//! encoding.

use crate::{
    checksum::crc32_bytes,
    error::{Error, Result},
};

/// Reversible byte/text codec with an integrity checksum.
pub trait WordCodec {
    /// Render `data` as text, appending an integrity checksum.
    fn encode(&self, data: &[u8]) -> String;

    /// Recover the bytes from `text`, verifying the checksum.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Malformed`] when `text` is not valid codec output or
    /// when its checksum does not match the body.
    fn decode(&self, text: &str) -> Result<Vec<u8>>;
}

/// The 256 Bytewords, indexed by byte value.
pub const WORDS: [&str; 256] = [
    "able", "acid", "also", "apex", "aqua", "arch", "atom", "aunt",
    "away", "axis", "back", "bald", "barn", "belt", "beta", "bias",
    "blue", "body", "brag", "brew", "bulb", "buzz", "calm", "cash",
    "cats", "chef", "city", "claw", "code", "cola", "cook", "cost",
    "crux", "curl", "cusp", "cyan", "dark", "data", "days", "deli",
    "dice", "diet", "door", "down", "draw", "drop", "drum", "dull",
    "duty", "each", "easy", "echo", "edge", "epic", "even", "exam",
    "exit", "eyes", "fact", "fair", "fern", "figs", "film", "fish",
    "fizz", "flap", "flew", "flux", "foxy", "free", "frog", "fuel",
    "fund", "gala", "game", "gear", "gems", "gift", "girl", "glow",
    "good", "gray", "grim", "guru", "gush", "gyro", "half", "hang",
    "hard", "hawk", "heat", "help", "high", "hill", "holy", "hope",
    "horn", "huts", "iced", "idea", "idle", "inch", "inky", "into",
    "iris", "iron", "item", "jade", "jazz", "join", "jolt", "jowl",
    "judo", "jugs", "jump", "junk", "jury", "keep", "keno", "kept",
    "keys", "kick", "kiln", "king", "kite", "kiwi", "knob", "lamb",
    "lava", "lazy", "leaf", "legs", "liar", "limp", "lion", "list",
    "logo", "loud", "love", "luau", "luck", "lung", "main", "many",
    "math", "maze", "memo", "menu", "meow", "mild", "mint", "miss",
    "monk", "nail", "navy", "need", "news", "next", "noon", "note",
    "numb", "obey", "oboe", "omit", "onyx", "open", "oval", "owls",
    "paid", "part", "peck", "play", "plus", "poem", "pool", "pose",
    "puff", "puma", "purr", "quad", "quiz", "race", "ramp", "real",
    "redo", "rich", "road", "rock", "roof", "ruby", "ruin", "runs",
    "rust", "safe", "saga", "scar", "sets", "silk", "skew", "slot",
    "soap", "solo", "song", "stub", "surf", "swan", "taco", "task",
    "taxi", "tent", "tied", "time", "tiny", "toil", "tomb", "toys",
    "trip", "tuna", "twin", "ugly", "undo", "unit", "urge", "user",
    "vast", "very", "veto", "vial", "vibe", "view", "visa", "void",
    "vows", "wall", "wand", "warm", "wasp", "wave", "waxy", "webs",
    "what", "when", "whiz", "wolf", "work", "yank", "yawn", "yell",
    "yoga", "yurt", "zaps", "zero", "zest", "zinc", "zone", "zoom",
];

const CHECKSUM_LEN: usize = 4;
const ALPHABET: usize = 26;

/// Maps a `(first, last)` letter pair to its byte value, or `-1`.
const MINIMAL_LOOKUP: [i16; ALPHABET * ALPHABET] = build_minimal_lookup();

#[expect(clippy::cast_possible_truncation, reason = "byte values stay below 256")]
const fn build_minimal_lookup() -> [i16; ALPHABET * ALPHABET] {
    let mut table = [-1_i16; ALPHABET * ALPHABET];
    let mut byte = 0;
    while byte < WORDS.len() {
        let word = WORDS[byte].as_bytes();
        let slot = (word[0] - b'a') as usize * ALPHABET + (word[3] - b'a') as usize;
        table[slot] = byte as i16;
        byte += 1;
    }
    table
}

/// Two-letter Bytewords encoding, as used in `ur:` strings.
///
/// # Examples
///
/// ```
/// use urkit::{MinimalBytewords, WordCodec};
/// let text = MinimalBytewords.encode(&[0x00, 0xff]);
/// assert_eq!(&text[..4], "aezm");
/// assert_eq!(MinimalBytewords.decode(&text).expect("valid"), vec![0x00, 0xff]);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MinimalBytewords;

impl MinimalBytewords {
    fn push_byte(out: &mut String, byte: u8) {
        let word = WORDS[usize::from(byte)].as_bytes();
        out.push(char::from(word[0]));
        out.push(char::from(word[3]));
    }

    fn letter(byte: u8) -> Option<usize> {
        let lower = byte.to_ascii_lowercase();
        lower
            .is_ascii_lowercase()
            .then(|| usize::from(lower - b'a'))
    }

    fn lookup(first: u8, last: u8) -> Option<u8> {
        let slot = Self::letter(first)? * ALPHABET + Self::letter(last)?;
        u8::try_from(MINIMAL_LOOKUP[slot]).ok()
    }
}

impl WordCodec for MinimalBytewords {
    fn encode(&self, data: &[u8]) -> String {
        let mut out = String::with_capacity((data.len() + CHECKSUM_LEN) * 2);
        for byte in data.iter().copied().chain(crc32_bytes(data)) {
            Self::push_byte(&mut out, byte);
        }
        out
    }

    fn decode(&self, text: &str) -> Result<Vec<u8>> {
        let letters = text.as_bytes();
        if letters.len() % 2 != 0 {
            return Err(Error::malformed("bytewords text has an odd length"));
        }

        let mut bytes = Vec::with_capacity(letters.len() / 2);
        for pair in letters.chunks_exact(2) {
            let byte = Self::lookup(pair[0], pair[1]).ok_or_else(|| {
                Error::malformed(format!(
                    "unknown byteword {:?}",
                    String::from_utf8_lossy(pair)
                ))
            })?;
            bytes.push(byte);
        }

        if bytes.len() <= CHECKSUM_LEN {
            return Err(Error::malformed("bytewords body is too short"));
        }

        let body_len = bytes.len() - CHECKSUM_LEN;
        if bytes[body_len..] != crc32_bytes(&bytes[..body_len]) {
            return Err(Error::malformed("bytewords checksum mismatch"));
        }
        bytes.truncate(body_len);
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn minimal_pairs_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for word in WORDS {
            let bytes = word.as_bytes();
            assert!(seen.insert((bytes[0], bytes[3])), "duplicate pair for {word}");
        }
    }

    #[test]
    fn encodes_reference_vector() {
        // CBOR header of a five element array followed by a one and a nine.
        let text = MinimalBytewords.encode(&[0x85, 0x01, 0x09]);
        assert_eq!(&text[..6], "lpadas");
        assert_eq!(text.len(), (3 + 4) * 2);
    }

    #[test]
    fn decode_accepts_upper_case() {
        let text = MinimalBytewords.encode(b"Hello, world!").to_ascii_uppercase();
        assert_eq!(
            MinimalBytewords.decode(&text).expect("upper case text"),
            b"Hello, world!"
        );
    }

    #[rstest]
    #[case::odd_length("aea")]
    #[case::unknown_pair("aeaeaeaeaeqq")]
    #[case::too_short("aeaeaeae")]
    #[case::bad_checksum("aeaeaeaeaeae")]
    #[case::non_letters("a1a1a1a1a1a1")]
    fn rejects_invalid_text(#[case] text: &str) {
        let err = MinimalBytewords.decode(text).expect_err("text should be rejected");
        assert_eq!(err.kind(), ErrorKind::Malformed);
    }
}
