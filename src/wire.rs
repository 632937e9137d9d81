//! Textual framing of single-part and multi-part URs.
//!
//! ```text
//! ur:<type>/<body>
//! ur:<type>/<seq_num>-<seq_len>/<body>
//! ```
//!
//! Parsing is case-insensitive because QR alphanumeric mode upper-cases
//! everything; formatting always produces lower case.

use crate::{
    error::{Error, Result},
    ur::is_ur_type,
};

const SCHEME: &str = "ur:";

/// Components of a parsed UR string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UrText {
    /// A complete UR in one string.
    Single {
        /// Type tag.
        ur_type: String,
        /// Word-encoded CBOR payload.
        body: String,
    },
    /// One fountain part of a larger UR.
    Multi {
        /// Type tag.
        ur_type: String,
        /// Sequence number from the path.
        seq_num: u32,
        /// Sequence length from the path.
        seq_len: u32,
        /// Word-encoded part CBOR.
        body: String,
    },
}

impl UrText {
    /// Type tag carried in the path.
    #[must_use]
    pub fn ur_type(&self) -> &str {
        match self {
            Self::Single { ur_type, .. } | Self::Multi { ur_type, .. } => ur_type,
        }
    }

    /// Word-encoded body.
    #[must_use]
    pub fn body(&self) -> &str {
        match self {
            Self::Single { body, .. } | Self::Multi { body, .. } => body,
        }
    }
}

/// Split a UR string into its components.
///
/// # Errors
///
/// Returns [`Error::Malformed`] for a missing `ur:` scheme, the wrong
/// number of path components, an empty body, or an unparsable sequence
/// component, and [`Error::InvalidType`] for an invalid type tag.
///
/// # Examples
///
/// ```
/// use urkit::wire::{UrText, parse};
/// let text = parse("UR:BYTES/3-9/LPAXAS").expect("well formed");
/// assert_eq!(
///     text,
///     UrText::Multi {
///         ur_type: "bytes".into(),
///         seq_num: 3,
///         seq_len: 9,
///         body: "lpaxas".into(),
///     }
/// );
/// ```
pub fn parse(text: &str) -> Result<UrText> {
    let lowered = text.trim().to_ascii_lowercase();
    let Some(path) = lowered.strip_prefix(SCHEME) else {
        return Err(Error::malformed("missing ur: scheme"));
    };

    let components: Vec<&str> = path.split('/').collect();
    let (ur_type, seq, body) = match components.as_slice() {
        [ur_type, body] => (*ur_type, None, *body),
        [ur_type, seq, body] => (*ur_type, Some(*seq), *body),
        _ => {
            return Err(Error::malformed(format!(
                "expected 2 or 3 path components, found {}",
                components.len()
            )));
        }
    };

    if !is_ur_type(ur_type) {
        return Err(Error::InvalidType(ur_type.to_owned()));
    }
    if body.is_empty() {
        return Err(Error::malformed("empty body"));
    }

    let (ur_type, body) = (ur_type.to_owned(), body.to_owned());
    match seq {
        None => Ok(UrText::Single { ur_type, body }),
        Some(seq) => {
            let (seq_num, seq_len) = parse_sequence(seq)?;
            Ok(UrText::Multi {
                ur_type,
                seq_num,
                seq_len,
                body,
            })
        }
    }
}

fn parse_sequence(seq: &str) -> Result<(u32, u32)> {
    let (num, len) = seq
        .split_once('-')
        .ok_or_else(|| Error::malformed(format!("sequence component {seq:?} lacks '-'")))?;
    let parse = |field: &str| {
        field
            .parse::<u32>()
            .map_err(|_| Error::malformed(format!("invalid sequence component {seq:?}")))
    };
    Ok((parse(num)?, parse(len)?))
}

/// Render a single-part UR string.
#[must_use]
pub fn format_single(ur_type: &str, body: &str) -> String { format!("{SCHEME}{ur_type}/{body}") }

/// Render one part of a multi-part UR string.
#[must_use]
pub fn format_multi(ur_type: &str, seq_num: u32, seq_len: u32, body: &str) -> String {
    format!("{SCHEME}{ur_type}/{seq_num}-{seq_len}/{body}")
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn parses_single_part() {
        assert_eq!(
            parse("ur:bytes/hdeymejtswhh").expect("single part"),
            UrText::Single {
                ur_type: "bytes".into(),
                body: "hdeymejtswhh".into(),
            }
        );
    }

    #[test]
    fn formats_are_parsed_back() {
        let text = format_multi("crypto-psbt", 12, 9, "lpbbascf");
        assert_eq!(text, "ur:crypto-psbt/12-9/lpbbascf");
        let parsed = parse(&text).expect("multi part");
        assert_eq!(parsed.ur_type(), "crypto-psbt");
        assert_eq!(parsed.body(), "lpbbascf");
    }

    #[rstest]
    #[case("", ErrorKind::Malformed)]
    #[case("ur:bytes/", ErrorKind::Malformed)]
    #[case("ur:ur:ur", ErrorKind::Malformed)]
    #[case("uf:bytes/lpaxas", ErrorKind::Malformed)]
    #[case("ur:bytes/1-9/2/lpaxas", ErrorKind::Malformed)]
    #[case("ur:bytes/19/lpaxas", ErrorKind::Malformed)]
    #[case("ur:bytes/x-9/lpaxas", ErrorKind::Malformed)]
    #[case("ur:bytes/-1-9/lpaxas", ErrorKind::Malformed)]
    #[case("ur:by_tes/lpaxas", ErrorKind::InvalidType)]
    #[case("ur:/lpaxas", ErrorKind::InvalidType)]
    fn rejects_malformed_text(#[case] text: &str, #[case] kind: ErrorKind) {
        assert_eq!(parse(text).expect_err("rejected").kind(), kind);
    }
}
