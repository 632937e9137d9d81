//! Typed, CBOR-wrapped payloads.
//!
//! A [`Ur`] pairs a type tag with the CBOR encoding of its message. Only the
//! byte-string wrapping is handled here; richer CBOR data models are left to
//! callers, who may supply pre-encoded CBOR through [`Ur::new`].

use minicbor::{Decoder, Encoder, data::Type};

use crate::error::{Error, Result};

/// Type tag assumed when callers supply raw bytes without one.
pub const BYTES_TYPE: &str = "bytes";

/// Uniform Resource: a type tag and its CBOR payload.
///
/// # Examples
///
/// ```
/// use urkit::Ur;
/// let ur = Ur::from_message("psbt", &[0x01, 0x03, 0x7f]).expect("valid type");
/// assert_eq!(ur.ur_type(), "psbt");
/// assert_eq!(ur.payload(), &[0x43, 0x01, 0x03, 0x7f]);
/// assert_eq!(ur.message().expect("byte string"), vec![0x01, 0x03, 0x7f]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Ur {
    ur_type: String,
    payload: Vec<u8>,
}

impl Ur {
    /// Construct a UR from a type tag and pre-encoded CBOR.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidType`] if `ur_type` is empty or contains
    /// characters outside `[a-z0-9-]`.
    pub fn new(ur_type: impl Into<String>, payload: impl Into<Vec<u8>>) -> Result<Self> {
        let ur_type = ur_type.into();
        if !is_ur_type(&ur_type) {
            return Err(Error::InvalidType(ur_type));
        }
        Ok(Self {
            ur_type,
            payload: payload.into(),
        })
    }

    /// Wrap `message` as a CBOR byte string under `ur_type`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidType`] if `ur_type` is not a valid tag, or
    /// [`Error::Encoding`] if the byte string cannot be written.
    pub fn from_message(ur_type: impl Into<String>, message: &[u8]) -> Result<Self> {
        Self::new(ur_type, wrap_byte_string(message)?)
    }

    /// Wrap `message` under the default `bytes` type.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Encoding`] if the byte string cannot be written.
    pub fn from_bytes(message: &[u8]) -> Result<Self> {
        Ok(Self {
            ur_type: BYTES_TYPE.to_owned(),
            payload: wrap_byte_string(message)?,
        })
    }

    /// Return the type tag.
    #[must_use]
    pub fn ur_type(&self) -> &str { &self.ur_type }

    /// Return the CBOR payload.
    #[must_use]
    pub fn payload(&self) -> &[u8] { &self.payload }

    /// Consume the UR, returning the type tag and CBOR payload.
    #[must_use]
    pub fn into_parts(self) -> (String, Vec<u8>) { (self.ur_type, self.payload) }

    /// Unwrap the CBOR byte string carried by this UR.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Malformed`] if the payload is not exactly one
    /// definite-length CBOR byte string.
    pub fn message(&self) -> Result<Vec<u8>> {
        let mut decoder = Decoder::new(&self.payload);
        if decoder.datatype()? != Type::Bytes {
            return Err(Error::malformed("UR payload is not a CBOR byte string"));
        }
        let message = decoder.bytes()?.to_vec();
        if decoder.position() != self.payload.len() {
            return Err(Error::malformed("trailing bytes after CBOR byte string"));
        }
        Ok(message)
    }
}

/// Whether `candidate` is a valid UR type tag.
#[must_use]
pub fn is_ur_type(candidate: &str) -> bool {
    !candidate.is_empty()
        && candidate
            .bytes()
            .all(|byte| byte.is_ascii_lowercase() || byte.is_ascii_digit() || byte == b'-')
}

fn wrap_byte_string(message: &[u8]) -> Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(message.len() + 9);
    Encoder::new(&mut buf).bytes(message)?;
    Ok(buf)
}
