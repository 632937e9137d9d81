//! CBOR wire form of a fountain part.
//!
//! A part is serialised as the five element array
//! `[seq_num, seq_len, message_len, checksum, data]`: four unsigned
//! integers in minimal encoding followed by the fragment bytes as a byte
//! string. This body is what the word codec renders after the
//! `seq_num-seq_len` path component of a multi-part UR.

use minicbor::{
    Decoder,
    Encoder,
    encode::{self, Write},
};

use super::PartHeader;
use crate::error::Error;

const PART_FIELDS: u64 = 5;

/// Header and payload of a single emitted part.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FountainPart {
    header: PartHeader,
    data: Vec<u8>,
}

impl FountainPart {
    /// Construct a new part.
    #[must_use]
    pub fn new(header: PartHeader, data: Vec<u8>) -> Self { Self { header, data } }

    /// Return the part header.
    #[must_use]
    pub const fn header(&self) -> &PartHeader { &self.header }

    /// Return the part payload: one fragment, or the XOR of several.
    #[must_use]
    pub fn data(&self) -> &[u8] { &self.data }

    /// Consume the part, returning its components.
    #[must_use]
    pub fn into_parts(self) -> (PartHeader, Vec<u8>) { (self.header, self.data) }

    /// Encode the part as CBOR.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Encoding`] if the CBOR encoder rejects the part.
    pub fn to_cbor(&self) -> crate::Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(self.data.len() + 32);
        self.encode(&mut Encoder::new(&mut buf))?;
        Ok(buf)
    }

    /// Write the part into an existing CBOR encoder.
    ///
    /// # Errors
    ///
    /// Returns any error raised by the underlying writer.
    pub fn encode<W: Write>(&self, encoder: &mut Encoder<W>) -> Result<(), encode::Error<W::Error>> {
        encoder
            .array(PART_FIELDS)?
            .u32(self.header.seq_num())?
            .u32(self.header.seq_len())?
            .u32(self.header.message_len())?
            .u32(self.header.checksum())?
            .bytes(&self.data)?;
        Ok(())
    }

    /// Decode a part from its CBOR body.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Malformed`] if `bytes` is not a five element array of
    /// four 32-bit unsigned integers and a byte string, if it carries
    /// trailing bytes, or if the fragment payload is empty.
    pub fn from_cbor(bytes: &[u8]) -> crate::Result<Self> {
        let mut decoder = Decoder::new(bytes);
        match decoder.array()? {
            Some(PART_FIELDS) => {}
            Some(len) => {
                return Err(Error::malformed(format!(
                    "part array has {len} fields, expected {PART_FIELDS}"
                )));
            }
            None => return Err(Error::malformed("indefinite-length part array")),
        }

        let seq_num = decoder.u32()?;
        let seq_len = decoder.u32()?;
        let message_len = decoder.u32()?;
        let checksum = decoder.u32()?;
        let data = decoder.bytes()?.to_vec();

        if decoder.position() != bytes.len() {
            return Err(Error::malformed("trailing bytes after part"));
        }
        if data.is_empty() {
            return Err(Error::malformed("part carries no fragment data"));
        }

        Ok(Self::new(
            PartHeader::new(seq_num, seq_len, message_len, checksum),
            data,
        ))
    }
}
