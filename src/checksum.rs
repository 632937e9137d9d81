//! CRC-32 integrity checksums shared by the word codec and the fountain layer.

use crc::{CRC_32_ISO_HDLC, Crc};

const CRC32: Crc<u32> = Crc::<u32>::new(&CRC_32_ISO_HDLC);

/// Compute the CRC-32 (ISO-HDLC polynomial) of `data`.
///
/// # Examples
///
/// ```
/// assert_eq!(urkit::checksum::crc32(b"Hello, world!"), 0xebe6_c6e6);
/// ```
#[must_use]
pub fn crc32(data: &[u8]) -> u32 { CRC32.checksum(data) }

/// Compute the CRC-32 of `data` as big-endian bytes.
#[must_use]
pub fn crc32_bytes(data: &[u8]) -> [u8; 4] { crc32(data).to_be_bytes() }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_vectors() {
        assert_eq!(crc32(b"Hello, world!"), 0xebe6_c6e6);
        assert_eq!(crc32(b"Wolf"), 0x598c_84dc);
        assert_eq!(crc32_bytes(b"Wolf"), [0x59, 0x8c, 0x84, 0xdc]);
    }
}
