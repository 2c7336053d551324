use serde::{Deserialize, Serialize};

use crate::error::{CompactaError, Result};

/// Magic bytes opening a framed container.
pub const MAGIC: &[u8; 4] = b"CPTA";

/// Only framed layout version understood by this crate.
pub const FORMAT_VERSION: u16 = 1;

/// Fixed size of the framed header in bytes.
///   magic[4] + version:u16 + table_codec:u16 + flags:u32 = 12
pub const HEADER_SIZE: usize = 12;

/// Size of each little-endian length field in the body.
pub const LENGTH_FIELD_SIZE: usize = 4;

/// Size of the trailing checksum in bytes.
pub const CHECKSUM_SIZE: usize = 8;

// ── Flags ──────────────────────────────────────────────────────────────────

/// The body is followed by an xxhash3-64 checksum of its bytes.
pub const FLAG_HAS_CHECKSUM: u32 = 1 << 0;

const KNOWN_FLAGS: u32 = FLAG_HAS_CHECKSUM;

// ── Table codec IDs ────────────────────────────────────────────────────────

pub const CODEC_PASSTHROUGH: u16 = 0;
pub const CODEC_ZLIB: u16 = 1;
pub const CODEC_ZSTD: u16 = 2;
pub const CODEC_LZ4: u16 = 3;

/// Container layout.
///
/// `Legacy` is the bare body:
/// ```text
/// [bit_length: u32 LE][payload][table_len: u32 LE][table_blob (zlib)]
/// ```
/// `Framed` wraps the same body in a header and an optional checksum:
/// ```text
/// [HEADER: 12 bytes][body][xxh3-64 of body: u64 LE, if FLAG_HAS_CHECKSUM]
/// ```
/// The legacy layout carries no magic, version or checksum, so truncation
/// or bit flips that stay inside the stored alphabet can decode silently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Framing {
    Legacy,
    #[default]
    Framed,
}

/// Decoded representation of the 12-byte framed header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerHeader {
    pub version: u16,
    pub table_codec: u16,
    pub flags: u32,
}

impl ContainerHeader {
    pub fn new(table_codec: u16, checksum: bool) -> Self {
        Self {
            version: FORMAT_VERSION,
            table_codec,
            flags: if checksum { FLAG_HAS_CHECKSUM } else { 0 },
        }
    }

    /// Serialize to exactly `HEADER_SIZE` bytes.
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut buf = [0u8; HEADER_SIZE];
        buf[..4].copy_from_slice(MAGIC);
        buf[4..6].copy_from_slice(&self.version.to_le_bytes());
        buf[6..8].copy_from_slice(&self.table_codec.to_le_bytes());
        buf[8..12].copy_from_slice(&self.flags.to_le_bytes());
        buf
    }

    /// Deserialize from `HEADER_SIZE` bytes, checking magic, version and
    /// flags.
    pub fn from_bytes(buf: &[u8; HEADER_SIZE]) -> Result<Self> {
        if &buf[..4] != MAGIC {
            return Err(CompactaError::format(
                "invalid magic bytes, not a framed compacta container",
            ));
        }
        let header = Self {
            version: u16::from_le_bytes([buf[4], buf[5]]),
            table_codec: u16::from_le_bytes([buf[6], buf[7]]),
            flags: u32::from_le_bytes([buf[8], buf[9], buf[10], buf[11]]),
        };
        if header.version != FORMAT_VERSION {
            return Err(CompactaError::format(format!(
                "unsupported container version {} (only version {FORMAT_VERSION} is supported)",
                header.version
            )));
        }
        if header.flags & !KNOWN_FLAGS != 0 {
            return Err(CompactaError::format(format!(
                "unknown header flags {:#010x}",
                header.flags & !KNOWN_FLAGS
            )));
        }
        Ok(header)
    }

    pub fn has_flag(&self, flag: u32) -> bool {
        self.flags & flag != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn header_layout() {
        let header = ContainerHeader::new(CODEC_ZSTD, true);
        let bytes = header.to_bytes();
        assert_eq!(&bytes[..4], b"CPTA");
        assert_eq!(&bytes[4..], &[1, 0, 2, 0, 1, 0, 0, 0]);
        assert_eq!(ContainerHeader::from_bytes(&bytes).unwrap(), header);
        assert!(header.has_flag(FLAG_HAS_CHECKSUM));
    }

    #[test]
    fn header_rejects_bad_magic_version_and_flags() {
        let good = ContainerHeader::new(CODEC_ZLIB, false).to_bytes();

        let mut bad_magic = good;
        bad_magic[0] = b'X';
        let mut bad_version = good;
        bad_version[4] = 9;
        let mut bad_flags = good;
        bad_flags[11] = 0x80;

        for bytes in [bad_magic, bad_version, bad_flags] {
            let err = ContainerHeader::from_bytes(&bytes).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Format);
        }
    }

    #[test]
    fn framing_names() {
        assert_eq!(serde_json::to_string(&Framing::Legacy).unwrap(), r#""legacy""#);
        assert_eq!(Framing::default(), Framing::Framed);
    }
}
