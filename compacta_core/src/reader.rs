use std::io::{self, Read};

use xxhash_rust::xxh3::Xxh3;

use crate::bits::{packed_len, BitSequence};
use crate::code_table::CodeTable;
use crate::codec::TableCodec;
use crate::error::{CompactaError, Result};
use crate::format::{
    ContainerHeader, Framing, CHECKSUM_SIZE, CODEC_ZLIB, FLAG_HAS_CHECKSUM, HEADER_SIZE,
    LENGTH_FIELD_SIZE,
};

/// Decoded container contents: the payload bits and the stored code table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    pub bits: BitSequence,
    pub table: CodeTable,
}

/// Sequential reader for one container.
///
/// # Open sequence
/// 1. [`open`](Self::open) reads the 12-byte header when the layout is
///    framed, so the caller can pick the table codec from its stored id.
/// 2. [`read_body`](Self::read_body) reads the length-prefixed payload and
///    table, checks the trailing checksum, then unpacks the bits and
///    decompresses and parses the table.
///
/// The checksum covers the header bytes as well as the body. A framed
/// container written without one is rejected unless
/// [`with_required_checksum(false)`](Self::with_required_checksum) is set,
/// so a cleared `FLAG_HAS_CHECKSUM` bit cannot switch verification off.
///
/// Only the container's own bytes are consumed; the source is never seeked
/// and anything after the container is left unread.
pub struct Reader<R: Read> {
    source: R,
    framing: Framing,
    header: Option<ContainerHeader>,
    require_checksum: bool,
}

impl<R: Read> Reader<R> {
    pub fn open(mut source: R, framing: Framing) -> Result<Self> {
        let header = match framing {
            Framing::Legacy => None,
            Framing::Framed => {
                let buf: [u8; HEADER_SIZE] = read_array(&mut source, "header")?;
                Some(ContainerHeader::from_bytes(&buf)?)
            }
        };
        Ok(Self {
            source,
            framing,
            header,
            require_checksum: true,
        })
    }

    /// Accept framed containers that carry no checksum. Ignored by the
    /// legacy layout, which never has one.
    pub fn with_required_checksum(mut self, required: bool) -> Self {
        self.require_checksum = required;
        self
    }

    /// Framed header, `None` for the legacy layout.
    pub fn header(&self) -> Option<&ContainerHeader> {
        self.header.as_ref()
    }

    /// Id of the codec the table blob was written with.
    pub fn table_codec_id(&self) -> u16 {
        self.header.as_ref().map_or(CODEC_ZLIB, |h| h.table_codec)
    }

    /// Read the rest of the container and decode its table with `codec`.
    pub fn read_body(mut self, codec: &dyn TableCodec) -> Result<Container> {
        let _span = tracing::debug_span!(
            "read_container",
            framing = ?self.framing,
            codec = codec.name()
        )
        .entered();

        if codec.id() != self.table_codec_id() {
            return Err(CompactaError::format(format!(
                "codec mismatch: container uses table codec {} but codec '{}' has id {}",
                self.table_codec_id(),
                codec.name(),
                codec.id()
            )));
        }

        let verify = match &self.header {
            Some(header) if header.has_flag(FLAG_HAS_CHECKSUM) => true,
            Some(_) if self.require_checksum => {
                return Err(CompactaError::format(
                    "container has no checksum (FLAG_HAS_CHECKSUM is clear)",
                ));
            }
            _ => false,
        };

        let mut hasher = Xxh3::new();
        if let Some(header) = &self.header {
            hasher.update(&header.to_bytes());
        }

        let bit_length_field: [u8; LENGTH_FIELD_SIZE] = read_array(&mut self.source, "bit length")?;
        hasher.update(&bit_length_field);
        let bit_length = u32::from_le_bytes(bit_length_field) as usize;

        let payload = read_section(&mut self.source, packed_len(bit_length), "payload")?;
        hasher.update(&payload);

        let table_len_field: [u8; LENGTH_FIELD_SIZE] =
            read_array(&mut self.source, "table length")?;
        hasher.update(&table_len_field);
        let table_len = u32::from_le_bytes(table_len_field) as usize;

        let table_blob = read_section(&mut self.source, table_len, "code table")?;
        hasher.update(&table_blob);

        if verify {
            let stored_field: [u8; CHECKSUM_SIZE] = read_array(&mut self.source, "checksum")?;
            let stored = u64::from_le_bytes(stored_field);
            let computed = hasher.digest();
            if stored != computed {
                return Err(CompactaError::format(format!(
                    "checksum mismatch: expected {stored:016x}, got {computed:016x}"
                )));
            }
        }

        let bits = BitSequence::unpack(&payload, bit_length)?;
        let table_json = codec
            .decompress(&table_blob)
            .map_err(|e| CompactaError::format(format!("cannot decompress code table: {e}")))?;
        let table = CodeTable::from_json_bytes(&table_json)?;

        tracing::debug!(
            bit_length,
            table_len,
            symbols = table.len(),
            "container read"
        );
        Ok(Container { bits, table })
    }
}

fn truncated_or_io(e: io::Error, what: &str) -> CompactaError {
    if e.kind() == io::ErrorKind::UnexpectedEof {
        CompactaError::format(format!("truncated container: missing {what}"))
    } else {
        CompactaError::Io(e)
    }
}

fn read_array<R: Read, const N: usize>(source: &mut R, what: &str) -> Result<[u8; N]> {
    let mut buf = [0u8; N];
    source
        .read_exact(&mut buf)
        .map_err(|e| truncated_or_io(e, what))?;
    Ok(buf)
}

/// Read exactly `len` bytes without trusting `len` for the allocation.
fn read_section<R: Read>(source: &mut R, len: usize, what: &str) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    source
        .take(len as u64)
        .read_to_end(&mut buf)
        .map_err(|e| truncated_or_io(e, what))?;
    if buf.len() != len {
        return Err(CompactaError::format(format!(
            "truncated container: {what} has {} of {len} bytes",
            buf.len()
        )));
    }
    Ok(buf)
}
