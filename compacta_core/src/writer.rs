use std::io::Write;

use xxhash_rust::xxh3::Xxh3;

use crate::bits::BitSequence;
use crate::code_table::CodeTable;
use crate::codec::TableCodec;
use crate::error::{CompactaError, Result};
use crate::format::{
    ContainerHeader, Framing, CHECKSUM_SIZE, CODEC_ZLIB, HEADER_SIZE, LENGTH_FIELD_SIZE,
};

/// Sizes of a written container, for logs and callers that track ratios.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContainerStats {
    pub bit_length: u32,
    pub payload_len: usize,
    pub table_len: usize,
    /// Every byte written to the sink, header and checksum included.
    pub total_len: u64,
}

/// Sequential writer for one container.
///
/// # Write contract
/// Bytes go out in layout order at the sink's current position; the writer
/// never seeks. If a write fails part way the sink holds a partial
/// container and the caller must discard it.
///
/// # Format layout written
/// ```text
/// [HEADER: 12 bytes]                    ← framed only
/// [bit_length: u32 LE]
/// [payload: ceil(bit_length / 8) bytes] ← big-endian integer of the bits
/// [table_len: u32 LE]
/// [table_blob: table_len bytes]         ← codec-compressed JSON code table
/// [xxh3-64 of header + body: u64 LE]    ← framed with FLAG_HAS_CHECKSUM
/// ```
pub struct Writer<W: Write> {
    sink: W,
    codec: Box<dyn TableCodec>,
    framing: Framing,
    checksum: bool,
}

impl<W: Write> Writer<W> {
    /// Create a writer over `sink`.
    ///
    /// The legacy layout has nowhere to record the table codec, so it only
    /// accepts the zlib codec.
    pub fn new(sink: W, codec: Box<dyn TableCodec>, framing: Framing) -> Result<Self> {
        if framing == Framing::Legacy && codec.id() != CODEC_ZLIB {
            return Err(CompactaError::encoding(format!(
                "legacy layout stores zlib tables only, got codec '{}'",
                codec.name()
            )));
        }
        Ok(Self {
            sink,
            codec,
            framing,
            checksum: true,
        })
    }

    /// Toggle the trailing checksum. Ignored by the legacy layout.
    pub fn with_checksum(mut self, checksum: bool) -> Self {
        self.checksum = checksum;
        self
    }

    /// Write the whole container for `bits` and `table`, then flush.
    pub fn write_container(
        mut self,
        bits: &BitSequence,
        table: &CodeTable,
    ) -> Result<ContainerStats> {
        let _span = tracing::debug_span!(
            "write_container",
            framing = ?self.framing,
            codec = self.codec.name()
        )
        .entered();

        let bit_length = u32::try_from(bits.len()).map_err(|_| {
            CompactaError::encoding(format!(
                "payload of {} bits does not fit the 32-bit length field",
                bits.len()
            ))
        })?;
        let payload = bits.pack();

        let table_json = table.to_json_bytes()?;
        let table_blob = self.codec.compress(&table_json).map_err(|e| {
            CompactaError::encoding(format!(
                "{} table compression failed: {e}",
                self.codec.name()
            ))
        })?;
        let table_len = u32::try_from(table_blob.len()).map_err(|_| {
            CompactaError::encoding("compressed code table does not fit the 32-bit length field")
        })?;

        let framed = self.framing == Framing::Framed;
        let checksum = framed && self.checksum;
        let mut total_len = 0u64;
        let mut hasher = Xxh3::new();

        if framed {
            let header = ContainerHeader::new(self.codec.id(), checksum).to_bytes();
            self.sink.write_all(&header)?;
            hasher.update(&header);
            total_len += HEADER_SIZE as u64;
        }

        let bit_length_field = bit_length.to_le_bytes();
        let table_len_field = table_len.to_le_bytes();
        for part in [
            &bit_length_field[..],
            &payload[..],
            &table_len_field[..],
            &table_blob[..],
        ] {
            self.sink.write_all(part)?;
            hasher.update(part);
        }
        total_len += (2 * LENGTH_FIELD_SIZE + payload.len() + table_blob.len()) as u64;

        if checksum {
            self.sink.write_all(&hasher.digest().to_le_bytes())?;
            total_len += CHECKSUM_SIZE as u64;
        }
        self.sink.flush()?;

        let stats = ContainerStats {
            bit_length,
            payload_len: payload.len(),
            table_len: table_blob.len(),
            total_len,
        };
        tracing::debug!(
            bit_length,
            payload_len = stats.payload_len,
            table_json_len = table_json.len(),
            table_len = stats.table_len,
            total_len,
            "container written"
        );
        Ok(stats)
    }
}
