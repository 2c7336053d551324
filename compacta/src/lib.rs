//! # compacta
//!
//! Serialize an ordered sequence of JSON records into a Huffman-coded
//! container that carries its own code table, and read it back exactly.
//!
//! ```
//! use serde_json::json;
//! use std::io::Cursor;
//!
//! let records = vec![json!({"id": 1, "name": "O'Brien"}).as_object().unwrap().clone()];
//!
//! let mut container = Vec::new();
//! compacta::compact(&records, &mut container)?;
//!
//! let restored = compacta::decompact(&mut Cursor::new(container))?;
//! assert_eq!(restored, records);
//! # Ok::<(), compacta::CompactaError>(())
//! ```

mod options;

use std::io::{Read, Write};

use compacta_core::{
    decode, encode, parse, render, CodeTable, FrequencyTable, HuffmanTree, Reader, Writer,
};

pub use compacta_core::{
    CompactaError, ContainerStats, ErrorKind, Framing, Record, Result, ReturnCode,
};
pub use options::{CompactOptions, DecompactOptions};

/// Compact `records` into `sink` using the default options.
pub fn compact<W: Write>(records: &[Record], sink: &mut W) -> Result<()> {
    compact_with(records, sink, &CompactOptions::default()).map(|_| ())
}

/// Compact `records` into `sink`.
///
/// Pipeline: records → canonical text → frequencies → tree → code table →
/// bit sequence → container bytes. Bytes are written at the sink's current
/// position; on error the sink may hold a partial container.
pub fn compact_with<W: Write>(
    records: &[Record],
    sink: &mut W,
    options: &CompactOptions,
) -> Result<ContainerStats> {
    let _span = tracing::debug_span!("compact", records = records.len()).entered();

    let text = render(records)?;
    let frequencies = FrequencyTable::count(&text);
    let tree = HuffmanTree::build(&frequencies)?;
    let table = CodeTable::generate(&tree)?;
    let bits = encode(&text, &table)?;

    tracing::debug!(
        chars = frequencies.total(),
        symbols = table.len(),
        bits = bits.len(),
        "records encoded"
    );

    let codec = compacta_codecs::codec_from_name(&options.table_codec, options.zstd_level)
        .map_err(|e| CompactaError::encoding(e.to_string()))?;
    Writer::new(sink, codec, options.framing)?
        .with_checksum(options.checksum)
        .write_container(&bits, &table)
}

/// Read one framed container from `source`.
pub fn decompact<R: Read>(source: &mut R) -> Result<Vec<Record>> {
    decompact_with(source, &DecompactOptions::default())
}

/// Read one container from `source`.
///
/// Pipeline: container bytes → bit sequence + stored code table → text →
/// records. The table is loaded from the container, never rebuilt.
pub fn decompact_with<R: Read>(source: &mut R, options: &DecompactOptions) -> Result<Vec<Record>> {
    let _span = tracing::debug_span!("decompact", framing = ?options.framing).entered();

    let reader =
        Reader::open(source, options.framing)?.with_required_checksum(options.require_checksum);
    let codec = compacta_codecs::codec_by_id(reader.table_codec_id())
        .map_err(|e| CompactaError::format(e.to_string()))?;
    let container = reader.read_body(codec.as_ref())?;

    let text = decode(&container.bits, &container.table)?;
    let records = parse(&text)?;

    tracing::debug!(chars = text.chars().count(), records = records.len(), "records decoded");
    Ok(records)
}
