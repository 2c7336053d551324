use compacta_core::code_table::MAX_TABLE_JSON_LEN;
use compacta_core::codec::TableCodec;
use compacta_core::format::CODEC_LZ4;

/// Size of the little-endian raw-length prefix in front of the LZ4 block.
const SIZE_PREFIX: usize = 4;

/// A literal-heavy LZ4 block expands at most ~255×.
const MAX_EXPANSION: usize = 255;

/// LZ4 block codec: `[table_json_len: u32 LE][lz4 block]`.
///
/// Fastest of the bundled codecs; tables are small, so it mostly matters
/// when many containers are written back to back.
pub struct Lz4Codec;

impl TableCodec for Lz4Codec {
    fn id(&self) -> u16 {
        CODEC_LZ4
    }

    fn name(&self) -> &'static str {
        "lz4"
    }

    fn compress(&self, table_json: &[u8]) -> anyhow::Result<Vec<u8>> {
        crate::check_table_len(table_json.len())?;
        Ok(lz4_flex::compress_prepend_size(table_json))
    }

    /// The stored length is checked against the table bound and against
    /// what the block could expand to before anything is allocated.
    fn decompress(&self, blob: &[u8]) -> anyhow::Result<Vec<u8>> {
        let Some((prefix, block)) = blob.split_first_chunk::<SIZE_PREFIX>() else {
            anyhow::bail!("lz4 table blob is {} bytes, too short for its size prefix", blob.len());
        };
        let table_json_len = u32::from_le_bytes(*prefix) as usize;
        crate::check_table_len(table_json_len)?;
        if table_json_len > block.len().saturating_mul(MAX_EXPANSION) {
            anyhow::bail!(
                "lz4 table claims {table_json_len} bytes from a {}-byte block",
                block.len()
            );
        }

        let table_json = lz4_flex::block::decompress(block, table_json_len)
            .map_err(|e| anyhow::anyhow!("lz4 table block is corrupt: {e}"))?;
        if table_json.len() != table_json_len {
            anyhow::bail!(
                "lz4 table block gave {} of {table_json_len} bytes",
                table_json.len()
            );
        }
        Ok(table_json)
    }
}
