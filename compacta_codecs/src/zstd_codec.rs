use std::io::Read;

use compacta_core::code_table::MAX_TABLE_JSON_LEN;
use compacta_core::codec::TableCodec;
use compacta_core::format::CODEC_ZSTD;

/// Zstandard code-table codec, framed layout only.
///
/// Tables are a few hundred bytes of repetitive JSON (`"x":"0101"` pairs),
/// where zstd lands close to zlib. Pick it when the rest of a pipeline
/// already speaks zstd.
pub struct ZstdCodec {
    /// Compression level; must fall in `zstd::compression_level_range()`.
    pub level: i32,
}

impl Default for ZstdCodec {
    fn default() -> Self {
        Self { level: 3 }
    }
}

impl ZstdCodec {
    pub fn new(level: i32) -> Self {
        Self { level }
    }
}

impl TableCodec for ZstdCodec {
    fn id(&self) -> u16 {
        CODEC_ZSTD
    }

    fn name(&self) -> &'static str {
        "zstd"
    }

    fn compress(&self, table_json: &[u8]) -> anyhow::Result<Vec<u8>> {
        let levels = zstd::compression_level_range();
        if !levels.contains(&self.level) {
            anyhow::bail!(
                "zstd level {} outside {}..={}",
                self.level,
                levels.start(),
                levels.end()
            );
        }
        crate::check_table_len(table_json.len())?;
        Ok(zstd::bulk::compress(table_json, self.level)?)
    }

    /// Stream-decode so a hostile frame header cannot size the output
    /// buffer; stop one byte past the largest possible table.
    fn decompress(&self, blob: &[u8]) -> anyhow::Result<Vec<u8>> {
        let decoder = zstd::stream::read::Decoder::new(blob)?;
        let mut table_json = Vec::new();
        decoder
            .take(MAX_TABLE_JSON_LEN as u64 + 1)
            .read_to_end(&mut table_json)?;
        crate::check_table_len(table_json.len())?;
        Ok(table_json)
    }
}
