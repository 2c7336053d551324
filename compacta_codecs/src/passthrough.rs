use compacta_core::codec::TableCodec;
use compacta_core::format::CODEC_PASSTHROUGH;

/// Stores the JSON code table verbatim, so `strings` on a container shows
/// the symbol → code map.
///
/// No framing of its own: a cut-short table is caught by the container
/// checksum or by the JSON parser.
pub struct PassThroughCodec;

impl TableCodec for PassThroughCodec {
    fn id(&self) -> u16 {
        CODEC_PASSTHROUGH
    }

    fn name(&self) -> &'static str {
        "passthrough"
    }

    fn compress(&self, table_json: &[u8]) -> anyhow::Result<Vec<u8>> {
        crate::check_table_len(table_json.len())?;
        Ok(table_json.to_vec())
    }

    /// Even the empty table serializes as `{}`, so an empty blob is never
    /// a table.
    fn decompress(&self, blob: &[u8]) -> anyhow::Result<Vec<u8>> {
        if blob.is_empty() {
            anyhow::bail!("passthrough table blob is empty");
        }
        crate::check_table_len(blob.len())?;
        Ok(blob.to_vec())
    }
}
