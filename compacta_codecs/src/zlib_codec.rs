use std::io::Write;

use compacta_core::codec::TableCodec;
use compacta_core::format::CODEC_ZLIB;
use flate2::write::ZlibEncoder;
use flate2::{Compression, Decompress, FlushDecompress, Status};

/// zlib-wrapped deflate. The legacy layout always stores its table this
/// way, and it is the default for framed containers.
pub struct ZlibCodec {
    /// Compression level (0 = store, 9 = smallest).
    pub level: u32,
}

impl Default for ZlibCodec {
    fn default() -> Self {
        Self {
            level: Compression::default().level(),
        }
    }
}

impl ZlibCodec {
    pub fn new(level: u32) -> Self {
        Self { level }
    }
}

impl TableCodec for ZlibCodec {
    fn id(&self) -> u16 {
        CODEC_ZLIB
    }

    fn name(&self) -> &'static str {
        "zlib"
    }

    fn compress(&self, raw: &[u8]) -> anyhow::Result<Vec<u8>> {
        crate::check_table_len(raw.len())?;
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::new(self.level));
        encoder.write_all(raw)?;
        Ok(encoder.finish()?)
    }

    /// Inflate the whole blob, requiring the stream to end (adler32 trailer
    /// included) exactly at the last input byte and the output to stay
    /// within the table size bound. The `read::ZlibDecoder` path reports a
    /// clean EOF on a stream cut short, so it is not used.
    fn decompress(&self, compressed: &[u8]) -> anyhow::Result<Vec<u8>> {
        let mut inflater = Decompress::new(true);
        let mut raw = Vec::with_capacity(compressed.len().saturating_mul(4).max(64));

        loop {
            crate::check_table_len(raw.len())?;
            if raw.len() == raw.capacity() {
                raw.reserve(raw.capacity());
            }
            let (in_before, out_before) = (inflater.total_in(), inflater.total_out());
            let input = &compressed[in_before as usize..];
            let status = inflater.decompress_vec(input, &mut raw, FlushDecompress::Finish)?;

            match status {
                Status::StreamEnd => break,
                Status::Ok | Status::BufError => {
                    let stalled =
                        inflater.total_in() == in_before && inflater.total_out() == out_before;
                    let out_of_input = inflater.total_in() as usize == compressed.len();
                    if raw.len() < raw.capacity() && (stalled || out_of_input) {
                        anyhow::bail!("zlib stream is truncated");
                    }
                }
            }
        }

        if inflater.total_in() as usize != compressed.len() {
            anyhow::bail!(
                "{} trailing bytes after zlib stream",
                compressed.len() - inflater.total_in() as usize
            );
        }
        Ok(raw)
    }
}
