mod lz4_codec;
mod passthrough;
mod zlib_codec;
mod zstd_codec;

pub use lz4_codec::Lz4Codec;
pub use passthrough::PassThroughCodec;
pub use zlib_codec::ZlibCodec;
pub use zstd_codec::ZstdCodec;

use compacta_core::code_table::MAX_TABLE_JSON_LEN;
use compacta_core::format::{CODEC_LZ4, CODEC_PASSTHROUGH, CODEC_ZLIB, CODEC_ZSTD};
use compacta_core::TableCodec;

/// Resolve a table codec from the id stored in a container header.
///
/// Zstd decoding does not depend on the level, so the default one is used.
pub fn codec_by_id(id: u16) -> anyhow::Result<Box<dyn TableCodec>> {
    match id {
        CODEC_PASSTHROUGH => Ok(Box::new(PassThroughCodec)),
        CODEC_ZLIB => Ok(Box::new(ZlibCodec::default())),
        CODEC_ZSTD => Ok(Box::new(ZstdCodec::default())),
        CODEC_LZ4 => Ok(Box::new(Lz4Codec)),
        _ => anyhow::bail!(
            "unknown table codec id {}; supported: 0 (passthrough), 1 (zlib), 2 (zstd), 3 (lz4)",
            id
        ),
    }
}

/// Resolve a table codec from a user-facing name.
pub fn codec_from_name(name: &str, zstd_level: i32) -> anyhow::Result<Box<dyn TableCodec>> {
    match name {
        "passthrough" | "pass" | "none" => Ok(Box::new(PassThroughCodec)),
        "zlib" | "deflate" => Ok(Box::new(ZlibCodec::default())),
        "zstd" | "z" => Ok(Box::new(ZstdCodec::new(zstd_level))),
        "lz4" | "l" => Ok(Box::new(Lz4Codec)),
        other => anyhow::bail!(
            "unknown table codec '{}'. Valid options: zlib, zstd, lz4, passthrough",
            other
        ),
    }
}

/// Shared size guard: no valid code table serializes past
/// [`MAX_TABLE_JSON_LEN`].
pub(crate) fn check_table_len(len: usize) -> anyhow::Result<()> {
    if len > MAX_TABLE_JSON_LEN {
        anyhow::bail!("code table of {len} bytes exceeds the {MAX_TABLE_JSON_LEN}-byte limit");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &[u8] = br#"{" ":"110","\"":"00","a":"01","b":"100","c":"101","d":"111"}"#;

    fn all_codecs() -> Vec<Box<dyn TableCodec>> {
        vec![
            Box::new(PassThroughCodec),
            Box::new(ZlibCodec::default()),
            Box::new(ZstdCodec::default()),
            Box::new(Lz4Codec),
        ]
    }

    #[test]
    fn every_codec_round_trips() {
        for codec in all_codecs() {
            let compressed = codec.compress(TABLE).unwrap();
            let restored = codec.decompress(&compressed).unwrap();
            assert_eq!(restored, TABLE, "codec {}", codec.name());
        }
    }

    #[test]
    fn every_codec_is_deterministic() {
        for codec in all_codecs() {
            assert_eq!(
                codec.compress(TABLE).unwrap(),
                codec.compress(TABLE).unwrap(),
                "codec {}",
                codec.name()
            );
        }
    }

    #[test]
    fn compressing_codecs_reject_truncated_input() {
        for codec in all_codecs().into_iter().filter(|c| c.id() != CODEC_PASSTHROUGH) {
            let compressed = codec.compress(TABLE).unwrap();
            let truncated = &compressed[..compressed.len() - 1];
            assert!(
                codec.decompress(truncated).is_err(),
                "codec {} accepted a truncated blob",
                codec.name()
            );
        }
    }

    #[test]
    fn lz4_rejects_impossible_size_prefix() {
        let mut blob = Lz4Codec.compress(TABLE).unwrap();
        blob[..4].copy_from_slice(&u32::MAX.to_le_bytes());
        let err = Lz4Codec.decompress(&blob).unwrap_err().to_string();
        assert!(err.contains("exceeds"), "got: {err}");

        let mut blob = Lz4Codec.compress(TABLE).unwrap();
        let claimed = (blob.len() - 4) * 255 + 1;
        blob[..4].copy_from_slice(&(claimed as u32).to_le_bytes());
        let err = Lz4Codec.decompress(&blob).unwrap_err().to_string();
        assert!(err.contains("claims"), "got: {err}");

        assert!(Lz4Codec.decompress(&[0x10, 0x00]).is_err());
    }

    #[test]
    fn lz4_rejects_short_block() {
        let mut blob = Lz4Codec.compress(TABLE).unwrap();
        let real = u32::from_le_bytes(blob[..4].try_into().unwrap());
        blob[..4].copy_from_slice(&(real + 1).to_le_bytes());
        assert!(Lz4Codec.decompress(&blob).is_err());
    }

    #[test]
    fn zstd_rejects_out_of_range_level() {
        let level = *zstd::compression_level_range().end() + 1;
        let err = ZstdCodec::new(level).compress(TABLE).unwrap_err().to_string();
        assert!(err.contains("zstd level"), "got: {err}");
    }

    #[test]
    fn passthrough_rejects_empty_blob() {
        assert!(PassThroughCodec.decompress(&[]).is_err());
        assert_eq!(PassThroughCodec.decompress(b"{}").unwrap(), b"{}");
    }

    #[test]
    fn table_length_guard() {
        assert!(check_table_len(MAX_TABLE_JSON_LEN).is_ok());
        assert!(check_table_len(MAX_TABLE_JSON_LEN + 1).is_err());
    }

    #[test]
    fn lookup_by_id_and_name_agree() {
        for codec in all_codecs() {
            assert_eq!(codec_by_id(codec.id()).unwrap().name(), codec.name());
            assert_eq!(codec_from_name(codec.name(), 3).unwrap().id(), codec.id());
        }
        assert!(codec_by_id(42).is_err());
        let err = codec_from_name("brotli", 3).err().unwrap().to_string();
        assert!(err.contains("unknown table codec"), "got: {err}");
    }
}
