use serde::{Deserialize, Serialize};

use compacta_core::Framing;

/// Settings for [`compact_with`](crate::compact_with).
///
/// Every field has a default, so a config file only needs to name what it
/// changes:
/// ```
/// let opts: compacta::CompactOptions =
///     serde_json::from_str(r#"{"table_codec":"zstd"}"#).unwrap();
/// assert_eq!(opts.zstd_level, 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompactOptions {
    pub framing: Framing,
    /// Codec for the code table: zlib | zstd | lz4 | passthrough.
    /// The legacy layout requires zlib.
    pub table_codec: String,
    /// Only used with `table_codec = "zstd"`.
    pub zstd_level: i32,
    /// Append an xxh3-64 checksum of the header and body. Framed layout
    /// only; readers reject framed containers without one unless told not to.
    pub checksum: bool,
}

impl Default for CompactOptions {
    fn default() -> Self {
        Self {
            framing: Framing::Framed,
            table_codec: "zlib".to_string(),
            zstd_level: 3,
            checksum: true,
        }
    }
}

impl CompactOptions {
    /// Options producing exactly the headerless legacy layout.
    pub fn legacy() -> Self {
        Self {
            framing: Framing::Legacy,
            checksum: false,
            ..Self::default()
        }
    }
}

/// Settings for [`decompact_with`](crate::decompact_with).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecompactOptions {
    /// Must match the layout the container was written with; the legacy
    /// layout has no magic to detect it by.
    pub framing: Framing,
    /// Reject framed containers that carry no checksum.
    pub require_checksum: bool,
}

impl Default for DecompactOptions {
    fn default() -> Self {
        Self {
            framing: Framing::Framed,
            require_checksum: true,
        }
    }
}

impl DecompactOptions {
    pub fn legacy() -> Self {
        Self {
            framing: Framing::Legacy,
            ..Self::default()
        }
    }
}
