/// Byte transform applied to the serialized code table before it is stored.
///
/// Each `TableCodec` implementation:
/// - Is identified by a stable numeric `id()` stored in the framed header.
///   The legacy layout has no id field and always means zlib.
/// - Treats its input as opaque bytes; it never sees the Huffman payload.
/// - Must be deterministic: the same input compresses to the same bytes,
///   which keeps whole containers reproducible.
pub trait TableCodec: Send + Sync {
    /// Stable codec ID stored in the container header.
    fn id(&self) -> u16;

    /// Human-readable codec name for logs and option parsing.
    fn name(&self) -> &'static str;

    /// Compress the serialized code table.
    fn compress(&self, raw: &[u8]) -> anyhow::Result<Vec<u8>>;

    /// Reverse [`compress`](Self::compress). Corrupt or truncated input must
    /// fail rather than return partial output.
    fn decompress(&self, compressed: &[u8]) -> anyhow::Result<Vec<u8>>;
}
