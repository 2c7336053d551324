use std::collections::HashMap;

use crate::code_table::{Code, CodeTable};
use crate::error::{CompactaError, Result};

/// Ordered bits with an explicit length, stored MSB-first.
///
/// The length is tracked separately from the byte buffer because the
/// padding in the last byte is otherwise ambiguous.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BitSequence {
    bytes: Vec<u8>,
    len: usize,
}

impl BitSequence {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn push(&mut self, bit: bool) {
        let byte_index = self.len / 8;
        let bit_offset = self.len % 8;
        if byte_index >= self.bytes.len() {
            self.bytes.push(0);
        }
        if bit {
            self.bytes[byte_index] |= 1 << (7 - bit_offset);
        }
        self.len += 1;
    }

    pub fn push_code(&mut self, code: Code) {
        for bit in code.iter() {
            self.push(bit);
        }
    }

    pub fn get(&self, index: usize) -> Option<bool> {
        if index >= self.len {
            return None;
        }
        Some(self.bytes[index / 8] & (1 << (7 - index % 8)) != 0)
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len).map(move |i| self.bytes[i / 8] & (1 << (7 - i % 8)) != 0)
    }

    /// Serialize as the big-endian unsigned integer whose binary digits are
    /// this sequence. The output is `ceil(len / 8)` bytes with the zero
    /// padding on the most significant side.
    pub fn pack(&self) -> Vec<u8> {
        let byte_len = packed_len(self.len);
        let pad = byte_len * 8 - self.len;
        let mut out = vec![0u8; byte_len];
        for (i, bit) in self.iter().enumerate() {
            if bit {
                let pos = pad + i;
                out[pos / 8] |= 1 << (7 - pos % 8);
            }
        }
        out
    }

    /// Inverse of [`pack`](Self::pack): recover exactly `bit_length` bits,
    /// leading zeros included.
    pub fn unpack(bytes: &[u8], bit_length: usize) -> Result<Self> {
        let byte_len = packed_len(bit_length);
        if bytes.len() != byte_len {
            return Err(CompactaError::format(format!(
                "payload is {} bytes but {bit_length} bits need {byte_len}",
                bytes.len()
            )));
        }

        let pad = byte_len * 8 - bit_length;
        if pad > 0 && bytes[0] >> (8 - pad) != 0 {
            return Err(CompactaError::format(format!(
                "payload integer is wider than {bit_length} bits"
            )));
        }

        let mut seq = Self {
            bytes: Vec::with_capacity(byte_len),
            len: 0,
        };
        for pos in pad..byte_len * 8 {
            seq.push(bytes[pos / 8] & (1 << (7 - pos % 8)) != 0);
        }
        Ok(seq)
    }
}

/// Bytes needed to hold `bit_length` bits.
#[inline]
pub fn packed_len(bit_length: usize) -> usize {
    bit_length.div_ceil(8)
}

/// Concatenate the code of every character of `text`.
pub fn encode(text: &str, table: &CodeTable) -> Result<BitSequence> {
    let mut seq = BitSequence::new();
    for (i, symbol) in text.chars().enumerate() {
        let code = table.get(symbol).ok_or_else(|| {
            CompactaError::encoding(format!(
                "character {symbol:?} at position {i} has no code"
            ))
        })?;
        seq.push_code(code);
    }
    Ok(seq)
}

/// Decode `bits` against `table`, emitting a symbol whenever the growing
/// prefix matches a code.
pub fn decode(bits: &BitSequence, table: &CodeTable) -> Result<String> {
    let mut inverted: HashMap<Code, char> = HashMap::with_capacity(table.len());
    let mut longest = 0u8;
    for (symbol, code) in table.iter() {
        if let Some(previous) = inverted.insert(code, symbol) {
            return Err(CompactaError::decoding(format!(
                "symbols {previous:?} and {symbol:?} share the code {code}"
            )));
        }
        longest = longest.max(code.len());
    }

    let mut text = String::new();
    let mut prefix = 0u64;
    let mut prefix_len = 0u8;
    for (i, bit) in bits.iter().enumerate() {
        if prefix_len == longest {
            return Err(CompactaError::decoding(format!(
                "bits ending at {i} match no code"
            )));
        }
        prefix = (prefix << 1) | bit as u64;
        prefix_len += 1;

        let candidate = Code {
            bits: prefix,
            len: prefix_len,
        };
        if let Some(&symbol) = inverted.get(&candidate) {
            text.push(symbol);
            prefix = 0;
            prefix_len = 0;
        }
    }

    if prefix_len > 0 {
        return Err(CompactaError::decoding(format!(
            "bit sequence ends mid-symbol with {prefix_len} unmatched bits"
        )));
    }
    Ok(text)
}
