use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CompactaError, Result};
use crate::tree::{HuffNode, HuffmanTree};

/// Longest code a table may hold. Reaching it would take a text of roughly
/// Fib(66) characters, so it only trips on corrupt or hand-built tables.
pub const MAX_CODE_LEN: u8 = 64;

/// Upper bound on the JSON form of any valid table: one entry per Unicode
/// scalar value, each at most `"\uXXXX":"<64 bits>",` (76 bytes, rounded
/// up to 80), plus the braces. Table codecs refuse to inflate past it.
pub const MAX_TABLE_JSON_LEN: usize = (0x11_0000 - 0x800) * 80 + 2;

/// A non-empty bitstring of at most [`MAX_CODE_LEN`] bits.
///
/// Bits are stored right-aligned in `bits`; the first bit of the code is
/// bit `len - 1`. Text form is a string of `'0'`/`'1'` characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Code {
    pub(crate) bits: u64,
    pub(crate) len: u8,
}

impl Code {
    /// Build a code from its `len` low bits. Returns `None` for an empty or
    /// over-long code, or when `bits` has bits set above `len`.
    pub fn new(bits: u64, len: u8) -> Option<Self> {
        if len == 0 || len > MAX_CODE_LEN {
            return None;
        }
        if len < 64 && bits >> len != 0 {
            return None;
        }
        Some(Self { bits, len })
    }

    #[inline]
    pub fn len(&self) -> u8 {
        self.len
    }

    /// Always false; kept for API symmetry with `len`.
    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Bits from first to last.
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len).rev().map(move |i| (self.bits >> i) & 1 == 1)
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in self.iter() {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl FromStr for Code {
    type Err = CompactaError;

    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(CompactaError::format("empty code"));
        }
        if s.len() > MAX_CODE_LEN as usize {
            return Err(CompactaError::format(format!(
                "code {s:?} is longer than {MAX_CODE_LEN} bits"
            )));
        }
        let mut bits = 0u64;
        for c in s.chars() {
            let bit = match c {
                '0' => 0,
                '1' => 1,
                other => {
                    return Err(CompactaError::format(format!(
                        "code {s:?} contains {other:?}, expected only '0' and '1'"
                    )))
                }
            };
            bits = (bits << 1) | bit;
        }
        Ok(Self {
            bits,
            len: s.len() as u8,
        })
    }
}

impl TryFrom<String> for Code {
    type Error = CompactaError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<Code> for String {
    fn from(code: Code) -> Self {
        code.to_string()
    }
}

/// Symbol → code mapping, persisted inside the container.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CodeTable {
    codes: BTreeMap<char, Code>,
}

impl CodeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flatten `tree` into a code table. A lone root leaf gets the code `0`.
    pub fn generate(tree: &HuffmanTree) -> Result<Self> {
        let mut codes = BTreeMap::new();
        match tree.root() {
            None => {}
            Some(HuffNode::Leaf { symbol, .. }) => {
                codes.insert(*symbol, Code { bits: 0, len: 1 });
            }
            Some(root) => collect(root, 0, 0, &mut codes)?,
        }
        Ok(Self { codes })
    }

    pub fn get(&self, symbol: char) -> Option<Code> {
        self.codes.get(&symbol).copied()
    }

    pub fn insert(&mut self, symbol: char, code: Code) -> Option<Code> {
        self.codes.insert(symbol, code)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (char, Code)> + '_ {
        self.codes.iter().map(|(&symbol, &code)| (symbol, code))
    }

    /// UTF-8 JSON object mapping each symbol to its `'0'`/`'1'` string.
    /// Keys come out in symbol order, so equal tables give equal bytes.
    pub fn to_json_bytes(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self)
            .map_err(|e| CompactaError::encoding(format!("cannot serialize code table: {e}")))
    }

    pub fn from_json_bytes(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes)
            .map_err(|e| CompactaError::format(format!("invalid code table: {e}")))
    }
}

impl FromIterator<(char, Code)> for CodeTable {
    fn from_iter<I: IntoIterator<Item = (char, Code)>>(iter: I) -> Self {
        Self {
            codes: iter.into_iter().collect(),
        }
    }
}

fn collect(
    node: &HuffNode,
    bits: u64,
    depth: u8,
    codes: &mut BTreeMap<char, Code>,
) -> Result<()> {
    match node {
        HuffNode::Leaf { symbol, .. } => {
            codes.insert(*symbol, Code { bits, len: depth });
        }
        HuffNode::Internal { left, right, .. } => {
            if depth >= MAX_CODE_LEN {
                return Err(CompactaError::tree(format!(
                    "tree is deeper than {MAX_CODE_LEN} levels"
                )));
            }
            collect(left, bits << 1, depth + 1, codes)?;
            collect(right, (bits << 1) | 1, depth + 1, codes)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::frequency::FrequencyTable;

    fn code(s: &str) -> Code {
        s.parse().unwrap()
    }

    fn table_for(text: &str) -> CodeTable {
        let tree = HuffmanTree::build(&FrequencyTable::count(text)).unwrap();
        CodeTable::generate(&tree).unwrap()
    }

    #[test]
    fn code_text_form() {
        let c = code("0110");
        assert_eq!(c.len(), 4);
        assert_eq!(c.to_string(), "0110");
        assert_eq!(c.iter().collect::<Vec<_>>(), vec![false, true, true, false]);
        assert_eq!(Code::new(0b0110, 4), Some(c));
        assert_eq!(Code::new(0b10000, 4), None);
        assert_eq!(Code::new(0, 0), None);
        assert!(Code::new(u64::MAX, 64).is_some());
    }

    #[test]
    fn generates_codes_from_tree() {
        let table = table_for("aaaabbc");
        assert_eq!(table.get('a'), Some(code("1")));
        assert_eq!(table.get('c'), Some(code("00")));
        assert_eq!(table.get('b'), Some(code("01")));
    }

    #[test]
    fn single_symbol_gets_one_bit() {
        let table = table_for("zzzzzz");
        assert_eq!(table.len(), 1);
        assert_eq!(table.get('z'), Some(code("0")));
    }

    #[test]
    fn empty_tree_gives_empty_table() {
        assert!(table_for("").is_empty());
    }

    #[test]
    fn codes_are_prefix_free() {
        let table = table_for("it was the best of times, it was the worst of times");
        let codes: Vec<String> = table.iter().map(|(_, c)| c.to_string()).collect();
        for (i, a) in codes.iter().enumerate() {
            for (j, b) in codes.iter().enumerate() {
                if i != j {
                    assert!(!b.starts_with(a.as_str()), "{a} is a prefix of {b}");
                }
            }
        }
    }

    #[test]
    fn json_form_maps_symbols_to_bit_strings() {
        let table = table_for("aaaabbc");
        let json = table.to_json_bytes().unwrap();
        assert_eq!(json, br#"{"a":"1","b":"01","c":"00"}"#.to_vec());
        assert_eq!(CodeTable::from_json_bytes(&json).unwrap(), table);
    }

    #[test]
    fn json_parse_accepts_escaped_symbols() {
        let json = r#"{"\"":"0","é":"10","\n":"11","ñ":"01"}"#;
        let table = CodeTable::from_json_bytes(json.as_bytes()).unwrap();
        assert_eq!(table.get('"'), Some(code("0")));
        assert_eq!(table.get('é'), Some(code("10")));
        assert_eq!(table.get('\n'), Some(code("11")));
        assert_eq!(table.get('ñ'), Some(code("01")));
    }

    #[test]
    fn json_parse_rejects_bad_tables() {
        let bad_tables: [&[u8]; 6] = [
            br#"{"a":""}"#,
            br#"{"a":"012"}"#,
            br#"{"ab":"0"}"#,
            br#"{"a":1}"#,
            br#"["a","0"]"#,
            br#"{"a":"0""#,
        ];
        for bad in bad_tables {
            let err = CodeTable::from_json_bytes(bad).unwrap_err();
            let shown = String::from_utf8_lossy(bad);
            assert_eq!(err.kind(), ErrorKind::Format, "accepted {shown:?}");
        }

        let long = format!(r#"{{"a":"{}"}}"#, "1".repeat(65));
        let err = CodeTable::from_json_bytes(long.as_bytes()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
    }
}
