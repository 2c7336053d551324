use std::collections::BTreeMap;

/// Symbol occurrence counts, ordered by symbol.
///
/// The ordering fixes the leaf insertion order seen by the tree builder, so
/// two tables with the same contents always produce the same tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: BTreeMap<char, u64>,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count every character of `text` in a single pass.
    pub fn count(text: &str) -> Self {
        let mut counts = BTreeMap::new();
        for symbol in text.chars() {
            *counts.entry(symbol).or_insert(0) += 1;
        }
        Self { counts }
    }

    pub fn get(&self, symbol: char) -> Option<u64> {
        self.counts.get(&symbol).copied()
    }

    /// Set the weight for `symbol`, replacing any previous count.
    pub fn insert(&mut self, symbol: char, weight: u64) {
        self.counts.insert(symbol, weight);
    }

    /// Number of distinct symbols.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts (the text length in characters). Saturates at
    /// `u64::MAX` for hand-built tables whose weights overflow.
    pub fn total(&self) -> u64 {
        self.counts
            .values()
            .fold(0u64, |acc, &weight| acc.saturating_add(weight))
    }

    pub fn iter(&self) -> impl Iterator<Item = (char, u64)> + '_ {
        self.counts.iter().map(|(&symbol, &weight)| (symbol, weight))
    }
}

impl FromIterator<(char, u64)> for FrequencyTable {
    fn from_iter<I: IntoIterator<Item = (char, u64)>>(iter: I) -> Self {
        Self {
            counts: iter.into_iter().collect(),
        }
    }
}
