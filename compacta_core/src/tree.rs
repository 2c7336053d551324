use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::error::{CompactaError, Result};
use crate::frequency::FrequencyTable;

/// Node of a Huffman tree. Internal nodes carry the summed weight of their
/// subtree; the left edge is bit `0`, the right edge bit `1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HuffNode {
    Leaf {
        symbol: char,
        weight: u64,
    },
    Internal {
        weight: u64,
        left: Box<HuffNode>,
        right: Box<HuffNode>,
    },
}

impl HuffNode {
    pub fn weight(&self) -> u64 {
        match self {
            HuffNode::Leaf { weight, .. } => *weight,
            HuffNode::Internal { weight, .. } => *weight,
        }
    }

    /// Merge two nodes; `left` is the lower-ranked one.
    fn merge(left: HuffNode, right: HuffNode) -> Result<HuffNode> {
        let weight = left.weight().checked_add(right.weight()).ok_or_else(|| {
            CompactaError::tree("subtree weight overflows u64")
        })?;
        Ok(HuffNode::Internal {
            weight,
            left: Box::new(left),
            right: Box::new(right),
        })
    }
}

/// Heap slot ordered by `(weight, rank)`, smallest first.
///
/// Leaves are ranked by symbol order; internal nodes get increasing ranks
/// after the last leaf, in creation order. Ranks are unique, so equal
/// weights never leave the pop order to the heap's internals.
struct Pending {
    weight: u64,
    rank: usize,
    node: HuffNode,
}

impl PartialEq for Pending {
    fn eq(&self, other: &Self) -> bool {
        self.weight == other.weight && self.rank == other.rank
    }
}

impl Eq for Pending {}

impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pending {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap; reverse to pop the smallest key first.
        (other.weight, other.rank).cmp(&(self.weight, self.rank))
    }
}

/// Prefix-code tree built by greedy minimum-weight merging.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HuffmanTree {
    root: Option<HuffNode>,
}

impl HuffmanTree {
    /// Build the tree for `frequencies`.
    ///
    /// An empty table yields an empty tree. A single symbol yields a lone
    /// leaf; the code generator gives it the 1-bit code `0`.
    pub fn build(frequencies: &FrequencyTable) -> Result<Self> {
        let mut heap = BinaryHeap::with_capacity(frequencies.len());
        for (rank, (symbol, weight)) in frequencies.iter().enumerate() {
            if weight == 0 {
                return Err(CompactaError::tree(format!(
                    "symbol {symbol:?} has zero weight"
                )));
            }
            heap.push(Pending {
                weight,
                rank,
                node: HuffNode::Leaf { symbol, weight },
            });
        }

        let mut next_rank = frequencies.len();
        while heap.len() > 1 {
            let (Some(lo), Some(hi)) = (heap.pop(), heap.pop()) else {
                return Err(CompactaError::tree("heap underflow while merging"));
            };
            let node = HuffNode::merge(lo.node, hi.node)?;
            heap.push(Pending {
                weight: node.weight(),
                rank: next_rank,
                node,
            });
            next_rank += 1;
        }

        Ok(Self {
            root: heap.pop().map(|pending| pending.node),
        })
    }

    pub fn root(&self) -> Option<&HuffNode> {
        self.root.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Total weight at the root (zero for an empty tree).
    pub fn weight(&self) -> u64 {
        self.root.as_ref().map_or(0, HuffNode::weight)
    }

    /// Number of leaves.
    pub fn leaf_count(&self) -> usize {
        fn walk(node: &HuffNode) -> usize {
            match node {
                HuffNode::Leaf { .. } => 1,
                HuffNode::Internal { left, right, .. } => walk(left) + walk(right),
            }
        }
        self.root.as_ref().map_or(0, walk)
    }
}
