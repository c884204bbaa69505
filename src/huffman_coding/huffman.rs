use std::cmp::Ordering;
use std::collections::BinaryHeap;

use log::trace;

use crate::error::{HuffError, Result};
use crate::tools::freq_count::FrequencyTable;

/// Index of a node in the tree arena.
pub type NodeId = usize;

/// A huffman tree node. Children are owned by index into the tree's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Node {
    Leaf(u16),
    Internal(NodeId, NodeId),
}

/// A full binary tree over the alphabet, with the code for every leaf symbol cached.
#[derive(Debug, Clone)]
pub struct HuffmanTree {
    nodes: Vec<Node>,
    root: NodeId,
    /// Code for each symbol as a list of bits, 0 = left, 1 = right. None if absent from the tree.
    codes: Vec<Option<Vec<u8>>>,
}

/// Priority queue entry used while building a tree from frequencies.
#[derive(Debug, PartialEq, Eq)]
struct Weighted {
    weight: u64,
    /// Lowest symbol value anywhere in this subtree, the tie breaker.
    lowest: u16,
    id: NodeId,
}

impl Ord for Weighted {
    /// Reversed so that BinaryHeap pops the lowest weight, then the lowest symbol, first.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .weight
            .cmp(&self.weight)
            .then_with(|| other.lowest.cmp(&self.lowest))
            .then_with(|| other.id.cmp(&self.id))
    }
}

impl PartialOrd for Weighted {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl HuffmanTree {
    /// Wrap an arena and its root, then derive the code for every leaf.
    /// The root must be an internal node.
    pub(crate) fn new(nodes: Vec<Node>, root: NodeId, symbol_limit: usize) -> Result<Self> {
        match nodes.get(root) {
            Some(Node::Internal(..)) => {}
            Some(Node::Leaf(_)) => return Err(HuffError::InsufficientAlphabet(1)),
            None => return Err(HuffError::InvalidTreeShape(root)),
        }
        let codes = build_codes(&nodes, root, symbol_limit)?;
        Ok(Self { nodes, root, codes })
    }

    /// Build the optimal tree for the frequencies. Ties are broken by the lowest symbol in each
    /// subtree so the shape depends only on the table, never on insertion order.
    pub fn from_frequencies(freqs: &FrequencyTable) -> Result<Self> {
        let counts = freqs.as_slice();
        let mut nodes: Vec<Node> = Vec::with_capacity(counts.len() * 2);
        let mut queue = BinaryHeap::with_capacity(counts.len());

        for (sym, &weight) in counts.iter().enumerate().filter(|&(_, &w)| w > 0) {
            nodes.push(Node::Leaf(sym as u16));
            queue.push(Weighted {
                weight,
                lowest: sym as u16,
                id: nodes.len() - 1,
            });
        }

        // A tree needs two leaves. Borrow the lowest unused symbols with a weight of zero.
        for (sym, _) in counts.iter().enumerate().filter(|&(_, &w)| w == 0) {
            if queue.len() >= 2 {
                break;
            }
            nodes.push(Node::Leaf(sym as u16));
            queue.push(Weighted {
                weight: 0,
                lowest: sym as u16,
                id: nodes.len() - 1,
            });
        }
        if queue.len() < 2 {
            return Err(HuffError::InsufficientAlphabet(queue.len()));
        }

        while queue.len() > 1 {
            let (x, y) = match (queue.pop(), queue.pop()) {
                (Some(x), Some(y)) => (x, y),
                _ => return Err(HuffError::InsufficientAlphabet(queue.len())),
            };
            nodes.push(Node::Internal(x.id, y.id));
            queue.push(Weighted {
                weight: x.weight + y.weight,
                lowest: x.lowest.min(y.lowest),
                id: nodes.len() - 1,
            });
        }
        let root = queue
            .pop()
            .ok_or(HuffError::EmptyOrMultipleRoots(0))?
            .id;
        trace!(
            "Built frequency tree with {} nodes, root weight {}.",
            nodes.len(),
            counts.iter().sum::<u64>()
        );
        Self::new(nodes, root, counts.len())
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Look up a node. Ids handed out by this tree are always valid.
    pub fn node(&self, id: NodeId) -> Result<Node> {
        self.nodes
            .get(id)
            .copied()
            .ok_or(HuffError::InvalidTreeShape(id))
    }

    /// The code for symbol, or None if the symbol has no leaf.
    pub fn code(&self, symbol: usize) -> Option<&[u8]> {
        self.codes.get(symbol).and_then(|c| c.as_deref())
    }

    /// Size of the alphabet this tree was built for.
    pub fn symbol_limit(&self) -> usize {
        self.codes.len()
    }

    /// Number of nodes in the arena.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Walk the tree once, recording the path to every leaf. Left is 0, right is 1.
fn build_codes(nodes: &[Node], root: NodeId, symbol_limit: usize) -> Result<Vec<Option<Vec<u8>>>> {
    let mut codes: Vec<Option<Vec<u8>>> = vec![None; symbol_limit];
    let mut stack: Vec<(NodeId, Vec<u8>)> = vec![(root, Vec::new())];

    while let Some((id, prefix)) = stack.pop() {
        // A path longer than the arena means the indices loop back on themselves.
        if prefix.len() > nodes.len() {
            return Err(HuffError::InvalidTreeShape(id));
        }
        match nodes.get(id) {
            Some(&Node::Internal(left, right)) => {
                let mut right_prefix = prefix.clone();
                right_prefix.push(1);
                stack.push((right, right_prefix));
                let mut left_prefix = prefix;
                left_prefix.push(0);
                stack.push((left, left_prefix));
            }
            Some(&Node::Leaf(sym)) => {
                let slot = codes
                    .get_mut(sym as usize)
                    .ok_or(HuffError::SymbolOutOfRange {
                        symbol: sym as usize,
                        limit: symbol_limit,
                    })?;
                if slot.is_some() {
                    return Err(HuffError::DuplicateSymbol(sym as usize));
                }
                *slot = Some(prefix);
            }
            None => return Err(HuffError::InvalidTreeShape(id)),
        }
    }
    Ok(codes)
}
