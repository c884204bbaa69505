//! Canonical code lengths.
//!
//! The code length table is the only description of a tree that is ever written out. A table is
//! turned back into a tree with one fixed rule: working up from the deepest level, the leaves of
//! each level (in symbol order) come first, followed by the parents formed by pairing the
//! previous level's nodes in order. Any two parties holding the same table therefore build the
//! same tree, regardless of how the original frequency tree was shaped.
//!

use log::trace;

use super::huffman::{HuffmanTree, Node, NodeId};
use crate::error::{HuffError, Result};

/// Code length (tree depth) for every symbol of the alphabet. 0 means the symbol has no code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeLengths {
    lens: Vec<u32>,
}

impl CodeLengths {
    /// Accept a raw table, typically one read from a file header. The table must describe a
    /// full binary tree with an internal root, otherwise it is rejected.
    pub fn new(lens: Vec<u32>) -> Result<Self> {
        validate(&lens)?;
        Ok(Self { lens })
    }

    /// Record the depth of every leaf of the tree.
    pub fn from_tree(tree: &HuffmanTree, symbol_limit: usize) -> Result<Self> {
        if symbol_limit < 2 {
            return Err(HuffError::InsufficientAlphabet(symbol_limit));
        }
        let mut lens = vec![0_u32; symbol_limit];
        let mut seen = vec![false; symbol_limit];
        let mut stack: Vec<(NodeId, u32)> = vec![(tree.root(), 0)];

        while let Some((id, depth)) = stack.pop() {
            if depth as usize > tree.len() {
                return Err(HuffError::InvalidTreeShape(id));
            }
            match tree.node(id)? {
                Node::Internal(left, right) => {
                    stack.push((right, depth + 1));
                    stack.push((left, depth + 1));
                }
                Node::Leaf(sym) => {
                    let sym = sym as usize;
                    if sym >= symbol_limit {
                        return Err(HuffError::SymbolOutOfRange {
                            symbol: sym,
                            limit: symbol_limit,
                        });
                    }
                    if seen[sym] {
                        return Err(HuffError::DuplicateSymbol(sym));
                    }
                    seen[sym] = true;
                    lens[sym] = depth;
                }
            }
        }
        Ok(Self { lens })
    }

    /// Code length for symbol. Symbols outside the table are an error.
    pub fn get(&self, symbol: usize) -> Result<u32> {
        self.lens
            .get(symbol)
            .copied()
            .ok_or(HuffError::SymbolOutOfRange {
                symbol,
                limit: self.lens.len(),
            })
    }

    /// Number of symbols covered by the table.
    pub fn len(&self) -> usize {
        self.lens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lens.is_empty()
    }

    pub fn max_len(&self) -> u32 {
        self.lens.iter().copied().max().unwrap_or(0)
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.lens
    }

    /// Rebuild the canonical tree for this table.
    pub fn to_tree(&self) -> Result<HuffmanTree> {
        let mut arena: Vec<Node> = Vec::with_capacity(self.lens.len() * 2);
        // Nodes carried up from the level below, in generation order.
        let mut level: Vec<NodeId> = Vec::new();

        for depth in (0..=self.max_len()).rev() {
            if level.len() % 2 != 0 {
                return Err(HuffError::InvalidTreeStructure(depth as usize + 1));
            }
            let mut next: Vec<NodeId> = Vec::with_capacity(level.len() / 2 + 8);

            // Leaves for this level first, in symbol order...
            if depth > 0 {
                for (sym, _) in self.lens.iter().enumerate().filter(|&(_, &l)| l == depth) {
                    arena.push(Node::Leaf(sym as u16));
                    next.push(arena.len() - 1);
                }
            }

            // ...then parents for the level below, paired strictly in order.
            for pair in level.chunks_exact(2) {
                arena.push(Node::Internal(pair[0], pair[1]));
                next.push(arena.len() - 1);
            }
            level = next;
        }

        if level.len() != 1 {
            return Err(HuffError::EmptyOrMultipleRoots(level.len()));
        }
        let root = level[0];
        if let Node::Leaf(_) = arena[root] {
            return Err(HuffError::EmptyOrMultipleRoots(1));
        }
        trace!(
            "Rebuilt canonical tree: {} nodes, max code length {}.",
            arena.len(),
            self.max_len()
        );
        HuffmanTree::new(arena, root, self.lens.len())
    }
}

/// Check that the lengths describe a complete prefix code with an internal root.
///
/// Working from the deepest level upward, the node count at a level must be even before it can
/// be folded into parents one level up. Reaching level 0 with anything other than a single node
/// means the Kraft sum is not exactly 1.
fn validate(lens: &[u32]) -> Result<()> {
    let mut sorted: Vec<u32> = lens.iter().copied().filter(|&l| l > 0).collect();
    sorted.sort_unstable_by(|a, b| b.cmp(a));

    let mut current_level = match sorted.first() {
        Some(&deepest) => deepest,
        None => {
            return Err(HuffError::InvalidCanonicalLengths(
                "no symbol has a code".to_string(),
            ))
        }
    };
    let mut nodes_at_level: u64 = 0;

    for &len in &sorted {
        while len < current_level {
            if nodes_at_level % 2 != 0 {
                return Err(HuffError::InvalidCanonicalLengths(format!(
                    "odd node count {} at depth {}",
                    nodes_at_level, current_level
                )));
            }
            nodes_at_level /= 2;
            current_level -= 1;
        }
        nodes_at_level += 1;
    }

    // Fold what is left up to the root.
    while current_level > 0 {
        if nodes_at_level % 2 != 0 {
            return Err(HuffError::InvalidCanonicalLengths(format!(
                "odd node count {} at depth {}",
                nodes_at_level, current_level
            )));
        }
        nodes_at_level /= 2;
        current_level -= 1;
    }
    if nodes_at_level != 1 {
        return Err(HuffError::InvalidCanonicalLengths(format!(
            "lengths describe {} roots",
            nodes_at_level
        )));
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::tools::freq_count::FrequencyTable;
    use crate::{EOF_SYMBOL, SYMBOL_LIMIT};

    fn lens_with(pairs: &[(usize, u32)]) -> Vec<u32> {
        let mut lens = vec![0; SYMBOL_LIMIT];
        pairs.iter().for_each(|&(s, l)| lens[s] = l);
        lens
    }

    #[test]
    fn aaab_lengths() {
        let mut data = "aaab".as_bytes();
        let freqs = FrequencyTable::from_reader(&mut data).unwrap();
        let tree = HuffmanTree::from_frequencies(&freqs).unwrap();
        let lens = CodeLengths::from_tree(&tree, SYMBOL_LIMIT).unwrap();
        assert_eq!(lens.get('a' as usize).unwrap(), 1);
        assert_eq!(lens.get('b' as usize).unwrap(), 2);
        assert_eq!(lens.get(EOF_SYMBOL as usize).unwrap(), 2);
        assert_eq!(lens.as_slice().iter().filter(|&&l| l > 0).count(), 3);
        assert_eq!(lens.max_len(), 2);
    }

    #[test]
    fn canonical_tree_orders_leaves_before_parents() {
        let lens = CodeLengths::new(lens_with(&[
            ('a' as usize, 1),
            ('b' as usize, 2),
            (EOF_SYMBOL as usize, 2),
        ]))
        .unwrap();
        let tree = lens.to_tree().unwrap();
        assert_eq!(tree.code('a' as usize), Some([0_u8].as_slice()));
        assert_eq!(tree.code('b' as usize), Some([1_u8, 0].as_slice()));
        assert_eq!(tree.code(EOF_SYMBOL as usize), Some([1_u8, 1].as_slice()));
    }

    #[test]
    fn length_round_trip_is_idempotent() {
        let counts: Vec<u64> = (0..SYMBOL_LIMIT as u64).map(|s| (s * 7919) % 101).collect();
        let freqs = FrequencyTable::from_counts(counts);
        let tree = HuffmanTree::from_frequencies(&freqs).unwrap();
        let first = CodeLengths::from_tree(&tree, SYMBOL_LIMIT).unwrap();
        let canonical = first.to_tree().unwrap();
        let second = CodeLengths::from_tree(&canonical, SYMBOL_LIMIT).unwrap();
        assert_eq!(first, second);
        assert_eq!(CodeLengths::new(first.as_slice().to_vec()).unwrap(), first);
    }

    #[test]
    fn three_symbols_of_length_one_rejected() {
        let raw = lens_with(&[(0, 1), (1, 1), (2, 1)]);
        assert!(matches!(
            CodeLengths::new(raw),
            Err(HuffError::InvalidCanonicalLengths(_))
        ));
    }

    #[test]
    fn odd_count_below_shallower_level_rejected() {
        let raw = lens_with(&[(0, 1), (1, 2), (2, 3)]);
        assert!(matches!(
            CodeLengths::new(raw),
            Err(HuffError::InvalidCanonicalLengths(_))
        ));
    }

    #[test]
    fn incomplete_code_rejected() {
        // Kraft sum of 3/4.
        let raw = lens_with(&[(0, 1), (1, 2)]);
        assert!(CodeLengths::new(raw).is_err());
    }

    #[test]
    fn single_code_and_empty_tables_rejected() {
        assert!(CodeLengths::new(lens_with(&[(5, 1)])).is_err());
        assert!(CodeLengths::new(vec![0; SYMBOL_LIMIT]).is_err());
    }

    #[test]
    fn unchecked_odd_level_is_invalid_structure() {
        let lens = CodeLengths {
            lens: lens_with(&[(0, 2), (1, 2), (2, 2)]),
        };
        assert!(matches!(
            lens.to_tree(),
            Err(HuffError::InvalidTreeStructure(2))
        ));
    }

    #[test]
    fn unchecked_incomplete_table_has_multiple_roots() {
        let lens = CodeLengths {
            lens: lens_with(&[(0, 1)]),
        };
        assert!(matches!(
            lens.to_tree(),
            Err(HuffError::InvalidTreeStructure(1))
        ));
        let lens = CodeLengths {
            lens: vec![0; SYMBOL_LIMIT],
        };
        assert!(matches!(
            lens.to_tree(),
            Err(HuffError::EmptyOrMultipleRoots(0))
        ));
    }

    #[test]
    fn duplicate_and_out_of_range_leaves() {
        let nodes = vec![Node::Leaf(1), Node::Leaf(1), Node::Internal(0, 1)];
        let tree = HuffmanTree::new(nodes, 2, 4);
        assert!(matches!(tree, Err(HuffError::DuplicateSymbol(1))));

        let tree = CodeLengths::new(lens_with(&[(200, 1), (201, 1)]))
            .unwrap()
            .to_tree()
            .unwrap();
        assert!(matches!(
            CodeLengths::from_tree(&tree, 100),
            Err(HuffError::SymbolOutOfRange { symbol: 200, limit: 100 })
        ));
        assert!(matches!(
            CodeLengths::from_tree(&tree, 1),
            Err(HuffError::InsufficientAlphabet(1))
        ));
    }
}
