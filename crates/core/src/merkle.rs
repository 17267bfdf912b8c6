//! Merkle summaries over sequences of blocks.
//!
//! Leaves wrap chain blocks. Each parent carries a synthetic [`MerkleBlock`]
//! whose linkage hash is the digest of its children's linkage hashes
//! concatenated, so the root's linkage hash fingerprints the whole sequence.
//!
//! Odd levels are padded by duplicating the last node and marking the copy
//! as padding. Trees are built once and never updated; rebuild to refresh.

use crate::block::Block;
use crate::codec::digest_pair;
use crate::hash::Hash;
use crate::transaction::Transaction;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while building a merkle tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MerkleError {
    #[error("cannot build a merkle tree over an empty block sequence")]
    EmptyInput,
}

pub type Result<T> = std::result::Result<T, MerkleError>;

/// Block-shaped payload of a merkle node.
///
/// For leaves this mirrors the wrapped chain block. For parents it is
/// synthetic: no timestamp, and `previous_hash` holds the combined digest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MerkleBlock {
    /// Chain indices covered by this node, left to right.
    pub indices: Vec<u64>,
    /// Linkage hash. For a parent this is the aggregate fingerprint.
    pub previous_hash: Hash,
    /// Timestamp of the wrapped block; `None` for synthetic blocks.
    pub timestamp: Option<f64>,
    /// Entries covered by this node, left to right.
    pub transactions: Vec<Transaction>,
}

impl MerkleBlock {
    /// Wrap the hashed fields of a chain block.
    pub fn leaf(block: &Block) -> Self {
        Self {
            indices: vec![block.index],
            previous_hash: block.previous_hash.clone(),
            timestamp: Some(block.timestamp),
            transactions: block.transactions.clone(),
        }
    }

    /// Combine two children into a synthetic parent block.
    pub fn combine(left: &MerkleBlock, right: &MerkleBlock) -> Self {
        Self {
            indices: left.indices.iter().chain(&right.indices).copied().collect(),
            previous_hash: digest_pair(&left.previous_hash, &right.previous_hash),
            timestamp: None,
            transactions: left
                .transactions
                .iter()
                .chain(&right.transactions)
                .cloned()
                .collect(),
        }
    }

    /// Check whether this block was produced by combining children.
    pub fn is_synthetic(&self) -> bool {
        self.timestamp.is_none()
    }
}

/// A node in a merkle tree. Each node owns its children outright.
#[derive(Debug, Clone, PartialEq)]
pub struct MerkleNode {
    left: Option<Box<MerkleNode>>,
    right: Option<Box<MerkleNode>>,
    block: MerkleBlock,
    is_padding: bool,
}

impl MerkleNode {
    fn leaf(block: &Block) -> Self {
        Self {
            left: None,
            right: None,
            block: MerkleBlock::leaf(block),
            is_padding: false,
        }
    }

    fn parent(left: MerkleNode, right: MerkleNode) -> Self {
        let block = MerkleBlock::combine(&left.block, &right.block);
        Self {
            left: Some(Box::new(left)),
            right: Some(Box::new(right)),
            block,
            is_padding: false,
        }
    }

    fn padding_copy(&self) -> Self {
        Self {
            is_padding: true,
            ..self.clone()
        }
    }

    /// Left child, if any.
    pub fn left(&self) -> Option<&MerkleNode> {
        self.left.as_deref()
    }

    /// Right child, if any.
    pub fn right(&self) -> Option<&MerkleNode> {
        self.right.as_deref()
    }

    /// The block carried by this node.
    pub fn block(&self) -> &MerkleBlock {
        &self.block
    }

    /// Whether this node duplicates its left neighbour to even out a level.
    pub fn is_padding(&self) -> bool {
        self.is_padding
    }

    /// Whether this node wraps a chain block.
    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    /// The node's linkage hash.
    pub fn linkage_hash(&self) -> &Hash {
        &self.block.previous_hash
    }

    fn depth(&self) -> usize {
        let left = self.left().map_or(0, MerkleNode::depth);
        let right = self.right().map_or(0, MerkleNode::depth);
        1 + left.max(right)
    }
}

/// A binary merkle tree over a sequence of blocks.
#[derive(Debug, Clone, PartialEq)]
pub struct MerkleTree {
    root: MerkleNode,
}

impl MerkleTree {
    /// Build a tree over the given blocks, in order.
    pub fn build<'a, I>(blocks: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a Block>,
    {
        let mut leaves: Vec<MerkleNode> = blocks.into_iter().map(MerkleNode::leaf).collect();
        if leaves.is_empty() {
            return Err(MerkleError::EmptyInput);
        }

        pad_odd(&mut leaves);

        Ok(Self {
            root: build_level(leaves),
        })
    }

    /// The root node.
    pub fn root(&self) -> &MerkleNode {
        &self.root
    }

    /// The aggregate fingerprint, carried in the root's linkage slot.
    pub fn root_hash(&self) -> &Hash {
        self.root.linkage_hash()
    }

    /// Number of levels, counting the leaves.
    pub fn depth(&self) -> usize {
        self.root.depth()
    }

    /// Pre-order traversal yielding each node with its depth (root is 0).
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            stack: vec![(0, &self.root)],
        }
    }

    /// Leaf nodes left to right, padding included.
    pub fn leaves(&self) -> impl Iterator<Item = &MerkleNode> {
        self.walk()
            .map(|(_, node)| node)
            .filter(|node| node.is_leaf())
    }

    /// Number of leaf slots, padding included.
    pub fn leaf_count(&self) -> usize {
        self.leaves().count()
    }
}

/// Pre-order iterator over a [`MerkleTree`].
pub struct Walk<'a> {
    stack: Vec<(usize, &'a MerkleNode)>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = (usize, &'a MerkleNode);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, node) = self.stack.pop()?;
        if let Some(right) = node.right() {
            self.stack.push((depth + 1, right));
        }
        if let Some(left) = node.left() {
            self.stack.push((depth + 1, left));
        }
        Some((depth, node))
    }
}

fn pad_odd(nodes: &mut Vec<MerkleNode>) {
    if nodes.len() % 2 == 1 {
        if let Some(last) = nodes.last() {
            let copy = last.padding_copy();
            nodes.push(copy);
        }
    }
}

// `nodes` is never empty: the top level is padded to at least two, and
// every split of an even list of two or more leaves both halves non-empty.
fn build_level(mut nodes: Vec<MerkleNode>) -> MerkleNode {
    debug_assert!(!nodes.is_empty());
    if nodes.len() == 1 {
        if let Some(node) = nodes.pop() {
            return node;
        }
    }

    pad_odd(&mut nodes);
    let right_half = nodes.split_off(nodes.len() / 2);
    MerkleNode::parent(build_level(nodes), build_level(right_half))
}
