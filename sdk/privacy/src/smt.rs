//! Sparse Merkle Tree
//!
//! Append-only tree over minted commitments (and, reused by the
//! registry, over identity leaves).
//!
//! ```text
//!                    Root
//!                   /    \
//!                 H01    H23
//!                /  \   /   \
//!               H0  H1 H2   H3
//!               |   |   |    |
//!              C0  C1  C2   C3   (leaves)
//! ```
//!
//! Only non-empty nodes are stored; empty-subtree roots are precomputed
//! per level. Spenders prove membership against a recent root, so the
//! ledger keeps a bounded [`RootWindow`] instead of recomputing paths.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::OnceLock;

use ark_bn254::Fr;

use crate::poseidon::{self, bytes_to_field, field_to_bytes};

/// Tree depth (supports 2^32 leaves).
pub const TREE_DEPTH: usize = 32;

static EMPTY_ROOTS: OnceLock<Vec<[u8; 32]>> = OnceLock::new();

/// Hash two children into their parent node.
pub fn hash_pair(left: &[u8; 32], right: &[u8; 32]) -> [u8; 32] {
    field_to_bytes(poseidon::hash(&[bytes_to_field(left), bytes_to_field(right)]))
}

/// Root of the all-empty subtree at `level` (0 = leaf level).
pub fn empty_root(level: usize) -> [u8; 32] {
    let roots = EMPTY_ROOTS.get_or_init(|| {
        let mut roots = vec![field_to_bytes(poseidon::hash(&[Fr::from(0u64)]))];
        for level in 0..TREE_DEPTH {
            let prev = roots[level];
            roots.push(hash_pair(&prev, &prev));
        }
        roots
    });
    roots[level]
}

/// A path proving a leaf is included under some root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InclusionPath {
    /// Sibling hashes from leaf to root
    pub siblings: Vec<[u8; 32]>,
    /// Direction bits (false = node is the left child)
    pub path_bits: Vec<bool>,
    /// The leaf position
    pub position: u64,
}

impl InclusionPath {
    /// Recompute the root implied by `leaf` along this path.
    pub fn root_from(&self, leaf: &[u8; 32]) -> [u8; 32] {
        let mut current = *leaf;
        for (sibling, is_right) in self.siblings.iter().zip(self.path_bits.iter()) {
            current = if *is_right {
                hash_pair(sibling, &current)
            } else {
                hash_pair(&current, sibling)
            };
        }
        current
    }

    /// Verify that this path places `leaf` under `root`.
    pub fn verify(&self, leaf: &[u8; 32], root: &[u8; 32]) -> bool {
        self.root_from(leaf) == *root
    }
}

/// Append-only sparse Merkle tree with lazily stored nodes.
pub struct SparseMerkleTree {
    /// Non-empty nodes: (level, index) -> hash
    nodes: HashMap<(usize, u64), [u8; 32]>,
    /// Next available leaf position
    next_index: u64,
    /// Current root
    root: [u8; 32],
}

impl SparseMerkleTree {
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            next_index: 0,
            root: empty_root(TREE_DEPTH),
        }
    }

    pub fn root(&self) -> [u8; 32] {
        self.root
    }

    pub fn leaf_count(&self) -> u64 {
        self.next_index
    }

    /// Append a leaf, returning its position.
    pub fn insert(&mut self, leaf: [u8; 32]) -> u64 {
        let position = self.next_index;
        self.next_index += 1;

        self.nodes.insert((0, position), leaf);

        let mut index = position;
        let mut current = leaf;
        for level in 0..TREE_DEPTH {
            let is_right = index & 1 == 1;
            let sibling_index = if is_right { index - 1 } else { index + 1 };
            let sibling = self
                .nodes
                .get(&(level, sibling_index))
                .copied()
                .unwrap_or_else(|| empty_root(level));

            current = if is_right {
                hash_pair(&sibling, &current)
            } else {
                hash_pair(&current, &sibling)
            };
            index /= 2;
            self.nodes.insert((level + 1, index), current);
        }

        self.root = current;
        position
    }

    /// Inclusion path for the leaf at `position`.
    pub fn path(&self, position: u64) -> Option<InclusionPath> {
        if position >= self.next_index {
            return None;
        }

        let mut siblings = Vec::with_capacity(TREE_DEPTH);
        let mut path_bits = Vec::with_capacity(TREE_DEPTH);
        let mut index = position;

        for level in 0..TREE_DEPTH {
            let is_right = index & 1 == 1;
            path_bits.push(is_right);

            let sibling_index = if is_right { index - 1 } else { index + 1 };
            siblings.push(
                self.nodes
                    .get(&(level, sibling_index))
                    .copied()
                    .unwrap_or_else(|| empty_root(level)),
            );
            index /= 2;
        }

        Some(InclusionPath {
            siblings,
            path_bits,
            position,
        })
    }

    /// The leaf stored at `position`, if any.
    pub fn leaf(&self, position: u64) -> Option<[u8; 32]> {
        self.nodes.get(&(0, position)).copied()
    }
}

impl Default for SparseMerkleTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Bounded history of recognized roots.
///
/// A transfer may reference a slightly stale root (proof built just
/// before another insertion landed); anything outside the window is
/// rejected.
#[derive(Debug, Clone, Default)]
pub struct RootWindow {
    /// Recent roots, most recent first
    roots: Vec<[u8; 32]>,
    max_size: usize,
}

impl RootWindow {
    pub fn new(max_size: usize) -> Self {
        Self {
            roots: Vec::new(),
            max_size,
        }
    }

    /// Record a new root, evicting the oldest past `max_size`.
    pub fn push(&mut self, root: [u8; 32]) {
        self.roots.insert(0, root);
        if self.roots.len() > self.max_size {
            self.roots.pop();
        }
    }

    /// Whether `root` is current or recent enough to accept.
    pub fn recognizes(&self, root: &[u8; 32]) -> bool {
        self.roots.contains(root)
    }

    pub fn current(&self) -> Option<&[u8; 32]> {
        self.roots.first()
    }
}
