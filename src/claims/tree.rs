use alloy_primitives::{Keccak256, B256};
use serde::Serialize;
use starknet_crypto::pedersen_hash;
use starknet_types_core::felt::Felt;
use std::fmt::Debug;

use crate::errors::{CoreError, Result};

/// Node hash of a binary merkle tree.
///
/// The hash is picked by whoever verifies the proof: Pedersen for Cairo
/// contracts, keccak for EVM contracts. A tree hashed with the other function
/// looks fine and never verifies.
pub trait MerkleHasher {
    type Node: Copy + Eq + Debug + Send + Sync;

    /// Padding node for odd-sized levels.
    const ZERO: Self::Node;

    fn hash_pair(left: &Self::Node, right: &Self::Node) -> Self::Node;
}

/// Pedersen pair hash, verified by Starknet contracts.
#[derive(Debug, Clone, Copy, Default)]
pub struct PedersenHasher;

impl MerkleHasher for PedersenHasher {
    type Node = Felt;
    const ZERO: Felt = Felt::ZERO;

    fn hash_pair(left: &Felt, right: &Felt) -> Felt {
        pedersen_hash(left, right)
    }
}

/// `keccak256(left ‖ right)`, verified by EVM contracts.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeccakHasher;

impl MerkleHasher for KeccakHasher {
    type Node = B256;
    const ZERO: B256 = B256::ZERO;

    fn hash_pair(left: &B256, right: &B256) -> B256 {
        let mut hasher = Keccak256::new();
        hasher.update(left.as_slice());
        hasher.update(right.as_slice());
        hasher.finalize()
    }
}

/// Inclusion proof ordered leaf → root.
///
/// `path_indices[i]` is 1 when the running node is the right child at level
/// `i`, i.e. the sibling is hashed on the left.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MerkleProof<N> {
    pub siblings: Vec<N>,
    pub path_indices: Vec<u8>,
}

impl<N> MerkleProof<N> {
    /// Leaf position encoded by the path bits.
    pub fn leaf_index(&self) -> usize {
        self.path_indices
            .iter()
            .enumerate()
            .fold(0, |acc, (level, bit)| acc | ((*bit as usize) << level))
    }
}

/// Immutable positional merkle tree.
///
/// Odd levels are padded with [`MerkleHasher::ZERO`]. A single leaf is its
/// own root with an empty proof.
#[derive(Debug, Clone)]
pub struct MerkleTree<H: MerkleHasher> {
    levels: Vec<Vec<H::Node>>,
    leaf_count: usize,
}

impl<H: MerkleHasher> MerkleTree<H> {
    /// Build the full tree. Same leaves in the same order give the same root.
    pub fn new(leaves: Vec<H::Node>) -> Result<Self> {
        if leaves.is_empty() {
            return Err(CoreError::EmptyTree);
        }
        let leaf_count = leaves.len();
        let mut levels = Vec::new();
        let mut level = leaves;

        while level.len() > 1 {
            if level.len() % 2 == 1 {
                level.push(H::ZERO);
            }
            let next: Vec<H::Node> =
                level.chunks(2).map(|pair| H::hash_pair(&pair[0], &pair[1])).collect();
            levels.push(std::mem::replace(&mut level, next));
        }
        levels.push(level);

        Ok(Self { levels, leaf_count })
    }

    pub fn root(&self) -> H::Node {
        self.levels[self.levels.len() - 1][0]
    }

    pub fn leaves(&self) -> &[H::Node] {
        &self.levels[0][..self.leaf_count]
    }

    pub fn len(&self) -> usize {
        self.leaf_count
    }

    pub fn is_empty(&self) -> bool {
        self.leaf_count == 0
    }

    /// Proof for the leaf at `index`.
    pub fn proof(&self, index: usize) -> Result<MerkleProof<H::Node>> {
        if index >= self.leaf_count {
            return Err(CoreError::LeafIndexOutOfRange { index, len: self.leaf_count });
        }
        let depth = self.levels.len() - 1;
        let mut siblings = Vec::with_capacity(depth);
        let mut path_indices = Vec::with_capacity(depth);
        let mut i = index;
        for level in &self.levels[..depth] {
            siblings.push(level[i ^ 1]);
            path_indices.push((i & 1) as u8);
            i >>= 1;
        }
        Ok(MerkleProof { siblings, path_indices })
    }
}

/// Fold a leaf up its proof.
pub fn compute_root<H: MerkleHasher>(leaf: H::Node, proof: &MerkleProof<H::Node>) -> H::Node {
    proof.siblings.iter().zip(&proof.path_indices).fold(leaf, |node, (sibling, bit)| {
        if *bit == 0 {
            H::hash_pair(&node, sibling)
        } else {
            H::hash_pair(sibling, &node)
        }
    })
}

/// Whether `proof` links `leaf` to `root`.
pub fn verify_proof<H: MerkleHasher>(
    leaf: H::Node,
    proof: &MerkleProof<H::Node>,
    root: H::Node,
) -> bool {
    proof.siblings.len() == proof.path_indices.len()
        && proof.path_indices.iter().all(|bit| *bit <= 1)
        && compute_root::<H>(leaf, proof) == root
}
