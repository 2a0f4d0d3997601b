//! Award claim trees.
//!
//! At finalization the L2 round commits to a merkle root over its winners.
//! Winners withdraw on the other chain by presenting a proof for their leaf,
//! so the tree built here has to match the contract's leaf encoding, pair
//! hash, ordering and padding exactly.

pub mod leaf;
pub mod tree;

pub use leaf::{ClaimInput, ClaimLeaf, LeafHasher};
pub use tree::{
    compute_root, verify_proof, KeccakHasher, MerkleHasher, MerkleProof, MerkleTree,
    PedersenHasher,
};

use crate::errors::Result;

/// Claim tree over a finalized round's winners, in contract order.
#[derive(Debug, Clone)]
pub struct ClaimTree<H: LeafHasher> {
    leaves: Vec<ClaimLeaf>,
    tree: MerkleTree<H>,
}

/// Tree verified by Starknet contracts.
pub type StarknetClaimTree = ClaimTree<PedersenHasher>;

/// Tree verified by EVM contracts.
pub type EthereumClaimTree = ClaimTree<KeccakHasher>;

impl<H: LeafHasher> ClaimTree<H> {
    pub fn build(leaves: Vec<ClaimLeaf>) -> Result<Self> {
        let hashes = leaves.iter().map(H::hash_leaf).collect::<Result<Vec<_>>>()?;
        let tree = MerkleTree::new(hashes)?;
        Ok(Self { leaves, tree })
    }

    pub fn root(&self) -> H::Node {
        self.tree.root()
    }

    pub fn leaves(&self) -> &[ClaimLeaf] {
        &self.leaves
    }

    pub fn proof(&self, index: usize) -> Result<MerkleProof<H::Node>> {
        self.tree.proof(index)
    }

    /// Proof for `leaf`, if it is in the tree.
    pub fn proof_for(&self, leaf: &ClaimLeaf) -> Option<MerkleProof<H::Node>> {
        let index = self.leaves.iter().position(|l| l == leaf)?;
        self.tree.proof(index).ok()
    }

    /// Check a claim the way the contract does.
    pub fn verify(leaf: &ClaimLeaf, proof: &MerkleProof<H::Node>, root: H::Node) -> Result<bool> {
        Ok(verify_proof::<H>(H::hash_leaf(leaf)?, proof, root))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::Asset;
    use crate::errors::CoreError;
    use alloy_primitives::{Address, U256};
    use proptest::prelude::*;

    fn leaves(n: u64) -> Vec<ClaimLeaf> {
        (1..=n)
            .map(|id| {
                ClaimLeaf::timed(id, Address::with_last_byte(id as u8), &Asset::eth(U256::from(id)))
            })
            .collect()
    }

    #[test]
    fn test_empty_round_has_no_tree() {
        assert!(matches!(StarknetClaimTree::build(vec![]), Err(CoreError::EmptyTree)));
    }

    #[test]
    fn test_every_winner_can_claim_on_both_chains() {
        let starknet = StarknetClaimTree::build(leaves(5)).unwrap();
        let ethereum = EthereumClaimTree::build(leaves(5)).unwrap();
        for (i, leaf) in leaves(5).iter().enumerate() {
            let proof = starknet.proof(i).unwrap();
            assert!(StarknetClaimTree::verify(leaf, &proof, starknet.root()).unwrap());
            let proof = ethereum.proof_for(leaf).unwrap();
            assert!(EthereumClaimTree::verify(leaf, &proof, ethereum.root()).unwrap());
        }
    }

    #[test]
    fn test_foreign_leaf_does_not_verify() {
        let tree = EthereumClaimTree::build(leaves(3)).unwrap();
        let proof = tree.proof(0).unwrap();
        let forged = ClaimLeaf::timed(1, Address::with_last_byte(1), &Asset::eth(U256::from(2)));
        assert!(!EthereumClaimTree::verify(&forged, &proof, tree.root()).unwrap());
        assert!(tree.proof_for(&forged).is_none());
    }

    #[test]
    fn test_leaf_order_changes_root() {
        let mut reversed = leaves(4);
        reversed.reverse();
        assert_ne!(
            EthereumClaimTree::build(leaves(4)).unwrap().root(),
            EthereumClaimTree::build(reversed).unwrap().root()
        );
    }

    proptest! {
        #[test]
        fn rebuilt_tree_has_same_root(n in 1u64..24) {
            let a = StarknetClaimTree::build(leaves(n)).unwrap();
            let b = StarknetClaimTree::build(leaves(n)).unwrap();
            prop_assert_eq!(a.root(), b.root());
        }
    }
}
