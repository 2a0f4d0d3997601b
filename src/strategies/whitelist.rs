//! Whitelist strategy.
//!
//! The shared param is a single felt: the Pedersen merkle root over every
//! member's `(address, power)` leaf. A voter proves membership with their
//! power, leaf index and sibling path. Member tables are kept locally, keyed
//! by root, so power lookups never touch the network.

use alloy_primitives::{Address, U256};
use async_trait::async_trait;
use starknet_types_core::felt::Felt;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use super::{
    config_mismatch, GovernancePowerStrategy, StrategyHandler, StrategyKind, StrategyStruct,
    WhitelistMember,
};
use crate::chain::ChainConfig;
use crate::claims::{MerkleTree, PedersenHasher};
use crate::codec::{felt_from_address, hash_on_elements, Uint256Split};
use crate::errors::{CoreError, Result};

/// Leaf for one member: `hash_on_elements([address, power.low, power.high])`.
pub fn member_leaf(member: &WhitelistMember) -> Felt {
    let [low, high] = Uint256Split::from_u256(member.voting_power).to_felts();
    hash_on_elements(&[felt_from_address(member.address), low, high])
}

/// Merkle tree over a member list, leaves sorted by hash.
#[derive(Debug, Clone)]
pub struct WhitelistTree {
    tree: MerkleTree<PedersenHasher>,
    /// address → (leaf index, power)
    members: HashMap<Address, (usize, U256)>,
}

impl WhitelistTree {
    pub fn new(members: &[WhitelistMember]) -> Result<Self> {
        if members.is_empty() {
            return Err(CoreError::EmptyWhitelist);
        }
        let mut seen = HashSet::with_capacity(members.len());
        for member in members {
            if !seen.insert(member.address) {
                return Err(CoreError::DuplicateWhitelistMember(member.address));
            }
        }

        let mut leaves: Vec<(Felt, &WhitelistMember)> =
            members.iter().map(|member| (member_leaf(member), member)).collect();
        leaves.sort_by(|a, b| a.0.cmp(&b.0));

        let index = leaves
            .iter()
            .enumerate()
            .map(|(i, (_, member))| (member.address, (i, member.voting_power)))
            .collect();
        let tree = MerkleTree::new(leaves.into_iter().map(|(leaf, _)| leaf).collect())?;

        Ok(Self { tree, members: index })
    }

    pub fn root(&self) -> Felt {
        self.tree.root()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Power of `account`; zero for non-members.
    pub fn power_of(&self, account: Address) -> U256 {
        self.members.get(&account).map_or(U256::ZERO, |(_, power)| *power)
    }

    /// `[power.low, power.high, leaf_index, proof_len, ...siblings]`.
    pub fn user_params(&self, account: Address) -> Result<Vec<Felt>> {
        let (index, power) =
            self.members.get(&account).copied().ok_or(CoreError::NotWhitelisted(account))?;
        let proof = self.tree.proof(index)?;

        let mut params = Vec::with_capacity(4 + proof.siblings.len());
        params.extend(Uint256Split::from_u256(power).to_felts());
        params.push(Felt::from(index as u64));
        params.push(Felt::from(proof.siblings.len() as u64));
        params.extend(proof.siblings);
        Ok(params)
    }
}

/// Handler for whitelist strategies.
pub struct WhitelistHandler {
    address: Felt,
    trees: RwLock<HashMap<Felt, Arc<WhitelistTree>>>,
}

impl WhitelistHandler {
    pub fn new(chain: &ChainConfig) -> Self {
        Self { address: chain.starknet.whitelist_strategy, trees: RwLock::new(HashMap::new()) }
    }

    /// Build and remember the tree for a member list.
    pub async fn register(&self, members: &[WhitelistMember]) -> Result<StrategyStruct> {
        let tree = WhitelistTree::new(members)?;
        let root = tree.root();
        debug!(
            target: "prophouse::strategies",
            members = tree.len(),
            "registered whitelist root {root:#x}"
        );
        self.trees.write().await.insert(root, Arc::new(tree));
        Ok(StrategyStruct::new(self.address, vec![root]))
    }

    async fn tree_for(&self, strategy: &StrategyStruct) -> Result<Arc<WhitelistTree>> {
        let [root] = strategy.params.as_slice() else {
            return Err(CoreError::InvalidStrategyConfig(format!(
                "whitelist strategy takes one param, got {}",
                strategy.params.len()
            )));
        };
        self.trees.read().await.get(root).cloned().ok_or(CoreError::UnknownWhitelist(*root))
    }
}

#[async_trait]
impl StrategyHandler for WhitelistHandler {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Whitelist
    }

    fn addresses(&self) -> Vec<Felt> {
        vec![self.address]
    }

    async fn strategy_struct(&self, config: &GovernancePowerStrategy) -> Result<StrategyStruct> {
        match config {
            GovernancePowerStrategy::Whitelist { members } => self.register(members).await,
            other => Err(config_mismatch(StrategyKind::Whitelist, other)),
        }
    }

    async fn user_params(
        &self,
        account: Address,
        _timestamp: u64,
        strategy: &StrategyStruct,
    ) -> Result<Vec<Felt>> {
        self.tree_for(strategy).await?.user_params(account)
    }

    async fn power(
        &self,
        account: Address,
        _timestamp: u64,
        strategy: &StrategyStruct,
    ) -> Result<U256> {
        Ok(self.tree_for(strategy).await?.power_of(account))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claims::{verify_proof, MerkleProof};

    fn member(byte: u8, power: u64) -> WhitelistMember {
        WhitelistMember { address: Address::repeat_byte(byte), voting_power: U256::from(power) }
    }

    fn members() -> Vec<WhitelistMember> {
        vec![member(0x11, 5), member(0x22, 1), member(0x33, 12), member(0x44, 7), member(0x55, 3)]
    }

    #[test]
    fn test_empty_whitelist_rejected() {
        assert!(matches!(WhitelistTree::new(&[]), Err(CoreError::EmptyWhitelist)));
    }

    #[test]
    fn test_duplicate_member_rejected_not_deduped() {
        let list = vec![member(0x11, 5), member(0x22, 1), member(0x11, 9)];
        assert!(matches!(
            WhitelistTree::new(&list),
            Err(CoreError::DuplicateWhitelistMember(addr)) if addr == Address::repeat_byte(0x11)
        ));
    }

    #[test]
    fn test_root_ignores_input_order() {
        let mut reversed = members();
        reversed.reverse();
        assert_eq!(
            WhitelistTree::new(&members()).unwrap().root(),
            WhitelistTree::new(&reversed).unwrap().root()
        );
    }

    #[test]
    fn test_user_params_prove_membership() {
        let tree = WhitelistTree::new(&members()).unwrap();
        for m in members() {
            let params = tree.user_params(m.address).unwrap();
            assert_eq!(params[0], Felt::from(m.voting_power.to::<u64>()));
            assert_eq!(params[1], Felt::ZERO);
            let index = tree.members[&m.address].0;
            let len = params.len() - 4;
            assert_eq!(params[2], Felt::from(index as u64));
            assert_eq!(params[3], Felt::from(len as u64));

            let siblings = params[4..].to_vec();
            let path_indices = (0..len).map(|level| ((index >> level) & 1) as u8).collect();
            let proof = MerkleProof { siblings, path_indices };
            assert!(verify_proof::<PedersenHasher>(member_leaf(&m), &proof, tree.root()));
        }
    }

    #[test]
    fn test_proof_fails_against_tree_with_other_power() {
        let tree = WhitelistTree::new(&[member(0xaa, 10), member(0xbb, 5)]).unwrap();
        let other = WhitelistTree::new(&[member(0xaa, 11), member(0xbb, 5)]).unwrap();
        let index = tree.members[&Address::repeat_byte(0xaa)].0;
        let proof = tree.tree.proof(index).unwrap();
        let leaf = member_leaf(&member(0xaa, 10));
        assert!(verify_proof::<PedersenHasher>(leaf, &proof, tree.root()));
        assert!(!verify_proof::<PedersenHasher>(leaf, &proof, other.root()));
    }

    #[test]
    fn test_non_member_has_zero_power_and_no_params() {
        let tree = WhitelistTree::new(&members()).unwrap();
        let outsider = Address::repeat_byte(0x99);
        assert_eq!(tree.power_of(outsider), U256::ZERO);
        assert!(matches!(tree.user_params(outsider), Err(CoreError::NotWhitelisted(_))));
    }

    #[test]
    fn test_single_member_has_empty_path() {
        let tree = WhitelistTree::new(&[member(0x11, 5)]).unwrap();
        assert_eq!(tree.root(), member_leaf(&member(0x11, 5)));
        let params = tree.user_params(Address::repeat_byte(0x11)).unwrap();
        assert_eq!(params, vec![Felt::from(5u64), Felt::ZERO, Felt::ZERO, Felt::ZERO]);
    }

    #[tokio::test]
    async fn test_handler_power_from_registered_table() {
        let chain = ChainConfig::dev();
        let handler = WhitelistHandler::new(&chain);
        let config = GovernancePowerStrategy::Whitelist { members: members() };
        let strategy = handler.strategy_struct(&config).await.unwrap();
        assert_eq!(strategy.address, chain.starknet.whitelist_strategy);
        assert_eq!(strategy.params.len(), 1);

        let power = handler.power(Address::repeat_byte(0x33), 0, &strategy).await.unwrap();
        assert_eq!(power, U256::from(12));
        let outsider = handler.power(Address::repeat_byte(0x99), 0, &strategy).await.unwrap();
        assert_eq!(outsider, U256::ZERO);
    }

    #[tokio::test]
    async fn test_strategy_params_are_the_root() {
        let handler = WhitelistHandler::new(&ChainConfig::dev());
        let config = GovernancePowerStrategy::Whitelist { members: members() };
        let params = handler.strategy_params(&config).await.unwrap();
        assert_eq!(params, vec![WhitelistTree::new(&members()).unwrap().root()]);
    }

    #[tokio::test]
    async fn test_unregistered_root_is_an_error() {
        let chain = ChainConfig::dev();
        let handler = WhitelistHandler::new(&chain);
        let address = chain.starknet.whitelist_strategy;
        let strategy = StrategyStruct::new(address, vec![Felt::from(2u64)]);
        assert!(matches!(
            handler.user_params(Address::ZERO, 0, &strategy).await,
            Err(CoreError::UnknownWhitelist(root)) if root == Felt::from(2u64)
        ));
    }
}
