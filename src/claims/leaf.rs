use alloy_primitives::{keccak256, Address, B256, U256};
use alloy_sol_types::SolValue;
use serde::Deserialize;
use starknet_types_core::felt::Felt;

use super::tree::{KeccakHasher, MerkleHasher, PedersenHasher};
use crate::assets::{asset_id, requested_assets_hash, Asset};
use crate::codec::{felt_from_address, felt_from_u256, hash_on_elements, Uint256Split};
use crate::errors::Result;

/// One winner's entitlement, hashed into the claim tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimLeaf {
    /// Timed rounds: one leaf per awarded asset.
    Timed { proposal_id: u64, proposer: Address, asset_id: B256, amount: U256 },
    /// Infinite rounds: one leaf per funded proposal.
    Infinite { proposal_id: u64, proposer: Address, requested_assets_hash: U256 },
}

impl ClaimLeaf {
    pub fn timed(proposal_id: u64, proposer: Address, asset: &Asset) -> Self {
        Self::Timed { proposal_id, proposer, asset_id: asset_id(asset), amount: asset.amount() }
    }

    pub fn infinite(proposal_id: u64, proposer: Address, requested: &[Asset]) -> Self {
        Self::Infinite {
            proposal_id,
            proposer,
            requested_assets_hash: requested_assets_hash(requested),
        }
    }

    pub fn proposal_id(&self) -> u64 {
        match self {
            Self::Timed { proposal_id, .. } | Self::Infinite { proposal_id, .. } => *proposal_id,
        }
    }

    /// Leaf as the Cairo round contract computes it.
    ///
    /// Fails only for a hand-built infinite leaf whose requested-assets hash
    /// was not masked to the field size.
    pub fn pedersen_hash(&self) -> Result<Felt> {
        match self {
            Self::Timed { proposal_id, proposer, asset_id, amount } => {
                let id = Uint256Split::from_u256(U256::from_be_bytes(asset_id.0));
                let amount = Uint256Split::from_u256(*amount);
                let [id_low, id_high] = id.to_felts();
                let [amount_low, amount_high] = amount.to_felts();
                Ok(hash_on_elements(&[
                    Felt::from(*proposal_id),
                    felt_from_address(*proposer),
                    id_low,
                    id_high,
                    amount_low,
                    amount_high,
                ]))
            }
            Self::Infinite { proposal_id, proposer, requested_assets_hash } => {
                Ok(hash_on_elements(&[
                    Felt::from(*proposal_id),
                    felt_from_address(*proposer),
                    felt_from_u256(*requested_assets_hash)?,
                ]))
            }
        }
    }

    /// Leaf as the EVM claim contract computes it: `keccak256(abi.encode(...))`.
    pub fn keccak_hash(&self) -> B256 {
        let encoded = match self {
            Self::Timed { proposal_id, proposer, asset_id, amount } => {
                (U256::from(*proposal_id), *proposer, *asset_id, *amount).abi_encode_params()
            }
            Self::Infinite { proposal_id, proposer, requested_assets_hash } => {
                (U256::from(*proposal_id), *proposer, *requested_assets_hash).abi_encode_params()
            }
        };
        keccak256(encoded)
    }
}

/// Leaf hashing for a [`MerkleHasher`].
pub trait LeafHasher: MerkleHasher {
    fn hash_leaf(leaf: &ClaimLeaf) -> Result<Self::Node>;
}

impl LeafHasher for PedersenHasher {
    fn hash_leaf(leaf: &ClaimLeaf) -> Result<Felt> {
        leaf.pedersen_hash()
    }
}

impl LeafHasher for KeccakHasher {
    fn hash_leaf(leaf: &ClaimLeaf) -> Result<B256> {
        Ok(leaf.keccak_hash())
    }
}

/// Claim entry as read from a winners file.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ClaimInput {
    #[serde(rename_all = "camelCase")]
    Timed { proposal_id: u64, proposer: Address, asset: Asset },
    #[serde(rename_all = "camelCase")]
    Infinite { proposal_id: u64, proposer: Address, requested_assets: Vec<Asset> },
}

impl From<ClaimInput> for ClaimLeaf {
    fn from(input: ClaimInput) -> Self {
        match input {
            ClaimInput::Timed { proposal_id, proposer, asset } => {
                ClaimLeaf::timed(proposal_id, proposer, &asset)
            }
            ClaimInput::Infinite { proposal_id, proposer, requested_assets } => {
                ClaimLeaf::infinite(proposal_id, proposer, &requested_assets)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::FELT_MASK_250;
    use alloy_primitives::address;

    const PROPOSER: Address = address!("0000000000000000000000000000000000000abc");

    fn one_eth() -> Asset {
        Asset::eth(U256::from(10).pow(U256::from(18)))
    }

    #[test]
    fn test_timed_keccak_leaf_matches_abi_layout() {
        let leaf = ClaimLeaf::timed(1, PROPOSER, &one_eth());
        let mut expected = Vec::with_capacity(128);
        expected.extend_from_slice(&U256::from(1).to_be_bytes::<32>());
        expected.extend_from_slice(&[0u8; 12]);
        expected.extend_from_slice(PROPOSER.as_slice());
        expected.extend_from_slice(asset_id(&one_eth()).as_slice());
        expected.extend_from_slice(&one_eth().amount().to_be_bytes::<32>());
        assert_eq!(leaf.keccak_hash(), keccak256(expected));
    }

    #[test]
    fn test_timed_pedersen_leaf_splits_id_and_amount() {
        let leaf = ClaimLeaf::timed(1, PROPOSER, &one_eth());
        let id = Uint256Split::from_u256(U256::from_be_bytes(asset_id(&one_eth()).0));
        let expected = hash_on_elements(&[
            Felt::ONE,
            felt_from_address(PROPOSER),
            Felt::from(id.low),
            Felt::from(id.high),
            Felt::from(10u128.pow(18)),
            Felt::ZERO,
        ]);
        assert_eq!(leaf.pedersen_hash().unwrap(), expected);
    }

    #[test]
    fn test_field_changes_change_leaf() {
        let base = ClaimLeaf::timed(1, PROPOSER, &one_eth());
        let other_id = ClaimLeaf::timed(2, PROPOSER, &one_eth());
        let other_amount = ClaimLeaf::timed(1, PROPOSER, &Asset::eth(U256::from(1)));
        assert_ne!(base.keccak_hash(), other_id.keccak_hash());
        assert_ne!(base.keccak_hash(), other_amount.keccak_hash());
        assert_ne!(base.pedersen_hash().unwrap(), other_amount.pedersen_hash().unwrap());
    }

    #[test]
    fn test_infinite_leaf_uses_masked_hash() {
        let leaf = ClaimLeaf::infinite(4, PROPOSER, &[one_eth()]);
        let ClaimLeaf::Infinite { requested_assets_hash, .. } = &leaf else {
            panic!("expected infinite leaf");
        };
        assert_eq!(*requested_assets_hash & !FELT_MASK_250, U256::ZERO);
        assert!(leaf.pedersen_hash().is_ok());
    }

    #[test]
    fn test_unmasked_infinite_leaf_rejected_on_pedersen_side() {
        let leaf = ClaimLeaf::Infinite {
            proposal_id: 1,
            proposer: PROPOSER,
            requested_assets_hash: U256::MAX,
        };
        assert!(leaf.pedersen_hash().is_err());
    }

    #[test]
    fn test_claim_input_json() {
        let timed: ClaimInput = serde_json::from_str(
            r#"{"proposalId": 1, "proposer": "0x0000000000000000000000000000000000000abc",
                "asset": {"assetType": "ETH", "amount": "1000000000000000000"}}"#,
        )
        .unwrap();
        assert_eq!(ClaimLeaf::from(timed), ClaimLeaf::timed(1, PROPOSER, &one_eth()));

        let infinite: ClaimInput = serde_json::from_str(
            r#"{"proposalId": 2, "proposer": "0x0000000000000000000000000000000000000abc",
                "requestedAssets": [{"assetType": "ETH", "amount": "5"}]}"#,
        )
        .unwrap();
        assert_eq!(ClaimLeaf::from(infinite).proposal_id(), 2);
    }
}
