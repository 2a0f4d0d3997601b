use serde::{Deserialize, Serialize};
use starknet_types_core::felt::Felt;

/// Deployed L2 contracts the core talks to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StarknetContracts {
    /// Strategy registry answering `get_strategy(id)`
    pub strategy_registry: Felt,
    /// Contract storing `_timestamp_to_eth_block_number`
    pub timestamp_registry: Felt,
    /// L1 header store storing `_latest_l1_block`
    pub header_store: Felt,
    /// Vanilla (one account, one vote) strategy
    pub vanilla_strategy: Felt,
    /// Merkle whitelist strategy
    pub whitelist_strategy: Felt,
    /// ERC-20 / ERC-721 `balanceOf` single-slot proof strategy
    pub balance_of_strategy: Felt,
    /// ERC-1155 `balanceOf` single-slot proof strategy
    pub balance_of_erc1155_strategy: Felt,
}

impl StarknetContracts {
    /// Strategy contract addresses, one per handler family.
    pub fn strategy_addresses(&self) -> [Felt; 4] {
        [
            self.vanilla_strategy,
            self.whitelist_strategy,
            self.balance_of_strategy,
            self.balance_of_erc1155_strategy,
        ]
    }
}

/// Synthetic addresses for local development and tests.
pub(crate) fn dev_contracts() -> StarknetContracts {
    StarknetContracts {
        strategy_registry: Felt::from(0x5157_0000u64),
        timestamp_registry: Felt::from(0x7153_0000u64),
        header_store: Felt::from(0x4EAD_0000u64),
        vanilla_strategy: Felt::from(0x5157_0001u64),
        whitelist_strategy: Felt::from(0x5157_0002u64),
        balance_of_strategy: Felt::from(0x5157_0003u64),
        balance_of_erc1155_strategy: Felt::from(0x5157_0004u64),
    }
}
