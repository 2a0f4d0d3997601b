//! Chain configuration.
//!
//! Every component receives a [`ChainConfig`] at construction instead of
//! looking addresses up in a global table, so tests can point handlers at
//! synthetic contracts.

pub mod config;

pub use config::StarknetContracts;

use serde::{Deserialize, Serialize};
use starknet_types_core::felt::Felt;
use std::path::Path;
use thiserror::Error;

/// Default L1 chain id for the dev preset (Sepolia).
pub const DEV_L1_CHAIN_ID: u64 = 11_155_111;

/// Errors loading a chain configuration file.
#[derive(Debug, Error)]
pub enum ChainConfigError {
    #[error("failed to read chain config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse chain config: {0}")]
    Json(#[from] serde_json::Error),

    /// Two strategy families share one contract address
    #[error("strategy address {0:#x} is configured more than once")]
    DuplicateStrategyAddress(Felt),
}

/// Addresses and ids of one L1/L2 deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainConfig {
    /// L1 chain id proofs are fetched from
    pub l1_chain_id: u64,
    /// L2 contracts
    pub starknet: StarknetContracts,
}

impl ChainConfig {
    /// Local development preset with synthetic addresses.
    pub fn dev() -> Self {
        Self { l1_chain_id: DEV_L1_CHAIN_ID, starknet: config::dev_contracts() }
    }

    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> Result<Self, ChainConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON config file.
    pub fn load(path: &Path) -> Result<Self, ChainConfigError> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    /// Strategy contracts must be distinct so on-chain addresses map to one handler.
    pub fn validate(&self) -> Result<(), ChainConfigError> {
        let addresses = self.starknet.strategy_addresses();
        for (i, a) in addresses.iter().enumerate() {
            if addresses[i + 1..].contains(a) {
                return Err(ChainConfigError::DuplicateStrategyAddress(*a));
            }
        }
        Ok(())
    }
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self::dev()
    }
}
