//! Balance-of strategies: power proven from a single L1 storage slot.
//!
//! Shared params:
//!
//! ```text
//!   ERC-20 / ERC-721 : [token, slot.low, slot.high, (multiplier)]
//!   ERC-1155         : [token, slot.low, slot.high, id.low, id.high, (multiplier)]
//! ```
//!
//! ERC-1155 uses its own strategy contract. The slot index is always taken
//! from the config; packed or non-standard layouts just pass a different one.

use alloy_primitives::{Address, B256, U256};
use async_trait::async_trait;
use starknet_types_core::felt::Felt;
use std::sync::Arc;
use tracing::debug;

use super::selectors::{balance_of_calldata, decode_uint256, erc1155_balance_of_calldata};
use super::{
    config_mismatch, BalanceAssetKind, BalanceOfConfig, GovernancePowerStrategy, StrategyHandler,
    StrategyKind, StrategyStruct,
};
use crate::blocks::BlockResolver;
use crate::chain::ChainConfig;
use crate::codec::{
    address_from_felt, felt_from_address, felt_from_u256, felt_to_u256, Uint256Split,
};
use crate::errors::{CoreError, Result};
use crate::proofs::{balance_of_slot_key, erc1155_balance_slot_key, StorageProofFetcher};
use crate::rpc::L1Provider;

/// Decoded shared params of a balance-of strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceOfParams {
    pub token: Address,
    pub slot_index: U256,
    /// Set for ERC-1155 only
    pub token_id: Option<U256>,
    pub multiplier: Option<U256>,
}

impl BalanceOfParams {
    /// Check an author-supplied config.
    pub fn from_config(config: &BalanceOfConfig) -> Result<Self> {
        match (config.asset_kind, config.token_id) {
            (BalanceAssetKind::Erc1155, None) => {
                return Err(CoreError::InvalidStrategyConfig(
                    "ERC1155 balance strategy needs a token id".into(),
                ))
            }
            (BalanceAssetKind::Erc20 | BalanceAssetKind::Erc721, Some(_)) => {
                return Err(CoreError::InvalidStrategyConfig(
                    "token id only applies to ERC1155 balance strategies".into(),
                ))
            }
            _ => {}
        }
        if config.multiplier == Some(U256::ZERO) {
            return Err(CoreError::InvalidStrategyConfig("multiplier must be non-zero".into()));
        }
        Ok(Self {
            token: config.token,
            slot_index: config.slot_index,
            token_id: config.token_id,
            multiplier: config.multiplier,
        })
    }

    /// Read params back from an on-chain strategy struct.
    pub fn decode(params: &[Felt], erc1155: bool) -> Result<Self> {
        let base = if erc1155 { 5 } else { 3 };
        if params.len() != base && params.len() != base + 1 {
            return Err(CoreError::InvalidStrategyConfig(format!(
                "balance strategy takes {base} or {} params, got {}",
                base + 1,
                params.len()
            )));
        }
        let token = address_from_felt(&params[0])?;
        let slot_index = Uint256Split::from_felts(&params[1], &params[2])?.to_u256();
        let token_id = if erc1155 {
            Some(Uint256Split::from_felts(&params[3], &params[4])?.to_u256())
        } else {
            None
        };
        let multiplier = params.get(base).map(felt_to_u256);
        if multiplier == Some(U256::ZERO) {
            return Err(CoreError::InvalidStrategyConfig("multiplier must be non-zero".into()));
        }
        Ok(Self { token, slot_index, token_id, multiplier })
    }

    pub fn to_felts(&self) -> Result<Vec<Felt>> {
        let mut params = Vec::with_capacity(6);
        params.push(felt_from_address(self.token));
        params.extend(Uint256Split::from_u256(self.slot_index).to_felts());
        if let Some(id) = self.token_id {
            params.extend(Uint256Split::from_u256(id).to_felts());
        }
        if let Some(multiplier) = self.multiplier {
            params.push(felt_from_u256(multiplier)?);
        }
        Ok(params)
    }

    /// Storage slot holding `account`'s balance.
    pub fn slot_key(&self, account: Address) -> B256 {
        match self.token_id {
            Some(id) => erc1155_balance_slot_key(account, id, self.slot_index),
            None => balance_of_slot_key(account, self.slot_index),
        }
    }

    pub fn multiplier_or_one(&self) -> U256 {
        self.multiplier.unwrap_or(U256::from(1))
    }
}

/// Handler for ERC-20, ERC-721 and ERC-1155 balance strategies.
pub struct BalanceOfHandler {
    address: Felt,
    erc1155_address: Felt,
    l1: Arc<dyn L1Provider>,
    fetcher: StorageProofFetcher,
    resolver: BlockResolver,
}

impl BalanceOfHandler {
    pub fn new(chain: &ChainConfig, l1: Arc<dyn L1Provider>, resolver: BlockResolver) -> Self {
        Self {
            address: chain.starknet.balance_of_strategy,
            erc1155_address: chain.starknet.balance_of_erc1155_strategy,
            fetcher: StorageProofFetcher::new(l1.clone()),
            l1,
            resolver,
        }
    }

    fn params(&self, strategy: &StrategyStruct) -> Result<BalanceOfParams> {
        if strategy.address == self.erc1155_address {
            BalanceOfParams::decode(&strategy.params, true)
        } else if strategy.address == self.address {
            BalanceOfParams::decode(&strategy.params, false)
        } else {
            Err(CoreError::UnknownStrategy(format!("{:#x}", strategy.address)))
        }
    }
}

#[async_trait]
impl StrategyHandler for BalanceOfHandler {
    fn kind(&self) -> StrategyKind {
        StrategyKind::BalanceOf
    }

    fn addresses(&self) -> Vec<Felt> {
        vec![self.address, self.erc1155_address]
    }

    async fn strategy_struct(&self, config: &GovernancePowerStrategy) -> Result<StrategyStruct> {
        let GovernancePowerStrategy::BalanceOf(config) = config else {
            return Err(config_mismatch(StrategyKind::BalanceOf, config));
        };
        let params = BalanceOfParams::from_config(config)?;
        let address = match config.asset_kind {
            BalanceAssetKind::Erc1155 => self.erc1155_address,
            BalanceAssetKind::Erc20 | BalanceAssetKind::Erc721 => self.address,
        };
        Ok(StrategyStruct::new(address, params.to_felts()?))
    }

    async fn user_params(
        &self,
        account: Address,
        timestamp: u64,
        strategy: &StrategyStruct,
    ) -> Result<Vec<Felt>> {
        let params = self.params(strategy)?;
        let block = self.resolver.resolve_block(timestamp).await?;
        let slot_key = params.slot_key(account);
        let proof = self.fetcher.fetch_proof(params.token, slot_key, block).await?;
        Ok(proof.to_user_params())
    }

    async fn power(
        &self,
        account: Address,
        timestamp: u64,
        strategy: &StrategyStruct,
    ) -> Result<U256> {
        let params = self.params(strategy)?;
        let block = self.resolver.resolve_block(timestamp).await?;
        let calldata = match params.token_id {
            Some(id) => erc1155_balance_of_calldata(account, id),
            None => balance_of_calldata(account),
        };
        let balance = decode_uint256(&self.l1.call(params.token, calldata, block).await?)?;
        debug!(
            target: "prophouse::strategies",
            %account,
            token = %params.token,
            block,
            %balance,
            "read token balance"
        );
        balance.checked_mul(params.multiplier_or_one()).ok_or(CoreError::AmountOverflow)
    }
}
