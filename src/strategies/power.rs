use alloy_primitives::{Address, U256};
use futures_util::future::try_join_all;
use starknet_types_core::felt::Felt;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use super::{GovernancePowerStrategy, StrategyHandlers, StrategyRegistry, StrategyStruct};
use crate::chain::ChainConfig;
use crate::errors::{CoreError, Result};
use crate::rpc::{L1Provider, L2Provider};

/// Entry point for resolving strategies and computing governance power.
///
/// Strategies resolved through [`Self::strategy_struct`] are remembered by
/// id; any other id is fetched from the L2 registry on first use. All methods
/// take `&self` and may run concurrently.
pub struct GovernancePower {
    handlers: StrategyHandlers,
    registry: StrategyRegistry,
    known: RwLock<HashMap<Felt, StrategyStruct>>,
}

impl GovernancePower {
    pub fn new(chain: &ChainConfig, l1: Arc<dyn L1Provider>, l2: Arc<dyn L2Provider>) -> Self {
        Self::with_handlers(
            StrategyHandlers::new(chain, l1, l2.clone()),
            StrategyRegistry::new(chain, l2),
        )
    }

    pub fn with_handlers(handlers: StrategyHandlers, registry: StrategyRegistry) -> Self {
        Self { handlers, registry, known: RwLock::new(HashMap::new()) }
    }

    pub fn handlers(&self) -> &StrategyHandlers {
        &self.handlers
    }

    /// Resolve an author-supplied strategy and remember it under its id.
    pub async fn strategy_struct(
        &self,
        config: &GovernancePowerStrategy,
    ) -> Result<StrategyStruct> {
        let strategy = self.handlers.for_config(config)?.strategy_struct(config).await?;
        self.known.write().await.insert(strategy.id(), strategy.clone());
        Ok(strategy)
    }

    /// Shared params for a strategy config.
    pub async fn strategy_params(&self, config: &GovernancePowerStrategy) -> Result<Vec<Felt>> {
        Ok(self.strategy_struct(config).await?.params)
    }

    /// Strategy registered under `id`.
    pub async fn strategy(&self, id: Felt) -> Result<StrategyStruct> {
        if let Some(strategy) = self.known.read().await.get(&id) {
            return Ok(strategy.clone());
        }
        let strategy = self.registry.get_strategy(id).await?;
        self.known.write().await.insert(id, strategy.clone());
        Ok(strategy)
    }

    /// Per-voter params for strategy `id`.
    pub async fn user_params(
        &self,
        account: Address,
        timestamp: u64,
        id: Felt,
    ) -> Result<Vec<Felt>> {
        let strategy = self.strategy(id).await?;
        let handler = self.handlers.for_address(strategy.address)?;
        handler.user_params(account, timestamp, &strategy).await
    }

    /// Power `account` holds under strategy `id` at `timestamp`.
    pub async fn power(&self, account: Address, timestamp: u64, id: Felt) -> Result<U256> {
        let strategy = self.strategy(id).await?;
        let handler = self.handlers.for_address(strategy.address)?;
        handler.power(account, timestamp, &strategy).await
    }

    /// Sum of power over several strategies, queried concurrently.
    pub async fn total_power(
        &self,
        account: Address,
        timestamp: u64,
        ids: &[Felt],
    ) -> Result<U256> {
        let powers =
            try_join_all(ids.iter().map(|id| self.power(account, timestamp, *id))).await?;
        let total = powers
            .into_iter()
            .try_fold(U256::ZERO, |acc, power| acc.checked_add(power))
            .ok_or(CoreError::AmountOverflow)?;
        debug!(
            target: "prophouse::strategies",
            %account,
            timestamp,
            strategies = ids.len(),
            %total,
            "total power"
        );
        Ok(total)
    }

    /// User params for each strategy, in the order of `ids`.
    pub async fn user_params_for_all(
        &self,
        account: Address,
        timestamp: u64,
        ids: &[Felt],
    ) -> Result<Vec<Vec<Felt>>> {
        try_join_all(ids.iter().map(|id| self.user_params(account, timestamp, *id))).await
    }
}
