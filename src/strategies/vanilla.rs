use alloy_primitives::{Address, U256};
use async_trait::async_trait;
use starknet_types_core::felt::Felt;

use super::{
    config_mismatch, GovernancePowerStrategy, StrategyHandler, StrategyKind, StrategyStruct,
};
use crate::chain::ChainConfig;
use crate::errors::Result;

/// One account, one vote. No params on either side.
#[derive(Debug, Clone)]
pub struct VanillaHandler {
    address: Felt,
}

impl VanillaHandler {
    pub fn new(chain: &ChainConfig) -> Self {
        Self { address: chain.starknet.vanilla_strategy }
    }
}

#[async_trait]
impl StrategyHandler for VanillaHandler {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Vanilla
    }

    fn addresses(&self) -> Vec<Felt> {
        vec![self.address]
    }

    async fn strategy_struct(&self, config: &GovernancePowerStrategy) -> Result<StrategyStruct> {
        match config {
            GovernancePowerStrategy::Vanilla => Ok(StrategyStruct::new(self.address, vec![])),
            other => Err(config_mismatch(StrategyKind::Vanilla, other)),
        }
    }

    async fn user_params(&self, _: Address, _: u64, _: &StrategyStruct) -> Result<Vec<Felt>> {
        Ok(vec![])
    }

    async fn power(&self, _: Address, _: u64, _: &StrategyStruct) -> Result<U256> {
        Ok(U256::from(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::CoreError;
    use alloy_primitives::address;

    #[tokio::test]
    async fn test_vanilla_is_one_vote_without_params() {
        let chain = ChainConfig::dev();
        let handler = VanillaHandler::new(&chain);
        let strategy = handler.strategy_struct(&GovernancePowerStrategy::Vanilla).await.unwrap();
        assert_eq!(strategy.address, chain.starknet.vanilla_strategy);
        assert!(strategy.params.is_empty());

        let account = address!("0000000000000000000000000000000000000abc");
        assert!(handler.user_params(account, 0, &strategy).await.unwrap().is_empty());
        assert_eq!(handler.power(account, 0, &strategy).await.unwrap(), U256::from(1));
        assert_eq!(handler.power(Address::ZERO, u64::MAX, &strategy).await.unwrap(), U256::from(1));
    }

    #[tokio::test]
    async fn test_strategy_params_are_empty() {
        let handler = VanillaHandler::new(&ChainConfig::dev());
        let params = handler.strategy_params(&GovernancePowerStrategy::Vanilla).await.unwrap();
        assert_eq!(params, Vec::<Felt>::new());
    }

    #[tokio::test]
    async fn test_rejects_other_configs() {
        let handler = VanillaHandler::new(&ChainConfig::dev());
        let config = GovernancePowerStrategy::Whitelist { members: vec![] };
        assert!(matches!(
            handler.strategy_struct(&config).await,
            Err(CoreError::InvalidStrategyConfig(_))
        ));
    }
}
