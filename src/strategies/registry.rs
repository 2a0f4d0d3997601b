use starknet_types_core::felt::Felt;
use std::sync::Arc;
use tracing::debug;

use super::StrategyStruct;
use crate::chain::ChainConfig;
use crate::codec::starknet_keccak;
use crate::constants::GET_STRATEGY_ENTRYPOINT;
use crate::errors::{CoreError, Result};
use crate::rpc::L2Provider;

/// Client for the L2 strategy registry contract.
#[derive(Clone)]
pub struct StrategyRegistry {
    address: Felt,
    l2: Arc<dyn L2Provider>,
}

impl StrategyRegistry {
    pub fn new(chain: &ChainConfig, l2: Arc<dyn L2Provider>) -> Self {
        Self { address: chain.starknet.strategy_registry, l2 }
    }

    /// Fetch a registered strategy by id.
    ///
    /// The contract returns `(address, params_len, ...params)`; an
    /// unregistered id comes back as a zero address.
    pub async fn get_strategy(&self, id: Felt) -> Result<StrategyStruct> {
        let selector = starknet_keccak(GET_STRATEGY_ENTRYPOINT.as_bytes());
        let output = self.l2.call_contract(self.address, selector, vec![id]).await?;
        let strategy = decode_strategy(&output)?;
        if strategy.address == Felt::ZERO {
            return Err(CoreError::UnknownStrategy(format!("{id:#x}")));
        }
        debug!(
            target: "prophouse::strategies",
            params = strategy.params.len(),
            "fetched strategy {id:#x} at {:#x}",
            strategy.address
        );
        Ok(strategy)
    }
}

fn decode_strategy(output: &[Felt]) -> Result<StrategyStruct> {
    let [address, len, params @ ..] = output else {
        return Err(CoreError::MalformedResponse(format!(
            "get_strategy returned {} felts",
            output.len()
        )));
    };
    if Felt::from(params.len() as u64) != *len {
        return Err(CoreError::MalformedResponse(format!(
            "get_strategy declared {len} params, returned {}",
            params.len()
        )));
    }
    Ok(StrategyStruct::new(*address, params.to_vec()))
}
