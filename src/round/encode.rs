//! Round config ABI encoding.
//!
//! Strategy params are flattened into one array the way the round factory
//! reads them back: `[n, len_0, .., len_{n-1}, params_0.., params_1.., ..]`.

use alloy_primitives::{Bytes, U256};
use alloy_sol_types::{sol, SolValue};
use futures_util::future::try_join_all;
use serde::Serialize;
use tracing::info;

use super::config::{InfiniteRoundConfig, TimedRoundConfig};
use super::validate::{validate, validate_infinite};
use crate::assets::{merge_and_sum_eth, AssetStruct};
use crate::codec::felt_to_u256;
use crate::errors::Result;
use crate::strategies::{GovernancePower, GovernancePowerStrategy, StrategyStruct};

sol! {
    /// Timed round config as the round factory decodes it.
    #[derive(Debug, PartialEq, Eq)]
    struct TimedRoundAbiConfig {
        AssetStruct[] awards;
        uint64 proposal_threshold;
        uint256[] proposing_strategies;
        uint256[] proposing_strategy_params_flat;
        uint256[] voting_strategies;
        uint256[] voting_strategy_params_flat;
        uint64 proposal_period_start_timestamp;
        uint64 proposal_period_duration;
        uint64 vote_period_duration;
        uint16 winner_count;
    }

    /// Infinite round config as the round factory decodes it.
    #[derive(Debug, PartialEq, Eq)]
    struct InfiniteRoundAbiConfig {
        uint64 start_timestamp;
        uint64 vote_period_duration;
        uint64 quorum_for;
        uint64 quorum_against;
        uint64 proposal_threshold;
        uint256[] proposing_strategies;
        uint256[] proposing_strategy_params_flat;
        uint256[] voting_strategies;
        uint256[] voting_strategy_params_flat;
    }
}

/// A validated round ready to be sent on-chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodedRound {
    /// ABI-encoded config struct
    pub config: Bytes,
    pub proposing_strategies: Vec<StrategyStruct>,
    pub voting_strategies: Vec<StrategyStruct>,
    /// Awards merged by asset id, to be deposited on creation
    #[serde(skip)]
    pub deposits: Vec<AssetStruct>,
    /// Native value that must accompany the creation transaction
    pub value: U256,
}

/// Strategy addresses and flattened params.
pub fn flatten_strategies(strategies: &[StrategyStruct]) -> (Vec<U256>, Vec<U256>) {
    let addresses = strategies.iter().map(|s| felt_to_u256(&s.address)).collect();

    let total: usize = strategies.iter().map(|s| s.params.len()).sum();
    let mut flat = Vec::with_capacity(1 + strategies.len() + total);
    flat.push(U256::from(strategies.len()));
    flat.extend(strategies.iter().map(|s| U256::from(s.params.len())));
    flat.extend(strategies.iter().flat_map(|s| s.params.iter().map(felt_to_u256)));
    (addresses, flat)
}

async fn resolve_all(
    power: &GovernancePower,
    configs: &[GovernancePowerStrategy],
) -> Result<Vec<StrategyStruct>> {
    try_join_all(configs.iter().map(|config| power.strategy_struct(config))).await
}

/// Validate a timed round, resolve its strategies and ABI-encode it.
pub async fn encode_timed_round(
    config: &TimedRoundConfig,
    now: u64,
    power: &GovernancePower,
) -> Result<EncodedRound> {
    validate(config, now)?;

    let proposing = resolve_all(power, &config.proposing_strategies).await?;
    let voting = resolve_all(power, &config.voting_strategies).await?;
    let (proposing_addresses, proposing_flat) = flatten_strategies(&proposing);
    let (voting_addresses, voting_flat) = flatten_strategies(&voting);
    let (deposits, value) = merge_and_sum_eth(&config.awards)?;

    let abi = TimedRoundAbiConfig {
        awards: config.awards.iter().map(|award| award.to_struct()).collect(),
        proposal_threshold: config.proposal_threshold,
        proposing_strategies: proposing_addresses,
        proposing_strategy_params_flat: proposing_flat,
        voting_strategies: voting_addresses,
        voting_strategy_params_flat: voting_flat,
        proposal_period_start_timestamp: config.proposal_period_start_timestamp,
        proposal_period_duration: config.proposal_period_duration,
        vote_period_duration: config.vote_period_duration,
        // validated to be at most 256
        winner_count: config.winner_count as u16,
    };
    info!(
        target: "prophouse::round",
        winners = config.winner_count,
        awards = config.awards.len(),
        %value,
        "encoded timed round"
    );

    Ok(EncodedRound {
        config: abi.abi_encode().into(),
        proposing_strategies: proposing,
        voting_strategies: voting,
        deposits,
        value,
    })
}

/// Validate an infinite round, resolve its strategies and ABI-encode it.
///
/// Infinite rounds are funded after creation, so nothing is deposited.
pub async fn encode_infinite_round(
    config: &InfiniteRoundConfig,
    power: &GovernancePower,
) -> Result<EncodedRound> {
    validate_infinite(config)?;

    let proposing = resolve_all(power, &config.proposing_strategies).await?;
    let voting = resolve_all(power, &config.voting_strategies).await?;
    let (proposing_addresses, proposing_flat) = flatten_strategies(&proposing);
    let (voting_addresses, voting_flat) = flatten_strategies(&voting);

    let abi = InfiniteRoundAbiConfig {
        start_timestamp: config.start_timestamp,
        vote_period_duration: config.vote_period_duration,
        quorum_for: config.quorum_for,
        quorum_against: config.quorum_against,
        proposal_threshold: config.proposal_threshold,
        proposing_strategies: proposing_addresses,
        proposing_strategy_params_flat: proposing_flat,
        voting_strategies: voting_addresses,
        voting_strategy_params_flat: voting_flat,
    };

    Ok(EncodedRound {
        config: abi.abi_encode().into(),
        proposing_strategies: proposing,
        voting_strategies: voting,
        deposits: vec![],
        value: U256::ZERO,
    })
}
