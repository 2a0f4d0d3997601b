use alloy_primitives::U256;
use thiserror::Error;

use super::config::{InfiniteRoundConfig, RoundConfig, TimedRoundConfig};
use crate::assets::Asset;
use crate::constants::{MAX_WINNER_COUNT, MIN_PROPOSAL_PERIOD_DURATION, MIN_VOTE_PERIOD_DURATION};

/// A round config the contracts would revert on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoundConfigError {
    #[error("proposal period ends in {remaining}s, must stay open at least {minimum}s")]
    ProposalPeriodTooShort { remaining: u64, minimum: u64 },

    #[error("vote period of {duration}s is shorter than {minimum}s")]
    VotePeriodTooShort { duration: u64, minimum: u64 },

    #[error("winner count {0} is outside [1, {}]", MAX_WINNER_COUNT)]
    WinnerCountOutOfRange(u32),

    #[error("{awards} awards for {winners} winners; expected 1 or {winners}")]
    AwardCountMismatch { awards: usize, winners: u32 },

    #[error("an ERC721 award cannot be split between {winners} winners")]
    Erc721NotSplittable { winners: u32 },

    #[error("award amount {amount} must split equally between {winners} winners")]
    AwardNotSplittable { amount: U256, winners: u32 },

    #[error("round needs at least one voting strategy")]
    NoVotingStrategies,

    #[error("quorum for must be greater than zero")]
    QuorumForZero,

    #[error("quorum against must be greater than zero")]
    QuorumAgainstZero,
}

/// Check a timed round against the rules the round contract enforces.
///
/// `now` is the unix time the round will be created at.
pub fn validate(config: &TimedRoundConfig, now: u64) -> Result<(), RoundConfigError> {
    let remaining = config.proposal_period_end().saturating_sub(now);
    if remaining < MIN_PROPOSAL_PERIOD_DURATION {
        return Err(RoundConfigError::ProposalPeriodTooShort {
            remaining,
            minimum: MIN_PROPOSAL_PERIOD_DURATION,
        });
    }
    check_vote_period(config.vote_period_duration)?;

    let winners = config.winner_count;
    if winners == 0 || winners > MAX_WINNER_COUNT {
        return Err(RoundConfigError::WinnerCountOutOfRange(winners));
    }
    match config.awards.as_slice() {
        [award] if winners > 1 => check_splittable(award, winners)?,
        [_] => {}
        awards if awards.len() == winners as usize => {}
        awards => {
            return Err(RoundConfigError::AwardCountMismatch { awards: awards.len(), winners })
        }
    }

    if config.voting_strategies.is_empty() {
        return Err(RoundConfigError::NoVotingStrategies);
    }
    Ok(())
}

/// Check an infinite round.
pub fn validate_infinite(config: &InfiniteRoundConfig) -> Result<(), RoundConfigError> {
    check_vote_period(config.vote_period_duration)?;
    if config.quorum_for == 0 {
        return Err(RoundConfigError::QuorumForZero);
    }
    if config.quorum_against == 0 {
        return Err(RoundConfigError::QuorumAgainstZero);
    }
    if config.voting_strategies.is_empty() {
        return Err(RoundConfigError::NoVotingStrategies);
    }
    Ok(())
}

/// Check either round type.
pub fn validate_round(config: &RoundConfig, now: u64) -> Result<(), RoundConfigError> {
    match config {
        RoundConfig::Timed(timed) => validate(timed, now),
        RoundConfig::Infinite(infinite) => validate_infinite(infinite),
    }
}

fn check_vote_period(duration: u64) -> Result<(), RoundConfigError> {
    if duration < MIN_VOTE_PERIOD_DURATION {
        return Err(RoundConfigError::VotePeriodTooShort {
            duration,
            minimum: MIN_VOTE_PERIOD_DURATION,
        });
    }
    Ok(())
}

pub(crate) fn check_splittable(award: &Asset, winners: u32) -> Result<(), RoundConfigError> {
    if let Asset::Erc721 { .. } = award {
        return Err(RoundConfigError::Erc721NotSplittable { winners });
    }
    let amount = award.amount();
    if amount % U256::from(winners) != U256::ZERO {
        return Err(RoundConfigError::AwardNotSplittable { amount, winners });
    }
    Ok(())
}
