use serde::Deserialize;

use crate::assets::Asset;
use crate::strategies::GovernancePowerStrategy;

/// Timed funding round as written by its author.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimedRoundConfig {
    /// One award per winner, or a single award split evenly
    pub awards: Vec<Asset>,
    pub proposal_period_start_timestamp: u64,
    pub proposal_period_duration: u64,
    pub vote_period_duration: u64,
    pub winner_count: u32,
    #[serde(default)]
    pub proposal_threshold: u64,
    #[serde(default)]
    pub proposing_strategies: Vec<GovernancePowerStrategy>,
    pub voting_strategies: Vec<GovernancePowerStrategy>,
}

impl TimedRoundConfig {
    pub fn proposal_period_end(&self) -> u64 {
        self.proposal_period_start_timestamp.saturating_add(self.proposal_period_duration)
    }

    pub fn vote_period_end(&self) -> u64 {
        self.proposal_period_end().saturating_add(self.vote_period_duration)
    }
}

/// Infinite round: proposals are funded as soon as they reach quorum.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InfiniteRoundConfig {
    pub start_timestamp: u64,
    pub vote_period_duration: u64,
    pub quorum_for: u64,
    pub quorum_against: u64,
    #[serde(default)]
    pub proposal_threshold: u64,
    #[serde(default)]
    pub proposing_strategies: Vec<GovernancePowerStrategy>,
    pub voting_strategies: Vec<GovernancePowerStrategy>,
}

/// Either round type, tagged by `roundType` in JSON.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "roundType", rename_all = "camelCase")]
pub enum RoundConfig {
    Timed(TimedRoundConfig),
    Infinite(InfiniteRoundConfig),
}
