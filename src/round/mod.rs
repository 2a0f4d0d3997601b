//! Round configuration.
//!
//! Validation runs before anything is resolved or sent; every rule the round
//! contract reverts on has its own [`RoundConfigError`] variant. A valid
//! config is then resolved and ABI-encoded by [`encode_timed_round`]. After
//! the vote, [`rank_winners`] and [`timed_round_claim_leaves`] produce the
//! leaves of the award claim tree.

pub mod config;
pub mod encode;
pub mod validate;
pub mod winners;

pub use config::{InfiniteRoundConfig, RoundConfig, TimedRoundConfig};
pub use encode::{
    encode_infinite_round, encode_timed_round, flatten_strategies, EncodedRound,
    InfiniteRoundAbiConfig, TimedRoundAbiConfig,
};
pub use validate::{validate, validate_infinite, validate_round, RoundConfigError};
pub use winners::{rank_winners, timed_round_claim_leaves, ProposalTally};
