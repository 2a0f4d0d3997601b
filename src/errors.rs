use alloy_primitives::{Address, U256};
use starknet_types_core::felt::Felt;
use thiserror::Error;

use crate::round::RoundConfigError;

/// Convenience alias used throughout the crate.
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

/// Errors produced while resolving governance power or building claims.
#[derive(Debug, Error)]
pub enum CoreError {
    /// An address string that is not 20 hex bytes
    #[error("invalid address '{0}'")]
    InvalidAddress(String),

    /// An amount or id string that is not a 256-bit unsigned integer
    #[error("invalid uint256 '{0}'")]
    InvalidUint(String),

    /// Whitelist strategies need at least one member
    #[error("whitelist must contain at least one member")]
    EmptyWhitelist,

    /// The same address appears twice in a whitelist
    #[error("duplicate whitelist member {0}")]
    DuplicateWhitelistMember(Address),

    /// The account is not part of the whitelist it asked params for
    #[error("{0} is not a whitelist member")]
    NotWhitelisted(Address),

    /// No member table is known for a whitelist root
    #[error("no whitelist members registered for root {0:#x}")]
    UnknownWhitelist(Felt),

    /// A round configuration rule was violated
    #[error(transparent)]
    InvalidRoundConfig(#[from] RoundConfigError),

    /// RPC transport failure; safe to retry
    #[error("{provider} request failed: {message}")]
    Transport {
        /// Which provider the request went to
        provider: &'static str,
        /// Underlying client error
        message: String,
    },

    /// The node answered with data that does not fit the expected shape
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// A strategy type or address no handler is registered for
    #[error("unknown strategy {0}")]
    UnknownStrategy(String),

    /// A strategy config or param list a handler cannot use
    #[error("invalid strategy config: {0}")]
    InvalidStrategyConfig(String),

    /// Neither the timestamp registry nor the header store has a block yet
    #[error("no L1 block relayed for timestamp {timestamp}")]
    NoRelayedBlock {
        /// Timestamp the lookup was made for
        timestamp: u64,
    },

    /// A value does not fit in a Starknet field element
    #[error("value {0} does not fit in a felt")]
    FeltOverflow(U256),

    /// Summing or scaling amounts overflowed 256 bits
    #[error("amount overflow")]
    AmountOverflow,

    /// Claim trees need at least one leaf
    #[error("cannot build a merkle tree without leaves")]
    EmptyTree,

    /// Proof requested for a leaf the tree does not have
    #[error("leaf index {index} out of range for {len} leaves")]
    LeafIndexOutOfRange {
        /// Requested index
        index: usize,
        /// Number of leaves in the tree
        len: usize,
    },
}

impl CoreError {
    /// Build a transport error from any client error.
    pub fn transport(provider: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Transport { provider, message: err.to_string() }
    }

    /// Whether the caller may retry the same call unchanged.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_transport_errors_are_retryable() {
        assert!(CoreError::transport("l1", "timeout").is_retryable());
        assert!(!CoreError::EmptyWhitelist.is_retryable());
        assert!(!CoreError::InvalidAddress("0x12".into()).is_retryable());
        assert!(!CoreError::UnknownStrategy("0x1".into()).is_retryable());
    }

    #[test]
    fn test_unknown_strategy_message_names_it() {
        let err = CoreError::UnknownStrategy("0xdead".into());
        assert!(err.to_string().contains("0xdead"));
    }
}
