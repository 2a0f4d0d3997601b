use alloy_primitives::U256;

/// Blocks subtracted from every resolved L1 block number.
///
/// The header relay records block N only once block N+1 exists, so the newest
/// block a verifier can prove against is one behind what the registries report.
/// Applied in both the timestamp-registry path and the header-store fallback.
pub const BLOCK_OFFSET: u64 = 1;

/// Bit width kept when a keccak digest has to fit inside a Starknet felt.
pub const FELT_MASK_BITS: usize = 250;

/// `2^250 - 1`: masks a 256-bit hash down to a value every felt can hold.
pub const FELT_MASK_250: U256 = U256::from_limbs([u64::MAX, u64::MAX, u64::MAX, (1 << 58) - 1]);

/// `2^251 - 256`: upper bound for Starknet storage addresses.
pub const ADDR_BOUND: U256 =
    U256::from_limbs([u64::MAX - 255, u64::MAX, u64::MAX, (1 << 59) - 1]);

/// Largest felt value, `P - 1` with `P = 2^251 + 17 * 2^192 + 1`.
pub const FELT_MAX: U256 = U256::from_limbs([0, 0, 0, (1 << 59) + 17]);

/// Minimum time left in the proposal period when a round is created (1 day).
///
/// Measured from creation time to the period's end; exactly this much is accepted.
pub const MIN_PROPOSAL_PERIOD_DURATION: u64 = 86_400;

/// Minimum vote period length (1 day). Exactly this much is accepted.
pub const MIN_VOTE_PERIOD_DURATION: u64 = 86_400;

/// Largest winner count a timed round accepts.
pub const MAX_WINNER_COUNT: u32 = 256;

/// Storage variable mapping `timestamp -> L1 block number` on the L2 registry.
pub const TIMESTAMP_TO_BLOCK_VAR: &str = "_timestamp_to_eth_block_number";

/// Storage variable holding the newest relayed L1 block in the header store.
pub const LATEST_L1_BLOCK_VAR: &str = "_latest_l1_block";

/// Entry point on the L2 strategy registry returning `(address, params_len, ...params)`.
pub const GET_STRATEGY_ENTRYPOINT: &str = "get_strategy";
