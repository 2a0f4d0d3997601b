//! Timestamp → L1 block resolution.
//!
//! Proof-based strategies prove state at the L1 block the L2 has recorded for
//! a round's snapshot timestamp:
//!
//! 1. read `_timestamp_to_eth_block_number[timestamp]` from the registry;
//! 2. if it is still zero, fall back to `_latest_l1_block` of the header store;
//! 3. subtract [`BLOCK_OFFSET`] from whichever value was found.
//!
//! The offset is applied on both paths. Skipping it on one of them yields
//! proofs one block ahead of what the verifier accepts.

use starknet_types_core::felt::Felt;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::chain::ChainConfig;
use crate::codec::storage_var_address;
use crate::constants::{BLOCK_OFFSET, LATEST_L1_BLOCK_VAR, TIMESTAMP_TO_BLOCK_VAR};
use crate::errors::{CoreError, Result};
use crate::rpc::L2Provider;

/// Which source a resolved block came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockSource {
    /// The timestamp registry had an entry
    TimestampRegistry,
    /// The registry was empty and the header store's latest block was used
    HeaderStore,
}

/// Result of a block lookup, already offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedBlock {
    pub number: u64,
    pub source: BlockSource,
}

/// Resolves round timestamps to provable L1 block numbers.
#[derive(Clone)]
pub struct BlockResolver {
    l2: Arc<dyn L2Provider>,
    timestamp_registry: Felt,
    header_store: Felt,
}

impl BlockResolver {
    pub fn new(chain: &ChainConfig, l2: Arc<dyn L2Provider>) -> Self {
        Self {
            l2,
            timestamp_registry: chain.starknet.timestamp_registry,
            header_store: chain.starknet.header_store,
        }
    }

    /// L1 block number to prove against for `timestamp`.
    pub async fn resolve_block(&self, timestamp: u64) -> Result<u64> {
        self.resolve(timestamp).await.map(|block| block.number)
    }

    /// Like [`Self::resolve_block`] but also reports where the block came from.
    pub async fn resolve(&self, timestamp: u64) -> Result<ResolvedBlock> {
        let key = storage_var_address(TIMESTAMP_TO_BLOCK_VAR, &[Felt::from(timestamp)]);
        let mapped = read_block(self.l2.get_storage_at(self.timestamp_registry, key).await?)?;

        let (raw, source) = if mapped != 0 {
            (mapped, BlockSource::TimestampRegistry)
        } else {
            let key = storage_var_address(LATEST_L1_BLOCK_VAR, &[]);
            let latest = read_block(self.l2.get_storage_at(self.header_store, key).await?)?;
            warn!(
                target: "prophouse::blocks",
                timestamp,
                latest,
                "timestamp not yet relayed, falling back to header store"
            );
            (latest, BlockSource::HeaderStore)
        };

        let number =
            raw.checked_sub(BLOCK_OFFSET).ok_or(CoreError::NoRelayedBlock { timestamp })?;
        debug!(target: "prophouse::blocks", timestamp, number, ?source, "resolved block");
        Ok(ResolvedBlock { number, source })
    }
}

fn read_block(value: Felt) -> Result<u64> {
    let bytes = value.to_bytes_be();
    if bytes[..24].iter().any(|b| *b != 0) {
        return Err(CoreError::MalformedResponse(format!(
            "block number {value:#x} exceeds u64"
        )));
    }
    let mut word = [0u8; 8];
    word.copy_from_slice(&bytes[24..]);
    Ok(u64::from_be_bytes(word))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpc::mock::MockL2;

    const TS: u64 = 1_700_000_000;

    fn registry_key(ts: u64) -> Felt {
        storage_var_address(TIMESTAMP_TO_BLOCK_VAR, &[Felt::from(ts)])
    }

    fn latest_key() -> Felt {
        storage_var_address(LATEST_L1_BLOCK_VAR, &[])
    }

    fn resolver(l2: MockL2) -> BlockResolver {
        BlockResolver::new(&ChainConfig::dev(), Arc::new(l2))
    }

    #[tokio::test]
    async fn test_registry_entry_minus_offset() {
        let chain = ChainConfig::dev();
        let registry = chain.starknet.timestamp_registry;
        let l2 = MockL2::new()
            .with_storage(registry, registry_key(TS), Felt::from(18_000_000u64))
            .with_storage(chain.starknet.header_store, latest_key(), Felt::from(18_000_500u64));

        let block = resolver(l2).resolve(TS).await.unwrap();
        assert_eq!(block.number, 17_999_999);
        assert_eq!(block.source, BlockSource::TimestampRegistry);
    }

    #[tokio::test]
    async fn test_unpopulated_registry_falls_back_with_same_offset() {
        let chain = ChainConfig::dev();
        let l2 = MockL2::new()
            .with_storage(chain.starknet.header_store, latest_key(), Felt::from(18_000_500u64));

        let block = resolver(l2).resolve(TS).await.unwrap();
        assert_eq!(block.number, 18_000_499);
        assert_eq!(block.source, BlockSource::HeaderStore);
    }

    #[tokio::test]
    async fn test_offset_identical_on_both_paths() {
        let chain = ChainConfig::dev();
        let via_registry = MockL2::new()
            .with_storage(chain.starknet.timestamp_registry, registry_key(TS), Felt::from(42u64));
        let via_store = MockL2::new()
            .with_storage(chain.starknet.header_store, latest_key(), Felt::from(42u64));

        assert_eq!(
            resolver(via_registry).resolve_block(TS).await.unwrap(),
            resolver(via_store).resolve_block(TS).await.unwrap()
        );
    }

    #[tokio::test]
    async fn test_registry_is_keyed_by_timestamp() {
        let chain = ChainConfig::dev();
        let l2 = MockL2::new()
            .with_storage(chain.starknet.timestamp_registry, registry_key(TS), Felt::from(100u64))
            .with_storage(chain.starknet.header_store, latest_key(), Felt::from(900u64));
        let resolver = resolver(l2);

        assert_eq!(resolver.resolve_block(TS).await.unwrap(), 99);
        assert_eq!(resolver.resolve_block(TS + 1).await.unwrap(), 899);
    }

    #[tokio::test]
    async fn test_nothing_relayed_is_an_error() {
        let err = resolver(MockL2::new()).resolve_block(TS).await.unwrap_err();
        assert!(matches!(err, CoreError::NoRelayedBlock { timestamp: TS }));
    }

    #[tokio::test]
    async fn test_transport_error_propagates() {
        let err = resolver(MockL2::failing()).resolve_block(TS).await.unwrap_err();
        assert!(err.is_retryable());
    }

    #[test]
    fn test_read_block_rejects_oversized_values() {
        assert_eq!(read_block(Felt::from(77u64)).unwrap(), 77);
        assert!(read_block(Felt::from(u128::MAX)).is_err());
    }
}
