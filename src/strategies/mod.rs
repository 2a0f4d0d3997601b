//! Governance power strategies.
//!
//! A strategy decides how much proposing or voting weight an account has in a
//! round. Every strategy resolves to a [`StrategyStruct`], the contract
//! address plus params shared by all voters, and produces per-voter params the
//! L2 contract checks when a vote or proposal is submitted.
//!
//! Architecture:
//!   GovernancePowerStrategy (round author input)
//!   ↓ StrategyHandlers::for_config
//!   StrategyHandler::strategy_struct → StrategyStruct { address, params }
//!   ↓ registered on L2, identified by StrategyStruct::id
//!   StrategyHandler::user_params / power (per voter, per round timestamp)

pub mod balance_of;
pub mod power;
pub mod registry;
pub mod selectors;
pub mod vanilla;
pub mod whitelist;

pub use balance_of::{BalanceOfHandler, BalanceOfParams};
pub use power::GovernancePower;
pub use registry::StrategyRegistry;
pub use vanilla::VanillaHandler;
pub use whitelist::{member_leaf, WhitelistHandler, WhitelistTree};

use alloy_primitives::{Address, U256};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use starknet_types_core::felt::Felt;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::blocks::BlockResolver;
use crate::chain::ChainConfig;
use crate::codec::hash_on_elements;
use crate::errors::{CoreError, Result};
use crate::rpc::{L1Provider, L2Provider};

/// Strategy variants a handler exists for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StrategyKind {
    Vanilla,
    Whitelist,
    BalanceOf,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 3] = [Self::Vanilla, Self::Whitelist, Self::BalanceOf];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Vanilla => "vanilla",
            Self::Whitelist => "whitelist",
            Self::BalanceOf => "balanceOf",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Token standard a balance-of strategy reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BalanceAssetKind {
    #[serde(rename = "ERC20")]
    Erc20,
    #[serde(rename = "ERC721")]
    Erc721,
    #[serde(rename = "ERC1155")]
    Erc1155,
}

/// A whitelisted account and its fixed power.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WhitelistMember {
    pub address: Address,
    pub voting_power: U256,
}

/// Balance-of strategy settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceOfConfig {
    pub asset_kind: BalanceAssetKind,
    pub token: Address,
    /// Required for ERC-1155, rejected otherwise
    #[serde(default)]
    pub token_id: Option<U256>,
    /// Storage slot of the token's balances mapping
    pub slot_index: U256,
    /// Power per token; one when absent
    #[serde(default)]
    pub multiplier: Option<U256>,
}

/// Strategy as supplied by a round author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "strategyType", rename_all = "camelCase")]
pub enum GovernancePowerStrategy {
    Vanilla,
    Whitelist { members: Vec<WhitelistMember> },
    BalanceOf(BalanceOfConfig),
}

impl GovernancePowerStrategy {
    pub fn kind(&self) -> StrategyKind {
        match self {
            Self::Vanilla => StrategyKind::Vanilla,
            Self::Whitelist { .. } => StrategyKind::Whitelist,
            Self::BalanceOf(_) => StrategyKind::BalanceOf,
        }
    }
}

/// Strategy contract address plus the params shared by every voter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StrategyStruct {
    pub address: Felt,
    pub params: Vec<Felt>,
}

impl StrategyStruct {
    pub fn new(address: Felt, params: Vec<Felt>) -> Self {
        Self { address, params }
    }

    /// Registry id: `hash_on_elements([address, ...params])`.
    pub fn id(&self) -> Felt {
        let mut elements = Vec::with_capacity(1 + self.params.len());
        elements.push(self.address);
        elements.extend_from_slice(&self.params);
        hash_on_elements(&elements)
    }
}

/// One handler per [`StrategyKind`].
#[async_trait]
pub trait StrategyHandler: Send + Sync {
    fn kind(&self) -> StrategyKind;

    /// Strategy contract addresses this handler serves.
    fn addresses(&self) -> Vec<Felt>;

    /// Resolve an author-supplied config into its on-chain form.
    async fn strategy_struct(&self, config: &GovernancePowerStrategy) -> Result<StrategyStruct>;

    /// Params shared by all voters.
    async fn strategy_params(&self, config: &GovernancePowerStrategy) -> Result<Vec<Felt>> {
        Ok(self.strategy_struct(config).await?.params)
    }

    /// Per-voter params proving `account`'s power at `timestamp`.
    async fn user_params(
        &self,
        account: Address,
        timestamp: u64,
        strategy: &StrategyStruct,
    ) -> Result<Vec<Felt>>;

    /// Local estimate of the power the contract will grant.
    async fn power(
        &self,
        account: Address,
        timestamp: u64,
        strategy: &StrategyStruct,
    ) -> Result<U256>;
}

pub(crate) fn config_mismatch(
    expected: StrategyKind,
    config: &GovernancePowerStrategy,
) -> CoreError {
    CoreError::InvalidStrategyConfig(format!(
        "{expected} handler cannot resolve a {} strategy",
        config.kind()
    ))
}

/// Handlers keyed by kind, built once from a [`ChainConfig`].
#[derive(Clone, Default)]
pub struct StrategyHandlers {
    handlers: HashMap<StrategyKind, Arc<dyn StrategyHandler>>,
}

impl StrategyHandlers {
    /// All built-in handlers wired to the given providers.
    pub fn new(chain: &ChainConfig, l1: Arc<dyn L1Provider>, l2: Arc<dyn L2Provider>) -> Self {
        let resolver = BlockResolver::new(chain, l2);
        let mut handlers = Self::default();
        handlers.register(Arc::new(VanillaHandler::new(chain)));
        handlers.register(Arc::new(WhitelistHandler::new(chain)));
        handlers.register(Arc::new(BalanceOfHandler::new(chain, l1, resolver)));
        handlers
    }

    /// Add or replace the handler for its kind.
    pub fn register(&mut self, handler: Arc<dyn StrategyHandler>) {
        self.handlers.insert(handler.kind(), handler);
    }

    pub fn get(&self, kind: StrategyKind) -> Result<Arc<dyn StrategyHandler>> {
        self.handlers
            .get(&kind)
            .cloned()
            .ok_or_else(|| CoreError::UnknownStrategy(kind.to_string()))
    }

    pub fn for_config(&self, config: &GovernancePowerStrategy) -> Result<Arc<dyn StrategyHandler>> {
        self.get(config.kind())
    }

    /// Handler serving the strategy contract at `address`.
    pub fn for_address(&self, address: Felt) -> Result<Arc<dyn StrategyHandler>> {
        self.handlers
            .values()
            .find(|handler| handler.addresses().contains(&address))
            .cloned()
            .ok_or_else(|| CoreError::UnknownStrategy(format!("{address:#x}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpc::mock::{MockL1, MockL2};
    use alloy_primitives::address;

    fn handlers() -> StrategyHandlers {
        StrategyHandlers::new(&ChainConfig::dev(), Arc::new(MockL1::new()), Arc::new(MockL2::new()))
    }

    #[test]
    fn test_strategy_json_shapes() {
        let vanilla: GovernancePowerStrategy =
            serde_json::from_str(r#"{"strategyType": "vanilla"}"#).unwrap();
        assert_eq!(vanilla, GovernancePowerStrategy::Vanilla);

        let balance: GovernancePowerStrategy = serde_json::from_str(
            r#"{"strategyType": "balanceOf", "assetKind": "ERC1155",
                "token": "0x00000000000000000000000000000000000000aa",
                "tokenId": "0x7", "slotIndex": "0x3", "multiplier": "0x2"}"#,
        )
        .unwrap();
        let GovernancePowerStrategy::BalanceOf(config) = balance else {
            panic!("expected balanceOf");
        };
        assert_eq!(config.asset_kind, BalanceAssetKind::Erc1155);
        assert_eq!(config.token, address!("00000000000000000000000000000000000000aa"));
        assert_eq!(config.token_id, Some(U256::from(7)));
        assert_eq!(config.multiplier, Some(U256::from(2)));

        let whitelist: GovernancePowerStrategy = serde_json::from_str(
            r#"{"strategyType": "whitelist", "members": [
                {"address": "0x00000000000000000000000000000000000000ab", "votingPower": "0x5"}]}"#,
        )
        .unwrap();
        assert_eq!(whitelist.kind(), StrategyKind::Whitelist);
    }

    #[test]
    fn test_unknown_strategy_type_fails_to_parse() {
        let json = r#"{"strategyType": "quadratic"}"#;
        let err = serde_json::from_str::<GovernancePowerStrategy>(json).unwrap_err();
        assert!(err.to_string().contains("quadratic"));
    }

    #[test]
    fn test_strategy_id_covers_address_and_params() {
        let a = StrategyStruct::new(Felt::from(1u64), vec![Felt::from(2u64)]);
        let b = StrategyStruct::new(Felt::from(1u64), vec![Felt::from(3u64)]);
        let c = StrategyStruct::new(Felt::from(4u64), vec![Felt::from(2u64)]);
        assert_eq!(a.id(), hash_on_elements(&[Felt::from(1u64), Felt::from(2u64)]));
        assert_ne!(a.id(), b.id());
        assert_ne!(a.id(), c.id());
    }

    #[test]
    fn test_every_kind_has_a_handler() {
        let handlers = handlers();
        for kind in StrategyKind::ALL {
            assert_eq!(handlers.get(kind).unwrap().kind(), kind);
        }
    }

    #[test]
    fn test_lookup_by_address() {
        let chain = ChainConfig::dev();
        let handlers = handlers();
        let erc1155 = handlers.for_address(chain.starknet.balance_of_erc1155_strategy).unwrap();
        assert_eq!(erc1155.kind(), StrategyKind::BalanceOf);
        assert_eq!(
            handlers.for_address(chain.starknet.vanilla_strategy).unwrap().kind(),
            StrategyKind::Vanilla
        );
    }

    #[test]
    fn test_unknown_address_is_named() {
        let err = handlers().for_address(Felt::from(0xdeadu64)).err().unwrap();
        assert!(matches!(&err, CoreError::UnknownStrategy(name) if name == "0xdead"));
    }

    #[test]
    fn test_missing_handler_is_named() {
        let err = StrategyHandlers::default().get(StrategyKind::Whitelist).err().unwrap();
        assert_eq!(err.to_string(), "unknown strategy whitelist");
    }
}
