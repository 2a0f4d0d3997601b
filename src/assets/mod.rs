//! Asset encoding.
//!
//! Awards and requested funding are expressed as [`Asset`] values. Contracts
//! see them as an ABI [`AssetStruct`] and key them by a 32-byte asset id, see
//! [`asset_id`]. Two awards with the same id are the same asset and may be
//! merged into one transfer, see [`merge_and_sum_eth`].

pub mod id;
pub mod merge;

pub use id::{asset_id, requested_assets_hash};
pub use merge::merge_and_sum_eth;

use alloy_primitives::{Address, U256};
use alloy_sol_types::sol;
use serde::Deserialize;
use std::str::FromStr;

use crate::errors::{CoreError, Result};

sol! {
    /// On-chain asset representation shared by the round and claim contracts.
    #[derive(Debug, PartialEq, Eq)]
    struct AssetStruct {
        uint8 asset_type;
        address token;
        uint256 identifier;
        uint256 amount;
    }
}

/// Asset type tags as numbered by the contracts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum AssetType {
    Native = 0,
    Erc20 = 1,
    Erc721 = 2,
    Erc1155 = 3,
}

/// An award or requested asset.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawAsset")]
pub enum Asset {
    /// Native currency
    Eth { amount: U256 },
    /// Fungible token
    Erc20 { token: Address, amount: U256 },
    /// Single NFT; the amount is always one
    Erc721 { token: Address, token_id: U256 },
    /// Semi-fungible token
    Erc1155 { token: Address, token_id: U256, amount: U256 },
}

impl Asset {
    /// Native currency amount.
    pub fn eth(amount: U256) -> Self {
        Self::Eth { amount }
    }

    /// ERC-20 amount of `token`, parsed from a user-supplied address string.
    pub fn erc20(token: &str, amount: U256) -> Result<Self> {
        Ok(Self::Erc20 { token: parse_address(token)?, amount })
    }

    /// ERC-721 token `token_id` of `token`.
    pub fn erc721(token: &str, token_id: U256) -> Result<Self> {
        Ok(Self::Erc721 { token: parse_address(token)?, token_id })
    }

    /// ERC-1155 `amount` of `token_id`.
    pub fn erc1155(token: &str, token_id: U256, amount: U256) -> Result<Self> {
        Ok(Self::Erc1155 { token: parse_address(token)?, token_id, amount })
    }

    pub fn asset_type(&self) -> AssetType {
        match self {
            Self::Eth { .. } => AssetType::Native,
            Self::Erc20 { .. } => AssetType::Erc20,
            Self::Erc721 { .. } => AssetType::Erc721,
            Self::Erc1155 { .. } => AssetType::Erc1155,
        }
    }

    /// Token contract; the zero address for native currency.
    pub fn token(&self) -> Address {
        match self {
            Self::Eth { .. } => Address::ZERO,
            Self::Erc20 { token, .. }
            | Self::Erc721 { token, .. }
            | Self::Erc1155 { token, .. } => *token,
        }
    }

    /// Token id for NFTs, zero otherwise.
    pub fn identifier(&self) -> U256 {
        match self {
            Self::Erc721 { token_id, .. } | Self::Erc1155 { token_id, .. } => *token_id,
            _ => U256::ZERO,
        }
    }

    pub fn amount(&self) -> U256 {
        match self {
            Self::Eth { amount } | Self::Erc20 { amount, .. } | Self::Erc1155 { amount, .. } => {
                *amount
            }
            Self::Erc721 { .. } => U256::from(1),
        }
    }

    /// Same asset with a different amount. ERC-721 keeps its amount of one.
    pub fn with_amount(&self, amount: U256) -> Self {
        match self {
            Self::Eth { .. } => Self::Eth { amount },
            Self::Erc20 { token, .. } => Self::Erc20 { token: *token, amount },
            Self::Erc721 { .. } => self.clone(),
            Self::Erc1155 { token, token_id, .. } => {
                Self::Erc1155 { token: *token, token_id: *token_id, amount }
            }
        }
    }

    /// The ABI struct the contracts take.
    pub fn to_struct(&self) -> AssetStruct {
        asset_struct(self)
    }
}

/// Build the ABI struct for an asset.
pub fn asset_struct(asset: &Asset) -> AssetStruct {
    AssetStruct {
        asset_type: asset.asset_type() as u8,
        token: asset.token(),
        identifier: asset.identifier(),
        amount: asset.amount(),
    }
}

/// Parse a 20-byte hex address, `0x` prefix optional.
pub fn parse_address(value: &str) -> Result<Address> {
    Address::from_str(value.trim()).map_err(|_| CoreError::InvalidAddress(value.to_string()))
}

/// Parse a decimal or `0x` hex uint256.
pub fn parse_uint(value: &str) -> Result<U256> {
    U256::from_str(value.trim()).map_err(|_| CoreError::InvalidUint(value.to_string()))
}

/// Wire form of an asset as round authors write it.
#[derive(Debug, Deserialize)]
#[serde(tag = "assetType")]
enum RawAsset {
    #[serde(rename = "ETH")]
    Eth { amount: String },
    #[serde(rename = "ERC20")]
    Erc20 { token: String, amount: String },
    #[serde(rename = "ERC721")]
    Erc721 {
        token: String,
        #[serde(rename = "tokenId")]
        token_id: String,
    },
    #[serde(rename = "ERC1155")]
    Erc1155 {
        token: String,
        #[serde(rename = "tokenId")]
        token_id: String,
        amount: String,
    },
}

impl TryFrom<RawAsset> for Asset {
    type Error = CoreError;

    fn try_from(raw: RawAsset) -> Result<Self> {
        match raw {
            RawAsset::Eth { amount } => Ok(Asset::eth(parse_uint(&amount)?)),
            RawAsset::Erc20 { token, amount } => Asset::erc20(&token, parse_uint(&amount)?),
            RawAsset::Erc721 { token, token_id } => Asset::erc721(&token, parse_uint(&token_id)?),
            RawAsset::Erc1155 { token, token_id, amount } => {
                Asset::erc1155(&token, parse_uint(&token_id)?, parse_uint(&amount)?)
            }
        }
    }
}
