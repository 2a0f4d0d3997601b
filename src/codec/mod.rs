//! Uint256 split codec.
//!
//! Cairo contracts take 256-bit integers as a `{low, high}` pair of 128-bit
//! halves because a felt only holds ~252 bits. Every amount, asset id and
//! storage key handed to the L2 goes through [`Uint256Split`].

pub mod felt;

pub use felt::{
    address_from_felt, felt_from_address, felt_from_u256, felt_to_u256, hash_on_elements,
    mask_to_felt, starknet_keccak, storage_var_address,
};

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};
use starknet_types_core::felt::Felt;

use crate::errors::{CoreError, Result};

/// A 256-bit value as two 128-bit limbs: `value = low + high * 2^128`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Uint256Split {
    /// Lower 128 bits
    pub low: u128,
    /// Upper 128 bits
    pub high: u128,
}

impl Uint256Split {
    /// Split a value into its two halves.
    pub fn from_u256(value: U256) -> Self {
        let limbs = value.as_limbs();
        Self {
            low: limbs[0] as u128 | (limbs[1] as u128) << 64,
            high: limbs[2] as u128 | (limbs[3] as u128) << 64,
        }
    }

    /// Join the halves back into a single value.
    pub fn to_u256(self) -> U256 {
        U256::from_limbs([
            self.low as u64,
            (self.low >> 64) as u64,
            self.high as u64,
            (self.high >> 64) as u64,
        ])
    }

    /// The `[low, high]` felt pair in the order Cairo reads it.
    pub fn to_felts(self) -> [Felt; 2] {
        [Felt::from(self.low), Felt::from(self.high)]
    }

    /// Read a `[low, high]` felt pair back, rejecting halves wider than 128 bits.
    pub fn from_felts(low: &Felt, high: &Felt) -> Result<Self> {
        let half = |felt: &Felt| {
            u128::try_from(felt_to_u256(felt))
                .map_err(|_| CoreError::InvalidUint(format!("{felt:#x}")))
        };
        Ok(Self { low: half(low)?, high: half(high)? })
    }
}

impl From<U256> for Uint256Split {
    fn from(value: U256) -> Self {
        Self::from_u256(value)
    }
}

impl From<Uint256Split> for U256 {
    fn from(split: Uint256Split) -> Self {
        split.to_u256()
    }
}

/// Split a 256-bit value into `{low, high}`.
pub fn to_split(value: U256) -> Uint256Split {
    Uint256Split::from_u256(value)
}

/// Recombine a `{low, high}` pair.
pub fn from_split(split: Uint256Split) -> U256 {
    split.to_u256()
}
