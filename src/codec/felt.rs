//! Starknet field element helpers.

use alloy_primitives::{keccak256, Address, U256};
use starknet_crypto::pedersen_hash;
use starknet_types_core::felt::Felt;

use crate::constants::{ADDR_BOUND, FELT_MASK_250, FELT_MAX};
use crate::errors::{CoreError, Result};

/// Widen a felt into a `U256`.
pub fn felt_to_u256(felt: &Felt) -> U256 {
    U256::from_be_bytes(felt.to_bytes_be())
}

/// Narrow a `U256` into a felt, rejecting values at or above the field prime.
pub fn felt_from_u256(value: U256) -> Result<Felt> {
    if value > FELT_MAX {
        return Err(CoreError::FeltOverflow(value));
    }
    Ok(Felt::from_bytes_be(&value.to_be_bytes::<32>()))
}

/// Clear the top 6 bits of a 256-bit value so it always fits in a felt.
pub fn mask_to_felt(value: U256) -> Felt {
    Felt::from_bytes_be(&(value & FELT_MASK_250).to_be_bytes::<32>())
}

/// An Ethereum address as a felt (left padded, always in range).
pub fn felt_from_address(address: Address) -> Felt {
    let mut bytes = [0u8; 32];
    bytes[12..32].copy_from_slice(address.as_slice());
    Felt::from_bytes_be(&bytes)
}

/// Read an Ethereum address back out of a felt.
pub fn address_from_felt(felt: &Felt) -> Result<Address> {
    let bytes = felt.to_bytes_be();
    if bytes[..12].iter().any(|b| *b != 0) {
        return Err(CoreError::InvalidAddress(format!("{felt:#x}")));
    }
    Ok(Address::from_slice(&bytes[12..32]))
}

/// `sn_keccak`: keccak256 truncated to 250 bits, used for selectors and storage vars.
pub fn starknet_keccak(data: &[u8]) -> Felt {
    mask_to_felt(U256::from_be_bytes(keccak256(data).0))
}

/// Pedersen hash chain over a list, terminated by the list length.
///
/// `h(h(h(h(0, a), b), c), 3)` for `[a, b, c]`.
pub fn hash_on_elements(elements: &[Felt]) -> Felt {
    let acc = elements.iter().fold(Felt::ZERO, |acc, e| pedersen_hash(&acc, e));
    pedersen_hash(&acc, &Felt::from(elements.len() as u64))
}

/// Storage address of a Cairo storage variable, optionally keyed.
pub fn storage_var_address(name: &str, keys: &[Felt]) -> Felt {
    let base = starknet_keccak(name.as_bytes());
    let hashed = keys.iter().fold(base, |acc, key| pedersen_hash(&acc, key));
    let reduced = felt_to_u256(&hashed) % ADDR_BOUND;
    Felt::from_bytes_be(&reduced.to_be_bytes::<32>())
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    #[test]
    fn test_address_felt_roundtrip() {
        let addr = address!("d9Db270c1B5E3Bd161E8c8503c55cEABeE709552");
        let felt = felt_from_address(addr);
        assert_eq!(address_from_felt(&felt).unwrap(), addr);
    }

    #[test]
    fn test_address_from_wide_felt_rejected() {
        let wide = Felt::from(1u128 << 100) * Felt::from(1u128 << 100);
        assert!(matches!(address_from_felt(&wide), Err(CoreError::InvalidAddress(_))));
    }

    #[test]
    fn test_felt_from_u256_bounds() {
        assert!(felt_from_u256(FELT_MAX).is_ok());
        assert!(matches!(
            felt_from_u256(FELT_MAX + U256::from(1)),
            Err(CoreError::FeltOverflow(_))
        ));
        let v = U256::from(123_456u64);
        assert_eq!(felt_to_u256(&felt_from_u256(v).unwrap()), v);
    }

    #[test]
    fn test_mask_clears_top_six_bits() {
        let masked = felt_to_u256(&mask_to_felt(U256::MAX));
        assert_eq!(masked, FELT_MASK_250);
        assert_eq!(masked >> 250, U256::ZERO);
    }

    #[test]
    fn test_starknet_keccak_is_masked_keccak() {
        let raw = U256::from_be_bytes(keccak256(b"get_strategy").0);
        let selector = felt_to_u256(&starknet_keccak(b"get_strategy"));
        assert_eq!(selector, raw & FELT_MASK_250);
    }

    #[test]
    fn test_hash_on_elements_matches_manual_chain() {
        let a = Felt::from(1u64);
        let b = Felt::from(2u64);
        let manual = pedersen_hash(
            &pedersen_hash(&pedersen_hash(&Felt::ZERO, &a), &b),
            &Felt::from(2u64),
        );
        assert_eq!(hash_on_elements(&[a, b]), manual);
    }

    #[test]
    fn test_hash_on_elements_is_length_sensitive() {
        let a = Felt::from(5u64);
        assert_ne!(hash_on_elements(&[a]), hash_on_elements(&[a, Felt::ZERO]));
    }

    #[test]
    fn test_storage_var_address_without_keys_is_sn_keccak() {
        let addr = storage_var_address("_latest_l1_block", &[]);
        assert_eq!(addr, starknet_keccak(b"_latest_l1_block"));
    }

    #[test]
    fn test_storage_var_address_stays_below_bound() {
        for ts in [0u64, 1, 1_700_000_000, u64::MAX] {
            let addr = storage_var_address("_timestamp_to_eth_block_number", &[Felt::from(ts)]);
            assert!(felt_to_u256(&addr) < ADDR_BOUND);
        }
    }
}
