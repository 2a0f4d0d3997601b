use alloy_primitives::{Address, Keccak256, B256, U256};

/// Storage slot of `balances[account]` for a `mapping(address => uint256)` at `base_slot`.
///
/// Solidity layout: `keccak256(abi.encode(account, base_slot))`, i.e. the account
/// left-padded to 32 bytes followed by the 32-byte slot index. A wrong formula
/// does not fail; it proves some other (usually empty) slot.
pub fn balance_of_slot_key(account: Address, base_slot: U256) -> B256 {
    let mut hasher = Keccak256::new();
    hasher.update(pad_address(account));
    hasher.update(base_slot.to_be_bytes::<32>());
    hasher.finalize()
}

/// Storage slot of `balances[token_id][account]` for
/// `mapping(uint256 => mapping(address => uint256))` at `base_slot` (ERC-1155).
pub fn erc1155_balance_slot_key(account: Address, token_id: U256, base_slot: U256) -> B256 {
    let inner = uint_mapping_slot(token_id, base_slot);
    let mut hasher = Keccak256::new();
    hasher.update(pad_address(account));
    hasher.update(inner.as_slice());
    hasher.finalize()
}

/// Storage slot of `map[key]` for a mapping keyed by a 32-byte value.
pub fn uint_mapping_slot(key: U256, base_slot: U256) -> B256 {
    let mut hasher = Keccak256::new();
    hasher.update(key.to_be_bytes::<32>());
    hasher.update(base_slot.to_be_bytes::<32>());
    hasher.finalize()
}

/// Left-pad an address to a 32-byte word.
pub fn pad_address(address: Address) -> [u8; 32] {
    let mut padded = [0u8; 32];
    padded[12..32].copy_from_slice(address.as_slice());
    padded
}
