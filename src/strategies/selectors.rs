use alloy_primitives::{keccak256, Address, Bytes, U256};

use crate::errors::{CoreError, Result};
use crate::proofs::pad_address;

/// Compute the Solidity function selector (first 4 bytes of keccak256(signature)).
pub fn function_selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    let mut selector = [0u8; 4];
    selector.copy_from_slice(&hash[..4]);
    selector
}

// Token getters
pub fn balance_of() -> [u8; 4] {
    function_selector("balanceOf(address)")
}
pub fn erc1155_balance_of() -> [u8; 4] {
    function_selector("balanceOf(address,uint256)")
}

/// Calldata for `balanceOf(account)` (ERC-20 and ERC-721).
pub fn balance_of_calldata(account: Address) -> Bytes {
    let mut data = Vec::with_capacity(36);
    data.extend_from_slice(&balance_of());
    data.extend_from_slice(&pad_address(account));
    data.into()
}

/// Calldata for ERC-1155 `balanceOf(account, id)`.
pub fn erc1155_balance_of_calldata(account: Address, token_id: U256) -> Bytes {
    let mut data = Vec::with_capacity(68);
    data.extend_from_slice(&erc1155_balance_of());
    data.extend_from_slice(&pad_address(account));
    data.extend_from_slice(&token_id.to_be_bytes::<32>());
    data.into()
}

/// Decode a single `uint256` return word.
pub fn decode_uint256(data: &[u8]) -> Result<U256> {
    if data.len() < 32 {
        return Err(CoreError::MalformedResponse(format!(
            "expected a 32-byte uint256 return, got {} bytes",
            data.len()
        )));
    }
    Ok(U256::from_be_slice(&data[..32]))
}
