use alloy_primitives::{keccak256, Keccak256, B256, U256};
use alloy_sol_types::SolValue;

use super::{Asset, AssetStruct};
use crate::constants::FELT_MASK_250;

/// Deterministic 32-byte identifier of an asset, independent of amount.
///
/// - native: `keccak(uint8 type)`
/// - ERC-20: `keccak(uint8 type ‖ address token)`
/// - ERC-721 / ERC-1155: `keccak(uint8 type ‖ keccak(address token ‖ uint256 id))`
///
/// All packing is tight (`abi.encodePacked`).
pub fn asset_id(asset: &Asset) -> B256 {
    let tag = asset.asset_type() as u8;
    let mut hasher = Keccak256::new();
    hasher.update([tag]);
    match asset {
        Asset::Eth { .. } => {}
        Asset::Erc20 { token, .. } => hasher.update(token.as_slice()),
        Asset::Erc721 { token, token_id } | Asset::Erc1155 { token, token_id, .. } => {
            let mut inner = Keccak256::new();
            inner.update(token.as_slice());
            inner.update(token_id.to_be_bytes::<32>());
            hasher.update(inner.finalize().as_slice());
        }
    }
    hasher.finalize()
}

/// Hash of the requested assets of an infinite-round proposal.
///
/// `keccak(abi.encode(AssetStruct[]))` with the top 6 bits cleared so the value
/// fits in a felt on the L2 side.
pub fn requested_assets_hash(assets: &[Asset]) -> U256 {
    let structs: Vec<AssetStruct> = assets.iter().map(Asset::to_struct).collect();
    U256::from_be_bytes(keccak256(structs.abi_encode()).0) & FELT_MASK_250
}
