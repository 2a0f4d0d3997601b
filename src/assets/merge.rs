use alloy_primitives::{B256, U256};
use std::collections::HashMap;

use super::{asset_id, Asset, AssetStruct, AssetType};
use crate::errors::{CoreError, Result};

/// Merge assets with the same id and total up the native value.
///
/// Returns one struct per distinct asset, in first-seen order, with summed
/// amounts, plus the ETH value that has to accompany the deposit transaction.
pub fn merge_and_sum_eth(assets: &[Asset]) -> Result<(Vec<AssetStruct>, U256)> {
    let mut index: HashMap<B256, usize> = HashMap::with_capacity(assets.len());
    let mut merged: Vec<AssetStruct> = Vec::with_capacity(assets.len());
    let mut eth_value = U256::ZERO;

    for asset in assets {
        let amount = asset.amount();
        if asset.asset_type() == AssetType::Native {
            eth_value = eth_value.checked_add(amount).ok_or(CoreError::AmountOverflow)?;
        }
        let id = asset_id(asset);
        match index.get(&id) {
            Some(&i) => {
                merged[i].amount =
                    merged[i].amount.checked_add(amount).ok_or(CoreError::AmountOverflow)?;
            }
            None => {
                index.insert(id, merged.len());
                merged.push(asset.to_struct());
            }
        }
    }

    Ok((merged, eth_value))
}
