use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

use super::validate::{check_splittable, RoundConfigError};
use crate::assets::Asset;
use crate::claims::ClaimLeaf;
use crate::errors::Result;

/// Final vote count of one proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalTally {
    pub proposal_id: u64,
    pub proposer: Address,
    pub votes: U256,
}

/// Top `winner_count` proposals: most votes first, earlier proposal id on ties.
pub fn rank_winners(tallies: &[ProposalTally], winner_count: u32) -> Vec<ProposalTally> {
    let mut ranked = tallies.to_vec();
    ranked.sort_by(|a, b| b.votes.cmp(&a.votes).then(a.proposal_id.cmp(&b.proposal_id)));
    ranked.truncate(winner_count as usize);
    ranked
}

/// Claim leaves for a finalized timed round, in winner order.
///
/// Winner `i` gets award `i`. With a single award and several winner slots,
/// every winner gets an equal share of it.
pub fn timed_round_claim_leaves(
    winners: &[ProposalTally],
    awards: &[Asset],
    winner_count: u32,
) -> Result<Vec<ClaimLeaf>> {
    let shares: Vec<Asset> = match awards {
        [award] if winner_count > 1 => {
            check_splittable(award, winner_count)?;
            let share = award.amount() / U256::from(winner_count);
            vec![award.with_amount(share); winners.len()]
        }
        awards if awards.len() >= winners.len() => awards[..winners.len()].to_vec(),
        awards => {
            return Err(RoundConfigError::AwardCountMismatch {
                awards: awards.len(),
                winners: winners.len() as u32,
            }
            .into())
        }
    };

    Ok(winners
        .iter()
        .zip(&shares)
        .map(|(winner, asset)| ClaimLeaf::timed(winner.proposal_id, winner.proposer, asset))
        .collect())
}
