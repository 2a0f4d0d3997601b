//! Colored console output for the `prophouse` tool.
//!
//! Color scheme: blue+bold headers, cyan values, green success,
//! red failures, dimmed secondary text.

use alloy_primitives::{B256, U256};
use colored::Colorize;
use serde::Serialize;
use starknet_types_core::felt::Felt;

use crate::assets::{Asset, AssetStruct};
use crate::blocks::{BlockSource, ResolvedBlock};
use crate::codec::Uint256Split;
use crate::round::{EncodedRound, RoundConfigError};

// ── Helpers ────────────────────────────────────────────────────────

/// Format a period length in seconds as `"2d 3h"`, `"45m"` or `"30s"`.
///
/// Only the two largest non-zero units are shown.
pub fn format_period(secs: u64) -> String {
    let units = [(86_400, "d"), (3_600, "h"), (60, "m"), (1, "s")];
    let parts: Vec<String> = units
        .iter()
        .scan(secs, |rest, &(size, suffix)| {
            let n = *rest / size;
            *rest %= size;
            Some((n, suffix))
        })
        .filter(|(n, _)| *n > 0)
        .take(2)
        .map(|(n, suffix)| format!("{n}{suffix}"))
        .collect();
    if parts.is_empty() {
        "0s".to_string()
    } else {
        parts.join(" ")
    }
}

/// Format felts as a bracketed hex list.
pub fn format_felts(felts: &[Felt]) -> String {
    let items: Vec<String> = felts.iter().map(|f| format!("{f:#x}")).collect();
    format!("[{}]", items.join(", "))
}

fn print_header(title: &str) {
    println!();
    println!("{}", title.blue().bold());
}

fn print_field(label: &str, value: impl std::fmt::Display) {
    println!("  {} {}", format!("{label:<14}").dimmed(), value.to_string().cyan());
}

/// Pretty-print any serializable value as JSON.
pub fn print_json<T: Serialize>(value: &T) -> serde_json::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ── Codec ──────────────────────────────────────────────────────────

/// Print an asset's id and on-chain struct.
pub fn print_asset(asset: &Asset, id: B256, encoded: &AssetStruct) {
    print_header("Asset");
    print_field("Type:", format!("{:?}", asset.asset_type()));
    print_field("Asset id:", id);
    print_field("Token:", encoded.token);
    print_field("Identifier:", encoded.identifier);
    print_field("Amount:", encoded.amount);
}

/// Print a value next to its `{low, high}` halves.
pub fn print_split(value: U256, split: Uint256Split) {
    print_header("Uint256");
    print_field("Value:", value);
    print_field("Low:", split.low);
    print_field("High:", split.high);
}

// ── Rounds ─────────────────────────────────────────────────────────

/// Print confirmation that a round config passed validation.
pub fn print_round_valid(kind: &str, vote_period: u64) {
    println!(
        "  {} {} round is valid (vote period {})",
        "OK".green().bold(),
        kind.cyan(),
        format_period(vote_period).cyan()
    );
}

/// Print the rule a round config broke.
pub fn print_round_invalid(err: &RoundConfigError) {
    println!("  {} {}", "INVALID".red().bold(), err);
}

/// Print an encoded round ready for the factory.
pub fn print_encoded_round(round: &EncodedRound) {
    print_header("Encoded round");
    print_field("Value:", round.value);
    print_field("Deposits:", round.deposits.len());
    for (label, strategies) in
        [("Proposing:", &round.proposing_strategies), ("Voting:", &round.voting_strategies)]
    {
        print_field(label, strategies.len());
        for strategy in strategies.iter() {
            println!(
                "    {} {} {}",
                format!("{:#x}", strategy.address).cyan(),
                "params".dimmed(),
                format_felts(&strategy.params)
            );
        }
    }
    println!("  {}", "Config:".dimmed());
    println!("    {}", round.config);
}

// ── Strategies ─────────────────────────────────────────────────────

/// Print a whitelist root.
pub fn print_whitelist(root: Felt, members: usize) {
    print_header("Whitelist");
    print_field("Members:", members);
    print_field("Root:", format!("{root:#x}"));
}

/// Print the resolved L1 block for a timestamp next to the L1 node's head.
pub fn print_block(timestamp: u64, block: &ResolvedBlock, l1_head: u64) {
    print_header("Snapshot block");
    print_field("Timestamp:", timestamp);
    print_field("L1 block:", block.number);
    print_field("L1 head:", l1_head);
    if block.number > l1_head {
        println!(
            "  {} {}",
            "WARNING:".yellow().bold(),
            "L1 node is behind the snapshot block; proofs will fail".yellow()
        );
    }
    match block.source {
        BlockSource::TimestampRegistry => print_field("Source:", "timestamp registry"),
        BlockSource::HeaderStore => println!(
            "  {} {}",
            "WARNING:".yellow().bold(),
            "timestamp not relayed yet; using the latest stored header".yellow()
        ),
    }
}

/// Print an account's governance power.
pub fn print_power(strategy: Felt, power: U256) {
    print_header("Governance power");
    print_field("Strategy:", format!("{strategy:#x}"));
    print_field("Power:", power);
}

/// Print the user params an account submits with its vote.
pub fn print_user_params(strategy: Felt, params: &[Felt]) {
    print_header("User params");
    print_field("Strategy:", format!("{strategy:#x}"));
    print_field("Count:", params.len());
    for (i, param) in params.iter().enumerate() {
        println!("    {} {}", format!("{i:>3}.").dimmed(), format!("{param:#x}").cyan());
    }
}

// ── Claims ─────────────────────────────────────────────────────────

/// Print a claim tree root.
pub fn print_claim_root(hasher: &str, root: impl std::fmt::Display, leaves: usize) {
    print_header("Claim tree");
    print_field("Hasher:", hasher);
    print_field("Leaves:", leaves);
    print_field("Root:", root);
}

// ── Tests ───────────────────────────────────────────────────────────
