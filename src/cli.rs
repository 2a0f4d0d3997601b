use alloy_primitives::{Address, U256};
use clap::{Args, Parser, Subcommand, ValueEnum};
use starknet_types_core::felt::Felt;
use std::path::PathBuf;

use crate::assets::{parse_address, parse_uint};

/// CLI arguments for the Prop House operator tool
#[derive(Parser, Debug)]
#[command(name = "prophouse", about = "Prop House governance power and claim tool")]
pub struct Cli {
    /// Chain configuration JSON. Uses the dev preset when omitted.
    #[arg(long, global = true)]
    pub chain_config: Option<PathBuf>,

    /// L1 (Ethereum) JSON-RPC endpoint used for storage proofs and balance calls.
    #[arg(long, env = "L1_RPC_URL", default_value = "http://localhost:8545", global = true)]
    pub l1_rpc: String,

    /// Starknet JSON-RPC endpoint used for the registries and the header store.
    #[arg(long, env = "STARKNET_RPC_URL", default_value = "http://localhost:5050", global = true)]
    pub l2_rpc: String,

    /// Enable structured JSON logging instead of human-readable output.
    ///
    /// When enabled, all log output is emitted as newline-delimited JSON.
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the asset id and contract struct of an asset.
    ///
    /// Example: `prophouse asset-id '{"assetType":"ERC20","token":"0x..","amount":"5"}'`
    AssetId {
        /// Asset as JSON
        asset: String,
    },

    /// Split a uint256 into its Cairo `{low, high}` halves.
    Split {
        #[arg(value_parser = parse_u256)]
        value: U256,
    },

    /// Join Cairo `{low, high}` halves back into a uint256.
    Join {
        #[arg(value_parser = parse_u256)]
        low: U256,
        #[arg(value_parser = parse_u256)]
        high: U256,
    },

    /// Validate a round config file, optionally encoding it for the round factory.
    ValidateRound {
        /// Round config JSON, tagged with `roundType`
        config: PathBuf,

        /// Unix time the round will be created at. Defaults to now.
        #[arg(long)]
        now: Option<u64>,

        /// Resolve strategies and print the ABI-encoded config.
        #[arg(long)]
        encode: bool,
    },

    /// Compute the root of a whitelist and, for one account, its user params.
    WhitelistRoot {
        /// JSON array of `{address, votingPower}`
        members: PathBuf,

        #[arg(long, value_parser = parse_addr)]
        account: Option<Address>,
    },

    /// Build an award claim tree and print its root or one leaf's proof.
    ClaimTree {
        /// JSON array of claim leaves
        leaves: PathBuf,

        /// Chain the claims are submitted to
        #[arg(long, value_enum, default_value = "pedersen")]
        hasher: HasherKind,

        /// Print the inclusion proof of the leaf at this index.
        #[arg(long)]
        index: Option<usize>,
    },

    /// Resolve the provable L1 block for a round timestamp.
    ResolveBlock { timestamp: u64 },

    /// Governance power of an account under one strategy.
    Power(StrategyQuery),

    /// Per-voter params an account submits alongside its vote.
    UserParams(StrategyQuery),
}

/// Account, timestamp and strategy shared by the power queries.
#[derive(Args, Debug)]
pub struct StrategyQuery {
    #[arg(long, value_parser = parse_addr)]
    pub account: Address,

    /// Round snapshot timestamp
    #[arg(long)]
    pub timestamp: u64,

    #[command(flatten)]
    pub strategy: StrategySelector,
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct StrategySelector {
    /// Strategy id as registered on L2
    #[arg(long, value_parser = parse_felt)]
    pub strategy_id: Option<Felt>,

    /// Strategy config JSON, tagged with `strategyType`
    #[arg(long)]
    pub strategy_config: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum HasherKind {
    /// Starknet: Pedersen nodes
    Pedersen,
    /// Ethereum: Keccak nodes
    Keccak,
}

fn parse_u256(value: &str) -> Result<U256, String> {
    parse_uint(value).map_err(|e| e.to_string())
}

fn parse_addr(value: &str) -> Result<Address, String> {
    parse_address(value).map_err(|e| e.to_string())
}

fn parse_felt(value: &str) -> Result<Felt, String> {
    Felt::from_hex(value.trim()).map_err(|e| format!("invalid felt '{value}': {e}"))
}
