use prophouse_core::assets::{asset_id, Asset};
use prophouse_core::blocks::BlockResolver;
use prophouse_core::chain::ChainConfig;
use prophouse_core::claims::{
    ClaimInput, ClaimLeaf, ClaimTree, KeccakHasher, LeafHasher, PedersenHasher,
};
use prophouse_core::cli::{Cli, Command, HasherKind, StrategyQuery};
use prophouse_core::codec::{from_split, to_split, Uint256Split};
use prophouse_core::output;
use prophouse_core::round::{encode_infinite_round, encode_timed_round, validate_round, RoundConfig};
use prophouse_core::rpc::{http_l1_provider, http_l2_provider, L1Provider};
use prophouse_core::strategies::{
    GovernancePower, GovernancePowerStrategy, WhitelistMember, WhitelistTree,
};

use clap::Parser;
use eyre::WrapErr;
use serde::de::DeserializeOwned;
use serde::Serialize;
use starknet_types_core::felt::Felt;
use std::fmt::LowerHex;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let chain = match &cli.chain_config {
        Some(path) => ChainConfig::load(path)
            .wrap_err_with(|| format!("loading chain config {}", path.display()))?,
        None => ChainConfig::dev(),
    };

    match &cli.command {
        Command::AssetId { asset } => {
            let asset: Asset = serde_json::from_str(asset).wrap_err("parsing asset")?;
            output::print_asset(&asset, asset_id(&asset), &asset.to_struct());
        }
        Command::Split { value } => output::print_split(*value, to_split(*value)),
        Command::Join { low, high } => {
            let split = Uint256Split {
                low: u128::try_from(*low).map_err(|_| eyre::eyre!("low half exceeds 128 bits"))?,
                high: u128::try_from(*high)
                    .map_err(|_| eyre::eyre!("high half exceeds 128 bits"))?,
            };
            output::print_split(from_split(split), split);
        }
        Command::ValidateRound { config, now, encode } => {
            let round: RoundConfig = read_json(config)?;
            let now = match *now {
                Some(now) => now,
                None => SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs(),
            };
            if let Err(err) = validate_round(&round, now) {
                output::print_round_invalid(&err);
                return Err(err.into());
            }
            match &round {
                RoundConfig::Timed(timed) => {
                    output::print_round_valid("timed", timed.vote_period_duration)
                }
                RoundConfig::Infinite(infinite) => {
                    output::print_round_valid("infinite", infinite.vote_period_duration)
                }
            }
            if *encode {
                let power = governance_power(&cli, &chain)?;
                let encoded = match &round {
                    RoundConfig::Timed(timed) => encode_timed_round(timed, now, &power).await?,
                    RoundConfig::Infinite(infinite) => {
                        encode_infinite_round(infinite, &power).await?
                    }
                };
                output::print_encoded_round(&encoded);
            }
        }
        Command::WhitelistRoot { members, account } => {
            let members: Vec<WhitelistMember> = read_json(members)?;
            let tree = WhitelistTree::new(&members)?;
            output::print_whitelist(tree.root(), tree.len());
            if let Some(account) = *account {
                let params = tree.user_params(account)?;
                output::print_user_params(chain.starknet.whitelist_strategy, &params);
            }
        }
        Command::ClaimTree { leaves, hasher, index } => {
            let inputs: Vec<ClaimInput> = read_json(leaves)?;
            let leaves: Vec<ClaimLeaf> = inputs.into_iter().map(ClaimLeaf::from).collect();
            match hasher {
                HasherKind::Pedersen => {
                    print_claim_tree::<PedersenHasher>("pedersen", leaves, *index)?
                }
                HasherKind::Keccak => print_claim_tree::<KeccakHasher>("keccak", leaves, *index)?,
            }
        }
        Command::ResolveBlock { timestamp } => {
            let resolver = BlockResolver::new(&chain, http_l2_provider(&cli.l2_rpc)?);
            let block = resolver.resolve(*timestamp).await?;
            let head = http_l1_provider(&cli.l1_rpc)?.block_number().await?;
            output::print_block(*timestamp, &block, head);
        }
        Command::Power(query) => {
            let power = governance_power(&cli, &chain)?;
            let id = strategy_id(&power, query).await?;
            let value = power.power(query.account, query.timestamp, id).await?;
            output::print_power(id, value);
        }
        Command::UserParams(query) => {
            let power = governance_power(&cli, &chain)?;
            let id = strategy_id(&power, query).await?;
            let params = power.user_params(query.account, query.timestamp, id).await?;
            output::print_user_params(id, &params);
        }
    }

    Ok(())
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> eyre::Result<T> {
    let raw = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&raw).wrap_err_with(|| format!("parsing {}", path.display()))
}

fn governance_power(cli: &Cli, chain: &ChainConfig) -> eyre::Result<GovernancePower> {
    let l1 = http_l1_provider(&cli.l1_rpc)?;
    let l2 = http_l2_provider(&cli.l2_rpc)?;
    Ok(GovernancePower::new(chain, l1, l2))
}

/// Strategy id from `--strategy-id`, or from resolving `--strategy-config` locally.
async fn strategy_id(power: &GovernancePower, query: &StrategyQuery) -> eyre::Result<Felt> {
    if let Some(id) = query.strategy.strategy_id {
        return Ok(id);
    }
    let Some(path) = &query.strategy.strategy_config else {
        eyre::bail!("either --strategy-id or --strategy-config is required");
    };
    let config: GovernancePowerStrategy = read_json(path)?;
    Ok(power.strategy_struct(&config).await?.id())
}

fn print_claim_tree<H>(
    hasher: &str,
    leaves: Vec<ClaimLeaf>,
    index: Option<usize>,
) -> eyre::Result<()>
where
    H: LeafHasher,
    H::Node: LowerHex + Serialize,
{
    let tree = ClaimTree::<H>::build(leaves)?;
    output::print_claim_root(hasher, format!("{:#x}", tree.root()), tree.leaves().len());
    if let Some(index) = index {
        output::print_json(&tree.proof(index)?)?;
    }
    Ok(())
}
