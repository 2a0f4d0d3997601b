//! # Prop House core - governance power and round claim library
//!
//! Resolves governance power for Starknet voting strategies backed by L1
//! state (vanilla, merkle whitelist and `balanceOf` storage proofs), validates
//! and encodes funding rounds, and rebuilds award claim trees so winners can
//! claim on L1.

pub mod assets;
pub mod blocks;
pub mod chain;
pub mod claims;
pub mod cli;
pub mod codec;
pub mod constants;
pub mod errors;
pub mod output;
pub mod proofs;
pub mod round;
pub mod rpc;
pub mod strategies;
