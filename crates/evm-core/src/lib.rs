//! EVM ground types for the smart-account session core.
//!
//! This crate provides:
//! - Ethereum address parsing and validation (with EIP-55 checksums)
//! - Exact fixed-point conversion between decimal ETH amounts and wei
//! - Definitions of known EVM networks for session labelling

pub mod address;
pub mod chains;
pub mod error;
pub mod units;
