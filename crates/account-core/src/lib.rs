//! Smart-account session core.
//!
//! This crate ties the session pieces together:
//! - the wallet connection state machine ([`session`])
//! - counterfactual account derivation ([`account`])
//! - balance validation and transaction dispatch ([`funding`])
//! - the injected wallet-provider capability ([`provider`])
//!
//! Calldata encoding lives in the `abi-codec` crate and is re-exported
//! here so the embedding layer sees a single surface.

pub mod account;
pub mod error;
pub mod funding;
pub mod provider;
pub mod session;

pub use abi_codec::encode::{encode_call, encode_raw, CallSpec, EncodedCall};
pub use abi_codec::error::AbiError;
pub use abi_codec::param::{Param, ParamType};

pub use account::{
    deployment_salt, derive_account_address, SmartAccountRecord, DEFAULT_ENTRY_POINT,
};
pub use error::SessionError;
pub use funding::FundingQuote;
pub use provider::{
    NetworkInfo, ProviderEvent, ProviderFailure, ProviderNotification, TransactionRequest,
    WalletProvider,
};
pub use session::{SessionState, WalletConnection, WalletSession};
