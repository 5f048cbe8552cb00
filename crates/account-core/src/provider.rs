//! The injected wallet-provider capability.
//!
//! The embedding layer supplies an implementation of [`WalletProvider`]
//! (a browser wallet bridge, an RPC client, a test double) and forwards
//! its notifications back into the session as [`ProviderNotification`]
//! values. No component reaches for an ambient global provider.

use alloy_primitives::U256;
use async_trait::async_trait;
use thiserror::Error;

/// Provider-level notifications a session subscribes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderEvent {
    AccountsChanged,
    ChainChanged,
    Disconnect,
}

/// A notification delivered by the embedding layer for a subscribed
/// event.
#[derive(Debug, Clone)]
pub enum ProviderNotification {
    /// The active account set changed; the first entry is the new owner.
    AccountsChanged(Vec<String>),
    /// The wallet switched to another chain.
    ChainChanged(u64),
    /// The provider dropped the connection.
    Disconnect,
}

/// Network description reported by the provider.
#[derive(Debug, Clone)]
pub struct NetworkInfo {
    pub chain_id: u64,
    pub name: String,
}

/// A transaction handed to the provider for submission.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionRequest {
    /// Checksummed recipient address.
    pub to: String,
    /// Value in base units.
    pub value: U256,
    /// Calldata; empty for plain value transfers.
    pub data: Vec<u8>,
}

/// Failures originating in the provider.
#[derive(Debug, Error)]
pub enum ProviderFailure {
    /// The user declined the request.
    #[error("request rejected by user")]
    Rejected,

    /// Any other provider-side failure; the message passes through.
    #[error("{0}")]
    Other(String),
}

/// The wallet-provider capability consumed by the session core.
///
/// All methods that reach the wallet or the network are suspend points;
/// `subscribe`/`unsubscribe` only register interest and return
/// immediately.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Interactively requests account access. Suspends until the user
    /// responds.
    async fn request_accounts(&self) -> Result<Vec<String>, ProviderFailure>;

    /// Non-interactive probe for accounts that are already authorized.
    async fn current_accounts(&self) -> Result<Vec<String>, ProviderFailure>;

    /// The network the wallet is currently on.
    async fn network(&self) -> Result<NetworkInfo, ProviderFailure>;

    /// Balance of an address in base units.
    async fn balance_of(&self, address: &str) -> Result<U256, ProviderFailure>;

    /// Submits a transaction and returns its handle.
    async fn send_transaction(
        &self,
        request: TransactionRequest,
    ) -> Result<String, ProviderFailure>;

    /// Registers for a provider-level notification.
    fn subscribe(&self, event: ProviderEvent);

    /// Releases a registration made with [`WalletProvider::subscribe`].
    fn unsubscribe(&self, event: ProviderEvent);
}
