//! The wallet-session connection state machine.
//!
//! [`WalletConnection`] owns the session lifecycle: connecting through
//! the injected provider capability, reacting to provider notifications,
//! and exposing the live session to the rest of the core. Derived
//! accounts and balance snapshots are scoped to a session generation;
//! any reset invalidates them.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;

use crate::account::SmartAccountRecord;
use crate::error::SessionError;
use crate::provider::{NetworkInfo, ProviderEvent, ProviderNotification, WalletProvider};

/// Lifecycle states of a wallet session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionState {
    Disconnected,
    Connecting,
    Connected,
    Reconnecting,
    Error,
}

/// An established wallet session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WalletSession {
    /// Checksummed owner address reported by the provider.
    pub owner: String,
    pub chain_id: u64,
    pub network_name: String,
    /// Monotonic counter bumped on every (re)connection; snapshots
    /// carrying an older generation are stale.
    pub generation: u64,
}

const EVENTS: [ProviderEvent; 3] = [
    ProviderEvent::AccountsChanged,
    ProviderEvent::ChainChanged,
    ProviderEvent::Disconnect,
];

struct Inner {
    state: SessionState,
    session: Option<WalletSession>,
    account: Option<SmartAccountRecord>,
    last_error: Option<String>,
    subscribed: bool,
    generation: u64,
}

/// The connection facade owning one wallet session at a time.
///
/// Shareable across tasks via `Arc`; state transitions on the session
/// are serialized, and the connect path admits a single in-flight
/// attempt.
pub struct WalletConnection {
    provider: Option<Arc<dyn WalletProvider>>,
    inner: Mutex<Inner>,
    /// Serializes connection attempts: a second `connect` issued while
    /// one is in flight queues here instead of reaching the provider.
    connect_gate: tokio::sync::Mutex<()>,
}

impl WalletConnection {
    /// Creates a connection backed by the given provider capability.
    pub fn new(provider: Arc<dyn WalletProvider>) -> Self {
        Self::build(Some(provider))
    }

    /// Creates a connection with no provider capability available;
    /// every `connect` fails with `ProviderUnavailable`.
    pub fn detached() -> Self {
        Self::build(None)
    }

    fn build(provider: Option<Arc<dyn WalletProvider>>) -> Self {
        WalletConnection {
            provider,
            inner: Mutex::new(Inner {
                state: SessionState::Disconnected,
                session: None,
                account: None,
                last_error: None,
                subscribed: false,
                generation: 0,
            }),
            connect_gate: tokio::sync::Mutex::new(()),
        }
    }

    /// The inner lock is never held across an await point.
    fn inner(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ─── read-only views ─────────────────────────────────────────────

    pub fn state(&self) -> SessionState {
        self.inner().state
    }

    pub fn session(&self) -> Option<WalletSession> {
        self.inner().session.clone()
    }

    pub fn account(&self) -> Option<SmartAccountRecord> {
        self.inner().account.clone()
    }

    /// Message recorded by the most recent failed operation.
    pub fn last_error(&self) -> Option<String> {
        self.inner().last_error.clone()
    }

    /// The provider capability handle, usable only while `Connected`.
    pub fn provider(&self) -> Result<Arc<dyn WalletProvider>, SessionError> {
        if self.inner().state != SessionState::Connected {
            return Err(SessionError::SessionNotReady(
                "wallet is not connected".into(),
            ));
        }
        self.provider
            .clone()
            .ok_or(SessionError::ProviderUnavailable)
    }

    // ─── lifecycle ───────────────────────────────────────────────────

    /// Connects through the provider and establishes a session.
    ///
    /// Only one attempt is in flight at a time: a caller issuing
    /// `connect` while another attempt is unresolved queues behind it
    /// and receives the session that attempt established, without a
    /// second account request reaching the provider.
    pub async fn connect(&self) -> Result<WalletSession, SessionError> {
        let _attempt = self.connect_gate.lock().await;

        {
            let mut inner = self.inner();
            if inner.state == SessionState::Connected {
                if let Some(session) = inner.session.clone() {
                    return Ok(session);
                }
            }
            inner.state = SessionState::Connecting;
            inner.last_error = None;
        }

        let Some(provider) = self.provider.clone() else {
            return Err(self.fail(SessionError::ProviderUnavailable));
        };

        let accounts = match provider.request_accounts().await {
            Ok(accounts) => accounts,
            Err(failure) => return Err(self.fail(failure.into())),
        };
        let Some(owner) = accounts.into_iter().next() else {
            return Err(self.fail(SessionError::Provider(
                "provider returned no accounts".into(),
            )));
        };

        self.establish(&provider, &owner).await
    }

    /// Non-interactive reconnect: probes for already-authorized
    /// accounts and establishes a session when one is available.
    /// Returns `Ok(None)` when there is no provider capability or no
    /// authorized account.
    pub async fn try_resume(&self) -> Result<Option<WalletSession>, SessionError> {
        let _attempt = self.connect_gate.lock().await;

        {
            let inner = self.inner();
            if inner.state == SessionState::Connected {
                return Ok(inner.session.clone());
            }
        }

        let Some(provider) = self.provider.clone() else {
            return Ok(None);
        };

        let accounts = match provider.current_accounts().await {
            Ok(accounts) => accounts,
            Err(failure) => return Err(self.fail(failure.into())),
        };
        let Some(owner) = accounts.into_iter().next() else {
            return Ok(None);
        };

        self.establish(&provider, &owner).await.map(Some)
    }

    /// Tears the session down: releases the event registrations and
    /// clears the session and account record. Safe to call in any
    /// state.
    pub fn disconnect(&self) {
        self.teardown();
    }

    /// Applies a provider notification to the live session.
    ///
    /// Notifications arriving while no session is `Connected` are stale
    /// callbacks from a torn-down session and are dropped.
    pub fn handle_notification(
        &self,
        notification: ProviderNotification,
    ) -> Result<(), SessionError> {
        if self.inner().state != SessionState::Connected {
            return Ok(());
        }

        match notification {
            // Derived addresses and balances are chain-specific: a
            // chain switch is a hard reset and the caller must issue
            // `connect` again.
            ProviderNotification::ChainChanged(_) => {
                self.teardown();
                Ok(())
            }
            ProviderNotification::Disconnect => {
                self.teardown();
                Ok(())
            }
            ProviderNotification::AccountsChanged(accounts) => {
                let Some(new_owner) = accounts.into_iter().next() else {
                    // The provider revoked access to every account.
                    self.teardown();
                    return Ok(());
                };
                self.switch_owner(&new_owner)
            }
        }
    }

    // ─── internals ───────────────────────────────────────────────────

    /// Validates the owner, resolves the network, registers the three
    /// provider notifications, and settles the machine in `Connected`.
    async fn establish(
        &self,
        provider: &Arc<dyn WalletProvider>,
        owner: &str,
    ) -> Result<WalletSession, SessionError> {
        let owner_bytes = match evm_core::address::parse_address(owner) {
            Ok(bytes) => bytes,
            Err(e) => {
                return Err(self.fail(SessionError::Provider(format!(
                    "provider returned a malformed account: {e}"
                ))))
            }
        };
        let owner = evm_core::address::checksum_address(&owner_bytes);

        let network = match provider.network().await {
            Ok(network) => network,
            Err(failure) => return Err(self.fail(failure.into())),
        };
        let network_name = resolve_network_name(&network);

        for event in EVENTS {
            provider.subscribe(event);
        }

        let mut inner = self.inner();
        inner.generation += 1;
        let session = WalletSession {
            owner,
            chain_id: network.chain_id,
            network_name,
            generation: inner.generation,
        };
        inner.session = Some(session.clone());
        inner.state = SessionState::Connected;
        inner.subscribed = true;
        inner.last_error = None;
        Ok(session)
    }

    /// `Reconnecting` transition: the provider reports a different
    /// active account for the live session. The account record belongs
    /// to the previous owner and is dropped.
    fn switch_owner(&self, new_owner: &str) -> Result<(), SessionError> {
        {
            let inner = self.inner();
            match &inner.session {
                Some(session) if !session.owner.eq_ignore_ascii_case(new_owner) => {}
                _ => return Ok(()),
            }
        }

        self.inner().state = SessionState::Reconnecting;

        let owner_bytes = match evm_core::address::parse_address(new_owner) {
            Ok(bytes) => bytes,
            Err(e) => {
                return Err(self.fail(SessionError::Provider(format!(
                    "provider returned a malformed account: {e}"
                ))))
            }
        };
        let owner = evm_core::address::checksum_address(&owner_bytes);

        let mut inner = self.inner();
        inner.generation += 1;
        let generation = inner.generation;
        if let Some(session) = inner.session.as_mut() {
            session.owner = owner;
            session.generation = generation;
        }
        inner.account = None;
        inner.state = SessionState::Connected;
        Ok(())
    }

    /// Records the failure, passes the machine through `Error`, and
    /// settles it back in `Disconnected` so it stays recoverable.
    fn fail(&self, error: SessionError) -> SessionError {
        {
            let mut inner = self.inner();
            inner.state = SessionState::Error;
            inner.last_error = Some(error.to_string());
        }
        self.teardown();
        error
    }

    fn teardown(&self) {
        let was_subscribed = {
            let mut inner = self.inner();
            let was = inner.subscribed;
            inner.subscribed = false;
            inner.state = SessionState::Disconnected;
            inner.session = None;
            inner.account = None;
            was
        };
        if was_subscribed {
            if let Some(provider) = &self.provider {
                for event in EVENTS {
                    provider.unsubscribe(event);
                }
            }
        }
    }

    /// Owner and generation of the live session.
    pub(crate) fn connected_session(&self) -> Result<(String, u64), SessionError> {
        let inner = self.inner();
        match (&inner.state, &inner.session) {
            (SessionState::Connected, Some(session)) => {
                Ok((session.owner.clone(), session.generation))
            }
            _ => Err(SessionError::SessionNotReady(
                "wallet is not connected".into(),
            )),
        }
    }

    /// Fails unless the live session still matches `generation`.
    pub(crate) fn ensure_generation(&self, generation: u64) -> Result<(), SessionError> {
        let inner = self.inner();
        match (&inner.state, &inner.session) {
            (SessionState::Connected, Some(session)) if session.generation == generation => Ok(()),
            (SessionState::Connected, Some(_)) => Err(SessionError::SessionNotReady(
                "session changed while the operation was in flight".into(),
            )),
            _ => Err(SessionError::SessionNotReady(
                "wallet is not connected".into(),
            )),
        }
    }

    pub(crate) fn store_account(&self, record: SmartAccountRecord) {
        self.inner().account = Some(record);
    }
}

/// Known-registry names win over whatever the provider reports; an
/// unknown chain falls back to the provider string or a bare id.
fn resolve_network_name(network: &NetworkInfo) -> String {
    if let Some(name) = evm_core::chains::name(network.chain_id) {
        return name.to_string();
    }
    let provider_name = network.name.trim();
    if !provider_name.is_empty() {
        return provider_name.to_string();
    }
    format!("chain {}", network.chain_id)
}
