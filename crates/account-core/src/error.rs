use alloy_primitives::U256;
use thiserror::Error;

use evm_core::error::EvmError;

use crate::provider::ProviderFailure;

/// Session, validation and funding errors surfaced by the core.
///
/// Validation errors are produced locally before any provider call;
/// provider-originated failures pass through unchanged with the session
/// left in a recoverable state.
#[derive(Debug, Error)]
pub enum SessionError {
    /// No wallet-provider capability is present.
    #[error("wallet provider unavailable")]
    ProviderUnavailable,

    /// The user declined the account-access prompt.
    #[error("user rejected the connection request")]
    UserRejected,

    /// The provider failed; the underlying message passes through.
    #[error("provider error: {0}")]
    Provider(String),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("session not ready: {0}")]
    SessionNotReady(String),

    /// The owner balance cannot cover the requested amount.
    #[error("insufficient funds: required {required} wei, available {available} wei, short {shortfall} wei")]
    InsufficientFunds {
        required: U256,
        available: U256,
        shortfall: U256,
    },
}

impl From<EvmError> for SessionError {
    fn from(e: EvmError) -> Self {
        match e {
            EvmError::InvalidAddress(reason) => SessionError::InvalidAddress(reason),
            EvmError::InvalidAmount(reason) => SessionError::InvalidAmount(reason),
        }
    }
}

impl From<ProviderFailure> for SessionError {
    fn from(e: ProviderFailure) -> Self {
        match e {
            ProviderFailure::Rejected => SessionError::UserRejected,
            ProviderFailure::Other(message) => SessionError::Provider(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_provider_unavailable() {
        assert_eq!(
            SessionError::ProviderUnavailable.to_string(),
            "wallet provider unavailable"
        );
    }

    #[test]
    fn display_insufficient_funds() {
        let err = SessionError::InsufficientFunds {
            required: U256::from(10u8),
            available: U256::from(4u8),
            shortfall: U256::from(6u8),
        };
        assert_eq!(
            err.to_string(),
            "insufficient funds: required 10 wei, available 4 wei, short 6 wei"
        );
    }

    #[test]
    fn evm_errors_map_to_validation_variants() {
        let err: SessionError = EvmError::InvalidAddress("bad checksum".into()).into();
        assert!(matches!(err, SessionError::InvalidAddress(_)));

        let err: SessionError = EvmError::InvalidAmount("not a number".into()).into();
        assert!(matches!(err, SessionError::InvalidAmount(_)));
    }

    #[test]
    fn provider_failures_map_to_session_variants() {
        let err: SessionError = ProviderFailure::Rejected.into();
        assert!(matches!(err, SessionError::UserRejected));

        let err: SessionError = ProviderFailure::Other("rpc exploded".into()).into();
        match err {
            SessionError::Provider(message) => assert_eq!(message, "rpc exploded"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn error_trait_is_implemented() {
        let err: Box<dyn std::error::Error> = Box::new(SessionError::UserRejected);
        assert!(err.to_string().contains("rejected"));
    }
}
