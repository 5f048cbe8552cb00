//! Balance validation and the transaction dispatch boundary.
//!
//! Every value-moving operation passes through [`WalletConnection::check_and_quote`]
//! before dispatch: the amount is converted to base units with exact
//! integer arithmetic, the session gate is checked, and fresh balances
//! are read through the provider. Quotes carry the session generation
//! they were taken under; dispatch refuses a quote whose generation no
//! longer matches the live session.

use alloy_primitives::U256;
use serde::Serialize;

use abi_codec::encode::EncodedCall;
use evm_core::address::{checksum_address, parse_address};
use evm_core::units::{format_wei, parse_eth};

use crate::error::SessionError;
use crate::provider::TransactionRequest;
use crate::session::WalletConnection;

/// The result of a successful funding check: fresh balances plus the
/// session generation the snapshot belongs to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FundingQuote {
    /// Owner balance in base units.
    pub owner_balance: U256,
    /// Smart-account balance in base units.
    pub account_balance: U256,
    /// Requested amount in base units.
    pub amount: U256,
    pub generation: u64,
}

impl FundingQuote {
    /// Owner balance as a decimal ETH string.
    pub fn owner_balance_eth(&self) -> String {
        format_wei(self.owner_balance)
    }

    /// Smart-account balance as a decimal ETH string.
    pub fn account_balance_eth(&self) -> String {
        format_wei(self.account_balance)
    }
}

impl WalletConnection {
    /// Validates a proposed value transfer and takes a fresh balance
    /// snapshot.
    ///
    /// Validation order: the amount must parse and be strictly
    /// positive, the account must pass the canonical address check, and
    /// the session must be `Connected` — all before any provider call.
    /// The snapshot is never cached: every invocation issues exactly
    /// two balance queries (owner, then account).
    pub async fn check_and_quote(
        &self,
        account: &str,
        amount_decimal: &str,
    ) -> Result<FundingQuote, SessionError> {
        let amount = parse_eth(amount_decimal)?;
        if amount.is_zero() {
            return Err(SessionError::InvalidAmount(
                "amount must be greater than zero".into(),
            ));
        }
        let account = checksum_address(&parse_address(account)?);

        let (owner, generation) = self.connected_session()?;
        let provider = self.provider()?;

        let owner_balance = provider.balance_of(&owner).await?;
        let account_balance = provider.balance_of(&account).await?;

        // The queries are suspend points; a session reset while they
        // were in flight invalidates the snapshot.
        self.ensure_generation(generation)?;

        if owner_balance < amount {
            return Err(SessionError::InsufficientFunds {
                required: amount,
                available: owner_balance,
                shortfall: amount - owner_balance,
            });
        }

        Ok(FundingQuote {
            owner_balance,
            account_balance,
            amount,
            generation,
        })
    }

    /// Dispatches a transaction under a previously taken snapshot's
    /// generation.
    pub async fn submit(
        &self,
        request: TransactionRequest,
        generation: u64,
    ) -> Result<String, SessionError> {
        self.ensure_generation(generation)?;
        let provider = self.provider()?;
        Ok(provider.send_transaction(request).await?)
    }

    /// Funds the derived smart account with the given ETH amount.
    pub async fn fund_account(&self, amount_decimal: &str) -> Result<String, SessionError> {
        let record = self.require_account()?;
        let quote = self.check_and_quote(&record.address, amount_decimal).await?;
        self.submit(
            TransactionRequest {
                to: record.address,
                value: quote.amount,
                data: Vec::new(),
            },
            quote.generation,
        )
        .await
    }

    /// Sends ETH from the owner to an arbitrary recipient.
    pub async fn transfer(&self, to: &str, amount_decimal: &str) -> Result<String, SessionError> {
        let to = checksum_address(&parse_address(to)?);
        let quote = self.check_and_quote(&to, amount_decimal).await?;
        self.submit(
            TransactionRequest {
                to,
                value: quote.amount,
                data: Vec::new(),
            },
            quote.generation,
        )
        .await
    }

    /// Executes a contract call through the smart account.
    ///
    /// A zero-value call spends nothing and skips the balance queries;
    /// it still requires a `Connected` session and a derived record.
    pub async fn execute(
        &self,
        contract: &str,
        value_decimal: &str,
        call: &EncodedCall,
    ) -> Result<String, SessionError> {
        let record = self.require_account()?;
        let contract = checksum_address(&parse_address(contract)?);
        let value = parse_eth(value_decimal)?;

        let generation = if value.is_zero() {
            let (_owner, generation) = self.connected_session()?;
            generation
        } else {
            self.check_and_quote(&record.address, value_decimal)
                .await?
                .generation
        };

        self.submit(
            TransactionRequest {
                to: contract,
                value,
                data: call.data.clone(),
            },
            generation,
        )
        .await
    }

    fn require_account(&self) -> Result<crate::account::SmartAccountRecord, SessionError> {
        self.account().ok_or_else(|| {
            SessionError::SessionNotReady("no smart account derived".into())
        })
    }
}
