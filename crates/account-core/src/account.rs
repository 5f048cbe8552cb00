//! Counterfactual smart-account derivation.
//!
//! The account address is computed before any deployment from the owner
//! address and a 32-byte salt: Keccak-256 over the owner's 20 bytes
//! concatenated with the low 20 bytes of the salt, taking the low 20
//! bytes of the digest. The same owner and salt always yield the same
//! address, independent of call order or wall-clock time.

use serde::Serialize;
use sha3::{Digest, Keccak256};

use evm_core::address::{checksum_address, parse_address};
use evm_core::error::EvmError;

use crate::error::SessionError;
use crate::session::WalletConnection;

/// ERC-4337 EntryPoint v0.6, the default entry contract for new
/// accounts.
pub const DEFAULT_ENTRY_POINT: &str = "0x5FF137D4b0FDCD49DcA30c7CF57E578a026d2789";

/// A derived smart account, valid for the session that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SmartAccountRecord {
    /// Counterfactual account address.
    pub address: String,
    /// Owner the account was derived for.
    pub owner: String,
    /// Entry contract the account is bound to.
    pub entry_point: String,
    /// Derivation salt as 0x-prefixed hex.
    pub salt: String,
}

/// Runs the canonical address check, prefixing failures with the name
/// of the offending parameter.
fn named_address(param: &str, value: &str) -> Result<[u8; 20], SessionError> {
    parse_address(value).map_err(|e| match e {
        EvmError::InvalidAddress(reason) => {
            SessionError::InvalidAddress(format!("{param}: {reason}"))
        }
        other => SessionError::from(other),
    })
}

/// Deterministic deployment salt for an owner and deployment index.
///
/// The salt is the Keccak-256 hash of the owner's bytes followed by the
/// big-endian index, so the same (owner, index) pair always maps to the
/// same salt. A caller wanting a second account for the same owner
/// passes a different index.
pub fn deployment_salt(owner: &str, index: u64) -> Result<[u8; 32], SessionError> {
    let owner_bytes = named_address("owner", owner)?;

    let mut hasher = Keccak256::new();
    hasher.update(owner_bytes);
    hasher.update(index.to_be_bytes());
    Ok(hasher.finalize().into())
}

/// Derives the counterfactual account address for an owner and salt.
///
/// Pure and total over valid inputs: the only failure is address
/// validation, raised before any hashing.
pub fn derive_account_address(owner: &str, salt: &[u8; 32]) -> Result<String, SessionError> {
    let owner_bytes = named_address("owner", owner)?;

    let mut preimage = [0u8; 40];
    preimage[..20].copy_from_slice(&owner_bytes);
    preimage[20..].copy_from_slice(&salt[12..]);

    let digest = Keccak256::digest(preimage);
    let mut address = [0u8; 20];
    address.copy_from_slice(&digest[12..]);
    Ok(checksum_address(&address))
}

impl WalletConnection {
    /// Derives the smart account for the current owner and stores it as
    /// the session's active record, replacing any previous one.
    pub fn derive_account(
        &self,
        entry_point: &str,
        index: u64,
    ) -> Result<SmartAccountRecord, SessionError> {
        let (owner, _generation) = self.connected_session()?;
        let entry_bytes = named_address("entry point", entry_point)?;

        let salt = deployment_salt(&owner, index)?;
        let record = SmartAccountRecord {
            address: derive_account_address(&owner, &salt)?,
            owner,
            entry_point: checksum_address(&entry_bytes),
            salt: format!("0x{}", hex::encode(salt)),
        };
        self.store_account(record.clone());
        Ok(record)
    }
}
