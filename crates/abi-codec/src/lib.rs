//! General-purpose calldata encoding for EVM contract calls.
//!
//! This crate builds complete calldata from a function name and typed
//! parameters: a Keccak-256 selector followed by the parameter block in
//! head/tail layout. A raw-hex passthrough covers callers that bring
//! pre-encoded calldata of their own.

pub mod encode;
pub mod error;
pub mod param;
