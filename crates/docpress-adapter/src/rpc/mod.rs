/*
[INPUT]:  JSON-RPC endpoint configuration
[OUTPUT]: JSON-RPC client and crate-wide error types
[POS]:    RPC layer - node/wallet communication
[UPDATE]: When changing transport or error handling
*/

pub mod client;
pub mod error;

pub use client::{ClientConfig, JsonRpcClient};
pub use error::{DocpressError, Result, USER_REJECTED_CODE};

/// Parse a JSON-RPC hex quantity (`"0x1b4"`).
pub fn parse_quantity(value: &str) -> Result<u64> {
    let digits = value
        .strip_prefix("0x")
        .ok_or_else(|| DocpressError::InvalidResponse(format!("quantity without 0x prefix: {value}")))?;
    u64::from_str_radix(digits, 16)
        .map_err(|e| DocpressError::InvalidResponse(format!("invalid quantity {value}: {e}")))
}
