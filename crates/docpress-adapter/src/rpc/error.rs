/*
[INPUT]:  Error sources (HTTP, JSON-RPC, serialization, ABI, wallet state)
[OUTPUT]: Structured error types for the wallet/contract bridge
[POS]:    Error handling layer - unified error type for entire crate
[UPDATE]: When adding new error sources or improving error messages
*/

use reqwest::StatusCode;
use thiserror::Error;

/// JSON-RPC error code wallets return when the user dismisses a prompt (EIP-1193).
pub const USER_REJECTED_CODE: i64 = 4001;

/// Main error type for the DocPress adapter
#[derive(Error, Debug)]
pub enum DocpressError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Endpoint answered with a non-success status
    #[error("HTTP status {code}: {message}")]
    Status { code: u16, message: String },

    /// JSON-RPC error object returned by the node or wallet
    #[error("JSON-RPC error (code {code}): {message}")]
    Rpc { code: i64, message: String },

    /// Serialization/deserialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Contract return data could not be decoded
    #[error("ABI decoding failed: {0}")]
    Abi(#[from] alloy_sol_types::Error),

    /// Invalid response from the node
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Operation needs an active wallet connection
    #[error("Wallet not connected")]
    NotConnected,

    /// Provider granted access but exposed no account
    #[error("Wallet returned no accounts")]
    NoAccounts,

    /// Transaction was mined with a failure status
    #[error("Transaction {hash} reverted")]
    TransactionReverted { hash: String },
}

impl DocpressError {
    /// Check if the wallet user declined the request
    pub fn is_user_rejection(&self) -> bool {
        matches!(self, DocpressError::Rpc { code, .. } if *code == USER_REJECTED_CODE)
    }

    /// Check if the error came from the transport rather than the chain
    pub fn is_transport_error(&self) -> bool {
        matches!(
            self,
            DocpressError::Http(_) | DocpressError::Status { .. } | DocpressError::InvalidResponse(_)
        )
    }

    /// Create a status error from an HTTP status code and body
    pub fn status_error(status: StatusCode, message: impl Into<String>) -> Self {
        DocpressError::Status {
            code: status.as_u16(),
            message: message.into(),
        }
    }
}

/// Result type alias for DocPress adapter operations
pub type Result<T> = std::result::Result<T, DocpressError>;
