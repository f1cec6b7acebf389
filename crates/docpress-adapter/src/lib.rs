/*
[INPUT]:  Crate modules and public type definitions
[OUTPUT]: Public DocPress adapter crate surface
[POS]:    Crate root - module wiring
[UPDATE]: When public modules or exports change
*/

pub mod bridge;
pub mod contract;
pub mod notify;
pub mod rpc;
pub mod types;
pub mod wallet;

pub use alloy_primitives::{Address, TxHash};

// Re-export commonly used types from bridge
pub use bridge::{BoundContract, WalletBridge, WalletConnection, spawn_account_listener};

// Re-export commonly used types from contract
pub use contract::{CertificateRegistry, MockCertificateRegistry, RpcCertificateRegistry};

pub use notify::{Notification, NotificationVariant, Notifier, ToastQueue};

// Re-export commonly used types from rpc
pub use rpc::{ClientConfig, DocpressError, JsonRpcClient, Result};

// Re-export all types
pub use types::*;

// Re-export commonly used types from wallet
pub use wallet::{HttpWalletProvider, MockWalletProvider, WalletProvider};
