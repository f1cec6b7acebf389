/*
[INPUT]:  Wallet provider configuration
[OUTPUT]: Wallet provider trait and implementations
[POS]:    Wallet layer - account access for the bridge
[UPDATE]: When adding wallet provider types
*/

pub mod http_provider;
pub mod provider;

pub use http_provider::HttpWalletProvider;
pub use provider::{MockWalletProvider, WalletProvider};
