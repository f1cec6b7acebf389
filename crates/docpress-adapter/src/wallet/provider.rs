/*
[INPUT]:  Account access requests
[OUTPUT]: Granted accounts and account-change events
[POS]:    Wallet layer - wallet provider abstraction
[UPDATE]: When adding provider types or changing the event model
*/

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use alloy_primitives::Address;
use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::rpc::{DocpressError, Result, USER_REJECTED_CODE};

const ACCOUNT_EVENT_CAPACITY: usize = 16;

/// Trait for wallet providers (browser-injected, node-backed, test doubles)
///
/// Mirrors the EIP-1193 surface the bridge needs: account access plus an
/// `accountsChanged` event stream.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Human readable provider name, used in logs
    fn name(&self) -> &str;

    /// Ask the user for account access (`eth_requestAccounts`)
    async fn request_accounts(&self) -> Result<Vec<Address>>;

    /// Subscribe to account changes; an empty list means the wallet disconnected
    fn subscribe_accounts(&self) -> broadcast::Receiver<Vec<Address>>;
}

/// Mock wallet provider for testing and offline demos
#[derive(Debug)]
pub struct MockWalletProvider {
    accounts: Mutex<Vec<Address>>,
    reject_requests: AtomicBool,
    events: broadcast::Sender<Vec<Address>>,
}

impl MockWalletProvider {
    /// Create a provider that grants the given accounts
    pub fn new(accounts: Vec<Address>) -> Self {
        let (events, _) = broadcast::channel(ACCOUNT_EVENT_CAPACITY);
        Self {
            accounts: Mutex::new(accounts),
            reject_requests: AtomicBool::new(false),
            events,
        }
    }

    /// Simulate the user dismissing the connection prompt
    pub fn reject_requests(&self, reject: bool) {
        self.reject_requests.store(reject, Ordering::SeqCst);
    }

    /// Simulate an account switch (or a disconnect with an empty list)
    pub fn switch_accounts(&self, accounts: Vec<Address>) {
        *self.accounts.lock().unwrap_or_else(|e| e.into_inner()) = accounts.clone();
        // No subscribers is fine
        let _ = self.events.send(accounts);
    }
}

#[async_trait]
impl WalletProvider for MockWalletProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn request_accounts(&self) -> Result<Vec<Address>> {
        if self.reject_requests.load(Ordering::SeqCst) {
            return Err(DocpressError::Rpc {
                code: USER_REJECTED_CODE,
                message: "User rejected the request.".to_string(),
            });
        }
        Ok(self.accounts.lock().unwrap_or_else(|e| e.into_inner()).clone())
    }

    fn subscribe_accounts(&self) -> broadcast::Receiver<Vec<Address>> {
        self.events.subscribe()
    }
}
