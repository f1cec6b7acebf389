/*
[INPUT]:  JSON-RPC client pointed at a wallet-backed node
[OUTPUT]: Account access and polled account-change events
[POS]:    Wallet layer - JSON-RPC wallet provider implementation
[UPDATE]: When account discovery or polling behaviour changes
*/

use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::Address;
use async_trait::async_trait;
use serde_json::json;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::WalletProvider;
use crate::rpc::{JsonRpcClient, Result};

const ACCOUNT_EVENT_CAPACITY: usize = 16;

/// Wallet provider backed by a JSON-RPC endpoint that holds the keys
/// (a local dev node, or a wallet exposing an RPC bridge).
///
/// HTTP has no push channel, so `accountsChanged` is emulated by
/// [`HttpWalletProvider::watch_accounts`] polling `eth_accounts`.
#[derive(Debug)]
pub struct HttpWalletProvider {
    client: Arc<JsonRpcClient>,
    events: broadcast::Sender<Vec<Address>>,
}

impl HttpWalletProvider {
    pub fn new(client: Arc<JsonRpcClient>) -> Self {
        let (events, _) = broadcast::channel(ACCOUNT_EVENT_CAPACITY);
        Self { client, events }
    }

    /// Accounts currently exposed, without prompting (`eth_accounts`)
    pub async fn accounts(&self) -> Result<Vec<Address>> {
        self.client.request("eth_accounts", json!([])).await
    }

    /// Poll `eth_accounts` and publish every change until cancelled.
    ///
    /// The first successful poll only sets the baseline.
    pub fn watch_accounts(
        self: Arc<Self>,
        interval: Duration,
        cancel: CancellationToken,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            let mut last: Option<Vec<Address>> = None;
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = ticker.tick() => {}
                }

                let accounts = match self.accounts().await {
                    Ok(accounts) => accounts,
                    Err(err) => {
                        warn!(error = %err, "failed to poll wallet accounts");
                        continue;
                    }
                };

                if last.as_ref().is_some_and(|previous| *previous != accounts) {
                    info!(count = accounts.len(), "wallet accounts changed");
                    let _ = self.events.send(accounts.clone());
                }
                last = Some(accounts);
            }
            debug!("account watcher stopped");
        })
    }
}

#[async_trait]
impl WalletProvider for HttpWalletProvider {
    fn name(&self) -> &str {
        "json-rpc"
    }

    async fn request_accounts(&self) -> Result<Vec<Address>> {
        self.client.request("eth_requestAccounts", json!([])).await
    }

    fn subscribe_accounts(&self) -> broadcast::Receiver<Vec<Address>> {
        self.events.subscribe()
    }
}
