/*
[INPUT]:  Wallet provider, certificate registry, notification sink
[OUTPUT]: connect/disconnect and issue/verify/revoke with user notifications
[POS]:    Bridge layer - orchestrates wallet connection and contract calls
[UPDATE]: When connection lifecycle or operation reporting changes
*/

use std::fmt;
use std::sync::{Arc, Mutex};

use alloy_primitives::{Address, TxHash};
use chrono::Utc;
use tokio::sync::RwLock;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::contract::CertificateRegistry;
use crate::notify::{Notification, Notifier};
use crate::rpc::{DocpressError, Result};
use crate::types::{
    Activity, ActivityKind, CertificateRecord, TxReceipt, VerificationOutcome, short_address,
};
use crate::wallet::WalletProvider;

/// Contract handle bound to the connected signer
#[derive(Clone)]
pub struct BoundContract {
    registry: Arc<dyn CertificateRegistry>,
    signer: Address,
}

impl BoundContract {
    pub fn new(registry: Arc<dyn CertificateRegistry>, signer: Address) -> Self {
        Self { registry, signer }
    }

    pub fn signer(&self) -> Address {
        self.signer
    }

    pub fn contract_address(&self) -> Address {
        self.registry.address()
    }

    pub async fn issue(&self, record: &CertificateRecord) -> Result<TxHash> {
        self.registry.issue_certificate(self.signer, record).await
    }

    pub async fn verify(&self, record: &CertificateRecord) -> Result<bool> {
        self.registry.verify_certificate(self.signer, record).await
    }

    pub async fn revoke(&self, record: &CertificateRecord) -> Result<TxHash> {
        self.registry.revoke_certificate(self.signer, record).await
    }

    /// Wait for the transaction to be mined; a failed status becomes an error
    pub async fn confirm(&self, tx_hash: TxHash) -> Result<TxReceipt> {
        let receipt = self.registry.wait_for_confirmation(tx_hash).await?;
        if !receipt.success {
            return Err(DocpressError::TransactionReverted {
                hash: receipt.tx_hash.to_string(),
            });
        }
        Ok(receipt)
    }
}

impl fmt::Debug for BoundContract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundContract")
            .field("contract", &self.registry.address())
            .field("signer", &self.signer)
            .finish()
    }
}

/// Live wallet session: account plus the contract bound to it
#[derive(Debug, Clone)]
pub struct WalletConnection {
    pub address: Address,
    pub contract: BoundContract,
}

#[derive(Clone)]
struct Backend {
    provider: Arc<dyn WalletProvider>,
    registry: Arc<dyn CertificateRegistry>,
}

#[derive(Debug, Clone, Copy)]
enum WriteOp {
    Issue,
    Revoke,
}

/// Wallet/contract bridge.
///
/// Every operation catches its own failures, reports them through the
/// notifier and returns a plain value; nothing is retried.
pub struct WalletBridge {
    backend: Option<Backend>,
    notifier: Arc<dyn Notifier>,
    connection: RwLock<Option<WalletConnection>>,
    activity: Mutex<Vec<Activity>>,
}

impl WalletBridge {
    /// Bridge without any wallet provider; `connect` always fails
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self {
            backend: None,
            notifier,
            connection: RwLock::new(None),
            activity: Mutex::new(Vec::new()),
        }
    }

    pub fn with_provider(
        provider: Arc<dyn WalletProvider>,
        registry: Arc<dyn CertificateRegistry>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            backend: Some(Backend { provider, registry }),
            ..Self::new(notifier)
        }
    }

    pub fn has_provider(&self) -> bool {
        self.backend.is_some()
    }

    pub async fn address(&self) -> Option<Address> {
        self.connection.read().await.as_ref().map(|c| c.address)
    }

    pub async fn is_connected(&self) -> bool {
        self.connection.read().await.is_some()
    }

    pub async fn connection(&self) -> Option<WalletConnection> {
        self.connection.read().await.clone()
    }

    /// Completed operations, oldest first
    pub fn activity(&self) -> Vec<Activity> {
        self.activity.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Request account access and bind the contract to the first account.
    ///
    /// On failure the previous state is left untouched.
    pub async fn connect(&self) -> bool {
        let Some(backend) = self.backend.clone() else {
            warn!("connect requested without a wallet provider");
            self.notifier.notify(Notification::destructive(
                "Wallet not installed",
                "Please install a wallet provider to use this application",
            ));
            return false;
        };

        match self.try_connect(&backend).await {
            Ok(address) => {
                self.notifier.notify(Notification::info(
                    "Wallet Connected",
                    format!("Connected to {}", short_address(&address)),
                ));
                true
            }
            Err(err) => {
                if err.is_user_rejection() {
                    info!(provider = backend.provider.name(), "connection request rejected");
                } else {
                    warn!(provider = backend.provider.name(), error = %err, "failed to connect wallet");
                }
                self.notifier.notify(Notification::destructive(
                    "Connection Failed",
                    "Failed to connect to the wallet",
                ));
                false
            }
        }
    }

    async fn try_connect(&self, backend: &Backend) -> Result<Address> {
        let accounts = backend.provider.request_accounts().await?;
        let address = *accounts.first().ok_or(DocpressError::NoAccounts)?;

        let contract = BoundContract::new(backend.registry.clone(), address);
        *self.connection.write().await = Some(WalletConnection { address, contract });

        info!(
            provider = backend.provider.name(),
            address = %address,
            contract = %backend.registry.address(),
            "wallet connected"
        );
        Ok(address)
    }

    /// Drop the connection; safe to call when already disconnected
    pub async fn disconnect(&self) {
        let previous = self.connection.write().await.take();
        if let Some(connection) = previous {
            info!(address = %connection.address, "wallet disconnected");
        }
        self.notifier.notify(Notification::info(
            "Wallet Disconnected",
            "Your wallet has been disconnected",
        ));
    }

    pub async fn issue_certificate(&self, record: &CertificateRecord) -> bool {
        self.write(WriteOp::Issue, record).await
    }

    pub async fn revoke_certificate(&self, record: &CertificateRecord) -> bool {
        self.write(WriteOp::Revoke, record).await
    }

    /// Boolean verification; call failures read as "not verified"
    pub async fn verify_certificate(&self, record: &CertificateRecord) -> bool {
        self.check_certificate(record).await.is_valid()
    }

    /// Verification that keeps "call failed" apart from "invalid"
    pub async fn check_certificate(&self, record: &CertificateRecord) -> VerificationOutcome {
        let Some(connection) = self.require_connection().await else {
            return VerificationOutcome::Unavailable(DocpressError::NotConnected.to_string());
        };

        match connection.contract.verify(record).await {
            Ok(valid) => {
                debug!(valid, student = %record.student_name, "certificate verified");
                self.record_activity(ActivityKind::Verify, None, record);
                if valid {
                    VerificationOutcome::Valid
                } else {
                    VerificationOutcome::Invalid
                }
            }
            Err(err) => {
                warn!(error = %err, "certificate verification call failed");
                self.notifier.notify(Notification::destructive(
                    "Verification Failed",
                    "Failed to verify certificate",
                ));
                VerificationOutcome::Unavailable(err.to_string())
            }
        }
    }

    /// React to the provider's account-change event
    pub async fn handle_accounts_changed(&self, accounts: &[Address]) {
        let current = self.address().await;
        match accounts.first() {
            None => {
                info!("wallet reported no accounts");
                self.disconnect().await;
            }
            Some(first) if current != Some(*first) => {
                info!(address = %first, "wallet account switched");
                self.connect().await;
            }
            Some(_) => {}
        }
    }

    async fn write(&self, op: WriteOp, record: &CertificateRecord) -> bool {
        let Some(connection) = self.require_connection().await else {
            return false;
        };

        let submitted = match op {
            WriteOp::Issue => connection.contract.issue(record).await,
            WriteOp::Revoke => connection.contract.revoke(record).await,
        };
        let confirmed = match submitted {
            Ok(tx_hash) => connection.contract.confirm(tx_hash).await,
            Err(err) => Err(err),
        };

        let (kind, title, description) = match op {
            WriteOp::Issue => (
                ActivityKind::Issue,
                "Certificate Issued",
                "The certificate has been successfully issued",
            ),
            WriteOp::Revoke => (
                ActivityKind::Revoke,
                "Certificate Revoked",
                "The certificate has been successfully revoked",
            ),
        };

        match confirmed {
            Ok(receipt) => {
                info!(
                    operation = %kind,
                    tx_hash = %receipt.tx_hash,
                    block = receipt.block_number,
                    "certificate transaction confirmed"
                );
                self.record_activity(kind, Some(receipt.tx_hash), record);
                self.notifier.notify(Notification::info(title, description));
                true
            }
            Err(err) => {
                warn!(operation = %kind, error = %err, "certificate transaction failed");
                let description = match kind {
                    ActivityKind::Revoke => "Failed to revoke certificate",
                    _ => "Failed to issue certificate",
                };
                self.notifier
                    .notify(Notification::destructive("Transaction Failed", description));
                false
            }
        }
    }

    async fn require_connection(&self) -> Option<WalletConnection> {
        let connection = self.connection().await;
        if connection.is_none() {
            self.notifier.notify(Notification::destructive(
                "Wallet not connected",
                "Please connect your wallet first",
            ));
        }
        connection
    }

    fn record_activity(&self, kind: ActivityKind, tx_hash: Option<TxHash>, record: &CertificateRecord) {
        let mut activity = self.activity.lock().unwrap_or_else(|e| e.into_inner());
        activity.push(Activity {
            kind,
            at: Utc::now(),
            tx_hash,
            student_name: record.student_name.clone(),
        });
    }
}

/// Forward provider account changes into the bridge until cancelled.
///
/// Returns `None` when no provider is configured. Events are handled one
/// at a time; a connect triggered here is not coordinated with a
/// concurrent user-initiated connect.
pub fn spawn_account_listener(
    bridge: Arc<WalletBridge>,
    cancel: CancellationToken,
) -> Option<JoinHandle<()>> {
    let mut events = bridge.backend.as_ref()?.provider.subscribe_accounts();
    Some(tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                event = events.recv() => match event {
                    Ok(accounts) => bridge.handle_accounts_changed(&accounts).await,
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "account listener lagged behind");
                    }
                    Err(RecvError::Closed) => break,
                },
            }
        }
        debug!("account listener stopped");
    }))
}

impl fmt::Debug for WalletBridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletBridge")
            .field("has_provider", &self.has_provider())
            .finish_non_exhaustive()
    }
}
