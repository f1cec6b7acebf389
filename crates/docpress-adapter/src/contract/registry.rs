/*
[INPUT]:  Certificate records and the sending account
[OUTPUT]: Transaction hashes, receipts and verification answers
[POS]:    Contract layer - port for the certificate registry contract
[UPDATE]: When the contract gains methods or the test double changes
*/

use std::collections::HashMap;
use std::sync::Mutex;

use alloy_primitives::{Address, TxHash, keccak256};
use async_trait::async_trait;

use crate::rpc::{DocpressError, Result};
use crate::types::{CertificateRecord, TxReceipt};

/// Port for the deployed certificate contract.
///
/// State-changing calls return as soon as the transaction is accepted;
/// `wait_for_confirmation` blocks until it is mined.
#[async_trait]
pub trait CertificateRegistry: Send + Sync {
    /// Address the contract is deployed at
    fn address(&self) -> Address;

    async fn issue_certificate(&self, from: Address, record: &CertificateRecord) -> Result<TxHash>;

    async fn verify_certificate(&self, from: Address, record: &CertificateRecord) -> Result<bool>;

    async fn revoke_certificate(&self, from: Address, record: &CertificateRecord) -> Result<TxHash>;

    async fn wait_for_confirmation(&self, tx_hash: TxHash) -> Result<TxReceipt>;
}

#[derive(Debug, Default)]
struct MockRegistryState {
    /// record -> still active
    certificates: HashMap<CertificateRecord, bool>,
    /// submitted, not yet confirmed: hash -> success
    pending: HashMap<TxHash, bool>,
    nonce: u64,
    block: u64,
    fail_next_submission: bool,
    fail_reads: bool,
    verify_calls: usize,
}

/// In-memory registry behaving like the deployed contract.
///
/// Issuing an active certificate or revoking an unknown/revoked one is
/// mined with a failed status, as a reverting contract would be.
#[derive(Debug, Default)]
pub struct MockCertificateRegistry {
    address: Address,
    state: Mutex<MockRegistryState>,
}

impl MockCertificateRegistry {
    pub fn new(address: Address) -> Self {
        Self {
            address,
            state: Mutex::new(MockRegistryState::default()),
        }
    }

    /// Make the next issue/revoke submission fail at the RPC level
    pub fn fail_next_submission(&self) {
        self.lock().fail_next_submission = true;
    }

    /// Make verification reads fail until switched back
    pub fn fail_reads(&self, fail: bool) {
        self.lock().fail_reads = fail;
    }

    /// Whether the record is currently issued and not revoked
    pub fn is_active(&self, record: &CertificateRecord) -> bool {
        self.lock().certificates.get(record).copied().unwrap_or(false)
    }

    pub fn verify_calls(&self) -> usize {
        self.lock().verify_calls
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockRegistryState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn submit(&self, from: Address, apply: impl FnOnce(&mut MockRegistryState) -> bool) -> Result<TxHash> {
        let mut state = self.lock();
        if std::mem::take(&mut state.fail_next_submission) {
            return Err(DocpressError::Rpc {
                code: -32000,
                message: "transaction submission failed".to_string(),
            });
        }

        state.nonce += 1;
        let mut preimage = from.to_vec();
        preimage.extend_from_slice(&state.nonce.to_be_bytes());
        let tx_hash = keccak256(&preimage);

        let success = apply(&mut *state);
        state.pending.insert(tx_hash, success);
        Ok(tx_hash)
    }
}

#[async_trait]
impl CertificateRegistry for MockCertificateRegistry {
    fn address(&self) -> Address {
        self.address
    }

    async fn issue_certificate(&self, from: Address, record: &CertificateRecord) -> Result<TxHash> {
        self.submit(from, |state| {
            let active = state.certificates.entry(record.clone()).or_insert(false);
            if *active {
                return false;
            }
            *active = true;
            true
        })
    }

    async fn verify_certificate(&self, _from: Address, record: &CertificateRecord) -> Result<bool> {
        let mut state = self.lock();
        state.verify_calls += 1;
        if state.fail_reads {
            return Err(DocpressError::Rpc {
                code: -32603,
                message: "eth_call failed".to_string(),
            });
        }
        Ok(state.certificates.get(record).copied().unwrap_or(false))
    }

    async fn revoke_certificate(&self, from: Address, record: &CertificateRecord) -> Result<TxHash> {
        self.submit(from, |state| match state.certificates.get_mut(record) {
            Some(active) if *active => {
                *active = false;
                true
            }
            _ => false,
        })
    }

    async fn wait_for_confirmation(&self, tx_hash: TxHash) -> Result<TxReceipt> {
        let mut state = self.lock();
        let success = state
            .pending
            .remove(&tx_hash)
            .ok_or_else(|| DocpressError::InvalidResponse(format!("unknown transaction {tx_hash}")))?;
        state.block += 1;
        Ok(TxReceipt {
            tx_hash,
            block_number: state.block,
            success,
        })
    }
}
