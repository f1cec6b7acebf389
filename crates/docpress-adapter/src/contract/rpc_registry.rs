/*
[INPUT]:  JSON-RPC client, contract address, confirmation policy
[OUTPUT]: Certificate registry calls executed against a live node/wallet
[POS]:    Contract layer - JSON-RPC binding of the registry port
[UPDATE]: When transaction submission or receipt polling changes
*/

use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::{Address, Bytes, TxHash};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use super::abi;
use super::CertificateRegistry;
use crate::rpc::{DocpressError, JsonRpcClient, Result, parse_quantity};
use crate::types::{CertificateRecord, TxReceipt};

const DEFAULT_CONFIRMATIONS: u64 = 1;
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RpcReceipt {
    transaction_hash: TxHash,
    block_number: Option<String>,
    /// Absent on pre-Byzantium chains
    status: Option<String>,
}

/// Certificate contract reached through `eth_sendTransaction` / `eth_call`.
///
/// Signing is left to the wallet behind the endpoint.
#[derive(Debug)]
pub struct RpcCertificateRegistry {
    client: Arc<JsonRpcClient>,
    address: Address,
    confirmations: u64,
    poll_interval: Duration,
}

impl RpcCertificateRegistry {
    pub fn new(client: Arc<JsonRpcClient>, address: Address) -> Self {
        if address.is_zero() {
            warn!("certificate contract address is the zero placeholder");
        }
        Self {
            client,
            address,
            confirmations: DEFAULT_CONFIRMATIONS,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Blocks to wait for after inclusion; values below 1 are treated as 1
    pub fn with_confirmations(mut self, confirmations: u64) -> Self {
        self.confirmations = confirmations.max(1);
        self
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    fn call_object(&self, from: Address, data: &[u8]) -> serde_json::Value {
        json!({
            "from": from,
            "to": self.address,
            "data": format!("0x{}", hex::encode(data)),
        })
    }

    async fn send_transaction(&self, from: Address, data: Vec<u8>) -> Result<TxHash> {
        let tx_hash: TxHash = self
            .client
            .request("eth_sendTransaction", json!([self.call_object(from, &data)]))
            .await?;
        debug!(%tx_hash, %from, "transaction submitted");
        Ok(tx_hash)
    }

    async fn block_number(&self) -> Result<u64> {
        let head: String = self.client.request("eth_blockNumber", json!([])).await?;
        parse_quantity(&head)
    }
}

#[async_trait]
impl CertificateRegistry for RpcCertificateRegistry {
    fn address(&self) -> Address {
        self.address
    }

    async fn issue_certificate(&self, from: Address, record: &CertificateRecord) -> Result<TxHash> {
        self.send_transaction(from, abi::encode_issue(record)).await
    }

    async fn verify_certificate(&self, from: Address, record: &CertificateRecord) -> Result<bool> {
        let data = abi::encode_verify(record);
        let output: Bytes = self
            .client
            .request("eth_call", json!([self.call_object(from, &data), "latest"]))
            .await?;
        abi::decode_verify_result(&output)
    }

    async fn revoke_certificate(&self, from: Address, record: &CertificateRecord) -> Result<TxHash> {
        self.send_transaction(from, abi::encode_revoke(record)).await
    }

    async fn wait_for_confirmation(&self, tx_hash: TxHash) -> Result<TxReceipt> {
        let (receipt, block_number) = loop {
            let receipt: Option<RpcReceipt> = self
                .client
                .request("eth_getTransactionReceipt", json!([tx_hash]))
                .await?;
            if let Some(receipt) = receipt {
                if let Some(block) = receipt.block_number.as_deref() {
                    let block_number = parse_quantity(block)?;
                    break (receipt, block_number);
                }
            }
            tokio::time::sleep(self.poll_interval).await;
        };

        let target = block_number
            .checked_add(self.confirmations - 1)
            .ok_or_else(|| {
                DocpressError::InvalidResponse(format!(
                    "confirmation target overflows past block {block_number}"
                ))
            })?;
        while self.block_number().await? < target {
            tokio::time::sleep(self.poll_interval).await;
        }

        let success = match receipt.status.as_deref() {
            Some(status) => parse_quantity(status)? == 1,
            None => true,
        };
        debug!(%tx_hash, block_number, success, "transaction confirmed");

        Ok(TxReceipt {
            tx_hash: receipt.transaction_hash,
            block_number,
            success,
        })
    }
}
