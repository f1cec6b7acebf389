/*
[INPUT]:  Mock JSON-RPC responses
[OUTPUT]: Test results for the JSON-RPC wallet provider and contract binding
[POS]:    Integration tests - node/wallet communication
[UPDATE]: When RPC methods or receipt handling change
*/

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{
    TEST_TX_HASH, abi_bool, receipt, rpc_error, rpc_method, rpc_result, sample_record,
    setup_mock_server, test_account,
};
use docpress_adapter::{
    Address, CertificateRegistry, DocpressError, HttpWalletProvider, JsonRpcClient,
    RpcCertificateRegistry, ToastQueue, TxHash, WalletBridge, WalletProvider,
};
use serde_json::json;
use tokio_test::assert_ok;
use tokio_util::sync::CancellationToken;
use wiremock::MockServer;

fn client_for(server: &MockServer) -> Arc<JsonRpcClient> {
    Arc::new(JsonRpcClient::new(&server.uri()).unwrap())
}

fn registry_for(server: &MockServer) -> RpcCertificateRegistry {
    RpcCertificateRegistry::new(client_for(server), Address::ZERO)
        .with_poll_interval(Duration::from_millis(10))
}

#[tokio::test]
async fn test_request_accounts() {
    let server = setup_mock_server().await;
    rpc_method("eth_requestAccounts")
        .respond_with(rpc_result(json!([common::TEST_ACCOUNT])))
        .expect(1)
        .mount(&server)
        .await;

    let provider = HttpWalletProvider::new(client_for(&server));
    let accounts = assert_ok!(provider.request_accounts().await);
    assert_eq!(accounts, vec![test_account()]);
}

#[tokio::test]
async fn test_user_rejection_is_reported() {
    let server = setup_mock_server().await;
    rpc_method("eth_requestAccounts")
        .respond_with(rpc_error(4001, "User rejected the request."))
        .mount(&server)
        .await;

    let provider = HttpWalletProvider::new(client_for(&server));
    let err = provider.request_accounts().await.unwrap_err();
    assert!(err.is_user_rejection());
}

#[tokio::test]
async fn test_http_status_error() {
    let server = setup_mock_server().await;
    rpc_method("eth_accounts")
        .respond_with(wiremock::ResponseTemplate::new(503).set_body_string("unavailable"))
        .mount(&server)
        .await;

    let provider = HttpWalletProvider::new(client_for(&server));
    match provider.accounts().await.unwrap_err() {
        DocpressError::Status { code, message } => {
            assert_eq!(code, 503);
            assert_eq!(message, "unavailable");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_issue_waits_for_receipt() {
    let server = setup_mock_server().await;
    rpc_method("eth_sendTransaction")
        .respond_with(rpc_result(json!(TEST_TX_HASH)))
        .expect(1)
        .mount(&server)
        .await;
    // Pending once, then mined
    rpc_method("eth_getTransactionReceipt")
        .respond_with(rpc_result(serde_json::Value::Null))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    rpc_method("eth_getTransactionReceipt")
        .respond_with(rpc_result(receipt("0x1")))
        .mount(&server)
        .await;
    rpc_method("eth_blockNumber")
        .respond_with(rpc_result(json!("0x10")))
        .mount(&server)
        .await;

    let registry = registry_for(&server);
    let tx_hash = assert_ok!(registry.issue_certificate(test_account(), &sample_record()).await);
    assert_eq!(tx_hash, TEST_TX_HASH.parse::<TxHash>().unwrap());

    let mined = assert_ok!(registry.wait_for_confirmation(tx_hash).await);
    assert!(mined.success);
    assert_eq!(mined.block_number, 16);

    let requests = server.received_requests().await.unwrap();
    let receipt_polls = requests
        .iter()
        .filter(|r| String::from_utf8_lossy(&r.body).contains("eth_getTransactionReceipt"))
        .count();
    assert_eq!(receipt_polls, 2);
}

#[tokio::test]
async fn test_send_transaction_targets_contract() {
    let server = setup_mock_server().await;
    rpc_method("eth_sendTransaction")
        .respond_with(rpc_result(json!(TEST_TX_HASH)))
        .mount(&server)
        .await;

    let registry = registry_for(&server);
    assert_ok!(registry.revoke_certificate(test_account(), &sample_record()).await);

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    let tx = &body["params"][0];
    assert_eq!(
        tx["to"].as_str().unwrap().to_ascii_lowercase(),
        format!("0x{}", "0".repeat(40))
    );
    assert_eq!(
        tx["from"].as_str().unwrap().to_ascii_lowercase(),
        common::TEST_ACCOUNT.to_ascii_lowercase()
    );
    let data = tx["data"].as_str().unwrap();
    assert!(data.starts_with("0x"));
    assert!(data.len() > 10);
}

#[tokio::test]
async fn test_verify_reads_contract_bool() {
    let server = setup_mock_server().await;
    rpc_method("eth_call")
        .respond_with(rpc_result(abi_bool(true)))
        .expect(2)
        .mount(&server)
        .await;

    let registry = registry_for(&server);
    let first = assert_ok!(registry.verify_certificate(test_account(), &sample_record()).await);
    let second = assert_ok!(registry.verify_certificate(test_account(), &sample_record()).await);
    assert!(first);
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_reverted_receipt_fails_issue() {
    let server = setup_mock_server().await;
    rpc_method("eth_requestAccounts")
        .respond_with(rpc_result(json!([common::TEST_ACCOUNT])))
        .mount(&server)
        .await;
    rpc_method("eth_sendTransaction")
        .respond_with(rpc_result(json!(TEST_TX_HASH)))
        .mount(&server)
        .await;
    rpc_method("eth_getTransactionReceipt")
        .respond_with(rpc_result(receipt("0x0")))
        .mount(&server)
        .await;
    rpc_method("eth_blockNumber")
        .respond_with(rpc_result(json!("0x10")))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let toasts = ToastQueue::new();
    let bridge = WalletBridge::with_provider(
        Arc::new(HttpWalletProvider::new(client.clone())),
        Arc::new(registry_for(&server)),
        Arc::new(toasts.clone()),
    );

    assert!(bridge.connect().await);
    assert!(!bridge.issue_certificate(&sample_record()).await);

    let last = toasts.latest().unwrap();
    assert_eq!(last.title, "Transaction Failed");
    assert!(last.is_destructive());
    assert!(bridge.activity().is_empty());
}

#[tokio::test]
async fn test_confirmations_wait_for_head() {
    let server = setup_mock_server().await;
    rpc_method("eth_getTransactionReceipt")
        .respond_with(rpc_result(receipt("0x1")))
        .mount(&server)
        .await;
    rpc_method("eth_blockNumber")
        .respond_with(rpc_result(json!("0x10")))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    rpc_method("eth_blockNumber")
        .respond_with(rpc_result(json!("0x12")))
        .mount(&server)
        .await;

    let registry = registry_for(&server).with_confirmations(3);
    let tx_hash = TEST_TX_HASH.parse().unwrap();
    let mined = assert_ok!(registry.wait_for_confirmation(tx_hash).await);
    assert_eq!(mined.block_number, 16);

    let requests = server.received_requests().await.unwrap();
    let head_polls = requests
        .iter()
        .filter(|r| String::from_utf8_lossy(&r.body).contains("eth_blockNumber"))
        .count();
    assert_eq!(head_polls, 2);
}

#[tokio::test]
async fn test_account_watcher_publishes_changes() {
    let server = setup_mock_server().await;
    rpc_method("eth_accounts")
        .respond_with(rpc_result(json!([common::TEST_ACCOUNT])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    rpc_method("eth_accounts")
        .respond_with(rpc_result(json!([])))
        .mount(&server)
        .await;

    let provider = Arc::new(HttpWalletProvider::new(client_for(&server)));
    let mut events = provider.subscribe_accounts();
    let cancel = CancellationToken::new();
    let handle = provider
        .clone()
        .watch_accounts(Duration::from_millis(20), cancel.clone());

    let changed = tokio::time::timeout(Duration::from_secs(5), events.recv())
        .await
        .expect("account change within timeout")
        .unwrap();
    assert!(changed.is_empty());

    cancel.cancel();
    assert_ok!(handle.await);
}

#[tokio::test]
async fn test_oversized_confirmation_depth_is_an_error() {
    let server = setup_mock_server().await;
    rpc_method("eth_getTransactionReceipt")
        .respond_with(rpc_result(receipt("0x1")))
        .mount(&server)
        .await;
    rpc_method("eth_blockNumber")
        .respond_with(rpc_result(json!("0x10")))
        .mount(&server)
        .await;

    let registry = registry_for(&server).with_confirmations(u64::MAX);
    let tx_hash = TEST_TX_HASH.parse().unwrap();
    match registry.wait_for_confirmation(tx_hash).await.unwrap_err() {
        DocpressError::InvalidResponse(message) => assert!(message.contains("overflows")),
        other => panic!("unexpected error: {other:?}"),
    }
}
