/*
[INPUT]:  Mock wallet provider and in-memory certificate registry
[OUTPUT]: Test results for the wallet/contract bridge contract
[POS]:    Integration tests - bridge lifecycle and operations
[UPDATE]: When bridge behaviour or notifications change
*/

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{other_account, sample_record, test_account};
use docpress_adapter::{
    Address, MockCertificateRegistry, MockWalletProvider, ToastQueue, VerificationOutcome,
    WalletBridge, spawn_account_listener,
};
use rstest::rstest;
use tokio_util::sync::CancellationToken;

struct Harness {
    bridge: Arc<WalletBridge>,
    provider: Arc<MockWalletProvider>,
    registry: Arc<MockCertificateRegistry>,
    toasts: ToastQueue,
}

fn harness() -> Harness {
    let toasts = ToastQueue::new();
    let provider = Arc::new(MockWalletProvider::new(vec![test_account()]));
    let registry = Arc::new(MockCertificateRegistry::new(Address::ZERO));
    let bridge = Arc::new(WalletBridge::with_provider(
        provider.clone(),
        registry.clone(),
        Arc::new(toasts.clone()),
    ));
    Harness {
        bridge,
        provider,
        registry,
        toasts,
    }
}

async fn wait_until<F, Fut>(mut condition: F)
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    for _ in 0..100 {
        if condition().await {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("condition not reached");
}

#[tokio::test]
async fn test_connect_without_provider_fails() {
    let toasts = ToastQueue::new();
    let bridge = WalletBridge::new(Arc::new(toasts.clone()));

    assert!(!bridge.connect().await);
    assert!(bridge.address().await.is_none());
    assert!(!bridge.is_connected().await);

    let toast = toasts.latest().unwrap();
    assert!(toast.is_destructive());
    assert_eq!(toast.title, "Wallet not installed");
}

#[tokio::test]
async fn test_connect_sets_hex_address() {
    let h = harness();
    assert!(h.bridge.connect().await);

    let address = h.bridge.address().await.unwrap().to_checksum(None);
    assert!(address.starts_with("0x"));
    assert_eq!(address.len(), 42);
    assert!(address[2..].chars().all(|c| c.is_ascii_hexdigit()));

    let toast = h.toasts.latest().unwrap();
    assert_eq!(toast.title, "Wallet Connected");
    assert_eq!(toast.description, "Connected to 0xf39F...2266");
}

#[tokio::test]
async fn test_rejected_connect_leaves_state_unset() {
    let h = harness();
    h.provider.reject_requests(true);

    assert!(!h.bridge.connect().await);
    assert!(h.bridge.address().await.is_none());
    assert_eq!(h.toasts.latest().unwrap().title, "Connection Failed");
}

#[rstest]
#[case::never_connected(false)]
#[case::connected(true)]
#[tokio::test]
async fn test_disconnect_clears_handles(#[case] connect_first: bool) {
    let h = harness();
    if connect_first {
        assert!(h.bridge.connect().await);
    }

    h.bridge.disconnect().await;
    h.bridge.disconnect().await;

    assert!(h.bridge.address().await.is_none());
    assert!(h.bridge.connection().await.is_none());
    assert!(!h.bridge.is_connected().await);
    assert_eq!(h.toasts.latest().unwrap().title, "Wallet Disconnected");
}

#[tokio::test]
async fn test_connection_binds_contract_to_signer() {
    let h = harness();
    h.bridge.connect().await;

    let connection = h.bridge.connection().await.unwrap();
    assert_eq!(connection.contract.signer(), test_account());
    assert_eq!(connection.contract.contract_address(), Address::ZERO);
}

#[tokio::test]
async fn test_issue_verify_revoke_flow() {
    let h = harness();
    h.bridge.connect().await;
    let record = sample_record();

    assert!(!h.bridge.verify_certificate(&record).await);

    assert!(h.bridge.issue_certificate(&record).await);
    assert_eq!(h.toasts.latest().unwrap().title, "Certificate Issued");
    assert!(h.registry.is_active(&record));

    assert!(h.bridge.verify_certificate(&record).await);

    assert!(h.bridge.revoke_certificate(&record).await);
    assert_eq!(h.toasts.latest().unwrap().title, "Certificate Revoked");
    assert!(!h.bridge.verify_certificate(&record).await);
}

#[tokio::test]
async fn test_verify_is_idempotent() {
    let h = harness();
    h.bridge.connect().await;
    let record = sample_record();
    h.bridge.issue_certificate(&record).await;

    let first = h.bridge.verify_certificate(&record).await;
    let second = h.bridge.verify_certificate(&record).await;
    assert_eq!(first, second);
    assert_eq!(h.registry.verify_calls(), 2);
}

#[tokio::test]
async fn test_submission_failure_returns_false() {
    let h = harness();
    h.bridge.connect().await;
    h.registry.fail_next_submission();

    assert!(!h.bridge.issue_certificate(&sample_record()).await);
    let toast = h.toasts.latest().unwrap();
    assert_eq!(toast.title, "Transaction Failed");
    assert_eq!(toast.description, "Failed to issue certificate");
}

#[tokio::test]
async fn test_revoking_unknown_certificate_reverts() {
    let h = harness();
    h.bridge.connect().await;

    assert!(!h.bridge.revoke_certificate(&sample_record()).await);
    assert_eq!(
        h.toasts.latest().unwrap().description,
        "Failed to revoke certificate"
    );
}

#[tokio::test]
async fn test_check_separates_failure_from_invalid() {
    let h = harness();
    h.bridge.connect().await;
    let record = sample_record();

    assert_eq!(
        h.bridge.check_certificate(&record).await,
        VerificationOutcome::Invalid
    );

    h.registry.fail_reads(true);
    let outcome = h.bridge.check_certificate(&record).await;
    assert!(matches!(outcome, VerificationOutcome::Unavailable(_)));
    assert!(!h.bridge.verify_certificate(&record).await);
    assert_eq!(h.toasts.latest().unwrap().title, "Verification Failed");
}

#[tokio::test]
async fn test_verify_without_connection() {
    let h = harness();
    let outcome = h.bridge.check_certificate(&sample_record()).await;
    assert!(matches!(outcome, VerificationOutcome::Unavailable(_)));
    assert_eq!(h.toasts.latest().unwrap().title, "Wallet not connected");
    assert_eq!(h.registry.verify_calls(), 0);
}

#[tokio::test]
async fn test_accounts_changed_handling() {
    let h = harness();
    h.bridge.connect().await;

    // Same account: nothing happens
    let before = h.toasts.len();
    h.bridge.handle_accounts_changed(&[test_account()]).await;
    assert_eq!(h.toasts.len(), before);

    // Switch: reconnect with the new first account
    h.provider.switch_accounts(vec![other_account()]);
    h.bridge.handle_accounts_changed(&[other_account()]).await;
    assert_eq!(h.bridge.address().await, Some(other_account()));

    // Removal: disconnect
    h.bridge.handle_accounts_changed(&[]).await;
    assert!(h.bridge.address().await.is_none());
}

#[tokio::test]
async fn test_account_listener_follows_provider() {
    let h = harness();
    h.bridge.connect().await;

    let cancel = CancellationToken::new();
    let handle = spawn_account_listener(h.bridge.clone(), cancel.clone()).unwrap();

    h.provider.switch_accounts(vec![other_account()]);
    let bridge = h.bridge.clone();
    wait_until(|| {
        let bridge = bridge.clone();
        async move { bridge.address().await == Some(other_account()) }
    })
    .await;

    h.provider.switch_accounts(vec![]);
    let bridge = h.bridge.clone();
    wait_until(|| {
        let bridge = bridge.clone();
        async move { bridge.address().await.is_none() }
    })
    .await;

    cancel.cancel();
    handle.await.unwrap();
}

#[tokio::test]
async fn test_listener_requires_provider() {
    let bridge = Arc::new(WalletBridge::new(Arc::new(ToastQueue::new())));
    assert!(spawn_account_listener(bridge, CancellationToken::new()).is_none());
}
