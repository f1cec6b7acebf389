/*
[INPUT]:  Test configuration and mock server requirements
[OUTPUT]: Shared test utilities, fixtures, and JSON-RPC mock helpers
[POS]:    Test infrastructure - shared across all test modules
[UPDATE]: When adding new test patterns or fixtures
*/

//! Common test utilities for docpress-adapter tests

use docpress_adapter::{Address, CertificateRecord};
use serde_json::{Value, json};
use wiremock::matchers::{body_partial_json, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TEST_ACCOUNT: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";
pub const OTHER_ACCOUNT: &str = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8";
pub const TEST_TX_HASH: &str = "0x5c504ed432cb51138bcf09aa5e8a410dd4a1e204ef84bfed1be16dfba1b22060";

/// Setup a mock JSON-RPC server for testing
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

pub fn test_account() -> Address {
    TEST_ACCOUNT.parse().unwrap()
}

#[allow(dead_code)]
pub fn other_account() -> Address {
    OTHER_ACCOUNT.parse().unwrap()
}

pub fn sample_record() -> CertificateRecord {
    CertificateRecord::new(
        "John Doe",
        "Computer Science",
        "University of Blockchain",
        "2024-06-01",
    )
}

/// JSON-RPC success envelope
pub fn rpc_result(result: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "jsonrpc": "2.0",
        "id": 1,
        "result": result,
    }))
}

/// JSON-RPC error envelope
#[allow(dead_code)]
pub fn rpc_error(code: i64, message: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "jsonrpc": "2.0",
        "id": 1,
        "error": { "code": code, "message": message },
    }))
}

/// Mock matching a single JSON-RPC method
pub fn rpc_method(name: &str) -> wiremock::MockBuilder {
    Mock::given(method("POST")).and(body_partial_json(json!({ "method": name })))
}

/// ABI-encoded `bool` word as returned by `eth_call`
#[allow(dead_code)]
pub fn abi_bool(value: bool) -> Value {
    let last = if value { "1" } else { "0" };
    Value::String(format!("0x{}{}", "0".repeat(63), last))
}

/// Mined receipt object
#[allow(dead_code)]
pub fn receipt(status: &str) -> Value {
    json!({
        "transactionHash": TEST_TX_HASH,
        "blockNumber": "0x10",
        "status": status,
    })
}
