/*
[INPUT]:  Certificate form fields and contract call results
[OUTPUT]: Typed records shared by the bridge, registries and front ends
[POS]:    Data layer - type definitions for contract communication
[UPDATE]: When the contract interface or activity history changes
*/

use std::fmt;

use alloy_primitives::{Address, TxHash};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The four opaque strings a certificate is identified by on-chain.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateRecord {
    pub student_name: String,
    pub course: String,
    pub university: String,
    pub issue_date: String,
}

impl CertificateRecord {
    pub fn new(
        student_name: impl Into<String>,
        course: impl Into<String>,
        university: impl Into<String>,
        issue_date: impl Into<String>,
    ) -> Self {
        Self {
            student_name: student_name.into(),
            course: course.into(),
            university: university.into(),
            issue_date: issue_date.into(),
        }
    }
}

/// Result of a verification read.
///
/// `Unavailable` covers a missing connection or a failed call; the boolean
/// `verify_certificate` folds it into `false`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationOutcome {
    Valid,
    Invalid,
    Unavailable(String),
}

impl VerificationOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, VerificationOutcome::Valid)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Issue,
    Verify,
    Revoke,
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ActivityKind::Issue => "Issue",
            ActivityKind::Verify => "Verify",
            ActivityKind::Revoke => "Revoke",
        };
        f.write_str(label)
    }
}

/// A completed bridge operation, newest last.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub kind: ActivityKind,
    pub at: DateTime<Utc>,
    pub tx_hash: Option<TxHash>,
    pub student_name: String,
}

/// Mined transaction summary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxReceipt {
    pub tx_hash: TxHash,
    pub block_number: u64,
    pub success: bool,
}

/// `0x1234...abcd` form used in notifications and page headers.
pub fn short_address(address: &Address) -> String {
    let full = address.to_checksum(None);
    format!("{}...{}", &full[..6], &full[full.len() - 4..])
}

/// Shorten a transaction hash the same way as addresses.
pub fn short_hash(hash: &TxHash) -> String {
    let full = hex::encode(hash.as_slice());
    format!("0x{}...{}", &full[..4], &full[full.len() - 4..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_address() {
        let address: Address = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266".parse().unwrap();
        assert_eq!(short_address(&address), "0xf39F...2266");
    }

    #[test]
    fn test_short_hash() {
        let hash = TxHash::repeat_byte(0xab);
        assert_eq!(short_hash(&hash), "0xabab...abab");
    }

    #[test]
    fn test_record_serializes_camel_case() {
        let record = CertificateRecord::new("Jane Doe", "CS", "MIT", "2024-06-01");
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["studentName"], "Jane Doe");
        assert_eq!(json["issueDate"], "2024-06-01");
    }

    #[test]
    fn test_outcome_validity() {
        assert!(VerificationOutcome::Valid.is_valid());
        assert!(!VerificationOutcome::Invalid.is_valid());
        assert!(!VerificationOutcome::Unavailable("rpc down".into()).is_valid());
    }
}
