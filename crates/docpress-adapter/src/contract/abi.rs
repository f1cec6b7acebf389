/*
[INPUT]:  Certificate records and raw `eth_call` return data
[OUTPUT]: Solidity ABI call data and decoded return values
[POS]:    Contract layer - ABI of the certificate registry contract
[UPDATE]: When the deployed contract's interface changes
*/

use alloy_sol_types::{SolCall, SolType, sol, sol_data};

use crate::rpc::Result;
use crate::types::CertificateRecord;

sol! {
    function issueCertificate(string studentName, string course, string university, string issueDate) external;
    function verifyCertificate(string studentName, string course, string university, string issueDate) external view returns (bool);
    function revokeCertificate(string studentName, string course, string university, string issueDate) external;
}

pub fn encode_issue(record: &CertificateRecord) -> Vec<u8> {
    issueCertificateCall {
        studentName: record.student_name.clone(),
        course: record.course.clone(),
        university: record.university.clone(),
        issueDate: record.issue_date.clone(),
    }
    .abi_encode()
}

pub fn encode_verify(record: &CertificateRecord) -> Vec<u8> {
    verifyCertificateCall {
        studentName: record.student_name.clone(),
        course: record.course.clone(),
        university: record.university.clone(),
        issueDate: record.issue_date.clone(),
    }
    .abi_encode()
}

pub fn encode_revoke(record: &CertificateRecord) -> Vec<u8> {
    revokeCertificateCall {
        studentName: record.student_name.clone(),
        course: record.course.clone(),
        university: record.university.clone(),
        issueDate: record.issue_date.clone(),
    }
    .abi_encode()
}

/// Decode the `bool` returned by `verifyCertificate`
pub fn decode_verify_result(data: &[u8]) -> Result<bool> {
    Ok(<sol_data::Bool as SolType>::abi_decode(data)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::keccak256;

    fn record() -> CertificateRecord {
        CertificateRecord::new("Jane Doe", "Computer Science", "University of Blockchain", "2024-06-01")
    }

    #[test]
    fn test_selectors_match_signatures() {
        let signature = "(string,string,string,string)";
        for (name, data) in [
            ("issueCertificate", encode_issue(&record())),
            ("verifyCertificate", encode_verify(&record())),
            ("revokeCertificate", encode_revoke(&record())),
        ] {
            let expected = keccak256(format!("{name}{signature}").as_bytes());
            assert_eq!(&data[..4], &expected[..4], "selector for {name}");
        }
    }

    #[test]
    fn test_call_data_carries_fields() {
        let data = encode_issue(&record());
        // selector + four head offsets, then length-prefixed tails
        assert!(data.len() > 4 + 4 * 32);
        let tail = String::from_utf8_lossy(&data);
        assert!(tail.contains("Jane Doe"));
        assert!(tail.contains("University of Blockchain"));
    }

    #[test]
    fn test_decode_verify_result() {
        let mut word = [0u8; 32];
        assert!(!decode_verify_result(&word).unwrap());
        word[31] = 1;
        assert!(decode_verify_result(&word).unwrap());
        assert!(decode_verify_result(&[]).is_err());
    }
}
