/*
[INPUT]:  Certificate fields entered by the user
[OUTPUT]: Field validation errors or the bridge operation's result
[POS]:    Form layer - shared issue/verify/revoke certificate form
[UPDATE]: When field rules or form kinds change
*/

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use docpress_adapter::{CertificateRecord, WalletBridge};
use tracing::debug;

const MIN_TEXT_LEN: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    Issue,
    Verify,
    Revoke,
}

impl FormKind {
    pub fn button_label(&self) -> &'static str {
        match self {
            FormKind::Issue => "Issue Certificate",
            FormKind::Verify => "Verify Certificate",
            FormKind::Revoke => "Revoke Certificate",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(pub Vec<FieldError>);

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.0.iter().map(|e| e.message).collect();
        f.write_str(&messages.join(" "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Today's date in the form's default `YYYY-MM-DD` format
pub fn default_issue_date() -> String {
    Utc::now().date_naive().format("%Y-%m-%d").to_string()
}

/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp
pub fn parse_issue_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.date_naive()))
}

pub fn validate(record: &CertificateRecord) -> Result<(), ValidationErrors> {
    let mut errors = Vec::new();
    let text_fields = [
        ("studentName", &record.student_name, "Student name must be at least 2 characters."),
        ("course", &record.course, "Course name must be at least 2 characters."),
        ("university", &record.university, "University name must be at least 2 characters."),
    ];
    for (field, value, message) in text_fields {
        if value.trim().chars().count() < MIN_TEXT_LEN {
            errors.push(FieldError { field, message });
        }
    }
    if parse_issue_date(&record.issue_date).is_none() {
        errors.push(FieldError {
            field: "issueDate",
            message: "Please enter a valid date.",
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors(errors))
    }
}

/// One form, three purposes
#[derive(Debug, Clone, Copy)]
pub struct CertificateForm {
    kind: FormKind,
}

impl CertificateForm {
    pub fn new(kind: FormKind) -> Self {
        Self { kind }
    }

    pub fn kind(&self) -> FormKind {
        self.kind
    }

    /// `Ok(None)` means no wallet was connected and nothing was sent
    pub async fn submit(
        &self,
        bridge: &WalletBridge,
        record: &CertificateRecord,
    ) -> Result<Option<bool>, ValidationErrors> {
        validate(record)?;

        if !bridge.is_connected().await {
            debug!(kind = ?self.kind, "form submitted without a connected wallet");
            return Ok(None);
        }

        let result = match self.kind {
            FormKind::Issue => bridge.issue_certificate(record).await,
            FormKind::Verify => bridge.verify_certificate(record).await,
            FormKind::Revoke => bridge.revoke_certificate(record).await,
        };
        Ok(Some(result))
    }
}
