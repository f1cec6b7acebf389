/*
[INPUT]:  Free-text user questions
[OUTPUT]: Canned assistant answers and the visible transcript
[POS]:    Assistant widget - static keyword lookup
[UPDATE]: When canned answers change
*/

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const GREETING: &str =
    "👋 Hi there! I'm the DocPress assistant. How can I help you today?";

const HELLO_REPLY: &str = "Hello! How can I assist you with DocPress today?";
const THANKS_REPLY: &str = "You're welcome! Is there anything else I can help you with?";
const FALLBACK_REPLY: &str = "I'm not sure I understand. You can ask me about DocPress, how to verify or issue certificates, or how to connect your wallet.";

/// Keyword table, checked in order; the first contained keyword wins.
const RESPONSES: &[(&str, &str)] = &[
    (
        "what is docpress",
        "DocPress is a blockchain-based certificate verification platform that allows universities to issue verified certificates and employers to verify credentials without third-party involvement.",
    ),
    (
        "how does it work",
        "DocPress uses blockchain technology to securely store and verify academic credentials. Universities can issue certificates, and anyone can verify their authenticity using our platform.",
    ),
    (
        "how to verify certificate",
        "To verify a certificate, go to the 'Verify Certificate' page, enter the certificate details (student name, course, university, and issue date), and click the 'Verify Certificate' button.",
    ),
    (
        "how to issue certificate",
        "To issue a certificate, connect your wallet, navigate to the 'Issue Certificate' page, fill in the required details, and submit the form. The certificate will be recorded on the blockchain.",
    ),
    (
        "what is blockchain",
        "Blockchain is a distributed ledger technology that enables secure, transparent, and tamper-proof record-keeping. In DocPress, it ensures that certificates cannot be falsified.",
    ),
    (
        "connect wallet",
        "You can connect your wallet by choosing 'Connect Wallet' from the main menu. This allows you to issue and revoke certificates.",
    ),
    (
        "help",
        "I can help you with information about DocPress, how to verify certificates, issue certificates, connect your wallet, and understand blockchain technology. Just ask me a question!",
    ),
];

/// Answer a question from the keyword table.
///
/// Matching is plain substring search on the lower-cased input, so "hi"
/// also fires inside longer words such as "this".
pub fn respond(input: &str) -> &'static str {
    let query = input.to_lowercase();

    if let Some(&(_, answer)) = RESPONSES.iter().find(|(key, _)| query.contains(key)) {
        return answer;
    }

    if ["hello", "hi", "hey"].iter().any(|word| query.contains(word)) {
        return HELLO_REPLY;
    }

    if query.contains("thank") {
        return THANKS_REPLY;
    }

    FALLBACK_REPLY
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: u64,
    pub text: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
}

/// Chat transcript, opened with the assistant greeting
#[derive(Debug, Clone)]
pub struct Chatbot {
    messages: Vec<ChatMessage>,
}

impl Default for Chatbot {
    fn default() -> Self {
        Self::new()
    }
}

impl Chatbot {
    pub fn new() -> Self {
        Self {
            messages: vec![ChatMessage {
                id: 1,
                text: GREETING.to_string(),
                sender: Sender::Bot,
                timestamp: Utc::now(),
            }],
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Append the question and its answer; blank input is ignored
    pub fn send(&mut self, input: &str) -> Option<&ChatMessage> {
        if input.trim().is_empty() {
            return None;
        }
        self.push(input.to_string(), Sender::User);
        self.push(respond(input).to_string(), Sender::Bot);
        self.messages.last()
    }

    fn push(&mut self, text: String, sender: Sender) {
        let id = self.messages.len() as u64 + 1;
        self.messages.push(ChatMessage {
            id,
            text,
            sender,
            timestamp: Utc::now(),
        });
    }
}
