/*
[INPUT]:  Public API exports for the docpress-app crate
[OUTPUT]: Module declarations and public re-exports
[POS]:    Crate root - library entry point
[UPDATE]: When adding new modules or public exports
*/

pub mod chatbot;
pub mod config;
pub mod context;
pub mod form;
pub mod routes;
pub mod session;
pub mod state;
pub mod views;

pub use chatbot::Chatbot;
pub use config::AppConfig;
pub use context::AppContext;
pub use form::{CertificateForm, FormKind};
pub use routes::{AccessState, Route};
pub use session::{Role, SessionStore, User};
