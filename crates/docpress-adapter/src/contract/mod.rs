/*
[INPUT]:  Certificate records and contract configuration
[OUTPUT]: Registry port, ABI helpers, JSON-RPC and in-memory registries
[POS]:    Contract layer - certificate registry integration
[UPDATE]: When adding registry implementations
*/

pub mod abi;
pub mod registry;
pub mod rpc_registry;

pub use registry::{CertificateRegistry, MockCertificateRegistry};
pub use rpc_registry::RpcCertificateRegistry;
