//! The routing facade over the control plane and data plane clients.

pub mod call;
pub mod client;

pub use call::OperationCall;
pub use client::{is_local_operation, UnifiedClient, LOCAL_OPERATIONS};
