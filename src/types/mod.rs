pub mod errors;

pub use errors::{RouterError, Result, DOCS_BASE};

/// Keyword arguments of a remote operation, in caller order.
pub type Params = serde_json::Map<String, serde_json::Value>;
