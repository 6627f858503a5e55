pub mod headers;

pub use headers::{apply_header_rules, validate_header_rules};
