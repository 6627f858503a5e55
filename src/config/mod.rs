pub mod loader;
pub mod models;
pub mod region;

pub use loader::{load_config, parse_config};
pub use models::{Config, HeaderRules, LoggingConfig, PlaneConfig, ServerConfig};
pub use region::{ambient_region, resolve_region, DEFAULT_REGION};
