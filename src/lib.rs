//! Unified client for the AgentCore control plane (`bedrock-agentcore-control`)
//! and data plane (`bedrock-agentcore`).
//!
//! [`UnifiedClient`] accepts any operation name and forwards it to whichever
//! backing client exposes it. Backing clients sit behind the [`PlaneClient`]
//! trait and are produced by a [`ClientFactory`]; [`HttpClientFactory`] builds
//! HTTP clients from a [`config::Config`].

pub mod backends;
pub mod config;
pub mod logging;
pub mod server;
pub mod transform;
pub mod types;
pub mod unified;

pub use backends::{
    ClientFactory, HttpClientFactory, HttpPlaneClient, Plane, PlaneClient, CONTROL_SERVICE,
    DATA_SERVICE,
};
pub use types::{Params, Result, RouterError};
pub use unified::{OperationCall, UnifiedClient};
