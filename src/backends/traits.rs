use crate::types::{Params, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// A backing client seen only through the operations it exposes.
#[async_trait]
pub trait PlaneClient: Send + Sync {
    fn service_id(&self) -> &str;

    fn region(&self) -> &str;

    fn has_operation(&self, operation: &str) -> bool;

    async fn invoke(&self, operation: &str, params: Params) -> Result<Value>;
}

/// Builds a backing client for a service identifier in a region.
pub trait ClientFactory: Send + Sync {
    fn create(&self, service_id: &str, region: &str) -> Result<Arc<dyn PlaneClient>>;
}

impl<F> ClientFactory for F
where
    F: Fn(&str, &str) -> Result<Arc<dyn PlaneClient>> + Send + Sync,
{
    fn create(&self, service_id: &str, region: &str) -> Result<Arc<dyn PlaneClient>> {
        self(service_id, region)
    }
}
