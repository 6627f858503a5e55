use crate::backends::Plane;
use crate::types::{Params, Result};
use crate::unified::UnifiedClient;
use serde_json::Value;

/// Builder for a single call: `client.operation("create_event").param(..).send()`.
#[derive(Debug)]
#[must_use = "an OperationCall does nothing until `send` is awaited"]
pub struct OperationCall<'a> {
    client: &'a UnifiedClient,
    operation: String,
    params: Params,
}

impl<'a> OperationCall<'a> {
    pub(crate) fn new(client: &'a UnifiedClient, operation: String) -> Self {
        Self {
            client,
            operation,
            params: Params::new(),
        }
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn params(mut self, params: Params) -> Self {
        self.params.extend(params);
        self
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    pub fn arguments(&self) -> &Params {
        &self.params
    }

    /// Plane the call would go to; builds handles but sends nothing.
    pub fn target(&self) -> Result<Plane> {
        self.client.route(&self.operation)
    }

    pub async fn send(self) -> Result<Value> {
        self.client.invoke(&self.operation, self.params).await
    }
}
