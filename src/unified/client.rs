use crate::backends::{
    ClientFactory, HttpClientFactory, Plane, PlaneClient, CONTROL_SERVICE, DATA_SERVICE,
};
use crate::config::{ambient_region, resolve_region, Config};
use crate::types::{Params, Result, RouterError};
use crate::unified::call::OperationCall;
use once_cell::sync::OnceCell;
use serde_json::{json, Value};
use std::fmt;
use std::sync::Arc;

/// Control is always probed first; on a name collision it wins.
const PROBE_ORDER: [Plane; 2] = [Plane::Control, Plane::Data];

/// Names handled by the facade itself. These are never forwarded, even when a
/// backing client exposes an operation with the same name.
pub const LOCAL_OPERATIONS: &[&str] = &[
    "resolve",
    "get_client_for_operation",
    "route",
    "resolve_route",
    "control_plane_client",
    "data_plane_client",
    "plane_client",
    "is_built",
    "region_name",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LocalOperation {
    Resolve,
    PlaneClient(Option<Plane>),
    IsBuilt,
    RegionName,
}

impl LocalOperation {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "resolve" | "get_client_for_operation" | "route" | "resolve_route" => {
                Some(LocalOperation::Resolve)
            }
            "control_plane_client" => Some(LocalOperation::PlaneClient(Some(Plane::Control))),
            "data_plane_client" => Some(LocalOperation::PlaneClient(Some(Plane::Data))),
            "plane_client" => Some(LocalOperation::PlaneClient(None)),
            "is_built" => Some(LocalOperation::IsBuilt),
            "region_name" => Some(LocalOperation::RegionName),
            _ => None,
        }
    }
}

/// `plane` argument of `plane_client` / `is_built` called through `invoke`.
fn plane_argument(params: &Params) -> Result<Plane> {
    params
        .get("plane")
        .and_then(Value::as_str)
        .ok_or_else(|| RouterError::InvalidRequest("a string 'plane' argument is required".to_string()))?
        .parse::<Plane>()
        .map_err(RouterError::InvalidRequest)
}

pub fn is_local_operation(name: &str) -> bool {
    LocalOperation::parse(name).is_some()
}

/// One entry point for every control plane and data plane operation.
///
/// Backing clients are built on first use through the [`ClientFactory`] and
/// kept for the lifetime of the facade. Every call re-probes the clients in
/// fixed order (control, then data) and forwards to the first that exposes the
/// operation; nothing is cached per operation name.
///
/// ```rust,no_run
/// # use agentcore_router::{UnifiedClient, Params};
/// # use std::sync::Arc;
/// # async fn demo(factory: Arc<dyn agentcore_router::ClientFactory>) -> agentcore_router::Result<()> {
/// let client = UnifiedClient::new(Some("us-west-2"), factory);
///
/// let memory = client
///     .operation("create_memory")
///     .param("name", "my-memory")
///     .param("eventExpiryDuration", 90)
///     .send()
///     .await?;
///
/// let event = client
///     .operation("create_event")
///     .param("memoryId", memory["memory"]["id"].clone())
///     .send()
///     .await?;
/// # let _ = event;
/// # Ok(())
/// # }
/// ```
pub struct UnifiedClient {
    region: String,
    factory: Arc<dyn ClientFactory>,
    control: OnceCell<Arc<dyn PlaneClient>>,
    data: OnceCell<Arc<dyn PlaneClient>>,
}

impl UnifiedClient {
    /// Region falls back to `AWS_REGION` / `AWS_DEFAULT_REGION`, then `us-west-2`.
    pub fn new(region: Option<&str>, factory: Arc<dyn ClientFactory>) -> Self {
        Self::with_region_source(region, ambient_region, factory)
    }

    pub fn with_region_source<F>(region: Option<&str>, ambient: F, factory: Arc<dyn ClientFactory>) -> Self
    where
        F: FnOnce() -> Option<String>,
    {
        let region = resolve_region(region, ambient);

        tracing::info!(region = %region, "Initialized unified client");

        Self {
            region,
            factory,
            control: OnceCell::new(),
            data: OnceCell::new(),
        }
    }

    /// Facade over HTTP plane clients described by `config`.
    pub fn from_config(config: Arc<Config>) -> Self {
        let region = config.region.clone();
        Self::new(region.as_deref(), Arc::new(HttpClientFactory::new(config)))
    }

    pub fn region_name(&self) -> &str {
        &self.region
    }

    pub fn control_plane_client(&self) -> Result<Arc<dyn PlaneClient>> {
        self.plane_client(Plane::Control)
    }

    pub fn data_plane_client(&self) -> Result<Arc<dyn PlaneClient>> {
        self.plane_client(Plane::Data)
    }

    /// Cached handle for `plane`, building it on first access. A failed build
    /// leaves the slot empty so the next access tries again.
    pub fn plane_client(&self, plane: Plane) -> Result<Arc<dyn PlaneClient>> {
        self.slot(plane)
            .get_or_try_init(|| {
                let client = self.factory.create(plane.service_id(), &self.region)?;
                tracing::debug!(
                    plane = %plane,
                    service = %plane.service_id(),
                    region = %self.region,
                    "Created plane client"
                );
                Ok(client)
            })
            .map(Arc::clone)
    }

    pub fn is_built(&self, plane: Plane) -> bool {
        self.slot(plane).get().is_some()
    }

    fn slot(&self, plane: Plane) -> &OnceCell<Arc<dyn PlaneClient>> {
        match plane {
            Plane::Control => &self.control,
            Plane::Data => &self.data,
        }
    }

    /// Backing client that serves `operation`, without invoking it.
    pub fn resolve(&self, operation: &str) -> Result<Arc<dyn PlaneClient>> {
        self.resolve_route(operation).map(|(_, client)| client)
    }

    /// Same as [`resolve`](Self::resolve), but returns only the plane.
    pub fn route(&self, operation: &str) -> Result<Plane> {
        self.resolve_route(operation).map(|(plane, _)| plane)
    }

    /// Routing decision together with the handle that serves it.
    pub fn resolve_route(&self, operation: &str) -> Result<(Plane, Arc<dyn PlaneClient>)> {
        for plane in PROBE_ORDER {
            let client = self.plane_client(plane)?;
            if client.has_operation(operation) {
                tracing::debug!(operation = %operation, plane = %plane, "Routing operation");
                return Ok((plane, client));
            }
        }

        Err(RouterError::operation_not_found(operation, CONTROL_SERVICE, DATA_SERVICE))
    }

    /// Run `operation` with `params`.
    ///
    /// Facade-local names (see [`LOCAL_OPERATIONS`]) run here. Anything else is
    /// forwarded to the resolved backing client, and its result or error is
    /// returned as is.
    pub async fn invoke(&self, operation: &str, params: Params) -> Result<Value> {
        if let Some(local) = LocalOperation::parse(operation) {
            return self.invoke_local(local, &params);
        }

        let (_, client) = self.resolve_route(operation)?;
        client.invoke(operation, params).await
    }

    pub fn operation(&self, operation: impl Into<String>) -> OperationCall<'_> {
        OperationCall::new(self, operation.into())
    }

    fn invoke_local(&self, local: LocalOperation, params: &Params) -> Result<Value> {
        match local {
            LocalOperation::RegionName => Ok(Value::String(self.region.clone())),
            LocalOperation::PlaneClient(plane) => {
                let plane = match plane {
                    Some(plane) => plane,
                    None => plane_argument(params)?,
                };
                let client = self.plane_client(plane)?;
                Ok(describe(plane, client.as_ref()))
            }
            LocalOperation::IsBuilt => Ok(Value::Bool(self.is_built(plane_argument(params)?))),
            LocalOperation::Resolve => {
                let target = params
                    .get("operation_name")
                    .or_else(|| params.get("operationName"))
                    .and_then(Value::as_str)
                    .ok_or_else(|| {
                        RouterError::InvalidRequest(
                            "a string 'operation_name' argument is required".to_string(),
                        )
                    })?;

                let (plane, client) = self.resolve_route(target)?;
                let mut descriptor = describe(plane, client.as_ref());
                if let Value::Object(map) = &mut descriptor {
                    map.insert("operation".to_string(), Value::String(target.to_string()));
                }
                Ok(descriptor)
            }
        }
    }
}

fn describe(plane: Plane, client: &dyn PlaneClient) -> Value {
    json!({
        "plane": plane,
        "service": client.service_id(),
        "region": client.region(),
    })
}

impl fmt::Debug for UnifiedClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnifiedClient")
            .field("region", &self.region)
            .field("control_built", &self.is_built(Plane::Control))
            .field("data_built", &self.is_built(Plane::Data))
            .finish()
    }
}
