use crate::backends::{ClientFactory, Plane, PlaneClient};
use crate::config::{Config, LoggingConfig, PlaneConfig};
use crate::logging::InvocationLogger;
use crate::transform::{apply_header_rules, validate_header_rules};
use crate::types::{Params, Result, RouterError};
use async_trait::async_trait;
use bytes::Bytes;
use http::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, ClientBuilder};
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

const OPERATION_HEADER: &str = "x-agentcore-operation";

/// `PlaneClient` that forwards each operation as `POST {endpoint}/{operation}`
/// with the params as a JSON object body.
pub struct HttpPlaneClient {
    client: Client,
    service_id: String,
    region: String,
    endpoint: String,
    operations: HashSet<String>,
    config: Arc<PlaneConfig>,
    logger: InvocationLogger,
}

impl HttpPlaneClient {
    pub fn new(
        service_id: &str,
        region: &str,
        config: Arc<PlaneConfig>,
        logging: LoggingConfig,
    ) -> Result<Self> {
        validate_header_rules(&config.headers)?;

        let mut builder = ClientBuilder::new()
            .timeout(config.timeout_duration())
            .connect_timeout(Duration::from_secs(10))
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90));

        let endpoint = config.endpoint_for(service_id, region);

        if !config.ssl_verify {
            tracing::warn!(
                service = %service_id,
                endpoint = %endpoint,
                "SSL verification is disabled for this plane"
            );
            builder = builder.danger_accept_invalid_certs(true);
        }

        let client = builder
            .build()
            .map_err(|e| RouterError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            service_id: service_id.to_string(),
            region: region.to_string(),
            endpoint,
            operations: config.operations.iter().cloned().collect(),
            config,
            logger: InvocationLogger::new(logging),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn api_key(&self) -> Option<&str> {
        self.config.api_key.as_deref()
    }

    pub fn operation_url(&self, operation: &str) -> String {
        format!("{}/{}", self.endpoint, operation)
    }

    fn request_headers(&self, operation: &str) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("agentcore-router/", env!("CARGO_PKG_VERSION"))),
        );
        headers.insert(
            OPERATION_HEADER,
            HeaderValue::from_str(operation).map_err(|e| {
                RouterError::InvalidRequest(format!("Invalid operation name '{}': {}", operation, e))
            })?,
        );

        let mut headers = apply_header_rules(headers, &self.config.headers)?;

        if let Some(api_key) = self.api_key() {
            headers.insert(
                AUTHORIZATION,
                format!("Bearer {}", api_key)
                    .parse()
                    .map_err(|e| RouterError::Internal(format!("Invalid API key: {}", e)))?,
            );
        }

        Ok(headers)
    }
}

// A 2xx with an unreadable body is the upstream's fault, not the caller's.
fn parse_response_body(service_id: &str, body: &Bytes) -> Result<Value> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Params::new()));
    }
    serde_json::from_slice(body)
        .map_err(|e| RouterError::Backend(format!("Invalid response from {}: {}", service_id, e)))
}

#[async_trait]
impl PlaneClient for HttpPlaneClient {
    fn service_id(&self) -> &str {
        &self.service_id
    }

    fn region(&self) -> &str {
        &self.region
    }

    fn has_operation(&self, operation: &str) -> bool {
        self.operations.contains(operation)
    }

    async fn invoke(&self, operation: &str, params: Params) -> Result<Value> {
        let url = self.operation_url(operation);
        let headers = self.request_headers(operation)?;

        self.logger
            .log_upstream_request(&self.service_id, operation, &url, &headers, &params);

        let started = Instant::now();
        let response = match self.client.post(&url).headers(headers).json(&params).send().await {
            Ok(response) => response,
            Err(e) => {
                let message = format!("Request to {} failed: {}", self.service_id, e);
                self.logger.log_upstream_response(
                    &self.service_id,
                    operation,
                    None,
                    started.elapsed(),
                    Some(&message),
                );
                return Err(RouterError::Backend(message));
            }
        };

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| RouterError::Backend(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            let message = String::from_utf8_lossy(&body).into_owned();
            self.logger.log_upstream_response(
                &self.service_id,
                operation,
                Some(status.as_u16()),
                started.elapsed(),
                Some(&message),
            );
            return Err(RouterError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        self.logger.log_upstream_response(
            &self.service_id,
            operation,
            Some(status.as_u16()),
            started.elapsed(),
            None,
        );

        parse_response_body(&self.service_id, &body)
    }
}

/// Builds `HttpPlaneClient`s from the `control` / `data` sections of a `Config`.
pub struct HttpClientFactory {
    config: Arc<Config>,
}

impl HttpClientFactory {
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }
}

impl ClientFactory for HttpClientFactory {
    fn create(&self, service_id: &str, region: &str) -> Result<Arc<dyn PlaneClient>> {
        let plane = Plane::from_service_id(service_id).ok_or_else(|| {
            RouterError::Config(format!("No plane configured for service '{}'", service_id))
        })?;

        let client = HttpPlaneClient::new(
            service_id,
            region,
            Arc::new(self.config.plane(plane).clone()),
            self.config.logging.clone(),
        )?;

        tracing::info!(
            plane = %plane,
            service = %service_id,
            endpoint = %client.endpoint(),
            operations = client.operations.len(),
            "Created plane client"
        );

        Ok(Arc::new(client))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::{CONTROL_SERVICE, DATA_SERVICE};
    use crate::config::{HeaderRules, ServerConfig};
    use mockito::Matcher;
    use serde_json::json;
    use std::collections::HashMap;

    fn plane_config(endpoint: &str, operations: &[&str]) -> PlaneConfig {
        PlaneConfig {
            endpoint: Some(endpoint.to_string()),
            operations: operations.iter().map(|s| s.to_string()).collect(),
            api_key: None,
            timeout_seconds: 5,
            ssl_verify: true,
            headers: HeaderRules::default(),
        }
    }

    fn control_client(config: PlaneConfig) -> HttpPlaneClient {
        HttpPlaneClient::new(CONTROL_SERVICE, "us-west-2", Arc::new(config), LoggingConfig::default())
            .unwrap()
    }

    #[test]
    fn test_catalog_membership() {
        let client = control_client(plane_config("http://localhost:1", &["create_memory", "list_memories"]));

        assert!(client.has_operation("create_memory"));
        assert!(client.has_operation("list_memories"));
        assert!(!client.has_operation("create_event"));
        assert_eq!(client.service_id(), CONTROL_SERVICE);
        assert_eq!(client.region(), "us-west-2");
    }

    #[test]
    fn test_operation_url() {
        let client = control_client(plane_config("http://localhost:1/{region}/", &[]));
        assert_eq!(
            client.operation_url("create_memory"),
            "http://localhost:1/us-west-2/create_memory"
        );
    }

    #[test]
    fn test_invalid_header_rules_fail_construction() {
        let mut config = plane_config("http://localhost:1", &[]);
        config.headers.drop = vec!["not a header".to_string()];

        let result =
            HttpPlaneClient::new(DATA_SERVICE, "us-west-2", Arc::new(config), LoggingConfig::default());
        assert!(matches!(result, Err(RouterError::Header(_))));
    }

    #[test]
    fn test_parse_empty_body() {
        assert_eq!(parse_response_body(DATA_SERVICE, &Bytes::from_static(b"")).unwrap(), json!({}));
        assert_eq!(parse_response_body(DATA_SERVICE, &Bytes::from_static(b" \n")).unwrap(), json!({}));
        assert!(matches!(
            parse_response_body(DATA_SERVICE, &Bytes::from_static(b"not json")),
            Err(RouterError::Backend(_))
        ));
    }

    #[tokio::test]
    async fn test_invoke_forwards_params_unchanged() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/create_memory")
            .match_header("content-type", "application/json")
            .match_header("x-agentcore-operation", "create_memory")
            .match_body(Matcher::Exact(r#"{"name":"m1","eventExpiryDuration":90}"#.to_string()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"memory":{"id":"mem-123"}}"#)
            .create_async()
            .await;

        let client = control_client(plane_config(&server.url(), &["create_memory"]));

        let mut params = Params::new();
        params.insert("name".to_string(), json!("m1"));
        params.insert("eventExpiryDuration".to_string(), json!(90));

        let result = client.invoke("create_memory", params).await.unwrap();

        assert_eq!(result, json!({"memory": {"id": "mem-123"}}));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_invoke_applies_api_key_and_header_rules() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/create_event")
            .match_header("authorization", "Bearer test-key")
            .match_header("x-tenant", "acme")
            .with_status(200)
            .with_body("")
            .create_async()
            .await;

        let mut add = HashMap::new();
        add.insert("x-tenant".to_string(), "acme".to_string());
        let mut config = plane_config(&server.url(), &["create_event"]);
        config.api_key = Some("test-key".to_string());
        config.headers = HeaderRules { add, ..HeaderRules::default() };

        let client =
            HttpPlaneClient::new(DATA_SERVICE, "us-west-2", Arc::new(config), LoggingConfig::default())
                .unwrap();

        let result = client.invoke("create_event", Params::new()).await.unwrap();

        assert_eq!(result, json!({}));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_invoke_maps_error_status_to_upstream() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/get_memory")
            .with_status(404)
            .with_body(r#"{"__type":"ResourceNotFoundException"}"#)
            .create_async()
            .await;

        let client = control_client(plane_config(&server.url(), &["get_memory"]));

        match client.invoke("get_memory", Params::new()).await {
            Err(RouterError::Upstream { status, message }) => {
                assert_eq!(status, 404);
                assert!(message.contains("ResourceNotFoundException"));
            }
            other => panic!("Expected Upstream error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_invoke_non_json_success_is_backend_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/list_memories")
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body("<html>oops</html>")
            .create_async()
            .await;

        let client = control_client(plane_config(&server.url(), &["list_memories"]));

        let err = client.invoke("list_memories", Params::new()).await.unwrap_err();

        assert!(matches!(err, RouterError::Backend(_)));
        assert!(err.to_string().contains(CONTROL_SERVICE));
        assert_eq!(err.status_code(), http::StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_invoke_transport_failure_is_backend_error() {
        // Nothing listens on port 1.
        let client = control_client(plane_config("http://127.0.0.1:1", &["create_memory"]));

        let result = client.invoke("create_memory", Params::new()).await;
        assert!(matches!(result, Err(RouterError::Backend(_))));
    }

    #[test]
    fn test_factory_builds_both_planes() {
        let config = Config {
            server: ServerConfig::default(),
            logging: LoggingConfig::default(),
            region: None,
            control: plane_config("http://control.local", &["create_memory"]),
            data: plane_config("http://data.local", &["create_event"]),
        };
        let factory = HttpClientFactory::new(Arc::new(config));

        let control = factory.create(CONTROL_SERVICE, "eu-west-1").unwrap();
        let data = factory.create(DATA_SERVICE, "eu-west-1").unwrap();

        assert!(control.has_operation("create_memory"));
        assert!(!control.has_operation("create_event"));
        assert!(data.has_operation("create_event"));
        assert_eq!(data.region(), "eu-west-1");
    }

    #[test]
    fn test_factory_rejects_unknown_service() {
        let config = Config {
            server: ServerConfig::default(),
            logging: LoggingConfig::default(),
            region: None,
            control: PlaneConfig::default(),
            data: PlaneConfig::default(),
        };
        let factory = HttpClientFactory::new(Arc::new(config));

        let result = factory.create("s3", "us-west-2");
        assert!(matches!(result, Err(RouterError::Config(_))));
    }
}
