use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

use crate::backends::Plane;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Explicit region; when unset the ambient environment and then the
    /// built-in fallback are consulted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    pub control: PlaneConfig,
    pub data: PlaneConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_request_timeout() -> u64 {
    120
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_true")]
    pub include_headers: bool,
    #[serde(default)]
    pub include_params: bool,
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            include_headers: true,
            include_params: false,
            level: "info".to_string(),
            json: false,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

pub const DEFAULT_ENDPOINT_TEMPLATE: &str = "https://{service}.{region}.amazonaws.com";

/// Settings for one backing client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaneConfig {
    /// Base URL; `{service}` and `{region}` placeholders are substituted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    /// Operation names this plane exposes.
    #[serde(default)]
    pub operations: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    #[serde(default = "default_true")]
    pub ssl_verify: bool,
    #[serde(default)]
    pub headers: HeaderRules,
}

fn default_timeout() -> u64 {
    60
}

impl PlaneConfig {
    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn endpoint_for(&self, service_id: &str, region: &str) -> String {
        self.endpoint
            .as_deref()
            .unwrap_or(DEFAULT_ENDPOINT_TEMPLATE)
            .replace("{service}", service_id)
            .replace("{region}", region)
            .trim_end_matches('/')
            .to_string()
    }
}

impl Default for PlaneConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            operations: Vec::new(),
            api_key: None,
            timeout_seconds: default_timeout(),
            ssl_verify: true,
            headers: HeaderRules::default(),
        }
    }
}

/// Header rules applied to every outgoing request of a plane.
///
/// `drop` runs first, then `add` (only when absent), then `force`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HeaderRules {
    #[serde(default)]
    pub force: HashMap<String, String>,
    #[serde(default)]
    pub add: HashMap<String, String>,
    #[serde(default)]
    pub drop: Vec<String>,
}

impl Config {
    pub fn plane(&self, plane: Plane) -> &PlaneConfig {
        match plane {
            Plane::Control => &self.control,
            Plane::Data => &self.data,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.server.request_timeout_seconds == 0 {
            return Err("Server request timeout must be > 0".to_string());
        }

        if let Some(region) = &self.region {
            if region.trim().is_empty() {
                return Err("Region must not be empty when set".to_string());
            }
        }

        for plane in [Plane::Control, Plane::Data] {
            let plane_config = self.plane(plane);

            if let Some(endpoint) = &plane_config.endpoint {
                if endpoint.trim().is_empty() {
                    return Err(format!("Plane '{}' has empty endpoint", plane));
                }
            }

            if plane_config.timeout_seconds == 0 {
                return Err(format!(
                    "Plane '{}' has invalid timeout (must be > 0)",
                    plane
                ));
            }

            for (idx, operation) in plane_config.operations.iter().enumerate() {
                if operation.is_empty() || operation.contains('/') {
                    return Err(format!(
                        "Plane '{}' has invalid operation name at index {}: '{}'",
                        plane, idx, operation
                    ));
                }
            }

            if plane_config.operations.is_empty() {
                tracing::warn!(plane = %plane, "Plane has no operations configured");
            }
        }

        Ok(())
    }
}
