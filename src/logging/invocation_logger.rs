use crate::config::LoggingConfig;
use crate::types::Params;
use chrono::{DateTime, Utc};
use http::header::HeaderMap;
use serde::Serialize;
use std::collections::HashMap;
use std::time::Duration;

#[derive(Debug, Serialize)]
pub struct UpstreamRequestLog {
    pub timestamp: DateTime<Utc>,
    pub service: String,
    pub operation: String,
    pub endpoint: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<HashMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UpstreamResponseLog {
    pub timestamp: DateTime<Utc>,
    pub service: String,
    pub operation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    pub duration_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Emits one record per upstream call of a plane client.
#[derive(Debug, Clone)]
pub struct InvocationLogger {
    config: LoggingConfig,
}

impl InvocationLogger {
    pub fn new(config: LoggingConfig) -> Self {
        Self { config }
    }

    pub fn request_log(
        &self,
        service: &str,
        operation: &str,
        endpoint: &str,
        headers: &HeaderMap,
        params: &Params,
    ) -> Option<UpstreamRequestLog> {
        if !self.config.enabled {
            return None;
        }

        Some(UpstreamRequestLog {
            timestamp: Utc::now(),
            service: service.to_string(),
            operation: operation.to_string(),
            endpoint: endpoint.to_string(),
            headers: if self.config.include_headers {
                Some(Self::headers_to_map(headers))
            } else {
                None
            },
            params: if self.config.include_params {
                serde_json::to_string(params).ok()
            } else {
                None
            },
        })
    }

    pub fn log_upstream_request(
        &self,
        service: &str,
        operation: &str,
        endpoint: &str,
        headers: &HeaderMap,
        params: &Params,
    ) {
        if let Some(log) = self.request_log(service, operation, endpoint, headers, params) {
            tracing::debug!(log = ?log, "Upstream request");
        }
    }

    pub fn log_upstream_response(
        &self,
        service: &str,
        operation: &str,
        status_code: Option<u16>,
        elapsed: Duration,
        error: Option<&str>,
    ) {
        if !self.config.enabled {
            return;
        }

        let log = UpstreamResponseLog {
            timestamp: Utc::now(),
            service: service.to_string(),
            operation: operation.to_string(),
            status_code,
            duration_ms: elapsed.as_millis() as u64,
            error: error.map(|s| s.to_string()),
        };

        match status_code {
            Some(status) if status < 400 => tracing::debug!(log = ?log, "Upstream response"),
            Some(status) if status < 500 => tracing::warn!(log = ?log, "Upstream response"),
            _ => tracing::error!(log = ?log, "Upstream response"),
        }
    }

    fn headers_to_map(headers: &HeaderMap) -> HashMap<String, String> {
        headers
            .iter()
            .map(|(name, value)| {
                let key = name.to_string();
                let val = if Self::is_sensitive_header(&key) {
                    "[REDACTED]".to_string()
                } else {
                    value.to_str().unwrap_or("<invalid>").to_string()
                };
                (key, val)
            })
            .collect()
    }

    fn is_sensitive_header(name: &str) -> bool {
        let lower = name.to_lowercase();
        lower.contains("authorization")
            || lower.contains("api-key")
            || lower.contains("api_key")
            || lower.contains("apikey")
            || lower.contains("token")
            || lower.contains("password")
            || lower.contains("secret")
            || lower.contains("security")
    }
}
