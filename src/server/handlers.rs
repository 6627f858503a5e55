use axum::{
    extract::{Path, State},
    Json,
};
use bytes::Bytes;
use serde_json::{json, Value};

use crate::backends::Plane;
use crate::server::AppState;
use crate::types::{Params, Result, RouterError};

pub async fn health_check() -> &'static str {
    "OK"
}

pub async fn region_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "region": state.client.region_name() }))
}

/// Direct access to one plane's handle, bypassing routing.
pub async fn plane_handler(
    State(state): State<AppState>,
    Path(plane): Path<String>,
) -> Result<Json<Value>> {
    let plane: Plane = plane.parse().map_err(RouterError::InvalidRequest)?;
    let client = state.client.plane_client(plane)?;

    Ok(Json(json!({
        "plane": plane,
        "service": client.service_id(),
        "region": client.region(),
    })))
}

pub async fn route_handler(
    State(state): State<AppState>,
    Path(operation): Path<String>,
) -> Result<Json<Value>> {
    let (plane, client) = state.client.resolve_route(&operation)?;

    Ok(Json(json!({
        "operation": operation,
        "plane": plane,
        "service": client.service_id(),
    })))
}

pub async fn invoke_handler(
    State(state): State<AppState>,
    Path(operation): Path<String>,
    body: Bytes,
) -> Result<Json<Value>> {
    let params = parse_params(&body)?;

    tracing::debug!(operation = %operation, params = params.len(), "Invoking operation");

    let result = state.client.invoke(&operation, params).await?;
    Ok(Json(result))
}

fn parse_params(body: &Bytes) -> Result<Params> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Params::new());
    }

    match serde_json::from_slice::<Value>(body)? {
        Value::Object(params) => Ok(params),
        other => Err(RouterError::InvalidRequest(format!(
            "Operation arguments must be a JSON object, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
