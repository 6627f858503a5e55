//! Region resolution: explicit value, then an ambient lookup, then a fixed fallback.

/// Region used when neither an explicit value nor the environment supplies one.
pub const DEFAULT_REGION: &str = "us-west-2";

pub fn resolve_region<F>(explicit: Option<&str>, ambient: F) -> String
where
    F: FnOnce() -> Option<String>,
{
    if let Some(region) = explicit.map(str::trim).filter(|r| !r.is_empty()) {
        return region.to_string();
    }

    ambient()
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty())
        .unwrap_or_else(|| DEFAULT_REGION.to_string())
}

/// Default session region from the process environment.
pub fn ambient_region() -> Option<String> {
    ["AWS_REGION", "AWS_DEFAULT_REGION"]
        .iter()
        .filter_map(|key| std::env::var(key).ok())
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
}
