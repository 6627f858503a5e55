use super::models::Config;
use crate::types::{Result, RouterError};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::fs;
use std::path::Path;

// ${VAR_NAME} or ${VAR_NAME:-default}
static ENV_VAR_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(:-([^}]*))?\}").expect("valid env var pattern")
});

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let content = fs::read_to_string(path.as_ref())
        .map_err(|e| RouterError::Config(format!("Failed to read config file: {}", e)))?;

    parse_config(&content, is_json(path.as_ref()))
}

pub fn parse_config(content: &str, json: bool) -> Result<Config> {
    let expanded = expand_env_vars(content);

    let config: Config = if json {
        serde_json::from_str(&expanded)
            .map_err(|e| RouterError::Config(format!("Failed to parse JSON config: {}", e)))?
    } else {
        serde_yaml::from_str(&expanded)
            .map_err(|e| RouterError::Config(format!("Failed to parse YAML config: {}", e)))?
    };

    config
        .validate()
        .map_err(|e| RouterError::Config(format!("Invalid configuration: {}", e)))?;

    Ok(config)
}

fn is_json(path: &Path) -> bool {
    path.extension().and_then(|s| s.to_str()) == Some("json")
}

fn expand_env_vars(content: &str) -> String {
    ENV_VAR_PATTERN
        .replace_all(content, |cap: &Captures| {
            let var_name = &cap[1];
            std::env::var(var_name)
                .ok()
                .or_else(|| cap.get(3).map(|m| m.as_str().to_string()))
                .unwrap_or_else(|| {
                    tracing::warn!(
                        "Environment variable '{}' not found and no default provided",
                        var_name
                    );
                    String::new()
                })
        })
        .into_owned()
}
