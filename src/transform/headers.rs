use crate::config::HeaderRules;
use crate::types::{Result, RouterError};
use http::header::{HeaderMap, HeaderName, HeaderValue};
use std::str::FromStr;

pub fn apply_header_rules(mut headers: HeaderMap, rules: &HeaderRules) -> Result<HeaderMap> {
    for header_name in &rules.drop {
        headers.remove(parse_name(header_name)?);
    }

    for (key, value) in &rules.add {
        let name = parse_name(key)?;
        if !headers.contains_key(&name) {
            headers.insert(name, parse_value(key, value)?);
        }
    }

    for (key, value) in &rules.force {
        headers.insert(parse_name(key)?, parse_value(key, value)?);
    }

    Ok(headers)
}

/// Check every rule parses, so bad names fail at client construction.
pub fn validate_header_rules(rules: &HeaderRules) -> Result<()> {
    apply_header_rules(HeaderMap::new(), rules).map(|_| ())
}

fn parse_name(name: &str) -> Result<HeaderName> {
    HeaderName::from_str(name)
        .map_err(|e| RouterError::Header(format!("Invalid header name '{}': {}", name, e)))
}

fn parse_value(name: &str, value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| RouterError::Header(format!("Invalid header value for '{}': {}", name, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn base_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("content-type", "application/json".parse().unwrap());
        headers.insert("x-agentcore-operation", "create_memory".parse().unwrap());
        headers.insert("user-agent", "agentcore-router".parse().unwrap());
        headers
    }

    #[test]
    fn test_no_rules_no_changes() {
        let result = apply_header_rules(base_headers(), &HeaderRules::default()).unwrap();
        assert_eq!(result.len(), 3);
        assert_eq!(result.get("x-agentcore-operation").unwrap(), "create_memory");
    }

    #[test]
    fn test_add_does_not_override() {
        let mut add = HashMap::new();
        add.insert("x-tenant".to_string(), "acme".to_string());
        add.insert("content-type".to_string(), "text/plain".to_string());
        let rules = HeaderRules { add, ..HeaderRules::default() };

        let result = apply_header_rules(base_headers(), &rules).unwrap();

        assert_eq!(result.len(), 4);
        assert_eq!(result.get("content-type").unwrap(), "application/json");
        assert_eq!(result.get("x-tenant").unwrap(), "acme");
    }

    #[test]
    fn test_force_overrides() {
        let mut force = HashMap::new();
        force.insert("user-agent".to_string(), "custom-agent/1.0".to_string());
        let rules = HeaderRules { force, ..HeaderRules::default() };

        let result = apply_header_rules(base_headers(), &rules).unwrap();

        assert_eq!(result.len(), 3);
        assert_eq!(result.get("user-agent").unwrap(), "custom-agent/1.0");
    }

    #[test]
    fn test_drop_then_force() {
        let mut force = HashMap::new();
        force.insert("user-agent".to_string(), "forced".to_string());
        let rules = HeaderRules {
            force,
            add: HashMap::new(),
            drop: vec!["user-agent".to_string(), "x-agentcore-operation".to_string()],
        };

        let result = apply_header_rules(base_headers(), &rules).unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result.get("user-agent").unwrap(), "forced");
        assert!(result.get("x-agentcore-operation").is_none());
    }

    #[test]
    fn test_invalid_header_name() {
        let rules = HeaderRules {
            drop: vec!["bad header".to_string()],
            ..HeaderRules::default()
        };
        let err = validate_header_rules(&rules).unwrap_err();
        assert!(matches!(err, RouterError::Header(_)));
    }

    #[test]
    fn test_invalid_header_value() {
        let mut add = HashMap::new();
        add.insert("x-tenant".to_string(), "line\nbreak".to_string());
        let rules = HeaderRules { add, ..HeaderRules::default() };
        assert!(validate_header_rules(&rules).is_err());
    }
}
