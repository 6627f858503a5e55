pub mod http_client;
pub mod traits;

pub use http_client::{HttpClientFactory, HttpPlaneClient};
pub use traits::{ClientFactory, PlaneClient};

use serde::{Deserialize, Serialize};
use std::fmt;

pub const CONTROL_SERVICE: &str = "bedrock-agentcore-control";
pub const DATA_SERVICE: &str = "bedrock-agentcore";

/// The two backing-client roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Plane {
    Control,
    Data,
}

impl Plane {
    pub fn service_id(&self) -> &'static str {
        match self {
            Plane::Control => CONTROL_SERVICE,
            Plane::Data => DATA_SERVICE,
        }
    }

    pub fn from_service_id(service_id: &str) -> Option<Self> {
        match service_id {
            CONTROL_SERVICE => Some(Plane::Control),
            DATA_SERVICE => Some(Plane::Data),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Plane::Control => "control",
            Plane::Data => "data",
        }
    }
}

impl fmt::Display for Plane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Plane {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "control" => Ok(Plane::Control),
            "data" => Ok(Plane::Data),
            other => Err(format!("Unknown plane '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_ids_round_trip() {
        for plane in [Plane::Control, Plane::Data] {
            assert_eq!(Plane::from_service_id(plane.service_id()), Some(plane));
        }
        assert_eq!(Plane::from_service_id("s3"), None);
    }

    #[test]
    fn test_parse_plane() {
        assert_eq!("control".parse::<Plane>(), Ok(Plane::Control));
        assert_eq!("data".parse::<Plane>(), Ok(Plane::Data));
        assert!("both".parse::<Plane>().is_err());
    }
}
