//! Mars rover identifiers, photo selectors, and manifest records.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Error;

/// Rovers served by the Mars photos API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rover {
    Curiosity,
    Opportunity,
    Spirit,
    Perseverance,
    Ingenuity,
}

impl Rover {
    /// Every accepted rover name.
    pub const NAMES: &'static [&'static str] =
        &["curiosity", "opportunity", "spirit", "perseverance", "ingenuity"];

    /// Rovers scanned by the "latest photos" aggregate, in response order.
    pub const LATEST_SCAN: [Rover; 4] = [
        Rover::Curiosity,
        Rover::Perseverance,
        Rover::Opportunity,
        Rover::Spirit,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Rover::Curiosity => "curiosity",
            Rover::Opportunity => "opportunity",
            Rover::Spirit => "spirit",
            Rover::Perseverance => "perseverance",
            Rover::Ingenuity => "ingenuity",
        }
    }
}

impl fmt::Display for Rover {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Rover {
    type Err = Error;

    /// Case-insensitive parse.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "curiosity" => Ok(Rover::Curiosity),
            "opportunity" => Ok(Rover::Opportunity),
            "spirit" => Ok(Rover::Spirit),
            "perseverance" => Ok(Rover::Perseverance),
            "ingenuity" => Ok(Rover::Ingenuity),
            _ => Err(Error::InvalidValue {
                field: "rover",
                value: s.to_string(),
                expected: Rover::NAMES,
            }),
        }
    }
}

/// Which day of photos to request: a mission sol or an Earth date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhotoSelector {
    Sol(u32),
    EarthDate(NaiveDate),
}

/// Manifest body returned by `/mars-photos/api/v1/rovers/{rover}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoverManifest {
    pub rover: RoverInfo,
}

/// Per-rover mission metadata.
///
/// Fields the upstream adds beyond these are preserved in `extra` so the
/// manifest can be passed through unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoverInfo {
    pub name: String,
    pub max_sol: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_date: Option<String>,
    #[serde(default)]
    pub total_photos: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub launch_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub landing_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default)]
    pub cameras: Vec<RoverCamera>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One entry of a rover's camera roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoverCamera {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("Curiosity".parse::<Rover>().unwrap(), Rover::Curiosity);
        assert_eq!(" SPIRIT ".parse::<Rover>().unwrap(), Rover::Spirit);
    }

    #[test]
    fn unknown_rover_lists_options() {
        let err = "sojourner".parse::<Rover>().unwrap_err();
        let message = err.to_string();
        for name in Rover::NAMES {
            assert!(message.contains(name), "{} missing from {}", name, message);
        }
    }

    #[test]
    fn manifest_preserves_unknown_fields() {
        let body = json!({
            "rover": {
                "id": 5,
                "name": "Curiosity",
                "landing_date": "2012-08-06",
                "launch_date": "2011-11-26",
                "status": "active",
                "max_sol": 4102,
                "max_date": "2024-02-19",
                "total_photos": 695670,
                "cameras": [
                    {"name": "FHAZ", "full_name": "Front Hazard Avoidance Camera"},
                    {"name": "NAVCAM", "full_name": "Navigation Camera"}
                ]
            }
        });

        let manifest: RoverManifest = serde_json::from_value(body.clone()).unwrap();
        assert_eq!(manifest.rover.max_sol, 4102);
        assert_eq!(manifest.rover.cameras.len(), 2);
        assert_eq!(manifest.rover.extra.get("id"), Some(&json!(5)));

        let round = serde_json::to_value(&manifest).unwrap();
        assert_eq!(round, body);
    }
}
