//! Read-only reference tables shipped with the binary.
//!
//! Both tables are JSON under `data/` and are parsed once at startup: the
//! spacecraft database backing the detail panel, and the roster snapshot used
//! whenever the live roster is unavailable.

use std::collections::HashMap;

use serde::Deserialize;
use thiserror::Error;

use crate::roster::CrewRoster;

const SPACECRAFT_JSON: &str = include_str!("../data/spacecraft.json");
const FALLBACK_ROSTER_JSON: &str = include_str!("../data/fallback_roster.json");

pub const UNKNOWN: &str = "Unknown";

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Malformed spacecraft table: {0}")]
    Spacecraft(#[source] serde_json::Error),
    #[error("Malformed fallback roster: {0}")]
    Roster(#[source] serde_json::Error),
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct TimelineEvent {
    pub date: String,
    pub event: String,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct SpacecraftInfo {
    pub full_name: String,
    pub launched: String,
    #[serde(default)]
    pub timeline: Vec<TimelineEvent>,
    pub orbit: String,
    pub speed: String,
}

impl SpacecraftInfo {
    /// Stand-in for craft that the table does not describe.
    pub fn placeholder(craft: &str) -> Self {
        Self {
            full_name: craft.to_string(),
            launched: UNKNOWN.to_string(),
            timeline: Vec::new(),
            orbit: UNKNOWN.to_string(),
            speed: UNKNOWN.to_string(),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct SpacecraftCatalog {
    entries: HashMap<String, SpacecraftInfo>,
}

impl SpacecraftCatalog {
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(SPACECRAFT_JSON)
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let entries = serde_json::from_str(json).map_err(CatalogError::Spacecraft)?;
        Ok(Self { entries })
    }

    pub fn get(&self, craft: &str) -> Option<&SpacecraftInfo> {
        self.entries.get(craft)
    }

    pub fn info_or_placeholder(&self, craft: &str) -> SpacecraftInfo {
        self.get(craft)
            .cloned()
            .unwrap_or_else(|| SpacecraftInfo::placeholder(craft))
    }
}

pub fn fallback_roster() -> Result<CrewRoster, CatalogError> {
    serde_json::from_str(FALLBACK_ROSTER_JSON).map_err(CatalogError::Roster)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_parses() {
        let catalog = SpacecraftCatalog::builtin().unwrap();
        assert_eq!(catalog.entries.len(), 2);

        let iss = catalog.get("ISS").unwrap();
        assert_eq!(iss.full_name, "International Space Station");
        assert_eq!(iss.timeline.len(), 5);
        assert_eq!(iss.timeline[0].date, "1998-11-20");

        let tiangong = catalog.get("Tiangong").unwrap();
        assert_eq!(tiangong.launched, "2021-04-29");
        assert_eq!(tiangong.timeline.last().unwrap().event, "Mengtian lab module completed station");
    }

    #[test]
    fn test_unknown_craft_gets_placeholder() {
        let catalog = SpacecraftCatalog::builtin().unwrap();
        let info = catalog.info_or_placeholder("Shenzhou 17");
        assert_eq!(info.full_name, "Shenzhou 17");
        assert_eq!(info.launched, UNKNOWN);
        assert_eq!(info.orbit, UNKNOWN);
        assert_eq!(info.speed, UNKNOWN);
        assert!(info.timeline.is_empty());
    }

    #[test]
    fn test_timeline_url_is_optional() {
        let json = r#"{"X": {"full_name": "X-1", "launched": "2001-01-01",
            "timeline": [{"date": "2001-01-01", "event": "Launch"}],
            "orbit": "LEO", "speed": "fast"}}"#;
        let catalog = SpacecraftCatalog::from_json(json).unwrap();
        assert_eq!(catalog.get("X").unwrap().timeline[0].url, None);
    }

    #[test]
    fn test_malformed_table_is_an_error() {
        assert!(matches!(
            SpacecraftCatalog::from_json("{\"X\": 3}"),
            Err(CatalogError::Spacecraft(_))
        ));
    }

    #[test]
    fn test_fallback_roster_snapshot() {
        let roster = fallback_roster().unwrap();
        assert_eq!(roster.number, 7);
        assert_eq!(roster.people.len(), 7);
        assert_eq!(roster.people[0].name, "Jasmin Moghbeli");
        assert!(roster.people.iter().all(|p| p.craft == "ISS"));
    }
}
