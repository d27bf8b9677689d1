//! Tracker configuration.
//!
//! Every field has a default, so an empty JSON object (or no file at all) is
//! a valid configuration that reproduces the stock behavior: villagers within
//! 50 blocks of the first connected player, written to
//! `villager_positions.json`.

use crate::components::EntityKind;
use crate::error::{Result, TrackerError};
use crate::publisher::DEFAULT_OUTPUT_PATH;
use crate::scanner::CenterPolicyKind;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Where the snapshot is published.
    pub output_path: PathBuf,
    /// Half-extent of the scan cube, in world units.
    pub scan_radius: f64,
    /// Kind of entity to track.
    pub tracked_kind: EntityKind,
    /// How the scan center is chosen among connected actors.
    pub center_policy: CenterPolicyKind,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            scan_radius: 50.0,
            tracked_kind: EntityKind::Villager,
            center_policy: CenterPolicyKind::FirstConnected,
        }
    }
}

impl TrackerConfig {
    /// Read and validate a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| TrackerError::io(path, e))?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.scan_radius.is_finite() || self.scan_radius <= 0.0 {
            return Err(TrackerError::Config(format!(
                "scan_radius must be a finite positive number, got {}",
                self.scan_radius
            )));
        }
        if self.output_path.as_os_str().is_empty() {
            return Err(TrackerError::Config("output_path is empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TrackerConfig::default();
        assert_eq!(config.output_path, PathBuf::from("villager_positions.json"));
        assert_eq!(config.scan_radius, 50.0);
        assert_eq!(config.tracked_kind, EntityKind::Villager);
        assert_eq!(config.center_policy, CenterPolicyKind::FirstConnected);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_object_uses_defaults() {
        let config = TrackerConfig::from_json_str("{}").unwrap();
        assert_eq!(config, TrackerConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config = TrackerConfig::from_json_str(
            r#"{ "scan_radius": 32.5, "center_policy": "nearest_to_origin", "tracked_kind": "zombie" }"#,
        )
        .unwrap();
        assert_eq!(config.scan_radius, 32.5);
        assert_eq!(config.center_policy, CenterPolicyKind::NearestToOrigin);
        assert_eq!(config.tracked_kind, EntityKind::Zombie);
        assert_eq!(config.output_path, PathBuf::from("villager_positions.json"));
    }

    #[test]
    fn test_rejects_bad_radius() {
        let err = TrackerConfig::from_json_str(r#"{ "scan_radius": 0 }"#).unwrap_err();
        assert!(matches!(err, TrackerError::Config(_)));
        let err = TrackerConfig::from_json_str(r#"{ "scan_radius": -4.0 }"#).unwrap_err();
        assert!(matches!(err, TrackerError::Config(_)));
    }

    #[test]
    fn test_rejects_empty_path() {
        let err = TrackerConfig::from_json_str(r#"{ "output_path": "" }"#).unwrap_err();
        assert!(matches!(err, TrackerError::Config(_)));
    }

    #[test]
    fn test_malformed_json() {
        let err = TrackerConfig::from_json_str("{ scan_radius: ").unwrap_err();
        assert!(matches!(err, TrackerError::Json(_)));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tracker.json");
        std::fs::write(&path, r#"{ "output_path": "snapshots/villagers.json" }"#).unwrap();
        let config = TrackerConfig::load(&path).unwrap();
        assert_eq!(config.output_path, PathBuf::from("snapshots/villagers.json"));

        let missing = TrackerConfig::load(dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(missing, TrackerError::Io { .. }));
    }
}
