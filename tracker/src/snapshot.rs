//! Snapshot types and their JSON form.
//!
//! A `Snapshot` serializes as a bare JSON array of `{ name, x, y, z }`
//! objects so dashboards can read it without knowing anything about the
//! tracker.

use crate::scanner::TrackedEntity;
use serde::{Deserialize, Serialize};

/// One published entity. Field order is the on-disk field order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotRecord {
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl From<&TrackedEntity> for SnapshotRecord {
    fn from(entity: &TrackedEntity) -> Self {
        Self {
            name: entity.resolved_name.clone(),
            x: entity.position.x,
            y: entity.position.y,
            z: entity.position.z,
        }
    }
}

/// Result of one completed scan, in scan order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot {
    pub records: Vec<SnapshotRecord>,
}

impl Snapshot {
    pub fn from_entities(entities: &[TrackedEntity]) -> Self {
        Self {
            records: entities.iter().map(SnapshotRecord::from).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SnapshotRecord> {
        self.records.iter()
    }

    /// Serialize snapshot to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize snapshot to pretty JSON string.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Serialize a snapshot to pretty-printed JSON bytes (the published form).
pub fn snapshot_to_json(snapshot: &Snapshot) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec_pretty(snapshot)
}

/// Deserialize a snapshot from JSON bytes.
pub fn snapshot_from_json(data: &[u8]) -> Result<Snapshot, serde_json::Error> {
    serde_json::from_slice(data)
}

/// Deserialize a snapshot from a JSON string.
pub fn snapshot_from_json_string(data: &str) -> Result<Snapshot, serde_json::Error> {
    serde_json::from_str(data)
}
