//! Region scan around the primary actor.

use crate::components::{EntityKind, Position};
use crate::error::Result;
use crate::host::{ActorInfo, Host};
use crate::naming::resolve_entity_name;
use crate::spatial::ScanRegion;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Entity found by one scan, with its published name already resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackedEntity {
    pub kind: EntityKind,
    pub position: Position,
    pub raw_label: String,
    pub resolved_name: String,
}

// ============================================================================
// CENTER SELECTION
// ============================================================================

/// Chooses which actor a cycle scans around.
pub trait CenterPolicy {
    /// `None` means there is no usable actor and the cycle is skipped.
    fn select_primary_center(&self, actors: &[ActorInfo]) -> Option<Position>;

    fn name(&self) -> &'static str;
}

/// First actor in connection order.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstConnected;

impl CenterPolicy for FirstConnected {
    fn select_primary_center(&self, actors: &[ActorInfo]) -> Option<Position> {
        actors.first().map(|a| a.position)
    }

    fn name(&self) -> &'static str {
        "first_connected"
    }
}

/// Actor closest to the world origin; ties go to the earlier connection.
#[derive(Debug, Clone, Copy, Default)]
pub struct NearestToOrigin;

impl CenterPolicy for NearestToOrigin {
    fn select_primary_center(&self, actors: &[ActorInfo]) -> Option<Position> {
        actors
            .iter()
            .filter(|a| a.position.is_finite())
            .map(|a| a.position)
            .fold(None, |best: Option<Position>, pos| match best {
                Some(b)
                    if b.distance_squared_to(&Position::ORIGIN)
                        <= pos.distance_squared_to(&Position::ORIGIN) =>
                {
                    Some(b)
                }
                _ => Some(pos),
            })
    }

    fn name(&self) -> &'static str {
        "nearest_to_origin"
    }
}

/// Serializable selector for the built-in policies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CenterPolicyKind {
    #[default]
    FirstConnected,
    NearestToOrigin,
}

impl CenterPolicyKind {
    pub fn build(self) -> Box<dyn CenterPolicy> {
        match self {
            CenterPolicyKind::FirstConnected => Box::new(FirstConnected),
            CenterPolicyKind::NearestToOrigin => Box::new(NearestToOrigin),
        }
    }
}

/// The default policy: the first connected actor.
pub fn select_primary_center(actors: &[ActorInfo]) -> Option<Position> {
    FirstConnected.select_primary_center(actors)
}

// ============================================================================
// SCANNING
// ============================================================================

/// Query `host` for every `kind` entity inside the cube of half-extent
/// `radius` around `center`.
///
/// Results keep the host's order. Entities reporting a non-finite position
/// are dropped with a warning instead of failing the scan.
pub fn scan(
    host: &dyn Host,
    center: Position,
    radius: f64,
    kind: EntityKind,
) -> Result<Vec<TrackedEntity>> {
    let region = ScanRegion::around(center, radius)?;

    let tracked = host
        .entities_of_kind_within(kind, &region)
        .into_iter()
        .filter(|raw| {
            if raw.position.is_finite() {
                true
            } else {
                warn!(
                    label = %raw.raw_label,
                    position = ?raw.position,
                    "dropping entity with non-finite position"
                );
                false
            }
        })
        .map(|raw| TrackedEntity {
            resolved_name: resolve_entity_name(raw.kind, &raw.raw_label, raw.profession),
            kind: raw.kind,
            position: raw.position,
            raw_label: raw.raw_label,
        })
        .collect();

    Ok(tracked)
}

/// Scan settings fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scanner {
    pub kind: EntityKind,
    pub radius: f64,
}

impl Default for Scanner {
    fn default() -> Self {
        Self {
            kind: EntityKind::Villager,
            radius: 50.0,
        }
    }
}

impl Scanner {
    pub fn new(kind: EntityKind, radius: f64) -> Self {
        Self { kind, radius }
    }

    pub fn scan(&self, host: &dyn Host, center: Position) -> Result<Vec<TrackedEntity>> {
        scan(host, center, self.radius, self.kind)
    }
}
