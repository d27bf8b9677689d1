//! ECS components for the reference host world.
//!
//! Components are pure data containers attached to entities. The tracker
//! itself never touches them directly; it reads them through the [`Host`]
//! trait implemented by [`HostWorld`].
//!
//! [`Host`]: crate::host::Host
//! [`HostWorld`]: crate::world::HostWorld

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

// ============================================================================
// SPATIAL COMPONENTS
// ============================================================================

/// 3D position in world space (y is up).
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    pub const ORIGIN: Position = Position { x: 0.0, y: 0.0, z: 0.0 };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    pub fn distance_squared_to(&self, other: &Position) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        dx * dx + dy * dy + dz * dz
    }

    pub fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

// ============================================================================
// IDENTITY COMPONENTS
// ============================================================================

/// Category of a non-actor entity.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    #[default]
    Villager,
    IronGolem,
    Zombie,
}

impl EntityKind {
    /// Untranslated localization key the host reports when it has no
    /// display text for this kind.
    pub fn placeholder_label(self) -> &'static str {
        match self {
            EntityKind::Villager => "entity.Villager.name",
            EntityKind::IronGolem => "entity.VillagerGolem.name",
            EntityKind::Zombie => "entity.Zombie.name",
        }
    }
}

/// Raw display label as reported by the host. May be empty, an untranslated
/// key, or text the consumer cannot render.
#[derive(Component, Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayLabel(pub String);

/// Role code of a villager (0 = farmer ... 4 = butcher, anything else generic).
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Profession(pub i32);

/// Marks a connected actor (player). Actors are scan centers, never scanned.
#[derive(Component, Debug, Clone, PartialEq, Eq)]
pub struct ConnectedActor {
    pub name: String,
}

// ============================================================================
// BUNDLES
// ============================================================================

/// Bundle for spawning a villager entity.
#[derive(Bundle, Default)]
pub struct VillagerBundle {
    pub kind: EntityKind,
    pub position: Position,
    pub label: DisplayLabel,
    pub profession: Profession,
}

impl VillagerBundle {
    pub fn new(label: impl Into<String>, profession: i32, position: Position) -> Self {
        Self {
            kind: EntityKind::Villager,
            position,
            label: DisplayLabel(label.into()),
            profession: Profession(profession),
        }
    }
}

/// Bundle for spawning a connected actor.
#[derive(Bundle)]
pub struct ActorBundle {
    pub actor: ConnectedActor,
    pub position: Position,
}

impl ActorBundle {
    pub fn new(name: impl Into<String>, position: Position) -> Self {
        Self {
            actor: ConnectedActor { name: name.into() },
            position,
        }
    }
}
