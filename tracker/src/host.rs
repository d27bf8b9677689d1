//! Contract between the tracker and the engine hosting it.
//!
//! The host owns the world, the entity model and the tick loop. The tracker
//! only consumes three things from it: a heartbeat, the list of connected
//! actors, and a kind-filtered region query.

use crate::components::{EntityKind, Position};
use crate::spatial::ScanRegion;

/// Phase marker delivered with each heartbeat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TickPhase {
    /// Before the host advances the simulation.
    Start,
    /// After the simulation step; positions are settled.
    End,
}

/// A connected actor usable as a scan center.
#[derive(Debug, Clone, PartialEq)]
pub struct ActorInfo {
    pub name: String,
    pub position: Position,
}

/// Entity record as reported by the host, before name normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct RawEntity {
    pub kind: EntityKind,
    pub position: Position,
    pub raw_label: String,
    /// Role code; only villagers carry one.
    pub profession: Option<i32>,
}

/// Read-only view of the hosting world for one cycle.
pub trait Host {
    /// Connected actors in connection order (oldest first).
    fn connected_actors(&self) -> Vec<ActorInfo>;

    /// Live entities of `kind` whose position lies inside `region` (inclusive).
    fn entities_of_kind_within(&self, kind: EntityKind, region: &ScanRegion) -> Vec<RawEntity>;
}

/// Receiver of host heartbeats.
pub trait Heartbeat {
    fn on_tick(&mut self, phase: TickPhase, host: &dyn Host);
}
