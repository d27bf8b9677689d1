//! Villager Tracker - tick-driven entity snapshot pipeline
//!
//! On every end-of-tick heartbeat the tracker picks a scan center from the
//! host's connected actors, collects the tracked entities inside a cube
//! around it, normalizes their display names and atomically replaces a JSON
//! snapshot file with the result.
//!
//! The hosting engine is abstracted behind the [`Host`] and [`Heartbeat`]
//! traits. [`HostWorld`] is a `bevy_ecs`-backed reference host used for the
//! demo, tests and benchmarks.

pub mod components;
pub mod config;
pub mod error;
pub mod host;
pub mod naming;
pub mod pipeline;
pub mod profiler;
pub mod publisher;
pub mod scanner;
pub mod snapshot;
pub mod spatial;
pub mod world;

pub use components::*;
pub use config::TrackerConfig;
pub use error::{Result, TrackerError};
pub use host::{ActorInfo, Heartbeat, Host, RawEntity, TickPhase};
pub use naming::{resolve_name, VillagerProfession};
pub use pipeline::{CycleOutcome, SkipReason, Tracker};
pub use profiler::CycleProfiler;
pub use publisher::{PublishReport, SnapshotPublisher, DEFAULT_OUTPUT_PATH};
pub use scanner::{
    scan, select_primary_center, CenterPolicy, CenterPolicyKind, FirstConnected, NearestToOrigin,
    Scanner, TrackedEntity,
};
pub use snapshot::{Snapshot, SnapshotRecord};
pub use spatial::{ScanRegion, SpatialEntry, SpatialGrid};
pub use world::{HostConfig, HostWorld};
