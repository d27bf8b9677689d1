//! In-memory reference host.
//!
//! `HostWorld` implements the [`Host`] contract on top of a `bevy_ecs` world
//! so the tracker can be driven end to end without a game engine. It owns a
//! fixed-timestep tick loop that fires `Start`/`End` heartbeats around each
//! simulation step, and a spatial grid rebuilt every tick.
//!
//! ## Fixed Timestep
//!
//! `step(dt)` accumulates time and runs one tick per elapsed
//! `fixed_timestep` (default 20 Hz), so heartbeat cadence is independent of
//! the caller's frame rate.

use crate::components::*;
use crate::error::{Result, TrackerError};
use crate::host::{ActorInfo, Heartbeat, Host, RawEntity, TickPhase};
use crate::spatial::{spatial_grid_update_system, ScanRegion, SpatialGrid, DEFAULT_CELL_SIZE};
use bevy_ecs::prelude::*;

/// Host tuning.
#[derive(Resource, Debug, Clone)]
pub struct HostConfig {
    /// Fixed timestep in seconds (1/20 = 20 ticks per second).
    pub fixed_timestep: f64,
    /// Spatial grid cell edge length in world units.
    pub cell_size: f64,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            fixed_timestep: 1.0 / 20.0,
            cell_size: DEFAULT_CELL_SIZE,
        }
    }
}

impl HostConfig {
    /// Both values must be finite and strictly positive. A zero timestep
    /// would never drain the accumulator.
    pub fn validate(&self) -> Result<()> {
        if !self.fixed_timestep.is_finite() || self.fixed_timestep <= 0.0 {
            return Err(TrackerError::Config(format!(
                "fixed_timestep must be a finite positive number, got {}",
                self.fixed_timestep
            )));
        }
        if !self.cell_size.is_finite() || self.cell_size <= 0.0 {
            return Err(TrackerError::Config(format!(
                "cell_size must be a finite positive number, got {}",
                self.cell_size
            )));
        }
        Ok(())
    }
}

/// Global tick counter.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct HostTick(pub u64);

impl HostTick {
    pub fn increment(&mut self) {
        self.0 = self.0.wrapping_add(1);
    }
}

pub struct HostWorld {
    world: World,
    schedule: Schedule,
    tick: u64,
    /// Connected actors, oldest connection first.
    actors: Vec<Entity>,
    time_accumulator: f64,
}

impl HostWorld {
    /// Create a new empty host world.
    pub fn new() -> Self {
        Self::build(HostConfig::default())
    }

    pub fn with_config(config: HostConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: HostConfig) -> Self {
        let mut world = World::new();
        world.insert_resource(SpatialGrid::new(config.cell_size));
        world.insert_resource(HostTick(0));
        world.insert_resource(config);

        let mut schedule = Schedule::default();
        schedule.add_systems(spatial_grid_update_system);

        Self {
            world,
            schedule,
            tick: 0,
            actors: Vec::new(),
            time_accumulator: 0.0,
        }
    }

    /// Advance by `dt` seconds without anyone listening to heartbeats.
    pub fn step(&mut self, dt: f64) {
        struct Silent;
        impl Heartbeat for Silent {
            fn on_tick(&mut self, _: TickPhase, _: &dyn Host) {}
        }
        self.step_with(dt, &mut Silent);
    }

    /// Advance by `dt` seconds, notifying `listener` around every fixed tick.
    pub fn step_with(&mut self, dt: f64, listener: &mut dyn Heartbeat) {
        let fixed_dt = self.world.resource::<HostConfig>().fixed_timestep;

        self.time_accumulator += dt;
        while self.time_accumulator >= fixed_dt {
            self.fixed_update(listener);
            self.time_accumulator -= fixed_dt;
        }
    }

    /// Run exactly one tick regardless of accumulated time.
    pub fn tick_once(&mut self, listener: &mut dyn Heartbeat) {
        self.fixed_update(listener);
    }

    fn fixed_update(&mut self, listener: &mut dyn Heartbeat) {
        listener.on_tick(TickPhase::Start, &*self);

        self.world.resource_mut::<HostTick>().increment();
        self.schedule.run(&mut self.world);
        self.tick += 1;

        listener.on_tick(TickPhase::End, &*self);
    }

    pub fn current_tick(&self) -> u64 {
        self.tick
    }

    /// Spawn a scannable entity and index it immediately.
    pub fn spawn_entity(
        &mut self,
        kind: EntityKind,
        label: impl Into<String>,
        profession: Option<i32>,
        position: Position,
    ) -> Entity {
        let mut entity = self
            .world
            .spawn((kind, position, DisplayLabel(label.into())));
        if let Some(code) = profession {
            entity.insert(Profession(code));
        }
        let id = entity.id();
        self.world.resource_mut::<SpatialGrid>().insert(id, position, kind);
        id
    }

    pub fn spawn_villager(&mut self, label: impl Into<String>, profession: i32, position: Position) -> Entity {
        let bundle = VillagerBundle::new(label, profession, position);
        let id = self.world.spawn(bundle).id();
        self.world
            .resource_mut::<SpatialGrid>()
            .insert(id, position, EntityKind::Villager);
        id
    }

    /// Move an entity or actor. Returns false if it does not exist.
    pub fn set_position(&mut self, entity: Entity, position: Position) -> bool {
        let Some(mut pos) = self.world.get_mut::<Position>(entity) else {
            return false;
        };
        *pos = position;
        if let Some(kind) = self.world.get::<EntityKind>(entity).copied() {
            self.world.resource_mut::<SpatialGrid>().insert(entity, position, kind);
        }
        true
    }

    pub fn despawn(&mut self, entity: Entity) -> bool {
        self.actors.retain(|&a| a != entity);
        self.world.resource_mut::<SpatialGrid>().remove(entity);
        self.world.despawn(entity)
    }

    /// Connect an actor; it goes to the back of the connection order.
    pub fn connect_actor(&mut self, name: impl Into<String>, position: Position) -> Entity {
        let id = self.world.spawn(ActorBundle::new(name, position)).id();
        self.actors.push(id);
        id
    }

    pub fn disconnect_actor(&mut self, actor: Entity) -> bool {
        if !self.actors.contains(&actor) {
            return false;
        }
        self.despawn(actor)
    }

    pub fn actor_count(&self) -> usize {
        self.actors.len()
    }

    pub fn spatial_grid(&self) -> &SpatialGrid {
        self.world.resource::<SpatialGrid>()
    }

    /// Get direct access to the ECS world (for advanced usage).
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Get mutable access to the ECS world (for advanced usage).
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }
}

impl Default for HostWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl Host for HostWorld {
    fn connected_actors(&self) -> Vec<ActorInfo> {
        self.actors
            .iter()
            .filter_map(|&entity| {
                let actor = self.world.get::<ConnectedActor>(entity)?;
                let position = self.world.get::<Position>(entity)?;
                Some(ActorInfo {
                    name: actor.name.clone(),
                    position: *position,
                })
            })
            .collect()
    }

    fn entities_of_kind_within(&self, kind: EntityKind, region: &ScanRegion) -> Vec<RawEntity> {
        self.spatial_grid()
            .query_region(kind, region)
            .into_iter()
            .map(|entry| RawEntity {
                kind: entry.kind,
                position: entry.position,
                raw_label: self
                    .world
                    .get::<DisplayLabel>(entry.entity)
                    .map(|l| l.0.clone())
                    .unwrap_or_default(),
                profession: self.world.get::<Profession>(entry.entity).map(|p| p.0),
            })
            .collect()
    }
}
