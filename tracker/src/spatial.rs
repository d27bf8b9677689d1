//! Spatial partitioning for region queries.
//!
//! The reference host keeps every scannable entity in a uniform 3D grid so a
//! scan touches only the cells overlapping the requested cube instead of the
//! whole world.

use crate::components::{EntityKind, Position};
use crate::error::{Result, TrackerError};
use bevy_ecs::prelude::*;
use std::collections::HashMap;

type Cell = (i64, i64, i64);

/// Cell edge length used when none (or an unusable one) is given.
pub const DEFAULT_CELL_SIZE: f64 = 16.0;

/// Axis-aligned cube searched during one cycle.
///
/// Built fresh every cycle from the primary actor's position; bounds are
/// inclusive on every axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanRegion {
    pub center: Position,
    pub half_extent: f64,
}

impl ScanRegion {
    /// Build a cube of side `2 * half_extent` around `center`.
    ///
    /// Fails if the center is not finite or the extent is not a finite,
    /// strictly positive number.
    pub fn around(center: Position, half_extent: f64) -> Result<Self> {
        if !center.is_finite() || !half_extent.is_finite() || half_extent <= 0.0 {
            return Err(TrackerError::InvalidRegion {
                center: center.to_array(),
                radius: half_extent,
            });
        }
        Ok(Self { center, half_extent })
    }

    pub fn min(&self) -> Position {
        Position::new(
            self.center.x - self.half_extent,
            self.center.y - self.half_extent,
            self.center.z - self.half_extent,
        )
    }

    pub fn max(&self) -> Position {
        Position::new(
            self.center.x + self.half_extent,
            self.center.y + self.half_extent,
            self.center.z + self.half_extent,
        )
    }

    /// Inclusive cube containment. Non-finite positions are never contained.
    #[inline]
    pub fn contains(&self, pos: &Position) -> bool {
        let r = self.half_extent;
        (pos.x - self.center.x).abs() <= r
            && (pos.y - self.center.y).abs() <= r
            && (pos.z - self.center.z).abs() <= r
    }
}

/// Entry in a spatial cell.
#[derive(Debug, Clone, Copy)]
pub struct SpatialEntry {
    pub entity: Entity,
    pub position: Position,
    pub kind: EntityKind,
}

/// Grid-based spatial index over all scannable entities.
#[derive(Resource, Debug)]
pub struct SpatialGrid {
    /// Cell edge length in world units.
    pub cell_size: f64,
    cells: HashMap<Cell, Vec<SpatialEntry>>,
    /// Reverse lookup: entity to cell.
    entity_cells: HashMap<Entity, Cell>,
}

impl Default for SpatialGrid {
    fn default() -> Self {
        Self::new(DEFAULT_CELL_SIZE)
    }
}

impl SpatialGrid {
    /// A non-finite or non-positive `cell_size` falls back to [`DEFAULT_CELL_SIZE`].
    pub fn new(cell_size: f64) -> Self {
        let cell_size = if cell_size.is_finite() && cell_size > 0.0 {
            cell_size
        } else {
            DEFAULT_CELL_SIZE
        };
        Self {
            cell_size,
            cells: HashMap::new(),
            entity_cells: HashMap::new(),
        }
    }

    /// Convert world coordinates to cell coordinates.
    /// Non-finite coordinates collapse into cell 0 on that axis (`as` saturates NaN to 0).
    #[inline]
    pub fn world_to_cell(&self, pos: &Position) -> Cell {
        (
            (pos.x / self.cell_size).floor() as i64,
            (pos.y / self.cell_size).floor() as i64,
            (pos.z / self.cell_size).floor() as i64,
        )
    }

    /// Clear all entries (called before rebuilding each tick).
    pub fn clear(&mut self) {
        self.cells.clear();
        self.entity_cells.clear();
    }

    /// Insert or move an entity.
    pub fn insert(&mut self, entity: Entity, position: Position, kind: EntityKind) {
        let cell = self.world_to_cell(&position);

        if let Some(old_cell) = self.entity_cells.get(&entity).copied() {
            if let Some(entries) = self.cells.get_mut(&old_cell) {
                entries.retain(|e| e.entity != entity);
            }
        }

        let entry = SpatialEntry { entity, position, kind };
        self.cells.entry(cell).or_default().push(entry);
        self.entity_cells.insert(entity, cell);
    }

    pub fn remove(&mut self, entity: Entity) {
        if let Some(cell) = self.entity_cells.remove(&entity) {
            if let Some(entries) = self.cells.get_mut(&cell) {
                entries.retain(|e| e.entity != entity);
            }
        }
    }

    /// All entries of `kind` inside `region` (inclusive), ordered by entity id
    /// so repeated queries over an unchanged world return the same sequence.
    pub fn query_region(&self, kind: EntityKind, region: &ScanRegion) -> Vec<SpatialEntry> {
        // Pad by one cell: the containment test and the bound arithmetic round differently.
        let (a, b) = (self.world_to_cell(&region.min()), self.world_to_cell(&region.max()));
        let lo = (
            a.0.min(b.0).saturating_sub(1),
            a.1.min(b.1).saturating_sub(1),
            a.2.min(b.2).saturating_sub(1),
        );
        let hi = (
            a.0.max(b.0).saturating_add(1),
            a.1.max(b.1).saturating_add(1),
            a.2.max(b.2).saturating_add(1),
        );
        let span = |a: i64, b: i64| b.abs_diff(a).saturating_add(1);
        let cell_count = span(lo.0, hi.0)
            .saturating_mul(span(lo.1, hi.1))
            .saturating_mul(span(lo.2, hi.2));

        let mut results: Vec<SpatialEntry> = if cell_count > self.cells.len() as u64 {
            // Region covers more cells than are occupied: walk occupied cells instead.
            self.cells
                .values()
                .flatten()
                .filter(|e| e.kind == kind && region.contains(&e.position))
                .copied()
                .collect()
        } else {
            let mut found = Vec::new();
            for cx in lo.0..=hi.0 {
                for cy in lo.1..=hi.1 {
                    for cz in lo.2..=hi.2 {
                        if let Some(entries) = self.cells.get(&(cx, cy, cz)) {
                            found.extend(
                                entries
                                    .iter()
                                    .filter(|e| e.kind == kind && region.contains(&e.position))
                                    .copied(),
                            );
                        }
                    }
                }
            }
            found
        };

        results.sort_by_key(|e| e.entity);
        results
    }

    pub fn cell_count(&self, cell: Cell) -> usize {
        self.cells.get(&cell).map(|v| v.len()).unwrap_or(0)
    }

    pub fn total_count(&self) -> usize {
        self.entity_cells.len()
    }
}

/// System that rebuilds the spatial grid from current positions each tick.
pub fn spatial_grid_update_system(
    mut grid: ResMut<SpatialGrid>,
    query: Query<(Entity, &Position, &EntityKind)>,
) {
    grid.clear();
    for (entity, pos, kind) in query.iter() {
        grid.insert(entity, *pos, *kind);
    }
}
