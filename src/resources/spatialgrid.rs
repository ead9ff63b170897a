//! Spatial hash grid for proximity queries.
//!
//! Magnets ask "who is within my range" every scan and every force tick.
//! Rather than walking every entity, positions are bucketed into square cells
//! once per tick by
//! [`rebuild_spatial_grid_system`](crate::systems::spatialgrid::rebuild_spatial_grid_system)
//! and queries only visit the cells overlapping the query circle.
//!
//! ## Cell size choice
//!
//! The cell size should be on the order of the typical magnet range. A range
//! of 20 with 16-unit cells checks a 5×5 block; 1-unit cells would check
//! 41×41 cells, which is worse than brute force for small scenes. A query
//! whose block would cover more cells than are occupied walks the occupied
//! cells instead.

use bevy_ecs::prelude::*;
use glam::Vec2;
use rustc_hash::FxHashMap;

pub const DEFAULT_CELL_SIZE: f32 = 16.0;

#[derive(Resource, Debug, Clone)]
pub struct SpatialGrid {
    cell_size: f32,
    /// Map from cell coordinates to entities and their world positions.
    cells: FxHashMap<(i64, i64), Vec<(Entity, Vec2)>>,
}

impl Default for SpatialGrid {
    fn default() -> Self {
        Self::new(DEFAULT_CELL_SIZE)
    }
}

impl SpatialGrid {
    /// Create an empty grid. Non-positive or non-finite sizes fall back to
    /// [`DEFAULT_CELL_SIZE`].
    pub fn new(cell_size: f32) -> Self {
        let cell_size = if cell_size.is_finite() && cell_size > 0.0 {
            cell_size
        } else {
            DEFAULT_CELL_SIZE
        };
        Self {
            cell_size,
            cells: FxHashMap::default(),
        }
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Cell coordinates of `pos`. Out-of-range coordinates saturate.
    fn world_to_cell(&self, pos: Vec2) -> (i64, i64) {
        let x = (pos.x / self.cell_size).floor() as i64;
        let y = (pos.y / self.cell_size).floor() as i64;
        (x, y)
    }

    /// Insert an entity at a position. Call after clear() for bulk rebuild.
    pub fn insert(&mut self, entity: Entity, pos: Vec2) {
        let cell = self.world_to_cell(pos);
        self.cells.entry(cell).or_default().push((entity, pos));
    }

    /// Clear all grid data (call before each tick's rebuild).
    pub fn clear(&mut self) {
        self.cells.clear();
    }

    /// Entities in all cells overlapping the circle at `origin` with `radius`.
    ///
    /// The result is a conservative over-approximation: it may contain
    /// entities outside the circle, so callers do the exact distance check.
    pub fn entities_in_range(&self, origin: Vec2, radius: f32) -> Vec<Entity> {
        let mut found = Vec::new();
        if !radius.is_finite() || radius < 0.0 {
            return found;
        }
        let cell = self.world_to_cell(origin);
        let reach = ((radius / self.cell_size).ceil() as i64).max(1);

        let side = reach.saturating_mul(2).saturating_add(1);
        if side.saturating_mul(side) as u64 > self.cells.len() as u64 {
            let reach = reach as u64;
            for (&(cx, cy), entities) in &self.cells {
                if cx.abs_diff(cell.0) <= reach && cy.abs_diff(cell.1) <= reach {
                    found.extend(entities.iter().map(|(e, _)| *e));
                }
            }
            return found;
        }

        for dx in -reach..=reach {
            for dy in -reach..=reach {
                let key = (cell.0.saturating_add(dx), cell.1.saturating_add(dy));
                if let Some(entities) = self.cells.get(&key) {
                    found.extend(entities.iter().map(|(e, _)| *e));
                }
            }
        }
        found
    }

    pub fn len(&self) -> usize {
        self.cells.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Euclidean distance between two world positions.
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    a.distance(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_finds_neighbours_across_cells() {
        let mut world = World::new();
        let near = world.spawn_empty().id();
        let far = world.spawn_empty().id();
        let mut grid = SpatialGrid::new(10.0);
        grid.insert(near, Vec2::new(12.0, 0.0));
        grid.insert(far, Vec2::new(200.0, 0.0));

        let found = grid.entities_in_range(Vec2::new(1.0, 1.0), 15.0);
        assert!(found.contains(&near));
        assert!(!found.contains(&far));
    }

    #[test]
    fn clear_empties_the_grid() {
        let mut world = World::new();
        let e = world.spawn_empty().id();
        let mut grid = SpatialGrid::default();
        grid.insert(e, Vec2::ZERO);
        assert_eq!(grid.len(), 1);

        grid.clear();
        assert!(grid.is_empty());
        assert!(grid.entities_in_range(Vec2::ZERO, 100.0).is_empty());
    }

    #[test]
    fn invalid_cell_size_falls_back_to_default() {
        assert_eq!(SpatialGrid::new(0.0).cell_size(), DEFAULT_CELL_SIZE);
        assert_eq!(SpatialGrid::new(f32::NAN).cell_size(), DEFAULT_CELL_SIZE);
    }

    #[test]
    fn negative_radius_returns_nothing() {
        let mut world = World::new();
        let e = world.spawn_empty().id();
        let mut grid = SpatialGrid::default();
        grid.insert(e, Vec2::ZERO);
        assert!(grid.entities_in_range(Vec2::ZERO, -1.0).is_empty());
    }

    #[test]
    fn huge_radius_over_sparse_grid_visits_occupied_cells() {
        let mut world = World::new();
        let near = world.spawn_empty().id();
        let far = world.spawn_empty().id();
        let outside = world.spawn_empty().id();
        let mut grid = SpatialGrid::new(1.0);
        grid.insert(near, Vec2::new(3.0, 0.0));
        grid.insert(far, Vec2::new(-40_000.0, 30_000.0));
        grid.insert(outside, Vec2::new(60_000.0, 0.0));

        let started = std::time::Instant::now();
        let found = grid.entities_in_range(Vec2::ZERO, 50_000.0);
        assert!(started.elapsed() < std::time::Duration::from_millis(100));

        assert!(found.contains(&near));
        assert!(found.contains(&far));
        assert!(!found.contains(&outside));
    }

    #[test]
    fn far_positions_do_not_overflow_cell_math() {
        let mut world = World::new();
        let e = world.spawn_empty().id();
        let edge = world.spawn_empty().id();
        let mut grid = SpatialGrid::default();
        grid.insert(e, Vec2::new(1e11, 0.0));
        grid.insert(edge, Vec2::new(f32::MAX, -f32::MAX));
        // enough occupied cells that a radius-20 query walks its 5x5 block
        for i in 0..30 {
            let filler = world.spawn_empty().id();
            grid.insert(filler, Vec2::new(i as f32 * 1000.0, -5000.0));
        }

        assert_eq!(grid.entities_in_range(Vec2::new(1e11, 0.0), 20.0), vec![e]);
        assert!(grid.entities_in_range(Vec2::new(f32::MAX, -f32::MAX), 20.0).contains(&edge));
        assert!(grid.entities_in_range(Vec2::ZERO, 20.0).is_empty());
    }

    #[test]
    fn distance_is_euclidean() {
        assert_eq!(distance(Vec2::new(0.0, 0.0), Vec2::new(3.0, 4.0)), 5.0);
    }
}
