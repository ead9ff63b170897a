//! World setup and the per-tick update schedule.
//!
//! [`setup_world`] inserts every resource the docking systems need and
//! registers the magnet lifecycle observers. It must run before any
//! [`MagnetStructure`](crate::components::magnetstructure::MagnetStructure)
//! is spawned, otherwise the new magnet's scan timer is never armed.
//!
//! [`build_update_schedule`] returns the systems in their fixed order:
//!
//! 1. `integrate_bodies` moves bodies by last tick's velocities
//! 2. `propagate_transforms` refreshes world transforms
//! 3. `rebuild_spatial_grid_system` re-indexes magnets and magnetic entities
//! 4. `undock_watchdog_system` releases unpowered or dangling welds
//! 5. `magnet_structure_system` scans and connects
//! 6. `magnetic_force_system` and `joint_spring_system` apply impulses
//! 7. `dock_visuals_system` then `update_dock_messages`
//!
//! [`tick`] advances [`WorldTime`] and runs the schedule once.

use bevy_ecs::prelude::*;

use crate::events::dock::{DockEvent, UndockEvent};
use crate::resources::joints::JointStore;
use crate::resources::magnetconfig::MagnetConfig;
use crate::resources::spatialgrid::SpatialGrid;
use crate::resources::worldtime::WorldTime;
use crate::systems::joints::joint_spring_system;
use crate::systems::magnet::{
    arm_magnet_timer_observer, magnet_structure_system, release_magnet_on_remove_observer,
    undock_watchdog_system,
};
use crate::systems::magneticforce::magnetic_force_system;
use crate::systems::movement::integrate_bodies;
use crate::systems::propagate_transforms::propagate_transforms;
use crate::systems::spatialgrid::rebuild_spatial_grid_system;
use crate::systems::time::update_world_time;
use crate::systems::visuals::{dock_visuals_system, update_dock_messages};

pub fn setup_world(world: &mut World, config: MagnetConfig) {
    world.insert_resource(WorldTime::default());
    world.insert_resource(JointStore::new());
    world.insert_resource(SpatialGrid::new(config.spatial_cell_size));
    world.init_resource::<Messages<DockEvent>>();
    world.init_resource::<Messages<UndockEvent>>();
    world.insert_resource(config);

    world.add_observer(arm_magnet_timer_observer);
    world.add_observer(release_magnet_on_remove_observer);
    world.flush();
}

pub fn build_update_schedule() -> Schedule {
    let mut update = Schedule::default();
    update.add_systems(
        (
            integrate_bodies,
            propagate_transforms,
            rebuild_spatial_grid_system,
            undock_watchdog_system,
            magnet_structure_system,
            magnetic_force_system,
            joint_spring_system,
            dock_visuals_system,
            update_dock_messages,
        )
            .chain(),
    );
    update
}

/// Advance the clock by `dt` seconds and run one update pass.
pub fn tick(world: &mut World, update: &mut Schedule, dt: f32) {
    update_world_time(world, dt);
    update.run(world);
}
