//! Time update system.
//!
//! Updates the shared [`WorldTime`](crate::resources::worldtime::WorldTime)
//! resource once per tick, applying `time_scale` to the provided delta.
use std::time::Duration;

use bevy_ecs::prelude::*;

use crate::resources::worldtime::WorldTime;

/// Update elapsed and delta on the `WorldTime` resource.
///
/// `dt` is expected to be the unscaled tick delta in seconds. The system
/// applies the current `time_scale` and writes both `elapsed` and `delta`.
/// Negative or non-finite deltas are treated as zero so the clock never runs
/// backwards.
pub fn update_world_time(world: &mut World, dt: f32) {
    let mut wt = world.resource_mut::<WorldTime>();
    let scaled_dt = dt * wt.time_scale;
    let scaled_dt = if scaled_dt.is_finite() && scaled_dt > 0.0 {
        scaled_dt
    } else {
        0.0
    };
    wt.elapsed += Duration::from_secs_f32(scaled_dt);
    wt.delta = scaled_dt;
    wt.frame_count += 1;
}
