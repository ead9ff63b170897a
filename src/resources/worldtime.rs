use std::time::Duration;

use bevy_ecs::prelude::Resource;

/// Simulation clock.
///
/// `elapsed` is the authoritative "now" used for scan scheduling. It is kept
/// as a [`Duration`] so that cooldown arithmetic is exact over long runs.
#[derive(Resource, Clone, Copy, Debug)]
pub struct WorldTime {
    pub elapsed: Duration,
    /// Scaled delta of the current tick, in seconds.
    pub delta: f32,
    pub time_scale: f32,
    pub frame_count: u64,
}

impl Default for WorldTime {
    fn default() -> Self {
        WorldTime {
            elapsed: Duration::ZERO,
            delta: 0.0,
            time_scale: 1.0,
            frame_count: 0,
        }
    }
}

impl WorldTime {
    pub fn with_time_scale(mut self, time_scale: f32) -> Self {
        self.time_scale = time_scale;
        self
    }
}
