//! Computed world-space transform for entities in a hierarchy.
//!
//! A docking port is a child of its grid: its [`MapPosition`](super::mapposition::MapPosition)
//! and [`Rotation`](super::rotation::Rotation) are interpreted as local to the grid.
//! The [`propagate_transforms`](crate::systems::propagate_transforms::propagate_transforms)
//! system computes the resulting world-space values and stores them here.
//! Distance checks, spatial queries and joint reference angles all read this
//! component.

use bevy_ecs::prelude::*;
use glam::Vec2;

/// Computed world-space transform.
///
/// This component is managed by the transform propagation system. For root
/// entities it mirrors the local MapPosition/Rotation. For child entities it
/// contains the composed result of the full ancestor chain.
#[derive(Component, Clone, Copy, Debug, Default, PartialEq)]
pub struct GlobalTransform2D {
    /// World-space position.
    pub position: Vec2,
    /// World-space rotation in degrees.
    pub rotation_degrees: f32,
}

impl GlobalTransform2D {
    pub fn new(position: Vec2, rotation_degrees: f32) -> Self {
        Self {
            position,
            rotation_degrees,
        }
    }
}
