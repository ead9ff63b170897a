//! Local position of an entity.
//!
//! For root entities (grids, free debris) this is a world-space position. For
//! entities parented with [`ChildOf`](bevy_ecs::hierarchy::ChildOf), such as a
//! docking port mounted on a grid, it is the offset from the parent's origin
//! in the parent's frame.

use bevy_ecs::prelude::Component;
use glam::Vec2;

#[derive(Component, Clone, Copy, Debug, Default, PartialEq)]
pub struct MapPosition {
    pub pos: Vec2,
}

impl MapPosition {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
        }
    }
}
