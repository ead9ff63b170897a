use bevy_ecs::prelude::{Component, Entity};

/// Marks an entity as attractable by magnets.
///
/// `magnetism` scales the pull a magnet exerts on this entity. `connected_to`
/// names the magnet this entity is currently welded to, if any; connected
/// entities are not offered as docking candidates to other magnets.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct Magnetic {
    pub connected_to: Option<Entity>,
    pub magnetism: f32,
}

impl Default for Magnetic {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl Magnetic {
    pub fn new(magnetism: f32) -> Self {
        Self {
            connected_to: None,
            magnetism,
        }
    }
}
