//! Grid marker and rigid-body group resolution.
//!
//! A grid is a rigid physical body made of many parts. The grid root carries
//! [`Grid`] and a [`RigidBody`]; fittings such as docking magnets are spawned
//! as its children. Everything that resolves to the same body entity belongs
//! to the same rigid-body group, and a magnet never welds its own group.

use bevy_ecs::hierarchy::ChildOf;
use bevy_ecs::prelude::*;

/// Marker for the root entity of a grid.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct Grid;

/// Walk `entity → parent → ...` and return the first entity for which
/// `has_body` holds, normally "carries a [`RigidBody`](super::rigidbody::RigidBody)".
///
/// Returns `None` when nothing in the chain has a body, which callers treat
/// as "not part of any grid".
pub fn resolve_body(
    entity: Entity,
    has_body: impl Fn(Entity) -> bool,
    parents: &Query<&ChildOf>,
) -> Option<Entity> {
    let mut current = entity;
    // Hierarchies here are shallow; the bound only guards against a malformed cycle.
    for _ in 0..64 {
        if has_body(current) {
            return Some(current);
        }
        current = parents.get(current).ok()?.parent();
    }
    None
}
