//! Transform propagation for grid hierarchies.
//!
//! Computes [`GlobalTransform2D`] for every root entity with a
//! [`MapPosition`] (grids, loose debris) and for all of its descendants
//! (fittings mounted on a grid).
//!
//! # Schedule position
//!
//! Should run **after** body integration and **before** the spatial index
//! rebuild, so that scans and forces see up-to-date world positions.

use bevy_ecs::hierarchy::{ChildOf, Children};
use bevy_ecs::prelude::*;

use crate::components::globaltransform2d::GlobalTransform2D;
use crate::components::mapposition::MapPosition;
use crate::components::rotation::{Rotation, rotate};

type ChildQuery<'w, 's> =
    Query<'w, 's, (&'static MapPosition, Option<&'static Rotation>, Option<&'static Children>), With<ChildOf>>;

/// Propagate transforms from root entities down through the hierarchy.
///
/// Entities that already have a `GlobalTransform2D` are updated in place.
/// Entities missing the component get it inserted via deferred [`Commands`].
pub fn propagate_transforms(
    roots: Query<(Entity, &MapPosition, Option<&Rotation>, Option<&Children>), Without<ChildOf>>,
    children_query: ChildQuery,
    mut globals: Query<&mut GlobalTransform2D>,
    mut commands: Commands,
) {
    for (root_entity, pos, rot, children) in roots.iter() {
        let root_gt = GlobalTransform2D::new(pos.pos, rot.map(|r| r.degrees).unwrap_or(0.0));
        write_global(root_entity, root_gt, &mut globals, &mut commands);

        if let Some(children) = children {
            propagate_children(&root_gt, children, &children_query, &mut globals, &mut commands);
        }
    }
}

fn write_global(
    entity: Entity,
    gt: GlobalTransform2D,
    globals: &mut Query<&mut GlobalTransform2D>,
    commands: &mut Commands,
) {
    if let Ok(mut current) = globals.get_mut(entity) {
        *current = gt;
    } else {
        commands.entity(entity).insert(gt);
    }
}

fn propagate_children(
    parent_gt: &GlobalTransform2D,
    children: &Children,
    children_query: &ChildQuery,
    globals: &mut Query<&mut GlobalTransform2D>,
    commands: &mut Commands,
) {
    for child_entity in children.iter() {
        let Ok((pos, rot, maybe_grandchildren)) = children_query.get(child_entity) else {
            continue;
        };

        let child_gt = GlobalTransform2D::new(
            parent_gt.position + rotate(pos.pos, parent_gt.rotation_degrees),
            parent_gt.rotation_degrees + rot.map(|r| r.degrees).unwrap_or(0.0),
        );
        write_global(child_entity, child_gt, globals, commands);

        if let Some(grandchildren) = maybe_grandchildren {
            propagate_children(&child_gt, grandchildren, children_query, globals, commands);
        }
    }
}
