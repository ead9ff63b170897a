use bevy_ecs::prelude::*;

use crate::components::globaltransform2d::GlobalTransform2D;
use crate::components::magnetic::Magnetic;
use crate::components::magnetstructure::MagnetStructure;
use crate::resources::spatialgrid::SpatialGrid;

/// Rebuild the spatial index from scratch with every magnet structure and
/// magnetic entity that has a world transform.
pub fn rebuild_spatial_grid_system(
    mut grid: ResMut<SpatialGrid>,
    query: Query<(Entity, &GlobalTransform2D), Or<(With<MagnetStructure>, With<Magnetic>)>>,
) {
    grid.clear();
    for (entity, gt) in query.iter() {
        grid.insert(entity, gt.position);
    }
}
