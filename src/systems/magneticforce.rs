//! Continuous magnetic attraction.
//!
//! Every tick, each powered and unconnected magnet pulls the magnetic
//! entities within its range. The pull follows an inverse-square law with a
//! floor on the distance, fades out quadratically towards the edge of the
//! range and weakens for fast-moving targets. The resulting impulse is split
//! evenly: the target's body is pulled towards the magnet and the magnet's
//! body towards the target.

use bevy_ecs::hierarchy::ChildOf;
use bevy_ecs::prelude::*;
use glam::Vec2;
use log::trace;

use crate::components::globaltransform2d::GlobalTransform2D;
use crate::components::grid::resolve_body;
use crate::components::magnetic::Magnetic;
use crate::components::magnetstructure::MagnetStructure;
use crate::components::power::{PowerReceiver, is_powered};
use crate::components::rigidbody::RigidBody;
use crate::resources::magnetconfig::MagnetConfig;
use crate::resources::spatialgrid::{SpatialGrid, distance};
use crate::resources::worldtime::WorldTime;

/// Inputs of a single magnet/target pull.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Attraction {
    pub strength: f32,
    pub magnetism: f32,
    pub distance: f32,
    pub range: f32,
    pub target_speed: f32,
}

/// Magnitude of the pull described by `a`, before integration over a tick.
///
/// Zero outside the range. The distance used for the inverse-square term is
/// never below `config.min_distance`; the velocity damping never drops
/// below 0.1; the result never exceeds `config.force_cap`.
pub fn compute_attraction(a: &Attraction, config: &MagnetConfig) -> f32 {
    if !(a.range > 0.0) || !(a.distance < a.range) {
        return 0.0;
    }
    let effective = a.distance.max(config.min_distance);
    let falloff = (1.0 - a.distance / a.range).clamp(0.0, 1.0).powi(2);
    let velocity_damping = (1.0 - 0.1 * a.target_speed).max(0.1);

    let force = a.strength * a.magnetism / (effective * effective)
        * config.force_multiplier
        * falloff
        * velocity_damping;
    force.clamp(0.0, config.force_cap)
}

pub fn magnetic_force_system(
    time: Res<WorldTime>,
    config: Res<MagnetConfig>,
    grid: Res<SpatialGrid>,
    magnets: Query<(Entity, &MagnetStructure, Option<&PowerReceiver>)>,
    magnetics: Query<&Magnetic>,
    globals: Query<&GlobalTransform2D>,
    parents: Query<&ChildOf>,
    mut bodies: Query<&mut RigidBody>,
) {
    let mut impulses: Vec<(Entity, Vec2)> = Vec::new();
    {
        let has_body = |e: Entity| bodies.contains(e);

        for (entity, magnet, power) in magnets.iter() {
            if magnet.connected || !is_powered(power) {
                continue;
            }
            let Ok(origin) = globals.get(entity).map(|gt| gt.position) else {
                continue;
            };
            let Some(magnet_body) = resolve_body(entity, has_body, &parents) else {
                continue;
            };

            let mut nearby = grid.entities_in_range(origin, magnet.range);
            nearby.sort();
            for target in nearby {
                if target == entity {
                    continue;
                }
                let Ok(magnetic) = magnetics.get(target) else {
                    continue;
                };
                let Ok(position) = globals.get(target).map(|gt| gt.position) else {
                    continue;
                };
                let Some(target_body) = resolve_body(target, has_body, &parents) else {
                    continue;
                };
                if target_body == magnet_body {
                    continue;
                }

                let d = distance(origin, position);
                let target_speed = bodies.get(target_body).map(|b| b.speed()).unwrap_or(0.0);
                let force = compute_attraction(
                    &Attraction {
                        strength: magnet.strength,
                        magnetism: magnetic.magnetism,
                        distance: d,
                        range: magnet.range,
                        target_speed,
                    },
                    &config,
                );
                let direction = (origin - position).normalize_or_zero();
                if force <= 0.0 || direction == Vec2::ZERO {
                    continue;
                }

                let impulse = direction * force * time.delta;
                trace!("magnet {entity:?} pulls {target:?}: force {force}, impulse {impulse}");
                impulses.push((target_body, impulse * 0.5));
                impulses.push((magnet_body, -impulse * 0.5));
            }
        }
    }

    for (body, impulse) in impulses {
        if let Ok(mut body) = bodies.get_mut(body) {
            body.apply_linear_impulse(impulse);
        }
    }
}
