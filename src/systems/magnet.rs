//! Magnet structure scheduling and lifecycle.
//!
//! [`magnet_structure_system`] runs every tick and, for each magnet whose
//! cooldown has elapsed, scans the spatial index for compatible targets,
//! keeps the closest one in the scan cache and tries to connect to it.
//!
//! Lifecycle hooks:
//! - [`arm_magnet_timer_observer`] arms the scan timer when a magnet is added.
//! - [`release_magnet_on_remove_observer`] releases the weld when the
//!   component is removed or its entity despawned.
//! - [`undock_watchdog_system`] releases welds that lost power, lost their
//!   partner or lost their joint.
//!
//! # Gating
//!
//! A magnet that is connected or unpowered is skipped before the cooldown is
//! looked at, so its `next_update` stays where it is and it scans as soon as
//! it becomes eligible again. That scan re-arms the timer a full cooldown
//! from the current time.

use bevy_ecs::lifecycle::{Add, Remove};
use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use log::{debug, info, warn};

use crate::components::magnetstructure::MagnetStructure;
use crate::components::power::{PowerReceiver, is_powered};
use crate::components::tags::Tags;
use crate::resources::spatialgrid::SpatialGrid;
use crate::resources::worldtime::WorldTime;
use crate::systems::connector::Connector;
use crate::systems::selector::{Candidate, select_target};

/// Whether a candidate passes a magnet's `connects_to` filter.
///
/// With a non-empty filter the candidate must carry one of the listed tags;
/// with an empty filter any magnetic entity qualifies.
pub fn accepts_candidate(connects_to: &[String], tags: Option<&Tags>, is_magnetic: bool) -> bool {
    if connects_to.is_empty() {
        is_magnetic
    } else {
        tags.is_some_and(|t| t.has_any_tag(connects_to))
    }
}

pub fn magnet_structure_system(
    time: Res<WorldTime>,
    grid: Res<SpatialGrid>,
    mut connector: Connector,
    tags: Query<&Tags>,
    power: Query<&PowerReceiver>,
    magnet_ids: Query<Entity, With<MagnetStructure>>,
    alive: Query<Entity>,
) {
    let now = time.elapsed;
    let mut order: Vec<Entity> = magnet_ids.iter().collect();
    order.sort();

    for entity in order {
        let Ok(mut magnet) = connector.magnets.get_mut(entity) else {
            continue;
        };
        if magnet.is_connected() {
            continue;
        }
        if !is_powered(power.get(entity).ok()) {
            debug!("magnet {entity:?} is unpowered, skipping scan");
            continue;
        }
        if let Some(cached) = magnet.nearest_entity {
            if !alive.contains(cached) {
                debug!("magnet {entity:?}: cached target {cached:?} is gone");
                magnet.reset_scan_cache();
            }
        }
        if !magnet.try_consume_cooldown(now) {
            continue;
        }
        let range = magnet.range;
        let prior_best = magnet.closest_distance;
        let previous = magnet.nearest_entity;
        let connects_to = magnet.connects_to.clone();

        let Some(origin) = connector.world_position(entity) else {
            debug!("magnet {entity:?} has no world transform, skipping scan");
            continue;
        };
        let self_body = connector.body_of(entity);

        let mut nearby = grid.entities_in_range(origin, range);
        nearby.retain(|&e| e != entity);
        nearby.sort();
        nearby.dedup();

        let candidates: Vec<Candidate> = nearby
            .into_iter()
            .filter(|&e| {
                accepts_candidate(&connects_to, tags.get(e).ok(), connector.magnetics.contains(e))
            })
            .filter(|&e| !connector.is_taken(e))
            .map(|e| Candidate {
                entity: e,
                position: connector.world_position(e),
                body: connector.body_of(e),
            })
            .collect();

        let Some((target, d)) = select_target(origin, self_body, &candidates, range, prior_best)
        else {
            debug!(
                "magnet {entity:?}: no closer target among {} candidates",
                candidates.len()
            );
            continue;
        };

        if let Ok(mut magnet) = connector.magnets.get_mut(entity) {
            magnet.nearest_entity = Some(target);
            magnet.closest_distance = d;
        }
        if previous == Some(target) {
            debug!("magnet {entity:?}: {target:?} moved closer ({d})");
        } else {
            debug!("magnet {entity:?}: new nearest target {target:?} at {d}");
        }
        connector.connect(entity, target);
    }
}

/// Arm the scan timer of a newly added magnet so its first scan happens one
/// cooldown after it appears.
pub fn arm_magnet_timer_observer(
    add: On<Add, MagnetStructure>,
    time: Option<Res<WorldTime>>,
    mut magnets: Query<&mut MagnetStructure>,
) {
    let now = time.map(|t| t.elapsed).unwrap_or_default();
    if let Ok(mut magnet) = magnets.get_mut(add.event().entity) {
        magnet.arm(now);
        debug!("magnet {:?} armed, first scan at {:?}", add.event().entity, magnet.next_update);
    }
}

/// Release the weld of a magnet that is being removed.
pub fn release_magnet_on_remove_observer(remove: On<Remove, MagnetStructure>, mut connector: Connector) {
    if connector.disconnect(remove.event().entity) {
        info!("magnet {:?} removed while connected, weld released", remove.event().entity);
    }
}

/// Release welds whose magnet lost power, whose partner no longer exists or
/// whose joint vanished from the joint store.
pub fn undock_watchdog_system(
    mut connector: Connector,
    power: Query<&PowerReceiver>,
    magnet_ids: Query<Entity, With<MagnetStructure>>,
    alive: Query<Entity>,
) {
    let mut to_release: Vec<Entity> = Vec::new();
    for entity in magnet_ids.iter() {
        let Ok(magnet) = connector.magnets.get(entity) else {
            continue;
        };
        if !magnet.is_consistent() {
            warn!("magnet {entity:?} has inconsistent connection state: {magnet:?}");
        }
        if !magnet.is_connected() {
            continue;
        }
        if !is_powered(power.get(entity).ok()) {
            info!("magnet {entity:?} lost power while connected");
            to_release.push(entity);
        } else if magnet.connected_to.is_some_and(|p| !alive.contains(p)) {
            info!("magnet {entity:?}: partner {:?} is gone", magnet.connected_to);
            to_release.push(entity);
        } else if magnet.joint.as_ref().is_none_or(|id| !connector.has_joint(id)) {
            info!("magnet {entity:?}: joint {:?} is missing", magnet.joint);
            to_release.push(entity);
        }
    }

    to_release.sort();
    for entity in to_release {
        connector.disconnect(entity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(list: &[&str]) -> Tags {
        Tags::new(list.iter().copied())
    }

    #[test]
    fn empty_filter_accepts_only_magnetic() {
        assert!(accepts_candidate(&[], None, true));
        assert!(!accepts_candidate(&[], Some(&tags(&["Port"])), false));
    }

    #[test]
    fn tag_filter_needs_a_matching_tag() {
        let filter = vec!["DockingPort".to_string()];
        assert!(accepts_candidate(&filter, Some(&tags(&["DockingPort"])), false));
        assert!(accepts_candidate(&filter, Some(&tags(&["Hull", "DockingPort"])), true));
        assert!(!accepts_candidate(&filter, Some(&tags(&["Hull"])), true));
        assert!(!accepts_candidate(&filter, None, true));
    }
}
