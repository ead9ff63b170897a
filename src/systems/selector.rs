//! Distance-ranked docking target selection.
//!
//! [`select_target`] is a pure query: it never touches the world. The
//! scheduler gathers candidates (position and rigid-body group already
//! resolved) and persists the result in the magnet's scan cache itself.
//!
//! # Ordering
//!
//! Candidates are visited in slice order and only a strictly closer
//! candidate replaces the running best, so on equal distances the first one
//! visited wins. The scheduler passes candidates sorted by ascending entity.

use bevy_ecs::prelude::Entity;
use glam::Vec2;
use log::debug;

use crate::resources::spatialgrid::distance;

/// A potential docking target as seen by the selector.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Candidate {
    pub entity: Entity,
    /// World position, `None` if the entity has no transform.
    pub position: Option<Vec2>,
    /// Rigid-body group the candidate belongs to, if any.
    pub body: Option<Entity>,
}

/// Pick the closest candidate to `origin`.
///
/// A candidate qualifies when it has a position, does not share
/// `self_body`, and lies strictly closer than both `max_range` and the
/// running best distance, which starts at `prior_best`. Feeding the previous
/// best back in as `prior_best` makes repeated scans only accept
/// improvements.
///
/// Returns the winner and its distance, or `None` if nothing qualifies.
pub fn select_target(
    origin: Vec2,
    self_body: Option<Entity>,
    candidates: &[Candidate],
    max_range: f32,
    prior_best: f32,
) -> Option<(Entity, f32)> {
    let mut best = if prior_best.is_nan() {
        f32::INFINITY
    } else {
        prior_best
    };
    let mut winner = None;

    for candidate in candidates {
        let Some(position) = candidate.position else {
            continue;
        };
        if self_body.is_some() && candidate.body == self_body {
            continue;
        }

        let d = distance(origin, position);
        if d < max_range && d < best {
            debug!("select_target: candidate {:?} at {}", candidate.entity, d);
            best = d;
            winner = Some((candidate.entity, d));
        }
    }

    winner
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy_ecs::world::World;

    fn entities(n: usize) -> (World, Vec<Entity>) {
        let mut world = World::new();
        let ids = (0..n).map(|_| world.spawn_empty().id()).collect();
        (world, ids)
    }

    fn at(entity: Entity, x: f32, y: f32) -> Candidate {
        Candidate {
            entity,
            position: Some(Vec2::new(x, y)),
            body: None,
        }
    }

    #[test]
    fn empty_list_selects_nothing() {
        assert!(select_target(Vec2::ZERO, None, &[], 20.0, f32::INFINITY).is_none());
    }

    #[test]
    fn closest_in_range_wins() {
        let (_world, e) = entities(3);
        let candidates = [at(e[0], 10.0, 0.0), at(e[1], 3.0, 0.0), at(e[2], 0.0, 7.0)];
        let (winner, d) = select_target(Vec2::ZERO, None, &candidates, 20.0, f32::INFINITY).unwrap();
        assert_eq!(winner, e[1]);
        assert_eq!(d, 3.0);
    }

    #[test]
    fn ties_keep_first_visited() {
        let (_world, e) = entities(2);
        let candidates = [at(e[0], 4.0, 0.0), at(e[1], 0.0, 4.0)];
        let (winner, _) = select_target(Vec2::ZERO, None, &candidates, 20.0, f32::INFINITY).unwrap();
        assert_eq!(winner, e[0]);
    }

    #[test]
    fn range_and_prior_best_are_exclusive_bounds() {
        let (_world, e) = entities(2);
        let candidates = [at(e[0], 20.0, 0.0), at(e[1], 5.0, 0.0)];
        assert!(select_target(Vec2::ZERO, None, &candidates[..1], 20.0, f32::INFINITY).is_none());
        assert!(select_target(Vec2::ZERO, None, &candidates, 20.0, 5.0).is_none());
        assert!(select_target(Vec2::ZERO, None, &candidates, 20.0, 5.5).is_some());
    }

    #[test]
    fn missing_position_and_same_body_are_skipped() {
        let (_world, e) = entities(3);
        let own_body = e[2];
        let candidates = [
            Candidate {
                entity: e[0],
                position: None,
                body: None,
            },
            Candidate {
                entity: e[1],
                position: Some(Vec2::new(1.0, 0.0)),
                body: Some(own_body),
            },
        ];
        assert!(
            select_target(Vec2::ZERO, Some(own_body), &candidates, 20.0, f32::INFINITY).is_none()
        );
    }

    #[test]
    fn nan_prior_best_behaves_like_infinity() {
        let (_world, e) = entities(1);
        let candidates = [at(e[0], 1.0, 0.0)];
        assert!(select_target(Vec2::ZERO, None, &candidates, 20.0, f32::NAN).is_some());
    }

    #[test]
    fn never_returns_out_of_bounds_candidates() {
        let (_world, e) = entities(16);
        let mut rng = fastrand::Rng::with_seed(0x6d61_6764);

        for _ in 0..500 {
            let candidates: Vec<Candidate> = e
                .iter()
                .take(rng.usize(0..16))
                .map(|&entity| at(entity, rng.f32() * 60.0 - 30.0, rng.f32() * 60.0 - 30.0))
                .collect();
            let max_range = rng.f32() * 30.0;
            let prior_best = if rng.bool() { f32::INFINITY } else { rng.f32() * 30.0 };

            if let Some((winner, d)) =
                select_target(Vec2::ZERO, None, &candidates, max_range, prior_best)
            {
                assert!(d < max_range);
                assert!(d < prior_best);
                let min = candidates
                    .iter()
                    .filter_map(|c| c.position)
                    .map(|p| p.length())
                    .fold(f32::INFINITY, f32::min);
                assert_eq!(d, min);
                assert!(candidates.iter().any(|c| c.entity == winner));
            }
        }
    }
}
