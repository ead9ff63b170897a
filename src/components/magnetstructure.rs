//! Magnetic docking structure component.
//!
//! A [`MagnetStructure`] lets its entity periodically scan for nearby
//! compatible structures and weld its grid to theirs. The scan is throttled by
//! `update_cooldown`; the scheduling, selection and connection logic live in
//! [`crate::systems::magnet`], [`crate::systems::selector`] and
//! [`crate::systems::connector`].
//!
//! # Connection state
//!
//! `connected`, `connected_to` and `joint` move together: either all three
//! are set, or none is. [`MagnetStructure::is_consistent`] checks this.
//! The joint itself is owned by [`JointStore`](crate::resources::joints::JointStore);
//! `joint` is only its id and must be looked up again before use.
//! `last_joint` is the id of the last weld this magnet initiated. It survives
//! a disconnect and names the weld created by its next connect.
//!
//! # Scan cache
//!
//! `nearest_entity`/`closest_distance` remember the best candidate seen so
//! far. Scans only accept strictly closer candidates, so the distance only
//! decreases until it is reset to `+inf` on connect, on disconnect, or when
//! the cached entity leaves the simulation.

use std::time::Duration;

use bevy_ecs::prelude::{Component, Entity};
use smallvec::SmallVec;

use crate::resources::joints::JointId;

pub const DEFAULT_RANGE: f32 = 20.0;
pub const DEFAULT_CONNECT_RANGE: f32 = 5.0;
pub const DEFAULT_STRENGTH: f32 = 2.0;
pub const DEFAULT_JOINT_STIFFNESS: f32 = 1.0;
pub const DEFAULT_JOINT_DAMPING: f32 = 0.7;
pub const DEFAULT_UPDATE_COOLDOWN: Duration = Duration::from_secs(2);

#[derive(Component, Clone, Debug, PartialEq)]
pub struct MagnetStructure {
    /// True iff an active joint exists.
    pub connected: bool,
    /// The other endpoint of the active joint.
    pub connected_to: Option<Entity>,
    /// Id of the weld joint in the joint store.
    pub joint: Option<JointId>,
    /// Id of the last weld this magnet initiated, or one assigned with
    /// [`MagnetStructure::with_joint_id`].
    pub last_joint: Option<JointId>,
    /// Spring frequency fed to [`linear_stiffness`](crate::resources::joints::linear_stiffness).
    /// Higher means a stiffer weld.
    pub joint_stiffness: f32,
    /// Approximate damping ratio of the weld, in `[0, 1]`.
    pub joint_damping: f32,
    /// The nearest candidate since the last reset.
    pub nearest_entity: Option<Entity>,
    /// Distance to `nearest_entity`, `+inf` when nothing is cached.
    pub closest_distance: f32,
    /// Detection radius for scans.
    pub range: f32,
    /// Maximum distance at which a connection is attempted.
    pub connect_range: f32,
    /// Pull strength used by the magnetic force.
    pub strength: f32,
    /// Tags a candidate must carry one of. Empty means "anything Magnetic".
    pub connects_to: SmallVec<[String; 2]>,
    /// When the next scan is due, as time since simulation start.
    pub next_update: Duration,
    /// Minimum simulated time between two scans.
    pub update_cooldown: Duration,
}

impl Default for MagnetStructure {
    fn default() -> Self {
        Self::new()
    }
}

impl MagnetStructure {
    pub fn new() -> Self {
        Self {
            connected: false,
            connected_to: None,
            joint: None,
            last_joint: None,
            joint_stiffness: DEFAULT_JOINT_STIFFNESS,
            joint_damping: DEFAULT_JOINT_DAMPING,
            nearest_entity: None,
            closest_distance: f32::INFINITY,
            range: DEFAULT_RANGE,
            connect_range: DEFAULT_CONNECT_RANGE,
            strength: DEFAULT_STRENGTH,
            connects_to: SmallVec::new(),
            next_update: Duration::ZERO,
            update_cooldown: DEFAULT_UPDATE_COOLDOWN,
        }
    }

    pub fn with_range(mut self, range: f32) -> Self {
        self.range = range;
        self
    }

    /// Set the connect range. It is capped at the detection range.
    pub fn with_connect_range(mut self, connect_range: f32) -> Self {
        self.connect_range = connect_range.min(self.range);
        self
    }

    pub fn with_connects_to<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.connects_to = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.update_cooldown = cooldown;
        self
    }

    /// Name the weld this magnet creates instead of deriving it from the entity.
    pub fn with_joint_id(mut self, id: impl Into<JointId>) -> Self {
        self.last_joint = Some(id.into());
        self
    }

    pub fn with_strength(mut self, strength: f32) -> Self {
        self.strength = strength;
        self
    }

    pub fn with_joint_tuning(mut self, stiffness: f32, damping: f32) -> Self {
        self.joint_stiffness = stiffness;
        self.joint_damping = damping.clamp(0.0, 1.0);
        self
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// `connected`, `connected_to` and `joint` agree with each other.
    pub fn is_consistent(&self) -> bool {
        self.connected == self.connected_to.is_some() && self.connected == self.joint.is_some()
    }

    /// Record a weld this magnet initiated.
    pub fn mark_initiated(&mut self, partner: Entity, joint: JointId) {
        self.last_joint = Some(joint.clone());
        self.mark_connected(partner, joint);
    }

    /// Record an established weld to `partner`.
    pub fn mark_connected(&mut self, partner: Entity, joint: JointId) {
        self.connected = true;
        self.connected_to = Some(partner);
        self.joint = Some(joint);
        self.closest_distance = f32::INFINITY;
    }

    /// Forget the current weld and make the magnet ready to scan again.
    pub fn clear_connection(&mut self) {
        self.connected = false;
        self.connected_to = None;
        self.joint = None;
        self.reset_scan_cache();
    }

    pub fn reset_scan_cache(&mut self) {
        self.nearest_entity = None;
        self.closest_distance = f32::INFINITY;
    }

    /// Arm the scan timer relative to `now`.
    pub fn arm(&mut self, now: Duration) {
        self.next_update = now + self.update_cooldown;
    }

    /// If a scan is due at `now`, advance the timer and return true.
    ///
    /// A scan less than one cooldown late keeps the period's phase. A magnet
    /// that missed whole periods (unpowered or connected) is re-armed from
    /// `now`, so it never scans twice within one cooldown. The timer only
    /// ever moves forward.
    pub fn try_consume_cooldown(&mut self, now: Duration) -> bool {
        if self.next_update > now {
            return false;
        }
        if self.update_cooldown.is_zero() {
            self.next_update = now;
            return true;
        }
        let late = now - self.next_update;
        self.next_update = if late >= self.update_cooldown {
            now + self.update_cooldown
        } else {
            self.next_update + self.update_cooldown
        };
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_disconnected_with_infinite_cache() {
        let magnet = MagnetStructure::new();
        assert!(!magnet.connected);
        assert!(magnet.connected_to.is_none());
        assert!(magnet.joint.is_none());
        assert!(magnet.nearest_entity.is_none());
        assert_eq!(magnet.closest_distance, f32::INFINITY);
        assert!(magnet.is_consistent());
        assert_eq!(magnet.update_cooldown, DEFAULT_UPDATE_COOLDOWN);
    }

    #[test]
    fn connect_range_is_capped_by_range() {
        let magnet = MagnetStructure::new().with_range(4.0).with_connect_range(10.0);
        assert_eq!(magnet.connect_range, 4.0);
    }

    #[test]
    fn joint_damping_is_clamped_to_ratio() {
        let magnet = MagnetStructure::new().with_joint_tuning(3.0, 1.5);
        assert_eq!(magnet.joint_stiffness, 3.0);
        assert_eq!(magnet.joint_damping, 1.0);
    }

    #[test]
    fn mark_and_clear_keep_tri_state_consistent() {
        let mut world = bevy_ecs::world::World::new();
        let partner = world.spawn_empty().id();
        let mut magnet = MagnetStructure::new();
        magnet.closest_distance = 3.0;

        magnet.mark_connected(partner, JointId::from("magnet1"));
        assert!(magnet.is_consistent());
        assert_eq!(magnet.connected_to, Some(partner));
        assert_eq!(magnet.closest_distance, f32::INFINITY);

        magnet.clear_connection();
        assert!(magnet.is_consistent());
        assert!(!magnet.connected);
        assert!(magnet.joint.is_none());
    }

    #[test]
    fn cooldown_advances_by_whole_periods() {
        let mut magnet = MagnetStructure::new().with_cooldown(Duration::from_secs(2));
        magnet.arm(Duration::ZERO);
        assert_eq!(magnet.next_update, Duration::from_secs(2));

        assert!(!magnet.try_consume_cooldown(Duration::from_millis(1999)));
        assert!(magnet.try_consume_cooldown(Duration::from_millis(2500)));
        assert_eq!(magnet.next_update, Duration::from_secs(4));
        assert!(!magnet.try_consume_cooldown(Duration::from_millis(3000)));
    }

    #[test]
    fn cooldown_rearms_after_missed_periods() {
        let mut magnet = MagnetStructure::new().with_cooldown(Duration::from_secs(2));
        magnet.arm(Duration::ZERO);

        assert!(magnet.try_consume_cooldown(Duration::from_secs(20)));
        assert_eq!(magnet.next_update, Duration::from_secs(22));
        assert!(!magnet.try_consume_cooldown(Duration::from_millis(21_500)));

        assert!(magnet.try_consume_cooldown(Duration::from_millis(25_300)));
        assert_eq!(magnet.next_update, Duration::from_millis(27_300));
    }

    #[test]
    fn zero_cooldown_fires_once_per_instant() {
        let mut magnet = MagnetStructure::new().with_cooldown(Duration::ZERO);
        assert!(magnet.try_consume_cooldown(Duration::from_secs(5)));
        assert_eq!(magnet.next_update, Duration::from_secs(5));
        assert!(magnet.try_consume_cooldown(Duration::from_millis(5_100)));
    }

    #[test]
    fn initiator_remembers_its_joint_id_across_disconnect() {
        let mut world = bevy_ecs::world::World::new();
        let partner = world.spawn_empty().id();
        let mut initiator = MagnetStructure::new();
        let mut receiver = MagnetStructure::new();

        initiator.mark_initiated(partner, JointId::from("magnet9"));
        receiver.mark_connected(partner, JointId::from("magnet9"));
        initiator.clear_connection();
        receiver.clear_connection();

        assert!(initiator.is_consistent() && receiver.is_consistent());
        assert_eq!(initiator.last_joint, Some(JointId::from("magnet9")));
        assert!(receiver.last_joint.is_none());
    }
}
