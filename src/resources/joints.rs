//! Weld joint store.
//!
//! The [`JointStore`] resource owns every weld joint in the world, keyed by a
//! string id. Magnets never own a joint: they remember its [`JointId`] and
//! look the joint up again when they need it. The joint may already have been
//! removed from elsewhere (e.g. one side despawning).
//!
//! Creation is idempotent by id: asking for a joint whose id already exists
//! returns the existing joint (rebinding its bodies), so two code paths that
//! weld the same pair in one tick never produce duplicates.
//!
//! The joints are enforced by
//! [`joint_spring_system`](crate::systems::joints::joint_spring_system).

use std::fmt;

use bevy_ecs::prelude::{Entity, Resource};
use glam::Vec2;
use rustc_hash::FxHashMap;

/// Identity of a joint inside the [`JointStore`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JointId(pub String);

impl JointId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for JointId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for JointId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for JointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A spring-like constraint holding two bodies together at fixed anchors.
#[derive(Clone, Debug, PartialEq)]
pub struct WeldJoint {
    pub id: JointId,
    pub body_a: Entity,
    pub body_b: Entity,
    /// Anchor on `body_a`, in `body_a`'s local frame.
    pub local_anchor_a: Vec2,
    /// Anchor on `body_b`, in `body_b`'s local frame.
    pub local_anchor_b: Vec2,
    /// Target world rotation of `body_b` minus that of `body_a`, in degrees.
    pub reference_angle: f32,
    pub stiffness: f32,
    pub damping: f32,
    pub collide_connected: bool,
}

impl WeldJoint {
    pub fn new(id: JointId, body_a: Entity, body_b: Entity) -> Self {
        Self {
            id,
            body_a,
            body_b,
            local_anchor_a: Vec2::ZERO,
            local_anchor_b: Vec2::ZERO,
            reference_angle: 0.0,
            stiffness: 0.0,
            damping: 0.0,
            collide_connected: true,
        }
    }

    /// True if `body` is either end of the joint.
    pub fn involves(&self, body: Entity) -> bool {
        self.body_a == body || self.body_b == body
    }
}

#[derive(Resource, Debug, Default)]
pub struct JointStore {
    joints: FxHashMap<JointId, WeldJoint>,
}

impl JointStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the joint with `id`, creating it between `body_a` and `body_b`
    /// if it does not exist yet.
    pub fn get_or_create_weld(
        &mut self,
        body_a: Entity,
        body_b: Entity,
        id: &JointId,
    ) -> &mut WeldJoint {
        let joint = self
            .joints
            .entry(id.clone())
            .or_insert_with(|| WeldJoint::new(id.clone(), body_a, body_b));
        joint.body_a = body_a;
        joint.body_b = body_b;
        joint
    }

    pub fn get(&self, id: &JointId) -> Option<&WeldJoint> {
        self.joints.get(id)
    }

    pub fn contains(&self, id: &JointId) -> bool {
        self.joints.contains_key(id)
    }

    pub fn remove(&mut self, id: &JointId) -> Option<WeldJoint> {
        self.joints.remove(id)
    }

    pub fn len(&self) -> usize {
        self.joints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &WeldJoint> {
        self.joints.values()
    }
}

/// Spring parameters for a soft weld between two masses.
///
/// `frequency_hz` is the spring's natural frequency and `damping_ratio` its
/// damping ratio (1.0 is critical damping). Returns `(stiffness, damping)`
/// computed on the pair's reduced mass. A non-positive mass counts as
/// infinitely heavy, so only the other mass contributes; if both are static
/// the result is zero.
pub fn linear_stiffness(
    frequency_hz: f32,
    damping_ratio: f32,
    mass_a: f32,
    mass_b: f32,
) -> (f32, f32) {
    let mass = if mass_a > 0.0 && mass_b > 0.0 {
        mass_a * mass_b / (mass_a + mass_b)
    } else if mass_a > 0.0 {
        mass_a
    } else if mass_b > 0.0 {
        mass_b
    } else {
        0.0
    };

    let omega = 2.0 * std::f32::consts::PI * frequency_hz;
    let stiffness = mass * omega * omega;
    let damping = 2.0 * mass * damping_ratio * omega;
    (stiffness, damping)
}
