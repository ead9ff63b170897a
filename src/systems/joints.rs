//! Weld joint solver.
//!
//! Each [`WeldJoint`] in the [`JointStore`] acts as a damped spring pulling
//! its two anchors together: the anchor separation is scaled by the joint
//! stiffness, the relative velocity by its damping, and the result is applied
//! as equal and opposite impulses over the tick. Only the linear part is
//! solved; grids do not spin in this simulation, so `reference_angle` is
//! kept for inspection only.

use bevy_ecs::prelude::*;
use glam::Vec2;
use log::trace;

use crate::components::globaltransform2d::GlobalTransform2D;
use crate::components::rigidbody::RigidBody;
use crate::components::rotation::rotate;
use crate::resources::joints::{JointStore, WeldJoint};
use crate::resources::worldtime::WorldTime;

fn world_anchor(gt: &GlobalTransform2D, local_anchor: Vec2) -> Vec2 {
    gt.position + rotate(local_anchor, gt.rotation_degrees)
}

/// Impulse to apply to `body_a` for one tick; `body_b` receives the negation.
pub fn spring_impulse(
    joint: &WeldJoint,
    anchor_a: Vec2,
    anchor_b: Vec2,
    velocity_a: Vec2,
    velocity_b: Vec2,
    delta: f32,
) -> Vec2 {
    let stretch = anchor_b - anchor_a;
    let relative_velocity = velocity_b - velocity_a;
    (stretch * joint.stiffness + relative_velocity * joint.damping) * delta
}

pub fn joint_spring_system(
    joints: Res<JointStore>,
    time: Res<WorldTime>,
    globals: Query<&GlobalTransform2D>,
    mut bodies: Query<&mut RigidBody>,
) {
    let mut impulses: Vec<(Entity, Vec2)> = Vec::with_capacity(joints.len() * 2);

    for joint in joints.iter() {
        let (Ok(gt_a), Ok(gt_b)) = (globals.get(joint.body_a), globals.get(joint.body_b)) else {
            continue;
        };
        let (Ok(a), Ok(b)) = (bodies.get(joint.body_a), bodies.get(joint.body_b)) else {
            continue;
        };
        let impulse = spring_impulse(
            joint,
            world_anchor(gt_a, joint.local_anchor_a),
            world_anchor(gt_b, joint.local_anchor_b),
            a.velocity,
            b.velocity,
            time.delta,
        );
        trace!("joint {}: impulse {impulse}", joint.id);
        impulses.push((joint.body_a, impulse));
        impulses.push((joint.body_b, -impulse));
    }

    for (entity, impulse) in impulses {
        if let Ok(mut body) = bodies.get_mut(entity) {
            body.apply_linear_impulse(impulse);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::joints::JointId;

    #[test]
    fn stretched_spring_pulls_a_towards_b() {
        let mut world = World::new();
        let a = world.spawn_empty().id();
        let b = world.spawn_empty().id();
        let mut joint = WeldJoint::new(JointId::from("w"), a, b);
        joint.stiffness = 10.0;
        joint.damping = 0.0;

        let impulse = spring_impulse(&joint, Vec2::ZERO, Vec2::new(2.0, 0.0), Vec2::ZERO, Vec2::ZERO, 0.1);
        assert!((impulse.x - 2.0).abs() < 1e-5);
        assert_eq!(impulse.y, 0.0);
    }

    #[test]
    fn damping_opposes_separation_speed() {
        let mut world = World::new();
        let a = world.spawn_empty().id();
        let b = world.spawn_empty().id();
        let mut joint = WeldJoint::new(JointId::from("w"), a, b);
        joint.stiffness = 0.0;
        joint.damping = 4.0;

        // b drifting away along +x drags a along with it
        let impulse = spring_impulse(&joint, Vec2::ZERO, Vec2::ZERO, Vec2::ZERO, Vec2::new(1.0, 0.0), 0.5);
        assert!((impulse.x - 2.0).abs() < 1e-5);
    }
}
