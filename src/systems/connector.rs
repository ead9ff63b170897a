//! Connecting and disconnecting magnet structures.
//!
//! [`Connector`] bundles every query and resource needed to weld two grids
//! together or to release a weld, so the scheduler, the undock watchdog and
//! the removal observer all go through one implementation.
//!
//! # Connect
//!
//! Preconditions (any failure returns `false` and changes nothing):
//! - the magnet carries a [`MagnetStructure`] that is not already connected
//! - the target is not connected (neither as a structure nor as [`Magnetic`])
//! - both resolve to a rigid body, and not to the same one
//! - both have a world transform and are closer than `connect_range`
//!
//! On success the weld is created in [`JointStore`] under the magnet's
//! `last_joint` id (or `magnet{bits}`) with spring
//! parameters from [`linear_stiffness`], both sides are marked connected and
//! a [`DockEvent`] is written for each structure involved.
//!
//! # Disconnect
//!
//! Releases the joint, clears the connection and scan cache on the magnet and
//! on a partner that points back at it, and writes [`UndockEvent`]s.
//! Disconnecting a magnet that is not connected is a no-op returning `false`.

use bevy_ecs::hierarchy::ChildOf;
use bevy_ecs::prelude::*;
use bevy_ecs::system::SystemParam;
use glam::Vec2;
use log::{debug, info, warn};

use crate::components::globaltransform2d::GlobalTransform2D;
use crate::components::grid::resolve_body;
use crate::components::magnetic::Magnetic;
use crate::components::magnetstructure::MagnetStructure;
use crate::components::rigidbody::RigidBody;
use crate::components::rotation::{forward, rotate};
use crate::events::dock::{DockEvent, UndockEvent};
use crate::resources::joints::{JointId, JointStore, linear_stiffness};
use crate::resources::magnetconfig::MagnetConfig;
use crate::resources::spatialgrid::distance;

/// Prefix of joint ids synthesized for magnets without one.
pub const MAGNET_JOINT_PREFIX: &str = "magnet";

/// Deterministic joint id for welds initiated by `magnet`.
pub fn joint_id_for(magnet: Entity) -> JointId {
    JointId(format!("{MAGNET_JOINT_PREFIX}{}", magnet.to_bits()))
}

/// Anchor of a fitting in its body's frame: the fitting's local position
/// pushed half a unit along its local facing direction.
pub fn docking_anchor(local_position: Vec2, local_rotation_degrees: f32) -> Vec2 {
    local_position + forward(local_rotation_degrees) / 2.0
}

#[derive(SystemParam)]
pub struct Connector<'w, 's> {
    pub magnets: Query<'w, 's, &'static mut MagnetStructure>,
    pub magnetics: Query<'w, 's, &'static mut Magnetic>,
    bodies: Query<'w, 's, &'static RigidBody>,
    parents: Query<'w, 's, &'static ChildOf>,
    globals: Query<'w, 's, &'static GlobalTransform2D>,
    joints: ResMut<'w, JointStore>,
    config: Res<'w, MagnetConfig>,
    docks: MessageWriter<'w, DockEvent>,
    undocks: MessageWriter<'w, UndockEvent>,
}

impl Connector<'_, '_> {
    /// Rigid-body group of `entity`.
    pub fn body_of(&self, entity: Entity) -> Option<Entity> {
        resolve_body(entity, |e| self.bodies.contains(e), &self.parents)
    }

    pub fn world_transform(&self, entity: Entity) -> Option<GlobalTransform2D> {
        self.globals.get(entity).ok().copied()
    }

    pub fn world_position(&self, entity: Entity) -> Option<Vec2> {
        self.world_transform(entity).map(|gt| gt.position)
    }

    pub fn has_joint(&self, id: &JointId) -> bool {
        self.joints.contains(id)
    }

    /// Whether `entity` is currently welded, as a structure or as a magnetic target.
    pub fn is_taken(&self, entity: Entity) -> bool {
        let as_structure = self.magnets.get(entity).is_ok_and(|m| m.connected);
        let as_magnetic = self
            .magnetics
            .get(entity)
            .is_ok_and(|m| m.connected_to.is_some());
        as_structure || as_magnetic
    }

    /// Position and rotation of `entity` in `body`'s frame.
    fn local_frame(&self, entity: Entity, body: Entity) -> Option<(Vec2, f32)> {
        let fitting = self.world_transform(entity)?;
        let body = self.world_transform(body)?;
        let offset = rotate(fitting.position - body.position, -body.rotation_degrees);
        Some((offset, fitting.rotation_degrees - body.rotation_degrees))
    }

    /// Try to weld `magnet`'s grid to `target`'s grid.
    pub fn connect(&mut self, magnet: Entity, target: Entity) -> bool {
        if magnet == target {
            debug!("connect: {magnet:?} cannot connect to itself");
            return false;
        }
        let (connect_range, joint_stiffness, joint_damping, existing_joint) =
            match self.magnets.get(magnet) {
                Ok(m) if m.connected => {
                    debug!("connect: {magnet:?} is already connected");
                    return false;
                }
                Ok(m) => (
                    m.connect_range,
                    m.joint_stiffness,
                    m.joint_damping,
                    m.last_joint.clone(),
                ),
                Err(_) => {
                    warn!("connect: {magnet:?} has no MagnetStructure");
                    return false;
                }
            };
        if self.is_taken(target) {
            debug!("connect: target {target:?} is already connected");
            return false;
        }

        let (Some(magnet_body), Some(target_body)) = (self.body_of(magnet), self.body_of(target))
        else {
            debug!("connect: {magnet:?} or {target:?} is not part of a rigid body");
            return false;
        };
        if magnet_body == target_body {
            debug!("connect: {magnet:?} and {target:?} share body {magnet_body:?}");
            return false;
        }

        let (Some(magnet_xform), Some(target_xform)) =
            (self.world_transform(magnet), self.world_transform(target))
        else {
            debug!("connect: {magnet:?} or {target:?} has no world transform");
            return false;
        };
        let d = distance(magnet_xform.position, target_xform.position);
        if !(d < connect_range) {
            debug!("connect: {target:?} at {d} is outside connect range {connect_range}");
            return false;
        }

        let (Some((magnet_local, magnet_local_rot)), Some((target_local, target_local_rot))) = (
            self.local_frame(magnet, magnet_body),
            self.local_frame(target, target_body),
        ) else {
            debug!("connect: bodies {magnet_body:?}/{target_body:?} have no world transform");
            return false;
        };

        let (Ok(body_a), Ok(body_b)) = (self.bodies.get(magnet_body), self.bodies.get(target_body))
        else {
            return false;
        };
        let (stiffness, damping) =
            linear_stiffness(joint_stiffness, joint_damping, body_a.mass, body_b.mass);

        let id = existing_joint.unwrap_or_else(|| joint_id_for(magnet));
        let collide_connected = self.config.collide_connected;
        let joint = self.joints.get_or_create_weld(magnet_body, target_body, &id);
        joint.local_anchor_a = docking_anchor(magnet_local, magnet_local_rot);
        joint.local_anchor_b = docking_anchor(target_local, target_local_rot);
        joint.reference_angle = target_xform.rotation_degrees - magnet_xform.rotation_degrees;
        joint.collide_connected = collide_connected;
        joint.stiffness = stiffness;
        joint.damping = damping;

        if let Ok(mut m) = self.magnets.get_mut(magnet) {
            m.mark_initiated(target, id.clone());
        }
        self.docks.write(DockEvent {
            entity: magnet,
            target,
        });

        if let Ok(mut t) = self.magnets.get_mut(target) {
            t.mark_connected(magnet, id.clone());
            self.docks.write(DockEvent {
                entity: target,
                target: magnet,
            });
        }
        if let Ok(mut t) = self.magnetics.get_mut(target) {
            t.connected_to = Some(magnet);
        }

        info!(
            "{magnet:?} connected to {target:?}, welding {magnet_body:?} and {target_body:?} with joint {id} (k={stiffness:.2}, c={damping:.2})"
        );
        true
    }

    /// Release `magnet`'s weld, if any.
    pub fn disconnect(&mut self, magnet: Entity) -> bool {
        let (partner, joint) = match self.magnets.get_mut(magnet) {
            Ok(mut m) if m.connected => {
                let partner = m.connected_to;
                let joint = m.joint.clone();
                m.clear_connection();
                (partner, joint)
            }
            Ok(_) => {
                debug!("disconnect: {magnet:?} is not connected");
                return false;
            }
            Err(_) => {
                debug!("disconnect: {magnet:?} has no MagnetStructure");
                return false;
            }
        };

        match &joint {
            Some(id) => {
                if self.joints.remove(id).is_none() {
                    warn!("disconnect: joint {id} of {magnet:?} was already gone");
                }
            }
            None => warn!("disconnect: {magnet:?} was connected without a joint"),
        }
        self.undocks.write(UndockEvent { entity: magnet });

        if let Some(partner) = partner {
            if let Ok(mut p) = self.magnets.get_mut(partner) {
                if p.connected_to == Some(magnet) {
                    if let Some(partner_joint) = p.joint.clone() {
                        if Some(&partner_joint) != joint.as_ref() {
                            self.joints.remove(&partner_joint);
                        }
                    }
                    p.clear_connection();
                    self.undocks.write(UndockEvent { entity: partner });
                }
            }
            if let Ok(mut m) = self.magnetics.get_mut(partner) {
                if m.connected_to == Some(magnet) {
                    m.connected_to = None;
                }
            }
        }

        info!("{magnet:?} disconnected from {partner:?}");
        true
    }
}
