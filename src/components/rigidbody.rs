//! Rigid body component for grids and free-floating attractable bodies.
//!
//! A [`RigidBody`] is the unit the joint store welds together and the unit
//! impulses act on. Docking ports and other fittings do not carry their own
//! body: they resolve to the nearest ancestor (or themselves) that has one,
//! see [`Grid`](super::grid::Grid).
//!
//! A non-positive `mass` marks the body as static: impulses are ignored and
//! the joint stiffness computation treats it as infinitely heavy.

use bevy_ecs::prelude::Component;
use glam::Vec2;

/// Dynamic body storing mass and linear velocity.
///
/// Updated by the magnetic force and joint spring systems through
/// [`apply_linear_impulse`](RigidBody::apply_linear_impulse) and consumed by
/// [`integrate_bodies`](crate::systems::movement::integrate_bodies) to update
/// [`MapPosition`](super::mapposition::MapPosition).
///
/// # Fields
/// - `mass` - Mass in simulation units, `<= 0.0` means static
/// - `velocity` - Current velocity in world units per second
/// - `friction` - Velocity damping factor (0.0 = no friction, higher = more drag)
/// - `max_speed` - Optional maximum speed clamp
#[derive(Component, Clone, Debug, PartialEq)]
pub struct RigidBody {
    pub mass: f32,
    pub velocity: Vec2,
    /// Velocity damping factor. Applied as: velocity *= (1 - friction * delta).
    pub friction: f32,
    /// Optional maximum speed. If set, velocity magnitude is clamped to this value.
    pub max_speed: Option<f32>,
}

impl Default for RigidBody {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl RigidBody {
    /// Create a body with the given mass at rest, no friction and no speed limit.
    pub fn new(mass: f32) -> Self {
        Self {
            mass,
            velocity: Vec2::ZERO,
            friction: 0.0,
            max_speed: None,
        }
    }

    /// Create an immovable body.
    pub fn fixed() -> Self {
        Self::new(0.0)
    }

    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_friction(mut self, friction: f32) -> Self {
        self.friction = friction;
        self
    }

    pub fn with_max_speed(mut self, max_speed: f32) -> Self {
        self.max_speed = Some(max_speed);
        self
    }

    pub fn is_static(&self) -> bool {
        self.mass <= 0.0
    }

    /// Magnitude of the linear velocity.
    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    /// Change velocity by `impulse / mass`. Static bodies are unaffected.
    pub fn apply_linear_impulse(&mut self, impulse: Vec2) {
        if self.is_static() {
            return;
        }
        self.velocity += impulse / self.mass;
        self.clamp_speed();
    }

    /// Apply friction for a time step of `delta` seconds.
    pub fn apply_friction(&mut self, delta: f32) {
        if self.friction > 0.0 {
            let factor = (1.0 - self.friction * delta).max(0.0);
            self.velocity *= factor;
        }
    }

    fn clamp_speed(&mut self) {
        if let Some(max) = self.max_speed {
            self.velocity = self.velocity.clamp_length_max(max);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-6;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_rigidbody_new() {
        let rb = RigidBody::new(4.0);
        assert!(approx_eq(rb.mass, 4.0));
        assert_eq!(rb.velocity, Vec2::ZERO);
        assert!(approx_eq(rb.friction, 0.0));
        assert!(rb.max_speed.is_none());
        assert!(!rb.is_static());
    }

    #[test]
    fn test_impulse_divides_by_mass() {
        let mut rb = RigidBody::new(4.0);
        rb.apply_linear_impulse(Vec2::new(8.0, -4.0));
        assert!(approx_eq(rb.velocity.x, 2.0));
        assert!(approx_eq(rb.velocity.y, -1.0));
    }

    #[test]
    fn test_impulse_ignored_on_static_body() {
        let mut rb = RigidBody::fixed();
        rb.apply_linear_impulse(Vec2::new(100.0, 0.0));
        assert_eq!(rb.velocity, Vec2::ZERO);
    }

    #[test]
    fn test_impulse_respects_max_speed() {
        let mut rb = RigidBody::new(1.0).with_max_speed(5.0);
        rb.apply_linear_impulse(Vec2::new(30.0, 40.0));
        assert!(approx_eq(rb.speed(), 5.0));
    }

    #[test]
    fn test_friction_slows_body() {
        let mut rb = RigidBody::new(1.0)
            .with_velocity(Vec2::new(10.0, 0.0))
            .with_friction(0.5);
        rb.apply_friction(1.0);
        assert!(approx_eq(rb.velocity.x, 5.0));
    }

    #[test]
    fn test_friction_never_reverses_velocity() {
        let mut rb = RigidBody::new(1.0)
            .with_velocity(Vec2::new(10.0, 0.0))
            .with_friction(5.0);
        rb.apply_friction(1.0);
        assert_eq!(rb.velocity, Vec2::ZERO);
    }
}
