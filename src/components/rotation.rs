use bevy_ecs::prelude::Component;
use glam::Vec2;

/// Local rotation in degrees, counter-clockwise from +X.
#[derive(Component, Clone, Debug, Copy, Default, PartialEq)]
pub struct Rotation {
    pub degrees: f32,
}

impl Rotation {
    pub fn new(degrees: f32) -> Self {
        Self { degrees }
    }

    /// Unit vector the rotation faces along.
    pub fn forward(&self) -> Vec2 {
        forward(self.degrees)
    }
}

/// Unit facing vector for an angle in degrees: `(cos θ, sin θ)`.
pub fn forward(degrees: f32) -> Vec2 {
    let (sin, cos) = degrees.to_radians().sin_cos();
    Vec2::new(cos, sin)
}

/// Rotate a 2D vector by `degrees`.
pub fn rotate(v: Vec2, degrees: f32) -> Vec2 {
    let (sin, cos) = degrees.to_radians().sin_cos();
    Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn forward_at_zero_points_along_x() {
        let f = Rotation::new(0.0).forward();
        assert!(approx_eq(f.x, 1.0));
        assert!(approx_eq(f.y, 0.0));
    }

    #[test]
    fn forward_at_ninety_points_along_y() {
        let f = forward(90.0);
        assert!(approx_eq(f.x, 0.0));
        assert!(approx_eq(f.y, 1.0));
    }

    #[test]
    fn rotate_quarter_turn() {
        let v = rotate(Vec2::new(2.0, 0.0), 90.0);
        assert!(approx_eq(v.x, 0.0));
        assert!(approx_eq(v.y, 2.0));
    }
}
