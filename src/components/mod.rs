//! ECS components for entities.
//!
//! This module groups all component types that can be attached to entities in
//! the docking world.
//!
//! Submodules overview:
//! - [`appearance`] – per-layer visual state written for a renderer
//! - [`globaltransform2d`] – world position and rotation derived from the hierarchy
//! - [`grid`] – grid marker and rigid-body group resolution
//! - [`magnetic`] – marks an entity as attractable and tracks its weld partner
//! - [`magnetstructure`] – docking magnet state, tuning and scan cache
//! - [`mapposition`] – local position, relative to the parent if any
//! - [`power`] – power receiver gating magnet activity
//! - [`rigidbody`] – mass and linear velocity of a grid or free body
//! - [`rotation`] – local rotation angle in degrees
//! - [`tags`] – classification labels used by `connects_to` filters

pub mod appearance;
pub mod globaltransform2d;
pub mod grid;
pub mod magnetic;
pub mod magnetstructure;
pub mod mapposition;
pub mod power;
pub mod rigidbody;
pub mod rotation;
pub mod tags;
