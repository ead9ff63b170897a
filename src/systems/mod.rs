//! Docking systems.
//!
//! This module groups all ECS systems that advance the simulation. See
//! [`crate::game`] for the order they run in.

pub mod connector;
pub mod joints;
pub mod magnet;
pub mod magneticforce;
pub mod movement;
pub mod propagate_transforms;
pub mod selector;
pub mod spatialgrid;
pub mod time;
pub mod visuals;
