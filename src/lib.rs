//! Magnetic grid docking on `bevy_ecs`.
//!
//! Docking ports ([`components::magnetstructure::MagnetStructure`]) mounted on
//! grids periodically scan for compatible targets, weld their grid to the
//! closest one within connect range, and pull nearby magnetic bodies towards
//! themselves in between. Dock state changes are mirrored into appearance
//! layers for a renderer to pick up.
//!
//! This module exposes the components, resources, systems and events for
//! use in integration tests and as a reusable library; see [`game`] for the
//! world setup and update order.

pub mod components;
pub mod events;
pub mod game;
pub mod resources;
pub mod scene;
pub mod systems;
