//! Dock and undock notifications.
//!
//! The [`Connector`](crate::systems::connector::Connector) writes a
//! [`DockEvent`] for every structure that becomes welded and an
//! [`UndockEvent`] for every structure whose weld is released. They are ECS
//! [`Message`]s: buffered, drained once per tick by each reader (see
//! [`dock_visuals_system`](crate::systems::visuals::dock_visuals_system)),
//! and aged out by [`update_dock_messages`](crate::systems::visuals::update_dock_messages).
//!
//! Readers query whatever else they need from the world.

use bevy_ecs::message::Message;
use bevy_ecs::prelude::Entity;

/// A structure has been welded to `target`.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DockEvent {
    /// The structure whose state changed.
    pub entity: Entity,
    /// The entity on the other end of the weld.
    pub target: Entity,
}

/// A structure's weld has been released.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct UndockEvent {
    pub entity: Entity,
}
