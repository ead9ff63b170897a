//! Dock visual state sync.
//!
//! - [`dock_visuals_system`] drains [`DockEvent`]/[`UndockEvent`] messages and
//!   writes the docking state into the `Base` and `Lights` layers of the
//!   affected entity's [`Appearance`].
//! - [`update_dock_messages`] advances both message queues once per tick.
//!   Run it after every reader.
//!
//! Undock messages are applied before dock messages. Within a tick the
//! watchdog and removal paths release welds before the scheduler creates new
//! ones, so an entity that was released and re-docked ends up `Docked`.

use bevy_ecs::prelude::*;
use log::debug;

use crate::components::appearance::{Appearance, DockingVisualState, VisualLayer};
use crate::events::dock::{DockEvent, UndockEvent};

fn set_docking_state(appearance: &mut Appearance, state: DockingVisualState) -> bool {
    let base = appearance.set_data(VisualLayer::Base, state);
    let lights = appearance.set_data(VisualLayer::Lights, state);
    base || lights
}

pub fn dock_visuals_system(
    mut docks: MessageReader<DockEvent>,
    mut undocks: MessageReader<UndockEvent>,
    mut appearances: Query<&mut Appearance>,
) {
    for undock in undocks.read() {
        if let Ok(mut appearance) = appearances.get_mut(undock.entity) {
            if set_docking_state(&mut appearance, DockingVisualState::Undocked) {
                debug!("{:?} shows undocked", undock.entity);
            }
        }
    }
    for dock in docks.read() {
        if let Ok(mut appearance) = appearances.get_mut(dock.entity) {
            if set_docking_state(&mut appearance, DockingVisualState::Docked) {
                debug!("{:?} shows docked to {:?}", dock.entity, dock.target);
            }
        }
    }
}

pub fn update_dock_messages(
    mut docks: ResMut<Messages<DockEvent>>,
    mut undocks: ResMut<Messages<UndockEvent>>,
) {
    docks.update();
    undocks.update();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn visuals_schedule() -> Schedule {
        let mut schedule = Schedule::default();
        schedule.add_systems((dock_visuals_system, update_dock_messages).chain());
        schedule
    }

    fn world_with_messages() -> World {
        let mut world = World::new();
        world.init_resource::<Messages<DockEvent>>();
        world.init_resource::<Messages<UndockEvent>>();
        world
    }

    #[test]
    fn dock_then_undock_updates_both_layers() {
        let mut world = world_with_messages();
        let mut schedule = visuals_schedule();
        let port = world.spawn(Appearance::default()).id();
        let other = world.spawn_empty().id();

        world.write_message(DockEvent {
            entity: port,
            target: other,
        });
        schedule.run(&mut world);
        let appearance = world.get::<Appearance>(port).unwrap();
        assert_eq!(appearance.get_data(VisualLayer::Base), Some(DockingVisualState::Docked));
        assert_eq!(appearance.get_data(VisualLayer::Lights), Some(DockingVisualState::Docked));

        world.write_message(UndockEvent { entity: port });
        schedule.run(&mut world);
        let appearance = world.get::<Appearance>(port).unwrap();
        assert_eq!(appearance.get_data(VisualLayer::Base), Some(DockingVisualState::Undocked));
        assert_eq!(appearance.get_data(VisualLayer::Lights), Some(DockingVisualState::Undocked));
    }

    #[test]
    fn entities_without_appearance_are_skipped() {
        let mut world = world_with_messages();
        let mut schedule = visuals_schedule();
        let bare = world.spawn_empty().id();
        world.write_message(UndockEvent { entity: bare });
        schedule.run(&mut world);
        assert!(world.get::<Appearance>(bare).is_none());
    }

    #[test]
    fn messages_are_applied_once() {
        let mut world = world_with_messages();
        let mut schedule = visuals_schedule();
        let port = world.spawn(Appearance::default()).id();
        let other = world.spawn_empty().id();
        world.write_message(DockEvent {
            entity: port,
            target: other,
        });
        schedule.run(&mut world);

        // manual override must survive later ticks without new messages
        world
            .get_mut::<Appearance>(port)
            .unwrap()
            .set_data(VisualLayer::Lights, DockingVisualState::Undocked);
        schedule.run(&mut world);
        assert_eq!(
            world.get::<Appearance>(port).unwrap().get_data(VisualLayer::Lights),
            Some(DockingVisualState::Undocked)
        );
    }
}
