use bevy_ecs::prelude::*;

use crate::components::mapposition::MapPosition;
use crate::components::rigidbody::RigidBody;
use crate::resources::worldtime::WorldTime;

/// Advance every body by its velocity over the current tick, after friction.
/// Fittings have no body of their own and follow their grid through
/// transform propagation.
pub fn integrate_bodies(mut query: Query<(&mut MapPosition, &mut RigidBody)>, time: Res<WorldTime>) {
    for (mut position, mut rigidbody) in query.iter_mut() {
        if rigidbody.is_static() {
            continue;
        }
        rigidbody.apply_friction(time.delta);
        position.pos += rigidbody.velocity * time.delta;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn tick(world: &mut World, delta: f32) {
        world.resource_mut::<WorldTime>().delta = delta;
        let mut schedule = Schedule::default();
        schedule.add_systems(integrate_bodies);
        schedule.run(world);
    }

    #[test]
    fn bodies_move_by_velocity_times_delta() {
        let mut world = World::new();
        world.insert_resource(WorldTime::default());
        let e = world
            .spawn((
                MapPosition::new(1.0, 1.0),
                RigidBody::new(2.0).with_velocity(Vec2::new(4.0, -2.0)),
            ))
            .id();

        tick(&mut world, 0.5);

        let pos = world.get::<MapPosition>(e).unwrap().pos;
        assert!((pos.x - 3.0).abs() < 1e-5);
        assert!((pos.y - 0.0).abs() < 1e-5);
    }

    #[test]
    fn static_bodies_stay_put() {
        let mut world = World::new();
        world.insert_resource(WorldTime::default());
        let e = world
            .spawn((
                MapPosition::new(5.0, 5.0),
                RigidBody::fixed().with_velocity(Vec2::new(1.0, 0.0)),
            ))
            .id();

        tick(&mut world, 1.0);

        assert_eq!(world.get::<MapPosition>(e).unwrap().pos, Vec2::new(5.0, 5.0));
    }
}
