//! Data-driven scene spawning.
//!
//! A scene is a list of grids, each a rigid body with docking ports mounted
//! on it. [`spawn_scene`] turns a [`SceneData`] into entities: one root per
//! grid carrying [`Grid`], [`RigidBody`] and its transform, and one child per
//! port carrying a [`MagnetStructure`] built from the [`MagnetConfig`]
//! defaults plus the port's overrides.
//!
//! # JSON Format
//!
//! ```json
//! {
//!   "grids": [
//!     {
//!       "name": "station", "x": 0.0, "y": 0.0, "mass": 0.0,
//!       "ports": [
//!         { "x": 2.0, "y": 0.0, "tags": ["DockingPort"], "connects_to": ["DockingPort"] }
//!       ]
//!     },
//!     {
//!       "name": "shuttle", "x": 9.0, "y": 0.5, "mass": 10.0,
//!       "velocity": [-0.5, 0.0], "magnetism": 1.0,
//!       "ports": [
//!         { "x": -2.0, "y": 0.0, "rotation": 180.0, "tags": ["DockingPort"],
//!           "connects_to": ["DockingPort"], "powered": false }
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! Omitted fields take their defaults: rotation `0`, mass `1`, velocity zero,
//! no tags, not magnetic, ports powered with the configured ranges.

use bevy_ecs::hierarchy::ChildOf;
use bevy_ecs::prelude::*;
use glam::Vec2;
use log::info;
use serde::{Deserialize, Serialize};

use crate::components::appearance::Appearance;
use crate::components::globaltransform2d::GlobalTransform2D;
use crate::components::grid::Grid;
use crate::components::magnetic::Magnetic;
use crate::components::mapposition::MapPosition;
use crate::components::power::PowerReceiver;
use crate::components::rigidbody::RigidBody;
use crate::components::rotation::{Rotation, rotate};
use crate::components::tags::Tags;
use crate::resources::magnetconfig::MagnetConfig;

fn default_mass() -> f32 {
    1.0
}

fn default_powered() -> bool {
    true
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct SceneData {
    pub grids: Vec<GridDef>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct GridDef {
    #[serde(default)]
    pub name: String,
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub rotation: f32,
    /// `<= 0` spawns a static grid.
    #[serde(default = "default_mass")]
    pub mass: f32,
    #[serde(default)]
    pub velocity: [f32; 2],
    #[serde(default)]
    pub tags: Vec<String>,
    /// Makes the whole grid attractable by other grids' magnets.
    #[serde(default)]
    pub magnetism: Option<f32>,
    #[serde(default)]
    pub ports: Vec<PortDef>,
}

/// A docking port, positioned relative to its grid.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PortDef {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub rotation: f32,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "default_powered")]
    pub powered: bool,
    #[serde(default)]
    pub connects_to: Vec<String>,
    #[serde(default)]
    pub range: Option<f32>,
    #[serde(default)]
    pub connect_range: Option<f32>,
}

impl SceneData {
    pub fn load_from_file(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let file_content = std::fs::read_to_string(path)?;
        Self::from_json(&file_content)
    }

    pub fn from_json(text: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let scene: SceneData = serde_json::from_str(text)?;
        Ok(scene)
    }

    /// A static station and a shuttle drifting towards it, port to port.
    pub fn default_scene() -> Self {
        let port = |x: f32, rotation: f32| PortDef {
            x,
            y: 0.0,
            rotation,
            tags: vec!["DockingPort".to_string()],
            powered: true,
            connects_to: vec!["DockingPort".to_string()],
            range: None,
            connect_range: None,
        };
        SceneData {
            grids: vec![
                GridDef {
                    name: "station".to_string(),
                    x: 0.0,
                    y: 0.0,
                    rotation: 0.0,
                    mass: 0.0,
                    velocity: [0.0, 0.0],
                    tags: vec!["Station".to_string()],
                    magnetism: None,
                    ports: vec![port(2.0, 0.0)],
                },
                GridDef {
                    name: "shuttle".to_string(),
                    x: 9.0,
                    y: 0.5,
                    rotation: 0.0,
                    mass: 10.0,
                    velocity: [-0.5, 0.0],
                    tags: vec!["Shuttle".to_string()],
                    magnetism: Some(1.0),
                    ports: vec![port(-2.0, 180.0)],
                },
            ],
        }
    }
}

/// Spawn every grid of `scene` with its ports. Returns the grid roots in
/// scene order.
pub fn spawn_scene(world: &mut World, scene: &SceneData, config: &MagnetConfig) -> Vec<Entity> {
    let mut roots = Vec::with_capacity(scene.grids.len());

    for def in &scene.grids {
        let position = Vec2::new(def.x, def.y);
        let mut root = world.spawn((
            Grid,
            MapPosition::new(def.x, def.y),
            Rotation::new(def.rotation),
            GlobalTransform2D::new(position, def.rotation),
            RigidBody::new(def.mass).with_velocity(Vec2::from(def.velocity)),
            Tags::new(def.tags.iter().cloned()),
        ));
        if let Some(magnetism) = def.magnetism {
            root.insert(Magnetic::new(magnetism));
        }
        let grid = root.id();

        for port in &def.ports {
            let mut magnet = config
                .structure_template()
                .with_connects_to(port.connects_to.iter().cloned());
            if let Some(range) = port.range {
                magnet = magnet.with_range(range);
            }
            let connect_range = port.connect_range.unwrap_or(magnet.connect_range);
            magnet = magnet.with_connect_range(connect_range);

            let local = Vec2::new(port.x, port.y);
            world.spawn((
                MapPosition::new(port.x, port.y),
                Rotation::new(port.rotation),
                GlobalTransform2D::new(
                    position + rotate(local, def.rotation),
                    def.rotation + port.rotation,
                ),
                Tags::new(port.tags.iter().cloned()),
                PowerReceiver::new(port.powered),
                Appearance::default(),
                magnet,
                ChildOf(grid),
            ));
        }

        info!(
            "Spawned grid '{}' {:?} at ({}, {}) with {} ports",
            def.name,
            grid,
            def.x,
            def.y,
            def.ports.len()
        );
        roots.push(grid);
    }

    roots
}

/// Scatter `count` loose magnetic debris bodies within `radius` of the origin.
pub fn scatter_debris(world: &mut World, rng: &mut fastrand::Rng, count: usize, radius: f32) -> Vec<Entity> {
    (0..count)
        .map(|_| {
            let angle = rng.f32() * 360.0;
            let distance = rng.f32() * radius;
            let position = rotate(Vec2::new(distance, 0.0), angle);
            world
                .spawn((
                    MapPosition::new(position.x, position.y),
                    GlobalTransform2D::new(position, 0.0),
                    RigidBody::new(0.5 + rng.f32() * 2.0).with_friction(0.1),
                    Magnetic::new(0.2 + rng.f32() * 0.8),
                    Tags::new(["Debris"]),
                ))
                .id()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::magnetstructure::MagnetStructure;

    #[test]
    fn json_defaults_are_applied() {
        let scene = SceneData::from_json(
            r#"{ "grids": [ { "x": 1.0, "y": 2.0, "ports": [ { "x": 0.5, "y": 0.0 } ] } ] }"#,
        )
        .unwrap();
        let grid = &scene.grids[0];
        assert_eq!(grid.mass, 1.0);
        assert_eq!(grid.velocity, [0.0, 0.0]);
        assert!(grid.magnetism.is_none());
        assert!(grid.ports[0].powered);
        assert!(grid.ports[0].connects_to.is_empty());
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(SceneData::from_json("{ \"grids\": 3 }").is_err());
    }

    #[test]
    fn ports_spawn_as_children_with_world_transforms() {
        let mut world = World::new();
        let scene = SceneData {
            grids: vec![GridDef {
                name: "g".to_string(),
                x: 10.0,
                y: 0.0,
                rotation: 90.0,
                mass: 3.0,
                velocity: [0.0, 0.0],
                tags: vec![],
                magnetism: None,
                ports: vec![PortDef {
                    x: 2.0,
                    y: 0.0,
                    rotation: 0.0,
                    tags: vec!["DockingPort".to_string()],
                    powered: false,
                    connects_to: vec![],
                    range: Some(8.0),
                    connect_range: Some(12.0),
                }],
            }],
        };
        let roots = spawn_scene(&mut world, &scene, &MagnetConfig::new());
        assert_eq!(roots.len(), 1);

        let mut ports = world.query::<(&ChildOf, &MagnetStructure, &GlobalTransform2D, &PowerReceiver)>();
        let (parent, magnet, gt, power) = ports.single(&world).unwrap();
        assert_eq!(parent.parent(), roots[0]);
        assert_eq!(magnet.range, 8.0);
        assert_eq!(magnet.connect_range, 8.0);
        assert!(!power.powered);
        assert!((gt.position.x - 10.0).abs() < 1e-4);
        assert!((gt.position.y - 2.0).abs() < 1e-4);
    }

    #[test]
    fn debris_is_seeded_and_bounded() {
        let mut a = World::new();
        let mut b = World::new();
        let ea = scatter_debris(&mut a, &mut fastrand::Rng::with_seed(7), 5, 30.0);
        let eb = scatter_debris(&mut b, &mut fastrand::Rng::with_seed(7), 5, 30.0);
        for (x, y) in ea.iter().zip(eb.iter()) {
            let pa = a.get::<MapPosition>(*x).unwrap().pos;
            let pb = b.get::<MapPosition>(*y).unwrap().pos;
            assert_eq!(pa, pb);
            assert!(pa.length() <= 30.0 + 1e-3);
        }
    }
}
