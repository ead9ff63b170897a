//! Headless magnetic docking simulation.
//!
//! Loads the magnet configuration and a scene, then runs the update schedule
//! for a fixed number of ticks and reports which ports ended up docked.
//!
//! # Main Loop
//!
//! 1. Load `MagnetConfig` from the INI file (defaults if missing)
//! 2. Set up the ECS world, resources and lifecycle observers
//! 3. Spawn the scene (JSON file or the built-in one) and optional debris
//! 4. Tick: advance `WorldTime`, run the update schedule
//! 5. Print a summary of magnets and weld joints
//!
//! # Running
//!
//! ```sh
//! RUST_LOG=debug cargo run --release -- --ticks 600 --debris 20 --seed 42
//! ```

use std::path::PathBuf;

use bevy_ecs::prelude::*;
use clap::Parser;
use log::{error, info, warn};

use magdock::components::magnetstructure::MagnetStructure;
use magdock::components::rigidbody::RigidBody;
use magdock::game::{build_update_schedule, setup_world, tick};
use magdock::resources::joints::JointStore;
use magdock::resources::magnetconfig::MagnetConfig;
use magdock::resources::worldtime::WorldTime;
use magdock::scene::{SceneData, scatter_debris, spawn_scene};

/// Magnetic grid docking simulation
#[derive(Parser)]
#[command(version, about = "Headless magnetic grid docking simulation")]
struct Cli {
    /// INI file with magnet defaults and force tuning.
    #[arg(long, value_name = "PATH", default_value = "./magdock.ini")]
    config: PathBuf,

    /// JSON scene to spawn instead of the built-in station and shuttle.
    #[arg(long, value_name = "PATH")]
    scene: Option<PathBuf>,

    /// Number of ticks to simulate.
    #[arg(long, default_value_t = 600)]
    ticks: u32,

    /// Tick length in seconds.
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,

    /// Scatter this many loose magnetic debris bodies around the origin.
    #[arg(long, default_value_t = 0)]
    debris: usize,

    /// Seed for debris placement.
    #[arg(long)]
    seed: Option<u64>,

    /// Write the effective configuration back to the config path and exit.
    #[arg(long)]
    write_config: bool,
}

const DEBRIS_RADIUS: f32 = 30.0;
const REPORT_EVERY_TICKS: u32 = 120;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = MagnetConfig::with_path(cli.config.clone());
    if let Err(e) = config.load_from_file() {
        warn!("{e}; using default magnet config");
    }

    if cli.write_config {
        if let Err(e) = config.save_to_file() {
            error!("{e}");
            std::process::exit(1);
        }
        return;
    }

    let scene = match &cli.scene {
        Some(path) => match SceneData::load_from_file(&path.to_string_lossy()) {
            Ok(scene) => scene,
            Err(e) => {
                error!("Failed to load scene from {}: {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => SceneData::default_scene(),
    };

    // --------------- ECS world + resources ---------------
    let mut world = World::new();
    setup_world(&mut world, config.clone());
    spawn_scene(&mut world, &scene, &config);

    if cli.debris > 0 {
        let mut rng = match cli.seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        };
        let debris = scatter_debris(&mut world, &mut rng, cli.debris, DEBRIS_RADIUS);
        info!("Scattered {} debris bodies", debris.len());
    }

    let mut update = build_update_schedule();
    for n in 1..=cli.ticks {
        tick(&mut world, &mut update, cli.dt);
        if n % REPORT_EVERY_TICKS == 0 {
            let elapsed = world.resource::<WorldTime>().elapsed;
            let joints = world.resource::<JointStore>().len();
            info!("t={:.2}s: {} weld joints", elapsed.as_secs_f32(), joints);
        }
    }

    report(&mut world);
}

fn report(world: &mut World) {
    let elapsed = world.resource::<WorldTime>().elapsed;
    println!("Simulated {:.2}s", elapsed.as_secs_f32());

    let mut magnets = world.query::<(Entity, &MagnetStructure)>();
    let mut rows: Vec<(Entity, bool, Option<Entity>)> = magnets
        .iter(world)
        .map(|(e, m)| (e, m.connected, m.connected_to))
        .collect();
    rows.sort();
    for (entity, connected, partner) in rows {
        match (connected, partner) {
            (true, Some(partner)) => println!("  magnet {entity:?}: docked to {partner:?}"),
            _ => println!("  magnet {entity:?}: undocked"),
        }
    }

    let joints = world.resource::<JointStore>();
    let mut ids: Vec<String> = joints.iter().map(|j| j.id.to_string()).collect();
    ids.sort();
    println!("{} weld joints: {}", ids.len(), ids.join(", "));

    let mut bodies = world.query::<(Entity, &RigidBody)>();
    let moving = bodies.iter(world).filter(|(_, b)| b.speed() > 0.01).count();
    println!("{moving} bodies still moving");
}
