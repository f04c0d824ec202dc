//! Headless матч бот против бота
//!
//! Usage: duel_simulation [seed] [moves.toml]
//!
//! Гоняет фиксированное число тиков через `step_match` и печатает итог.

use bevy::prelude::*;
use duel_simulation::*;
use std::path::Path;

const TICKS: u32 = 64 * 60; // 60 секунд матча при 64Hz

fn main() {
    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|arg| arg.parse().ok()).unwrap_or(42);
    let moves_path = args.next();

    println!("Starting DUEL headless match (seed: {})", seed);

    let library = match moves_path {
        Some(path) => match MoveLibrary::load_from_path(Path::new(&path)) {
            Ok(library) => library,
            Err(err) => {
                log_error(&format!("❌ Failed to load moves: {}", err));
                std::process::exit(1);
            }
        },
        None => MoveLibrary::builtin(),
    };

    println!(
        "Moves loaded ({}): {}",
        library.len(),
        library.names().collect::<Vec<_>>().join(", ")
    );

    let mut app = create_headless_app(seed);
    app.insert_resource(library.clone()).add_plugins(SimulationPlugin);
    logger::set_log_level(LogLevel::Info);

    let world = app.world_mut();
    let moves = MoveSet::from_library(&library);
    let p1 = spawn_fighter(
        world,
        FighterSpawn::new(PlayerSlot::P1, Vec3::new(-2.0, 0.0, 0.0)).with_moves(moves.clone()),
    );
    let p2 = spawn_fighter(
        world,
        FighterSpawn::new(PlayerSlot::P2, Vec3::new(2.0, 0.0, 0.0)).with_moves(moves),
    );
    link_opponents(world, p1, p2);
    world.entity_mut(p1).insert(BotInput::default());
    world.entity_mut(p2).insert(BotInput {
        guard_chance: 0.1,
        ..default()
    });

    let dt = 1.0 / 64.0;
    for tick in 0..TICKS {
        step_match(world, dt);

        let dead = [p1, p2]
            .into_iter()
            .filter(|fighter| world.get::<Fighter>(*fighter).is_some_and(|f| f.is_dead()))
            .count();

        if tick % 640 == 0 || dead > 0 {
            let hp = |fighter| {
                world
                    .get::<Health>(fighter)
                    .map(|h| (h.current, h.fraction() * 100.0))
                    .unwrap_or((0, 0.0))
            };
            let ((hp1, pct1), (hp2, pct2)) = (hp(p1), hp(p2));
            println!(
                "Tick {}: P1 HP {} ({:.0}%) | P2 HP {} ({:.0}%)",
                tick, hp1, pct1, hp2, pct2
            );
        }

        if dead > 0 {
            println!("KO at tick {}", tick);
            break;
        }
    }

    println!("Match complete!");
}
