//! Тесты детерминизма
//!
//! Проверяем что бот-матч с одинаковым seed даёт идентичные результаты

use bevy::prelude::*;
use duel_simulation::*;

const DT: f32 = 1.0 / 64.0;

#[test]
fn test_determinism_same_seed() {
    const SEED: u64 = 12345;
    const TICK_COUNT: usize = 1000;

    // Первый прогон
    let snapshot1 = run_match(SEED, TICK_COUNT);

    // Второй прогон с тем же seed
    let snapshot2 = run_match(SEED, TICK_COUNT);

    assert_eq!(
        snapshot1, snapshot2,
        "Симуляция с одинаковым seed ({}) дала разные результаты!",
        SEED
    );
}

#[test]
fn test_determinism_multiple_runs() {
    const SEED: u64 = 42;
    const TICK_COUNT: usize = 600;

    // Запускаем 3 раза, все должны быть идентичны
    let snapshots: Vec<_> = (0..3).map(|_| run_match(SEED, TICK_COUNT)).collect();

    for (i, snapshot) in snapshots.iter().enumerate().skip(1) {
        assert_eq!(
            snapshots[0], *snapshot,
            "Прогон {} дал результат отличный от прогона 0",
            i
        );
    }
}

#[test]
fn test_different_seeds_diverge() {
    const TICK_COUNT: usize = 600;

    let a = run_match(1, TICK_COUNT);
    let b = run_match(2, TICK_COUNT);

    assert_ne!(a, b, "разные seeds дали одинаковый матч");
}

/// Запускает бот-матч и возвращает snapshot мира
fn run_match(seed: u64, tick_count: usize) -> Vec<u8> {
    let mut app = create_headless_app(seed);
    app.add_plugins(SimulationPlugin);

    let moves = MoveSet::from_library(&MoveLibrary::builtin());
    let world = app.world_mut();
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
    world.entity_mut(p2).insert(BotInput::default());

    for _ in 0..tick_count {
        step_match(world, DT);
    }

    let mut snapshot = world_snapshot::<Health>(world);
    snapshot.extend(world_snapshot::<Transform>(world));
    snapshot.extend(world_snapshot::<Fighter>(world));
    snapshot.extend(world_snapshot::<BotInput>(world));
    snapshot
}
