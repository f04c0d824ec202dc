//! DUEL Simulation Core
//!
//! Headless ECS-ядро боя для файтинга на двоих (Bevy 0.16, без рендера).
//!
//! Слои:
//! - combat: state machine бойца, тайминги атак, hit/hurt volumes, резолвер
//! - physics: kinematic локомоция (default collaborator)
//! - ai: input providers (боты, скрипты)
//! - config / logger: тюнинг и глобальный лог
//!
//! Рендер, анимация, чтение клавиатуры живут снаружи и общаются через
//! `FighterInput`, `LocomotionRequest` и combat события.

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod ai;
pub mod combat;
pub mod components;
pub mod config;
pub mod logger;
pub mod physics;

// Re-export базовых типов для удобства
pub use ai::{BotInput, BotPlugin, ScriptedInput};
pub use combat::{
    despawn_fighter, link_opponents, spawn_fighter, step_match, AttackDefinition, AttackSlot,
    AttackStarted, CombatPlugin, CombatSet, CombatTick, DamageDealt, Fighter, FighterDied,
    FighterSpawn, FighterState, HitKind, MatchClock, MoveLibrary, MoveSet, PlayerSlot,
};
pub use components::*;
pub use config::{CombatConfig, ConfigError};
pub use logger::{init_logger, log, log_error, log_info, log_warning, LogLevel, LogPrinter};
pub use physics::LocomotionPlugin;

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        let tick_rate = app
            .world()
            .get_resource::<CombatConfig>()
            .map(|config| config.tick_rate_hz)
            .unwrap_or_else(|| CombatConfig::default().tick_rate_hz);

        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(42));
        }

        app
            // Fixed timestep 64Hz для combat tick (1/64 точно представимо во float)
            .insert_resource(Time::<Fixed>::from_hz(tick_rate))
            .add_plugins((CombatPlugin, LocomotionPlugin, BotPlugin));
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
///
/// Только MinimalPlugins + seeded RNG; combat подключается через `SimulationPlugin`.
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed));

    app
}

/// Snapshot мира для сравнения детерминизма
///
/// Компоненты сериализуются через Debug, отсортированные по Entity.
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
