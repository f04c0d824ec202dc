//! Combat core: fighter state machine, attack timing, hit resolution.
//!
//! Один тик боя = один прогон schedule `CombatTick`:
//! 1. Input      — input providers пишут `FighterInput` (боты, скрипты)
//! 2. Timers     — facing, окончание stun, продвижение attack sequence
//! 3. Actions    — `FighterInput` → guard / jump / старт атаки / движение
//! 4. Motion     — локомоция (lateral, jump, gravity, friction)
//! 5. Volumes    — hurt/hit volumes за владельцами, overlap → CombatContact
//! 6. Resolution — grab query, резолвер, применение к защищающемуся
//!
//! Время только через `MatchClock`: `step_match(world, dt)` двигает часы и
//! прогоняет schedule. `CombatPlugin` дополнительно вызывает тот же шаг из
//! FixedUpdate с `Time<Fixed>` delta.

use bevy::ecs::schedule::{ExecutorKind, ScheduleLabel};
use bevy::prelude::*;

pub mod attack;
pub mod components;
pub mod error;
pub mod events;
pub mod resolver;
pub mod spawn;
pub mod systems;

// Re-export основных типов
pub use attack::{AttackDefinition, AttackSlot, MoveLibrary, MoveSet};
pub use components::*;
pub use error::CombatError;
pub use events::{
    rotate_combat_events, AttackStarted, CombatContact, ContactSource, DamageDealt, FighterDied,
    GrabAttempt,
};
pub use resolver::{
    apply_knockback, is_blocked, knockback_direction, resolve_contact, CombatantView, HitKind,
    HitOutcome, ResolverParams,
};
pub use spawn::{despawn_fighter, link_opponents, spawn_fighter, FighterSpawn};

use crate::config::CombatConfig;

/// Schedule that runs exactly one combat tick.
#[derive(ScheduleLabel, Debug, Clone, PartialEq, Eq, Hash)]
pub struct CombatTick;

/// Ordered phases of a combat tick (chained).
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CombatSet {
    Input,
    Timers,
    Actions,
    Motion,
    Volumes,
    Resolution,
}

/// Explicit match time (no ambient clock).
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct MatchClock {
    /// Seconds since match start
    pub elapsed: f64,
    /// Delta of the current tick
    pub delta: f32,
    /// Number of ticks run
    pub tick: u64,
}

impl MatchClock {
    pub fn advance(&mut self, delta: f32) {
        self.delta = delta;
        self.elapsed += delta as f64;
        self.tick += 1;
    }
}

/// Advances `MatchClock` by `dt` and runs one `CombatTick`.
///
/// Negative or non-finite `dt` is treated as 0. Combat events written on
/// tick N stay readable through tick N + 1, then are dropped.
pub fn step_match(world: &mut World, dt: f32) {
    let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
    rotate_combat_events(world);
    world.get_resource_or_insert_with(MatchClock::default).advance(dt);

    if let Err(err) = world.try_run_schedule(CombatTick) {
        crate::logger::log_error(&format!("❌ CombatTick not registered: {}", err));
    }
}

/// Exclusive system: drive combat from FixedUpdate.
pub fn run_combat_tick(world: &mut World) {
    let Some(delta) = world.get_resource::<Time<Fixed>>().map(|time| time.delta_secs()) else {
        return;
    };
    step_match(world, delta);
}

/// Combat Plugin
///
/// Регистрирует события, ресурсы и все системы в `CombatTick`.
/// Executor однопоточный: порядок внутри тика строго детерминирован.
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        // Регистрация событий
        app.add_event::<AttackStarted>()
            .add_event::<CombatContact>()
            .add_event::<GrabAttempt>()
            .add_event::<DamageDealt>()
            .add_event::<FighterDied>();

        // init_resource не перетирает то, что вставили до плагина
        app.init_resource::<MatchClock>()
            .init_resource::<CombatConfig>();
        if !app.world().contains_resource::<MoveLibrary>() {
            app.insert_resource(MoveLibrary::builtin());
        }

        app.edit_schedule(CombatTick, |schedule| {
            schedule.set_executor_kind(ExecutorKind::SingleThreaded);
        });

        app.configure_sets(
            CombatTick,
            (
                CombatSet::Input,
                CombatSet::Timers,
                CombatSet::Actions,
                CombatSet::Motion,
                CombatSet::Volumes,
                CombatSet::Resolution,
            )
                .chain(),
        );

        app.add_systems(
            CombatTick,
            (
                // Фаза 2: таймеры (sequence до input: стартовавшая атака двигается со следующего тика)
                (
                    systems::update_facing,
                    systems::expire_stun_timers,
                    systems::advance_attack_sequences,
                )
                    .chain()
                    .in_set(CombatSet::Timers),
                // Фаза 3: input → состояние
                systems::process_fighter_input.in_set(CombatSet::Actions),
                // Фаза 5: volumes
                (systems::sync_combat_volumes, systems::detect_volume_overlaps)
                    .chain()
                    .in_set(CombatSet::Volumes),
                // Фаза 6: резолв (grab contacts пишутся после hit volume contacts)
                (systems::resolve_grab_attempts, systems::resolve_contacts)
                    .chain()
                    .in_set(CombatSet::Resolution),
            ),
        );

        app.add_systems(FixedUpdate, run_combat_tick);
    }
}
