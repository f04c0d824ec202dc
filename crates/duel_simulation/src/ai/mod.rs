//! Input providers (боты и скрипты)
//!
//! Пишут `FighterInput` в `CombatSet::Input`, до того как ядро его прочитает.
//! Клавиатура/геймпад живут вне симуляции и пишут тот же компонент.

use bevy::prelude::*;

use crate::combat::{CombatSet, CombatTick};
use crate::DeterministicRng;

pub mod bot;
pub mod scripted;

// Re-export основных типов
pub use bot::{decide_bot_input, drive_bot_input, BotInput, BotState};
pub use scripted::{drive_scripted_input, ScriptFrame, ScriptedInput};

/// Bot Plugin
///
/// Порядок выполнения:
/// 1. drive_scripted_input — таймлайны
/// 2. drive_bot_input — FSM ботов (DeterministicRng)
pub struct BotPlugin;

impl Plugin for BotPlugin {
    fn build(&self, app: &mut App) {
        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(42));
        }

        app.add_systems(
            CombatTick,
            (drive_scripted_input, drive_bot_input)
                .chain()
                .in_set(CombatSet::Input),
        );
    }
}
