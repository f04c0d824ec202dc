//! Bot input provider (headless матчи и soak-тесты)
//!
//! Маленький FSM поверх `FighterInput`:
//! Approach → Pressure → (Guard | Retreat) → Approach
//!
//! Архитектура:
//! - Решения только через `DeterministicRng`: одинаковый seed → одинаковый матч
//! - Бот пишет только `FighterInput`, дальше всё как у живого игрока

use bevy::prelude::*;
use rand::Rng;

use crate::combat::{Fighter, FighterState, Opponent};
use crate::components::FighterInput;
use crate::DeterministicRng;

/// Bot FSM states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub enum BotState {
    /// Идём к оппоненту
    #[default]
    Approach,
    /// В радиусе атаки: бьём / хватаем
    Pressure,
    /// Держим guard N тиков
    Guard { ticks: u32 },
    /// Отходим N тиков
    Retreat { ticks: u32 },
}

/// Bot controller component (параметры + текущее состояние FSM).
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct BotInput {
    pub state: BotState,
    /// Distance (lateral) at which the bot stops walking and starts attacking
    pub engage_range: f32,
    /// Per-tick chance to press an attack while in Pressure
    pub attack_chance: f32,
    /// Per-tick chance to switch to Guard while in Pressure
    pub guard_chance: f32,
    /// Share of attack presses that are grabs
    pub grab_chance: f32,
    /// Per-tick chance of a jump edge while approaching
    pub jump_chance: f32,
}

impl Default for BotInput {
    fn default() -> Self {
        Self {
            state: BotState::Approach,
            engage_range: 1.4,
            attack_chance: 0.15,
            guard_chance: 0.05,
            grab_chance: 0.15,
            jump_chance: 0.005,
        }
    }
}

/// Next bot state + the input to write for this tick.
///
/// `lateral` = opponent.x − self.x.
pub fn decide_bot_input(bot: &BotInput, lateral: f32, rng: &mut impl Rng) -> (BotState, FighterInput) {
    let toward = if lateral >= 0.0 { 1.0 } else { -1.0 };
    let in_range = lateral.abs() <= bot.engage_range;
    let mut input = FighterInput::default();

    let next = match bot.state {
        BotState::Approach => {
            if in_range {
                BotState::Pressure
            } else {
                input.move_axis = toward;
                input.jump_pressed = rng.gen::<f32>() < bot.jump_chance;
                BotState::Approach
            }
        }
        BotState::Pressure => {
            if !in_range {
                BotState::Approach
            } else if rng.gen::<f32>() < bot.guard_chance {
                input.guard_held = true;
                BotState::Guard { ticks: rng.gen_range(8..32) }
            } else {
                if rng.gen::<f32>() < bot.attack_chance {
                    if rng.gen::<f32>() < bot.grab_chance {
                        input.grab_pressed = true;
                    } else {
                        input.attack_pressed[rng.gen_range(0..3)] = true;
                    }
                }
                BotState::Pressure
            }
        }
        BotState::Guard { ticks } => {
            if ticks == 0 {
                BotState::Retreat { ticks: rng.gen_range(4..16) }
            } else {
                input.guard_held = true;
                BotState::Guard { ticks: ticks - 1 }
            }
        }
        BotState::Retreat { ticks } => {
            if ticks == 0 {
                BotState::Approach
            } else {
                input.move_axis = -toward;
                BotState::Retreat { ticks: ticks - 1 }
            }
        }
    };

    (next, input)
}

/// System: bots write their `FighterInput` for this tick.
///
/// Боты обходятся в порядке Entity, чтобы порядок вызовов RNG был стабилен.
/// Бот в Attack/stun всё равно думает (FSM идёт), ввод просто игнорируется ядром.
pub fn drive_bot_input(
    mut rng: ResMut<DeterministicRng>,
    mut bots: Query<(Entity, &mut BotInput, &Fighter, &Transform, Option<&Opponent>, &mut FighterInput)>,
    positions: Query<&Transform, With<Fighter>>,
) {
    let mut ordered: Vec<_> = bots.iter_mut().collect();
    ordered.sort_by_key(|(entity, ..)| *entity);

    for (_, mut bot, fighter, transform, opponent, mut input) in ordered {
        if fighter.state == FighterState::Dead {
            *input = FighterInput::default();
            continue;
        }

        let Some(opponent_transform) = opponent.and_then(|o| positions.get(o.0).ok()) else {
            continue;
        };

        let lateral = opponent_transform.translation.x - transform.translation.x;
        let (next, decided) = decide_bot_input(&bot, lateral, &mut rng.rng);
        bot.state = next;
        *input = decided;
    }
}
