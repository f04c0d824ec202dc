//! Fighter input processing: guard, jump, attack start, lateral movement.

use bevy::prelude::*;
use std::sync::Arc;

use crate::combat::{
    AttackDefinition, AttackSequence, AttackSlot, AttackStarted, CombatError, Fighter, FighterState,
    FighterVolumes, HitVolume, MoveSet,
};
use crate::components::{FighterInput, LocomotionRequest};
use crate::config::CombatConfig;

/// Highest-priority attack edge this tick: slot 1 > slot 2 > slot 3 > grab.
pub fn pick_attack_slot(input: &FighterInput) -> Option<AttackSlot> {
    if !input.any_attack_edge() {
        return None;
    }

    AttackSlot::ATTACKS
        .iter()
        .zip(input.attack_pressed.iter())
        .find(|(_, pressed)| **pressed)
        .map(|(slot, _)| *slot)
        .or(input.grab_pressed.then_some(AttackSlot::Grab))
}

/// Looks up the move for `slot` and checks the fighter can perform it.
///
/// Non-grab moves need a hit volume; grabs only use the proximity query.
pub fn resolve_attack(
    fighter: Entity,
    slot: AttackSlot,
    moves: Option<&MoveSet>,
    has_hit_volume: bool,
) -> Result<Arc<AttackDefinition>, CombatError> {
    let attack = moves
        .and_then(|moves| moves.get(slot))
        .cloned()
        .ok_or(CombatError::MissingAttack { fighter, slot })?;

    if !attack.is_grab && !has_hit_volume {
        return Err(CombatError::MissingHitVolume { fighter });
    }

    Ok(attack)
}

/// System: apply `FighterInput` to fighters that accept input.
///
/// Порядок (как в прототипе):
/// 1. guard held → Guard, released → Idle
/// 2. jump edge → jump request (Idle/Move/Guard)
/// 3. attack/grab edge, если не Guard → старт sequence (движение на этом тике не применяется)
/// 4. lateral movement + Idle ⇄ Move
///
/// Edge-флаги сбрасываются у всех бойцов, даже у тех, кто ввод игнорирует.
pub fn process_fighter_input(
    mut commands: Commands,
    config: Res<CombatConfig>,
    clock: Res<crate::combat::MatchClock>,
    mut fighters: Query<(
        Entity,
        &mut Fighter,
        &mut FighterInput,
        &mut LocomotionRequest,
        Option<&MoveSet>,
        Option<&FighterVolumes>,
    )>,
    hit_volumes: Query<(), With<HitVolume>>,
    mut started: EventWriter<AttackStarted>,
) {
    for (entity, mut fighter, mut input, mut locomotion, moves, volumes) in fighters.iter_mut() {
        let edges = *input;
        input.consume_edges();

        if !fighter.state.accepts_input() {
            continue;
        }

        // 1. Guard
        if edges.guard_held {
            fighter.state = FighterState::Guard;
        } else if fighter.state == FighterState::Guard {
            fighter.state = FighterState::Idle;
        }

        // 2. Jump
        if edges.jump_pressed {
            locomotion.jump = true;
        }

        // 3. Attack start
        if fighter.state != FighterState::Guard {
            if let Some(slot) = pick_attack_slot(&edges) {
                let has_hit_volume = volumes.is_some_and(|v| hit_volumes.contains(v.hit));

                match resolve_attack(entity, slot, moves, has_hit_volume) {
                    Ok(attack) => {
                        fighter.state = FighterState::Attack;
                        fighter.active_attack = Some(attack.clone());
                        commands.entity(entity).insert(AttackSequence::new(attack.clone()));

                        started.write(AttackStarted {
                            fighter: entity,
                            attack_name: attack.name.clone(),
                            is_grab: attack.is_grab,
                        });

                        crate::logger::log(&format!(
                            "⚔️ {} started {} (t={:.3}, {:.3}s total)",
                            fighter.label(entity),
                            attack.name,
                            clock.elapsed,
                            attack.total_duration()
                        ));
                    }
                    Err(err) => {
                        crate::logger::log_warning(&format!("⚠️ {}", err));
                        fighter.state = FighterState::Idle;
                        fighter.active_attack = None;
                    }
                }
                continue;
            }
        }

        // 4. Movement (guard не мешает ходить)
        locomotion.lateral_delta += edges.move_axis.clamp(-1.0, 1.0) * config.move_speed * clock.delta;

        let moving = edges.move_axis.abs() > config.move_deadzone;
        match fighter.state {
            FighterState::Idle if moving => fighter.state = FighterState::Move,
            FighterState::Move if !moving => fighter.state = FighterState::Idle,
            _ => {}
        }
    }
}
