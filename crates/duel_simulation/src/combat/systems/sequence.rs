//! Attack sequence driver (startup → active → recovery → Idle).

use bevy::prelude::*;

use crate::combat::{
    AttackSequence, CombatError, Fighter, FighterState, FighterVolumes, GrabAttempt, HitVolume,
    MatchClock, SequenceStep,
};

/// System: advance every attack sequence by the tick delta.
///
/// Runs before input, so a sequence started this tick first advances next tick.
/// - ActiveStarted → arm hit volume (hit set cleared)
/// - ActiveEnded → disarm
/// - GrabWindow → `GrabAttempt` event (resolved later this tick)
/// - Finished → Attack → Idle, sequence removed
///
/// Cancelled sequences (or fighters knocked out of Attack) are removed silently.
pub fn advance_attack_sequences(
    mut commands: Commands,
    clock: Res<MatchClock>,
    mut fighters: Query<(Entity, &mut Fighter, &mut AttackSequence, Option<&FighterVolumes>)>,
    mut hit_volumes: Query<&mut HitVolume, Without<Fighter>>,
    mut grab_attempts: EventWriter<GrabAttempt>,
) {
    for (entity, mut fighter, mut sequence, volumes) in fighters.iter_mut() {
        if sequence.cancelled || fighter.state != FighterState::Attack {
            commands.entity(entity).remove::<AttackSequence>();
            continue;
        }

        for step in sequence.advance(clock.delta) {
            match step {
                SequenceStep::ActiveStarted => {
                    let hit_volume = volumes.and_then(|v| hit_volumes.get_mut(v.hit).ok());
                    let Some(mut hit_volume) = hit_volume else {
                        // Hit volume пропал после старта атаки: прерываем
                        let err = CombatError::MissingHitVolume { fighter: entity };
                        crate::logger::log_warning(&format!("⚠️ {}", err));
                        sequence.cancel();
                        fighter.state = FighterState::Idle;
                        fighter.active_attack = None;
                        break;
                    };

                    hit_volume.arm(sequence.attack.clone());
                    crate::logger::log(&format!(
                        "💥 {} hit volume ON ({}, activation #{})",
                        fighter.label(entity),
                        sequence.attack.name,
                        hit_volume.activation
                    ));
                }
                SequenceStep::ActiveEnded => {
                    if let Some(mut hit_volume) = volumes.and_then(|v| hit_volumes.get_mut(v.hit).ok()) {
                        hit_volume.disarm();
                    }
                    crate::logger::log(&format!(
                        "🛡️ {} hit volume OFF ({})",
                        fighter.label(entity),
                        sequence.attack.name
                    ));
                }
                SequenceStep::GrabWindow => {
                    grab_attempts.write(GrabAttempt {
                        attacker: entity,
                        attack: sequence.attack.clone(),
                    });
                }
                SequenceStep::Finished => {
                    fighter.state = FighterState::Idle;
                    fighter.active_attack = None;
                    crate::logger::log(&format!(
                        "✅ {} finished {} (t={:.3})",
                        fighter.label(entity),
                        sequence.attack.name,
                        clock.elapsed
                    ));
                }
            }
        }

        if sequence.cancelled || sequence.is_done() {
            commands.entity(entity).remove::<AttackSequence>();
        }
    }
}
