//! Contact resolution: resolver outcome → defender state.

use bevy::prelude::*;

use crate::combat::{
    apply_knockback, resolve_contact, AttackSequence, CombatContact, CombatantView, ContactSource,
    DamageDealt, Fighter, FighterDied, FighterState, FighterVolumes, HitKind, HitVolume, HurtVolume,
    MatchClock, ResolverParams, StunTimer,
};
use crate::components::{Health, PhysicsBody};
use crate::config::CombatConfig;

/// System: resolve every pending contact in detection order.
///
/// Per contact:
/// 1. self-hit → skip
/// 2. hit volume contact: target already in hit set → skip, else record it
/// 3. Dead defender → skip (no damage, no transition)
/// 4. resolver → damage / knockback / stun
/// 5. apply: cancel defender's sequence + disarm, then Dead or Hitstun/Blockstun
///
/// Если боец в одном тике и бьёт, и получает удар, применяются оба контакта;
/// переход защищающегося выигрывает, потому что отменяет его собственную атаку.
pub fn resolve_contacts(
    clock: Res<MatchClock>,
    config: Res<CombatConfig>,
    mut contacts: EventReader<CombatContact>,
    mut fighters: Query<(
        &mut Fighter,
        &Transform,
        &mut Health,
        &mut StunTimer,
        &mut PhysicsBody,
        Option<&mut AttackSequence>,
        Option<&FighterVolumes>,
    )>,
    mut hit_volumes: Query<&mut HitVolume, Without<Fighter>>,
    hurt_volumes: Query<&HurtVolume, (Without<Fighter>, Without<HitVolume>)>,
    mut damage_events: EventWriter<DamageDealt>,
    mut died_events: EventWriter<FighterDied>,
) {
    let params = ResolverParams::from(&*config);

    for contact in contacts.read() {
        let Ok(hurt) = hurt_volumes.get(contact.hurt_volume) else {
            continue;
        };
        let defender = hurt.owner;

        // Self-hit
        if defender == contact.attacker {
            continue;
        }

        // Multi-hit suppression (у грабов hit set нет)
        if let ContactSource::HitVolume(hit_entity) = contact.source {
            let Ok(mut hit_volume) = hit_volumes.get_mut(hit_entity) else {
                continue;
            };
            if !hit_volume.register_hit(contact.hurt_volume) {
                continue;
            }
        }

        let attacker_view = match fighters.get(contact.attacker) {
            Ok((fighter, transform, ..)) => CombatantView {
                position: transform.translation,
                facing: fighter.facing,
                state: fighter.state,
            },
            Err(_) => continue,
        };

        let Ok((mut fighter, transform, mut health, mut stun, mut body, sequence, volumes)) =
            fighters.get_mut(defender)
        else {
            continue;
        };

        if fighter.is_dead() {
            continue;
        }

        let defender_view = CombatantView {
            position: transform.translation,
            facing: fighter.facing,
            state: fighter.state,
        };

        // Resolver
        let outcome = resolve_contact(&attacker_view, &defender_view, &contact.attack, &params);

        // Apply
        let remaining = health.take_damage(outcome.damage);
        body.velocity = apply_knockback(body.velocity, outcome.knockback);

        if let Some(mut sequence) = sequence {
            sequence.cancel();
        }
        fighter.active_attack = None;
        if let Some(mut hit_volume) = volumes.and_then(|v| hit_volumes.get_mut(v.hit).ok()) {
            hit_volume.disarm();
        }

        damage_events.write(DamageDealt {
            attacker: contact.attacker,
            target: defender,
            damage: outcome.damage,
            remaining_health: remaining,
            kind: outcome.kind,
        });

        if remaining <= 0 {
            fighter.state = FighterState::Dead;
            stun.cancel();
            died_events.write(FighterDied {
                fighter: defender,
                killer: Some(contact.attacker),
            });
            crate::logger::log_info(&format!(
                "💀 {} died ({} by {:?}, HP: {})",
                fighter.label(defender),
                contact.attack.name,
                contact.attacker,
                remaining
            ));
            continue;
        }

        fighter.state = outcome.kind.stun_state();
        stun.arm(clock.elapsed, outcome.stun_duration);

        let verb = match outcome.kind {
            HitKind::Hit => "hit",
            HitKind::Blocked => "BLOCKED",
            HitKind::Grab => "grabbed",
        };
        crate::logger::log(&format!(
            "💥 {} {} by {} (damage: {}, HP: {}, knockback: {:.2}, stun: {:.3}s)",
            fighter.label(defender),
            verb,
            contact.attack.name,
            outcome.damage,
            remaining,
            outcome.knockback.x,
            outcome.stun_duration
        ));
    }
}
