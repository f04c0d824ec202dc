//! Stun expiry: Hitstun/Blockstun → Idle.

use bevy::prelude::*;

use crate::combat::{Fighter, FighterState, MatchClock, StunTimer};

/// System: end stuns whose latest timer has elapsed.
///
/// Устаревшие таймеры (перекрытые новым stun) игнорируются в `StunTimer::poll_expired`.
pub fn expire_stun_timers(
    clock: Res<MatchClock>,
    mut fighters: Query<(Entity, &mut Fighter, &mut StunTimer)>,
) {
    for (entity, mut fighter, mut timer) in fighters.iter_mut() {
        if !timer.poll_expired(clock.elapsed) {
            continue;
        }

        if fighter.state.is_stunned() {
            fighter.state = FighterState::Idle;
            crate::logger::log(&format!(
                "✅ {} recovered from stun (t={:.3})",
                fighter.label(entity),
                clock.elapsed
            ));
        }
    }
}
