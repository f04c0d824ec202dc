//! Combat resolver: block/hit/grab decision, damage, knockback, stun.
//!
//! Чистые функции без доступа к World. Системы собирают `CombatantView`,
//! вызывают `resolve_contact` и применяют `HitOutcome` сами.

use bevy::prelude::*;

use crate::combat::{AttackDefinition, FighterState};
use crate::config::{CombatConfig, LATERAL_AXIS};

/// Read-only snapshot of a combatant for resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CombatantView {
    pub position: Vec3,
    pub facing: Vec3,
    pub state: FighterState,
}

/// Tunables taken from `CombatConfig`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolverParams {
    /// dot(defender.facing, dir_to_attacker) must exceed this to block
    pub guard_facing_threshold: f32,
    pub block_knockback_scale: f32,
}

impl Default for ResolverParams {
    fn default() -> Self {
        Self {
            guard_facing_threshold: 0.2,
            block_knockback_scale: 0.3,
        }
    }
}

impl From<&CombatConfig> for ResolverParams {
    fn from(config: &CombatConfig) -> Self {
        Self {
            guard_facing_threshold: config.guard_facing_threshold,
            block_knockback_scale: config.block_knockback_scale,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum HitKind {
    Hit,
    Blocked,
    Grab,
}

impl HitKind {
    /// State the defender enters (unless the damage kills it).
    pub fn stun_state(&self) -> FighterState {
        match self {
            HitKind::Blocked => FighterState::Blockstun,
            HitKind::Hit | HitKind::Grab => FighterState::Hitstun,
        }
    }
}

/// What happens to the defender.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitOutcome {
    pub kind: HitKind,
    pub damage: i32,
    /// Instantaneous horizontal velocity (replaces defender x/z velocity)
    pub knockback: Vec3,
    pub stun_duration: f32,
}

/// Guard check: guarding, facing the attacker, and the move allows blocking.
pub fn is_blocked(
    attacker: &CombatantView,
    defender: &CombatantView,
    attack: &AttackDefinition,
    params: &ResolverParams,
) -> bool {
    if defender.state != FighterState::Guard || !attack.can_be_blocked {
        return false;
    }

    let to_attacker = (attacker.position - defender.position).normalize_or_zero();
    defender.facing.dot(to_attacker) > params.guard_facing_threshold
}

/// Unit push direction along the lateral axis.
///
/// attacker→defender projected onto X; вырожденный случай → facing атакующего.
pub fn knockback_direction(attacker: &CombatantView, defender: &CombatantView) -> Vec3 {
    let lateral = (defender.position - attacker.position).dot(LATERAL_AXIS);
    if lateral.abs() > f32::EPSILON {
        return LATERAL_AXIS * lateral.signum();
    }

    let facing = Vec3::new(attacker.facing.x, 0.0, attacker.facing.z).normalize_or_zero();
    if facing == Vec3::ZERO {
        LATERAL_AXIS
    } else {
        facing
    }
}

/// Decides the outcome of `attack` landing on `defender`.
///
/// Grabs bypass the guard check entirely.
pub fn resolve_contact(
    attacker: &CombatantView,
    defender: &CombatantView,
    attack: &AttackDefinition,
    params: &ResolverParams,
) -> HitOutcome {
    let direction = knockback_direction(attacker, defender);

    if attack.is_grab {
        return HitOutcome {
            kind: HitKind::Grab,
            damage: attack.damage,
            knockback: direction * attack.knockback,
            stun_duration: attack.hitstun,
        };
    }

    if is_blocked(attacker, defender, attack, params) {
        return HitOutcome {
            kind: HitKind::Blocked,
            damage: 0,
            knockback: direction * attack.knockback * params.block_knockback_scale,
            stun_duration: attack.blockstun,
        };
    }

    HitOutcome {
        kind: HitKind::Hit,
        damage: attack.damage,
        knockback: direction * attack.knockback,
        stun_duration: attack.hitstun,
    }
}

/// Replaces horizontal velocity with the knockback, keeps vertical.
pub fn apply_knockback(velocity: Vec3, knockback: Vec3) -> Vec3 {
    Vec3::new(knockback.x, velocity.y, knockback.z)
}
