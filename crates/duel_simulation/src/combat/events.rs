//! Combat events.
//!
//! Внутренние (CombatContact, GrabAttempt) связывают детекцию и резолвер
//! внутри тика. Внешние (AttackStarted, DamageDealt, FighterDied) читают
//! HUD/анимация.

use bevy::prelude::*;
use std::sync::Arc;

use crate::combat::{AttackDefinition, HitKind};

/// Where a contact came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactSource {
    /// Armed hit volume overlapped the hurt volume
    HitVolume(Entity),
    /// Grab proximity query picked the hurt volume
    Grab,
}

/// Hurt volume touched by an attack, pending resolution.
#[derive(Event, Debug, Clone)]
pub struct CombatContact {
    pub attacker: Entity,
    pub hurt_volume: Entity,
    pub attack: Arc<AttackDefinition>,
    pub source: ContactSource,
}

/// Grab startup finished; the proximity query runs this tick.
#[derive(Event, Debug, Clone)]
pub struct GrabAttempt {
    pub attacker: Entity,
    pub attack: Arc<AttackDefinition>,
}

/// Fighter committed to a move (animation trigger).
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct AttackStarted {
    pub fighter: Entity,
    pub attack_name: String,
    pub is_grab: bool,
}

/// Resolved contact applied to a defender (emitted for blocks too, with 0 damage).
#[derive(Event, Debug, Clone, PartialEq)]
pub struct DamageDealt {
    pub attacker: Entity,
    pub target: Entity,
    pub damage: i32,
    pub remaining_health: i32,
    pub kind: HitKind,
}

/// Fighter health dropped to zero or below.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct FighterDied {
    pub fighter: Entity,
    pub killer: Option<Entity>,
}

/// Swaps the double buffers of every combat event (once per tick).
///
/// `step_match` не проходит через `First`, поэтому штатный
/// `event_update_system` не срабатывает. Событие живёт два тика: читатели
/// успевают его увидеть, буферы не растут.
pub fn rotate_combat_events(world: &mut World) {
    rotate::<CombatContact>(world);
    rotate::<GrabAttempt>(world);
    rotate::<AttackStarted>(world);
    rotate::<DamageDealt>(world);
    rotate::<FighterDied>(world);
}

fn rotate<E: Event>(world: &mut World) {
    if let Some(mut events) = world.get_resource_mut::<Events<E>>() {
        events.update();
    }
}
