//! Fighter state machine components.

use bevy::prelude::*;
use std::sync::Arc;

use crate::combat::AttackDefinition;

/// Tolerance for deadline comparisons (clock accumulates f64 seconds).
const DEADLINE_EPSILON: f64 = 1e-9;

/// Which side of the match a fighter plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum PlayerSlot {
    P1,
    P2,
}

impl PlayerSlot {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlayerSlot::P1 => "P1",
            PlayerSlot::P2 => "P2",
        }
    }

    pub fn other(&self) -> PlayerSlot {
        match self {
            PlayerSlot::P1 => PlayerSlot::P2,
            PlayerSlot::P2 => PlayerSlot::P1,
        }
    }
}

/// Action state of a fighter.
///
/// Transitions:
/// - Idle ⇄ Move (lateral input across the deadzone)
/// - Idle/Move → Guard (guard held), Guard → Idle (released)
/// - Idle/Move → Attack (attack/grab edge)
/// - Idle/Move/Guard/Attack → Hitstun/Blockstun (resolved contact)
/// - Hitstun/Blockstun → Idle (stun timer expired)
/// - * → Dead (health ≤ 0), терминальное состояние
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub enum FighterState {
    #[default]
    Idle,
    Move,
    Guard,
    Attack,
    Hitstun,
    Blockstun,
    Dead,
}

impl FighterState {
    /// States that read player input (Attack/stun/Dead ignore it).
    pub fn accepts_input(&self) -> bool {
        matches!(self, FighterState::Idle | FighterState::Move | FighterState::Guard)
    }

    pub fn is_stunned(&self) -> bool {
        matches!(self, FighterState::Hitstun | FighterState::Blockstun)
    }
}

/// Combatant (root of the fighter entity).
///
/// Health, stun timer, move set and volumes live in sibling components.
#[derive(Component, Debug, Clone)]
pub struct Fighter {
    pub player: PlayerSlot,
    pub state: FighterState,
    /// Horizontal unit vector toward the opponent
    pub facing: Vec3,
    /// Move currently executing (Some only while an attack sequence runs)
    pub active_attack: Option<Arc<AttackDefinition>>,
}

impl Fighter {
    pub fn new(player: PlayerSlot, facing: Vec3) -> Self {
        let facing = Vec3::new(facing.x, 0.0, facing.z).normalize_or_zero();
        Self {
            player,
            state: FighterState::Idle,
            facing: if facing == Vec3::ZERO { Vec3::X } else { facing },
            active_attack: None,
        }
    }

    pub fn is_dead(&self) -> bool {
        self.state == FighterState::Dead
    }

    /// Label for logs
    pub fn label(&self, entity: Entity) -> String {
        format!("{} ({:?})", self.player.as_str(), entity)
    }
}

/// Handle of the opposing fighter (facing target).
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opponent(pub Entity);

/// Handles of the two volumes a fighter owns.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct FighterVolumes {
    pub hit: Entity,
    pub hurt: Entity,
}

// ============================================================================
// Stun timer
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct PendingStun {
    /// MatchClock.elapsed at which the stun ends
    pub deadline: f64,
    pub generation: u32,
}

/// The single pending timer that ends Hitstun/Blockstun.
///
/// Each `arm` bumps the generation; only the pending entry tagged with the
/// latest generation may end the stun. Last stun wins.
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct StunTimer {
    pending: Option<PendingStun>,
    generation: u32,
}

impl StunTimer {
    /// Arms a new timer, superseding any pending one. Returns its generation.
    pub fn arm(&mut self, now: f64, duration: f32) -> u32 {
        self.generation = self.generation.wrapping_add(1);
        self.pending = Some(PendingStun {
            deadline: now + duration.max(0.0) as f64,
            generation: self.generation,
        });
        self.generation
    }

    pub fn cancel(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.pending = None;
    }

    /// True exactly once, when the latest timer's deadline has passed.
    pub fn poll_expired(&mut self, now: f64) -> bool {
        let Some(pending) = self.pending else {
            return false;
        };

        if pending.generation != self.generation {
            // устаревший таймер, перекрыт более новым
            self.pending = None;
            return false;
        }

        if now + DEADLINE_EPSILON >= pending.deadline {
            self.pending = None;
            return true;
        }

        false
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn deadline(&self) -> Option<f64> {
        self.pending.map(|p| p.deadline)
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}
