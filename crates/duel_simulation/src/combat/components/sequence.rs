//! Attack sequence component (startup → active → recovery).
//!
//! Фазы продвигаются накоплением времени: излишек (overshoot) переносится в
//! следующую фазу, поэтому длительность окон не зависит от размера тика.
//! Вход в Active всегда прерывает продвижение на этом тике, так что hit volume
//! гарантированно взведён хотя бы один тик.

use bevy::prelude::*;
use std::sync::Arc;

use crate::combat::AttackDefinition;

/// Slack for float accumulation against phase durations.
pub const PHASE_EPSILON: f32 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum SequencePhase {
    /// Telegraph, hit volume idle, still cancellable
    Startup,
    /// Hit volume armed (non-grab only)
    Active,
    /// Hit volume idle, fighter still locked in Attack
    Recovery,
    Done,
}

/// Side effects produced while advancing a sequence, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceStep {
    /// Arm the hit volume (clear hit set, new activation)
    ActiveStarted,
    /// Disarm the hit volume
    ActiveEnded,
    /// Grab startup finished, run the proximity query now
    GrabWindow,
    /// Recovery finished, fighter may return to Idle
    Finished,
}

/// Timed attack in flight on a fighter entity.
///
/// Added when an attack starts, removed once `Finished` is handled or the
/// sequence is cancelled (hit, block, death).
#[derive(Component, Debug, Clone)]
pub struct AttackSequence {
    pub attack: Arc<AttackDefinition>,
    pub phase: SequencePhase,
    /// Time spent in the current phase (seconds)
    pub phase_timer: f32,
    pub cancelled: bool,
}

impl AttackSequence {
    pub fn new(attack: Arc<AttackDefinition>) -> Self {
        Self {
            attack,
            phase: SequencePhase::Startup,
            phase_timer: 0.0,
            cancelled: false,
        }
    }

    pub fn is_grab(&self) -> bool {
        self.attack.is_grab
    }

    pub fn is_active(&self) -> bool {
        self.phase == SequencePhase::Active
    }

    pub fn is_done(&self) -> bool {
        self.phase == SequencePhase::Done
    }

    /// Marks the sequence as interrupted; `advance` becomes a no-op.
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    fn phase_duration(&self) -> f32 {
        match self.phase {
            SequencePhase::Startup => self.attack.startup,
            SequencePhase::Active => self.attack.active,
            SequencePhase::Recovery => self.attack.recovery,
            SequencePhase::Done => 0.0,
        }
    }

    /// Accumulates `delta` and walks through every phase boundary it crosses.
    pub fn advance(&mut self, delta: f32) -> Vec<SequenceStep> {
        let mut steps = Vec::new();
        if self.cancelled || self.is_done() {
            return steps;
        }

        self.phase_timer += delta.max(0.0);

        loop {
            let duration = self.phase_duration();
            if self.phase == SequencePhase::Done || self.phase_timer + PHASE_EPSILON < duration {
                break;
            }

            let overshoot = (self.phase_timer - duration).max(0.0);
            self.phase_timer = overshoot;

            match self.phase {
                SequencePhase::Startup if self.attack.is_grab => {
                    steps.push(SequenceStep::GrabWindow);
                    self.phase = SequencePhase::Recovery;
                }
                SequencePhase::Startup => {
                    steps.push(SequenceStep::ActiveStarted);
                    self.phase = SequencePhase::Active;
                    // hit volume должен простоять взведённым хотя бы один тик
                    break;
                }
                SequencePhase::Active => {
                    steps.push(SequenceStep::ActiveEnded);
                    self.phase = SequencePhase::Recovery;
                }
                SequencePhase::Recovery => {
                    steps.push(SequenceStep::Finished);
                    self.phase = SequencePhase::Done;
                    self.phase_timer = 0.0;
                }
                SequencePhase::Done => break,
            }
        }

        steps
    }
}
