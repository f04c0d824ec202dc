//! Health бойца

use bevy::prelude::*;

/// Hit points of a fighter.
///
/// `current` may drop below zero on the killing blow; Dead absorbs it.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct Health {
    pub current: i32,
    pub max: i32,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100) // Default 100 HP
    }
}

impl Health {
    pub fn new(max: i32) -> Self {
        Self { current: max, max }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0
    }

    /// Subtracts without clamping. Returns the remaining health.
    pub fn take_damage(&mut self, amount: i32) -> i32 {
        self.current = self.current.saturating_sub(amount.max(0));
        self.current
    }

    /// Share of max health left, clamped to [0, 1] (HUD bars).
    pub fn fraction(&self) -> f32 {
        if self.max <= 0 {
            return 0.0;
        }
        (self.current as f32 / self.max as f32).clamp(0.0, 1.0)
    }
}
