//! Runtime combat errors.
//!
//! Никогда не выходят за пределы тика: системы переводят их в `log_warning`
//! и возвращают бойца в Idle.

use bevy::prelude::*;

use crate::combat::AttackSlot;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CombatError {
    #[error("fighter {fighter:?} has no move bound to slot '{slot}'")]
    MissingAttack { fighter: Entity, slot: AttackSlot },

    #[error("fighter {fighter:?} has no hit volume")]
    MissingHitVolume { fighter: Entity },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CombatError::MissingAttack {
            fighter: Entity::PLACEHOLDER,
            slot: AttackSlot::Heavy,
        };
        assert!(err.to_string().contains("'heavy'"));

        let err = CombatError::MissingHitVolume { fighter: Entity::PLACEHOLDER };
        assert!(err.to_string().contains("no hit volume"));
    }
}
