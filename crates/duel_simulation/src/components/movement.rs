//! Movement компоненты: input бойца, запросы локомоции, тело

use bevy::prelude::*;

/// Per-tick input for one fighter.
///
/// Пишется input provider'ом (клавиатура, бот, скрипт) до CombatTick.
/// `*_pressed` это edge-флаги: combat core сбрасывает их каждый тик.
/// `guard_held` и `move_axis` это уровни, их провайдер держит сам.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct FighterInput {
    /// Lateral axis, −1..1
    pub move_axis: f32,
    pub jump_pressed: bool,
    pub guard_held: bool,
    /// Attack slots 1..3
    pub attack_pressed: [bool; 3],
    pub grab_pressed: bool,
}

impl FighterInput {
    /// Clears edge flags after the core read them.
    pub fn consume_edges(&mut self) {
        self.jump_pressed = false;
        self.attack_pressed = [false; 3];
        self.grab_pressed = false;
    }

    pub fn any_attack_edge(&self) -> bool {
        self.attack_pressed.iter().any(|pressed| *pressed) || self.grab_pressed
    }
}

/// Locomotion request from the fighter to the locomotion collaborator.
///
/// Обнуляется коллаборатором после применения.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct LocomotionRequest {
    /// Displacement along the lateral axis this tick (meters)
    pub lateral_delta: f32,
    pub jump: bool,
}

/// Kinematic body: velocity integrated by the locomotion systems.
///
/// Knockback overwrites only x/z; y belongs to gravity/jump.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct PhysicsBody {
    pub velocity: Vec3,
    pub grounded: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consume_edges_keeps_levels() {
        let mut input = FighterInput {
            move_axis: -1.0,
            jump_pressed: true,
            guard_held: true,
            attack_pressed: [true, false, true],
            grab_pressed: true,
        };
        assert!(input.any_attack_edge());

        input.consume_edges();

        assert_eq!(input.move_axis, -1.0);
        assert!(input.guard_held);
        assert!(!input.jump_pressed);
        assert!(!input.any_attack_edge());
    }
}
