//! Facing: каждый тик разворачиваем бойца к оппоненту.

use bevy::prelude::*;

use crate::combat::{Fighter, Opponent};

/// Horizontal unit vector from `from` toward `to`, or None when they stack.
pub fn facing_toward(from: Vec3, to: Vec3) -> Option<Vec3> {
    let axis = Vec3::new(to.x - from.x, 0.0, to.z - from.z);
    if axis.length_squared() < 1e-4 {
        return None;
    }
    Some(axis.normalize())
}

/// System: recompute facing toward the opponent.
///
/// Вырожденная геометрия (бойцы в одной точке) или отсутствие оппонента
/// оставляют прежний facing. Dead не разворачивается.
pub fn update_facing(
    mut fighters: Query<(&mut Fighter, &Transform, Option<&Opponent>)>,
    positions: Query<&Transform, With<Fighter>>,
) {
    for (mut fighter, transform, opponent) in fighters.iter_mut() {
        if fighter.is_dead() {
            continue;
        }

        let Some(Opponent(opponent)) = opponent else {
            continue;
        };

        let Ok(opponent_transform) = positions.get(*opponent) else {
            continue;
        };

        if let Some(facing) = facing_toward(transform.translation, opponent_transform.translation) {
            fighter.facing = facing;
        }
    }
}
