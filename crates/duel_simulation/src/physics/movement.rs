//! Kinematic локомоция бойцов (default collaborator для headless режима)
//!
//! Архитектура:
//! - Боец пишет `LocomotionRequest` (lateral delta + jump)
//! - `apply_locomotion` сдвигает по боковой оси и запускает прыжок
//! - `integrate_motion`: gravity, трение о землю (гасит knockback), velocity → Transform
//!
//! Детерминизм: только `MatchClock.delta`, никакого ambient времени.

use bevy::prelude::*;

use crate::combat::{CombatSet, CombatTick, Fighter, MatchClock};
use crate::components::{LocomotionRequest, PhysicsBody};
use crate::config::{CombatConfig, LATERAL_AXIS};

/// Tolerance for "standing on the ground".
const GROUND_EPSILON: f32 = 1e-4;

/// Moves `velocity` x/z toward zero by `amount` (m/s), keeps y.
pub fn apply_ground_friction(velocity: Vec3, amount: f32) -> Vec3 {
    let horizontal = Vec3::new(velocity.x, 0.0, velocity.z);
    let speed = horizontal.length();
    if speed <= amount {
        return Vec3::new(0.0, velocity.y, 0.0);
    }
    let slowed = horizontal * ((speed - amount) / speed);
    Vec3::new(slowed.x, velocity.y, slowed.z)
}

/// System: consume locomotion requests.
///
/// Lateral delta применяется напрямую к позиции (как MovePosition),
/// velocity не трогается: она принадлежит knockback и прыжку.
pub fn apply_locomotion(
    config: Res<CombatConfig>,
    mut query: Query<(&mut LocomotionRequest, &mut Transform, &mut PhysicsBody), With<Fighter>>,
) {
    for (mut request, mut transform, mut body) in query.iter_mut() {
        if request.lateral_delta != 0.0 {
            transform.translation += LATERAL_AXIS * request.lateral_delta;
        }

        // Прыжок только с земли
        if request.jump && body.grounded {
            body.velocity.y = config.jump_velocity;
            body.grounded = false;
        }

        *request = LocomotionRequest::default();
    }
}

/// System: gravity, ground friction, velocity integration, ground clamp.
pub fn integrate_motion(
    config: Res<CombatConfig>,
    clock: Res<MatchClock>,
    mut query: Query<(&mut Transform, &mut PhysicsBody), With<Fighter>>,
) {
    let delta = clock.delta;

    for (mut transform, mut body) in query.iter_mut() {
        if body.grounded {
            body.velocity = apply_ground_friction(body.velocity, config.ground_friction * delta);
        } else {
            body.velocity.y += config.gravity * delta;
        }

        transform.translation += body.velocity * delta;

        // Ground clamp
        if transform.translation.y <= config.ground_height + GROUND_EPSILON {
            transform.translation.y = config.ground_height;
            if body.velocity.y < 0.0 {
                body.velocity.y = 0.0;
            }
            body.grounded = body.velocity.y <= 0.0;
        } else {
            body.grounded = false;
        }
    }
}

/// Plugin для локомоции бойцов
///
/// Системы в `CombatSet::Motion`: после input, до синхронизации volumes.
pub struct LocomotionPlugin;

impl Plugin for LocomotionPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            CombatTick,
            (apply_locomotion, integrate_motion)
                .chain()
                .in_set(CombatSet::Motion),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ground_friction_drains_knockback() {
        let delta = 1.0 / 64.0;
        let friction = 30.0 * delta; // ~0.47 m/s за тик

        let velocity = apply_ground_friction(Vec3::new(6.0, 0.0, 0.0), friction);
        assert!((velocity.x - (6.0 - friction)).abs() < 1e-5);

        // Меньше порога → полная остановка, знак не переворачивается
        let velocity = apply_ground_friction(Vec3::new(-0.2, 1.0, 0.0), friction);
        assert_eq!(velocity, Vec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_knockback_stops_within_quarter_second() {
        let delta = 1.0 / 64.0;
        let mut velocity = Vec3::new(6.0, 0.0, 0.0);
        let mut ticks = 0;
        while velocity.x > 0.0 {
            velocity = apply_ground_friction(velocity, 30.0 * delta);
            ticks += 1;
        }
        // 6 / 30 = 0.2s = 12.8 тика
        assert_eq!(ticks, 13);
    }
}
