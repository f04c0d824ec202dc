//! Hit/hurt volume components.
//!
//! Архитектура:
//! - Каждый боец владеет ровно одним HitVolume и одним HurtVolume (отдельные entity)
//! - HitVolume: sphere sensor, взведён только в active окне атаки
//! - HurtVolume: capsule sensor, всегда следует за владельцем
//! - Overlap считаем через `Collider::distance_to_point` (rapier geometry, без physics step)

use bevy::ecs::entity::EntityHashSet;
use bevy::prelude::*;
use bevy_rapier3d::prelude::*;
use std::sync::Arc;

use crate::combat::AttackDefinition;

/// Reach of an attack. Armed only during its owner's active window.
#[derive(Component, Debug, Clone)]
pub struct HitVolume {
    pub owner: Entity,
    pub current_attack: Option<Arc<AttackDefinition>>,
    /// Hurt volumes already struck during the current activation
    pub hit_set: EntityHashSet,
    pub armed: bool,
    pub radius: f32,
    /// Incremented on every arm
    pub activation: u32,
}

impl HitVolume {
    pub fn new(owner: Entity) -> Self {
        Self {
            owner,
            current_attack: None,
            hit_set: EntityHashSet::default(),
            armed: false,
            radius: 0.0,
            activation: 0,
        }
    }

    /// Starts a new activation. The hit set is cleared here and nowhere else.
    pub fn arm(&mut self, attack: Arc<AttackDefinition>) {
        self.radius = attack.radius;
        self.current_attack = Some(attack);
        self.hit_set.clear();
        self.armed = true;
        self.activation = self.activation.wrapping_add(1);
    }

    pub fn disarm(&mut self) {
        self.armed = false;
        self.current_attack = None;
    }

    /// Records `hurt_volume` for this activation.
    ///
    /// Returns false if it was already struck (multi-hit suppression).
    pub fn register_hit(&mut self, hurt_volume: Entity) -> bool {
        self.hit_set.insert(hurt_volume)
    }
}

/// Vulnerable body of a fighter. Pure pass-through to the resolver.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct HurtVolume {
    pub owner: Entity,
}

/// Hurt capsule shape: vertical segment of `2 * half_height` plus `radius` caps.
pub fn hurt_volume_collider(half_height: f32, radius: f32) -> Collider {
    Collider::capsule_y(half_height, radius)
}

/// Distance from `point` to the surface of a hurt collider (0 when inside).
pub fn surface_distance(collider: &Collider, transform: &Transform, point: Vec3) -> f32 {
    collider
        .distance_to_point(transform.translation, transform.rotation, point, true)
        .max(0.0)
}

/// Sphere (`center`, `radius`) against a hurt collider.
pub fn sphere_overlaps(collider: &Collider, transform: &Transform, center: Vec3, radius: f32) -> bool {
    surface_distance(collider, transform, center) <= radius
}
