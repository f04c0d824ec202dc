//! Volume placement, overlap detection, grab proximity query.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use crate::combat::{
    surface_distance, sphere_overlaps, CombatContact, ContactSource, Fighter, FighterVolumes,
    GrabAttempt, HitVolume, HurtVolume,
};
use crate::config::CombatConfig;

/// Center of an attack reach: `position + up * height + facing * range`.
pub fn attack_center(position: Vec3, facing: Vec3, height: f32, range: f32) -> Vec3 {
    position + Vec3::Y * height + facing * range
}

/// Grab candidate: hurt volume, its owner, surface distance to the grab center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrabCandidate {
    pub hurt_volume: Entity,
    pub owner: Entity,
    pub distance: f32,
}

/// Picks the grab target: within `radius`, not owned by `attacker`,
/// nearest surface distance first, then lowest entity.
pub fn select_grab_target(
    attacker: Entity,
    radius: f32,
    candidates: impl IntoIterator<Item = GrabCandidate>,
) -> Option<GrabCandidate> {
    candidates
        .into_iter()
        .filter(|c| c.owner != attacker && c.distance <= radius)
        .min_by(|a, b| {
            a.distance
                .total_cmp(&b.distance)
                .then_with(|| a.hurt_volume.cmp(&b.hurt_volume))
        })
}

/// System: move volumes with their owners.
///
/// Hurt volume → owner + hurt height. Armed hit volume → attack center
/// (follows the owner while active); disarmed hit volume parks at the owner.
pub fn sync_combat_volumes(
    config: Res<CombatConfig>,
    fighters: Query<(&Fighter, &Transform, &FighterVolumes)>,
    mut hit_volumes: Query<(&HitVolume, &mut Transform), Without<Fighter>>,
    mut hurt_volumes: Query<
        &mut Transform,
        (With<HurtVolume>, Without<Fighter>, Without<HitVolume>),
    >,
) {
    for (fighter, transform, volumes) in fighters.iter() {
        let position = transform.translation;

        if let Ok(mut hurt_transform) = hurt_volumes.get_mut(volumes.hurt) {
            hurt_transform.translation = position + Vec3::Y * config.hurt_volume_height;
        }

        if let Ok((hit_volume, mut hit_transform)) = hit_volumes.get_mut(volumes.hit) {
            hit_transform.translation = match (&hit_volume.current_attack, hit_volume.armed) {
                (Some(attack), true) => {
                    attack_center(position, fighter.facing, config.hit_volume_height, attack.range)
                }
                _ => position,
            };
        }
    }
}

/// System: armed hit volume × hurt volume overlaps → `CombatContact`.
///
/// Все пересечения пересылаются как есть; self-hit и hit set фильтрует резолвер.
pub fn detect_volume_overlaps(
    hit_volumes: Query<(Entity, &HitVolume, &Transform)>,
    hurt_volumes: Query<(Entity, &Collider, &Transform), With<HurtVolume>>,
    mut contacts: EventWriter<CombatContact>,
) {
    let mut armed: Vec<_> = hit_volumes
        .iter()
        .filter(|(_, volume, _)| volume.armed)
        .collect();
    armed.sort_by_key(|(entity, _, _)| *entity);

    let mut hurt: Vec<_> = hurt_volumes.iter().collect();
    hurt.sort_by_key(|(entity, _, _)| *entity);

    for (hit_entity, hit_volume, hit_transform) in armed {
        let Some(attack) = hit_volume.current_attack.as_ref() else {
            continue;
        };

        for (hurt_entity, collider, hurt_transform) in hurt.iter() {
            if !sphere_overlaps(collider, hurt_transform, hit_transform.translation, hit_volume.radius) {
                continue;
            }

            contacts.write(CombatContact {
                attacker: hit_volume.owner,
                hurt_volume: *hurt_entity,
                attack: attack.clone(),
                source: ContactSource::HitVolume(hit_entity),
            });
        }
    }
}

/// System: run the grab proximity query for every `GrabAttempt`.
///
/// Захват не взводит hit volume и не пишет hit set: найденная цель сразу
/// уходит в резолвер как grab contact.
pub fn resolve_grab_attempts(
    config: Res<CombatConfig>,
    mut attempts: EventReader<GrabAttempt>,
    fighters: Query<(&Fighter, &Transform)>,
    hurt_volumes: Query<(Entity, &HurtVolume, &Collider, &Transform)>,
    mut contacts: EventWriter<CombatContact>,
) {
    for attempt in attempts.read() {
        let Ok((fighter, transform)) = fighters.get(attempt.attacker) else {
            continue;
        };

        let center = attack_center(
            transform.translation,
            fighter.facing,
            config.hit_volume_height,
            attempt.attack.range,
        );

        let candidates = hurt_volumes
            .iter()
            .map(|(entity, hurt, collider, hurt_transform)| GrabCandidate {
                hurt_volume: entity,
                owner: hurt.owner,
                distance: surface_distance(collider, hurt_transform, center),
            });

        let Some(target) = select_grab_target(attempt.attacker, attempt.attack.radius, candidates) else {
            crate::logger::log(&format!(
                "🫳 {} grab whiffed ({})",
                fighter.label(attempt.attacker),
                attempt.attack.name
            ));
            continue;
        };

        contacts.write(CombatContact {
            attacker: attempt.attacker,
            hurt_volume: target.hurt_volume,
            attack: attempt.attack.clone(),
            source: ContactSource::Grab,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(hurt: u32, owner: u32, distance: f32) -> GrabCandidate {
        GrabCandidate {
            hurt_volume: Entity::from_raw(hurt),
            owner: Entity::from_raw(owner),
            distance,
        }
    }

    #[test]
    fn test_attack_center() {
        let center = attack_center(Vec3::ZERO, Vec3::X, 1.0, 1.2);
        assert_eq!(center, Vec3::new(1.2, 1.0, 0.0));
    }

    #[test]
    fn test_grab_target_nearest_wins() {
        let attacker = Entity::from_raw(1);
        let picked = select_grab_target(
            attacker,
            0.5,
            [candidate(10, 2, 0.3), candidate(11, 3, 0.1), candidate(12, 4, 0.9)],
        );
        assert_eq!(picked.map(|c| c.hurt_volume), Some(Entity::from_raw(11)));
    }

    #[test]
    fn test_grab_target_tie_breaks_by_entity() {
        let attacker = Entity::from_raw(1);
        let picked = select_grab_target(
            attacker,
            0.5,
            [candidate(12, 3, 0.0), candidate(10, 2, 0.0)],
        );
        assert_eq!(picked.map(|c| c.hurt_volume), Some(Entity::from_raw(10)));
    }

    #[test]
    fn test_grab_target_excludes_self_and_out_of_range() {
        let attacker = Entity::from_raw(1);
        let picked = select_grab_target(
            attacker,
            0.5,
            [candidate(10, 1, 0.0), candidate(11, 2, 0.51)],
        );
        assert!(picked.is_none());
    }
}
