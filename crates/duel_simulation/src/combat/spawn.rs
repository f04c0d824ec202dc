//! Spawn helpers: fighter + its hit/hurt volumes.
//!
//! Боец всегда спавнится тройкой entity (fighter, hit volume, hurt volume)
//! и удаляется так же тройкой через `despawn_fighter`.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use crate::combat::{
    hurt_volume_collider, Fighter, FighterVolumes, HitVolume, HurtVolume, MoveSet, Opponent,
    PlayerSlot, StunTimer,
};
use crate::components::{FighterInput, Health, LocomotionRequest, PhysicsBody};
use crate::config::CombatConfig;

/// Parameters for `spawn_fighter`.
#[derive(Debug, Clone)]
pub struct FighterSpawn {
    pub player: PlayerSlot,
    pub position: Vec3,
    /// Initial facing (before the first facing update)
    pub facing: Vec3,
    pub moves: MoveSet,
    /// Overrides `CombatConfig::max_health`
    pub max_health: Option<i32>,
}

impl FighterSpawn {
    /// P1 faces +X, P2 faces −X.
    pub fn new(player: PlayerSlot, position: Vec3) -> Self {
        let facing = match player {
            PlayerSlot::P1 => Vec3::X,
            PlayerSlot::P2 => Vec3::NEG_X,
        };
        Self {
            player,
            position,
            facing,
            moves: MoveSet::default(),
            max_health: None,
        }
    }

    pub fn with_moves(mut self, moves: MoveSet) -> Self {
        self.moves = moves;
        self
    }

    pub fn with_max_health(mut self, max_health: i32) -> Self {
        self.max_health = Some(max_health);
        self
    }

    pub fn with_facing(mut self, facing: Vec3) -> Self {
        self.facing = facing;
        self
    }
}

/// Spawns a fighter with its hit volume and hurt volume. Returns the fighter.
pub fn spawn_fighter(world: &mut World, spawn: FighterSpawn) -> Entity {
    let config = world.get_resource::<CombatConfig>().cloned().unwrap_or_default();
    let max_health = match spawn.max_health {
        Some(max_health) if max_health > 0 => max_health,
        Some(invalid) => {
            // Боец с health ≤ 0 обязан быть Dead; стартовать таким нельзя
            crate::logger::log_warning(&format!(
                "⚠️ {} max_health override must be positive, got {}; using {}",
                spawn.player.as_str(),
                invalid,
                config.max_health
            ));
            config.max_health
        }
        None => config.max_health,
    };

    let fighter = world
        .spawn((
            Fighter::new(spawn.player, spawn.facing),
            Transform::from_translation(spawn.position),
            Health::new(max_health),
            StunTimer::default(),
            PhysicsBody {
                grounded: spawn.position.y <= config.ground_height,
                ..default()
            },
            FighterInput::default(),
            LocomotionRequest::default(),
            spawn.moves,
        ))
        .id();

    let hit = world
        .spawn((HitVolume::new(fighter), Transform::from_translation(spawn.position)))
        .id();

    let hurt = world
        .spawn((
            HurtVolume { owner: fighter },
            hurt_volume_collider(config.hurt_volume_half_height, config.hurt_volume_radius),
            Sensor,
            Transform::from_translation(spawn.position + Vec3::Y * config.hurt_volume_height),
        ))
        .id();

    world.entity_mut(fighter).insert(FighterVolumes { hit, hurt });

    crate::logger::log_info(&format!(
        "🥊 Spawned {} at {:?} (HP: {}, hit: {:?}, hurt: {:?})",
        spawn.player.as_str(),
        spawn.position,
        max_health,
        hit,
        hurt
    ));

    fighter
}

/// Points two fighters at each other. Safe to re-run at match start.
pub fn link_opponents(world: &mut World, a: Entity, b: Entity) {
    for (fighter, opponent) in [(a, b), (b, a)] {
        match world.get_entity_mut(fighter) {
            Ok(mut entity) => {
                entity.insert(Opponent(opponent));
            }
            Err(_) => {
                crate::logger::log_warning(&format!(
                    "⚠️ link_opponents: fighter {:?} not found",
                    fighter
                ));
            }
        }
    }
}

/// Removes a fighter and both of its volumes. Returns false if it did not exist.
pub fn despawn_fighter(world: &mut World, fighter: Entity) -> bool {
    let volumes = world.get::<FighterVolumes>(fighter).copied();
    if let Some(volumes) = volumes {
        world.despawn(volumes.hit);
        world.despawn(volumes.hurt);
    }

    // Оппонент больше не смотрит на удалённого бойца
    let watchers: Vec<Entity> = world
        .query::<(Entity, &Opponent)>()
        .iter(world)
        .filter(|(_, opponent)| opponent.0 == fighter)
        .map(|(entity, _)| entity)
        .collect();
    for watcher in watchers {
        world.entity_mut(watcher).remove::<Opponent>();
    }

    world.despawn(fighter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::FighterState;

    #[test]
    fn test_spawn_creates_fighter_and_volumes() {
        let mut world = World::new();
        let fighter = spawn_fighter(&mut world, FighterSpawn::new(PlayerSlot::P1, Vec3::ZERO));

        let volumes = *world.get::<FighterVolumes>(fighter).unwrap();
        assert_eq!(world.get::<HitVolume>(volumes.hit).unwrap().owner, fighter);
        assert_eq!(world.get::<HurtVolume>(volumes.hurt).unwrap().owner, fighter);
        assert_eq!(world.get::<Health>(fighter).unwrap().current, CombatConfig::default().max_health);
        assert!(world.get::<PhysicsBody>(fighter).unwrap().grounded);
    }

    #[test]
    fn test_non_positive_max_health_falls_back_to_config() {
        let mut world = World::new();
        world.insert_resource(CombatConfig {
            max_health: 80,
            ..default()
        });

        for invalid in [0, -10] {
            let fighter = spawn_fighter(
                &mut world,
                FighterSpawn::new(PlayerSlot::P2, Vec3::ZERO).with_max_health(invalid),
            );

            let health = world.get::<Health>(fighter).unwrap();
            assert_eq!((health.current, health.max), (80, 80));
            assert!(health.is_alive());
            assert_eq!(world.get::<Fighter>(fighter).unwrap().state, FighterState::Idle);
        }

        let fighter = spawn_fighter(&mut world, FighterSpawn::new(PlayerSlot::P1, Vec3::ZERO).with_max_health(3));
        assert_eq!(world.get::<Health>(fighter).unwrap().current, 3);
    }
}
