//! Tests for fighter input processing.

#[cfg(test)]
mod tests {
    use crate::combat::*;
    use crate::components::FighterInput;
    use crate::physics::LocomotionPlugin;
    use crate::PhysicsBody;
    use bevy::prelude::*;
    use std::sync::Arc;

    const DT: f32 = 1.0 / 64.0;

    /// P1 в (0,0,0), P2 в (3,0,0): далеко, атаки не достают
    fn setup(moves: MoveSet) -> (App, Entity, Entity) {
        let mut app = App::new();
        app.add_plugins((CombatPlugin, LocomotionPlugin));

        let world = app.world_mut();
        let p1 = spawn_fighter(world, FighterSpawn::new(PlayerSlot::P1, Vec3::ZERO).with_moves(moves.clone()));
        let p2 = spawn_fighter(
            world,
            FighterSpawn::new(PlayerSlot::P2, Vec3::new(3.0, 0.0, 0.0)).with_moves(moves),
        );
        link_opponents(world, p1, p2);

        (app, p1, p2)
    }

    fn builtin_moves() -> MoveSet {
        MoveSet::from_library(&MoveLibrary::builtin())
    }

    fn step_with(app: &mut App, fighter: Entity, input: FighterInput) {
        *app.world_mut().get_mut::<FighterInput>(fighter).unwrap() = input;
        step_match(app.world_mut(), DT);
    }

    fn state(app: &App, fighter: Entity) -> FighterState {
        app.world().get::<Fighter>(fighter).unwrap().state
    }

    fn x(app: &App, fighter: Entity) -> f32 {
        app.world().get::<Transform>(fighter).unwrap().translation.x
    }

    #[test]
    fn test_guard_hold_and_release() {
        let (mut app, p1, _) = setup(builtin_moves());

        step_with(&mut app, p1, FighterInput { guard_held: true, ..default() });
        assert_eq!(state(&app, p1), FighterState::Guard);

        step_with(&mut app, p1, FighterInput { guard_held: true, ..default() });
        assert_eq!(state(&app, p1), FighterState::Guard);

        step_with(&mut app, p1, FighterInput::default());
        assert_eq!(state(&app, p1), FighterState::Idle);
    }

    #[test]
    fn test_idle_move_toggle_and_lateral_motion() {
        let (mut app, p1, _) = setup(builtin_moves());

        step_with(&mut app, p1, FighterInput { move_axis: 1.0, ..default() });
        assert_eq!(state(&app, p1), FighterState::Move);
        // 5 m/s * 1/64 s
        assert_eq!(x(&app, p1), 0.078125);

        // В пределах deadzone → Idle
        step_with(&mut app, p1, FighterInput { move_axis: 0.005, ..default() });
        assert_eq!(state(&app, p1), FighterState::Idle);
    }

    #[test]
    fn test_guarding_fighter_still_walks() {
        let (mut app, p1, _) = setup(builtin_moves());

        step_with(
            &mut app,
            p1,
            FighterInput { guard_held: true, move_axis: -1.0, ..default() },
        );

        assert_eq!(state(&app, p1), FighterState::Guard, "guard does not become Move");
        assert!(x(&app, p1) < 0.0);
    }

    #[test]
    fn test_attack_from_guard_is_ignored() {
        let (mut app, p1, _) = setup(builtin_moves());

        step_with(
            &mut app,
            p1,
            FighterInput { guard_held: true, attack_pressed: [true, false, false], ..default() },
        );

        assert_eq!(state(&app, p1), FighterState::Guard);
        assert!(app.world().get::<AttackSequence>(p1).is_none());
    }

    #[test]
    fn test_attack_start_blocks_movement_that_tick() {
        let (mut app, p1, _) = setup(builtin_moves());

        step_with(
            &mut app,
            p1,
            FighterInput { move_axis: 1.0, attack_pressed: [false, true, false], ..default() },
        );

        assert_eq!(state(&app, p1), FighterState::Attack);
        assert_eq!(x(&app, p1), 0.0);

        let fighter = app.world().get::<Fighter>(p1).unwrap();
        assert_eq!(fighter.active_attack.as_ref().unwrap().name, "poke");

        let sequence = app.world().get::<AttackSequence>(p1).unwrap();
        assert_eq!(sequence.phase, SequencePhase::Startup);
        assert_eq!(sequence.phase_timer, 0.0, "not advanced on the start tick");

        let started: Vec<_> = app
            .world_mut()
            .resource_mut::<Events<AttackStarted>>()
            .drain()
            .collect();
        assert_eq!(
            started,
            vec![AttackStarted { fighter: p1, attack_name: "poke".to_string(), is_grab: false }]
        );
    }

    #[test]
    fn test_input_ignored_while_attacking() {
        let (mut app, p1, _) = setup(builtin_moves());

        step_with(&mut app, p1, FighterInput { attack_pressed: [true, false, false], ..default() });
        step_with(
            &mut app,
            p1,
            FighterInput { guard_held: true, move_axis: 1.0, attack_pressed: [false, false, true], ..default() },
        );

        assert_eq!(state(&app, p1), FighterState::Attack);
        assert_eq!(x(&app, p1), 0.0);
        let fighter = app.world().get::<Fighter>(p1).unwrap();
        assert_eq!(fighter.active_attack.as_ref().unwrap().name, "jab");
    }

    #[test]
    fn test_edges_consumed_every_tick() {
        let (mut app, p1, p2) = setup(builtin_moves());

        // P2 в Hitstun: ввод игнорируется, но edges всё равно сбрасываются
        app.world_mut().get_mut::<Fighter>(p2).unwrap().state = FighterState::Hitstun;
        *app.world_mut().get_mut::<FighterInput>(p2).unwrap() =
            FighterInput { attack_pressed: [true, true, true], grab_pressed: true, guard_held: true, ..default() };

        step_with(&mut app, p1, FighterInput { jump_pressed: true, ..default() });

        for fighter in [p1, p2] {
            let input = app.world().get::<FighterInput>(fighter).unwrap();
            assert!(!input.any_attack_edge());
            assert!(!input.jump_pressed);
        }
        assert!(app.world().get::<FighterInput>(p2).unwrap().guard_held, "levels kept");
        assert_eq!(state(&app, p2), FighterState::Hitstun);
    }

    #[test]
    fn test_missing_move_returns_to_idle() {
        let moves = MoveSet::default().with_slot(AttackSlot::Jab, Arc::new(AttackDefinition::named("jab")));
        let (mut app, p1, _) = setup(moves);

        step_with(&mut app, p1, FighterInput { move_axis: 1.0, ..default() });
        assert_eq!(state(&app, p1), FighterState::Move);

        step_with(
            &mut app,
            p1,
            FighterInput { move_axis: 1.0, attack_pressed: [false, false, true], ..default() },
        );

        assert_eq!(state(&app, p1), FighterState::Idle);
        assert!(app.world().get::<AttackSequence>(p1).is_none());
        assert!(app.world().get::<Fighter>(p1).unwrap().active_attack.is_none());
    }

    #[test]
    fn test_missing_hit_volume_aborts_strike() {
        let (mut app, p1, _) = setup(builtin_moves());
        let volumes = *app.world().get::<FighterVolumes>(p1).unwrap();
        app.world_mut().despawn(volumes.hit);

        step_with(&mut app, p1, FighterInput { attack_pressed: [true, false, false], ..default() });
        assert_eq!(state(&app, p1), FighterState::Idle);

        // Граб hit volume не нужен
        step_with(&mut app, p1, FighterInput { grab_pressed: true, ..default() });
        assert_eq!(state(&app, p1), FighterState::Attack);
    }

    #[test]
    fn test_jump_from_guard() {
        let (mut app, p1, _) = setup(builtin_moves());

        step_with(
            &mut app,
            p1,
            FighterInput { guard_held: true, jump_pressed: true, ..default() },
        );

        let body = app.world().get::<PhysicsBody>(p1).unwrap();
        assert!(body.velocity.y > 0.0);
        assert!(!body.grounded);
        assert!(app.world().get::<Transform>(p1).unwrap().translation.y > 0.0);
    }

    #[test]
    fn test_facing_tracks_opponent() {
        let (mut app, p1, p2) = setup(builtin_moves());
        app.world_mut().get_mut::<Transform>(p2).unwrap().translation = Vec3::new(-4.0, 0.0, 0.0);

        step_match(app.world_mut(), DT);

        assert_eq!(app.world().get::<Fighter>(p1).unwrap().facing, Vec3::NEG_X);
        assert_eq!(app.world().get::<Fighter>(p2).unwrap().facing, Vec3::X);
    }
}
