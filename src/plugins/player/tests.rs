use std::time::Duration;

use avian2d::prelude::*;
use bevy::prelude::*;

use super::{AfterimageGhost, BaseTint, Player, PlayerControl, PlayerIntent, PLAYER_SIZE};
use crate::common::test_utils::run_system_once;
use crate::common::tunables::Tunables;
use crate::control::{AnimationKey, AnimationPlayer, HorizontalIntent, PlayerInput, PlayerPhase};
use crate::plugins::animation::SpriteAnimation;
use crate::plugins::physics::GroundSensor;
use crate::plugins::world::{Hazard, LevelLayout};

const STEP: Duration = Duration::from_millis(10);

fn world_with_player(grounded: bool) -> (World, Entity) {
    let mut world = World::new();
    world.insert_resource(Tunables::default());
    world.insert_resource(LevelLayout::parse("P\n#").expect("layout"));
    run_system_once(&mut world, super::spawn);

    let player = world.query_filtered::<Entity, With<Player>>().single(&world).expect("one player");
    world.entity_mut(player).insert(GroundSensor { grounded });

    let mut time = Time::<Fixed>::default();
    time.advance_by(STEP);
    world.insert_resource(time);
    world.init_resource::<PlayerIntent>();
    (world, player)
}

fn set_intent(world: &mut World, input: PlayerInput) {
    world.resource_mut::<PlayerIntent>().0 = input;
}

fn touch(world: &mut World, player: Entity, other: Entity) {
    world.get_mut::<CollidingEntities>(player).unwrap().insert(other);
}

fn fixed_step(world: &mut World) {
    run_system_once(world, super::tick_players);
    run_system_once(world, super::react_to_hazards);
}

#[test]
fn spawn_places_player_on_layout_spawn() {
    let (world, player) = world_with_player(false);
    let tf = world.get::<Transform>(player).unwrap();
    // Tile centre (0, 16) raised so the 40 unit body stands on the tile floor.
    assert_eq!(tf.translation.truncate(), Vec2::new(0.0, 20.0));
    assert_eq!(world.get::<GravityScale>(player).unwrap().0, 1.0);
    assert_eq!(world.get::<LinearVelocity>(player).unwrap().0, Vec2::ZERO);
    assert_eq!(world.get::<SpriteAnimation>(player).unwrap().current(), AnimationKey::Idle);
    assert_eq!(world.get::<Sprite>(player).unwrap().custom_size, Some(PLAYER_SIZE));
}

#[test]
fn spawn_without_layout_is_skipped() {
    let mut world = World::new();
    world.insert_resource(Tunables::default());
    run_system_once(&mut world, super::spawn);
    assert_eq!(world.query::<&Player>().iter(&world).count(), 0);
}

#[test]
fn tick_moves_player_from_intent() {
    let (mut world, player) = world_with_player(true);
    set_intent(&mut world, PlayerInput { horizontal: HorizontalIntent::Left, ..default() });

    run_system_once(&mut world, super::tick_players);

    assert_eq!(world.get::<LinearVelocity>(player).unwrap().x, -200.0);
    assert_eq!(world.get::<SpriteAnimation>(player).unwrap().current(), AnimationKey::MoveLeft);
    assert_eq!(world.get::<PlayerControl>(player).unwrap().phase(), PlayerPhase::MovingLeft);
}

#[test]
fn dash_spawns_afterimage_sprites_and_releases_them() {
    let (mut world, player) = world_with_player(false);
    set_intent(&mut world, PlayerInput { dash: true, ..default() });

    run_system_once(&mut world, super::tick_players);
    assert_eq!(world.get::<LinearVelocity>(player).unwrap().x, 1800.0);
    assert_eq!(world.query::<&AfterimageGhost>().iter(&world).count(), 1);

    set_intent(&mut world, PlayerInput::default());
    for _ in 0..19 {
        run_system_once(&mut world, super::tick_players);
    }
    // Ten markers spawned, the trail never holds more than seven.
    let alive = world.get::<PlayerControl>(player).unwrap().trail().len();
    assert_eq!(world.query::<&AfterimageGhost>().iter(&world).count(), alive);
    assert!(alive <= 7);

    run_system_once(&mut world, super::release_afterimages);
    assert_eq!(world.query::<&AfterimageGhost>().iter(&world).count(), 0);
    assert!(world.get::<PlayerControl>(player).unwrap().trail().is_empty());
}

#[test]
fn hazard_contact_knocks_back_and_tints() {
    let (mut world, player) = world_with_player(false);
    world.get_mut::<LinearVelocity>(player).unwrap().0 = Vec2::new(100.0, 0.0);
    let spikes = world.spawn(Hazard).id();

    touch(&mut world, player, spikes);
    run_system_once(&mut world, super::react_to_hazards);

    let control = world.get::<PlayerControl>(player).unwrap();
    assert!(control.is_damaging());
    assert_eq!(world.get::<LinearVelocity>(player).unwrap().0, Vec2::new(-500.0, 0.0));

    run_system_once(&mut world, super::apply_damage_tint);
    assert_eq!(world.get::<Sprite>(player).unwrap().color, super::DAMAGE_TINT);
}

#[test]
fn non_hazard_contact_is_ignored() {
    let (mut world, player) = world_with_player(false);
    let wall = world.spawn_empty().id();

    touch(&mut world, player, wall);
    run_system_once(&mut world, super::react_to_hazards);

    assert!(!world.get::<PlayerControl>(player).unwrap().is_damaging());
}

#[test]
fn tint_returns_to_base_after_recovery() {
    let (mut world, player) = world_with_player(false);
    let spikes = world.spawn(Hazard).id();
    touch(&mut world, player, spikes);
    run_system_once(&mut world, super::react_to_hazards);
    run_system_once(&mut world, super::apply_damage_tint);
    world.get_mut::<CollidingEntities>(player).unwrap().clear();

    for _ in 0..25 {
        run_system_once(&mut world, super::tick_players);
    }
    run_system_once(&mut world, super::apply_damage_tint);

    let base = world.get::<BaseTint>(player).unwrap().0;
    assert_eq!(world.get::<Sprite>(player).unwrap().color, base);
}

#[test]
fn afterimages_fade_with_age() {
    let (mut world, _) = world_with_player(false);
    set_intent(&mut world, PlayerInput { dash: true, ..default() });
    run_system_once(&mut world, super::tick_players);
    set_intent(&mut world, PlayerInput::default());
    run_system_once(&mut world, super::tick_players);

    run_system_once(&mut world, super::fade_afterimages);

    let alphas: Vec<f32> = world
        .query_filtered::<&Sprite, With<AfterimageGhost>>()
        .iter(&world)
        .map(|s| s.color.alpha())
        .collect();
    assert_eq!(alphas.len(), 1);
    // Age 2 of a 12 tick lifetime.
    assert!((alphas[0] - 0.5 * (1.0 - 2.0 / 13.0)).abs() < 1e-5);
}

#[test]
fn overlap_that_starts_mid_dash_hurts_once_the_dash_ends() {
    let (mut world, player) = world_with_player(false);
    let spikes = world.spawn(Hazard).id();
    set_intent(&mut world, PlayerInput { dash: true, ..default() });
    fixed_step(&mut world);
    set_intent(&mut world, PlayerInput::default());
    touch(&mut world, player, spikes);

    // Dash steps 2..=19 are immune.
    for _ in 0..18 {
        fixed_step(&mut world);
        assert!(!world.get::<PlayerControl>(player).unwrap().is_damaging());
    }

    // Step 20 finishes the dash; the overlap that is still there lands on the same step.
    fixed_step(&mut world);
    let control = world.get::<PlayerControl>(player).unwrap();
    assert!(!control.dash().is_active());
    assert!(control.is_damaging());
    assert_eq!(world.get::<LinearVelocity>(player).unwrap().0, Vec2::new(-500.0, 0.0));
}

#[test]
fn lingering_overlap_hurts_again_after_the_window() {
    let (mut world, player) = world_with_player(false);
    let spikes = world.spawn(Hazard).id();
    touch(&mut world, player, spikes);

    run_system_once(&mut world, super::react_to_hazards);
    assert!(world.get::<PlayerControl>(player).unwrap().is_damaging());
    // Knocked straight up from rest.
    assert_eq!(world.get::<LinearVelocity>(player).unwrap().0, Vec2::new(0.0, 500.0));

    // Still overlapping inside the window: no second knockback.
    world.get_mut::<LinearVelocity>(player).unwrap().0 = Vec2::new(0.0, 40.0);
    for _ in 0..24 {
        fixed_step(&mut world);
        assert_eq!(world.get::<LinearVelocity>(player).unwrap().0, Vec2::new(0.0, 40.0));
    }

    // The 25th step closes the window; the same overlap opens the next one.
    fixed_step(&mut world);
    assert!(world.get::<PlayerControl>(player).unwrap().is_damaging());
    assert_eq!(world.get::<LinearVelocity>(player).unwrap().0, Vec2::new(0.0, -500.0));
}
