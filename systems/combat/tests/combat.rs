use std::time::Duration;

use dungeon_brawl_core::{
    Command, Event, Facing, WorldPoint, ATTACK_RANGE,
};
use dungeon_brawl_system_combat::{Combat, CombatInput};
use dungeon_brawl_world::{self as world, query, World};

const EPSILON: f32 = 0.5;

fn configured_world(seed: u64) -> World {
    let mut world = World::new();
    world::apply(
        &mut world,
        Command::ConfigureDungeon {
            columns: 64,
            rows: 36,
            tile_length: 20.0,
            enemy_count: 6,
            seed,
        },
        &mut Vec::new(),
    );
    world
}

fn sync_player(world: &mut World, position: WorldPoint, facing: Facing) {
    world::apply(
        world,
        Command::SyncPlayer {
            position,
            facing,
            dash_available: true,
        },
        &mut Vec::new(),
    );
}

/// Runs one combat pass and applies whatever commands it emits.
fn combat_pass(world: &mut World, system: &mut Combat, input: CombatInput) -> Vec<Event> {
    let player = query::player(world);
    let enemies = query::enemy_view(world);
    let boss = query::boss(world);
    let timers = query::combat_timers(world);
    let tile_length = query::grid(world).tile_length();

    let mut commands = Vec::new();
    system.handle(input, &player, &enemies, &boss, timers, tile_length, &mut commands);

    let mut events = Vec::new();
    for command in commands {
        world::apply(world, command, &mut events);
    }
    events
}

#[test]
fn attack_hits_just_inside_its_range_and_misses_just_outside() {
    let mut world = configured_world(3);
    let mut system = Combat::new();

    let target = query::enemy_view(&world)
        .into_vec()
        .first()
        .copied()
        .expect("default dungeon spawns enemies");

    // Swing origin sits ATTACK_RANGE to the player's right; stand so the
    // target ends up just inside the radius of that origin.
    let origin_x = target.position.x() - (ATTACK_RANGE - EPSILON);
    sync_player(
        &mut world,
        WorldPoint::new(origin_x - ATTACK_RANGE, target.position.y()),
        Facing::Right,
    );
    let events = combat_pass(&mut world, &mut system, CombatInput::new(true));
    assert!(events.contains(&Event::EnemyDamaged {
        enemy: target.id,
        remaining: target.health - 1,
    }));

    // Reset the cooldown, then place the same target just outside.
    let mut world = configured_world(3);
    let target = query::enemy_view(&world)
        .into_vec()
        .first()
        .copied()
        .expect("default dungeon spawns enemies");
    world::apply(
        &mut world,
        Command::SyncEnemy {
            enemy: target.id,
            position: WorldPoint::new(10_000.0, target.position.y()),
        },
        &mut Vec::new(),
    );
    let origin_x = 10_000.0 - (ATTACK_RANGE + EPSILON);
    sync_player(
        &mut world,
        WorldPoint::new(origin_x - ATTACK_RANGE, target.position.y()),
        Facing::Right,
    );
    let events = combat_pass(&mut world, &mut system, CombatInput::new(true));
    assert!(
        !events
            .iter()
            .any(|event| matches!(event, Event::EnemyDamaged { enemy, .. } if *enemy == target.id)),
        "a target beyond the radius must not be hit"
    );
}

#[test]
fn attack_and_contact_cooldowns_are_independent() {
    let mut world = configured_world(22);
    let mut system = Combat::new();

    // First pass: no attack input, boss contact lands on the player and
    // starts the 1000ms invincibility window.
    let boss = query::boss(&world);
    sync_player(
        &mut world,
        boss.position.offset(-ATTACK_RANGE, 0.0),
        Facing::Right,
    );
    let events = combat_pass(&mut world, &mut system, CombatInput::default());
    assert!(events.iter().any(|e| matches!(e, Event::PlayerDamaged { .. })));

    // 600ms later the 500ms swing cooldown has never been started, so the
    // attack lands while the invincibility window still suppresses contact.
    world::apply(
        &mut world,
        Command::Tick {
            dt: Duration::from_millis(600),
        },
        &mut Vec::new(),
    );
    let boss = query::boss(&world);
    sync_player(
        &mut world,
        boss.position.offset(-ATTACK_RANGE, 0.0),
        Facing::Right,
    );
    let events = combat_pass(&mut world, &mut system, CombatInput::new(true));
    assert!(events.iter().any(|e| matches!(e, Event::BossDamaged { .. })));
    assert!(!events.iter().any(|e| matches!(e, Event::PlayerDamaged { .. })));
}

#[test]
fn boss_defeat_reaches_victory_through_the_system_loop() {
    let mut world = configured_world(23);
    let mut system = Combat::new();

    for _ in 0..10 {
        let boss = query::boss(&world);
        // Keep the boss inside the swing radius around the origin but
        // beyond its own contact radius of the player.
        sync_player(
            &mut world,
            boss.position.offset(-(ATTACK_RANGE + 40.0), 0.0),
            Facing::Right,
        );
        let boss_position = query::player(&world)
            .position
            .offset(ATTACK_RANGE + 25.0, 0.0);
        world::apply(
            &mut world,
            Command::SyncBoss {
                position: boss_position,
            },
            &mut Vec::new(),
        );
        let _ = combat_pass(&mut world, &mut system, CombatInput::new(true));
        world::apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(500),
            },
            &mut Vec::new(),
        );
    }

    assert_eq!(
        query::hud(&world).boss_health,
        0,
        "ten qualifying hits must drain the boss"
    );
    assert!(query::outcome(&world).is_terminal());
}
