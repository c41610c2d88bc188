#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a scripted, headless Dungeon Brawl
//! encounter.
//!
//! The adapter owns the frame loop and the (simplified) kinematics: every
//! frame it steers the player toward the nearest opponent, feeds the combat
//! system, and reports each local boss hit to the optional remote community
//! counter.

use anyhow::{Context, Result};
use clap::Parser;
use dungeon_brawl_boss_client::RemoteBoss;
use dungeon_brawl_core::{Command, Event, Facing, PlayerSnapshot, WorldPoint};
use dungeon_brawl_rendering::{Color, DungeonPresentation, FrameInput, Presentation, Scene};
use dungeon_brawl_system_bootstrap::Bootstrap;
use dungeon_brawl_system_combat::{Combat, CombatInput};
use dungeon_brawl_world::{self as world, query, World};
use std::time::Duration;

const FRAME_DT: Duration = Duration::from_millis(16);
const STATUS_POLL_INTERVAL: u32 = 120;
const PLATFORM_COLOR: Color = Color::from_rgb_u8(80, 80, 80);
const CLEAR_COLOR: Color = Color::from_rgb_u8(18, 16, 24);

/// Runs a scripted Dungeon Brawl encounter in the terminal.
#[derive(Debug, Parser)]
#[command(name = "dungeon-brawl", version, about)]
struct Args {
    /// Number of grid columns in the generated dungeon.
    #[arg(long, default_value_t = 64)]
    columns: u32,

    /// Number of grid rows in the generated dungeon.
    #[arg(long, default_value_t = 36)]
    rows: u32,

    /// Side length of a single tile in world units.
    #[arg(long, default_value_t = 20.0)]
    tile_length: f32,

    /// Number of enemy spawn attempts to perform.
    #[arg(long, default_value_t = 6)]
    enemies: u32,

    /// Seed shared by the level generator and placement solver.
    #[arg(long, default_value_t = 7)]
    seed: u64,

    /// Maximum number of frames to simulate before giving up.
    #[arg(long, default_value_t = 3600)]
    frames: u32,

    /// Base URL of the community boss counter, e.g. http://localhost:3000.
    #[arg(long)]
    boss_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut world = World::new();
    world::apply(
        &mut world,
        Command::ConfigureDungeon {
            columns: args.columns,
            rows: args.rows,
            tile_length: args.tile_length,
            enemy_count: args.enemies,
            seed: args.seed,
        },
        &mut Vec::new(),
    );

    let bootstrap = Bootstrap::default();
    println!("{}", bootstrap.welcome_banner(&world));
    let grid = bootstrap.grid(&world);
    log::info!(
        "dungeon generated: {}x{} tiles of {} units",
        grid.columns(),
        grid.rows(),
        grid.tile_length()
    );

    let dungeon = DungeonPresentation::from_grid(grid, PLATFORM_COLOR)
        .context("generated dungeon cannot be presented")?;
    let mut presentation = Presentation::new(
        "Dungeon Brawl",
        CLEAR_COLOR,
        compose_scene(&world, &dungeon),
    );
    log::info!(
        "presenting '{}': {}x{} world units, {} platform blocks",
        presentation.window_title,
        presentation.scene.dungeon.width(),
        presentation.scene.dungeon.height(),
        presentation.scene.dungeon.solid_cells.len()
    );

    let remote = args.boss_url.map(RemoteBoss::new);
    if let Some(remote) = &remote {
        log::info!("joining shared fight: {}", remote.status().await);
    }

    let mut combat = Combat::new();
    for frame in 0..args.frames {
        let events = advance_frame(&mut world, &mut combat, frame);
        report_frame(&events, remote.as_ref());

        if query::outcome(&world).is_terminal() {
            break;
        }
        if frame % STATUS_POLL_INTERVAL == 0 {
            presentation.scene = compose_scene(&world, &dungeon);
            log::debug!(
                "scene refreshed: {} enemy sprites, boss drawn: {}",
                presentation.scene.enemies.len(),
                presentation.scene.boss.is_some()
            );
            if let Some(remote) = &remote {
                log::info!("{}", remote.status().await);
            }
        }
    }

    presentation.scene = compose_scene(&world, &dungeon);
    let hud = &presentation.scene.hud;
    println!(
        "hearts {}/{}  enemies left {}",
        hud.player_health, hud.player_max_health, hud.live_enemies
    );
    if let Some(banner) = hud.outcome_banner {
        println!("{banner}");
    } else {
        println!("encounter still unresolved after {} frames", args.frames);
    }
    if let Some(remote) = &remote {
        println!("{}", remote.status().await);
    }
    Ok(())
}

/// Captures this frame's world snapshots into a drawable scene.
fn compose_scene(world: &World, dungeon: &DungeonPresentation) -> Scene {
    Scene::compose(
        dungeon.clone(),
        &query::player(world),
        &query::enemy_view(world),
        &query::boss(world),
        &query::hud(world),
        query::clock(world),
    )
}

/// Steps the kinematics, runs one combat pass, and advances the clock.
fn advance_frame(world: &mut World, combat: &mut Combat, frame: u32) -> Vec<Event> {
    let mut events = Vec::new();

    let player = query::player(world);
    if let Some(target) = current_target(world) {
        let input = scripted_input(frame, &player, target);
        let (position, facing) = step_kinematics(&player, target, input);
        world::apply(
            world,
            Command::SyncPlayer {
                position,
                facing,
                dash_available: player.dash_available,
            },
            &mut events,
        );

        let player = query::player(world);
        let enemies = query::enemy_view(world);
        let boss = query::boss(world);
        let timers = query::combat_timers(world);
        let tile_length = query::grid(world).tile_length();

        let mut commands = Vec::new();
        combat.handle(
            CombatInput::new(input.attack_pressed),
            &player,
            &enemies,
            &boss,
            timers,
            tile_length,
            &mut commands,
        );
        for command in commands {
            world::apply(world, command, &mut events);
        }
    }

    world::apply(world, Command::Tick { dt: FRAME_DT }, &mut events);
    events
}

/// Picks the opponent the script chases: enemies in roster order, then the
/// boss once the floor is clear.
fn current_target(world: &World) -> Option<WorldPoint> {
    if let Some(enemy) = query::enemy_view(world).into_vec().first() {
        return Some(enemy.position);
    }
    let boss = query::boss(world);
    boss.active.then_some(boss.position)
}

fn scripted_input(frame: u32, player: &PlayerSnapshot, target: WorldPoint) -> FrameInput {
    FrameInput {
        move_left: target.x() < player.position.x(),
        move_right: target.x() > player.position.x(),
        jump_pressed: false,
        dash_pressed: false,
        attack_pressed: frame % 2 == 0,
    }
}

/// Simplified stand-in for platforming physics: walk horizontally at the
/// profile's ground speed and track the target's elevation directly.
fn step_kinematics(
    player: &PlayerSnapshot,
    target: WorldPoint,
    input: FrameInput,
) -> (WorldPoint, Facing) {
    let step = player.movement.move_speed * FRAME_DT.as_secs_f32();
    let dx = target.x() - player.position.x();
    let moved = if input.move_right {
        dx.min(step)
    } else if input.move_left {
        dx.max(-step)
    } else {
        0.0
    };

    let facing = if moved < 0.0 {
        Facing::Left
    } else if moved > 0.0 {
        Facing::Right
    } else {
        player.facing
    };

    (
        WorldPoint::new(player.position.x() + moved, target.y()),
        facing,
    )
}

/// Logs the interesting events of a frame and forwards boss hits to the
/// shared counter.
fn report_frame(events: &[Event], remote: Option<&RemoteBoss>) {
    for event in events {
        match event {
            Event::EnemySlain { enemy } => log::info!("enemy {} slain", enemy.get()),
            Event::BossDamaged { remaining } => {
                log::info!("boss staggered, {remaining} health left");
                if let Some(remote) = remote {
                    remote.attack_and_forget(10);
                }
            }
            Event::BossSlain => log::info!("boss slain"),
            Event::PlayerDamaged { remaining, .. } => {
                log::info!("player hurt, {remaining} hearts left");
            }
            _ => {}
        }
    }
}
