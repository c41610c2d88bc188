#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative run state management for Dungeon Brawl.
//!
//! The world owns the generated grid, the player, the enemy roster and the
//! boss for the lifetime of a run. All mutation flows through [`apply`];
//! adapters and systems read state exclusively through the [`query`] module.

use std::time::Duration;

use dungeon_brawl_core::{
    Command, ContactSource, EnemyId, Event, Facing, FlashState, Grid, MovementProfile, Outcome,
    WorldPoint, ATTACK_COOLDOWN, ATTACK_RANGE, BOSS_CONTACT_RADIUS_TILES, BOSS_KNOCKBACK,
    BOSS_MAX_HEALTH, ENEMY_CONTACT_RADIUS_TILES, ENEMY_KNOCKBACK, ENEMY_MAX_HEALTH, FLASH_WINDOW,
    INVINCIBILITY_WINDOW, PLAYER_MAX_HEALTH, WELCOME_BANNER,
};
use dungeon_brawl_system_levelgen as levelgen;
use dungeon_brawl_system_placement::{
    boss_anchor, find_spawn, place_enemies, Spawn, SpawnRegion, SpawnRng, ENEMY_SPAWN_ATTEMPTS,
    MAX_SPAWN_ATTEMPTS,
};

const DEFAULT_GRID_COLUMNS: u32 = 64;
const DEFAULT_GRID_ROWS: u32 = 36;
const DEFAULT_TILE_LENGTH: f32 = 20.0;
const DEFAULT_ENEMY_COUNT: u32 = 6;
const DEFAULT_RUN_SEED: u64 = 0x42f0_e1eb_d4a5_3c21;

// Placement must not replay the shelf sequence, so its stream is decoupled
// from the level generator's seed.
const PLACEMENT_SEED_SALT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Represents the authoritative Dungeon Brawl run state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    grid: Grid,
    player: Player,
    enemies: Vec<Enemy>,
    boss: Boss,
    clock: Duration,
    attack_ready_at: Duration,
    guard_until: Duration,
    outcome: Outcome,
}

impl World {
    /// Creates a new world populated with the default dungeon.
    #[must_use]
    pub fn new() -> Self {
        let mut world = Self {
            banner: WELCOME_BANNER,
            grid: Grid::empty(0, 0, DEFAULT_TILE_LENGTH),
            player: Player::at(WorldPoint::new(0.0, 0.0)),
            enemies: Vec::new(),
            boss: Boss::at(WorldPoint::new(0.0, 0.0)),
            clock: Duration::ZERO,
            attack_ready_at: Duration::ZERO,
            guard_until: Duration::ZERO,
            outcome: Outcome::Ongoing,
        };
        world.configure(
            DEFAULT_GRID_COLUMNS,
            DEFAULT_GRID_ROWS,
            DEFAULT_TILE_LENGTH,
            DEFAULT_ENEMY_COUNT,
            DEFAULT_RUN_SEED,
            &mut Vec::new(),
        );
        world
    }

    fn configure(
        &mut self,
        columns: u32,
        rows: u32,
        tile_length: f32,
        enemy_count: u32,
        seed: u64,
        out_events: &mut Vec<Event>,
    ) {
        self.grid = levelgen::generate(columns, rows, tile_length, &levelgen::Config::with_seed(seed));
        self.clock = Duration::ZERO;
        self.attack_ready_at = Duration::ZERO;
        self.guard_until = Duration::ZERO;
        self.outcome = Outcome::Ongoing;

        out_events.push(Event::DungeonConfigured { columns, rows });

        let mut rng = SpawnRng::new(seed ^ PLACEMENT_SEED_SALT);

        let player_spawn = find_spawn(
            &self.grid,
            &SpawnRegion::player(&self.grid),
            MAX_SPAWN_ATTEMPTS,
            &mut rng,
        );
        // An anchored spawn stands centred atop its platform; the fallback
        // keeps the raw cell-corner coordinate.
        let player_position = match player_spawn {
            Spawn::Anchored(cell) => self.grid.spawn_point(cell),
            Spawn::Fallback(cell) => WorldPoint::new(
                cell.column() as f32 * tile_length,
                cell.row() as f32 * tile_length,
            ),
        };
        self.player = Player::at(player_position);
        out_events.push(Event::PlayerSpawned {
            position: player_position,
            fallback: !player_spawn.is_anchored(),
        });

        self.enemies.clear();
        let enemy_cells = place_enemies(
            &self.grid,
            enemy_count,
            &SpawnRegion::enemies(&self.grid),
            ENEMY_SPAWN_ATTEMPTS,
            &mut rng,
        );
        for (index, cell) in enemy_cells.into_iter().enumerate() {
            let id = EnemyId::new(index as u32);
            let position = self.grid.spawn_point(cell);
            self.enemies.push(Enemy::at(id, position));
            out_events.push(Event::EnemySpawned {
                enemy: id,
                position,
            });
        }

        let boss_position = self.grid.spawn_point(boss_anchor(&self.grid));
        self.boss = Boss::at(boss_position);
        out_events.push(Event::BossSpawned {
            position: boss_position,
        });
    }

    fn tick(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        self.clock = self.clock.saturating_add(dt);
        out_events.push(Event::TimeAdvanced { dt });

        self.player.flash = expire_flash(self.player.flash, self.clock);
        self.boss.flash = expire_flash(self.boss.flash, self.clock);
        for enemy in &mut self.enemies {
            enemy.flash = expire_flash(enemy.flash, self.clock);
        }

        self.evaluate_outcome(out_events);
    }

    // Outcome evaluation runs once per step; terminal states absorb every
    // later evaluation regardless of further health mutations.
    fn evaluate_outcome(&mut self, out_events: &mut Vec<Event>) {
        if self.outcome.is_terminal() {
            return;
        }
        if self.boss.health == 0 {
            self.outcome = Outcome::Victory;
            out_events.push(Event::VictoryAchieved);
        } else if self.player.health == 0 {
            self.outcome = Outcome::Defeat;
            out_events.push(Event::PlayerDefeated);
        }
    }

    fn swing_attack(&mut self, out_events: &mut Vec<Event>) {
        if self.clock < self.attack_ready_at {
            return;
        }
        // The cooldown starts on every swing, hit or miss.
        self.attack_ready_at = self.clock + ATTACK_COOLDOWN;

        let origin = self
            .player
            .position
            .offset(self.player.facing.project(ATTACK_RANGE), 0.0);
        out_events.push(Event::AttackSwung { origin });

        let attacker = self.player.position;
        let flash_until = self.clock + FLASH_WINDOW;

        let mut slain: Vec<EnemyId> = Vec::new();
        for enemy in &mut self.enemies {
            if enemy.health == 0 {
                continue;
            }
            if origin.distance_to(enemy.position) >= ATTACK_RANGE {
                continue;
            }
            enemy.health -= 1;
            out_events.push(Event::EnemyDamaged {
                enemy: enemy.id,
                remaining: enemy.health,
            });
            if enemy.health == 0 {
                slain.push(enemy.id);
            } else {
                enemy.position = enemy.position.pushed_away_from(attacker, ENEMY_KNOCKBACK);
                enemy.flash = FlashState::Active { until: flash_until };
            }
        }
        for id in slain {
            out_events.push(Event::EnemySlain { enemy: id });
            self.enemies.retain(|enemy| enemy.id != id);
        }

        if self.boss.active
            && self.boss.health > 0
            && origin.distance_to(self.boss.position) < ATTACK_RANGE
        {
            self.boss.health -= 1;
            out_events.push(Event::BossDamaged {
                remaining: self.boss.health,
            });
            if self.boss.health == 0 {
                self.boss.active = false;
                out_events.push(Event::BossSlain);
            } else {
                self.boss.position = self.boss.position.pushed_away_from(attacker, BOSS_KNOCKBACK);
                self.boss.flash = FlashState::Active { until: flash_until };
            }
        }
    }

    fn contact_player(&mut self, source: ContactSource, out_events: &mut Vec<Event>) {
        if self.clock < self.guard_until || self.player.health == 0 {
            return;
        }

        let tile = self.grid.tile_length();
        let qualified = match source {
            ContactSource::Enemy(id) => self.enemies.iter().any(|enemy| {
                enemy.id == id
                    && enemy.health > 0
                    && self.player.position.distance_to(enemy.position)
                        < ENEMY_CONTACT_RADIUS_TILES * tile
            }),
            ContactSource::Boss => {
                self.boss.active
                    && self.boss.health > 0
                    && self.player.position.distance_to(self.boss.position)
                        < BOSS_CONTACT_RADIUS_TILES * tile
            }
        };
        if !qualified {
            return;
        }

        self.player.health -= 1;
        self.guard_until = self.clock + INVINCIBILITY_WINDOW;
        self.player.flash = FlashState::Active {
            until: self.clock + FLASH_WINDOW,
        };
        out_events.push(Event::PlayerDamaged {
            remaining: self.player.health,
            source,
        });
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureDungeon {
            columns,
            rows,
            tile_length,
            enemy_count,
            seed,
        } => world.configure(columns, rows, tile_length, enemy_count, seed, out_events),
        Command::Tick { dt } => world.tick(dt, out_events),
        Command::SyncPlayer {
            position,
            facing,
            dash_available,
        } => {
            world.player.position = position;
            world.player.facing = facing;
            world.player.dash_available = dash_available;
        }
        Command::SyncEnemy { enemy, position } => {
            if let Some(entry) = world.enemies.iter_mut().find(|e| e.id == enemy) {
                entry.position = position;
            }
        }
        Command::SyncBoss { position } => {
            if world.boss.active {
                world.boss.position = position;
            }
        }
        Command::SwingAttack => world.swing_attack(out_events),
        Command::ContactPlayer { source } => world.contact_player(source, out_events),
    }
}

fn expire_flash(flash: FlashState, clock: Duration) -> FlashState {
    if flash.is_active_at(clock) {
        flash
    } else {
        FlashState::Inactive
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::World;
    use dungeon_brawl_core::{
        BossSnapshot, CombatTimers, EnemySnapshot, EnemyView, Grid, HudSnapshot, Outcome,
        PlayerSnapshot,
    };
    use std::time::Duration;

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Provides read-only access to the generated occupancy grid.
    #[must_use]
    pub fn grid(world: &World) -> &Grid {
        &world.grid
    }

    /// Simulated time elapsed since the run was configured.
    #[must_use]
    pub fn clock(world: &World) -> Duration {
        world.clock
    }

    /// Current run outcome.
    #[must_use]
    pub fn outcome(world: &World) -> Outcome {
        world.outcome
    }

    /// Captures a read-only snapshot of the player.
    #[must_use]
    pub fn player(world: &World) -> PlayerSnapshot {
        PlayerSnapshot {
            position: world.player.position,
            facing: world.player.facing,
            health: world.player.health,
            max_health: world.player.max_health,
            dash_available: world.player.dash_available,
            movement: world.player.movement,
            flash: world.player.flash,
        }
    }

    /// Captures a read-only view of the live enemy roster.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        EnemyView::from_snapshots(
            world
                .enemies
                .iter()
                .map(|enemy| EnemySnapshot {
                    id: enemy.id,
                    position: enemy.position,
                    health: enemy.health,
                    max_health: enemy.max_health,
                    flash: enemy.flash,
                })
                .collect(),
        )
    }

    /// Captures a read-only snapshot of the boss.
    #[must_use]
    pub fn boss(world: &World) -> BossSnapshot {
        BossSnapshot {
            position: world.boss.position,
            health: world.boss.health,
            max_health: world.boss.max_health,
            active: world.boss.active,
            flash: world.boss.flash,
        }
    }

    /// Captures the heads-up-display snapshot for this step.
    #[must_use]
    pub fn hud(world: &World) -> HudSnapshot {
        HudSnapshot {
            player_health: world.player.health,
            player_max_health: world.player.max_health,
            boss_health: world.boss.health,
            boss_max_health: world.boss.max_health,
            live_enemies: world.enemies.len() as u32,
            outcome: world.outcome,
        }
    }

    /// Exposes combat deadlines as saturating durations against the clock.
    #[must_use]
    pub fn combat_timers(world: &World) -> CombatTimers {
        CombatTimers {
            attack_ready_in: world.attack_ready_at.saturating_sub(world.clock),
            guard_ready_in: world.guard_until.saturating_sub(world.clock),
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Player {
    position: WorldPoint,
    facing: Facing,
    health: u32,
    max_health: u32,
    dash_available: bool,
    movement: MovementProfile,
    flash: FlashState,
}

impl Player {
    fn at(position: WorldPoint) -> Self {
        Self {
            position,
            facing: Facing::Right,
            health: PLAYER_MAX_HEALTH,
            max_health: PLAYER_MAX_HEALTH,
            dash_available: true,
            movement: MovementProfile::DEFAULT,
            flash: FlashState::Inactive,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Enemy {
    id: EnemyId,
    position: WorldPoint,
    health: u32,
    max_health: u32,
    flash: FlashState,
}

impl Enemy {
    fn at(id: EnemyId, position: WorldPoint) -> Self {
        Self {
            id,
            position,
            health: ENEMY_MAX_HEALTH,
            max_health: ENEMY_MAX_HEALTH,
            flash: FlashState::Inactive,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Boss {
    position: WorldPoint,
    health: u32,
    max_health: u32,
    active: bool,
    flash: FlashState,
}

impl Boss {
    fn at(position: WorldPoint) -> Self {
        Self {
            position,
            health: BOSS_MAX_HEALTH,
            max_health: BOSS_MAX_HEALTH,
            active: true,
            flash: FlashState::Inactive,
        }
    }
}
