#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Dungeon Brawl engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Dungeon Brawl.";

/// Radius of a player melee swing, measured in world units.
pub const ATTACK_RANGE: f32 = 30.0;

/// Minimum elapsed time between successive player melee swings.
pub const ATTACK_COOLDOWN: Duration = Duration::from_millis(500);

/// Minimum elapsed time between successive contact-damage applications to
/// the player.
pub const INVINCIBILITY_WINDOW: Duration = Duration::from_millis(1000);

/// Duration of the visual flash started when an entity takes damage.
pub const FLASH_WINDOW: Duration = Duration::from_millis(200);

/// Knockback displacement magnitude applied to a damaged enemy.
pub const ENEMY_KNOCKBACK: f32 = 20.0;

/// Knockback displacement magnitude applied to the damaged boss.
pub const BOSS_KNOCKBACK: f32 = 15.0;

/// Contact radius of a generic enemy, expressed in tile lengths.
pub const ENEMY_CONTACT_RADIUS_TILES: f32 = 1.0;

/// Contact radius of the boss, expressed in tile lengths.
pub const BOSS_CONTACT_RADIUS_TILES: f32 = 1.6;

/// Health the player starts a run with.
pub const PLAYER_MAX_HEALTH: u32 = 3;

/// Health assigned to each generic enemy at spawn.
pub const ENEMY_MAX_HEALTH: u32 = 2;

/// Health assigned to the boss at spawn.
pub const BOSS_MAX_HEALTH: u32 = 10;

/// Occupancy state of a single grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GridCell {
    /// Cell contains no platform geometry.
    Empty,
    /// Cell is filled by a platform block.
    Solid,
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }
}

/// Dense occupancy grid describing the platform geometry of a run.
///
/// The grid is produced once per run by the level generator and is read-only
/// afterwards; placement and collision collaborators only ever borrow it.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    columns: u32,
    rows: u32,
    tile_length: f32,
    cells: Vec<GridCell>,
}

impl Grid {
    /// Creates a grid of the provided dimensions with every cell empty.
    #[must_use]
    pub fn empty(columns: u32, rows: u32, tile_length: f32) -> Self {
        let capacity_u64 = u64::from(columns) * u64::from(rows);
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);
        Self {
            columns,
            rows,
            tile_length,
            cells: vec![GridCell::Empty; capacity],
        }
    }

    /// Number of columns contained in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows contained in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Side length of a single square tile expressed in world units.
    #[must_use]
    pub const fn tile_length(&self) -> f32 {
        self.tile_length
    }

    /// Total width of the grid measured in world units.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.columns as f32 * self.tile_length
    }

    /// Total height of the grid measured in world units.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.rows as f32 * self.tile_length
    }

    /// Returns the occupancy of the provided cell.
    ///
    /// Out-of-bounds coordinates read as [`GridCell::Empty`] so that callers
    /// never observe phantom platforms beyond the configured dimensions.
    #[must_use]
    pub fn cell(&self, cell: CellCoord) -> GridCell {
        self.index(cell)
            .and_then(|index| self.cells.get(index).copied())
            .unwrap_or(GridCell::Empty)
    }

    /// Reports whether the provided cell is filled by a platform block.
    #[must_use]
    pub fn is_solid(&self, cell: CellCoord) -> bool {
        self.cell(cell) == GridCell::Solid
    }

    /// Overwrites the occupancy of the provided cell.
    ///
    /// Out-of-bounds writes are ignored; generators may therefore mark shelf
    /// spans without re-checking every coordinate.
    pub fn set(&mut self, cell: CellCoord, value: GridCell) {
        if let Some(index) = self.index(cell) {
            if let Some(slot) = self.cells.get_mut(index) {
                *slot = value;
            }
        }
    }

    /// Derives the world-unit spawn position anchored at the provided cell.
    ///
    /// Entities spawn horizontally centered within the cell and vertically
    /// aligned with its upper edge, matching how placement seeds sprites onto
    /// platform tops.
    #[must_use]
    pub fn spawn_point(&self, cell: CellCoord) -> WorldPoint {
        WorldPoint::new(
            cell.column() as f32 * self.tile_length + self.tile_length / 2.0,
            cell.row() as f32 * self.tile_length,
        )
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() < self.columns && cell.row() < self.rows {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

/// Continuous position expressed in world units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorldPoint {
    x: f32,
    y: f32,
}

impl WorldPoint {
    /// Creates a new world-space point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Horizontal coordinate in world units.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Vertical coordinate in world units.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Returns the point displaced by the provided deltas.
    #[must_use]
    pub const fn offset(&self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Euclidean distance between two world points.
    #[must_use]
    pub fn distance_to(&self, other: WorldPoint) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Returns this point displaced away from `source` by `magnitude`.
    ///
    /// Knockback pushes a damaged entity along the vector from the attacker
    /// to the target. A coincident source degenerates to a horizontal push so
    /// the displacement is always applied in full.
    #[must_use]
    pub fn pushed_away_from(&self, source: WorldPoint, magnitude: f32) -> Self {
        let dx = self.x - source.x;
        let dy = self.y - source.y;
        let length = (dx * dx + dy * dy).sqrt();
        if length <= f32::EPSILON {
            return self.offset(magnitude, 0.0);
        }
        self.offset(dx / length * magnitude, dy / length * magnitude)
    }
}

/// Horizontal direction an entity is facing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Facing {
    /// Facing toward decreasing x coordinates.
    Left,
    /// Facing toward increasing x coordinates.
    Right,
}

impl Facing {
    /// Projects a scalar distance along this facing onto the x axis.
    #[must_use]
    pub const fn project(&self, distance: f32) -> f32 {
        match self {
            Self::Left => -distance,
            Self::Right => distance,
        }
    }
}

/// Unique identifier assigned to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Timed visual flash modeled as an explicit deadline on the world clock.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlashState {
    /// No flash is in progress.
    Inactive,
    /// Flash remains visible until the clock reaches the stored instant.
    Active {
        /// Absolute clock deadline at which the flash ends.
        until: Duration,
    },
}

impl FlashState {
    /// Reports whether the flash should be presented at the provided clock.
    #[must_use]
    pub fn is_active_at(&self, clock: Duration) -> bool {
        match self {
            Self::Inactive => false,
            Self::Active { until } => clock < *until,
        }
    }
}

/// Entity responsible for a contact-damage application against the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContactSource {
    /// A generic enemy touched the player.
    Enemy(EnemyId),
    /// The boss touched the player.
    Boss,
}

/// Terminal classification of a run derived from health thresholds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// The encounter continues.
    Ongoing,
    /// The boss was defeated.
    Victory,
    /// The player was defeated.
    Defeat,
}

impl Outcome {
    /// Reports whether the outcome can no longer change for this run.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Self::Ongoing)
    }
}

/// Movement parameters assigned to the player for a run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MovementProfile {
    /// Horizontal ground speed in world units per second.
    pub move_speed: f32,
    /// Initial jump velocity in world units per second.
    pub jump_speed: f32,
    /// Dash impulse in world units per second.
    pub dash_speed: f32,
}

impl MovementProfile {
    /// Default profile applied to the player at spawn.
    pub const DEFAULT: Self = Self {
        move_speed: 220.0,
        jump_speed: 430.0,
        dash_speed: 520.0,
    };
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    /// Generates a fresh dungeon and repopulates every entity for a new run.
    ConfigureDungeon {
        /// Number of grid columns laid out in the dungeon.
        columns: u32,
        /// Number of grid rows laid out in the dungeon.
        rows: u32,
        /// Length of each square tile measured in world units.
        tile_length: f32,
        /// Number of enemy spawn attempts to perform.
        enemy_count: u32,
        /// Seed shared by the level generator and placement solver.
        seed: u64,
    },
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Reports the player's post-physics kinematic state for this frame.
    SyncPlayer {
        /// Player position after movement integration.
        position: WorldPoint,
        /// Direction the player faces after movement integration.
        facing: Facing,
        /// Whether the movement collaborator considers a dash available.
        dash_available: bool,
    },
    /// Reports an enemy's post-physics position for this frame.
    SyncEnemy {
        /// Identifier of the enemy whose position is reported.
        enemy: EnemyId,
        /// Enemy position after movement integration.
        position: WorldPoint,
    },
    /// Reports the boss's post-physics position for this frame.
    SyncBoss {
        /// Boss position after movement integration.
        position: WorldPoint,
    },
    /// Requests a player melee swing resolved against every live target.
    SwingAttack,
    /// Requests a contact-damage application against the player.
    ContactPlayer {
        /// Entity that touched the player.
        source: ContactSource,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that a dungeon was generated for a new run.
    DungeonConfigured {
        /// Number of grid columns in the generated dungeon.
        columns: u32,
        /// Number of grid rows in the generated dungeon.
        rows: u32,
    },
    /// Confirms that the player was placed into the dungeon.
    PlayerSpawned {
        /// World position assigned to the player.
        position: WorldPoint,
        /// Whether the spawn search exhausted its attempts and fell back.
        fallback: bool,
    },
    /// Confirms that an enemy was placed into the dungeon.
    EnemySpawned {
        /// Identifier assigned to the enemy.
        enemy: EnemyId,
        /// World position assigned to the enemy.
        position: WorldPoint,
    },
    /// Confirms that the boss was anchored onto its shelf.
    BossSpawned {
        /// World position assigned to the boss.
        position: WorldPoint,
    },
    /// Confirms that a melee swing was issued and its cooldown started.
    AttackSwung {
        /// World position the swing originated from.
        origin: WorldPoint,
    },
    /// Reports that an enemy took a point of damage.
    EnemyDamaged {
        /// Identifier of the damaged enemy.
        enemy: EnemyId,
        /// Health remaining after the hit.
        remaining: u32,
    },
    /// Reports that an enemy reached zero health and left the roster.
    EnemySlain {
        /// Identifier of the removed enemy.
        enemy: EnemyId,
    },
    /// Reports that the boss took a point of damage.
    BossDamaged {
        /// Health remaining after the hit.
        remaining: u32,
    },
    /// Reports that the boss reached zero health and became inactive.
    BossSlain,
    /// Reports that the player took a point of contact damage.
    PlayerDamaged {
        /// Health remaining after the hit.
        remaining: u32,
        /// Entity responsible for the contact.
        source: ContactSource,
    },
    /// One-shot signal that the run ended in victory.
    ///
    /// Rendering collaborators use this to trigger their celebratory effect.
    VictoryAchieved,
    /// One-shot signal that the run ended in defeat.
    ///
    /// Rendering collaborators use this to schedule a scene restart.
    PlayerDefeated,
}

/// Immutable representation of the player's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerSnapshot {
    /// Current world position.
    pub position: WorldPoint,
    /// Direction the player is facing.
    pub facing: Facing,
    /// Current health.
    pub health: u32,
    /// Maximum health for the run.
    pub max_health: u32,
    /// Whether a dash is currently available.
    pub dash_available: bool,
    /// Movement parameters assigned at spawn.
    pub movement: MovementProfile,
    /// Damage-flash window, if one is in progress.
    pub flash: FlashState,
}

/// Immutable representation of a single enemy's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Unique identifier assigned to the enemy.
    pub id: EnemyId,
    /// Current world position.
    pub position: WorldPoint,
    /// Current health.
    pub health: u32,
    /// Maximum health at spawn.
    pub max_health: u32,
    /// Hit-flash window, if one is in progress.
    pub flash: FlashState,
}

/// Read-only snapshot describing every live enemy in the roster.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured enemy snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Number of enemies captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the roster was empty when the view was captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

/// Immutable representation of the boss's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BossSnapshot {
    /// Current world position.
    pub position: WorldPoint,
    /// Current health.
    pub health: u32,
    /// Maximum health at spawn.
    pub max_health: u32,
    /// Whether the boss still participates in the simulation.
    pub active: bool,
    /// Hit-flash window, if one is in progress.
    pub flash: FlashState,
}

/// Read-only heads-up-display snapshot captured once per step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HudSnapshot {
    /// Current player health.
    pub player_health: u32,
    /// Maximum player health.
    pub player_max_health: u32,
    /// Current boss health.
    pub boss_health: u32,
    /// Maximum boss health.
    pub boss_max_health: u32,
    /// Number of enemies still in the roster.
    pub live_enemies: u32,
    /// Current run outcome.
    pub outcome: Outcome,
}

/// Combat deadlines exposed as saturating durations relative to the clock.
///
/// The attacker-side swing cooldown and the victim-side invincibility window
/// are independent mechanisms; systems consult whichever gate applies to the
/// command they intend to emit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CombatTimers {
    /// Time remaining until the player may issue another melee swing.
    pub attack_ready_in: Duration,
    /// Time remaining in the player's contact-damage invincibility window.
    pub guard_ready_in: Duration,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_point_centers_horizontally_on_the_cell() {
        let grid = Grid::empty(8, 8, 20.0);
        let point = grid.spawn_point(CellCoord::new(3, 5));
        assert_eq!(point, WorldPoint::new(70.0, 100.0));
    }

    #[test]
    fn out_of_bounds_cells_read_as_empty() {
        let mut grid = Grid::empty(4, 4, 10.0);
        grid.set(CellCoord::new(9, 9), GridCell::Solid);
        assert_eq!(grid.cell(CellCoord::new(9, 9)), GridCell::Empty);
        assert!(!grid.is_solid(CellCoord::new(0, 4)));
    }

    #[test]
    fn distance_is_symmetric() {
        let a = WorldPoint::new(0.0, 0.0);
        let b = WorldPoint::new(3.0, 4.0);
        assert_eq!(a.distance_to(b), 5.0);
        assert_eq!(b.distance_to(a), 5.0);
    }

    #[test]
    fn pushed_away_from_preserves_magnitude() {
        let target = WorldPoint::new(10.0, 0.0);
        let source = WorldPoint::new(0.0, 0.0);
        let pushed = target.pushed_away_from(source, 20.0);
        assert_eq!(pushed, WorldPoint::new(30.0, 0.0));
    }

    #[test]
    fn pushed_away_from_coincident_source_degenerates_horizontally() {
        let target = WorldPoint::new(5.0, 5.0);
        let pushed = target.pushed_away_from(target, 15.0);
        assert_eq!(pushed, WorldPoint::new(20.0, 5.0));
    }

    #[test]
    fn facing_projects_scalar_distances() {
        assert_eq!(Facing::Left.project(30.0), -30.0);
        assert_eq!(Facing::Right.project(30.0), 30.0);
    }

    #[test]
    fn flash_state_expires_at_its_deadline() {
        let flash = FlashState::Active {
            until: Duration::from_millis(200),
        };
        assert!(flash.is_active_at(Duration::from_millis(199)));
        assert!(!flash.is_active_at(Duration::from_millis(200)));
        assert!(!FlashState::Inactive.is_active_at(Duration::ZERO));
    }

    #[test]
    fn terminal_outcomes_are_recognized() {
        assert!(!Outcome::Ongoing.is_terminal());
        assert!(Outcome::Victory.is_terminal());
        assert!(Outcome::Defeat.is_terminal());
    }

    #[test]
    fn enemy_view_sorts_snapshots_by_identifier() {
        let view = EnemyView::from_snapshots(vec![
            snapshot(7),
            snapshot(2),
            snapshot(5),
        ]);
        let ids: Vec<u32> = view.iter().map(|s| s.id.get()).collect();
        assert_eq!(ids, vec![2, 5, 7]);
    }

    fn snapshot(id: u32) -> EnemySnapshot {
        EnemySnapshot {
            id: EnemyId::new(id),
            position: WorldPoint::new(0.0, 0.0),
            health: ENEMY_MAX_HEALTH,
            max_health: ENEMY_MAX_HEALTH,
            flash: FlashState::Inactive,
        }
    }
}
