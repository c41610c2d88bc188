#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Dungeon Brawl adapters.

use dungeon_brawl_core::{
    BossSnapshot, CellCoord, EnemyId, EnemyView, FlashState, Grid, HudSnapshot, Outcome,
    PlayerSnapshot,
};
use glam::Vec2;
use std::{error::Error, fmt, time::Duration};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

/// Strength of the white tint applied while a damage flash is active.
pub const FLASH_TINT_STRENGTH: f32 = 0.6;

/// Applies the damage-flash tint to a base color when the window is active.
///
/// The flash deadline lives on the simulation clock, so adapters pass the
/// clock value they captured alongside the snapshot.
#[must_use]
pub fn flash_tint(base: Color, flash: FlashState, clock: Duration) -> Color {
    if flash.is_active_at(clock) {
        base.lighten(FLASH_TINT_STRENGTH)
    } else {
        base
    }
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct FrameInput {
    /// Whether the leftward movement control is held on this frame.
    pub move_left: bool,
    /// Whether the rightward movement control is held on this frame.
    pub move_right: bool,
    /// Whether the adapter detected a jump press on this frame.
    pub jump_pressed: bool,
    /// Whether the adapter detected a dash press on this frame.
    pub dash_pressed: bool,
    /// Whether the adapter detected an attack press on this frame.
    pub attack_pressed: bool,
}

/// Describes the platform grid that can be rendered by adapters.
#[derive(Clone, Debug, PartialEq)]
pub struct DungeonPresentation {
    /// Number of columns contained in the grid.
    pub columns: u32,
    /// Number of rows contained in the grid.
    pub rows: u32,
    /// Side length of a single tile expressed in world units.
    pub tile_length: f32,
    /// Cells filled by platform blocks, in row-major order.
    pub solid_cells: Vec<CellCoord>,
    /// Color used when drawing platform blocks.
    pub platform_color: Color,
}

impl DungeonPresentation {
    /// Builds a dungeon descriptor from a generated occupancy grid.
    ///
    /// Returns an error when the tile length is not strictly positive.
    pub fn from_grid(grid: &Grid, platform_color: Color) -> Result<Self, RenderingError> {
        if grid.tile_length() <= 0.0 {
            return Err(RenderingError::InvalidTileLength {
                tile_length: grid.tile_length(),
            });
        }

        let mut solid_cells = Vec::new();
        for row in 0..grid.rows() {
            for column in 0..grid.columns() {
                let cell = CellCoord::new(column, row);
                if grid.is_solid(cell) {
                    solid_cells.push(cell);
                }
            }
        }

        Ok(Self {
            columns: grid.columns(),
            rows: grid.rows(),
            tile_length: grid.tile_length(),
            solid_cells,
            platform_color,
        })
    }

    /// Calculates the total width of the dungeon.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.columns as f32 * self.tile_length
    }

    /// Calculates the total height of the dungeon.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.rows as f32 * self.tile_length
    }

    /// Clamps a world-space position to the dungeon bounds.
    #[must_use]
    pub fn clamp_world_position(&self, position: Vec2) -> Vec2 {
        if self.columns == 0 || self.rows == 0 {
            return Vec2::ZERO;
        }

        Vec2::new(
            position.x.clamp(0.0, self.width()),
            position.y.clamp(0.0, self.height()),
        )
    }
}

/// Player rendered as a filled rectangle anchored at its world position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerPresentation {
    /// World position of the player sprite.
    pub position: Vec2,
    /// Fill color after flash tinting has been applied.
    pub color: Color,
    /// Whether the dash indicator should be drawn.
    pub dash_available: bool,
}

impl PlayerPresentation {
    /// Default player body color before flash tinting.
    pub const BASE_COLOR: Color = Color::from_rgb_u8(70, 130, 210);

    /// Creates a new player presentation descriptor.
    #[must_use]
    pub const fn new(position: Vec2, color: Color, dash_available: bool) -> Self {
        Self {
            position,
            color,
            dash_available,
        }
    }
}

/// In-game enemy rendered as a filled circle scaled to a single tile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemyPresentation {
    /// Identifier allocated to the enemy by the world.
    pub id: EnemyId,
    /// World position of the enemy sprite.
    pub position: Vec2,
    /// Fill color after flash tinting has been applied.
    pub color: Color,
}

impl EnemyPresentation {
    /// Default enemy body color before flash tinting.
    pub const BASE_COLOR: Color = Color::from_rgb_u8(90, 160, 70);

    /// Creates a new enemy presentation descriptor.
    #[must_use]
    pub const fn new(id: EnemyId, position: Vec2, color: Color) -> Self {
        Self {
            id,
            position,
            color,
        }
    }
}

/// Boss rendered on its shelf while it remains active.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BossPresentation {
    /// World position of the boss sprite.
    pub position: Vec2,
    /// Fill color after flash tinting has been applied.
    pub color: Color,
    /// Fraction of boss health remaining, used for the overhead bar.
    pub health_fraction: f32,
}

impl BossPresentation {
    /// Default boss body color before flash tinting.
    pub const BASE_COLOR: Color = Color::from_rgb_u8(170, 40, 40);

    /// Derives a boss presentation from a world snapshot, or `None` once the
    /// boss has been slain.
    #[must_use]
    pub fn from_snapshot(boss: &BossSnapshot, clock: Duration) -> Option<Self> {
        if !boss.active {
            return None;
        }

        let fraction = if boss.max_health == 0 {
            0.0
        } else {
            boss.health as f32 / boss.max_health as f32
        };

        Some(Self {
            position: Vec2::new(boss.position.x(), boss.position.y()),
            color: flash_tint(Self::BASE_COLOR, boss.flash, clock),
            health_fraction: fraction,
        })
    }
}

/// Heads-up display rendered above the scene.
#[derive(Clone, Debug, PartialEq)]
pub struct HudPresentation {
    /// Player hearts drawn in the top-left corner.
    pub player_health: u32,
    /// Maximum number of heart slots.
    pub player_max_health: u32,
    /// Number of enemies still alive.
    pub live_enemies: u32,
    /// Banner text shown when the run has reached a terminal outcome.
    pub outcome_banner: Option<&'static str>,
}

impl HudPresentation {
    /// Banner displayed when the boss has been defeated.
    pub const VICTORY_BANNER: &'static str = "VICTORY!";

    /// Banner displayed when the player has fallen.
    pub const DEFEAT_BANNER: &'static str = "GAME OVER";

    /// Derives the HUD layer from a world snapshot.
    #[must_use]
    pub fn from_snapshot(hud: &HudSnapshot) -> Self {
        let outcome_banner = match hud.outcome {
            Outcome::Ongoing => None,
            Outcome::Victory => Some(Self::VICTORY_BANNER),
            Outcome::Defeat => Some(Self::DEFEAT_BANNER),
        };

        Self {
            player_health: hud.player_health,
            player_max_health: hud.player_max_health,
            live_enemies: hud.live_enemies,
            outcome_banner,
        }
    }
}

/// Scene description combining the dungeon and its inhabitants.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Platform grid that composes the play area.
    pub dungeon: DungeonPresentation,
    /// Player sprite descriptor.
    pub player: PlayerPresentation,
    /// Enemies currently alive within the dungeon.
    pub enemies: Vec<EnemyPresentation>,
    /// Boss sprite descriptor while the boss remains active.
    pub boss: Option<BossPresentation>,
    /// Heads-up display layer drawn over the scene.
    pub hud: HudPresentation,
}

impl Scene {
    /// Creates a new scene descriptor.
    #[must_use]
    pub fn new(
        dungeon: DungeonPresentation,
        player: PlayerPresentation,
        enemies: Vec<EnemyPresentation>,
        boss: Option<BossPresentation>,
        hud: HudPresentation,
    ) -> Self {
        Self {
            dungeon,
            player,
            enemies,
            boss,
            hud,
        }
    }

    /// Assembles a full scene from world snapshots taken on the same frame.
    ///
    /// Sprite positions are clamped to the dungeon bounds and flash tints are
    /// resolved against the captured clock, so the result is ready to draw.
    #[must_use]
    pub fn compose(
        dungeon: DungeonPresentation,
        player: &PlayerSnapshot,
        enemies: &EnemyView,
        boss: &BossSnapshot,
        hud: &HudSnapshot,
        clock: Duration,
    ) -> Self {
        let player_sprite = PlayerPresentation::new(
            dungeon.clamp_world_position(Vec2::new(player.position.x(), player.position.y())),
            flash_tint(PlayerPresentation::BASE_COLOR, player.flash, clock),
            player.dash_available,
        );
        let enemy_sprites = enemies
            .iter()
            .map(|enemy| {
                EnemyPresentation::new(
                    enemy.id,
                    Vec2::new(enemy.position.x(), enemy.position.y()),
                    flash_tint(EnemyPresentation::BASE_COLOR, enemy.flash, clock),
                )
            })
            .collect();

        Self {
            dungeon,
            player: player_sprite,
            enemies: enemy_sprites,
            boss: BossPresentation::from_snapshot(boss, clock),
            hud: HudPresentation::from_snapshot(hud),
        }
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq)]
pub enum RenderingError {
    /// Tile length must be positive to avoid a zero-sized dungeon.
    InvalidTileLength {
        /// Provided tile length that failed validation.
        tile_length: f32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTileLength { tile_length } => {
                write!(f, "tile_length must be positive (received {tile_length})")
            }
        }
    }
}

impl Error for RenderingError {}
