#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that turns per-frame input and world snapshots into combat
//! commands.
//!
//! The system gates attack issuance on the attacker-side swing cooldown and
//! contact damage on the victim-side invincibility window; the world remains
//! authoritative and re-validates both before applying damage.

use dungeon_brawl_core::{
    BossSnapshot, CombatTimers, Command, ContactSource, EnemyView, PlayerSnapshot,
    BOSS_CONTACT_RADIUS_TILES, ENEMY_CONTACT_RADIUS_TILES,
};

/// Input flags distilled from adapter-provided frame input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct CombatInput {
    /// Whether the attack action was pressed on this frame.
    pub attack_pressed: bool,
}

impl CombatInput {
    /// Creates a new input descriptor with explicit field values.
    #[must_use]
    pub const fn new(attack_pressed: bool) -> Self {
        Self { attack_pressed }
    }
}

/// Combat system that queues swing and contact commands for the world.
#[derive(Debug, Default)]
pub struct Combat {
    scratch: Vec<Command>,
}

impl Combat {
    /// Creates a new combat system with an empty scratch buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes input and immutable views to emit combat commands.
    ///
    /// At most one [`Command::ContactPlayer`] is emitted per pass: enemies
    /// are scanned in roster order before the boss, and the first qualifying
    /// target claims the application for this invincibility window.
    pub fn handle(
        &mut self,
        input: CombatInput,
        player: &PlayerSnapshot,
        enemies: &EnemyView,
        boss: &BossSnapshot,
        timers: CombatTimers,
        tile_length: f32,
        out: &mut Vec<Command>,
    ) {
        self.scratch.clear();

        if input.attack_pressed && timers.attack_ready_in.is_zero() {
            self.scratch.push(Command::SwingAttack);
        }

        if timers.guard_ready_in.is_zero() {
            if let Some(source) = first_contact(player, enemies, boss, tile_length) {
                self.scratch.push(Command::ContactPlayer { source });
            }
        }

        if self.scratch.is_empty() {
            return;
        }

        out.reserve(self.scratch.len());
        out.append(&mut self.scratch);
    }
}

fn first_contact(
    player: &PlayerSnapshot,
    enemies: &EnemyView,
    boss: &BossSnapshot,
    tile_length: f32,
) -> Option<ContactSource> {
    for enemy in enemies.iter() {
        if enemy.health == 0 {
            continue;
        }
        if player.position.distance_to(enemy.position) < ENEMY_CONTACT_RADIUS_TILES * tile_length {
            return Some(ContactSource::Enemy(enemy.id));
        }
    }

    if boss.active
        && boss.health > 0
        && player.position.distance_to(boss.position) < BOSS_CONTACT_RADIUS_TILES * tile_length
    {
        return Some(ContactSource::Boss);
    }

    None
}
