#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure bootstrap system that prepares the Dungeon Brawl experience.

use dungeon_brawl_core::{Grid, HudSnapshot};
use dungeon_brawl_world::{query, World};

/// Produces data required to greet the player.
#[derive(Debug, Default)]
pub struct Bootstrap;

impl Bootstrap {
    /// Derives the banner that should be shown when the experience starts.
    #[must_use]
    pub fn welcome_banner<'world>(&self, world: &'world World) -> &'world str {
        query::welcome_banner(world)
    }

    /// Exposes the occupancy grid configuration required for rendering.
    #[must_use]
    pub fn grid<'world>(&self, world: &'world World) -> &'world Grid {
        query::grid(world)
    }

    /// Captures the heads-up-display snapshot shown alongside the scene.
    #[must_use]
    pub fn hud(&self, world: &World) -> HudSnapshot {
        query::hud(world)
    }
}

#[cfg(test)]
mod tests {
    use super::Bootstrap;
    use dungeon_brawl_core::Outcome;
    use dungeon_brawl_world::World;

    #[test]
    fn banner_greets_the_player() {
        let world = World::new();
        let bootstrap = Bootstrap;

        assert!(!bootstrap.welcome_banner(&world).is_empty());
    }

    #[test]
    fn fresh_run_starts_ongoing_with_full_health() {
        let world = World::new();
        let bootstrap = Bootstrap;

        let hud = bootstrap.hud(&world);
        assert_eq!(hud.outcome, Outcome::Ongoing);
        assert_eq!(hud.player_health, hud.player_max_health);
        assert_eq!(hud.boss_health, hud.boss_max_health);
        assert!(bootstrap.grid(&world).columns() > 0);
    }
}
