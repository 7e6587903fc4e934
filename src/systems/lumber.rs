use anyhow::Result;

use crate::{
    economy::StructureType,
    engine::{System, SystemContext},
    session::Session,
    world::{TileCoord, World},
};

const HARVEST_RADIUS: i32 = 8;
const WOOD_PER_LEVEL: f64 = 0.5;
const FOREST_WEAR: f64 = 0.1;

/// Lumber yards turn nearby forest health into wood.
pub struct LumberSystem;

impl LumberSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LumberSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for LumberSystem {
    fn name(&self) -> &str {
        "lumber"
    }

    fn run(&mut self, _ctx: &SystemContext, session: &mut Session) -> Result<()> {
        for coord in session.economy.coords_of(StructureType::Lumber) {
            let Some(level) = session.economy.get(coord).map(|s| s.level) else {
                continue;
            };
            if !forest_in_reach(&mut session.world, coord) {
                continue;
            }
            session.state.wood += WOOD_PER_LEVEL * level as f64;
            wear_forest(&mut session.world, coord);
        }
        Ok(())
    }
}

fn forest_in_reach(world: &mut World, centre: TileCoord) -> bool {
    for dy in -HARVEST_RADIUS..=HARVEST_RADIUS {
        for dx in -HARVEST_RADIUS..=HARVEST_RADIUS {
            let at = centre.offset(dx, dy);
            if world.get(at.x, at.y).has_living_forest() {
                return true;
            }
        }
    }
    false
}

/// Every forest tile in reach loses health. A row stops at the first tile
/// that gets cleared.
fn wear_forest(world: &mut World, centre: TileCoord) {
    for dy in -HARVEST_RADIUS..=HARVEST_RADIUS {
        for dx in -HARVEST_RADIUS..=HARVEST_RADIUS {
            let at = centre.offset(dx, dy);
            let tile = world.tile_mut(at.x, at.y);
            if !tile.is_forest {
                continue;
            }
            tile.forest_health -= FOREST_WEAR;
            if tile.forest_health <= 0.0 {
                tile.is_forest = false;
                tracing::debug!(x = tile.x, y = tile.y, "forest cleared");
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::GameState;

    /// Bare flat land with a lumber yard at the origin and no forest in reach.
    fn cleared_session() -> Session {
        let mut session = Session::new(6, GameState::default());
        for dy in -10..=10 {
            for dx in -10..=10 {
                let tile = session.world.tile_mut(dx, dy);
                tile.altitude = 2;
                tile.is_forest = false;
                tile.forest_health = 0.0;
            }
        }
        session.build(0, 0, StructureType::Lumber).unwrap();
        session
    }

    fn plant(session: &mut Session, x: i32, y: i32, health: f64) {
        let tile = session.world.tile_mut(x, y);
        tile.is_forest = true;
        tile.forest_health = health;
    }

    fn run(session: &mut Session) {
        let ctx = SystemContext {
            tick: 0,
            scenario_name: "test",
        };
        LumberSystem::new().run(&ctx, session).unwrap();
    }

    #[test]
    fn test_no_forest_no_wood() {
        let mut session = cleared_session();
        let wood = session.state.wood;
        run(&mut session);
        assert_eq!(session.state.wood, wood);
    }

    #[test]
    fn test_forest_outside_reach_is_ignored() {
        let mut session = cleared_session();
        plant(&mut session, 9, 0, 80.0);
        let wood = session.state.wood;
        run(&mut session);
        assert_eq!(session.state.wood, wood);
        assert_eq!(session.world.get(9, 0).forest_health, 80.0);
    }

    #[test]
    fn test_harvest_wears_every_forest_in_reach() {
        let mut session = cleared_session();
        plant(&mut session, 8, 8, 80.0);
        plant(&mut session, -8, -3, 50.0);
        let wood = session.state.wood;
        run(&mut session);
        assert!((session.state.wood - (wood + 0.5)).abs() < 1e-9);
        assert!((session.world.get(8, 8).forest_health - 79.9).abs() < 1e-9);
        assert!((session.world.get(-8, -3).forest_health - 49.9).abs() < 1e-9);
    }

    #[test]
    fn test_level_scales_output() {
        let mut session = cleared_session();
        plant(&mut session, 1, 1, 80.0);
        session.economy.get_mut(TileCoord::new(0, 0)).unwrap().level = 4;
        let wood = session.state.wood;
        run(&mut session);
        assert!((session.state.wood - (wood + 2.0)).abs() < 1e-9);
    }

    #[test]
    fn test_exhausted_tile_clears_and_stops_its_row() {
        let mut session = cleared_session();
        plant(&mut session, -2, 1, 0.05);
        plant(&mut session, 3, 1, 60.0);
        plant(&mut session, 3, 2, 60.0);
        run(&mut session);

        let cleared = session.world.get(-2, 1).clone();
        assert!(!cleared.is_forest);
        // same row, after the cleared tile: skipped this tick
        assert_eq!(session.world.get(3, 1).forest_health, 60.0);
        // next row is scanned as usual
        assert!((session.world.get(3, 2).forest_health - 59.9).abs() < 1e-9);
    }
}
