use anyhow::Result;

use crate::{
    economy::{Ore, StructureKind, StructureType},
    engine::{System, SystemContext},
    session::Session,
    state::Severity,
    world::{Resources, TileCoord, World},
};

const MINING_RADIUS: i32 = 4;
const UPGRADE_THRESHOLD: f64 = 100.0;

/// Mines draw on deposits around them and climb the ore ladder. Deposits on
/// the map are read, never depleted.
pub struct MiningSystem;

impl MiningSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MiningSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for MiningSystem {
    fn name(&self) -> &str {
        "mining"
    }

    fn run(&mut self, _ctx: &SystemContext, session: &mut Session) -> Result<()> {
        for coord in session.economy.coords_of(StructureType::Mine) {
            let deposits = deposits_in_reach(&mut session.world, coord);
            let Some(mine) = session.economy.get_mut(coord) else {
                continue;
            };
            let StructureKind::Mine {
                resource_level,
                extracted_amount,
            } = &mut mine.kind
            else {
                continue;
            };

            let tier = *resource_level;
            let available = match tier {
                Ore::Stone => deposits.stone,
                Ore::Iron => deposits.iron,
                Ore::Uranium => deposits.uranium,
            };
            if available <= 0.0 {
                continue;
            }
            let mined = tier.extraction_rate().min(available);
            session.state.wood += mined * tier.wood_value();
            *extracted_amount += mined;

            let mut upgraded = None;
            if let Some(next) = tier.next_tier() {
                if *extracted_amount >= UPGRADE_THRESHOLD {
                    *resource_level = next;
                    *extracted_amount = 0.0;
                    upgraded = Some(next);
                }
            }
            if let Some(next) = upgraded {
                session.add_message(
                    Severity::Success,
                    format!("Mine at {coord} struck {next}"),
                );
            }
        }
        Ok(())
    }
}

fn deposits_in_reach(world: &mut World, centre: TileCoord) -> Resources {
    let mut total = Resources::default();
    for dy in -MINING_RADIUS..=MINING_RADIUS {
        for dx in -MINING_RADIUS..=MINING_RADIUS {
            let at = centre.offset(dx, dy);
            total.accumulate(&world.get(at.x, at.y).resources);
        }
    }
    total
}
