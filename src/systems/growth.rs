use anyhow::Result;

use crate::{
    engine::{System, SystemContext},
    session::Session,
};

const MAX_ARRIVALS_PER_TICK: u64 = 2;
const FOOD_SURPLUS_FOR_GROWTH: f64 = 50.0;

/// Newcomers settle while there is spare housing and a food surplus.
/// Arrivals do not take jobs.
pub struct GrowthSystem;

impl GrowthSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for GrowthSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for GrowthSystem {
    fn name(&self) -> &str {
        "growth"
    }

    fn run(&mut self, _ctx: &SystemContext, session: &mut Session) -> Result<()> {
        let capacity = session.economy.total_housing();
        let state = &mut session.state;
        if state.population < capacity && state.food > FOOD_SURPLUS_FOR_GROWTH {
            state.population += MAX_ARRIVALS_PER_TICK.min(capacity - state.population);
        }
        Ok(())
    }
}
