use anyhow::Result;

use crate::{
    engine::{System, SystemContext},
    session::Session,
    state::Severity,
};

const FOOD_PER_CITIZEN: f64 = 0.5;
const FOOD_DEFICIT_PER_LEAVER: f64 = 5.0;

/// Citizens eat. The stock may dip below zero until starvation resolves it.
pub struct ConsumptionSystem;

impl ConsumptionSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ConsumptionSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for ConsumptionSystem {
    fn name(&self) -> &str {
        "consumption"
    }

    fn run(&mut self, _ctx: &SystemContext, session: &mut Session) -> Result<()> {
        session.state.food -= session.state.population as f64 * FOOD_PER_CITIZEN;
        Ok(())
    }
}

/// Emigration driven by an unpaid food deficit.
pub struct StarvationSystem;

impl StarvationSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for StarvationSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for StarvationSystem {
    fn name(&self) -> &str {
        "starvation"
    }

    fn run(&mut self, _ctx: &SystemContext, session: &mut Session) -> Result<()> {
        let state = &mut session.state;
        if state.food >= 0.0 {
            return Ok(());
        }
        let leavers = (-state.food / FOOD_DEFICIT_PER_LEAVER).ceil() as u64;
        state.population -= leavers.min(state.population);
        state.food = 0.0;
        if leavers > 0 {
            session.add_message(
                Severity::Warning,
                format!("Food shortage! {leavers} citizens left the settlement"),
            );
        }
        Ok(())
    }
}
