use anyhow::Result;

use crate::{
    economy::{StructureKind, StructureType},
    engine::{System, SystemContext},
    session::Session,
    state::Severity,
};

const GROSS_FARM_INCOME: f64 = 10.0;

/// Farm income and bankruptcy.
pub struct FarmIncomeSystem;

impl FarmIncomeSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FarmIncomeSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for FarmIncomeSystem {
    fn name(&self) -> &str {
        "farm_income"
    }

    fn run(&mut self, _ctx: &SystemContext, session: &mut Session) -> Result<()> {
        let net_income = GROSS_FARM_INCOME - GROSS_FARM_INCOME * session.state.income_tax_rate;
        for coord in session.economy.coords_of(StructureType::Farm) {
            if net_income <= 0.0 {
                session.economy.destroy(&mut session.world, coord.x, coord.y);
                session.add_message(
                    Severity::Warning,
                    format!("Farm at {coord} went bankrupt and was abandoned"),
                );
                continue;
            }
            session.state.money += net_income;
            if let Some(farm) = session.economy.get_mut(coord) {
                let level = farm.level;
                // Output is tracked but not yet credited to the food stock.
                if let StructureKind::Farm { food_per_tick } = &mut farm.kind {
                    *food_per_tick = 1.0 + 0.5 * (level as f64 - 1.0);
                }
            }
        }
        Ok(())
    }
}
