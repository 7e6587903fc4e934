use anyhow::Result;

use crate::{
    engine::{System, SystemContext},
    session::Session,
    state::Severity,
};

const UNEMPLOYMENT_ALARM: f64 = 0.3;

/// Reports on joblessness. Purely informational: nothing here assigns jobs
/// or touches the economy.
///
/// The alarm belongs to the engine, not the session, so a fresh engine (for
/// example after loading a save, whose log starts empty) reports an ongoing
/// episode once more.
#[derive(Default)]
pub struct CensusSystem {
    alarm_raised: bool,
}

impl CensusSystem {
    pub fn new() -> Self {
        Self::default()
    }
}

impl System for CensusSystem {
    fn name(&self) -> &str {
        "census"
    }

    fn run(&mut self, _ctx: &SystemContext, session: &mut Session) -> Result<()> {
        let rate = session.state.unemployment_rate();
        if rate > UNEMPLOYMENT_ALARM {
            if !self.alarm_raised {
                self.alarm_raised = true;
                session.add_message(
                    Severity::Warning,
                    format!("High unemployment: {:.0}% of citizens have no work", rate * 100.0),
                );
            }
        } else {
            self.alarm_raised = false;
        }
        Ok(())
    }
}
