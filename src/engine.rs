use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;

use crate::persist::SnapshotWriter;
use crate::session::{Session, SessionSnapshot};
use crate::systems::{
    CensusSystem, ConsumptionSystem, FarmIncomeSystem, GrowthSystem, LumberSystem, MiningSystem,
    StarvationSystem,
};

pub struct EngineSettings {
    pub scenario_name: String,
    pub snapshot_interval_ticks: u64,
    pub snapshot_dir: PathBuf,
}

impl EngineSettings {
    /// Settings with autosaves disabled.
    pub fn headless(scenario_name: impl Into<String>) -> Self {
        Self {
            scenario_name: scenario_name.into(),
            snapshot_interval_ticks: 0,
            snapshot_dir: PathBuf::from("snapshots"),
        }
    }
}

pub struct EngineBuilder {
    settings: EngineSettings,
    systems: Vec<Box<dyn System>>,
}

impl EngineBuilder {
    pub fn new(settings: EngineSettings) -> Self {
        Self {
            settings,
            systems: Vec::new(),
        }
    }

    /// The full tick pipeline. Stage order matters: later stages read what
    /// earlier ones wrote.
    pub fn standard(settings: EngineSettings) -> Self {
        Self::new(settings)
            .with_system(FarmIncomeSystem::new())
            .with_system(ConsumptionSystem::new())
            .with_system(StarvationSystem::new())
            .with_system(GrowthSystem::new())
            .with_system(LumberSystem::new())
            .with_system(MiningSystem::new())
            .with_system(CensusSystem::new())
    }

    pub fn with_system(mut self, system: impl System + 'static) -> Self {
        self.systems.push(Box::new(system));
        self
    }

    pub fn push_system(&mut self, system: impl System + 'static) {
        self.systems.push(Box::new(system));
    }

    pub fn build(self) -> Engine {
        Engine {
            systems: self.systems,
            snapshot_writer: SnapshotWriter::new(
                &self.settings.snapshot_dir,
                self.settings.snapshot_interval_ticks,
            ),
            settings: self.settings,
        }
    }
}

pub struct Engine {
    systems: Vec<Box<dyn System>>,
    snapshot_writer: SnapshotWriter,
    settings: EngineSettings,
}

impl Engine {
    /// Advance the session by exactly one tick. Autosaves are taken only once
    /// every stage has run and the clock has moved.
    pub fn tick(&mut self, session: &mut Session) -> Result<TickSummary> {
        let ctx = SystemContext {
            tick: session.state.time,
            scenario_name: &self.settings.scenario_name,
        };
        let mut system_reports = Vec::with_capacity(self.systems.len());
        for system in &mut self.systems {
            let start = Instant::now();
            system.run(&ctx, session)?;
            system_reports.push(SystemRunReport {
                name: system.name().to_string(),
                duration_ms: start.elapsed().as_secs_f64() * 1_000.0,
            });
        }
        session.state.time += 1;
        let tick = session.state.time;
        tracing::debug!(
            tick,
            money = session.state.money,
            food = session.state.food,
            wood = session.state.wood,
            population = session.state.population,
            "tick complete"
        );

        let snapshot_path = self
            .snapshot_writer
            .maybe_write(session, &self.settings.scenario_name)?;

        Ok(TickSummary {
            tick,
            system_reports,
            snapshot_path,
        })
    }

    pub fn run(&mut self, session: &mut Session, ticks: u64) -> Result<()> {
        self.run_with_hook(session, ticks, |_| {})
    }

    pub fn run_with_hook<F>(&mut self, session: &mut Session, ticks: u64, mut hook: F) -> Result<()>
    where
        F: FnMut(SessionSnapshot),
    {
        for _ in 0..ticks {
            self.tick(session)?;
            hook(session.snapshot());
        }
        Ok(())
    }

    pub fn scenario_name(&self) -> &str {
        &self.settings.scenario_name
    }

    pub fn system_names(&self) -> Vec<&str> {
        self.systems.iter().map(|system| system.name()).collect()
    }
}

#[derive(Clone, Debug)]
pub struct SystemRunReport {
    pub name: String,
    pub duration_ms: f64,
}

#[derive(Clone, Debug)]
pub struct TickSummary {
    pub tick: u64,
    pub system_reports: Vec<SystemRunReport>,
    pub snapshot_path: Option<PathBuf>,
}

pub struct SystemContext<'a> {
    /// Clock value at the start of the tick.
    pub tick: u64,
    pub scenario_name: &'a str,
}

pub trait System {
    fn name(&self) -> &str;
    fn run(&mut self, ctx: &SystemContext, session: &mut Session) -> Result<()>;
}
