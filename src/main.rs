use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use homestead::{
    engine::{EngineBuilder, EngineSettings},
    persist::{load_session, save_to_path},
    scenario::{Scenario, ScenarioLoader, DEFAULT_TICKS},
    StructureType,
};

const DEFAULT_SCENARIO: &str = "scenarios/frontier.yaml";

/// `kind:x:y`, e.g. `house:3:-4`.
#[derive(Debug, Clone)]
struct BuildCommand {
    kind: StructureType,
    x: i32,
    y: i32,
}

impl FromStr for BuildCommand {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.split(':');
        let (Some(kind), Some(x), Some(y), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            anyhow::bail!("expected kind:x:y, got '{s}'");
        };
        Ok(Self {
            kind: kind.parse()?,
            x: x.trim().parse().with_context(|| format!("bad x in '{s}'"))?,
            y: y.trim().parse().with_context(|| format!("bad y in '{s}'"))?,
        })
    }
}

#[derive(Debug, Parser)]
#[command(author, version, about = "Homestead settlement simulation runner")]
struct Cli {
    /// Path to the scenario YAML file (scenarios/frontier.yaml unless resuming)
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Continue from a save file instead of starting the scenario fresh
    #[arg(long)]
    resume: Option<PathBuf>,

    /// Override tick count (uses scenario default when omitted)
    #[arg(long)]
    ticks: Option<u64>,

    /// Override autosave interval in ticks (0 disables)
    #[arg(long)]
    snapshot_interval: Option<u64>,

    /// Directory for autosaves
    #[arg(long)]
    snapshot_dir: Option<PathBuf>,

    /// Extra structures to place before running, as kind:x:y
    #[arg(long = "build")]
    builds: Vec<BuildCommand>,

    /// Write the final state to this save file
    #[arg(long)]
    save: Option<PathBuf>,

    /// Log filter (overrides the scenario's logging level; RUST_LOG wins over both)
    #[arg(long)]
    log_level: Option<String>,
}

/// Scenario to run. A resumed save only reads one when `--scenario` is given.
fn select_scenario(cli: &Cli, loader: &ScenarioLoader) -> Result<Option<Scenario>> {
    match (&cli.scenario, &cli.resume) {
        (Some(path), _) => loader.load(path).map(Some),
        (None, Some(_)) => Ok(None),
        (None, None) => loader.load(DEFAULT_SCENARIO).map(Some),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let loader = ScenarioLoader::new(".");
    let scenario = select_scenario(&cli, &loader)?;

    let level = cli
        .log_level
        .clone()
        .or_else(|| scenario.as_ref().map(|s| s.logging.level.clone()))
        .unwrap_or_else(|| "info".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let (mut session, scenario_name) = match (&cli.resume, &scenario) {
        (Some(path), _) => load_session(path)?,
        (None, Some(scenario)) => (scenario.build_session(), scenario.name.clone()),
        (None, None) => anyhow::bail!("no scenario to run"),
    };
    for command in &cli.builds {
        let _ = session.build(command.x, command.y, command.kind);
    }

    let ticks = match &scenario {
        Some(scenario) => scenario.ticks(cli.ticks),
        None => cli.ticks.unwrap_or(DEFAULT_TICKS),
    };
    let settings = EngineSettings {
        scenario_name: scenario_name.clone(),
        snapshot_interval_ticks: cli
            .snapshot_interval
            .or_else(|| scenario.as_ref().map(|s| s.snapshot_interval_ticks))
            .unwrap_or(0),
        snapshot_dir: cli
            .snapshot_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("snapshots")),
    };
    let mut engine = EngineBuilder::standard(settings).build();
    tracing::info!(scenario = %scenario_name, seed = session.world.seed(), ticks, "starting run");
    engine.run(&mut session, ticks)?;

    if let Some(path) = &cli.save {
        save_to_path(&session.to_save(&scenario_name), path)?;
        tracing::info!(path = %path.display(), "saved");
    }

    let summary = session.snapshot();
    println!(
        "Scenario '{}' reached tick {}. Population {} ({} employed), money {:.1}, food {:.1}, wood {:.1}, {} structures.",
        scenario_name,
        summary.tick,
        summary.population,
        summary.employed,
        summary.money,
        summary.food,
        summary.wood,
        session.economy.len()
    );
    for message in session.log.iter() {
        println!("  [{:>3}] {:<7} {}", message.tick, message.severity, message.text);
    }
    Ok(())
}
