use homestead::{
    economy::{Ore, StructureKind, StructureType},
    engine::{EngineBuilder, EngineSettings},
    persist::load_session,
    scenario::{Scenario, ScenarioLoader},
};
use tempfile::tempdir;

fn frontier() -> Scenario {
    ScenarioLoader::new(env!("CARGO_MANIFEST_DIR"))
        .load("scenarios/frontier.yaml")
        .unwrap()
}

#[test]
fn frontier_places_every_build_order() {
    let scenario = frontier();
    assert_eq!(scenario.name, "frontier");
    assert_eq!(scenario.ticks(None), 120);

    let session = scenario.build_session();
    for kind in StructureType::ALL {
        assert_eq!(session.economy.count(kind), 1, "{kind}");
    }
    assert_eq!(session.state.money, 250.0);
    assert_eq!(session.state.wood, 40.0);
    assert_eq!(session.state.food, 70.0);
    assert_eq!(session.economy.total_housing(), 5);
}

#[test]
fn frontier_runs_are_reproducible() {
    let scenario = frontier();
    let run = || {
        let mut session = scenario.build_session();
        let mut engine = EngineBuilder::standard(EngineSettings::headless("frontier")).build();
        let mut trail = Vec::new();
        engine
            .run_with_hook(&mut session, 120, |snapshot| {
                trail.push((snapshot.tick, snapshot.money.to_bits(), snapshot.wood.to_bits()))
            })
            .unwrap();
        (session, trail)
    };
    let (a, trail_a) = run();
    let (b, trail_b) = run();
    assert_eq!(trail_a, trail_b);
    assert_eq!(a.state, b.state);
    assert_eq!(a.economy.list_structures(), b.economy.list_structures());

    let ticks: Vec<u64> = trail_a.iter().map(|(tick, _, _)| *tick).collect();
    assert_eq!(ticks, (1..=120).collect::<Vec<_>>());
}

#[test]
fn frontier_long_run_shape() {
    let scenario = frontier();
    let mut session = scenario.build_session();
    EngineBuilder::standard(EngineSettings::headless("frontier"))
        .build()
        .run(&mut session, 120)
        .unwrap();

    assert_eq!(session.state.time, 120);
    // one farm netting 9 per tick
    assert_eq!(session.state.money, 250.0 + 9.0 * 120.0);
    assert!(session.state.wood > 40.0);
    assert!(session.state.food >= 0.0);
    assert!(session.state.population <= 10);

    let mine = session
        .economy
        .structures()
        .iter()
        .find(|s| s.structure_type() == StructureType::Mine)
        .unwrap();
    assert!(matches!(
        mine.kind,
        StructureKind::Mine {
            resource_level: Ore::Iron,
            ..
        }
    ));
}

#[test]
fn autosaves_land_on_the_interval() {
    let dir = tempdir().unwrap();
    let scenario = frontier();
    let mut session = scenario.build_session();
    let settings = EngineSettings {
        scenario_name: scenario.name.clone(),
        snapshot_interval_ticks: 10,
        snapshot_dir: dir.path().to_path_buf(),
    };
    let mut engine = EngineBuilder::standard(settings).build();

    let mut written = Vec::new();
    for _ in 0..25 {
        if let Some(path) = engine.tick(&mut session).unwrap().snapshot_path {
            written.push(path);
        }
    }
    let frontier_dir = dir.path().join("frontier");
    assert_eq!(
        written,
        vec![
            frontier_dir.join("tick_000010.json"),
            frontier_dir.join("tick_000020.json"),
        ]
    );

    let (restored, name) = load_session(&written[0]).unwrap();
    assert_eq!(name, "frontier");
    assert_eq!(restored.state.time, 10);
}
