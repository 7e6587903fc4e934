use homestead::{
    engine::{EngineBuilder, EngineSettings},
    persist::{load_from_path, load_session, save_to_path, RestoreError, SAVE_FORMAT_VERSION},
    scenario::ScenarioLoader,
    Session,
};
use tempfile::tempdir;

fn frontier_after(ticks: u64) -> Session {
    let scenario = ScenarioLoader::new(env!("CARGO_MANIFEST_DIR"))
        .load("scenarios/frontier.yaml")
        .unwrap();
    let mut session = scenario.build_session();
    EngineBuilder::standard(EngineSettings::headless("frontier"))
        .build()
        .run(&mut session, ticks)
        .unwrap();
    session
}

fn assert_same(a: &Session, b: &Session) {
    assert_eq!(a.state, b.state);
    assert_eq!(a.economy.list_structures(), b.economy.list_structures());
    let tiles_a: Vec<_> = a.world.sorted_tiles().into_iter().cloned().collect();
    let tiles_b: Vec<_> = b.world.sorted_tiles().into_iter().cloned().collect();
    assert_eq!(tiles_a, tiles_b);
}

#[test]
fn saved_session_resumes_identically() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("frontier.json");
    let mut original = frontier_after(30);
    save_to_path(&original.to_save("frontier"), &path).unwrap();

    let (mut restored, scenario) = load_session(&path).unwrap();
    assert_eq!(scenario, "frontier");
    assert_same(&original, &restored);

    let mut engine = EngineBuilder::standard(EngineSettings::headless("frontier")).build();
    engine.run(&mut original, 25).unwrap();
    engine.run(&mut restored, 25).unwrap();
    assert_same(&original, &restored);
}

#[test]
fn tile_tags_follow_the_structure_list() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tags.json");
    let session = frontier_after(1);
    save_to_path(&session.to_save("frontier"), &path).unwrap();

    let (restored, _) = load_session(&path).unwrap();
    let tagged = restored
        .world
        .tiles()
        .filter(|tile| tile.structure.is_some())
        .count();
    assert_eq!(tagged, restored.economy.len());
    for structure in restored.economy.structures() {
        let tile = restored.world.peek(structure.x, structure.y).unwrap();
        assert_eq!(tile.structure, Some(structure.structure_type()));
    }
}

#[test]
fn future_format_is_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("future.json");
    let mut save = frontier_after(0).to_save("frontier");
    save.format_version = SAVE_FORMAT_VERSION + 1;
    save_to_path(&save, &path).unwrap();

    let save = load_from_path(&path).unwrap();
    assert_eq!(
        Session::from_save(save).unwrap_err(),
        RestoreError::UnsupportedVersion {
            found: SAVE_FORMAT_VERSION + 1,
            expected: SAVE_FORMAT_VERSION,
        }
    );
    assert!(load_session(&path).is_err());
}

#[test]
fn garbage_file_is_an_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("garbage.json");
    std::fs::write(&path, "{ not json").unwrap();
    assert!(load_from_path(&path).is_err());
    assert!(load_session(dir.path().join("missing.json")).is_err());
}
