use matchbox_menace::{
    adapters::{JsonRepository, MsgPackRepository, repository_for_path},
    menace::{
        Engine, InitialBeadSchedule, RandomOpponent, ReinforcementValues, SavedMatchbox,
        SavedStore,
    },
    ports::{StoreRepository, rng_from_seed},
    tictactoe::Player,
};
use tempfile::TempDir;

fn trained_engine(games: usize) -> Engine {
    let mut engine = Engine::seeded(
        Player::O,
        InitialBeadSchedule::michie(),
        ReinforcementValues::new(3, 1, -1),
        Some(42),
    );
    let mut opponent = RandomOpponent::from_seed(Some(43));
    for _ in 0..games {
        engine.play_game(&mut opponent).unwrap();
    }
    engine
}

fn assert_same_store(left: &Engine, right: &Engine) {
    assert_eq!(left.store().len(), right.store().len());
    for matchbox in left.store().iter() {
        assert_eq!(right.store().get(matchbox.state()), Some(matchbox));
    }
}

#[test]
fn msgpack_round_trip_keeps_every_bead() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("engine.msgpack");
    let engine = trained_engine(300);

    MsgPackRepository
        .save(&SavedStore::from_engine(&engine), &path)
        .unwrap();
    let saved = MsgPackRepository.load(&path).unwrap();
    let restored = Engine::from_saved(&saved, rng_from_seed(Some(1))).unwrap();

    assert_same_store(&engine, &restored);
    assert_eq!(restored.games_played(), 300);
    assert_eq!(*restored.reinforcement(), ReinforcementValues::new(3, 1, -1));
    assert_eq!(*restored.store().schedule(), InitialBeadSchedule::michie());
}

#[test]
fn json_round_trip_keeps_every_bead() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("engine.json");
    let engine = trained_engine(300);

    let repo = repository_for_path(&path);
    repo.save(&SavedStore::from_engine(&engine), &path).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("\"matchboxes\""));

    let restored = Engine::from_saved(&repo.load(&path).unwrap(), rng_from_seed(None)).unwrap();
    assert_same_store(&engine, &restored);
}

#[test]
fn resumed_engine_keeps_learning() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("engine.msgpack");
    let engine = trained_engine(50);
    MsgPackRepository
        .save(&SavedStore::from_engine(&engine), &path)
        .unwrap();

    let saved = MsgPackRepository.load(&path).unwrap();
    let mut resumed = Engine::from_saved(&saved, rng_from_seed(Some(7))).unwrap();
    let mut opponent = RandomOpponent::from_seed(Some(8));
    for _ in 0..50 {
        resumed.play_game(&mut opponent).unwrap();
    }
    assert_eq!(resumed.games_played(), 100);
    assert!(resumed.store().len() >= engine.store().len());
}

#[test]
fn snapshot_with_wrong_version_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("engine.json");
    let mut saved = SavedStore::from_engine(&trained_engine(10));
    saved.version = 99;
    std::fs::write(&path, serde_json::to_string(&saved).unwrap()).unwrap();

    assert!(matches!(
        JsonRepository.load(&path),
        Err(matchbox_menace::Error::UnsupportedSnapshotVersion { found: 99, .. })
    ));
}

#[test]
fn snapshot_with_empty_move_is_rejected() {
    let mut saved = SavedStore::from_engine(&trained_engine(10));
    saved.matchboxes.push(SavedMatchbox {
        state: "....X....".to_string(),
        initial: 3,
        beads: [0, 1, 2, 3, 5, 6, 7, 8]
            .into_iter()
            .map(|pos| (pos, if pos == 0 { 0 } else { 3 }))
            .collect(),
    });
    assert!(Engine::from_saved(&saved, rng_from_seed(Some(1))).is_err());
}

#[test]
fn corrupt_file_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("engine.msgpack");
    std::fs::write(&path, b"not a snapshot").unwrap();
    assert!(MsgPackRepository.load(&path).is_err());
}
