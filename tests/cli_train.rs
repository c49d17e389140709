use clap::Parser;
use matchbox_menace::cli::commands::{
    inspect::{self, InspectArgs},
    train::{TrainArgs, execute, parse_game_count},
};
use tempfile::tempdir;

fn parse_args<I, T>(args: I) -> TrainArgs
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    TrainArgs::parse_from(args)
}

#[test]
fn summary_reports_every_game() {
    let tmp = tempdir().unwrap();
    let summary = tmp.path().join("run_overview");

    let args = parse_args([
        "menace-train",
        "--games",
        "250",
        "--block-size",
        "100",
        "--seed",
        "3",
        "--no-progress",
        "--summary",
        summary.to_str().unwrap(),
    ]);
    execute(args).expect("training with summary should succeed");

    let expected_path = summary.with_extension("json");
    let contents = std::fs::read_to_string(&expected_path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(parsed["games"], 250);
    assert_eq!(parsed["opponent"], "random");
    assert_eq!(parsed["engine"]["seat"], "O");
    assert_eq!(parsed["report"]["blocks"].as_array().unwrap().len(), 3);
    assert_eq!(parsed["metrics"]["total_games"], 250);

    let total = &parsed["report"]["total"];
    let games = total["engine_wins"].as_u64().unwrap()
        + total["engine_losses"].as_u64().unwrap()
        + total["draws"].as_u64().unwrap();
    assert_eq!(games, 250);
}

#[test]
fn save_then_resume_and_inspect() {
    let tmp = tempdir().unwrap();
    let store = tmp.path().join("engine.json");
    let observations = tmp.path().join("games.jsonl");
    let summary = tmp.path().join("resumed.json");

    execute(parse_args([
        "menace-train",
        "--games",
        "20",
        "--seed",
        "9",
        "--no-progress",
        "--reward",
        "3,1,-1",
        "--save",
        store.to_str().unwrap(),
        "--observations",
        observations.to_str().unwrap(),
    ]))
    .unwrap();
    assert!(store.exists());
    let lines = std::fs::read_to_string(&observations).unwrap();
    assert_eq!(lines.lines().count(), 20);

    execute(parse_args([
        "menace-train",
        "--games",
        "5",
        "--no-progress",
        "--load",
        store.to_str().unwrap(),
        "--summary",
        summary.to_str().unwrap(),
    ]))
    .unwrap();
    let parsed: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&summary).unwrap()).unwrap();
    assert_eq!(parsed["games_played"], 25);
    assert_eq!(parsed["engine"]["reinforcement"]["win"], 3);

    inspect::execute(InspectArgs {
        store: store.clone(),
        board: Some("X........".to_string()),
    })
    .unwrap();
    assert!(
        inspect::execute(InspectArgs {
            store,
            board: Some("XO.......".to_string()),
        })
        .is_err()
    );
}

#[test]
fn seat_conflicting_with_loaded_store_fails() {
    let tmp = tempdir().unwrap();
    let store = tmp.path().join("engine.msgpack");
    execute(parse_args([
        "menace-train",
        "--games",
        "3",
        "--no-progress",
        "--save",
        store.to_str().unwrap(),
    ]))
    .unwrap();

    let result = execute(parse_args([
        "menace-train",
        "--games",
        "3",
        "--no-progress",
        "--seat",
        "x",
        "--load",
        store.to_str().unwrap(),
    ]));
    assert!(result.is_err());
}

#[test]
fn reward_and_load_cannot_be_combined() {
    let result = TrainArgs::try_parse_from([
        "menace-train",
        "--reward",
        "1,0,-1",
        "--load",
        "engine.msgpack",
    ]);
    assert!(result.is_err());
}

#[test]
fn game_count_parsing() {
    assert_eq!(parse_game_count("0").unwrap(), 0);
    assert_eq!(parse_game_count(" 12 ").unwrap(), 12);
    assert!(parse_game_count("-3").is_err());
    assert!(parse_game_count("abc").is_err());
    assert!(parse_game_count("").is_err());
}
