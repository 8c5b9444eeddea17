use clap::Parser;
use seatmarket_cli::cli::Cli;
use seatmarket_cli::{run, run_session};
use seatmarket_core::{Density, SeatError};
use seatmarket_store::{JsonFileStore, KeyValueStore, MemoryStore, SeatStore};
use std::fs;
use tempfile::tempdir;

fn exec<S: KeyValueStore>(store: &mut SeatStore<S>, args: &[&str]) -> anyhow::Result<String> {
    let mut argv = vec!["seat-market"];
    argv.extend_from_slice(args);
    let cli = Cli::try_parse_from(argv)?;

    let mut out = Vec::new();
    run(cli.command, store, &mut out)?;
    Ok(String::from_utf8(out)?)
}

fn seat_error(err: anyhow::Error) -> SeatError {
    err.downcast::<SeatError>().expect("seat error")
}

#[test]
fn set_then_show() {
    let mut store = SeatStore::open(MemoryStore::new());
    let line = exec(&mut store, &["set", "2b1", "tenant", "Minji"]).unwrap();
    assert!(line.starts_with("2B1  rented"));

    let detail = exec(&mut store, &["show", "2B1"]).unwrap();
    assert!(detail.contains("tenant    Minji"));
    assert!(detail.contains("tenant → Minji"));
}

#[test]
fn unknown_label_is_reported() {
    let mut store = SeatStore::open(MemoryStore::new());
    let err = exec(&mut store, &["show", "4A1"]).unwrap_err();
    assert_eq!(seat_error(err), SeatError::SeatNotFound("4A1".to_string()));

    let err = exec(&mut store, &["set", "9Z9", "owner", "x"]).unwrap_err();
    assert_eq!(seat_error(err).code(), "SEAT_NOT_FOUND");
}

#[test]
fn invalid_amount_leaves_board_unchanged() {
    let mut store = SeatStore::open(MemoryStore::new());
    let before = store.seats().clone();

    let err = exec(&mut store, &["set", "1A1", "price", "-5"]).unwrap_err();
    assert_eq!(seat_error(err).code(), "INVALID_AMOUNT");
    assert_eq!(store.seats(), &before);
}

#[test]
fn locked_board_needs_pin() {
    let mut store = SeatStore::open(MemoryStore::new());
    exec(&mut store, &["settings", "--pin", "2468", "--locked", "true"]).unwrap();

    let err = exec(&mut store, &["set", "1A1", "owner", "Doyun"]).unwrap_err();
    assert_eq!(seat_error(err), SeatError::IncorrectPin);

    exec(&mut store, &["set", "1A1", "owner", "Doyun", "--pin", "2468"]).unwrap();
    assert_eq!(store.seats().get(1).unwrap().owner, "Doyun");
}

#[test]
fn list_filters_and_sorts() {
    let mut store = SeatStore::open(MemoryStore::new());
    exec(&mut store, &["set", "1A1", "price", "100"]).unwrap();
    exec(&mut store, &["set", "1A2", "price", "300"]).unwrap();

    let text = exec(&mut store, &["list", "--query", "1a", "--sort", "priceDesc"]).unwrap();
    let labels: Vec<&str> = text
        .lines()
        .map(|line| line.split_whitespace().next().unwrap())
        .collect();
    assert_eq!(labels, vec!["1A2", "1A1"]);

    assert_eq!(exec(&mut store, &["list"]).unwrap().lines().count(), 24);
}

#[test]
fn reset_requires_confirmation() {
    let mut store = SeatStore::open(MemoryStore::new());
    exec(&mut store, &["set", "3C1", "owner", "Seojun"]).unwrap();

    let err = exec(&mut store, &["reset"]).unwrap_err();
    assert_eq!(seat_error(err), SeatError::ConfirmationRequired);
    assert_eq!(store.seats().get(21).unwrap().owner, "Seojun");

    exec(&mut store, &["reset", "--yes"]).unwrap();
    assert!(store.seats().iter().all(|s| s.owner.is_empty()));

    let undone = exec(&mut store, &["undo"]).unwrap();
    assert!(undone.starts_with("Undid: "));
    assert_eq!(store.seats().get(21).unwrap().owner, "Seojun");
}

fn session<S: KeyValueStore>(store: &mut SeatStore<S>, script: &str) -> String {
    let mut out = Vec::new();
    run_session(store, script.as_bytes(), &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn session_undoes_an_edit() {
    let mut store = SeatStore::open(MemoryStore::new());
    let out = session(&mut store, "set 1A1 owner Mina\nundo\nshow 1A1\n");

    assert!(out.contains("Undid: Update seat 1: owner → Mina"));
    assert!(out.contains("  owner     -"));
    assert_eq!(store.seats().get(1).unwrap().owner, "");
    assert!(!store.can_undo());
}

#[test]
fn session_undoes_reset_and_import_in_order() {
    let dir = tempdir().unwrap();
    let export_path = dir.path().join("other.json");
    let mut other = SeatStore::open(MemoryStore::new());
    exec(&mut other, &["set", "3D2", "tenant", "Imported"]).unwrap();
    fs::write(&export_path, exec(&mut other, &["export"]).unwrap()).unwrap();

    let path = dir.path().join("board.json");
    let mut store = SeatStore::open(JsonFileStore::open(&path));
    let script = format!(
        "set 2A1 tenant \"Kim Minji\"\nreset --yes\nimport {}\nundo\nundo\n",
        export_path.display()
    );
    let out = session(&mut store, &script);

    assert_eq!(out.matches("Undid: ").count(), 2);
    assert_eq!(store.seats().get(9).unwrap().tenant, "Kim Minji");
    assert_eq!(store.seats().get(24).unwrap().tenant, "");

    // Undo is written through, so the file matches the session
    let reopened = SeatStore::open(JsonFileStore::open(&path));
    assert_eq!(reopened.seats(), store.seats());
}

#[test]
fn session_reports_errors_and_keeps_going() {
    let mut store = SeatStore::open(MemoryStore::new());
    let script = "# warm up\n\nset 9Z9 owner x\nlist --sort cheapest\nshell\nimport -\nset 1A2 price \"\nset 1A2 price 500\nexit\nset 1A2 price 900\n";
    let out = session(&mut store, script);

    assert!(out.contains("Error: Seat not found: 9Z9"));
    assert!(out.contains("cheapest"));
    assert!(out.contains("Error: already in a session"));
    assert!(out.contains("Error: stdin is the session input"));
    assert!(out.contains("Error: Unclosed \" quote"));
    assert_eq!(store.seats().get(2).unwrap().price, 500.0);
    assert_eq!(store.undo_count(), 1);
}

#[test]
fn session_rejects_data_override() {
    let mut store = SeatStore::open(MemoryStore::new());
    let out = session(&mut store, "--data elsewhere.json set 1A1 owner x\n");
    assert!(out.contains("cannot change during a session"));
    assert_eq!(store.seats().get(1).unwrap().owner, "");
}

#[test]
fn undo_history_ends_with_the_process() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("board.json");

    let mut store = SeatStore::open(JsonFileStore::open(&path));
    exec(&mut store, &["set", "1B2", "rentFee", "7000"]).unwrap();

    let mut store = SeatStore::open(JsonFileStore::open(&path));
    assert_eq!(store.seats().get(4).unwrap().rent_fee, 7000.0);
    let err = exec(&mut store, &["undo"]).unwrap_err();
    assert_eq!(seat_error(err), SeatError::NothingToUndo);
}

#[test]
fn export_then_import_from_file() {
    let dir = tempdir().unwrap();
    let export_path = dir.path().join("export.json");

    let mut store = SeatStore::open(MemoryStore::new());
    exec(&mut store, &["set", "2D2", "price", "88000"]).unwrap();
    let exported = exec(&mut store, &["export"]).unwrap();
    fs::write(&export_path, &exported).unwrap();
    let snapshot = store.seats().clone();

    let mut other = SeatStore::open(MemoryStore::new());
    let msg = exec(&mut other, &["import", export_path.to_str().unwrap()]).unwrap();
    assert_eq!(msg.trim(), "Imported 24 seats");
    assert_eq!(other.seats(), &snapshot);
}

#[test]
fn import_rejects_bad_payloads() {
    let dir = tempdir().unwrap();
    let short = dir.path().join("short.json");
    fs::write(&short, "[{}, {}]").unwrap();

    let mut store = SeatStore::open(MemoryStore::new());
    let err = exec(&mut store, &["import", short.to_str().unwrap()]).unwrap_err();
    assert_eq!(seat_error(err).code(), "FORMAT_ERROR");

    let missing = dir.path().join("missing.json");
    let err = exec(&mut store, &["import", missing.to_str().unwrap()]).unwrap_err();
    assert!(err.to_string().starts_with("Failed to read"));
    assert!(!store.can_undo());
}

#[test]
fn pin_is_stored_as_typed() {
    let mut store = SeatStore::open(MemoryStore::new());
    exec(&mut store, &["settings", "--pin", " 12"]).unwrap();
    assert_eq!(store.settings().pin, " 12");

    let err = exec(&mut store, &["set", "1A1", "owner", "x", "--pin", "12"]).unwrap_err();
    assert_eq!(seat_error(err), SeatError::IncorrectPin);
    exec(&mut store, &["set", "1A1", "owner", "x", "--pin", " 12"]).unwrap();
}

#[test]
fn export_is_a_json_array_of_seats() {
    let mut store = SeatStore::open(MemoryStore::new());
    exec(&mut store, &["set", "1D1", "rentFee", "2500"]).unwrap();

    let exported: serde_json::Value =
        serde_json::from_str(&exec(&mut store, &["export"]).unwrap()).unwrap();
    let seats = exported.as_array().unwrap();
    assert_eq!(seats.len(), 24);
    assert_eq!(seats[6]["label"], "1D1");
    assert_eq!(seats[6]["rentFee"], 2500.0);
}

#[test]
fn settings_persist_to_the_data_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("board.json");

    let mut store = SeatStore::open(JsonFileStore::open(&path));
    let shown = exec(
        &mut store,
        &["settings", "--density", "small", "--wrap", "true", "--toggle-board"],
    )
    .unwrap();
    assert!(shown.contains("density  small (78px seats)"));
    assert!(shown.contains("board    bottom"));

    let store = SeatStore::open(JsonFileStore::open(&path));
    assert_eq!(store.settings().density, Density::Small);
    assert!(store.settings().wrap);
    assert!(!store.settings().board_top);

    let raw = fs::read_to_string(&path).unwrap();
    assert!(raw.contains("seat-market-v6"));
}

#[test]
fn board_and_stats_render() {
    let mut store = SeatStore::open(MemoryStore::new());
    exec(&mut store, &["set", "3A1", "price", "1200"]).unwrap();

    let board = exec(&mut store, &["board"]).unwrap();
    assert!(board.lines().next().unwrap().contains("[ BOARD ]"));

    let stats = exec(&mut store, &["stats"]).unwrap();
    assert!(stats.contains("total    1,200원"));
    assert!(stats.contains("3A1 (1,200원)"));
}
