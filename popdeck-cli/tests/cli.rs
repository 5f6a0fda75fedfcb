//! Integration tests for the popdeck binary
//!
//! Each test lays out a small workspace in a temp directory and drives the
//! CLI end to end: dry runs, file rewrites, in-place rewrites with backups,
//! and the error exits.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const GRID: &str = "\
type: grid
cards:
  - type: vertical-stack
    cards:
      - type: custom:bubble-card
        card_type: pop-up
        name: Saloon
        hash: \"#saloon-popup\"
      - type: entities
        entities:
          - entity: light.saloon
            area: saloon
";

const TEMPLATE: &str = "\
type: vertical-stack
cards:
  - type: custom:bubble-card
    card_type: pop-up
    name: __AREA_NAME__
    hash: __HASH__
  - type: entities
    entities:
      - area: __AREA_ID__
        name: Status
";

const ROOMS: &str = "[\"Saloon\", \"Küche\"]";

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).expect("test file to write");
    path
}

fn popdeck() -> Command {
    Command::cargo_bin("popdeck").expect("binary to build")
}

#[test]
fn dry_run_reports_without_writing() {
    let dir = TempDir::new().unwrap();
    let grid = write(&dir, "grid.deck", GRID);
    let template = write(&dir, "popup.deck", TEMPLATE);
    let rooms = write(&dir, "rooms.json", ROOMS);

    popdeck()
        .arg("--grid-in")
        .arg(&grid)
        .arg("--rooms")
        .arg(&rooms)
        .arg("--template")
        .arg(&template)
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("Saloon: updated at index 0"))
        .stdout(predicate::str::contains("Küche: created at index 1"));

    // the input document is untouched
    assert_eq!(fs::read_to_string(&grid).unwrap(), GRID);
}

#[test]
fn writes_the_rewritten_document() {
    let dir = TempDir::new().unwrap();
    let grid = write(&dir, "grid.deck", GRID);
    let template = write(&dir, "popup.deck", TEMPLATE);
    let rooms = write(&dir, "rooms.json", ROOMS);
    let out = dir.path().join("out.deck");

    popdeck()
        .arg("--grid-in")
        .arg(&grid)
        .arg("--rooms")
        .arg(&rooms)
        .arg("--template")
        .arg(&template)
        .arg("--grid-out")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Küche: created at index 1"));

    let written = fs::read_to_string(&out).unwrap();
    assert!(written.contains("\"#kueche-popup\""));
    assert!(written.contains("name: \"Küche\""));
}

#[test]
fn in_place_rewrite_keeps_a_backup() {
    let dir = TempDir::new().unwrap();
    let grid = write(&dir, "grid.deck", GRID);
    let template = write(&dir, "popup.deck", TEMPLATE);
    let rooms = write(&dir, "rooms.json", ROOMS);

    popdeck()
        .arg("--grid-in")
        .arg(&grid)
        .arg("--rooms")
        .arg(&rooms)
        .arg("--template")
        .arg(&template)
        .arg("--grid-out")
        .arg(&grid)
        .arg("--backup")
        .assert()
        .success()
        .stderr(predicate::str::contains("Created backup at"));

    let backup = fs::read_to_string(format!("{}.bak", grid.display())).unwrap();
    assert_eq!(backup, GRID);
    let rewritten = fs::read_to_string(&grid).unwrap();
    assert!(rewritten.contains("\"#kueche-popup\""));
}

#[test]
fn stdout_mode_prints_the_document() {
    let dir = TempDir::new().unwrap();
    let grid = write(&dir, "grid.deck", GRID);
    let template = write(&dir, "popup.deck", TEMPLATE);
    let rooms = write(&dir, "rooms.json", "[\"Saloon\"]");

    popdeck()
        .arg("--grid-in")
        .arg(&grid)
        .arg("--rooms")
        .arg(&rooms)
        .arg("--template")
        .arg(&template)
        .assert()
        .success()
        .stdout(predicate::str::contains("type: grid"))
        .stderr(predicate::str::contains("Saloon: updated at index 0"));
}

#[test]
fn report_json_emits_machine_readable_reports() {
    let dir = TempDir::new().unwrap();
    let grid = write(&dir, "grid.deck", GRID);
    let template = write(&dir, "popup.deck", TEMPLATE);
    let rooms = write(&dir, "rooms.json", "[\"Saloon\"]");

    popdeck()
        .arg("--grid-in")
        .arg(&grid)
        .arg("--rooms")
        .arg(&rooms)
        .arg("--template")
        .arg(&template)
        .arg("--dry-run")
        .arg("--report-json")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"action\": \"updated\""))
        .stdout(predicate::str::contains("\"area_id\": \"saloon\""));
}

#[test]
fn bad_rooms_payload_exits_with_error() {
    let dir = TempDir::new().unwrap();
    let grid = write(&dir, "grid.deck", GRID);
    let template = write(&dir, "popup.deck", TEMPLATE);
    let rooms = write(&dir, "rooms.json", "{\"not\": \"a list\"}");

    popdeck()
        .arg("--grid-in")
        .arg(&grid)
        .arg("--rooms")
        .arg(&rooms)
        .arg("--template")
        .arg(&template)
        .assert()
        .failure()
        .stderr(predicate::str::contains("JSON array of strings"));

    assert_eq!(fs::read_to_string(&grid).unwrap(), GRID);
}

#[test]
fn unknown_strategy_exits_with_error() {
    let dir = TempDir::new().unwrap();
    let grid = write(&dir, "grid.deck", GRID);
    let template = write(&dir, "popup.deck", TEMPLATE);
    let rooms = write(&dir, "rooms.json", ROOMS);

    popdeck()
        .arg("--grid-in")
        .arg(&grid)
        .arg("--rooms")
        .arg(&rooms)
        .arg("--template")
        .arg(&template)
        .arg("--detect-by")
        .arg("fuzzy")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown detection strategy: fuzzy"));
}

#[test]
fn validate_template_only_accepts_a_complete_template() {
    let dir = TempDir::new().unwrap();
    let template = write(&dir, "popup.deck", TEMPLATE);

    popdeck()
        .arg("--template")
        .arg(&template)
        .arg("--validate-template-only")
        .assert()
        .success()
        .stdout(predicate::str::contains("OK"));
}

#[test]
fn validate_template_only_rejects_missing_placeholders() {
    let dir = TempDir::new().unwrap();
    let template = write(
        &dir,
        "popup.deck",
        "type: vertical-stack\ncards:\n  - type: custom:bubble-card\n    card_type: pop-up\n",
    );

    popdeck()
        .arg("--template")
        .arg(&template)
        .arg("--validate-template-only")
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing placeholders"));
}

#[test]
fn malformed_grid_reports_the_line() {
    let dir = TempDir::new().unwrap();
    let grid = write(&dir, "grid.deck", "type: grid\ncards:\n  - : x\n");
    let template = write(&dir, "popup.deck", TEMPLATE);
    let rooms = write(&dir, "rooms.json", ROOMS);

    popdeck()
        .arg("--grid-in")
        .arg(&grid)
        .arg("--rooms")
        .arg(&rooms)
        .arg("--template")
        .arg(&template)
        .assert()
        .failure()
        .stderr(predicate::str::contains("no resolvable key on line 3"));
}

#[test]
fn config_file_sets_the_defaults() {
    let dir = TempDir::new().unwrap();
    let grid = write(&dir, "grid.deck", GRID);
    let template = write(&dir, "popup.deck", TEMPLATE);
    let rooms = write(&dir, "rooms.json", "[\"Saloon\"]");
    let config = write(&dir, "popdeck.toml", "[edit]\nindent = 4\ndetect_by = \"hash\"\ninsert_mode = \"append\"\n");
    let out = dir.path().join("out.deck");

    popdeck()
        .arg("--grid-in")
        .arg(&grid)
        .arg("--rooms")
        .arg(&rooms)
        .arg("--template")
        .arg(&template)
        .arg("--config")
        .arg(&config)
        .arg("--grid-out")
        .arg(&out)
        .assert()
        .success();

    let written = fs::read_to_string(&out).unwrap();
    // four-space indentation from the config file
    assert!(written.contains("\n    - type: vertical-stack"));
}
