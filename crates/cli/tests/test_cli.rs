use assert_cmd::prelude::*;
use predicates::prelude::*;
use serde_json::Value;
use std::process::Command;
use tempfile::TempDir;

fn cmd_in(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("personnel").unwrap();
    cmd.current_dir(home.path());
    cmd.env("HOME", home.path());
    cmd.env("XDG_CONFIG_HOME", home.path().join(".config"));
    cmd.env("PERSONNEL_DB_PATH", home.path().join("personnel.db"));
    cmd.env("PERSONNEL_LOG_LEVEL", "error");
    cmd.env_remove("RUST_LOG");
    cmd
}

fn json_of(home: &TempDir, args: &[&str]) -> Value {
    let output = cmd_in(home).arg("--json").args(args).output().unwrap();
    assert!(output.status.success(), "{args:?} failed: {output:?}");
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn unit_tree_and_delete_guard() {
    let home = TempDir::new().expect("temp home");

    let hq = json_of(&home, &["unit", "create", "--name", "HQ", "--roles", "Commander, Deputy"]);
    let hq_id = hq["id"].as_i64().unwrap().to_string();
    json_of(
        &home,
        &["unit", "create", "--name", "Patrol", "--parent", &hq_id, "--roles", "Officer"],
    );

    let tree = json_of(&home, &["unit", "tree"]);
    assert_eq!(tree.as_array().unwrap().len(), 1);
    assert_eq!(tree[0]["name"], "HQ");
    assert_eq!(tree[0]["roles"].as_array().unwrap().len(), 2);
    assert_eq!(tree[0]["children"][0]["name"], "Patrol");

    cmd_in(&home)
        .args(["--json", "unit", "delete", &hq_id])
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("Cannot delete unit because it has child units"));
}

#[test]
fn staff_validation_errors_are_reported_per_field() {
    let home = TempDir::new().expect("temp home");

    cmd_in(&home)
        .args([
            "--json", "staff", "add", "--first-name", "Ama", "--last-name", "Mensah", "--email",
            "not-an-email", "--number", "100", "--gender", "FEMALE",
        ])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Please fix the errors and try again."))
        .stdout(predicate::str::contains("\"email\""));
}

#[test]
fn assign_then_duplicate_is_refused() {
    let home = TempDir::new().expect("temp home");

    let unit = json_of(&home, &["unit", "create", "--name", "Patrol", "--roles", "Officer"]);
    let unit_id = unit["id"].as_i64().unwrap().to_string();
    let shown = json_of(&home, &["unit", "show", &unit_id]);
    let role_id = shown["roles"][0]["id"].as_i64().unwrap().to_string();

    let staff = json_of(
        &home,
        &[
            "staff", "add", "--first-name", "Kofi", "--last-name", "Boateng", "--email",
            "kofi@example.com", "--number", "200", "--gender", "male",
        ],
    );
    let staff_id = staff["id"].as_i64().unwrap().to_string();

    let args = ["assign", "add", "--staff", &staff_id, "--role", &role_id, "--unit", &unit_id];
    json_of(&home, &args);

    cmd_in(&home)
        .arg("--json")
        .args(args)
        .assert()
        .failure()
        .stdout(predicate::str::contains("This assignment already exists."));

    let listed = json_of(&home, &["assign", "list", "--unit", &unit_id]);
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["role_title"], "Officer");
}

#[test]
fn text_output_for_empty_tree() {
    let home = TempDir::new().expect("temp home");

    cmd_in(&home)
        .args(["unit", "tree"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No units yet"));
}

#[test]
fn config_init_then_show_reports_the_file() {
    let home = TempDir::new().expect("temp home");

    cmd_in(&home)
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("personnel.toml"));

    assert!(home.path().join("personnel.toml").exists());

    cmd_in(&home)
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    cmd_in(&home)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("personnel.toml"))
        .stdout(predicate::str::contains("role_sync = \"diff\""));
}

#[test]
fn missing_config_file_is_an_error() {
    let home = TempDir::new().expect("temp home");

    cmd_in(&home)
        .args(["--config", "nowhere.toml", "unit", "tree"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Config file not found"));
}

#[test]
fn config_init_json_round_trips() {
    let home = TempDir::new().expect("temp home");

    cmd_in(&home)
        .args(["config", "init", "--output", "settings.json"])
        .assert()
        .success();

    let shown = json_of(&home, &["--config", "settings.json", "config", "show"]);
    assert_eq!(shown["pagination"]["page_size"], 10);
    assert_eq!(shown["org"]["role_sync"], "diff");
}

#[test]
fn broken_explicit_config_is_not_replaced_by_defaults() {
    let home = TempDir::new().expect("temp home");
    std::fs::write(home.path().join("bad.toml"), "[pagination]\npage_size = \"ten\"\n").unwrap();

    cmd_in(&home)
        .args(["--config", "bad.toml", "config", "validate"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Invalid config file"))
        .stdout(predicate::str::contains("Configuration is valid").not());
}
