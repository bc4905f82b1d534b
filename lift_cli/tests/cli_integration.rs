use assert_cmd::prelude::*;
use predicates::prelude::*;
use rstest::rstest;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::Command;
use tempfile::tempdir;

// Minimal valid four-floor config for the sim backend
fn write_valid_config(dir: &tempfile::TempDir) -> PathBuf {
    let toml = r#"
[building]
floors = 4

[pins]
# pins are unused by the sim backend but must be present
buttons = [17, 27, 22, 23]
floor_leds = [5, 6, 13, 19]
door_led = 26

[timing]
debounce_ms = 50
door_open_ms = 3000
travel_ms = 3000
poll_ms = 10
"#;
    let path = dir.path().join("cfg.toml");
    fs::write(&path, toml).unwrap();
    path
}

fn write_script(dir: &tempfile::TempDir, rows: &[&str]) -> PathBuf {
    let path = dir.path().join("presses.csv");
    let mut f = fs::File::create(&path).unwrap();
    for row in rows {
        writeln!(f, "{row}").unwrap();
    }
    path
}

#[rstest]
#[case(&["--help"], 0, "Usage:", "stdout")]
#[case(&["self-check"], 0, "self-check ok", "stdout")]
#[case(&["run", "--sim-time"], 1, "--sim-time needs", "stderr")]
#[case(&["run", "--sim-time", "--interactive", "--max-ticks", "5"], 1, "cannot be combined", "stderr")]
#[case(&["--backend", "gpio", "run", "--sim-time", "--max-ticks", "5"], 1, "sim backend", "stderr")]
#[case(&["run", "--sim-time", "--max-ticks", "10"], 0, "stopped by tick_limit", "stdout")]
fn cli_table_cases(
    #[case] args: &[&str],
    #[case] exit_code: i32,
    #[case] needle: &str,
    #[case] stream: &str,
) {
    let dir = tempdir().unwrap();
    let cfg = write_valid_config(&dir);

    let mut cmd = Command::cargo_bin("lift_cli").unwrap();
    // Always include a valid config to avoid relying on default path
    cmd.arg("--config").arg(&cfg);
    for a in args {
        cmd.arg(a);
    }

    let assert = cmd.assert().code(exit_code);
    match stream {
        "stdout" => {
            assert.stdout(predicate::str::contains(needle));
        }
        "stderr" => {
            assert.stderr(predicate::str::contains(needle));
        }
        other => panic!("unknown stream: {other}"),
    }
}

#[test]
fn scripted_run_on_sim_time_reports_summary_json() {
    let dir = tempdir().unwrap();
    let cfg = write_valid_config(&dir);
    let script = write_script(&dir, &["at_ms,floor,hold_ms", "0,4,200", "4000,1,200"]);

    let out = Command::cargo_bin("lift_cli")
        .unwrap()
        .arg("--config")
        .arg(&cfg)
        .arg("--script")
        .arg(&script)
        .arg("--json")
        .args(["run", "--sim-time", "--max-runtime-ms", "30000"])
        .output()
        .unwrap();
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

    let stdout = String::from_utf8(out.stdout).unwrap();
    let line = stdout.lines().last().expect("summary line");
    let v: serde_json::Value = serde_json::from_str(line).unwrap();
    assert_eq!(v["stops_serviced"], 2);
    assert_eq!(v["floors_travelled"], 6);
    assert_eq!(v["final_floor"], 1);
    assert_eq!(v["stopped_by"], "time_limit");
}

#[test]
fn sim_time_limit_defaults_to_script_length() {
    let dir = tempdir().unwrap();
    let cfg = write_valid_config(&dir);
    let script = write_script(&dir, &["at_ms,floor,hold_ms", "0,3,200"]);

    Command::cargo_bin("lift_cli")
        .unwrap()
        .arg("--config")
        .arg(&cfg)
        .arg("--script")
        .arg(&script)
        .args(["run", "--sim-time"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 stops serviced"))
        .stdout(predicate::str::contains("final floor 3"));
}

#[test]
fn cli_reports_bad_script_header() {
    let dir = tempdir().unwrap();
    let cfg = write_valid_config(&dir);
    let script = write_script(&dir, &["time,floor", "0,3"]);

    Command::cargo_bin("lift_cli")
        .unwrap()
        .arg("--config")
        .arg(&cfg)
        .arg("--script")
        .arg(&script)
        .arg("self-check")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid headers in press script CSV"));
}

#[test]
fn script_floor_outside_building_is_rejected() {
    let dir = tempdir().unwrap();
    let cfg = write_valid_config(&dir);
    let script = write_script(&dir, &["at_ms,floor,hold_ms", "0,7,200"]);

    Command::cargo_bin("lift_cli")
        .unwrap()
        .arg("--config")
        .arg(&cfg)
        .arg("--script")
        .arg(&script)
        .args(["run", "--sim-time"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("press script"));
}

#[rstest]
#[case("[building]\nfloors = 1\n[pins]\nbuttons = [1]\nfloor_leds = [2]\ndoor_led = 3\n", "building.floors")]
#[case("[building]\nfloors = 2\n[pins]\nbuttons = [1, 2]\nfloor_leds = [3, 4]\ndoor_led = 3\n", "assigned more than once")]
#[case("[building]\nfloors = 2\n[pins]\nbuttons = [1, 2]\nfloor_leds = [3, 4]\ndoor_led = 5\n[timing]\ndebounce_ms = 10\npoll_ms = 10\n", "poll_ms")]
fn invalid_config_exits_with_config_code(#[case] toml: &str, #[case] needle: &str) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.toml");
    fs::write(&path, toml).unwrap();

    Command::cargo_bin("lift_cli")
        .unwrap()
        .arg("--config")
        .arg(&path)
        .arg("self-check")
        .assert()
        .code(2)
        .stderr(predicate::str::contains(needle));
}

#[test]
fn malformed_toml_is_explained() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.toml");
    fs::write(&path, "[building\nfloors = ").unwrap();

    Command::cargo_bin("lift_cli")
        .unwrap()
        .arg("--config")
        .arg(&path)
        .arg("self-check")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("not valid TOML"));
}

#[test]
fn json_mode_errors_are_structured() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("missing.toml");

    let out = Command::cargo_bin("lift_cli")
        .unwrap()
        .arg("--config")
        .arg(&path)
        .arg("--json")
        .arg("self-check")
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8(out.stderr).unwrap();
    let line = stderr
        .lines()
        .rev()
        .find(|l| l.contains("\"reason\""))
        .expect("json error line");
    let v: serde_json::Value = serde_json::from_str(line).unwrap();
    assert_eq!(v["reason"], "Error");
    assert!(v["message"].as_str().unwrap().contains("could not be read"));
}
