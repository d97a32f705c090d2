use std::fs;
use std::path::PathBuf;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

fn bin() -> &'static str {
    env!("CARGO_BIN_EXE_prize_pooler")
}

fn unique_temp_path(name: &str) -> PathBuf {
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock should be after unix epoch")
        .as_nanos();
    std::env::temp_dir().join(format!("prize-pooler-{name}-{stamp}.yml"))
}

const VALID_CONFIG: &str = "
Soldier Monthly:
  Premiership: { share: 50, distribution: [50, 30, 20] }
  Open: { share: 50, distribution: [100] }
Demoman Monthly:
  Only: { share: 100, distribution: [50, 50] }
";

const INVALID_CONFIG: &str = "
Soldier Monthly:
  Premiership: { share: 50, distribution: [50, 30, 19] }
  Open: { share: 50.5, distribution: [100] }
";

fn run_with_config(name: &str, config: &str, extra: &[&str]) -> std::process::Output {
    let path = unique_temp_path(name);
    fs::write(&path, config).expect("fixture should be written");
    let output = Command::new(bin())
        .arg("--config")
        .arg(&path)
        .args(extra)
        .env_remove("PRIZE_POOLER_CONFIG")
        .output()
        .expect("prize_pooler should run");
    let _ = fs::remove_file(path);
    output
}

#[test]
fn text_report_for_soldier_mode() {
    let output = run_with_config("text", VALID_CONFIG, &["-p", "11", "-m", "s"]);

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("Total Pool: 11\n"));
    assert!(stdout.contains("Premiership: Total 6 Keys (50%)"));
    assert!(stdout.contains("Open: Total 5 Keys (50%)"));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Loading distribution for mode: Soldier Monthly"));
}

#[test]
fn json_report_for_demoman_mode() {
    let output = run_with_config("json", VALID_CONFIG, &["-p", "7", "-m", "d", "-f", "json"]);

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let payload: serde_json::Value =
        serde_json::from_str(&stdout).expect("json format should emit json");
    assert_eq!(payload["total"], 7);
    assert_eq!(payload["divisions"][0]["name"], "Only");
    assert_eq!(payload["divisions"][0]["ranks"][0]["units"], 4);
    assert_eq!(payload["divisions"][0]["ranks"][1]["units"], 3);
}

#[test]
fn csv_report_has_one_row_per_rank() {
    let output = run_with_config("csv", VALID_CONFIG, &["-p", "100", "-m", "s", "-f", "csv"]);

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 5);
    assert!(lines[0].starts_with("division,division_share,division_units"));
}

#[test]
fn invalid_distribution_exits_non_zero_with_all_diagnostics() {
    let output = run_with_config("invalid", INVALID_CONFIG, &["-p", "100", "-m", "s"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("validation failed: 2 issue(s)"));
    assert!(stderr.contains("Total of Premiership division is 99"));
    assert!(stderr.contains("All divisions add up to 100.5"));
}

#[test]
fn missing_profile_exits_non_zero() {
    let output = run_with_config("missing-profile", INVALID_CONFIG, &["-p", "100", "-m", "d"]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no distribution named 'Demoman Monthly'"));
}

#[test]
fn missing_config_file_exits_non_zero() {
    let path = unique_temp_path("absent");
    let output = Command::new(bin())
        .args(["-p", "10", "-m", "s", "--config"])
        .arg(&path)
        .output()
        .expect("prize_pooler should run");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("distributions could not be found"));
}

#[test]
fn unknown_mode_is_rejected_before_loading() {
    let output = Command::new(bin())
        .args(["-p", "10", "-m", "x"])
        .output()
        .expect("prize_pooler should run");

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!stderr.contains("Loading distribution"));
}

#[test]
fn config_path_can_come_from_environment() {
    let path = unique_temp_path("env");
    fs::write(&path, VALID_CONFIG).expect("fixture should be written");

    let output = Command::new(bin())
        .args(["-p", "3", "-m", "d"])
        .env("PRIZE_POOLER_CONFIG", &path)
        .output()
        .expect("prize_pooler should run");

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Only: Total 3 Keys (100%)"));
    assert!(stdout.contains("\t1: 2 Keys (50%)"));

    let _ = fs::remove_file(path);
}
