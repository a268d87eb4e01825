use assert_cmd::cargo::cargo_bin_cmd;
use dasmine_testing::TestWorld;
use predicates::prelude::*;
use serde_json::Value;

fn sessions_json(world: &TestWorld, extra: &[&str]) -> Value {
    let mut cmd = cargo_bin_cmd!("dasmine");
    world
        .configure_command(&mut cmd)
        .args(extra)
        .args(["sessions", "audit.jsonl", "--format", "json"]);
    let output = cmd.output().unwrap();
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn test_sessions_json_lists_sorted_windows() {
    let world = TestWorld::new().with_sample("aurora_mysql_das.jsonl", "audit.jsonl");
    let report = sessions_json(&world, &[]);

    let sessions = report["sessions"].as_array().unwrap();
    let ids: Vec<_> = sessions
        .iter()
        .map(|s| s["session_id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["101", "102", "103", "104"]);

    assert_eq!(sessions[0]["start"], "20240305100000");
    assert_eq!(sessions[0]["end"], "20240305100200");
    assert_eq!(sessions[0]["duration_secs"], 120);
    assert_eq!(sessions[0]["known"], true);

    assert_eq!(sessions[2]["start"], Value::Null);
    assert_eq!(sessions[2]["end"], "20240305100300");
    assert_eq!(sessions[2]["known"], false);
    assert_eq!(sessions[2]["duration_secs"], Value::Null);

    let anomalies = report["anomalies"].as_array().unwrap();
    assert_eq!(anomalies.len(), 1);
    assert_eq!(anomalies[0]["kind"], "duplicate_connect");
    assert_eq!(anomalies[0]["session_id"], "104");
    assert_eq!(anomalies[0]["retained"], "20240305100400");
    assert_eq!(anomalies[0]["ignored"], "20240305100430");
    assert_eq!(anomalies[0]["line"], 6);
}

#[test]
fn test_sessions_include_admin() {
    let world = TestWorld::new().with_sample("aurora_mysql_das.jsonl", "audit.jsonl");
    let report = sessions_json(&world, &["--include-admin"]);
    let ids: Vec<_> = report["sessions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["session_id"].as_str().unwrap().to_string())
        .collect();
    assert!(ids.contains(&"9".to_string()));
}

#[test]
fn test_sessions_plain_output() {
    let world = TestWorld::new().with_sample("aurora_mysql_das.jsonl", "audit.jsonl");

    let mut cmd = cargo_bin_cmd!("dasmine");
    world
        .configure_command(&mut cmd)
        .args(["sessions", "audit.jsonl"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("SESSION"))
        .stdout(predicate::str::contains("20240305100000"))
        .stdout(predicate::str::contains("120s"))
        .stdout(predicate::str::contains("(unknown)"))
        .stdout(predicate::str::contains(
            "duplicate CONNECT for session 104 at line 6",
        ));
}
