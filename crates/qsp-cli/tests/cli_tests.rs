//! End-to-end tests that run the `qsp` binary.

use std::process::{Command, Output};

fn qsp(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_qsp"))
        .args(args)
        .env_remove("QSP_CONFIG")
        .env_remove("QSP_DEFAULT_TARGET")
        .env_remove("QSP_DEFAULT_SHOTS")
        .env_remove("QSP_JOB_TIMEOUT")
        .output()
        .expect("failed to run qsp")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_version() {
    let out = qsp(&["version"]);
    assert!(out.status.success());
    assert!(stdout(&out).contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_targets_local_default() {
    let out = qsp(&["targets"]);
    assert!(out.status.success());
    let text = stdout(&out);
    assert!(text.contains("simulator (default)"));
    assert!(text.contains("quantinuum.sim"));
}

#[test]
fn test_targets_from_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ws.yaml");
    std::fs::write(
        &path,
        "identity: lab\nlocation: eu\ndefault_target: fast\ntargets:\n  fast:\n    backend: simulator\n    max_qubits: 4\n",
    )
    .unwrap();

    let out = qsp(&["--config", path.to_str().unwrap(), "targets"]);
    assert!(out.status.success());
    let text = stdout(&out);
    assert!(text.contains("fast (default)"));
    assert!(text.contains("Qubits: 4"));
    assert!(!text.contains("quantinuum.sim"));
}

#[test]
fn test_unitary_json() {
    let out = qsp(&["unitary", "--phases", "0,0", "--x", "0.5", "--format", "json"]);
    assert!(out.status.success());
    let value: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    let p = value["probability"].as_f64().unwrap();
    assert!((p - 0.25).abs() < 1e-12);
    assert_eq!(value["is_unitary"], true);
}

#[test]
fn test_polynomial_json_degree() {
    let out = qsp(&["polynomial", "--phases", "0.1,0.2,0.3,0.4", "--format", "json"]);
    assert!(out.status.success());
    let value: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(value["degree"], 3);
}

#[test]
fn test_verify_grid() {
    let out = qsp(&["verify", "--phases", "0.1,-0.2,0.3", "--points", "5"]);
    assert!(out.status.success());
    assert!(stdout(&out).contains("All 5 points agree"));
}

#[test]
fn test_sweep_json_order() {
    let out = qsp(&[
        "sweep", "--phases", "0,0", "--xs", "1,0,-1", "--shots", "50", "--format", "json",
    ]);
    assert!(out.status.success());
    let rows: Vec<serde_json::Value> = serde_json::from_slice(&out.stdout).unwrap();
    let xs: Vec<f64> = rows.iter().map(|r| r["x"].as_f64().unwrap()).collect();
    assert_eq!(xs, vec![1.0, 0.0, -1.0]);
    assert_eq!(rows[0]["probability"].as_f64(), Some(1.0));
    assert_eq!(rows[0]["shots"], 50);
}

#[test]
fn test_estimate_out_of_domain_fails() {
    let out = qsp(&["estimate", "--phases", "0,0", "--x", "1.5"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("Error:"));
}

#[test]
fn test_unknown_target_fails() {
    let out = qsp(&["estimate", "--phases", "0,0", "--x", "0.5", "--target", "nope"]);
    assert_eq!(out.status.code(), Some(1));
}
