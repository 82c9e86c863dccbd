use std::process::Command;

fn temp_path(label: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "profitsim-cli-{label}-{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    ))
}

#[test]
fn cli_writes_seeded_json_report() {
    let exe = env!("CARGO_BIN_EXE_profitsim");
    let output_path = temp_path("json");
    let status = Command::new(exe)
        .args([
            "--seed",
            "1337",
            "--samples",
            "500",
            "--report",
            "json",
            "--output",
        ])
        .arg(&output_path)
        .status()
        .expect("run cli");
    assert!(status.success());
    let content = std::fs::read_to_string(&output_path).expect("read output");
    let value: serde_json::Value = serde_json::from_str(&content).expect("valid json");
    assert_eq!(value["sample_count"], 500);
    assert_eq!(value["seed"], 1337);
    assert_eq!(value["histogram"].as_array().map(Vec::len), Some(15));
}

#[test]
fn cli_seeded_runs_are_reproducible() {
    let exe = env!("CARGO_BIN_EXE_profitsim");
    let run = || {
        Command::new(exe)
            .args(["--seed", "42", "--samples", "300", "--workers", "3", "--report", "json"])
            .output()
            .expect("run cli")
    };
    let first = run();
    let second = run();
    assert!(first.status.success());
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn cli_rejects_out_of_range_opex() {
    let exe = env!("CARGO_BIN_EXE_profitsim");
    let output = Command::new(exe)
        .args(["--opex-percent", "150"])
        .output()
        .expect("run cli");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("opex_percent"));
}

#[test]
fn cli_reads_profile_and_config_files() {
    let exe = env!("CARGO_BIN_EXE_profitsim");
    let profile_path = temp_path("profile");
    let config_path = temp_path("config");
    std::fs::write(
        &profile_path,
        r#"{
            "revenue_millions": 48.0,
            "opex_percent": 30.0,
            "headcount": 210,
            "tech_spend_percent": 12.0,
            "ai_readiness": "adopter",
            "process_maturity_percent": 80.0,
            "outsourcing": "high"
        }"#,
    )
    .expect("write profile");
    std::fs::write(
        &config_path,
        r#"{ "defaults": { "histogram": { "range_max": 50.0, "bucket_count": 10 } } }"#,
    )
    .expect("write config");

    let output = Command::new(exe)
        .args(["--seed", "7", "--report", "markdown", "--profile"])
        .arg(&profile_path)
        .arg("--config")
        .arg(&config_path)
        .output()
        .expect("run cli");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("**Segment**: enterprise"));
    assert!(stdout.contains("45.0-50.0%"));
}
