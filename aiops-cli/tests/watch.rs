use assert_cmd::Command;
use httpmock::prelude::*;
use predicates::prelude::*;
use std::io::Write;

fn cli() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("aiops-cli"));
    cmd.env_remove("AIOPS_API_URL").env_remove("AIOPS_CONFIG");
    cmd
}

async fn backend() -> MockServer {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/metrics/recent");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"[{"cpu_usage":30.0,"memory_usage":20.0,"disk_usage":40.0,"timestamp":"2025-01-01T10:00:00Z","top_processes":[{"name":"nginx","cpu":12.0,"memory":3.0}]}]"#);
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/ai/decisions");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"[{"id":"d1","action":"Alert Admin","target":"cache-service","reason":"Resource optimization needed","timestamp":"2025-01-01T10:00:00Z","status":"failed"}]"#);
        })
        .await;
    server
}

#[tokio::test]
async fn watch_once_renders_full_dashboard() {
    let server = backend().await;

    cli()
        .args(["--url", &server.base_url(), "--no-color", "watch", "--once"])
        .timeout(std::time::Duration::from_secs(10))
        .assert()
        .success()
        .stdout(predicates::str::contains("AIOps Dashboard"))
        .stdout(predicates::str::contains("✔ Healthy"))
        .stdout(predicates::str::contains("nginx (12.0% CPU)"))
        .stdout(predicates::str::contains("Alert Admin → cache-service [failed]"))
        .stdout(predicates::str::contains("Loading...").not());
}

#[tokio::test]
async fn watch_once_json_emits_state() {
    let server = backend().await;

    let output = cli()
        .args(["--url", &server.base_url(), "--json", "watch", "--once"])
        .timeout(std::time::Duration::from_secs(10))
        .output()
        .unwrap();
    assert!(output.status.success());
    let state: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(state["status"], "healthy");
    assert_eq!(state["phase"], "ready");
    assert_eq!(state["loading"], false);
    assert_eq!(state["source"], "live");
    assert_eq!(state["decisions"][0]["id"], "d1");
}

#[tokio::test]
async fn watch_once_reports_synthetic_data() {
    cli()
        .args(["--url", "http://127.0.0.1:59999", "--no-color", "watch", "--once"])
        .timeout(std::time::Duration::from_secs(10))
        .assert()
        .success()
        .stdout(predicates::str::contains("showing synthetic data"));
}

#[tokio::test]
async fn config_file_supplies_url() {
    let server = backend().await;
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "api_url = \"{}\"", server.base_url()).unwrap();
    writeln!(file, "fallback = false").unwrap();

    cli()
        .args(["--no-color", "--config"])
        .arg(file.path())
        .args(["watch", "--once"])
        .timeout(std::time::Duration::from_secs(10))
        .assert()
        .success()
        .stdout(predicates::str::contains("Resource optimization needed"));
}

#[test]
fn zero_interval_is_rejected() {
    cli()
        .args(["--url", "http://127.0.0.1:59999", "watch", "--interval", "0"])
        .assert()
        .failure()
        .stderr(predicates::str::contains("--interval"));
}
