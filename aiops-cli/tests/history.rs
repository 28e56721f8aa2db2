use assert_cmd::Command;
use httpmock::prelude::*;

fn cli() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("aiops-cli"));
    cmd.env_remove("AIOPS_API_URL").env_remove("AIOPS_CONFIG");
    cmd
}

#[tokio::test]
async fn metrics_command_lists_history() {
    let server = MockServer::start_async().await;
    let _m = server
        .mock_async(|when, then| {
            when.method(GET).path("/metrics/recent");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"[
                    {"cpu_usage":12.0,"memory_usage":34.0,"disk_usage":56.0,"timestamp":"2025-01-01T10:00:00Z",
                     "top_processes":[{"name":"postgres","cpu":9.5,"memory":30.0},{"name":"redis","cpu":1.0,"memory":2.0}]},
                    {"cpu_usage":14.0,"memory_usage":33.0,"disk_usage":56.0,"timestamp":"2025-01-01T09:59:00Z","top_processes":[]}
                ]"#);
        })
        .await;

    cli()
        .args(["--url", &server.base_url(), "--no-color", "metrics"])
        .assert()
        .success()
        .stdout(predicates::str::contains("Recent Metrics"))
        .stdout(predicates::str::contains("postgres (9.5% CPU)"))
        .stdout(predicates::str::contains("Current Top Processes"));
}

#[tokio::test]
async fn metrics_command_handles_empty_list() {
    let server = MockServer::start_async().await;
    let _m = server
        .mock_async(|when, then| {
            when.method(GET).path("/metrics/recent");
            then.status(200)
                .header("content-type", "application/json")
                .body("[]");
        })
        .await;

    cli()
        .args(["--url", &server.base_url(), "--no-color", "metrics"])
        .assert()
        .success()
        .stdout(predicates::str::contains("No metrics data available"));
}

#[tokio::test]
async fn decisions_command_lists_log() {
    let server = MockServer::start_async().await;
    let _m = server
        .mock_async(|when, then| {
            when.method(GET).path("/ai/decisions");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"[
                    {"id":"d1","action":"Restart Container","target":"api-gateway","reason":"Process not responding","timestamp":"2025-01-01T10:00:00Z","status":"success"},
                    {"id":"d2","action":"Scale Up","target":"web-server","reason":"Load balancing required","timestamp":"2025-01-01T09:55:00Z","status":"pending"}
                ]"#);
        })
        .await;

    cli()
        .args(["--url", &server.base_url(), "--no-color", "decisions"])
        .assert()
        .success()
        .stdout(predicates::str::contains("⚠ Restart Container → api-gateway [success]"))
        .stdout(predicates::str::contains("• Scale Up → web-server [pending]"));
}

#[tokio::test]
async fn decisions_fall_back_when_unreachable() {
    let output = cli()
        .args(["--url", "http://127.0.0.1:59999", "--json", "decisions"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let list: Vec<serde_json::Value> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(list.len(), 8);
    assert_eq!(list[0]["id"], "decision-0");
}
