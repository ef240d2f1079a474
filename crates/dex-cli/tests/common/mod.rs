#![allow(dead_code, clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use serde_json::{Value, json};
use std::path::{Path, PathBuf};
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const CMD_TIMEOUT: Duration = Duration::from_secs(15);

/// Create a `dex` command isolated in `home` and pointed at `server`.
pub fn dex_cmd(home: &Path, server: &MockServer) -> Command {
    let config = home.join("config.toml");
    if !config.exists() {
        std::fs::write(&config, "").expect("failed to write test config");
    }

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("dex"));
    cmd.timeout(CMD_TIMEOUT);
    cmd.env("DEX_CONFIG", &config);
    cmd.env("DEX_DATA_DIR", data_dir(home));
    cmd.env("DEX_BASE_URL", server.uri());
    cmd.env("NO_COLOR", "1");
    cmd
}

pub fn data_dir(home: &Path) -> PathBuf {
    home.join("data")
}

pub fn run_json(cmd: &mut Command) -> Value {
    let stdout = cmd.assert().success().get_output().stdout.clone();
    serde_json::from_slice(&stdout).expect("stdout should be JSON")
}

/// Mounts the list page at `offset` holding `items` (`(id, name)` pairs).
pub async fn mount_page(server: &MockServer, offset: usize, items: &[(u32, &str)], next: bool) {
    let base = server.uri();
    let results: Vec<Value> = items
        .iter()
        .map(|(id, name)| json!({"name": name, "url": format!("{base}/pokemon/{id}/")}))
        .collect();
    let next = if next {
        json!(format!("{base}/pokemon?offset={}&limit=20", offset + 20))
    } else {
        Value::Null
    };

    Mock::given(method("GET"))
        .and(path("/pokemon"))
        .and(query_param("offset", offset.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 1302,
            "next": next,
            "previous": null,
            "results": results,
        })))
        .mount(server)
        .await;
}

/// Mounts a failing list page at `offset`.
pub async fn mount_page_error(server: &MockServer, offset: usize, status: u16) {
    Mock::given(method("GET"))
        .and(path("/pokemon"))
        .and(query_param("offset", offset.to_string()))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

/// Mounts a detail record reachable by id and by name.
pub async fn mount_detail(server: &MockServer, id: u32, name: &str, types: &[&str]) {
    let slots: Vec<Value> = types
        .iter()
        .enumerate()
        .map(|(i, t)| json!({"slot": i + 1, "type": {"name": t, "url": ""}}))
        .collect();
    let moves: Vec<Value> = (1..=10)
        .map(|n| json!({"move": {"name": format!("move-{n}"), "url": ""}}))
        .collect();
    let body = json!({
        "id": id,
        "name": name,
        "height": 4,
        "weight": 60,
        "types": slots,
        "stats": [
            {"base_stat": 35, "effort": 0, "stat": {"name": "hp", "url": ""}},
            {"base_stat": 55, "effort": 0, "stat": {"name": "attack", "url": ""}}
        ],
        "moves": moves,
    });

    for key in [id.to_string(), name.to_string()] {
        Mock::given(method("GET"))
            .and(path(format!("/pokemon/{key}/")))
            .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
            .mount(server)
            .await;
    }
}
