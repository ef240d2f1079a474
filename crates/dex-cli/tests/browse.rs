#![allow(missing_docs, clippy::expect_used, clippy::unwrap_used)]

mod common;

use common::{data_dir, dex_cmd, mount_detail, mount_page, mount_page_error, run_json};
use predicates::prelude::*;
use serde_json::Value;
use tempfile::tempdir;
use wiremock::MockServer;

fn ids(payload: &Value) -> Vec<u64> {
    payload["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["id"].as_u64().unwrap())
        .collect()
}

#[tokio::test]
async fn browse_json_sorts_by_id() {
    let server = MockServer::start().await;
    mount_page(&server, 0, &[(25, "pikachu"), (1, "bulbasaur"), (4, "charmander")], false).await;
    let home = tempdir().unwrap();

    let payload = run_json(dex_cmd(home.path(), &server).args(["browse", "-o", "json"]));

    assert_eq!(ids(&payload), vec![1, 4, 25]);
    assert!(
        payload["items"][0]["sprite"]
            .as_str()
            .unwrap()
            .ends_with("/sprites/pokemon/1.png")
    );
    assert_eq!(payload["loaded"], 3);
    assert_eq!(payload["pages"], 1);
    assert_eq!(payload["hasMore"], false);
    assert!(payload.get("error").is_none());
}

#[tokio::test]
async fn browse_sorts_by_name_and_searches() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        0,
        &[(2, "ivysaur"), (1, "bulbasaur"), (4, "charmander")],
        false,
    )
    .await;
    let home = tempdir().unwrap();

    let payload = run_json(
        dex_cmd(home.path(), &server).args(["browse", "-Q", "SAUR", "-s", "name", "-o", "json"]),
    );

    let names: Vec<&str> = payload["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["bulbasaur", "ivysaur"]);
    assert_eq!(payload["loaded"], 3);
}

#[tokio::test]
async fn browse_loads_requested_pages_in_order() {
    let server = MockServer::start().await;
    let first: Vec<(u32, String)> = (1..=20).map(|n| (n, format!("mon-{n}"))).collect();
    let first: Vec<(u32, &str)> = first.iter().map(|(n, s)| (*n, s.as_str())).collect();
    mount_page(&server, 0, &first, true).await;
    mount_page(&server, 20, &[(21, "mon-21")], false).await;
    let home = tempdir().unwrap();

    let payload = run_json(dex_cmd(home.path(), &server).args(["browse", "--pages", "5", "-o", "json"]));

    assert_eq!(payload["pages"], 2);
    assert_eq!(payload["loaded"], 21);
    assert_eq!(payload["hasMore"], false);
    assert_eq!(ids(&payload), (1..=21).collect::<Vec<u64>>());
}

#[tokio::test]
async fn browse_type_filter_prefetches_and_filters() {
    let server = MockServer::start().await;
    mount_page(&server, 0, &[(4, "charmander"), (7, "squirtle")], false).await;
    mount_detail(&server, 4, "charmander", &["fire"]).await;
    mount_detail(&server, 7, "squirtle", &["water"]).await;
    let home = tempdir().unwrap();

    let payload = run_json(dex_cmd(home.path(), &server).args(["browse", "-t", "fire", "-o", "json"]));

    assert_eq!(ids(&payload), vec![4]);
    assert_eq!(payload["prefetch"]["resolved"], 2);
    assert!(data_dir(home.path()).join("type").join("7.json").exists());
}

#[tokio::test]
async fn browse_type_filter_is_fail_open() {
    let server = MockServer::start().await;
    mount_page(&server, 0, &[(4, "charmander"), (7, "squirtle")], false).await;
    // No detail for 7: its types stay unknown and it remains visible
    mount_detail(&server, 4, "charmander", &["fire"]).await;
    let home = tempdir().unwrap();

    let payload = run_json(dex_cmd(home.path(), &server).args(["browse", "-t", "water", "-o", "json"]));

    assert_eq!(ids(&payload), vec![7]);
    assert_eq!(payload["prefetch"]["failed"], 1);
}

#[tokio::test]
async fn browse_first_page_failure_exits_with_network_code() {
    let server = MockServer::start().await;
    mount_page_error(&server, 0, 500).await;
    let home = tempdir().unwrap();

    dex_cmd(home.path(), &server)
        .arg("browse")
        .assert()
        .failure()
        .code(5)
        .stderr(predicate::str::contains("Failed to load the first page"));
}

#[tokio::test]
async fn browse_later_failure_keeps_loaded_items() {
    let server = MockServer::start().await;
    mount_page(&server, 0, &[(1, "bulbasaur")], true).await;
    mount_page_error(&server, 20, 503).await;
    let home = tempdir().unwrap();

    let payload = run_json(dex_cmd(home.path(), &server).args(["browse", "--pages", "2", "-o", "json"]));

    assert_eq!(ids(&payload), vec![1]);
    assert_eq!(payload["pages"], 1);
    assert_eq!(payload["hasMore"], true);
    assert!(payload["error"].as_str().is_some());
}

#[tokio::test]
async fn browse_text_output() {
    let server = MockServer::start().await;
    mount_page(&server, 0, &[(25, "pikachu"), (4, "charmander")], true).await;
    let home = tempdir().unwrap();

    dex_cmd(home.path(), &server)
        .args(["browse", "-Q", "char"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#004"))
        .stdout(predicate::str::contains("charmander"))
        .stdout(predicate::str::contains("pikachu").not())
        .stdout(predicate::str::contains("1 shown, 2 loaded, more with --pages 2"));
}

#[tokio::test]
async fn browse_warns_on_type_outside_menu() {
    let server = MockServer::start().await;
    mount_page(&server, 0, &[(1, "bulbasaur")], false).await;
    mount_detail(&server, 1, "bulbasaur", &["grass", "poison"]).await;
    let home = tempdir().unwrap();

    dex_cmd(home.path(), &server)
        .args(["browse", "-t", "poison"])
        .assert()
        .success()
        .stdout(predicate::str::contains("bulbasaur"))
        .stderr(predicate::str::contains("type 'poison' is not in the type menu"));

    dex_cmd(home.path(), &server)
        .args(["browse", "-t", "grass"])
        .assert()
        .success()
        .stderr(predicate::str::contains("type menu").not());
}
