#![deny(clippy::all, clippy::pedantic)]

use assert_cmd::Command;
use httpmock::{Mock, MockServer};
use predicates::str::contains;
use serde_json::json;
use tempfile::TempDir;

const POSTS_PATH: &str = "/api/posts";

/// A binary invocation isolated from the developer's environment and any
/// config files in the working tree.
fn postboard(workdir: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("postboard"));
    cmd.current_dir(workdir.path())
        .env_remove("POSTBOARD_API_URL")
        .env_remove("POSTBOARD_CONFIG_FILE")
        .env_remove("POSTBOARD__API__BASE_URL")
        .env_remove("RUST_LOG");
    cmd
}

fn posts_url(server: &MockServer) -> String {
    server.url(POSTS_PATH)
}

fn seed_list(server: &MockServer) -> Mock<'_> {
    server.mock(|when, then| {
        when.method("GET").path(POSTS_PATH);
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!([
            { "id": 1, "title": "Older", "createdAt": "2024-01-01T00:00:00Z" },
            { "id": 2, "title": "Newer", "createdAt": "2024-02-01T00:00:00Z" }
        ]));
    })
}

#[test]
fn list_prints_posts_newest_first() {
    let server = MockServer::start();
    let list = seed_list(&server);
    let workdir = TempDir::new().expect("tmp dir");

    let assert = postboard(&workdir)
        .args(["--api-url", &posts_url(&server), "list"])
        .assert()
        .success();

    let output = String::from_utf8_lossy(&assert.get_output().stdout);
    assert!(output.starts_with("Posts (2)\n"));
    let newer = output.find("#2  Newer").expect("newer post");
    let older = output.find("#1  Older").expect("older post");
    assert!(newer < older);
    list.assert();
}

#[test]
fn list_as_json_is_a_sorted_array() {
    let server = MockServer::start();
    seed_list(&server);
    let workdir = TempDir::new().expect("tmp dir");

    let assert = postboard(&workdir)
        .args(["--api-url", &posts_url(&server), "--json", "list"])
        .assert()
        .success();

    let printed: serde_json::Value =
        serde_json::from_slice(&assert.get_output().stdout).expect("json output");
    let ids: Vec<i64> = printed
        .as_array()
        .expect("array")
        .iter()
        .filter_map(|post| post["id"].as_i64())
        .collect();
    assert_eq!(ids, [2, 1]);
}

#[test]
fn failed_load_shows_the_server_message_and_exits_non_zero() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method("GET").path(POSTS_PATH);
        then.status(500)
            .header("content-type", "application/json")
            .json_body(json!({ "message": "db down" }));
    });
    let workdir = TempDir::new().expect("tmp dir");

    postboard(&workdir)
        .args(["--api-url", &posts_url(&server), "list"])
        .assert()
        .failure()
        .stdout(contains("Error: db down"))
        .stderr(contains("Failed to load posts: db down"));
}

#[test]
fn create_shows_the_new_post_first() {
    let server = MockServer::start();
    seed_list(&server);
    let create = server.mock(|when, then| {
        when.method("POST")
            .path(POSTS_PATH)
            .json_body(json!({ "title": "Fresh", "body": "hello" }));
        then.status(201)
            .header("content-type", "application/json")
            .json_body(json!({
            "id": "abc",
            "title": "Fresh",
            "body": "hello",
            "createdAt": "2020-01-01T00:00:00Z"
        }));
    });
    let workdir = TempDir::new().expect("tmp dir");

    let assert = postboard(&workdir)
        .args([
            "--api-url",
            &posts_url(&server),
            "create",
            "--title",
            "Fresh",
            "--body",
            "hello",
        ])
        .assert()
        .success();

    let output = String::from_utf8_lossy(&assert.get_output().stdout);
    let fresh = output.find("#abc  Fresh").expect("created post");
    let newer = output.find("#2  Newer").expect("existing post");
    assert!(fresh < newer);
    create.assert();
}

#[test]
fn create_without_an_id_is_refused() {
    let server = MockServer::start();
    seed_list(&server);
    server.mock(|when, then| {
        when.method("POST").path(POSTS_PATH);
        then.status(201)
            .header("content-type", "application/json")
            .json_body(json!({ "title": "Ghost" }));
    });
    let workdir = TempDir::new().expect("tmp dir");

    postboard(&workdir)
        .args(["--api-url", &posts_url(&server), "create", "--title", "Ghost"])
        .assert()
        .failure()
        .stdout(predicates::str::is_empty())
        .stderr(contains("Create failed"));
}

#[test]
fn declined_delete_makes_no_request() {
    let server = MockServer::start();
    seed_list(&server);
    let workdir = TempDir::new().expect("tmp dir");

    postboard(&workdir)
        .args(["--api-url", &posts_url(&server), "delete", "1"])
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(contains("Deletion cancelled"))
        .stderr(contains("Delete this post? [y/N]"));
}

#[test]
fn confirmed_delete_removes_the_post() {
    let server = MockServer::start();
    seed_list(&server);
    let delete = server.mock(|when, then| {
        when.method("DELETE").path(format!("{POSTS_PATH}/1"));
        then.status(204);
    });
    let workdir = TempDir::new().expect("tmp dir");

    let assert = postboard(&workdir)
        .args(["--api-url", &posts_url(&server), "delete", "1", "--yes"])
        .assert()
        .success();

    let output = String::from_utf8_lossy(&assert.get_output().stdout);
    assert!(output.starts_with("Posts (1)\n"));
    assert!(!output.contains("Older"));
    delete.assert();
}

#[test]
fn padded_ids_are_sent_as_typed() {
    let server = MockServer::start();
    seed_list(&server);
    let delete = server.mock(|when, then| {
        when.method("DELETE").path(format!("{POSTS_PATH}/007"));
        then.status(204);
    });
    let workdir = TempDir::new().expect("tmp dir");

    let assert = postboard(&workdir)
        .args(["--api-url", &posts_url(&server), "delete", "007", "--yes"])
        .assert()
        .success();

    let output = String::from_utf8_lossy(&assert.get_output().stdout);
    assert!(output.starts_with("Posts (2)\n"));
    delete.assert();
}

#[test]
fn failed_delete_names_the_action() {
    let server = MockServer::start();
    seed_list(&server);
    server.mock(|when, then| {
        when.method("DELETE").path(format!("{POSTS_PATH}/2"));
        then.status(503)
            .header("content-type", "application/json")
            .json_body(json!({ "error": "maintenance" }));
    });
    let workdir = TempDir::new().expect("tmp dir");

    postboard(&workdir)
        .args(["--api-url", &posts_url(&server), "delete", "2", "-y"])
        .assert()
        .failure()
        .stderr(contains("Failed to delete: maintenance"));
}

#[test]
fn base_url_can_come_from_the_environment() {
    let server = MockServer::start();
    let list = seed_list(&server);
    let workdir = TempDir::new().expect("tmp dir");

    postboard(&workdir)
        .env("POSTBOARD__API__BASE_URL", posts_url(&server))
        .arg("list")
        .assert()
        .success()
        .stdout(contains("Posts (2)"));
    list.assert();
}

#[test]
fn unusable_base_url_fails_fast() {
    let workdir = TempDir::new().expect("tmp dir");

    postboard(&workdir)
        .args(["--api-url", "ftp://example.com/posts", "list"])
        .assert()
        .failure()
        .stderr(contains("api.base_url"));
}
