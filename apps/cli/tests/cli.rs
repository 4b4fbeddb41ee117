use std::path::Path;
use std::process::Output;

use assert_cmd::Command;
use assert_cmd::assert::OutputAssertExt;
use predicates::prelude::*;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Env var name used only by these tests, so a real key in the environment is never picked up.
const TEST_KEY_ENV: &str = "BLOGDRAFT_CLI_TEST_API_KEY";

/// Write `~/.blogdraft/blogdraft.toml` under a fake home pointing at the mock server.
fn write_config(home: &Path, base_url: &str) {
    let dir = home.join(".blogdraft");
    std::fs::create_dir_all(&dir).expect("create config dir");
    std::fs::write(
        dir.join("blogdraft.toml"),
        format!("[openai]\napi_key_env = \"{TEST_KEY_ENV}\"\nbase_url = \"{base_url}\"\ntimeout_secs = 5\n"),
    )
    .expect("write config");
}

fn blogdraft(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("blogdraft").expect("binary exists");
    cmd.env("HOME", home).env_remove("RUST_LOG");
    cmd
}

fn completion(text: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "choices": [{"index": 0, "message": {"role": "assistant", "content": text}}]
    }))
}

async fn run(mut cmd: Command) -> Output {
    tokio::task::spawn_blocking(move || cmd.output().expect("run blogdraft"))
        .await
        .expect("join")
}

#[tokio::test]
async fn missing_api_key_fails_before_any_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(completion("unused"))
        .expect(0)
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();
    write_config(home.path(), &server.uri());
    let output_path = home.path().join("post.md");

    let mut cmd = blogdraft(home.path());
    cmd.env_remove(TEST_KEY_ENV)
        .args(["--title", "Fibers", "--topic", "fibers", "--output"])
        .arg(&output_path);

    run(cmd)
        .await
        .assert()
        .failure()
        .stderr(predicate::str::contains("API key not found"))
        .stderr(predicate::str::contains(TEST_KEY_ENV));

    assert!(!output_path.exists());
}

#[test]
fn all_three_options_are_required() {
    let home = tempfile::tempdir().unwrap();

    blogdraft(home.path())
        .args(["--title", "Fibers", "--topic", "fibers"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--output"));
}

#[tokio::test]
async fn drafts_post_end_to_end() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains("Create a detailed outline"))
        .respond_with(completion("# Intro\nbody\n# Conclusion"))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains("section: # Intro."))
        .respond_with(completion("A"))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains("section: # Conclusion."))
        .respond_with(completion("B"))
        .expect(1)
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();
    write_config(home.path(), &server.uri());
    let output_path = home.path().join("blog").join("01-fibers.md");

    let mut cmd = blogdraft(home.path());
    cmd.env(TEST_KEY_ENV, "test-key")
        .args(["--title", "Fibers 101", "--topic", "fibers", "--output"])
        .arg(&output_path);

    run(cmd)
        .await
        .assert()
        .success()
        .stdout(predicate::str::contains("Draft written!"));

    let written = std::fs::read_to_string(&output_path).expect("post written");
    assert!(written.starts_with("---\ntitle: \"Fibers 101\"\ndate: "));
    assert!(written.contains("series: \"99 Bottles of Scala\"\n---\n\n"));
    let intro = written.find("# Intro\n\nA").expect("intro section");
    let outro = written.find("# Conclusion\n\nB").expect("conclusion section");
    assert!(intro < outro);
}

#[tokio::test]
async fn remote_failure_exits_nonzero_without_output() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();
    write_config(home.path(), &server.uri());
    let output_path = home.path().join("post.md");

    let mut cmd = blogdraft(home.path());
    cmd.env(TEST_KEY_ENV, "test-key")
        .args(["--title", "Fibers", "--topic", "fibers", "--output"])
        .arg(&output_path);

    run(cmd)
        .await
        .assert()
        .failure()
        .stderr(predicate::str::contains("remote service error"));

    assert!(!output_path.exists());
}
