use assert_cmd::Command;
use assert_cmd::cargo;
use mockito::Server;
use predicates::prelude::*;

const REPO_FIXTURE: &str = include_str!("fixtures/octokit.rb.json");
const TREE_FIXTURE: &str = include_str!("fixtures/octokit.rb_tree.json");
const RELEASES_FIXTURE: &str = include_str!("fixtures/octokit.rb_releases.json");

fn flint_fetch(api_url: &str) -> Command {
    let mut cmd = Command::new(cargo::cargo_bin!("flint-fetch"));
    cmd.env_remove("GITHUB_TOKEN")
        .env_remove("GITHUB_API_URL")
        .arg("--api-url")
        .arg(api_url);
    cmd
}

#[test]
fn test_info_prints_metadata_as_json() {
    let mut server = Server::new();
    let url = server.url();

    let mock = server
        .mock("GET", "/repos/octokit/octokit.rb")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(REPO_FIXTURE)
        .create();

    let output = flint_fetch(&url)
        .arg("info")
        .arg("octokit/octokit.rb")
        .output()
        .unwrap();

    mock.assert();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["description"], "Ruby toolkit for the GitHub API");
    assert_eq!(json["homepage"], "http://octokit.github.io/octokit.rb/");
}

#[test]
fn test_tree_lists_files_on_default_branch() {
    let mut server = Server::new();
    let url = server.url();

    let _mock_repo = server
        .mock("GET", "/repos/octokit/octokit.rb")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(REPO_FIXTURE)
        .create();

    let _mock_tree = server
        .mock("GET", "/repos/octokit/octokit.rb/git/trees/master?recursive=1")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(TREE_FIXTURE)
        .create();

    flint_fetch(&url)
        .arg("tree")
        .arg("octokit/octokit.rb")
        .assert()
        .success()
        .stdout(predicates::str::contains("Rakefile\n"))
        .stdout(predicates::str::contains("README.md\n"))
        .stdout(predicates::str::contains("lib/octokit.rb\n"))
        .stdout(predicates::str::contains("vendor/cache").not());
}

#[test]
fn test_tree_with_explicit_branch() {
    let mut server = Server::new();
    let url = server.url();

    let mock_repo = server
        .mock("GET", "/repos/tyhal/flint")
        .expect(0)
        .create();

    let mock_tree = server
        .mock("GET", "/repos/tyhal/flint/git/trees/develop?recursive=1")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"tree": [{"path": "flint.go", "type": "blob"}], "truncated": false}"#)
        .create();

    flint_fetch(&url)
        .args(["tree", "tyhal/flint", "--branch", "develop"])
        .assert()
        .success()
        .stdout("flint.go\n");

    mock_repo.assert();
    mock_tree.assert();
}

#[test]
fn test_tree_not_found_fails() {
    let mut server = Server::new();
    let url = server.url();

    let _mock_repo = server
        .mock("GET", "/repos/octokit/octokit.rb")
        .with_status(200)
        .with_body(REPO_FIXTURE)
        .create();

    let _mock_tree = server
        .mock("GET", "/repos/octokit/octokit.rb/git/trees/master?recursive=1")
        .with_status(404)
        .create();

    flint_fetch(&url)
        .arg("tree")
        .arg("octokit/octokit.rb")
        .assert()
        .failure()
        .stderr(predicates::str::contains("HTTP 404"));
}

#[test]
fn test_releases_skip_tag_only_entries() {
    let mut server = Server::new();
    let url = server.url();

    let _mock_releases = server
        .mock("GET", "/repos/octokit/octokit.rb/releases?per_page=100")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(RELEASES_FIXTURE)
        .create();

    flint_fetch(&url)
        .arg("releases")
        .arg("octokit/octokit.rb")
        .assert()
        .success()
        .stdout("v2.0.0.pre\nv3.2.0\n");
}

#[test]
fn test_token_sent_as_bearer() {
    let mut server = Server::new();
    let url = server.url();

    let mock = server
        .mock("GET", "/repos/tyhal/flint")
        .match_header("Authorization", "Bearer secret-token")
        .with_status(200)
        .with_body(r#"{"description": "Check your projects for common sources of contributor friction"}"#)
        .create();

    flint_fetch(&url)
        .args(["info", "tyhal/flint", "--token", "secret-token"])
        .assert()
        .success()
        .stdout(predicates::str::contains("contributor friction"));

    mock.assert();
}

#[test]
fn test_invalid_identifier_is_reported_without_requests() {
    let mut server = Server::new();
    let url = server.url();

    let mock = server
        .mock("GET", mockito::Matcher::Any)
        .expect(0)
        .create();

    flint_fetch(&url)
        .arg("releases")
        .arg("tyhalflint")
        .assert()
        .failure()
        .stderr(predicates::str::contains(
            "Invalid GitHub repository: tyhalflint",
        ));

    mock.assert();
}
