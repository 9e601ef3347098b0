//! Integration tests for the rvb binary.
//!
//! These tests exercise the full CLI against real git repositories. HOME
//! and XDG_CONFIG_HOME point into the temp dir so no user config leaks in.

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Test fixture: a wiki repository with a few committed documents.
struct TestWiki {
    dir: TempDir,
}

impl TestWiki {
    fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        let wiki = Self { dir };
        let repo = git2::Repository::init(wiki.path()).expect("failed to init repo");

        wiki.commit(&repo, &[("docs/a.md", "0123456789"), ("root.md", "01234")], 1_000, "Initial");
        wiki.commit(&repo, &[("docs/b.md", "01234567890123456789")], 2_000, "Add b");
        for i in 0..3 {
            let content = format!("home v{i}");
            wiki.commit(&repo, &[("home.md", content.as_str())], 3_000 + i, &format!("Edit home {i}"));
        }
        wiki
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn commit(&self, repo: &git2::Repository, files: &[(&str, &str)], time: i64, message: &str) {
        let mut index = repo.index().unwrap();
        for (path, content) in files {
            let full = self.path().join(path);
            std::fs::create_dir_all(full.parent().unwrap()).unwrap();
            std::fs::write(&full, content).unwrap();
            index.add_path(Path::new(path)).unwrap();
        }
        index.write().unwrap();

        let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();
        let signature =
            git2::Signature::new("Dev", "dev@example.com", &git2::Time::new(time, 0)).unwrap();
        let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();
        repo.commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)
            .unwrap();
    }

    fn write_repo_config(&self, contents: &str) {
        let dir = self.path().join(".git/revbrowse");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("config.toml"), contents).unwrap();
    }

    /// rvb running inside this wiki with an isolated environment.
    fn rvb(&self) -> Command {
        let mut cmd = rvb_in(self.path());
        cmd.env("HOME", self.path()).env("XDG_CONFIG_HOME", self.path());
        cmd
    }
}

/// Get a command for running rvb in `dir`.
fn rvb_in(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("rvb").unwrap();
    cmd.current_dir(dir)
        .env_remove("REVBROWSE_CONFIG")
        .env_remove("RUST_LOG");
    cmd
}

fn json_stdout(cmd: &mut Command) -> serde_json::Value {
    let output = cmd.output().unwrap();
    assert!(
        output.status.success(),
        "rvb failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}

// =============================================================================
// Basics
// =============================================================================

#[test]
fn help_flag_works() {
    Command::cargo_bin("rvb")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("revision history"));
}

#[test]
fn version_flag_works() {
    Command::cargo_bin("rvb")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("rvb"));
}

#[test]
fn outside_repository_fails() {
    let dir = TempDir::new().unwrap();
    rvb_in(dir.path())
        .env("HOME", dir.path())
        .arg("index")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to open repository"));
}

// =============================================================================
// index
// =============================================================================

#[test]
fn index_groups_directories() {
    let wiki = TestWiki::new();

    let json = json_stdout(wiki.rvb().args(["--json", "index"]));

    let entries = json.as_array().unwrap();
    let docs = entries.iter().find(|e| e["path"] == "docs/").unwrap();
    assert_eq!(docs["kind"], "directory");
    assert_eq!(docs["size"], 30);
    let root = entries.iter().find(|e| e["path"] == "root.md").unwrap();
    assert_eq!(root["kind"], "leaf");
    assert_eq!(root["size"], 5);
}

#[test]
fn index_text_output() {
    let wiki = TestWiki::new();

    wiki.rvb()
        .args(["index", "docs"])
        .assert()
        .success()
        .stdout(predicate::str::contains("docs/a.md"))
        .stdout(predicate::str::contains("docs/b.md"))
        .stdout(predicate::str::contains("root.md").not());
}

#[test]
fn index_rejects_traversal() {
    let wiki = TestWiki::new();

    wiki.rvb()
        .args(["index", "docs/../.."])
        .assert()
        .failure()
        .stderr(predicate::str::contains("path traversal"));
}

#[test]
fn index_with_document_extension() {
    let wiki = TestWiki::new();
    wiki.write_repo_config("document_extension = \"md\"\n");

    let json = json_stdout(wiki.rvb().args(["--json", "index", "--flat"]));

    let mut paths: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["path"].as_str().unwrap())
        .collect();
    paths.sort();
    assert_eq!(paths, vec!["docs/a", "docs/b", "home", "root"]);
}

// =============================================================================
// history
// =============================================================================

#[test]
fn history_table_envelope() {
    let wiki = TestWiki::new();

    let json = json_stdout(wiki.rvb().args([
        "--json", "history", "home.md", "--length", "2", "--draw", "9",
    ]));

    assert_eq!(json["draw"], 9);
    assert_eq!(json["recordsTotal"], 3);
    assert_eq!(json["fully_loaded"], false);
    let data = json["data"].as_array().unwrap();
    assert_eq!(data.len(), 2);
    assert_eq!(data[0]["summary"], "Edit home 2");
    assert_eq!(data[0]["DT_RowId"], data[0]["revision_id"]);
}

#[test]
fn history_last_page_is_complete() {
    let wiki = TestWiki::new();

    let json = json_stdout(wiki.rvb().args([
        "--json", "history", "home.md", "--start", "2", "--length", "5",
    ]));

    assert_eq!(json["recordsTotal"], 3);
    assert_eq!(json["fully_loaded"], true);
    assert_eq!(json["data"][0]["summary"], "Edit home 0");
}

#[test]
fn history_uses_configured_page_length_and_link_base() {
    let wiki = TestWiki::new();
    wiki.write_repo_config(
        "document_extension = \"md\"\nlink_base = \"/wiki/\"\n\n[history]\npage_length = 1\n",
    );

    let json = json_stdout(wiki.rvb().args(["--json", "history", "home"]));

    let data = json["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert!(data[0]["link"].as_str().unwrap().starts_with("/wiki/_commit/"));
    assert!(data[0]["link"].as_str().unwrap().ends_with("/home"));
}

#[test]
fn history_text_output() {
    let wiki = TestWiki::new();

    wiki.rvb()
        .args(["history", "home.md"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Edit home 1"))
        .stdout(predicate::str::contains("Showing 1-3"));
}

#[test]
fn zero_length_rejected() {
    let wiki = TestWiki::new();

    wiki.rvb()
        .args(["history", "home.md", "--length", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("length must be positive"));
}

// =============================================================================
// config and completion
// =============================================================================

#[test]
fn config_get_default() {
    let wiki = TestWiki::new();

    wiki.rvb()
        .args(["config", "get", "history.page_length"])
        .assert()
        .success()
        .stdout("10\n");
}

#[test]
fn config_get_repo_override() {
    let wiki = TestWiki::new();
    wiki.write_repo_config("[display]\ntimezone = \"utc\"\n");

    wiki.rvb()
        .args(["config", "get", "display.timezone"])
        .assert()
        .success()
        .stdout("utc\n");
}

#[test]
fn config_get_unknown_key() {
    let wiki = TestWiki::new();

    wiki.rvb()
        .args(["config", "get", "trunk"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown configuration key"));
}

#[test]
fn config_list_shows_sources() {
    let wiki = TestWiki::new();
    wiki.write_repo_config("link_base = \"/wiki\"\n");

    wiki.rvb()
        .args(["config", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("# repo:"))
        .stdout(predicate::str::contains("link_base = /wiki"))
        .stdout(predicate::str::contains("document_extension = (not set)"));
}

#[test]
fn invalid_config_is_reported() {
    let wiki = TestWiki::new();
    wiki.write_repo_config("[history]\npage_length = 0\n");

    wiki.rvb()
        .args(["history", "home.md"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load config"));
}

#[test]
fn completion_bash() {
    Command::cargo_bin("rvb")
        .unwrap()
        .args(["completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("rvb"));
}
